//! Translation of `{field, operator, value}` filter triples into sea-orm
//! queries. Row-level comparisons compose into the SQL condition; filters
//! the row query cannot express (topic-list membership, `NE`, and second
//! inequality fields on sessions) are applied in memory after the fetch.

use chrono::{NaiveDate, NaiveTime};
use sea_orm::sea_query::{Condition, SimpleExpr};
use sea_orm::{prelude::*, QueryOrder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::conference::Conference;
use crate::domain::session::Session;
use crate::schema;
use crate::EntityError;

/// One inbound filter triple, exactly as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: String,
    pub operator: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("filter contains invalid field or operator")]
    InvalidFieldOrOperator,
    #[error("inequality filter is allowed on only one field")]
    MultipleInequalityFields,
    #[error("filter value {0:?} is not a number")]
    InvalidNumericValue(String),
    #[error("filter value {0:?} is not a date (expected YYYY-MM-DD)")]
    InvalidDateValue(String),
    #[error("filter value {0:?} is not a time (expected HH:MM)")]
    InvalidTimeValue(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Gt,
    GtEq,
    Lt,
    LtEq,
    Ne,
}

impl FilterOperator {
    fn parse(s: &str) -> Option<FilterOperator> {
        match s {
            "EQ" => Some(FilterOperator::Eq),
            "GT" => Some(FilterOperator::Gt),
            "GTEQ" => Some(FilterOperator::GtEq),
            "LT" => Some(FilterOperator::Lt),
            "LTEQ" => Some(FilterOperator::LtEq),
            "NE" => Some(FilterOperator::Ne),
            _ => None,
        }
    }

    /// Everything except `EQ` counts as an inequality for the
    /// one-inequality-field restriction.
    pub fn is_inequality(self) -> bool {
        !matches!(self, FilterOperator::Eq)
    }

    fn compare<T: PartialOrd>(self, left: T, right: T) -> bool {
        match self {
            FilterOperator::Eq => left == right,
            FilterOperator::Gt => left > right,
            FilterOperator::GtEq => left >= right,
            FilterOperator::Lt => left < right,
            FilterOperator::LtEq => left <= right,
            FilterOperator::Ne => left != right,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FilterValue {
    Text(String),
    Integer(i32),
    Date(NaiveDate),
    Time(NaiveTime),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConferenceField {
    City,
    Topic,
    Month,
    MaxAttendees,
}

impl ConferenceField {
    fn parse(s: &str) -> Option<ConferenceField> {
        match s {
            "CITY" => Some(ConferenceField::City),
            "TOPIC" => Some(ConferenceField::Topic),
            "MONTH" => Some(ConferenceField::Month),
            "MAX_ATTENDEES" => Some(ConferenceField::MaxAttendees),
            _ => None,
        }
    }

    fn column(self) -> Option<schema::conference::Column> {
        match self {
            ConferenceField::City => Some(schema::conference::Column::City),
            ConferenceField::Month => Some(schema::conference::Column::Month),
            ConferenceField::MaxAttendees => Some(schema::conference::Column::MaxAttendees),
            // Topics live in a child table; they never reach the row query.
            ConferenceField::Topic => None,
        }
    }
}

/// A validated conference query, ready to run.
#[derive(Debug, Clone)]
pub struct ConferenceQuery {
    condition: Condition,
    order_column: Option<schema::conference::Column>,
    post_filters: Vec<(ConferenceField, FilterOperator, FilterValue)>,
}

pub fn build_conference_query(filters: &[FilterClause]) -> Result<ConferenceQuery, FilterError> {
    let mut condition = Condition::all();
    let mut post_filters = Vec::new();
    let mut inequality_field: Option<ConferenceField> = None;

    for clause in filters {
        let field =
            ConferenceField::parse(&clause.field).ok_or(FilterError::InvalidFieldOrOperator)?;
        let operator =
            FilterOperator::parse(&clause.operator).ok_or(FilterError::InvalidFieldOrOperator)?;

        if operator.is_inequality() {
            match inequality_field {
                Some(prev) if prev != field => {
                    return Err(FilterError::MultipleInequalityFields);
                }
                _ => inequality_field = Some(field),
            }
        }

        let value = match field {
            ConferenceField::City | ConferenceField::Topic => {
                FilterValue::Text(clause.value.clone())
            }
            ConferenceField::Month | ConferenceField::MaxAttendees => FilterValue::Integer(
                clause
                    .value
                    .parse::<i32>()
                    .map_err(|_| FilterError::InvalidNumericValue(clause.value.clone()))?,
            ),
        };

        match (field.column(), operator) {
            (Some(_), FilterOperator::Ne) | (None, _) => {
                post_filters.push((field, operator, value));
            }
            (Some(column), operator) => {
                condition = condition.add(column_expr(column, operator, &value));
            }
        }
    }

    let order_column = inequality_field.and_then(|f| f.column());

    Ok(ConferenceQuery {
        condition,
        order_column,
        post_filters,
    })
}

fn column_expr<Col>(column: Col, operator: FilterOperator, value: &FilterValue) -> SimpleExpr
where
    Col: ColumnTrait,
{
    let value: sea_orm::Value = match value {
        FilterValue::Text(v) => v.clone().into(),
        FilterValue::Integer(v) => (*v).into(),
        FilterValue::Date(v) => (*v).into(),
        FilterValue::Time(v) => (*v).into(),
    };
    match operator {
        FilterOperator::Eq => column.eq(value),
        FilterOperator::Gt => column.gt(value),
        FilterOperator::GtEq => column.gte(value),
        FilterOperator::Lt => column.lt(value),
        FilterOperator::LtEq => column.lte(value),
        FilterOperator::Ne => column.ne(value),
    }
}

impl ConferenceQuery {
    /// When an inequality filter is present, results come back ordered by
    /// that field first, then name; otherwise just by name.
    pub async fn fetch<C>(&self, db: &C) -> Result<Vec<Conference>, EntityError>
    where
        C: ConnectionTrait,
    {
        let mut select = schema::conference::Entity::find().filter(self.condition.clone());
        if let Some(column) = self.order_column {
            select = select.order_by_asc(column);
        }
        let rows = select
            .order_by_asc(schema::conference::Column::Name)
            .all(db)
            .await?;

        let conferences = Conference::load_with_topics(db, rows).await?;
        Ok(conferences
            .into_iter()
            .filter(|c| self.matches(c))
            .collect())
    }

    fn matches(&self, conference: &Conference) -> bool {
        self.post_filters
            .iter()
            .all(|(field, operator, value)| match (field, value) {
                (ConferenceField::City, FilterValue::Text(v)) => conference
                    .city
                    .as_deref()
                    .map(|city| operator.compare(city, v.as_str()))
                    .unwrap_or(false),
                (ConferenceField::Topic, FilterValue::Text(v)) => conference
                    .topics
                    .iter()
                    .any(|topic| operator.compare(topic.as_str(), v.as_str())),
                (ConferenceField::Month, FilterValue::Integer(v)) => {
                    operator.compare(conference.month, *v)
                }
                (ConferenceField::MaxAttendees, FilterValue::Integer(v)) => {
                    operator.compare(conference.max_attendees, *v)
                }
                _ => false,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Type,
    Date,
    StartTime,
    Duration,
}

impl SessionField {
    fn parse(s: &str) -> Option<SessionField> {
        match s {
            "TYPE" => Some(SessionField::Type),
            "DATE" => Some(SessionField::Date),
            "START_TIME" => Some(SessionField::StartTime),
            "DURATION" => Some(SessionField::Duration),
            _ => None,
        }
    }

    fn column(self) -> schema::session::Column {
        match self {
            SessionField::Type => schema::session::Column::TypeOfSession,
            SessionField::Date => schema::session::Column::Date,
            SessionField::StartTime => schema::session::Column::StartTime,
            SessionField::Duration => schema::session::Column::DurationMinutes,
        }
    }
}

/// A validated session query. Unlike conferences, a second inequality
/// field is not rejected: the first one composes into SQL and the rest are
/// evaluated in memory over the fetched rows.
#[derive(Debug, Clone)]
pub struct SessionQuery {
    condition: Condition,
    post_filters: Vec<(SessionField, FilterOperator, FilterValue)>,
}

pub fn build_session_query(filters: &[FilterClause]) -> Result<SessionQuery, FilterError> {
    let mut condition = Condition::all();
    let mut post_filters = Vec::new();
    let mut sql_inequality_field: Option<SessionField> = None;

    for clause in filters {
        let field = SessionField::parse(&clause.field).ok_or(FilterError::InvalidFieldOrOperator)?;
        let operator =
            FilterOperator::parse(&clause.operator).ok_or(FilterError::InvalidFieldOrOperator)?;

        let value = match field {
            SessionField::Type => FilterValue::Text(clause.value.clone()),
            SessionField::Duration => FilterValue::Integer(
                clause
                    .value
                    .parse::<i32>()
                    .map_err(|_| FilterError::InvalidNumericValue(clause.value.clone()))?,
            ),
            SessionField::Date => FilterValue::Date(
                NaiveDate::parse_from_str(&clause.value, "%Y-%m-%d")
                    .map_err(|_| FilterError::InvalidDateValue(clause.value.clone()))?,
            ),
            SessionField::StartTime => FilterValue::Time(
                NaiveTime::parse_from_str(&clause.value, "%H:%M")
                    .map_err(|_| FilterError::InvalidTimeValue(clause.value.clone()))?,
            ),
        };

        if operator == FilterOperator::Eq {
            condition = condition.add(column_expr(field.column(), operator, &value));
        } else if operator == FilterOperator::Ne {
            post_filters.push((field, operator, value));
        } else {
            match sql_inequality_field {
                None => {
                    sql_inequality_field = Some(field);
                    condition = condition.add(column_expr(field.column(), operator, &value));
                }
                Some(prev) if prev == field => {
                    condition = condition.add(column_expr(field.column(), operator, &value));
                }
                Some(_) => post_filters.push((field, operator, value)),
            }
        }
    }

    Ok(SessionQuery {
        condition,
        post_filters,
    })
}

impl SessionQuery {
    pub async fn fetch<C>(
        &self,
        db: &C,
        conference_id: Option<Uuid>,
    ) -> Result<Vec<Session>, EntityError>
    where
        C: ConnectionTrait,
    {
        let mut condition = self.condition.clone();
        if let Some(conference_id) = conference_id {
            condition = condition.add(schema::session::Column::ConferenceId.eq(conference_id));
        }

        let rows = schema::session::Entity::find()
            .filter(condition)
            .order_by_asc(schema::session::Column::Name)
            .all(db)
            .await?;

        let sessions = Session::load_with_speakers(db, rows).await?;
        Ok(sessions.into_iter().filter(|s| self.matches(s)).collect())
    }

    // A session with the filtered property unset never matches, the way a
    // property filter skips entities without that property.
    fn matches(&self, session: &Session) -> bool {
        self.post_filters
            .iter()
            .all(|(field, operator, value)| match (field, value) {
                (SessionField::Type, FilterValue::Text(v)) => {
                    operator.compare(session.type_of_session.as_str(), v.as_str())
                }
                (SessionField::Date, FilterValue::Date(v)) => session
                    .date
                    .map(|date| operator.compare(date, *v))
                    .unwrap_or(false),
                (SessionField::StartTime, FilterValue::Time(v)) => session
                    .start_time
                    .map(|time| operator.compare(time, *v))
                    .unwrap_or(false),
                (SessionField::Duration, FilterValue::Integer(v)) => session
                    .duration_minutes
                    .map(|duration| operator.compare(duration, *v))
                    .unwrap_or(false),
                _ => false,
            })
    }
}
