use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub conference_id: Uuid,
    pub name: String,
    pub highlights: Option<String>,
    pub duration_minutes: Option<i32>,
    pub type_of_session: String,
    pub date: Option<Date>,
    pub start_time: Option<Time>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::conference::Entity",
        from = "Column::ConferenceId",
        to = "super::conference::Column::Uuid"
    )]
    Conference,
    #[sea_orm(has_many = "super::session_speaker_link::Entity")]
    SessionSpeakerLink,
    #[sea_orm(has_many = "super::wishlist_entry::Entity")]
    WishlistEntry,
}

impl Related<super::conference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conference.def()
    }
}

impl Related<super::session_speaker_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionSpeakerLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
