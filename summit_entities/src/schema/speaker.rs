use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "speaker")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::speaker_session_link::Entity")]
    SpeakerSessionLink,
    #[sea_orm(has_many = "super::session_speaker_link::Entity")]
    SessionSpeakerLink,
}

impl Related<super::speaker_session_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpeakerSessionLink.def()
    }
}

impl Related<super::session_speaker_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionSpeakerLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
