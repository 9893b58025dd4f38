use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum User {
    Table,
    Uuid,
    PasswordHash,
}

#[derive(Iden)]
enum UserAccessKey {
    Table,
    KeyHash,
    UserId,
}

#[derive(Iden)]
enum Profile {
    Table,
    UserId,
    DisplayName,
    MainEmail,
    TeeShirtSize,
}

#[derive(Iden)]
enum Conference {
    Table,
    Uuid,
    Name,
    Description,
    OrganizerId,
    City,
    StartDate,
    EndDate,
    Month,
    MaxAttendees,
    SeatsAvailable,
}

#[derive(Iden)]
enum ConferenceTopic {
    Table,
    ConferenceId,
    Topic,
}

#[derive(Iden)]
enum Attendance {
    Table,
    UserId,
    ConferenceId,
}

#[derive(Iden)]
enum Session {
    Table,
    Uuid,
    ConferenceId,
    Name,
    Highlights,
    DurationMinutes,
    TypeOfSession,
    Date,
    StartTime,
}

#[derive(Iden)]
enum SessionType {
    Table,
    Uuid,
    Label,
}

#[derive(Iden)]
enum Speaker {
    Table,
    Uuid,
    Name,
    Description,
}

#[derive(Iden)]
enum SessionSpeakerLink {
    Table,
    SessionId,
    SpeakerId,
    SpeakerName,
}

#[derive(Iden)]
enum SpeakerSessionLink {
    Table,
    SpeakerId,
    SessionId,
    SessionName,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Uuid)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(User::PasswordHash)
                            .string_len(120)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserAccessKey::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserAccessKey::KeyHash)
                            .string_len(120)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserAccessKey::UserId).uuid().not_null())
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-access-key_user")
                            .from_tbl(UserAccessKey::Table)
                            .from_col(UserAccessKey::UserId)
                            .to_tbl(User::Table)
                            .to_col(User::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profile::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profile::DisplayName).string().not_null())
                    .col(ColumnDef::new(Profile::MainEmail).string())
                    .col(
                        ColumnDef::new(Profile::TeeShirtSize)
                            .string_len(20)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-profile_user")
                            .from_tbl(Profile::Table)
                            .from_col(Profile::UserId)
                            .to_tbl(User::Table)
                            .to_col(User::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Conference::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Conference::Uuid)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Conference::Name).string().not_null())
                    .col(ColumnDef::new(Conference::Description).string())
                    .col(ColumnDef::new(Conference::OrganizerId).uuid().not_null())
                    .col(ColumnDef::new(Conference::City).string())
                    .col(ColumnDef::new(Conference::StartDate).date())
                    .col(ColumnDef::new(Conference::EndDate).date())
                    .col(ColumnDef::new(Conference::Month).integer().not_null())
                    .col(
                        ColumnDef::new(Conference::MaxAttendees)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Conference::SeatsAvailable)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-conference_organizer")
                            .from_tbl(Conference::Table)
                            .from_col(Conference::OrganizerId)
                            .to_tbl(User::Table)
                            .to_col(User::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConferenceTopic::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ConferenceTopic::ConferenceId).uuid().not_null())
                    .col(ColumnDef::new(ConferenceTopic::Topic).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(ConferenceTopic::ConferenceId)
                            .col(ConferenceTopic::Topic),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-topic_conference")
                            .from_tbl(ConferenceTopic::Table)
                            .from_col(ConferenceTopic::ConferenceId)
                            .to_tbl(Conference::Table)
                            .to_col(Conference::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attendance::UserId).uuid().not_null())
                    .col(ColumnDef::new(Attendance::ConferenceId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(Attendance::UserId)
                            .col(Attendance::ConferenceId),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-attendance_user")
                            .from_tbl(Attendance::Table)
                            .from_col(Attendance::UserId)
                            .to_tbl(User::Table)
                            .to_col(User::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-attendance_conference")
                            .from_tbl(Attendance::Table)
                            .from_col(Attendance::ConferenceId)
                            .to_tbl(Conference::Table)
                            .to_col(Conference::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Session::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Session::Uuid)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Session::ConferenceId).uuid().not_null())
                    .col(ColumnDef::new(Session::Name).string().not_null())
                    .col(ColumnDef::new(Session::Highlights).string())
                    .col(ColumnDef::new(Session::DurationMinutes).integer())
                    .col(
                        ColumnDef::new(Session::TypeOfSession)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Session::Date).date())
                    .col(ColumnDef::new(Session::StartTime).time())
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-session_conference")
                            .from_tbl(Session::Table)
                            .from_col(Session::ConferenceId)
                            .to_tbl(Conference::Table)
                            .to_col(Conference::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionType::Uuid)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SessionType::Label).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Speaker::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Speaker::Uuid)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Speaker::Name).string().not_null())
                    .col(ColumnDef::new(Speaker::Description).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionSpeakerLink::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SessionSpeakerLink::SessionId).uuid().not_null())
                    .col(ColumnDef::new(SessionSpeakerLink::SpeakerId).uuid().not_null())
                    .col(
                        ColumnDef::new(SessionSpeakerLink::SpeakerName)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(SessionSpeakerLink::SessionId)
                            .col(SessionSpeakerLink::SpeakerId),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-session-speaker-link_session")
                            .from_tbl(SessionSpeakerLink::Table)
                            .from_col(SessionSpeakerLink::SessionId)
                            .to_tbl(Session::Table)
                            .to_col(Session::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-session-speaker-link_speaker")
                            .from_tbl(SessionSpeakerLink::Table)
                            .from_col(SessionSpeakerLink::SpeakerId)
                            .to_tbl(Speaker::Table)
                            .to_col(Speaker::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SpeakerSessionLink::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SpeakerSessionLink::SpeakerId).uuid().not_null())
                    .col(ColumnDef::new(SpeakerSessionLink::SessionId).uuid().not_null())
                    .col(
                        ColumnDef::new(SpeakerSessionLink::SessionName)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(SpeakerSessionLink::SpeakerId)
                            .col(SpeakerSessionLink::SessionId),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-speaker-session-link_speaker")
                            .from_tbl(SpeakerSessionLink::Table)
                            .from_col(SpeakerSessionLink::SpeakerId)
                            .to_tbl(Speaker::Table)
                            .to_col(Speaker::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk-speaker-session-link_session")
                            .from_tbl(SpeakerSessionLink::Table)
                            .from_col(SpeakerSessionLink::SessionId)
                            .to_tbl(Session::Table)
                            .to_col(Session::Uuid)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SpeakerSessionLink::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionSpeakerLink::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Speaker::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionType::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Session::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConferenceTopic::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Conference::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserAccessKey::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        Ok(())
    }
}
