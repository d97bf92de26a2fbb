use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create branches table
        manager
            .create_table(
                Table::create()
                    .table(Branches::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Branches::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Branches::Name).string().not_null())
                    .col(ColumnDef::new(Branches::Location).string().not_null())
                    .col(ColumnDef::new(Branches::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Branches::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Users::Subject)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::BranchId).uuid())
                    .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users-branch_id")
                            .from(Users::Table, Users::BranchId)
                            .to(Branches::Table, Branches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create groups table
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Groups::BranchId).uuid().not_null())
                    .col(ColumnDef::new(Groups::Name).string().not_null())
                    .col(ColumnDef::new(Groups::DayPattern).string().not_null())
                    .col(ColumnDef::new(Groups::StartDate).date().not_null())
                    .col(ColumnDef::new(Groups::MaxLectures).integer().not_null())
                    .col(
                        ColumnDef::new(Groups::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Groups::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Groups::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-groups-branch_id")
                            .from(Groups::Table, Groups::BranchId)
                            .to(Branches::Table, Branches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::BranchId).uuid().not_null())
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::Track).string().not_null())
                    .col(ColumnDef::new(Students::Details).text())
                    .col(ColumnDef::new(Students::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-branch_id")
                            .from(Students::Table, Students::BranchId)
                            .to(Branches::Table, Branches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollments table
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Enrollments::GroupId).uuid().not_null())
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::EndedAt).date_time())
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-student_id")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-group_id")
                            .from(Enrollments::Table, Enrollments::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create lecture_sessions table
        manager
            .create_table(
                Table::create()
                    .table(LectureSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LectureSessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LectureSessions::GroupId).uuid().not_null())
                    .col(ColumnDef::new(LectureSessions::Date).date().not_null())
                    .col(
                        ColumnDef::new(LectureSessions::LectureNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LectureSessions::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LectureSessions::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lecture_sessions-group_id")
                            .from(LectureSessions::Table, LectureSessions::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create attendances table
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Attendances::LectureSessionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendances::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Attendances::Status).string().not_null())
                    .col(
                        ColumnDef::new(Attendances::IsInstallmentDue)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Attendances::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attendances::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attendances-lecture_session_id")
                            .from(Attendances::Table, Attendances::LectureSessionId)
                            .to(LectureSessions::Table, LectureSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attendances-student_id")
                            .from(Attendances::Table, Attendances::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transfer_logs table
        manager
            .create_table(
                Table::create()
                    .table(TransferLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransferLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TransferLogs::StudentId).uuid().not_null())
                    .col(ColumnDef::new(TransferLogs::FromGroupId).uuid().not_null())
                    .col(ColumnDef::new(TransferLogs::ToGroupId).uuid().not_null())
                    .col(
                        ColumnDef::new(TransferLogs::EffectiveDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransferLogs::Reason).text())
                    .col(ColumnDef::new(TransferLogs::CreatedBy).uuid())
                    .col(
                        ColumnDef::new(TransferLogs::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransferLogs::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transfer_logs-student_id")
                            .from(TransferLogs::Table, TransferLogs::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transfer_logs-from_group_id")
                            .from(TransferLogs::Table, TransferLogs::FromGroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transfer_logs-to_group_id")
                            .from(TransferLogs::Table, TransferLogs::ToGroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transfer_logs-created_by")
                            .from(TransferLogs::Table, TransferLogs::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(TransferLogs::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LectureSessions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Branches::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Branches {
    Table,
    Id,
    Name,
    Location,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Subject,
    Role,
    BranchId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    BranchId,
    Name,
    DayPattern,
    StartDate,
    MaxLectures,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    BranchId,
    Name,
    Track,
    Details,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    GroupId,
    EnrolledAt,
    EndedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum LectureSessions {
    Table,
    Id,
    GroupId,
    Date,
    LectureNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Attendances {
    Table,
    Id,
    LectureSessionId,
    StudentId,
    Status,
    IsInstallmentDue,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TransferLogs {
    Table,
    Id,
    StudentId,
    FromGroupId,
    ToGroupId,
    EffectiveDate,
    Reason,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
