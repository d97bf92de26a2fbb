use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One attendance row per student per lecture session, the upsert target
        manager
            .create_index(
                Index::create()
                    .name("idx_attendances_session_student")
                    .table(Attendances::Table)
                    .col(Attendances::LectureSessionId)
                    .col(Attendances::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One lecture session per group per calendar date
        manager
            .create_index(
                Index::create()
                    .name("idx_lecture_sessions_group_date")
                    .table(LectureSessions::Table)
                    .col(LectureSessions::GroupId)
                    .col(LectureSessions::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lecture numbers never repeat within a group
        manager
            .create_index(
                Index::create()
                    .name("idx_lecture_sessions_group_number")
                    .table(LectureSessions::Table)
                    .col(LectureSessions::GroupId)
                    .col(LectureSessions::LectureNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Branch filters on scoped tables
        manager
            .create_index(
                Index::create()
                    .name("idx_groups_branch_id")
                    .table(Groups::Table)
                    .col(Groups::BranchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_branch_id")
                    .table(Students::Table)
                    .col(Students::BranchId)
                    .to_owned(),
            )
            .await?;

        // Roster lookups by group and student history lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_group_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::GroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendances_student_id")
                    .table(Attendances::Table)
                    .col(Attendances::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transfer_logs_student_id")
                    .table(TransferLogs::Table)
                    .col(TransferLogs::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_transfer_logs_student_id",
            "idx_attendances_student_id",
            "idx_enrollments_student_id",
            "idx_enrollments_group_id",
            "idx_students_branch_id",
            "idx_groups_branch_id",
            "idx_lecture_sessions_group_number",
            "idx_lecture_sessions_group_date",
            "idx_attendances_session_student",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum Groups {
    Table,
    BranchId,
}

#[derive(Iden)]
enum Students {
    Table,
    BranchId,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    StudentId,
    GroupId,
}

#[derive(Iden)]
enum LectureSessions {
    Table,
    GroupId,
    Date,
    LectureNumber,
}

#[derive(Iden)]
enum Attendances {
    Table,
    LectureSessionId,
    StudentId,
}

#[derive(Iden)]
enum TransferLogs {
    Table,
    StudentId,
}
