#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use database::{
    Scope,
    entities::{branches, groups, students, users},
    services::{
        branch::{BranchInput, BranchService},
        group::{GroupInput, GroupService},
        student::{StudentInput, StudentService},
    },
};
use migration::{Migrator, MigratorTrait};
use models::{DayPattern, Role};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

/// A fresh in-memory database with every migration applied
pub async fn setup_db() -> DatabaseConnection {
    // One connection, otherwise each pooled connection gets its own empty database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0).unwrap()
}

/// Inserts a user directly, bypassing the admin check on `UserService`
pub async fn insert_user(
    db: &DatabaseConnection,
    name: &str,
    role: Role,
    branch_id: Option<Uuid>,
) -> users::Model {
    let now = Utc::now().naive_utc();
    users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", name.to_lowercase())),
        subject: Set(format!("sub-{}", name.to_lowercase())),
        role: Set(role),
        branch_id: Set(branch_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn admin(db: &DatabaseConnection) -> Scope {
    Scope::for_user(&insert_user(db, "Admin", Role::Admin, None).await)
}

pub async fn employee(db: &DatabaseConnection, name: &str, branch_id: Uuid) -> Scope {
    Scope::for_user(&insert_user(db, name, Role::Employee, Some(branch_id)).await)
}

pub async fn branch(db: &DatabaseConnection, admin: &Scope, name: &str) -> branches::Model {
    BranchService::create(
        db,
        admin,
        BranchInput {
            name: name.to_string(),
            location: format!("{name} street"),
        },
    )
    .await
    .unwrap()
}

pub async fn group(
    db: &DatabaseConnection,
    scope: &Scope,
    branch_id: Uuid,
    name: &str,
    day_pattern: DayPattern,
) -> groups::Model {
    GroupService::create(
        db,
        scope,
        GroupInput {
            branch_id: Some(branch_id),
            name: name.to_string(),
            day_pattern,
            start_date: date(2025, 1, 1),
            max_lectures: 8,
        },
    )
    .await
    .unwrap()
}

pub async fn student(
    db: &DatabaseConnection,
    scope: &Scope,
    branch_id: Uuid,
    name: &str,
) -> students::Model {
    StudentService::create(
        db,
        scope,
        StudentInput {
            branch_id: Some(branch_id),
            name: name.to_string(),
            track: "Backend".to_string(),
            details: None,
        },
    )
    .await
    .unwrap()
}
