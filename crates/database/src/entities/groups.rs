use models::DayPattern;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub day_pattern: DayPattern,
    pub start_date: Date,
    pub max_lectures: i32,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::Id"
    )]
    Branch,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::lecture_sessions::Entity")]
    LectureSessions,
}

impl Related<super::branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branch.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::lecture_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LectureSessions.def()
    }
}

// Many-to-many relationship with students through enrollments
impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        super::enrollments::Relation::Student.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::enrollments::Relation::Group.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
