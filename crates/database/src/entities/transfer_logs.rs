use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Records a student's move from one group to another
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transfer_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub from_group_id: Uuid,
    pub to_group_id: Uuid,
    pub effective_date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::FromGroupId",
        to = "super::groups::Column::Id"
    )]
    FromGroup,
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::ToGroupId",
        to = "super::groups::Column::Id"
    )]
    ToGroup,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
