//! Branch isolation for queries.
//!
//! Every service call carries the caller's [`Scope`]. Employees only ever see
//! rows belonging to their own branch, and the restriction is part of the
//! query itself, so a row in another branch looks exactly like a missing one.

use crate::{
    entities::{branches, groups, students, users},
    error::{ServiceError, ServiceResult},
};
use models::Role;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PrimaryKeyTrait, QueryFilter, Select,
};
use uuid::Uuid;

/// An entity whose rows belong to a branch
pub trait BranchScoped: EntityTrait {
    /// Name used in "not found" messages
    const LABEL: &'static str;

    fn branch_column() -> Self::Column;
}

impl BranchScoped for branches::Entity {
    const LABEL: &'static str = "Branch";

    fn branch_column() -> Self::Column {
        branches::Column::Id
    }
}

impl BranchScoped for users::Entity {
    const LABEL: &'static str = "User";

    fn branch_column() -> Self::Column {
        users::Column::BranchId
    }
}

impl BranchScoped for groups::Entity {
    const LABEL: &'static str = "Group";

    fn branch_column() -> Self::Column {
        groups::Column::BranchId
    }
}

impl BranchScoped for students::Entity {
    const LABEL: &'static str = "Student";

    fn branch_column() -> Self::Column {
        students::Column::BranchId
    }
}

/// Who is asking, and which branch they are limited to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub user_id: Uuid,
    pub role: Role,
    pub branch_id: Option<Uuid>,
}

impl Scope {
    pub fn new(user_id: Uuid, role: Role, branch_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            role,
            branch_id,
        }
    }

    pub fn for_user(user: &users::Model) -> Self {
        Self::new(user.id, user.role, user.branch_id)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> ServiceResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            log::warn!("User {} attempted an admin-only operation", self.user_id);
            Err(ServiceError::forbidden(
                "This action is restricted to administrators",
            ))
        }
    }

    /// The branch restriction on `E`, usable on joined queries as well
    pub fn condition<E: BranchScoped>(&self) -> Condition {
        if self.is_admin() {
            return Condition::all();
        }

        // An employee without a branch matches nothing, and no branch has the nil id
        let branch_id = self.branch_id.unwrap_or(Uuid::nil());
        Condition::all().add(E::branch_column().eq(branch_id))
    }

    pub fn filter<E: BranchScoped>(&self, select: Select<E>) -> Select<E> {
        select.filter(self.condition::<E>())
    }

    pub fn find<E: BranchScoped>(&self) -> Select<E> {
        self.filter(E::find())
    }

    /// Load one visible row by id, `NotFound` when it is missing or out of scope
    pub async fn get<E, C>(&self, db: &C, id: Uuid) -> ServiceResult<E::Model>
    where
        E: BranchScoped,
        C: ConnectionTrait,
        Uuid: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        self.filter(E::find_by_id(id))
            .one(db)
            .await?
            .ok_or(ServiceError::not_found(E::LABEL))
    }

    /// The branch a new branch-scoped record is created in.
    ///
    /// Admins must name an existing branch. Employees always write into their
    /// own branch and may not name another one.
    pub async fn branch_for_new_record<C: ConnectionTrait>(
        &self,
        db: &C,
        requested: Option<Uuid>,
    ) -> ServiceResult<Uuid> {
        if self.is_admin() {
            let Some(branch_id) = requested else {
                return Err(ServiceError::invalid(
                    "branch_id",
                    "The branch field is required.",
                ));
            };

            return match branches::Entity::find_by_id(branch_id).one(db).await? {
                Some(branch) => Ok(branch.id),
                None => Err(ServiceError::invalid(
                    "branch_id",
                    "The selected branch is invalid.",
                )),
            };
        }

        let Some(own) = self.branch_id else {
            return Err(ServiceError::forbidden(
                "Your account is not assigned to a branch",
            ));
        };

        match requested {
            Some(branch_id) if branch_id != own => Err(ServiceError::invalid(
                "branch_id",
                "You can only manage records in your own branch.",
            )),
            _ => Ok(own),
        }
    }
}
