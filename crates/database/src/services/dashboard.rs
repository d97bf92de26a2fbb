use crate::{
    entities::{branches, groups, students},
    error::ServiceResult,
    scope::Scope,
    services::enrollment::EnrollmentService,
};
use chrono::NaiveDate;
use futures::try_join;
use models::DayPattern;
use sea_orm::{ColumnTrait, DatabaseConnection, PaginatorTrait, QueryFilter};

/// Headline counts, all limited to what the caller can see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overview {
    pub date: NaiveDate,
    pub branches: u64,
    pub active_groups: u64,
    pub students: u64,
    pub open_enrollments: u64,
    pub groups_today: u64,
}

pub struct DashboardService;

impl DashboardService {
    pub async fn overview(
        db: &DatabaseConnection,
        scope: &Scope,
        today: NaiveDate,
    ) -> ServiceResult<Overview> {
        let active = || {
            scope
                .find::<groups::Entity>()
                .filter(groups::Column::IsActive.eq(true))
        };

        let groups_today = async {
            match DayPattern::for_date(today) {
                Some(pattern) => {
                    active()
                        .filter(groups::Column::DayPattern.eq(pattern))
                        .count(db)
                        .await
                }
                None => Ok(0),
            }
        };

        let (branches, active_groups, students, open_enrollments, groups_today) = try_join!(
            scope.find::<branches::Entity>().count(db),
            active().count(db),
            scope.find::<students::Entity>().count(db),
            EnrollmentService::count_open(db, scope),
            groups_today,
        )?;

        Ok(Overview {
            date: today,
            branches,
            active_groups,
            students,
            open_enrollments,
            groups_today,
        })
    }
}
