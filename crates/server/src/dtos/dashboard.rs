use chrono::NaiveDate;
use database::services::dashboard::Overview;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub date: NaiveDate,
    pub branches: u64,
    pub active_groups: u64,
    pub students: u64,
    pub open_enrollments: u64,
    /// Active groups whose pattern covers `date`
    pub groups_today: u64,
}

impl From<Overview> for DashboardResponse {
    fn from(overview: Overview) -> Self {
        Self {
            date: overview.date,
            branches: overview.branches,
            active_groups: overview.active_groups,
            students: overview.students,
            open_enrollments: overview.open_enrollments,
            groups_today: overview.groups_today,
        }
    }
}
