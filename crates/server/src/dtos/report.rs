use crate::dtos::{attendance::SessionResponse, group::GroupResponse, student::StudentResponse};
use chrono::NaiveDate;
use database::services::report::{GroupReport, ReportRow};
use models::AttendanceStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportRowResponse {
    pub student: StudentResponse,
    /// One entry per session, in the order of `sessions`
    #[schema(value_type = Vec<Option<String>>)]
    pub statuses: Vec<Option<AttendanceStatus>>,
    pub present: u32,
    pub excused: u32,
    pub absent: u32,
    pub installments_due: u32,
    pub attendance_rate: Option<f64>,
}

impl From<ReportRow> for ReportRowResponse {
    fn from(row: ReportRow) -> Self {
        Self {
            student: row.student.into(),
            statuses: row.statuses,
            present: row.counts.present,
            excused: row.counts.excused,
            absent: row.counts.absent,
            installments_due: row.installments_due,
            attendance_rate: row.attendance_rate,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupReportResponse {
    pub group: GroupResponse,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sessions: Vec<SessionResponse>,
    pub students: Vec<ReportRowResponse>,
    pub lectures_held: u64,
    pub lectures_remaining: u64,
}

impl From<GroupReport> for GroupReportResponse {
    fn from(report: GroupReport) -> Self {
        Self {
            group: report.group.into(),
            from: report.from,
            to: report.to,
            sessions: report.sessions.into_iter().map(Into::into).collect(),
            students: report.rows.into_iter().map(Into::into).collect(),
            lectures_held: report.lectures_held,
            lectures_remaining: report.lectures_remaining,
        }
    }
}
