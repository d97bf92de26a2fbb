use crate::dtos::common::PaginationMeta;
use chrono::{NaiveDate, NaiveDateTime};
use database::{
    entities::students,
    services::student::{AttendanceRecord, StudentAttendance, StudentInput, StudentQuery},
};
use models::AttendanceStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentResponse {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub track: String,
    pub details: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<students::Model> for StudentResponse {
    fn from(student: students::Model) -> Self {
        Self {
            id: student.id,
            branch_id: student.branch_id,
            name: student.name,
            track: student.track,
            details: student.details,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StudentRequest {
    /// Required for admins; employees always use their own branch
    pub branch_id: Option<Uuid>,
    pub name: String,
    pub track: String,
    pub details: Option<String>,
}

impl From<StudentRequest> for StudentInput {
    fn from(request: StudentRequest) -> Self {
        Self {
            branch_id: request.branch_id,
            name: request.name,
            track: request.track,
            details: request.details,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub students: Vec<StudentResponse>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct StudentQueryParams {
    #[serde(default = "default_page")]
    pub page: u64,

    #[serde(default = "default_per_page")]
    pub per_page: u64,

    pub search: Option<String>,
    pub track: Option<String>,
    /// Only students currently enrolled in this group
    pub group_id: Option<Uuid>,
}

impl StudentQueryParams {
    pub fn query(&self) -> StudentQuery {
        StudentQuery {
            search: self.search.clone(),
            track: self.track.clone(),
            group_id: self.group_id,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceRecordResponse {
    pub session_id: Uuid,
    pub date: NaiveDate,
    pub lecture_number: i32,
    pub group_id: Uuid,
    pub group_name: String,
    #[schema(value_type = String, example = "present")]
    pub status: AttendanceStatus,
    pub is_installment_due: bool,
}

impl From<AttendanceRecord> for AttendanceRecordResponse {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            session_id: record.session_id,
            date: record.date,
            lecture_number: record.lecture_number,
            group_id: record.group_id,
            group_name: record.group_name,
            status: record.status,
            is_installment_due: record.is_installment_due,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentAttendanceResponse {
    pub student: StudentResponse,
    pub records: Vec<AttendanceRecordResponse>,
    pub present: u32,
    pub excused: u32,
    pub absent: u32,
    pub installments_due: u32,
    /// Share of recorded sessions attended, absent when nothing was recorded
    pub attendance_rate: Option<f64>,
}

impl From<StudentAttendance> for StudentAttendanceResponse {
    fn from(summary: StudentAttendance) -> Self {
        Self {
            student: summary.student.into(),
            records: summary.records.into_iter().map(Into::into).collect(),
            present: summary.counts.present,
            excused: summary.counts.excused,
            absent: summary.counts.absent,
            installments_due: summary.installments_due,
            attendance_rate: summary.counts.attendance_rate(),
        }
    }
}
