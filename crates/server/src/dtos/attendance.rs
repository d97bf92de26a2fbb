use crate::dtos::group::GroupResponse;
use chrono::{NaiveDate, NaiveDateTime};
use database::{
    entities::lecture_sessions,
    services::attendance::{AttendanceEntry, GroupAttendance, SessionAttendance},
};
use models::AttendanceStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub group_id: Uuid,
    pub date: NaiveDate,
    pub lecture_number: i32,
    pub created_at: NaiveDateTime,
}

impl From<lecture_sessions::Model> for SessionResponse {
    fn from(session: lecture_sessions::Model) -> Self {
        Self {
            id: session.id,
            group_id: session.group_id,
            date: session.date,
            lecture_number: session.lecture_number,
            created_at: session.created_at,
        }
    }
}

/// A rostered student and what was recorded for them, if anything
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterEntryResponse {
    pub student_id: Uuid,
    pub name: String,
    pub track: String,
    #[schema(value_type = Option<String>, example = "present")]
    pub status: Option<AttendanceStatus>,
    pub is_installment_due: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupAttendanceResponse {
    pub group: GroupResponse,
    pub session: Option<SessionResponse>,
    pub students: Vec<RosterEntryResponse>,
}

impl From<GroupAttendance> for GroupAttendanceResponse {
    fn from(entry: GroupAttendance) -> Self {
        let recorded: HashMap<Uuid, (AttendanceStatus, bool)> = entry
            .attendance
            .into_iter()
            .map(|a| (a.student_id, (a.status, a.is_installment_due)))
            .collect();

        let students = entry
            .roster
            .into_iter()
            .map(|student| {
                let record = recorded.get(&student.id).copied();
                RosterEntryResponse {
                    student_id: student.id,
                    name: student.name,
                    track: student.track,
                    status: record.map(|(status, _)| status),
                    is_installment_due: record.is_some_and(|(_, due)| due),
                }
            })
            .collect();

        Self {
            group: entry.group.into(),
            session: entry.session.map(Into::into),
            students,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveGroupsResponse {
    pub date: NaiveDate,
    /// Pattern covering the date, absent on Fridays
    #[schema(value_type = Option<String>, example = "sat_tue")]
    pub day_pattern: Option<models::DayPattern>,
    pub groups: Vec<GroupAttendanceResponse>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct AttendanceEntryRequest {
    pub student_id: Uuid,
    #[schema(value_type = String, example = "present")]
    pub status: AttendanceStatus,
    #[serde(default)]
    pub is_installment_due: bool,
}

impl From<AttendanceEntryRequest> for AttendanceEntry {
    fn from(request: AttendanceEntryRequest) -> Self {
        Self {
            student_id: request.student_id,
            status: request.status,
            is_installment_due: request.is_installment_due,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StoreAttendanceRequest {
    pub group_id: Uuid,
    pub date: NaiveDate,
    pub entries: Vec<AttendanceEntryRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreAttendanceResponse {
    pub message: String,
    pub session: SessionResponse,
    pub stored: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionAttendanceRow {
    pub student_id: Uuid,
    pub student_name: String,
    #[schema(value_type = String, example = "absent")]
    pub status: AttendanceStatus,
    pub is_installment_due: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionAttendanceResponse {
    pub session: SessionResponse,
    pub group: GroupResponse,
    pub attendance: Vec<SessionAttendanceRow>,
}

impl From<SessionAttendance> for SessionAttendanceResponse {
    fn from(result: SessionAttendance) -> Self {
        Self {
            session: result.session.into(),
            group: result.group.into(),
            attendance: result
                .rows
                .into_iter()
                .map(|(attendance, student)| SessionAttendanceRow {
                    student_id: student.id,
                    student_name: student.name,
                    status: attendance.status,
                    is_installment_due: attendance.is_installment_due,
                })
                .collect(),
        }
    }
}
