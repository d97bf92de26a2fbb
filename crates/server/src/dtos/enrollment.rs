use crate::dtos::student::StudentResponse;
use chrono::{NaiveDate, NaiveDateTime};
use database::{
    entities::{enrollments, transfer_logs},
    services::enrollment::{EnrollmentHistory, TransferInput},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub group_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    pub enrolled_at: NaiveDateTime,
    pub ended_at: Option<NaiveDateTime>,
    pub is_active: bool,
}

impl From<enrollments::Model> for EnrollmentResponse {
    fn from(enrollment: enrollments::Model) -> Self {
        Self {
            is_active: enrollment.is_open(),
            id: enrollment.id,
            student_id: enrollment.student_id,
            group_id: enrollment.group_id,
            group_name: None,
            enrolled_at: enrollment.enrolled_at,
            ended_at: enrollment.ended_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransferLogResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub from_group_id: Uuid,
    pub to_group_id: Uuid,
    pub effective_date: NaiveDate,
    pub reason: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

impl From<transfer_logs::Model> for TransferLogResponse {
    fn from(log: transfer_logs::Model) -> Self {
        Self {
            id: log.id,
            student_id: log.student_id,
            from_group_id: log.from_group_id,
            to_group_id: log.to_group_id,
            effective_date: log.effective_date,
            reason: log.reason,
            created_by: log.created_by,
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollRequest {
    pub group_id: Uuid,
    /// Defaults to now
    pub enrolled_at: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EndEnrollmentRequest {
    /// Defaults to now
    pub ended_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    pub from_group_id: Uuid,
    pub to_group_id: Uuid,
    pub effective_date: NaiveDate,
    pub reason: Option<String>,
}

impl From<TransferRequest> for TransferInput {
    fn from(request: TransferRequest) -> Self {
        Self {
            from_group_id: request.from_group_id,
            to_group_id: request.to_group_id,
            effective_date: request.effective_date,
            reason: request.reason,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentActionResponse {
    pub message: String,
    pub enrollment: EnrollmentResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransferResponse {
    pub message: String,
    pub transfer: TransferLogResponse,
    pub enrollment: EnrollmentResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentHistoryResponse {
    pub student: StudentResponse,
    pub enrollments: Vec<EnrollmentResponse>,
    pub transfers: Vec<TransferLogResponse>,
}

impl From<EnrollmentHistory> for EnrollmentHistoryResponse {
    fn from(history: EnrollmentHistory) -> Self {
        let enrollments = history
            .enrollments
            .into_iter()
            .map(|(enrollment, group_name)| EnrollmentResponse {
                group_name: Some(group_name),
                ..enrollment.into()
            })
            .collect();

        Self {
            student: history.student.into(),
            enrollments,
            transfers: history.transfers.into_iter().map(Into::into).collect(),
        }
    }
}
