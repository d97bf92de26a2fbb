pub mod attendances;
pub mod branches;
pub mod enrollments;
pub mod groups;
pub mod lecture_sessions;
pub mod students;
pub mod transfer_logs;
pub mod users;
