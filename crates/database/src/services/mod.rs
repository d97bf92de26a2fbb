pub mod attendance;
pub mod branch;
pub mod dashboard;
pub mod enrollment;
pub mod group;
pub mod report;
pub mod student;
pub mod user;
