use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// A student's recorded status for one lecture session
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Excused,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<AttendanceStatus> {
        Self::iter().collect()
    }
}

#[cfg(feature = "database")]
impl_string_column!(AttendanceStatus);

/// Running totals of attendance statuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub present: u32,
    pub excused: u32,
    pub absent: u32,
}

impl StatusCounts {
    pub fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Excused => self.excused += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.excused + self.absent
    }

    /// Share of recorded sessions the student was present for, `None` with no records
    pub fn attendance_rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(f64::from(self.present) / f64::from(total)),
        }
    }
}

impl FromIterator<AttendanceStatus> for StatusCounts {
    fn from_iter<T: IntoIterator<Item = AttendanceStatus>>(iter: T) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_names() {
        assert_eq!(AttendanceStatus::Excused.as_str(), "excused");
        assert_eq!(
            AttendanceStatus::from_str("absent").unwrap(),
            AttendanceStatus::Absent
        );
        assert!(AttendanceStatus::from_str("late").is_err());
        assert_eq!(AttendanceStatus::all().len(), 3);
    }

    #[test]
    fn test_status_counts() {
        let counts: StatusCounts = [
            AttendanceStatus::Present,
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::Excused,
        ]
        .into_iter()
        .collect();

        assert_eq!(counts.present, 2);
        assert_eq!(counts.excused, 1);
        assert_eq!(counts.absent, 1);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.attendance_rate(), Some(0.5));
        assert_eq!(StatusCounts::default().attendance_rate(), None);
    }
}
