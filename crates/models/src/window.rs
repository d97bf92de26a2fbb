use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// The span of one calendar day, used to decide which enrollments were active on it.
///
/// An enrollment is active on the day when it started before the day ended and
/// it was either never ended or ended after the day started. An enrollment that
/// ended the moment it began never covers any day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// Midnight at the start of the day
    pub start: NaiveDateTime,
    /// Midnight at the start of the following day
    pub next: NaiveDateTime,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            start: date.and_time(NaiveTime::MIN),
            // The last representable date has no following midnight
            next: date
                .checked_add_days(Days::new(1))
                .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN)),
        }
    }

    pub fn covers(&self, enrolled_at: NaiveDateTime, ended_at: Option<NaiveDateTime>) -> bool {
        enrolled_at < self.next
            && ended_at.is_none_or(|ended| ended > self.start && ended > enrolled_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_window_bounds() {
        let window = DayWindow::for_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(window.start, at(10, 0));
        assert_eq!(window.next, at(11, 0));
    }

    #[test]
    fn test_enrolled_later_that_day_is_covered() {
        let window = DayWindow::for_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert!(window.covers(at(10, 23), None));
        assert!(!window.covers(at(11, 0), None));
    }

    #[test]
    fn test_ended_at_start_of_day_is_not_covered() {
        let window = DayWindow::for_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert!(!window.covers(at(1, 9), Some(at(10, 0))));
        assert!(window.covers(at(1, 9), Some(at(10, 8))));
        assert!(!window.covers(at(1, 9), Some(at(5, 8))));
    }

    #[test]
    fn test_zero_length_enrollment_covers_nothing() {
        let window = DayWindow::for_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert!(!window.covers(at(10, 10), Some(at(10, 10))));
        assert!(window.covers(at(10, 10), Some(at(10, 11))));
    }

    #[test]
    fn test_last_date_does_not_overflow() {
        let window = DayWindow::for_date(NaiveDate::MAX);
        assert_eq!(window.start, NaiveDate::MAX.and_time(NaiveTime::MIN));
        assert_eq!(window.next, NaiveDateTime::MAX);
        assert!(window.covers(window.start, None));
    }
}
