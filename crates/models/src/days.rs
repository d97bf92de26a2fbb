use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{BitAnd, BitOr, BitOrAssign},
};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// Represents the days of the week a group meets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[repr(transparent)]
pub struct DaySet(u8);

impl DaySet {
    // Constants for individual days
    pub const MONDAY: Self = DaySet(1 << 0);
    pub const TUESDAY: Self = DaySet(1 << 1);
    pub const WEDNESDAY: Self = DaySet(1 << 2);
    pub const THURSDAY: Self = DaySet(1 << 3);
    pub const FRIDAY: Self = DaySet(1 << 4);
    pub const SATURDAY: Self = DaySet(1 << 5);
    pub const SUNDAY: Self = DaySet(1 << 6);

    pub const NONE: Self = DaySet(0);

    /// Day-to-weekday mapping, in the order the week is displayed
    const WEEKDAYS: [(Self, Weekday); 7] = [
        (Self::SATURDAY, Weekday::Sat),
        (Self::SUNDAY, Weekday::Sun),
        (Self::MONDAY, Weekday::Mon),
        (Self::TUESDAY, Weekday::Tue),
        (Self::WEDNESDAY, Weekday::Wed),
        (Self::THURSDAY, Weekday::Thu),
        (Self::FRIDAY, Weekday::Fri),
    ];

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn contains(self, day: Self) -> bool {
        (self & day) == day
    }

    pub fn contains_weekday(self, weekday: Weekday) -> bool {
        self.contains(Self::from(weekday))
    }

    pub fn add(&mut self, day: Self) {
        *self |= day;
    }

    /// The weekdays in this set, Saturday first
    pub fn weekdays(self) -> impl Iterator<Item = Weekday> {
        Self::WEEKDAYS
            .into_iter()
            .filter(move |&(day, _)| self.contains(day))
            .map(|(_, weekday)| weekday)
    }
}

impl From<Weekday> for DaySet {
    fn from(weekday: Weekday) -> Self {
        Self::WEEKDAYS
            .into_iter()
            .find(|&(_, w)| w == weekday)
            .map(|(day, _)| day)
            .unwrap_or(Self::NONE)
    }
}

impl Display for DaySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let names: Vec<String> = self.weekdays().map(|w| w.to_string()).collect();

        write!(f, "{}", names.join(", "))
    }
}

// Bitwise operators
impl BitOr for DaySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        DaySet(self.0 | rhs.0)
    }
}

impl BitAnd for DaySet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        DaySet(self.0 & rhs.0)
    }
}

impl BitOrAssign for DaySet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// The fixed weekly schedules a group can follow. Each one covers two weekdays.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DayPattern {
    /// Saturday and Tuesday
    SatTue,
    /// Sunday and Wednesday
    SunWed,
    /// Monday and Thursday
    MonThu,
}

impl DayPattern {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn days(self) -> DaySet {
        match self {
            Self::SatTue => DaySet::SATURDAY | DaySet::TUESDAY,
            Self::SunWed => DaySet::SUNDAY | DaySet::WEDNESDAY,
            Self::MonThu => DaySet::MONDAY | DaySet::THURSDAY,
        }
    }

    /// The pattern meeting on `weekday`, if any. Friday has none.
    pub fn for_weekday(weekday: Weekday) -> Option<Self> {
        Self::iter().find(|pattern| pattern.days().contains_weekday(weekday))
    }

    pub fn for_date(date: NaiveDate) -> Option<Self> {
        Self::for_weekday(date.weekday())
    }

    pub fn meets_on(self, date: NaiveDate) -> bool {
        self.days().contains_weekday(date.weekday())
    }

    pub fn all() -> Vec<DayPattern> {
        Self::iter().collect()
    }
}

impl Display for DayPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(feature = "database")]
impl_string_column!(DayPattern);
