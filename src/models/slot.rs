use std::fmt;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

pub const SLOT_INTERVAL_MINUTES: i64 = 30;

/// A bookable half-hour start time, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn first() -> Self {
        Self(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default())
    }

    pub fn last() -> Self {
        Self(NaiveTime::from_hms_opt(19, 0, 0).unwrap_or_default())
    }

    pub fn parse(s: &str) -> Option<Self> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M").ok().map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TimeSlot::parse(&value).ok_or_else(|| format!("invalid time slot: {value}"))
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

/// The slots offered on any bookable day: every half hour from 09:00 up to
/// and including 19:00.
pub fn day_slots() -> impl Iterator<Item = TimeSlot> {
    let last = TimeSlot::last();
    std::iter::successors(Some(TimeSlot::first()), |slot| {
        let next = slot.0 + Duration::minutes(SLOT_INTERVAL_MINUTES);
        Some(TimeSlot(next))
    })
    .take_while(move |slot| *slot <= last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_has_21_slots() {
        let slots: Vec<String> = day_slots().map(|s| s.to_string()).collect();
        assert_eq!(slots.len(), 21);
        assert_eq!(slots.first().unwrap(), "09:00");
        assert_eq!(slots[1], "09:30");
        assert_eq!(slots.last().unwrap(), "19:00");
    }

    #[test]
    fn test_parse_slot() {
        assert_eq!(TimeSlot::parse("09:00"), Some(TimeSlot::first()));
        assert_eq!(TimeSlot::parse(" 19:00 "), Some(TimeSlot::last()));
        assert!(TimeSlot::parse("25:00").is_none());
        assert!(TimeSlot::parse("nine").is_none());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&TimeSlot::first()).unwrap();
        assert_eq!(json, "\"09:00\"");
        let back: TimeSlot = serde_json::from_str("\"14:30\"").unwrap();
        assert_eq!(back.to_string(), "14:30");
        assert!(serde_json::from_str::<TimeSlot>("\"later\"").is_err());
    }
}
