use serde::{Deserialize, Serialize};

/// One stage of the booking wizard. Ordered: services, then date/time, then
/// personal details.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ServiceSelection,
    DateTime,
    PersonalInfo,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::ServiceSelection, Step::DateTime, Step::PersonalInfo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::ServiceSelection => "service_selection",
            Step::DateTime => "date_time",
            Step::PersonalInfo => "personal_info",
        }
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::ServiceSelection => Some(Step::DateTime),
            Step::DateTime => Some(Step::PersonalInfo),
            Step::PersonalInfo => None,
        }
    }

    pub fn prev(self) -> Option<Step> {
        match self {
            Step::ServiceSelection => None,
            Step::DateTime => Some(Step::ServiceSelection),
            Step::PersonalInfo => Some(Step::DateTime),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_linear() {
        assert_eq!(Step::ServiceSelection.next(), Some(Step::DateTime));
        assert_eq!(Step::DateTime.next(), Some(Step::PersonalInfo));
        assert_eq!(Step::PersonalInfo.next(), None);
        assert_eq!(Step::PersonalInfo.prev(), Some(Step::DateTime));
        assert_eq!(Step::ServiceSelection.prev(), None);
    }
}
