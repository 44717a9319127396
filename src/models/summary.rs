use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{Service, TimeSlot};

pub const NO_SERVICES: &str = "None selected";
pub const NO_APPOINTMENT: &str = "Not selected";

/// Projection of the wizard's current selections. Always computed from the
/// selections, never kept between mutations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub services: Vec<String>,
    pub appointment: Option<NaiveDateTime>,
    pub duration_minutes: u32,
    pub total_minor: u64,
}

impl BookingSummary {
    pub fn derive<'a>(
        services: impl IntoIterator<Item = &'a Service>,
        date: Option<NaiveDate>,
        slot: Option<TimeSlot>,
    ) -> Self {
        let mut names = Vec::new();
        let mut duration_minutes = 0;
        let mut total_minor = 0;
        for service in services {
            names.push(service.name.clone());
            duration_minutes += service.duration_minutes();
            total_minor += service.price_minor;
        }

        let appointment = match (date, slot) {
            (Some(date), Some(slot)) => Some(date.and_time(slot.time())),
            _ => None,
        };

        Self {
            services: names,
            appointment,
            duration_minutes,
            total_minor,
        }
    }

    pub fn render(&self, currency: &str) -> SummaryText {
        let services = if self.services.is_empty() {
            NO_SERVICES.to_string()
        } else {
            self.services.join(", ")
        };
        let datetime = self
            .appointment
            .as_ref()
            .map(format_appointment)
            .unwrap_or_else(|| NO_APPOINTMENT.to_string());

        SummaryText {
            services,
            datetime,
            duration: format!("{} min", self.duration_minutes),
            total: format!("{currency}{}", self.total_minor),
        }
    }
}

/// The four text fields of the summary panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryText {
    pub services: String,
    pub datetime: String,
    pub duration: String,
    pub total: String,
}

/// `Tuesday, October 20, 2026 at 09:00`
pub fn format_appointment(dt: &NaiveDateTime) -> String {
    format!("{} at {}", dt.format("%A, %B %-d, %Y"), dt.format("%H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceId;

    fn service(id: &str, name: &str, price: u64) -> Service {
        Service {
            id: ServiceId::new(id),
            name: name.to_string(),
            price_minor: price,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = BookingSummary::derive(std::iter::empty(), None, None);
        let text = summary.render("R");
        assert_eq!(text.services, "None selected");
        assert_eq!(text.datetime, "Not selected");
        assert_eq!(text.duration, "0 min");
        assert_eq!(text.total, "R0");
    }

    #[test]
    fn test_totals_follow_selection() {
        let services = [service("cut", "Haircut", 150), service("colour", "Colour", 200)];
        let summary = BookingSummary::derive(services.iter(), None, None);
        assert_eq!(summary.duration_minutes, 120);
        assert_eq!(summary.total_minor, 350);

        let text = summary.render("R");
        assert_eq!(text.services, "Haircut, Colour");
        assert_eq!(text.total, "R350");
        assert_eq!(text.duration, "120 min");
    }

    #[test]
    fn test_datetime_needs_date_and_slot() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let slot = TimeSlot::parse("09:30").unwrap();

        let date_only = BookingSummary::derive(std::iter::empty(), Some(date), None);
        assert_eq!(date_only.render("R").datetime, "Not selected");

        let both = BookingSummary::derive(std::iter::empty(), Some(date), Some(slot));
        assert_eq!(both.render("R").datetime, "Tuesday, October 20, 2026 at 09:30");
    }
}
