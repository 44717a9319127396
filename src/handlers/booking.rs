use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::BookingError;
use crate::models::{Field, ServiceId, TimeSlot};
use crate::services::submission::Confirmation;
use crate::state::Wizard;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    ToggleService { service: ServiceId },
    SelectDate { date: NaiveDate },
    ClearDate,
    SelectSlot { time: TimeSlot },
    Input { field: Field, value: String },
    Next,
    Prev,
    Submit,
}

pub fn handle(wizard: &mut Wizard, event: BookingEvent) -> String {
    match event {
        BookingEvent::ToggleService { service } => match wizard.toggle_service(&service) {
            Some(true) => format!("{service} selected"),
            Some(false) => format!("{service} deselected"),
            None => format!("{service} ignored"),
        },
        BookingEvent::SelectDate { date } => {
            if wizard.select_date(date) {
                format!("{date}: {} slots", wizard.slots().len())
            } else {
                format!("{date} is not bookable (earliest {})", wizard.earliest_date())
            }
        }
        BookingEvent::ClearDate => {
            wizard.clear_date();
            "date cleared".to_string()
        }
        BookingEvent::SelectSlot { time } => {
            if wizard.select_slot(time) {
                format!("{time} selected")
            } else {
                format!("{time} is not available")
            }
        }
        BookingEvent::Input { field, value } => {
            wizard.set_field(field, value);
            format!("{} updated", field.as_str())
        }
        BookingEvent::Next => match wizard.advance() {
            Ok(step) => format!("on {}", step.as_str()),
            Err(e) => e.to_string(),
        },
        BookingEvent::Prev => format!("on {}", wizard.retreat().as_str()),
        BookingEvent::Submit => match wizard.submit() {
            Ok(()) => "submitting".to_string(),
            Err(BookingError::SubmissionInFlight) => "already submitting".to_string(),
            Err(e) => e.to_string(),
        },
    }
}

pub fn describe_outcome(outcome: &Result<Confirmation, BookingError>) -> String {
    match outcome {
        Ok(confirmation) => format!("booked {}", confirmation.reference),
        Err(e) => e.to_string(),
    }
}
