use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{BookingSummary, ContactInfo, Service, TimeSlot};
use crate::services::calendar;

/// Everything the visitor chose, frozen at the moment they pressed submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRequest {
    pub reference: Uuid,
    pub services: Vec<Service>,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub contact: ContactInfo,
    pub duration_minutes: u32,
    pub total_minor: u64,
}

impl BookingRequest {
    pub fn new(
        services: Vec<Service>,
        date: NaiveDate,
        slot: TimeSlot,
        contact: ContactInfo,
    ) -> Self {
        let summary = BookingSummary::derive(services.iter(), Some(date), Some(slot));
        Self {
            reference: Uuid::new_v4(),
            services,
            date,
            slot,
            contact,
            duration_minutes: summary.duration_minutes,
            total_minor: summary.total_minor,
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.slot.time())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub reference: Uuid,
    pub message: String,
    /// iCalendar text for the booked appointment.
    pub calendar: String,
}

/// Whatever finally accepts a booking once the submission delay has
/// elapsed.
pub trait BookingGateway {
    fn confirm(&mut self, request: &BookingRequest) -> anyhow::Result<Confirmation>;
}

pub const SUCCESS_MESSAGE: &str =
    "Thank you! Your appointment has been booked successfully. We look forward to seeing you!";

/// Accepts every booking. Stands in for a booking backend.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    pub business_name: String,
    pub confirmed: Vec<BookingRequest>,
}

impl SimulatedGateway {
    pub fn new(business_name: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            confirmed: Vec::new(),
        }
    }
}

impl BookingGateway for SimulatedGateway {
    fn confirm(&mut self, request: &BookingRequest) -> anyhow::Result<Confirmation> {
        let calendar = calendar::generate_ics(request, &self.business_name);
        self.confirmed.push(request.clone());
        Ok(Confirmation {
            reference: request.reference,
            message: SUCCESS_MESSAGE.to_string(),
            calendar,
        })
    }
}
