use chrono::{Duration, Utc};

use crate::services::submission::BookingRequest;

pub fn generate_ics(request: &BookingRequest, business_name: &str) -> String {
    let start = request.starts_at();
    let dtstart = start.format("%Y%m%dT%H%M%S").to_string();
    let dtend = (start + Duration::minutes(request.duration_minutes as i64))
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let dtstamp = Utc::now().naive_utc().format("%Y%m%dT%H%M%SZ").to_string();
    let uid = format!("{}@salonfront", request.reference);

    let summary = escape_text(&format!("Appointment at {business_name}"));
    let description = request
        .services
        .iter()
        .map(|s| escape_text(&s.name))
        .collect::<Vec<_>>()
        .join("\\, ");

    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Salonfront//Booking Form//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}

/// Escapes a TEXT property value (RFC 5545 section 3.3.11).
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
