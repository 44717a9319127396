use std::collections::HashSet;
use std::time::Duration;

use chrono::NaiveDate;

use crate::errors::{BookingError, MissingSelection};
use crate::models::{
    day_slots, BookingSummary, ContactInfo, Field, Service, ServiceCatalog, ServiceId, Step,
    TimeSlot,
};
use crate::services::submission::{BookingGateway, BookingRequest, Confirmation};
use crate::services::timer::{TimerId, TimerQueue};
use crate::services::validation::validate_contact;
use crate::ui::{BookingView, SubmitControl};

#[derive(Debug, Clone)]
pub struct WizardConfig {
    pub submit_latency: Duration,
    pub currency: String,
    pub submit_label: String,
    pub busy_label: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            submit_latency: Duration::from_millis(2000),
            currency: "R".to_string(),
            submit_label: "Book Appointment".to_string(),
            busy_label: "Booking...".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardTimer {
    CompleteSubmission,
}

#[derive(Debug)]
enum Submission {
    Idle,
    Submitting { request: BookingRequest, timer: TimerId },
}

/// The three-step booking form.
///
/// Owns every selection the visitor has made and pushes the resulting
/// state to the page after each event. The summary panel is re-derived
/// from the selections on every change that can affect it.
pub struct BookingWizard<V, G> {
    config: WizardConfig,
    catalog: ServiceCatalog,
    today: NaiveDate,
    step: Step,
    selected: HashSet<ServiceId>,
    date: Option<NaiveDate>,
    slots: Vec<TimeSlot>,
    slot: Option<TimeSlot>,
    contact: ContactInfo,
    submission: Submission,
    timers: TimerQueue<WizardTimer>,
    view: V,
    gateway: G,
}

impl<V: BookingView, G: BookingGateway> BookingWizard<V, G> {
    pub fn new(
        catalog: ServiceCatalog,
        config: WizardConfig,
        today: NaiveDate,
        view: V,
        gateway: G,
    ) -> Self {
        let mut wizard = Self {
            config,
            catalog,
            today,
            step: Step::ServiceSelection,
            selected: HashSet::new(),
            date: None,
            slots: Vec::new(),
            slot: None,
            contact: ContactInfo::default(),
            submission: Submission::Idle,
            timers: TimerQueue::new(),
            view,
            gateway,
        };
        let earliest = wizard.earliest_date();
        wizard.view.set_min_date(earliest);
        wizard.view.show_step(Step::ServiceSelection);
        wizard.view.render_time_slots(&[]);
        wizard.release_submit_control();
        wizard.refresh_summary();
        wizard
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Same-day bookings are not taken.
    pub fn earliest_date(&self) -> NaiveDate {
        self.today.succ_opt().unwrap_or(self.today)
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Selected services in catalog order.
    pub fn selected_services(&self) -> Vec<&Service> {
        self.catalog
            .iter()
            .filter(|s| self.selected.contains(&s.id))
            .collect()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn selected_slot(&self) -> Option<TimeSlot> {
        self.slot
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.submission, Submission::Submitting { .. })
    }

    pub fn summary(&self) -> BookingSummary {
        BookingSummary::derive(self.selected_services(), self.date, self.slot)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// Flips a service's checkbox. Returns the new checked state, or `None`
    /// when the event was ignored.
    pub fn toggle_service(&mut self, id: &ServiceId) -> Option<bool> {
        if self.input_locked("toggle_service") {
            return None;
        }
        if !self.catalog.contains(id) {
            tracing::warn!(service = %id, "ignoring toggle of unknown service");
            return None;
        }

        let checked = if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        };
        tracing::debug!(service = %id, checked, "service toggled");

        self.view.mark_service(id, checked);
        self.refresh_summary();
        Some(checked)
    }

    /// Picks the appointment date and lays out that day's slots. Dates
    /// before the earliest bookable day are refused without side effects.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        if self.input_locked("select_date") {
            return false;
        }
        if date <= self.today {
            tracing::debug!(%date, earliest = %self.earliest_date(), "date not bookable");
            return false;
        }

        self.date = Some(date);
        self.slots = day_slots().collect();
        self.slot = None;
        tracing::debug!(%date, slots = self.slots.len(), "date selected");

        self.view.set_date_value(Some(date));
        self.view.render_time_slots(&self.slots);
        self.view.mark_selected_slot(None);
        self.refresh_summary();
        true
    }

    pub fn clear_date(&mut self) {
        if self.input_locked("clear_date") {
            return;
        }
        self.date = None;
        self.slots.clear();
        self.slot = None;

        self.view.set_date_value(None);
        self.view.render_time_slots(&[]);
        self.view.mark_selected_slot(None);
        self.refresh_summary();
    }

    /// Marks `slot` as the only selected time. Only slots from the current
    /// date's sequence are accepted.
    pub fn select_slot(&mut self, slot: TimeSlot) -> bool {
        if self.input_locked("select_slot") {
            return false;
        }
        if !self.slots.contains(&slot) {
            tracing::debug!(%slot, "slot not offered");
            return false;
        }

        self.slot = Some(slot);
        self.view.mark_selected_slot(Some(slot));
        self.refresh_summary();
        true
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if self.input_locked("set_field") {
            return;
        }
        self.contact.set(field, value);
    }

    /// Moves to the next step if the active one is complete. On failure the
    /// step is left unchanged and the problem is shown to the visitor.
    pub fn advance(&mut self) -> Result<Step, BookingError> {
        if self.input_locked("advance") {
            return Ok(self.step);
        }

        let from = self.step;
        if from == Step::PersonalInfo {
            self.view.clear_field_errors();
        }
        if let Err(err) = self.validate_step(from) {
            tracing::info!(step = from.as_str(), error = %err, "step incomplete");
            self.report(&err);
            return Err(err);
        }

        if let Some(next) = from.next() {
            self.step = next;
            self.view.show_step(next);
            tracing::info!(from = from.as_str(), to = next.as_str(), "advanced");
        }
        self.refresh_summary();
        Ok(self.step)
    }

    /// Goes back one step. Never validates.
    pub fn retreat(&mut self) -> Step {
        if self.input_locked("retreat") {
            return self.step;
        }
        if let Some(prev) = self.step.prev() {
            tracing::info!(from = self.step.as_str(), to = prev.as_str(), "went back");
            self.step = prev;
            self.view.show_step(prev);
        }
        self.step
    }

    pub fn validate_step(&self, step: Step) -> Result<(), BookingError> {
        match step {
            Step::ServiceSelection => {
                if self.selected.is_empty() {
                    return Err(BookingError::MissingSelection(MissingSelection::Services));
                }
            }
            Step::DateTime => {
                if self.date.is_none() {
                    return Err(BookingError::MissingSelection(MissingSelection::Date));
                }
                if self.slot.is_none() {
                    return Err(BookingError::MissingSelection(MissingSelection::Time));
                }
            }
            Step::PersonalInfo => {
                validate_contact(&self.contact).map_err(BookingError::InvalidFields)?;
            }
        }
        Ok(())
    }

    /// Validates the whole booking and hands it to the gateway once the
    /// submission delay has elapsed. Form inputs stay disabled until then.
    pub fn submit(&mut self) -> Result<(), BookingError> {
        if self.is_submitting() {
            tracing::debug!("submission already in flight");
            return Err(BookingError::SubmissionInFlight);
        }

        self.view.clear_field_errors();
        let validated = Step::ALL
            .iter()
            .try_for_each(|step| self.validate_step(*step));
        if let Err(err) = validated {
            tracing::info!(error = %err, "submission rejected");
            self.report(&err);
            return Err(err);
        }

        let (Some(date), Some(slot)) = (self.date, self.slot) else {
            return Err(BookingError::MissingSelection(MissingSelection::Date));
        };
        let services = self.selected_services().into_iter().cloned().collect();
        let request = BookingRequest::new(services, date, slot, self.contact.clone());

        let timer = self
            .timers
            .schedule(self.config.submit_latency, WizardTimer::CompleteSubmission);
        tracing::info!(
            reference = %request.reference,
            starts_at = %request.starts_at(),
            total = request.total_minor,
            "submitting booking"
        );
        self.submission = Submission::Submitting { request, timer };

        self.view.set_inputs_disabled(true);
        self.view.set_submit_control(&SubmitControl {
            enabled: false,
            busy: true,
            label: self.config.busy_label.clone(),
        });
        Ok(())
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Runs every timer due by `now`. Returns the outcome of a submission
    /// that completed on the way.
    pub fn advance_to(&mut self, now: Duration) -> Option<Result<Confirmation, BookingError>> {
        let mut outcome = None;
        while let Some((id, event)) = self.timers.pop_due(now) {
            match event {
                WizardTimer::CompleteSubmission => {
                    if let Some(result) = self.complete_submission(id) {
                        outcome = Some(result);
                    }
                }
            }
        }
        outcome
    }

    pub fn advance_by(&mut self, elapsed: Duration) -> Option<Result<Confirmation, BookingError>> {
        let now = self.timers.now() + elapsed;
        self.advance_to(now)
    }

    fn complete_submission(
        &mut self,
        fired: TimerId,
    ) -> Option<Result<Confirmation, BookingError>> {
        let request = match std::mem::replace(&mut self.submission, Submission::Idle) {
            Submission::Submitting { request, timer } if timer == fired => request,
            other => {
                self.submission = other;
                return None;
            }
        };

        match self.gateway.confirm(&request) {
            Ok(confirmation) => {
                tracing::info!(reference = %confirmation.reference, "booking confirmed");
                self.view.notify(&confirmation.message);
                self.reset();
                Some(Ok(confirmation))
            }
            Err(e) => {
                tracing::warn!(reference = %request.reference, error = %e, "booking failed");
                self.view.set_inputs_disabled(false);
                self.release_submit_control();
                let err = BookingError::SubmissionFailed(e.to_string());
                self.report(&err);
                Some(Err(err))
            }
        }
    }

    fn reset(&mut self) {
        self.step = Step::ServiceSelection;
        self.selected.clear();
        self.date = None;
        self.slots.clear();
        self.slot = None;
        self.contact = ContactInfo::default();

        self.view.reset_form();
        self.view.set_date_value(None);
        self.view.render_time_slots(&[]);
        self.view.mark_selected_slot(None);
        self.view.clear_field_errors();
        self.view.show_step(Step::ServiceSelection);
        self.view.set_inputs_disabled(false);
        self.release_submit_control();
        self.refresh_summary();
    }

    fn report(&mut self, err: &BookingError) {
        match err {
            BookingError::InvalidFields(errors) => {
                for error in errors {
                    self.view.show_field_error(error.field, error.message());
                }
            }
            BookingError::SubmissionInFlight => {}
            BookingError::MissingSelection(_) | BookingError::SubmissionFailed(_) => {
                self.view.notify(&err.to_string());
            }
        }
    }

    fn refresh_summary(&mut self) {
        let text = self.summary().render(&self.config.currency);
        self.view.render_summary(&text);
    }

    fn release_submit_control(&mut self) {
        self.view.set_submit_control(&SubmitControl {
            enabled: true,
            busy: false,
            label: self.config.submit_label.clone(),
        });
    }

    fn input_locked(&self, action: &str) -> bool {
        let locked = self.is_submitting();
        if locked {
            tracing::debug!(action, "input ignored while submitting");
        }
        locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::submission::SimulatedGateway;
    use crate::ui::Document;

    struct FailingGateway;

    impl BookingGateway for FailingGateway {
        fn confirm(&mut self, _request: &BookingRequest) -> anyhow::Result<Confirmation> {
            Err(anyhow::anyhow!("calendar unavailable"))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::from_json(
            r#"[
                {"id":"cut","name":"Haircut","price":150},
                {"id":"colour","name":"Colour","price":200},
                {"id":"nails","name":"Manicure","price":120}
            ]"#,
        )
        .unwrap()
    }

    fn wizard() -> BookingWizard<Document, SimulatedGateway> {
        BookingWizard::new(
            catalog(),
            WizardConfig::default(),
            today(),
            Document::new(),
            SimulatedGateway::new("Test Salon"),
        )
    }

    fn id(s: &str) -> ServiceId {
        ServiceId::new(s)
    }

    fn slot(s: &str) -> TimeSlot {
        TimeSlot::parse(s).unwrap()
    }

    fn fill_contact<G: BookingGateway>(w: &mut BookingWizard<Document, G>) {
        w.set_field(Field::Name, "Thandi");
        w.set_field(Field::Email, "thandi@example.com");
        w.set_field(Field::Phone, "082 123 4567");
    }

    fn to_personal_info<G: BookingGateway>(w: &mut BookingWizard<Document, G>) {
        w.toggle_service(&id("cut"));
        w.advance().unwrap();
        w.select_date(today().succ_opt().unwrap());
        w.select_slot(slot("10:00"));
        w.advance().unwrap();
    }

    #[test]
    fn test_initial_state() {
        let w = wizard();
        assert_eq!(w.step(), Step::ServiceSelection);
        let doc = w.view();
        assert_eq!(doc.active_step(), Some(Step::ServiceSelection));
        assert_eq!(doc.min_date, NaiveDate::from_ymd_opt(2026, 10, 20));
        let summary = doc.summary.as_ref().unwrap();
        assert_eq!(summary.services, "None selected");
        assert_eq!(summary.total, "R0");
        assert_eq!(doc.submit.label, "Book Appointment");
        assert!(doc.submit.enabled);
    }

    #[test]
    fn test_advance_without_services_is_rejected() {
        let mut w = wizard();
        let err = w.advance().unwrap_err();
        assert_eq!(err, BookingError::MissingSelection(MissingSelection::Services));
        assert_eq!(w.step(), Step::ServiceSelection);
        assert_eq!(w.view().last_notice(), Some("Please select at least one service"));
    }

    #[test]
    fn test_toggle_updates_summary_in_catalog_order() {
        let mut w = wizard();
        assert_eq!(w.toggle_service(&id("colour")), Some(true));
        assert_eq!(w.toggle_service(&id("cut")), Some(true));
        let summary = w.view().summary.clone().unwrap();
        assert_eq!(summary.services, "Haircut, Colour");
        assert_eq!(summary.total, "R350");
        assert_eq!(summary.duration, "120 min");

        assert_eq!(w.toggle_service(&id("cut")), Some(false));
        let summary = w.view().summary.clone().unwrap();
        assert_eq!(summary.services, "Colour");
        assert_eq!(summary.duration, "60 min");
        assert!(!w.view().checked_services.contains(&id("cut")));
    }

    #[test]
    fn test_unknown_service_ignored() {
        let mut w = wizard();
        assert_eq!(w.toggle_service(&id("massage")), None);
        assert!(w.selected_services().is_empty());
    }

    #[test]
    fn test_today_and_past_dates_refused() {
        let mut w = wizard();
        assert!(!w.select_date(today()));
        assert!(!w.select_date(today().pred_opt().unwrap()));
        assert!(w.date().is_none());
        assert!(w.slots().is_empty());
        assert!(w.select_date(today().succ_opt().unwrap()));
        assert_eq!(w.slots().len(), 21);
    }

    #[test]
    fn test_new_date_clears_slot() {
        let mut w = wizard();
        let tomorrow = today().succ_opt().unwrap();
        w.select_date(tomorrow);
        assert!(w.select_slot(slot("09:30")));
        assert!(w.view().summary.as_ref().unwrap().datetime.ends_with("09:30"));

        w.select_date(tomorrow.succ_opt().unwrap());
        assert!(w.selected_slot().is_none());
        assert!(w.view().selected_slot.is_none());
        assert_eq!(w.view().summary.as_ref().unwrap().datetime, "Not selected");
    }

    #[test]
    fn test_slot_selection_is_exclusive() {
        let mut w = wizard();
        w.select_date(today().succ_opt().unwrap());
        let slots = w.slots().to_vec();
        for a in &slots {
            for b in slots.iter().filter(|b| *b != a) {
                w.select_slot(*a);
                w.select_slot(*b);
                assert_eq!(w.selected_slot(), Some(*b));
                assert_eq!(w.view().selected_slot, Some(b.to_string()));
            }
        }
    }

    #[test]
    fn test_clearing_date_drops_slot() {
        let mut w = wizard();
        w.toggle_service(&id("cut"));
        w.advance().unwrap();
        w.select_date(today().succ_opt().unwrap());
        w.select_slot(slot("13:00"));
        assert!(w.view().selected_slot.is_some());

        w.clear_date();
        assert!(w.date().is_none());
        assert!(w.selected_slot().is_none());
        assert!(w.slots().is_empty());
        assert!(w.view().selected_slot.is_none());
        assert!(w.view().date_value.is_none());
        assert_eq!(w.view().summary.as_ref().unwrap().datetime, "Not selected");

        let err = w.advance().unwrap_err();
        assert_eq!(err, BookingError::MissingSelection(MissingSelection::Date));
        assert_eq!(w.step(), Step::DateTime);
    }

    #[test]
    fn test_slot_requires_date() {
        let mut w = wizard();
        assert!(!w.select_slot(slot("09:00")));
        w.select_date(today().succ_opt().unwrap());
        assert!(!w.select_slot(slot("19:30")));
        assert!(!w.select_slot(slot("08:30")));
    }

    #[test]
    fn test_missing_date_reported_before_missing_time() {
        let mut w = wizard();
        w.toggle_service(&id("cut"));
        w.advance().unwrap();

        let err = w.advance().unwrap_err();
        assert_eq!(err, BookingError::MissingSelection(MissingSelection::Date));
        assert_eq!(w.view().last_notice(), Some("Please select a date"));

        w.select_date(today().succ_opt().unwrap());
        let err = w.advance().unwrap_err();
        assert_eq!(err, BookingError::MissingSelection(MissingSelection::Time));
        assert_eq!(w.step(), Step::DateTime);
    }

    #[test]
    fn test_retreat_is_unconditional() {
        let mut w = wizard();
        to_personal_info(&mut w);
        assert_eq!(w.step(), Step::PersonalInfo);
        w.toggle_service(&id("cut"));
        assert_eq!(w.retreat(), Step::DateTime);
        assert_eq!(w.retreat(), Step::ServiceSelection);
        assert_eq!(w.retreat(), Step::ServiceSelection);
        assert_eq!(w.view().active_step(), Some(Step::ServiceSelection));
    }

    #[test]
    fn test_personal_info_errors_shown_together() {
        let mut w = wizard();
        to_personal_info(&mut w);
        w.set_field(Field::Name, "T");
        w.set_field(Field::Email, "thandi@example");

        let err = w.submit().unwrap_err();
        match err {
            BookingError::InvalidFields(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
        let doc = w.view();
        assert_eq!(doc.visible_error(Field::Name), Some("Please enter your full name"));
        assert_eq!(doc.visible_error(Field::Email), Some("Please enter a valid email address"));
        assert_eq!(doc.visible_error(Field::Phone), Some("Please enter your phone number"));
        assert!(!w.is_submitting());
    }

    #[test]
    fn test_errors_cleared_on_revalidation() {
        let mut w = wizard();
        to_personal_info(&mut w);
        w.set_field(Field::Name, "Thandi");
        w.set_field(Field::Email, "thandi@example.com");
        let _ = w.submit();
        assert!(w.view().visible_error(Field::Phone).is_some());
        assert!(w.view().visible_error(Field::Name).is_none());

        w.set_field(Field::Phone, "+27821234567");
        w.submit().unwrap();
        assert!(w.view().visible_error(Field::Phone).is_none());
    }

    #[test]
    fn test_submit_disables_inputs_until_latency_elapses() {
        let mut w = wizard();
        to_personal_info(&mut w);
        fill_contact(&mut w);
        w.submit().unwrap();

        assert!(w.is_submitting());
        assert!(w.view().inputs_disabled);
        assert!(!w.view().submit.enabled);
        assert_eq!(w.view().submit.label, "Booking...");

        assert_eq!(w.submit().unwrap_err(), BookingError::SubmissionInFlight);
        assert_eq!(w.toggle_service(&id("colour")), None);
        assert_eq!(w.retreat(), Step::PersonalInfo);

        assert!(w.advance_by(Duration::from_millis(1999)).is_none());
        assert!(w.is_submitting());

        let confirmation = w.advance_by(Duration::from_millis(1)).unwrap().unwrap();
        assert_eq!(w.gateway().confirmed.len(), 1);
        assert_eq!(w.gateway().confirmed[0].reference, confirmation.reference);
        assert!(!w.is_submitting());
        assert_eq!(w.step(), Step::ServiceSelection);
        assert!(w.contact().name.is_empty());
        assert!(w.view().submit.enabled);
        assert_eq!(w.view().submit.label, "Book Appointment");
    }

    #[test]
    fn test_gateway_failure_keeps_data() {
        let mut w = BookingWizard::new(
            catalog(),
            WizardConfig::default(),
            today(),
            Document::new(),
            FailingGateway,
        );
        to_personal_info(&mut w);
        fill_contact(&mut w);
        w.submit().unwrap();

        let outcome = w.advance_by(Duration::from_secs(2)).unwrap();
        assert!(matches!(outcome, Err(BookingError::SubmissionFailed(_))));
        assert_eq!(w.step(), Step::PersonalInfo);
        assert_eq!(w.contact().name, "Thandi");
        assert_eq!(w.selected_services().len(), 1);
        assert!(w.view().submit.enabled);
        assert!(!w.view().inputs_disabled);
        assert_eq!(
            w.view().last_notice(),
            Some("Sorry, we couldn't confirm your booking: calendar unavailable")
        );
    }
}
