use std::fmt;

use serde::Serialize;

use crate::models::Field;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid catalog: {0}")]
    Catalog(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a wizard transition or submission did not happen. None of these are
/// fatal: the wizard stays where it was and the message is shown to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    MissingSelection(MissingSelection),

    #[error("{}", join_messages(.0))]
    InvalidFields(Vec<FieldError>),

    #[error("a booking is already being submitted")]
    SubmissionInFlight,

    #[error("Sorry, we couldn't confirm your booking: {0}")]
    SubmissionFailed(String),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSelection {
    Services,
    Date,
    Time,
}

impl fmt::Display for MissingSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingSelection::Services => write!(f, "Please select at least one service"),
            MissingSelection::Date => write!(f, "Please select a date"),
            MissingSelection::Time => write!(f, "Please select a time"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldProblem {
    Missing,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub problem: FieldProblem,
}

impl FieldError {
    pub fn missing(field: Field) -> Self {
        Self {
            field,
            problem: FieldProblem::Missing,
        }
    }

    pub fn invalid(field: Field) -> Self {
        Self {
            field,
            problem: FieldProblem::Invalid,
        }
    }

    pub fn message(&self) -> &'static str {
        match (self.field, self.problem) {
            // A one-letter name is reported the same way as an empty one.
            (Field::Name, _) => "Please enter your full name",
            (Field::Email, FieldProblem::Missing) => "Please enter your email address",
            (Field::Email, FieldProblem::Invalid) => "Please enter a valid email address",
            (Field::Phone, FieldProblem::Missing) => "Please enter your phone number",
            (Field::Phone, FieldProblem::Invalid) => "Please enter a valid phone number",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
