//! Quote request form input and its validation.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use threadline_core::{InquiryStatus, UserId};

use crate::models::NewInquiry;

/// Raw form input for a quote request, as typed by the user.
///
/// Kept as strings so a rejected submission can be shown back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InquiryDraft {
    pub description: String,
    pub quantity: String,
    /// `YYYY-MM-DD`.
    pub deadline: String,
    pub fabrics: String,
}

/// Form fields that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Description,
    Quantity,
    Deadline,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Quantity => "quantity",
            Self::Deadline => "deadline",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-scoped problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every problem found in one submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInquiry {
    pub description: String,
    pub quantity: u32,
    pub deadline: NaiveDate,
    pub fabrics: Option<String>,
}

impl ValidInquiry {
    /// The create body: status forced to pending, stamped with `submitted_at`.
    #[must_use]
    pub fn into_new_inquiry(self, user_id: UserId, submitted_at: DateTime<Utc>) -> NewInquiry {
        NewInquiry {
            user_id,
            description: self.description,
            quantity: self.quantity,
            deadline: self.deadline,
            fabrics: self.fabrics,
            status: InquiryStatus::Pending,
            created_at: submitted_at,
        }
    }
}

impl InquiryDraft {
    /// Check every field against `today`, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` naming each field that failed.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidInquiry, ValidationErrors> {
        let mut errors = Vec::new();

        let description = self.description.trim();
        if description.is_empty() {
            errors.push(FieldError::new(Field::Description, "is required"));
        }

        let quantity = match self.quantity.trim().parse::<u32>() {
            Ok(q) if q > 0 => Some(q),
            _ => {
                errors.push(FieldError::new(
                    Field::Quantity,
                    "must be a positive whole number",
                ));
                None
            }
        };

        let raw_deadline = self.deadline.trim();
        let deadline = if raw_deadline.is_empty() {
            errors.push(FieldError::new(Field::Deadline, "is required"));
            None
        } else {
            match NaiveDate::parse_from_str(raw_deadline, "%Y-%m-%d") {
                Ok(date) if date < today => {
                    errors.push(FieldError::new(Field::Deadline, "cannot be in the past"));
                    None
                }
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(FieldError::new(
                        Field::Deadline,
                        "must be a date (YYYY-MM-DD)",
                    ));
                    None
                }
            }
        };

        match (quantity, deadline) {
            (Some(quantity), Some(deadline)) if errors.is_empty() => {
                let fabrics = self.fabrics.trim();
                Ok(ValidInquiry {
                    description: description.to_owned(),
                    quantity,
                    deadline,
                    fabrics: (!fabrics.is_empty()).then(|| fabrics.to_owned()),
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }
}
