//! The state machine behind the new transaction form.

use serde::Deserialize;
use time::Date;

use crate::transaction::{NewTransaction, TransactionType};

/// The raw values of the new transaction form.
///
/// The amount is kept as the text the user typed so that it can be shown
/// again unchanged if the submission fails.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct FormFields {
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// The unsigned amount as typed by the user.
    #[serde(default)]
    pub amount: String,
    /// Whether the amount was spent or earned.
    #[serde(rename = "type", default)]
    pub transaction_type: TransactionType,
}

/// The reasons a form submission can be refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    /// A previous submission has not finished yet.
    #[error("a submission is already in progress")]
    SubmissionInProgress,

    /// The description was empty.
    #[error("description is required")]
    MissingDescription,

    /// The amount was empty.
    #[error("amount is required")]
    MissingAmount,

    /// The amount was not a finite number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),
}

/// The phases of the new transaction form.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum FormPhase {
    /// The form shows its initial values.
    #[default]
    Idle,
    /// The form holds user input that has not been saved.
    Editing(FormFields),
    /// The form's values are being saved to the remote store.
    Submitting(FormFields),
}

/// Tracks the new transaction form across submissions.
///
/// Only one submission may be in flight at a time. A successful submission
/// resets the form, a failed one keeps the user's input so they can retry.
#[derive(Debug, Default)]
pub struct FormController {
    phase: FormPhase,
}

impl FormController {
    /// Create a controller for a pristine form.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase.
    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    /// The values the form should be rendered with.
    pub fn fields(&self) -> FormFields {
        match &self.phase {
            FormPhase::Idle => FormFields::default(),
            FormPhase::Editing(fields) | FormPhase::Submitting(fields) => fields.clone(),
        }
    }

    /// Start submitting `fields`, dated `today`.
    ///
    /// # Errors
    /// Returns [FormError::SubmissionInProgress] if a submission is already in
    /// flight, leaving it untouched. Otherwise returns a validation error and
    /// keeps `fields` for editing.
    pub fn begin_submit(
        &mut self,
        fields: FormFields,
        today: Date,
    ) -> Result<NewTransaction, FormError> {
        if matches!(self.phase, FormPhase::Submitting(_)) {
            return Err(FormError::SubmissionInProgress);
        }

        match parse_fields(&fields, today) {
            Ok(transaction) => {
                self.phase = FormPhase::Submitting(fields);
                Ok(transaction)
            }
            Err(error) => {
                self.phase = FormPhase::Editing(fields);
                Err(error)
            }
        }
    }

    /// Finish a submission that the remote store accepted.
    pub fn succeed(&mut self) {
        self.phase = FormPhase::Idle;
    }

    /// Finish a submission that the remote store rejected.
    pub fn fail(&mut self) {
        if let FormPhase::Submitting(fields) = std::mem::take(&mut self.phase) {
            self.phase = FormPhase::Editing(fields);
        }
    }
}

fn parse_fields(fields: &FormFields, today: Date) -> Result<NewTransaction, FormError> {
    if fields.description.trim().is_empty() {
        return Err(FormError::MissingDescription);
    }

    let amount = fields.amount.trim();

    if amount.is_empty() {
        return Err(FormError::MissingAmount);
    }

    let magnitude = amount
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| FormError::InvalidAmount(amount.to_owned()))?;

    Ok(NewTransaction::new(
        &fields.description,
        magnitude,
        fields.transaction_type,
        today,
    ))
}
