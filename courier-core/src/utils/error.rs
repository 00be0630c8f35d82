#[cfg(test)]
#[path = "../../tests/unit/utils/error_test.rs"]
mod error_test;

use courier_kit::utils::GenericError;
use std::fmt::{Display, Formatter};

/// Specifies errors which can be raised while generating demand or routing carriers.
#[derive(Clone, Debug, PartialEq)]
pub enum CourierError {
    /// A required element (carrier set, network, vehicle types, demand group) is absent.
    MissingData {
        /// A name of the missing element.
        element: String,
    },

    /// A conservation law or another invariant is broken. Indicates a bug and aborts the run.
    InvariantViolation {
        /// A component which detected the violation.
        component: String,
        /// An input key, e.g. demand group id.
        key: String,
        /// Violation details.
        details: String,
    },

    /// An out-of-range value was supplied at value object construction.
    Validation {
        /// A name of the validated field.
        field: String,
        /// A rejected value.
        value: String,
        /// A reason of rejection.
        reason: String,
    },

    /// A requested per-feature attribute is absent.
    AttributeLookup {
        /// A provider (feature owner) tag.
        provider: String,
        /// A missing field name.
        field: String,
    },

    /// A single carrier routing task has failed.
    TaskFailure {
        /// A carrier id.
        carrier_id: String,
        /// A failure message.
        message: String,
    },
}

/// A result type with `CourierError`.
pub type CourierResult<T> = Result<T, CourierError>;

impl CourierError {
    /// Creates a missing data error.
    pub fn missing(element: impl Into<String>) -> Self {
        Self::MissingData { element: element.into() }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), value: value.to_string(), reason: reason.into() }
    }

    /// Creates an invariant violation error.
    pub fn invariant(component: impl Into<String>, key: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvariantViolation { component: component.into(), key: key.into(), details: details.into() }
    }

    /// Creates a task failure error.
    pub fn task(carrier_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskFailure { carrier_id: carrier_id.into(), message: message.into() }
    }
}

impl Display for CourierError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingData { element } => write!(f, "missing data: '{element}' is not defined"),
            Self::InvariantViolation { component, key, details } => {
                write!(f, "invariant violation in {component} for '{key}': {details}")
            }
            Self::Validation { field, value, reason } => write!(f, "invalid {field} '{value}': {reason}"),
            Self::AttributeLookup { provider, field } => {
                write!(f, "attribute '{field}' is not defined for provider '{provider}'")
            }
            Self::TaskFailure { carrier_id, message } => write!(f, "routing of carrier '{carrier_id}' failed: {message}"),
        }
    }
}

impl std::error::Error for CourierError {}

impl From<CourierError> for GenericError {
    fn from(value: CourierError) -> Self {
        value.to_string().into()
    }
}
