//! Common error infrastructure for automation-core.
//!
//! Concern-specific errors (`StartError`, `ExecuteError`, ...) live next to the
//! code that raises them. This module holds the shared classification used to
//! decide how each one is surfaced: as a notice to the actor, as a forced stop,
//! or as a log line for operators.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the next attempt may succeed without any change
/// - **Validation**: the request was invalid and is rejected without retry
/// - **Internal**: scheduler bookkeeping disagrees with itself
/// - **Fatal**: a host reference vanished or a host call failed mid-action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or a broken host reference.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all automation-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error
/// - Classify severity by recoverability, not by impact
pub trait AutomationError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
