//! Maps raw failures into the small user-facing error taxonomy.
//!
//! There is deliberately no timeout- or rate-limit-specific category: a
//! missing or invalid credential gets a fixed operator-facing message, and
//! every other failure collapses into one of two context-tagged buckets.

use crate::errors::StudioError;

/// Where the failure happened, used to pick the message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorContext {
    #[default]
    General,
    Upscaling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    General,
    Upscale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
}

const CONFIGURATION_MESSAGE: &str = "Configuration Error: The Gemini API Key is missing or \
     invalid. Please ensure it is configured correctly in your environment.";

/// Classifies a raw error for display. Credential problems win over the
/// calling context; everything else is prefixed per context and falls back
/// to a retry hint when the raw error carries no message.
pub fn classify(error: &StudioError, context: ErrorContext) -> ClassifiedError {
    let raw = error.raw_message();

    if raw.to_lowercase().contains("api key") {
        return ClassifiedError {
            kind: ErrorKind::Configuration,
            message: CONFIGURATION_MESSAGE.to_string(),
        };
    }

    let (kind, prefix) = match context {
        ErrorContext::General => (ErrorKind::General, "An error occurred: "),
        ErrorContext::Upscaling => (ErrorKind::Upscale, "An error occurred during upscaling: "),
    };

    let detail = if raw.is_empty() {
        "Please try again."
    } else {
        raw
    };

    ClassifiedError {
        kind,
        message: format!("{}{}", prefix, detail),
    }
}
