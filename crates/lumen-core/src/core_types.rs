//! Core type definitions shared across the image studio
//!
//! This module defines the data structures that flow between the
//! orchestrator, the gateway, and the history store. The serialized field
//! names of [`HistoryItem`] are part of the persisted-storage contract and
//! must not change without a migration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::StudioError;

/// Aspect ratios supported by the text-to-image model. Only meaningful in
/// generate mode; edit mode derives geometry from the source image.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "3:4")]
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Wide,
        AspectRatio::Tall,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Portrait => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1:1" => Ok(AspectRatio::Square),
            "16:9" => Ok(AspectRatio::Wide),
            "9:16" => Ok(AspectRatio::Tall),
            "4:3" => Ok(AspectRatio::Landscape),
            "3:4" => Ok(AspectRatio::Portrait),
            other => Err(StudioError::Validation(format!(
                "Unknown aspect ratio '{}'",
                other
            ))),
        }
    }
}

/// An image in its transport form: base64 payload plus declared media type.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Renders the image as a `data:` URI, the form stored in history.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Immutable description of one synthesis or edit attempt. Built per user
/// submission and discarded once the call resolves.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub source_image: Option<EncodedImage>,
    pub aspect_ratio: AspectRatio,
}

/// The outcome of a successful gateway call. Replaced wholesale on each new
/// generation or upscale, never partially mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub image: EncodedImage,
    pub upscaled: bool,
}

impl GenerationResult {
    pub fn new(image: EncodedImage) -> Self {
        Self {
            image,
            upscaled: false,
        }
    }
}

/// Which asynchronous flow, if any, currently holds the result resource.
/// A single tri-state enum makes the mutual exclusion an invariant of the
/// type rather than a convention about two independent booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyKind {
    #[default]
    Idle,
    Generating,
    Upscaling,
}

/// Process-local state for one running studio. Lives for the lifetime of
/// the process; owned exclusively by the orchestrator.
#[derive(Debug, Default)]
pub struct Session {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub source_image: Option<EncodedImage>,
    pub result: Option<GenerationResult>,
    pub busy: BusyKind,
    pub error: Option<String>,
}

/// A persisted record of one successful generation. Field names match the
/// stored JSON array exactly.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub id: String,
    pub prompt: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub timestamp: i64,
}
