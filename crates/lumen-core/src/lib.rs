//! Core library for a generative image studio.
//!
//! This crate implements the request-orchestration logic behind a
//! prompt-driven image tool: synthesizing or editing an image through a
//! remote generative service, chaining an upscale transform onto an
//! existing result, and keeping a small recency-bounded history of past
//! prompts for one-click regeneration.
//!
//! # Architecture Overview
//!
//! - **Request orchestration**: session state machine driving validation,
//!   mode selection, gateway dispatch, and history recording
//! - **Gateway integration**: provider-agnostic image service interface
//!   with a native Gemini/Imagen client
//! - **Image codec**: transport encoding and bounded thumbnail production
//! - **History**: capacity-bounded, newest-first persisted generation log
//! - **Error classification**: raw failures mapped to user-facing messages
//! - **Configuration**: YAML configuration with environment-aware defaults

pub mod classifier;
pub mod codec;
pub mod config;
pub mod core_types;
pub mod errors;
pub mod export;
pub mod gateway;
pub mod history;
pub mod orchestrator;

pub use classifier::{classify, ClassifiedError, ErrorContext, ErrorKind};
pub use config::{GatewayConfig, StudioConfig};
pub use core_types::{
    AspectRatio, BusyKind, EncodedImage, GenerationRequest, GenerationResult, HistoryItem, Session,
};
pub use errors::StudioError;
pub use gateway::{gemini::create_gateway, GeminiGateway, ImageGateway};
pub use history::HistoryStore;
pub use orchestrator::RequestOrchestrator;

#[cfg(test)]
pub mod test_utils;
