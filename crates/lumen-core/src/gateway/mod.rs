//! Generative image service abstractions and the Gemini integration.
//!
//! Defines the gateway trait the orchestrator depends on, plus the concrete
//! HTTP client for Google's Generative Language API. The trait is the test
//! seam: orchestrator tests substitute an in-process fake, while the real
//! client is constructed once at startup and shared as `Arc<dyn ImageGateway>`.

use async_trait::async_trait;

use crate::core_types::{AspectRatio, EncodedImage};
use crate::errors::StudioError;

pub mod gemini;

pub use gemini::GeminiGateway;

#[async_trait]
pub trait ImageGateway: Send + Sync {
    /// Text-to-image synthesis at the requested aspect ratio.
    async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<EncodedImage, StudioError>;

    /// Applies `instruction` to `source`. Used both for user-driven edits
    /// and for the fixed-instruction upscale call; output geometry is
    /// derived from the source image by the service.
    async fn edit(
        &self,
        source: &EncodedImage,
        instruction: &str,
    ) -> Result<EncodedImage, StudioError>;
}
