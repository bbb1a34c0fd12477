//! Request orchestration and session lifecycle management.
//!
//! Provides the `RequestOrchestrator` responsible for validating input,
//! selecting the generation mode, dispatching gateway calls, maintaining
//! session state, and recording successful generations in history. Each
//! flow is a single suspendable chain (validate, call, encode, store) and
//! methods take `&mut self`, so only one flow can run through an
//! orchestrator at a time; the busy tri-state exists as observable state
//! for the presentation layer, not as a lock.

use std::sync::Arc;

use chrono::Utc;

use crate::classifier::{classify, ErrorContext};
use crate::codec;
use crate::core_types::{
    AspectRatio, BusyKind, EncodedImage, GenerationRequest, GenerationResult, HistoryItem, Session,
};
use crate::errors::StudioError;
use crate::gateway::ImageGateway;
use crate::history::HistoryStore;

/// Fixed instruction for the self-referential upscale edit.
pub const UPSCALE_INSTRUCTION: &str = "Upscale this image, enhancing details and sharpening \
     the result to make it higher resolution.";

pub struct RequestOrchestrator {
    gateway: Arc<dyn ImageGateway>,
    history: HistoryStore,
    session: Session,
    thumbnail_max_dimension: u32,
}

impl RequestOrchestrator {
    pub fn new(gateway: Arc<dyn ImageGateway>, history: HistoryStore) -> Self {
        Self {
            gateway,
            history,
            session: Session::default(),
            thumbnail_max_dimension: codec::THUMBNAIL_MAX_DIMENSION,
        }
    }

    pub fn with_thumbnail_dimension(mut self, max_dimension: u32) -> Self {
        self.thumbnail_max_dimension = max_dimension;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &[HistoryItem] {
        self.history.items()
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        self.session.aspect_ratio = aspect_ratio;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Runs one synthesis or edit flow. Mode selection is structural: a
    /// source image selects edit mode, its absence selects generate mode
    /// (only generate mode sends the aspect ratio). A success replaces the
    /// session result and appends exactly one history item; a failure
    /// stores a classified message and leaves no stale result behind.
    pub async fn submit_generation(
        &mut self,
        prompt: &str,
        source_image: Option<EncodedImage>,
        aspect_ratio: AspectRatio,
    ) -> Result<(), StudioError> {
        if prompt.is_empty() && source_image.is_none() {
            return Err(self.reject("Please provide a prompt or an image to edit."));
        }
        if source_image.is_some() && prompt.is_empty() {
            return Err(self.reject("Please provide a prompt to describe your desired edits."));
        }

        let request = GenerationRequest {
            prompt: prompt.to_string(),
            source_image,
            aspect_ratio,
        };

        self.session.prompt = request.prompt.clone();
        self.session.aspect_ratio = request.aspect_ratio;
        self.session.source_image = request.source_image.clone();
        self.session.busy = BusyKind::Generating;
        self.session.error = None;
        self.session.result = None;

        let outcome = self.run_generation(&request).await;
        self.session.busy = BusyKind::Idle;

        if let Err(err) = outcome {
            let classified = classify(&err, ErrorContext::General);
            log::error!("Generation failed: {}", err);
            self.session.error = Some(classified.message);
            return Err(err);
        }
        Ok(())
    }

    async fn run_generation(&mut self, request: &GenerationRequest) -> Result<(), StudioError> {
        let image = match &request.source_image {
            Some(source) => self.gateway.edit(source, &request.prompt).await?,
            None => {
                self.gateway
                    .generate(&request.prompt, request.aspect_ratio)
                    .await?
            }
        };

        let thumbnail = codec::thumbnail(&image, self.thumbnail_max_dimension);
        self.session.result = Some(GenerationResult::new(image));

        // History gains an entry after any successful generation, edit or
        // text-to-image alike, never after an upscale.
        let now = Utc::now().timestamp_millis();
        self.history.insert(HistoryItem {
            id: now.to_string(),
            prompt: request.prompt.clone(),
            image_url: thumbnail?,
            timestamp: now,
        });
        Ok(())
    }

    /// Upscales the current result in place via a fixed-instruction edit of
    /// its own bytes. A silent no-op when there is nothing to upscale; on
    /// failure the pre-upscale result stays displayed.
    pub async fn submit_upscale(&mut self) -> Result<(), StudioError> {
        let current = match &self.session.result {
            Some(result) => result.image.clone(),
            None => return Ok(()),
        };

        self.session.busy = BusyKind::Upscaling;
        self.session.error = None;

        let outcome = self.gateway.edit(&current, UPSCALE_INSTRUCTION).await;
        self.session.busy = BusyKind::Idle;

        match outcome {
            Ok(image) => {
                self.session.result = Some(GenerationResult {
                    image,
                    upscaled: true,
                });
                Ok(())
            }
            Err(err) => {
                let classified = classify(&err, ErrorContext::Upscaling);
                log::error!("Upscale failed: {}", err);
                self.session.error = Some(classified.message);
                Err(err)
            }
        }
    }

    /// Re-runs a past prompt as a fresh text-to-image generation, using the
    /// session's current aspect ratio (ratios are not persisted per item).
    pub async fn regenerate_from_history(
        &mut self,
        item: &HistoryItem,
    ) -> Result<(), StudioError> {
        let prompt = item.prompt.clone();
        self.session.prompt = prompt.clone();
        self.session.source_image = None;
        let aspect_ratio = self.session.aspect_ratio;
        self.submit_generation(&prompt, None, aspect_ratio).await
    }

    fn reject(&mut self, message: &str) -> StudioError {
        self.session.error = Some(message.to_string());
        StudioError::Validation(message.to_string())
    }
}
