// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition dispatcher
//!
//! Resolves the session for a handle, ingests the image, runs the capability
//! and transcodes its result. Each call resolves exactly once.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::config::{OptionsPolicy, VisionConfig};
use super::detector::{DetectorFactory, DetectorOptions};
use super::errors::VisionError;
use super::ingest::ImageIngestor;
use super::registry::{Session, SessionRegistry};
use super::transcode::{transcode, GenericDocument};
use super::types::{CapabilityKind, Handle, ImageDescriptor};

/// Routes detect and close calls to recognition sessions
pub struct RecognitionDispatcher {
    config: VisionConfig,
    registry: SessionRegistry,
    ingestor: ImageIngestor,
    factory: Arc<dyn DetectorFactory>,
}

impl RecognitionDispatcher {
    pub fn new(config: VisionConfig, factory: Arc<dyn DetectorFactory>) -> Self {
        let ingestor = ImageIngestor::new(&config);
        Self {
            config,
            registry: SessionRegistry::new(),
            ingestor,
            factory,
        }
    }

    /// Use a custom ingestor (e.g. with a host-provided orientation reader)
    pub fn with_ingestor(mut self, ingestor: ImageIngestor) -> Self {
        self.ingestor = ingestor;
        self
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Run `kind` recognition on an image using the session bound to `handle`
    ///
    /// The session is created on first use with `options`; later calls reuse
    /// it. Failures before the capability is invoked (options, handle kind,
    /// image ingestion) are returned without touching the detector. A session
    /// closed while the image was being ingested fails the call with
    /// `HandleNotFound`; the handle stays free.
    pub async fn detect(
        &self,
        kind: CapabilityKind,
        handle: Handle,
        options: &Value,
        descriptor: &ImageDescriptor,
    ) -> Result<GenericDocument, VisionError> {
        let session = self.resolve(kind, handle, options).await?;
        let image = self.ingestor.ingest(descriptor)?;
        let start = Instant::now();

        let Some(_active) = session.enter().await else {
            debug!("Handle {} closed before {} detection started", handle, kind);
            return Err(VisionError::HandleNotFound(handle));
        };

        let detection = session
            .detector()
            .process(&image)
            .await
            .map_err(|failure| {
                warn!("{} capability failed for handle {}: {}", kind, handle, failure);
                VisionError::processing(kind, failure)
            })?;

        if detection.kind() != kind {
            return Err(VisionError::CapabilityProcessing {
                kind,
                message: format!(
                    "{} capability returned a {} result",
                    kind,
                    detection.kind()
                ),
            });
        }

        debug!(
            "{} detection for handle {} complete in {}ms",
            kind,
            handle,
            start.elapsed().as_millis()
        );
        Ok(transcode(&detection))
    }

    /// Release the session bound to `handle`
    ///
    /// # Errors
    ///
    /// `HandleKindMismatch` if the handle belongs to another capability; that
    /// session stays open.
    pub async fn close(&self, kind: CapabilityKind, handle: Handle) -> Result<(), VisionError> {
        debug!("Closing {} handle {}", kind, handle);
        self.registry.close_as(handle, kind).await
    }

    /// Release every session, e.g. when the host engine detaches
    pub async fn shutdown(&self) -> Vec<VisionError> {
        let failures = self.registry.drain().await;
        for failure in &failures {
            warn!("Release failed during shutdown: {}", failure);
        }
        info!("Recognition dispatcher shut down");
        failures
    }

    async fn resolve(
        &self,
        kind: CapabilityKind,
        handle: Handle,
        options: &Value,
    ) -> Result<Arc<Session>, VisionError> {
        let (session, created) = self
            .registry
            .get_or_create(handle, kind, || {
                let parsed = DetectorOptions::parse(kind, options)?;
                let detector = self.factory.create(&parsed)?;
                Ok((parsed, detector))
            })
            .await?;

        if !created && self.config.options_policy == OptionsPolicy::Reject {
            let requested = DetectorOptions::parse(kind, options)?;
            if &requested != session.options() {
                return Err(VisionError::OptionsMismatch(handle));
            }
        }

        Ok(session)
    }
}
