// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition Session Registry
//!
//! Maps caller-supplied handles to live detector instances. A handle is bound
//! to one capability kind for its whole lifetime; closing it releases the
//! detector and frees the handle for reuse.
//!
//! Each session carries a read/write gate. Detections hold the read side
//! while the capability runs, so `close` (which takes the write side) waits
//! for in-flight work before releasing the detector.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};

use super::detector::{Detector, DetectorOptions};
use super::errors::VisionError;
use super::types::{CapabilityKind, Handle};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Closed,
}

/// A handle bound to a detector instance
pub struct Session {
    handle: Handle,
    kind: CapabilityKind,
    options: DetectorOptions,
    detector: Arc<dyn Detector>,
    state: RwLock<SessionState>,
}

impl Session {
    fn new(
        handle: Handle,
        kind: CapabilityKind,
        options: DetectorOptions,
        detector: Arc<dyn Detector>,
    ) -> Self {
        Self {
            handle,
            kind,
            options,
            detector,
            state: RwLock::new(SessionState::Active),
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    pub fn detector(&self) -> &Arc<dyn Detector> {
        &self.detector
    }

    /// Enter the session for a detection
    ///
    /// Returns `None` once the session has been closed. The guard must be
    /// held for as long as the detector is processing.
    pub async fn enter(&self) -> Option<RwLockReadGuard<'_, SessionState>> {
        let state = self.state.read().await;
        match *state {
            SessionState::Active => Some(state),
            SessionState::Closed => None,
        }
    }

    /// True unless the session is closed or a close is in progress
    pub fn is_active(&self) -> bool {
        self.state
            .try_read()
            .map(|state| *state == SessionState::Active)
            .unwrap_or(false)
    }

    /// Mark closed and release the detector; waits for in-flight detections
    async fn shut(&self) -> Result<(), VisionError> {
        let mut state = self.state.write().await;
        if *state == SessionState::Closed {
            return Err(VisionError::HandleNotFound(self.handle));
        }
        *state = SessionState::Closed;

        self.detector
            .close()
            .map_err(|failure| VisionError::close_failed(self.kind, failure))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("handle", &self.handle)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Handle-keyed registry of recognition sessions
///
/// # Example
///
/// ```ignore
/// let registry = SessionRegistry::new();
/// registry.create(7, CapabilityKind::Face, options, detector).await?;
/// let session = registry.get(7).await;
/// registry.close(7).await?;
/// ```
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Handle, Arc<Session>>>>,
    // Per-handle construction slots; only same-handle creators wait on each other
    creating: Arc<Mutex<HashMap<Handle, Arc<Mutex<()>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            creating: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Reuse an existing session for `kind`, or report the kind it is bound to
    fn reuse(
        existing: &Arc<Session>,
        handle: Handle,
        kind: CapabilityKind,
    ) -> Result<(Arc<Session>, bool), VisionError> {
        if existing.kind != kind {
            return Err(VisionError::HandleKindMismatch {
                handle,
                bound: existing.kind,
                requested: kind,
            });
        }
        Ok((existing.clone(), false))
    }

    async fn creation_slot(&self, handle: Handle) -> Arc<Mutex<()>> {
        self.creating
            .lock()
            .await
            .entry(handle)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn release_slot(&self, handle: Handle, slot: Arc<Mutex<()>>) {
        let mut creating = self.creating.lock().await;
        // Two references left: the map's and ours, so nobody else is waiting
        if Arc::strong_count(&slot) == 2 {
            creating.remove(&handle);
        }
    }

    /// Bind a new detector to `handle`
    ///
    /// # Errors
    ///
    /// `DuplicateHandle` if the handle is already bound, whatever its kind.
    pub async fn create(
        &self,
        handle: Handle,
        kind: CapabilityKind,
        options: DetectorOptions,
        detector: Arc<dyn Detector>,
    ) -> Result<Arc<Session>, VisionError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&handle) {
            tracing::warn!("Handle {} already bound, refusing {} session", handle, kind);
            return Err(VisionError::DuplicateHandle(handle));
        }

        let session = Arc::new(Session::new(handle, kind, options, detector));
        sessions.insert(handle, session.clone());
        tracing::info!(
            "🔭 {} session created for handle {} (total sessions: {})",
            kind,
            handle,
            sessions.len()
        );
        Ok(session)
    }

    /// Look up an active session
    pub async fn get(&self, handle: Handle) -> Option<Arc<Session>> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&handle)
            .filter(|session| session.is_active())
            .cloned()
    }

    /// Return the session bound to `handle`, creating it with `make` if absent
    ///
    /// Concurrent first calls for the same handle construct exactly one
    /// detector: creators of one handle queue on a per-handle slot, and
    /// `make` runs without the registry lock, so a slow construction never
    /// stalls lookups, closes or creations of other handles. The flag
    /// reports whether this call created the session.
    ///
    /// # Errors
    ///
    /// `HandleKindMismatch` if the handle is bound to another kind, or
    /// whatever `make` fails with.
    pub async fn get_or_create<F>(
        &self,
        handle: Handle,
        kind: CapabilityKind,
        make: F,
    ) -> Result<(Arc<Session>, bool), VisionError>
    where
        F: FnOnce() -> Result<(DetectorOptions, Arc<dyn Detector>), VisionError>,
    {
        if let Some(existing) = self.sessions.lock().await.get(&handle).cloned() {
            return Self::reuse(&existing, handle, kind);
        }

        let slot = self.creation_slot(handle).await;
        let result = {
            let _creating = slot.lock().await;
            self.construct(handle, kind, make).await
        };
        self.release_slot(handle, slot).await;
        result
    }

    /// Build and bind a session while holding the handle's creation slot
    async fn construct<F>(
        &self,
        handle: Handle,
        kind: CapabilityKind,
        make: F,
    ) -> Result<(Arc<Session>, bool), VisionError>
    where
        F: FnOnce() -> Result<(DetectorOptions, Arc<dyn Detector>), VisionError>,
    {
        // A creator ahead of us in the slot may have bound it already
        if let Some(existing) = self.sessions.lock().await.get(&handle).cloned() {
            return Self::reuse(&existing, handle, kind);
        }

        let (options, detector) = make()?;

        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(&handle).cloned() {
            // Bound through `create` while we were constructing
            drop(sessions);
            if let Err(failure) = detector.close() {
                tracing::warn!(
                    "Release of unused {} capability for handle {} failed: {}",
                    kind,
                    handle,
                    failure
                );
            }
            return Self::reuse(&existing, handle, kind);
        }

        let session = Arc::new(Session::new(handle, kind, options, detector));
        sessions.insert(handle, session.clone());
        tracing::info!(
            "🔭 {} session created for handle {} (total sessions: {})",
            kind,
            handle,
            sessions.len()
        );
        Ok((session, true))
    }

    /// Close the session bound to `handle`
    ///
    /// Waits for in-flight detections, releases the detector and frees the
    /// handle. The handle is freed even when the release fails.
    ///
    /// # Errors
    ///
    /// * `HandleNotFound` if no session is bound (including one already closed)
    /// * `CloseFailed` if the detector's release failed
    pub async fn close(&self, handle: Handle) -> Result<(), VisionError> {
        self.close_bound(handle, None).await
    }

    /// Close the session bound to `handle` only if it is a `kind` session
    ///
    /// # Errors
    ///
    /// As [`close`](Self::close), plus `HandleKindMismatch` when the handle
    /// is bound to another kind; that session is left untouched.
    pub async fn close_as(&self, handle: Handle, kind: CapabilityKind) -> Result<(), VisionError> {
        self.close_bound(handle, Some(kind)).await
    }

    async fn close_bound(
        &self,
        handle: Handle,
        expected: Option<CapabilityKind>,
    ) -> Result<(), VisionError> {
        let session = self
            .sessions
            .lock()
            .await
            .get(&handle)
            .cloned()
            .ok_or(VisionError::HandleNotFound(handle))?;

        if let Some(requested) = expected.filter(|requested| *requested != session.kind) {
            tracing::warn!(
                "Refusing {} close of handle {} bound to {}",
                requested,
                handle,
                session.kind
            );
            return Err(VisionError::HandleKindMismatch {
                handle,
                bound: session.kind,
                requested,
            });
        }

        let mut state = session.state.write().await;
        if *state == SessionState::Closed {
            return Err(VisionError::HandleNotFound(handle));
        }
        *state = SessionState::Closed;
        let released = session.detector.close();

        {
            let mut sessions = self.sessions.lock().await;
            let bound_here = sessions
                .get(&handle)
                .is_some_and(|current| Arc::ptr_eq(current, &session));
            if bound_here {
                sessions.remove(&handle);
            }
            tracing::info!(
                "🗑️  {} session closed for handle {} (remaining: {})",
                session.kind,
                handle,
                sessions.len()
            );
        }
        drop(state);

        released.map_err(|failure| {
            tracing::warn!(
                "Release of {} capability for handle {} failed: {}",
                session.kind,
                handle,
                failure
            );
            VisionError::close_failed(session.kind, failure)
        })
    }

    /// Close every session
    ///
    /// Returns the failures of detectors whose release failed; all handles
    /// are freed regardless.
    pub async fn drain(&self) -> Vec<VisionError> {
        let sessions: Vec<Arc<Session>> = self
            .sessions
            .lock()
            .await
            .drain()
            .map(|(_, session)| session)
            .collect();

        if sessions.is_empty() {
            return Vec::new();
        }

        let count = sessions.len();
        let results = join_all(sessions.iter().map(|session| session.shut())).await;

        let failures: Vec<VisionError> = results
            .into_iter()
            .filter_map(Result::err)
            .filter(|err| !matches!(err, VisionError::HandleNotFound(_)))
            .collect();

        tracing::info!(
            "🧹 Drained {} sessions ({} release failures)",
            count,
            failures.len()
        );
        failures
    }

    /// Number of bound handles
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
