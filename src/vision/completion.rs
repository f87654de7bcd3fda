// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-use completion for callback-style recognition libraries
//!
//! Libraries that report results through success/failure listeners resolve a
//! [`Completer`] from the listener; the detector awaits the paired
//! [`Completion`]. Resolving consumes the completer, so a result can be
//! delivered at most once.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use super::errors::CapabilityFailure;

/// Create a linked completer/completion pair
pub fn completion<T>() -> (Completer<T>, Completion<T>) {
    let (tx, rx) = oneshot::channel();
    (Completer { tx }, Completion { rx })
}

/// Resolving half, handed to the library callback
#[derive(Debug)]
pub struct Completer<T> {
    tx: oneshot::Sender<Result<T, CapabilityFailure>>,
}

impl<T> Completer<T> {
    pub fn succeed(self, value: T) {
        self.resolve(Ok(value));
    }

    pub fn fail(self, failure: CapabilityFailure) {
        self.resolve(Err(failure));
    }

    pub fn resolve(self, result: Result<T, CapabilityFailure>) {
        // Receiver gone means the caller stopped waiting
        if self.tx.send(result).is_err() {
            tracing::debug!("Completion dropped before the capability resolved");
        }
    }
}

/// Awaiting half; resolves once with the library's result
#[derive(Debug)]
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T, CapabilityFailure>>,
}

impl<T> Future for Completion<T> {
    type Output = Result<T, CapabilityFailure>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|_| Err(CapabilityFailure::new("completion dropped")))
        })
    }
}
