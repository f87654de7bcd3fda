// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Method-call surface for host engines
//!
//! Hosts forward raw calls such as `FaceDetector#processImage` with a
//! JSON argument mapping; every call receives exactly one
//! [`MethodResponse`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;

use super::dispatcher::RecognitionDispatcher;
use super::errors::{ErrorReply, VisionError};
use super::types::{CapabilityKind, Handle, ImageDescriptor};

/// A call from the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    /// `handle`, `options` and the image descriptor fields
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Outcome of a call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "camelCase")]
pub enum MethodResponse {
    Success(Value),
    Error(ErrorReply),
    NotImplemented,
}

impl From<Result<Value, VisionError>> for MethodResponse {
    fn from(result: Result<Value, VisionError>) -> Self {
        match result {
            Ok(value) => MethodResponse::Success(value),
            Err(err) => MethodResponse::Error(err.to_reply()),
        }
    }
}

/// Single-use reply slot for one call
#[derive(Debug)]
pub struct Reply {
    tx: oneshot::Sender<MethodResponse>,
}

impl Reply {
    pub fn channel() -> (Self, oneshot::Receiver<MethodResponse>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn send(self, response: MethodResponse) {
        if self.tx.send(response).is_err() {
            debug!("Host stopped waiting for a reply");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Detect(CapabilityKind),
    Close(CapabilityKind),
}

fn route(method: &str) -> Option<Route> {
    let (prefix, action) = method.split_once('#')?;
    let kind = CapabilityKind::from_method_prefix(prefix)?;

    let detect_action = match kind {
        CapabilityKind::Barcode => "detectInImage",
        _ => "processImage",
    };

    if action == detect_action {
        Some(Route::Detect(kind))
    } else if action == "close" {
        Some(Route::Close(kind))
    } else {
        None
    }
}

/// Routes host method calls to the dispatcher
pub struct VisionMethodHandler {
    dispatcher: Arc<RecognitionDispatcher>,
}

impl VisionMethodHandler {
    pub fn new(dispatcher: Arc<RecognitionDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Arc<RecognitionDispatcher> {
        &self.dispatcher
    }

    /// Serve a call and return its response
    pub async fn handle(&self, call: MethodCall) -> MethodResponse {
        let Some(route) = route(&call.method) else {
            debug!("Method not implemented: {}", call.method);
            return MethodResponse::NotImplemented;
        };

        self.serve(route, &call.arguments).await.into()
    }

    /// Serve a call on its own task, delivering the response through `reply`
    pub fn on_method_call(self: Arc<Self>, call: MethodCall, reply: Reply) {
        tokio::spawn(async move {
            let response = self.handle(call).await;
            reply.send(response);
        });
    }

    async fn serve(&self, route: Route, arguments: &Value) -> Result<Value, VisionError> {
        let handle = handle_argument(arguments)?;

        match route {
            Route::Detect(kind) => {
                let options = arguments.get("options").unwrap_or(&Value::Null);
                let descriptor = ImageDescriptor::from_arguments(arguments)?;
                self.dispatcher
                    .detect(kind, handle, options, &descriptor)
                    .await
            }
            Route::Close(kind) => {
                self.dispatcher.close(kind, handle).await?;
                Ok(Value::Null)
            }
        }
    }
}

fn handle_argument(arguments: &Value) -> Result<Handle, VisionError> {
    let value = arguments
        .get("handle")
        .ok_or_else(|| VisionError::InvalidArgument("handle is required".to_string()))?;

    value
        .as_i64()
        .and_then(|h| Handle::try_from(h).ok())
        .ok_or_else(|| VisionError::InvalidArgument(format!("Invalid handle: {}", value)))
}
