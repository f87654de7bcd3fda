// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Method-call surface tests

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use fabstir_vision_bridge::vision::native::{Barcode, BarcodeValue, Detection, Email};
use fabstir_vision_bridge::vision::{
    CapabilityKind, MethodCall, MethodResponse, RecognitionDispatcher, Reply, VisionConfig,
    VisionMethodHandler,
};
use serde_json::{json, Value};

use super::fakes::FakeFactory;

fn handler(factory: FakeFactory) -> Arc<VisionMethodHandler> {
    let dispatcher = RecognitionDispatcher::new(VisionConfig::default(), Arc::new(factory));
    Arc::new(VisionMethodHandler::new(Arc::new(dispatcher)))
}

fn frame_arguments(handle: Value) -> Value {
    json!({
        "handle": handle,
        "type": "bytes",
        "bytes": [0, 0, 0, 0, 0, 0],
        "metadata": { "width": 2, "height": 2, "rotation": 0 }
    })
}

fn error_code(response: &MethodResponse) -> &str {
    match response {
        MethodResponse::Error(reply) => &reply.code,
        other => panic!("expected error response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_method_not_implemented() {
    let handler = handler(FakeFactory::new());

    let response = handler
        .handle(MethodCall::new("CloudTextRecognizer#processImage", json!({})))
        .await;
    assert_eq!(response, MethodResponse::NotImplemented);
}

#[tokio::test]
async fn test_barcode_detect_call() {
    let factory = FakeFactory::new().with_result(
        CapabilityKind::Barcode,
        Detection::Barcodes(vec![Barcode {
            raw_value: Some("mailto:a@b.c".to_string()),
            value: BarcodeValue::Email(Email {
                kind: 1,
                address: Some("a@b.c".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }]),
    );
    let handler = handler(factory);

    let response = handler
        .handle(MethodCall::new(
            "BarcodeDetector#detectInImage",
            frame_arguments(json!(1)),
        ))
        .await;

    match response {
        MethodResponse::Success(doc) => {
            assert_eq!(doc[0]["valueType"], 2);
            assert_eq!(doc[0]["email"]["address"], "a@b.c");
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_base64_bytes_accepted() {
    let handler = handler(FakeFactory::new());

    let response = handler
        .handle(MethodCall::new(
            "ImageLabeler#processImage",
            json!({
                "handle": 2,
                "options": { "confidenceThreshold": 0.7 },
                "type": "bytes",
                "bytes": STANDARD.encode([0u8; 6]),
                "metadata": { "width": 2, "height": 2, "rotation": 90 }
            }),
        ))
        .await;
    assert_eq!(response, MethodResponse::Success(json!([])));
}

#[tokio::test]
async fn test_missing_width_is_io_error() {
    let handler = handler(FakeFactory::new());

    let response = handler
        .handle(MethodCall::new(
            "FaceDetector#processImage",
            json!({
                "handle": 1,
                "type": "bytes",
                "bytes": [0, 0, 0, 0, 0, 0],
                "metadata": { "height": 2, "rotation": 0 }
            }),
        ))
        .await;
    assert_eq!(error_code(&response), "MLVisionDetectorIOError");
}

#[tokio::test]
async fn test_unknown_image_type() {
    let handler = handler(FakeFactory::new());

    let response = handler
        .handle(MethodCall::new(
            "TextRecognizer#processImage",
            json!({ "handle": 1, "type": "url", "path": "https://x" }),
        ))
        .await;
    assert_eq!(error_code(&response), "unsupportedImageType");
}

#[tokio::test]
async fn test_invalid_handle_argument() {
    let handler = handler(FakeFactory::new());

    for arguments in [json!({}), frame_arguments(json!("seven"))] {
        let response = handler
            .handle(MethodCall::new("FaceDetector#processImage", arguments))
            .await;
        assert_eq!(error_code(&response), "invalidArgument");
    }
}

#[tokio::test]
async fn test_invalid_face_mode() {
    let handler = handler(FakeFactory::new());
    let mut arguments = frame_arguments(json!(3));
    arguments["options"] = json!({ "mode": "balanced" });

    let response = handler
        .handle(MethodCall::new("FaceDetector#processImage", arguments))
        .await;
    assert_eq!(error_code(&response), "invalidOptions");
}

#[tokio::test]
async fn test_close_calls() {
    let handler = handler(FakeFactory::new());

    let response = handler
        .handle(MethodCall::new("FaceDetector#close", json!({ "handle": 42 })))
        .await;
    match &response {
        MethodResponse::Error(reply) => {
            assert_eq!(reply.code, "handleNotFoundError");
            assert_eq!(reply.message, "Object for handle does not exist: 42");
        }
        other => panic!("expected error, got {:?}", other),
    }

    handler
        .handle(MethodCall::new(
            "FaceDetector#processImage",
            frame_arguments(json!(42)),
        ))
        .await;
    let response = handler
        .handle(MethodCall::new("FaceDetector#close", json!({ "handle": 42 })))
        .await;
    assert_eq!(response, MethodResponse::Success(Value::Null));
}

#[tokio::test]
async fn test_on_method_call_replies_once() {
    let handler = handler(FakeFactory::new());

    let (reply, response) = Reply::channel();
    handler.clone().on_method_call(
        MethodCall::new("TextRecognizer#processImage", frame_arguments(json!(5))),
        reply,
    );
    assert_eq!(
        response.await.unwrap(),
        MethodResponse::Success(json!({ "text": "", "blocks": [] }))
    );

    let (reply, response) = Reply::channel();
    handler.on_method_call(MethodCall::new("Unknown#call", Value::Null), reply);
    assert_eq!(response.await.unwrap(), MethodResponse::NotImplemented);
}

#[test]
fn test_response_wire_shape() {
    let success = serde_json::to_value(MethodResponse::Success(json!([1]))).unwrap();
    assert_eq!(success, json!({ "status": "success", "body": [1] }));

    let missing = serde_json::to_value(MethodResponse::NotImplemented).unwrap();
    assert_eq!(missing, json!({ "status": "notImplemented" }));

    let call: MethodCall =
        serde_json::from_value(json!({ "method": "FaceDetector#close" })).unwrap();
    assert_eq!(call.arguments, Value::Null);
}
