// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Session registry tests

use std::sync::Arc;

use fabstir_vision_bridge::vision::{
    CapabilityFailure, CapabilityKind, DetectorFactory, DetectorOptions, FaceDetectorOptions,
    SessionRegistry, TextRecognizerOptions, VisionError,
};

use super::fakes::FakeFactory;

fn face_options() -> DetectorOptions {
    DetectorOptions::Face(FaceDetectorOptions::default())
}

#[tokio::test]
async fn test_create_get_close() {
    let factory = FakeFactory::new();
    let stats = factory.stats();
    let registry = SessionRegistry::new();
    let options = face_options();

    let session = registry
        .create(
            1,
            CapabilityKind::Face,
            options.clone(),
            factory.create(&options).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(session.kind(), CapabilityKind::Face);
    assert_eq!(session.options(), &options);
    assert!(session.is_active());

    let found = registry.get(1).await.unwrap();
    assert!(Arc::ptr_eq(&found, &session));
    assert!(registry.get(2).await.is_none());

    registry.close(1).await.unwrap();
    assert!(registry.get(1).await.is_none());
    assert!(!session.is_active());
    assert_eq!(stats.closed(), 1);
}

#[tokio::test]
async fn test_duplicate_handle_rejected() {
    let factory = FakeFactory::new();
    let registry = SessionRegistry::new();
    let options = face_options();

    registry
        .create(
            1,
            CapabilityKind::Face,
            options.clone(),
            factory.create(&options).unwrap(),
        )
        .await
        .unwrap();

    let text = DetectorOptions::Text(TextRecognizerOptions {});
    let err = registry
        .create(1, CapabilityKind::Text, text.clone(), factory.create(&text).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err, VisionError::DuplicateHandle(1));
    assert_eq!(err.code(), "duplicateHandleError");
    assert_eq!(registry.get(1).await.unwrap().kind(), CapabilityKind::Face);
}

#[tokio::test]
async fn test_handles_are_independent() {
    let factory = FakeFactory::new();
    let stats = factory.stats();
    let registry = SessionRegistry::new();
    let options = face_options();

    for handle in 0..5 {
        registry
            .create(
                handle,
                CapabilityKind::Face,
                options.clone(),
                factory.create(&options).unwrap(),
            )
            .await
            .unwrap();
    }
    assert_eq!(registry.len().await, 5);

    registry.close(2).await.unwrap();
    assert_eq!(registry.len().await, 4);
    assert!(registry.get(1).await.is_some());
    assert!(registry.get(3).await.is_some());
    assert_eq!(stats.closed(), 1);
}

#[tokio::test]
async fn test_drain_reports_release_failures() {
    let factory = FakeFactory::new().with_close_failure(CapabilityFailure::new("busy"));
    let registry = SessionRegistry::new();
    let options = face_options();

    for handle in [10, 11] {
        registry
            .create(
                handle,
                CapabilityKind::Face,
                options.clone(),
                factory.create(&options).unwrap(),
            )
            .await
            .unwrap();
    }

    let failures = registry.drain().await;
    assert_eq!(failures.len(), 2);
    assert!(failures
        .iter()
        .all(|err| err.code() == "FaceDetectorIOError"));
    assert!(registry.is_empty().await);
}
