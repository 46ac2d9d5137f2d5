// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::subjects;

#[tokio::test]
async fn publish_with_no_subscriber_is_not_an_error() {
    let bus = InMemoryBus::new();
    bus.publish(subjects::TRIGGER_CYCLE, Vec::new()).await.unwrap();
}

#[tokio::test]
async fn subscriber_receives_published_payload() {
    let bus = InMemoryBus::new();
    let mut sub = bus.stream(subjects::QUEUE_CANCEL).await.unwrap();

    let msg = crate::QueueCancelMessage::new("http://localhost:11434");
    bus.publish(subjects::QUEUE_CANCEL, serde_json::to_vec(&msg).unwrap()).await.unwrap();

    let received = sub.recv().await.unwrap();
    let decoded: crate::QueueCancelMessage = serde_json::from_slice(&received).unwrap();
    assert_eq!(decoded, msg);
}

#[tokio::test]
async fn independent_subjects_do_not_cross_deliver() {
    let bus = InMemoryBus::new();
    let mut cancel_sub = bus.stream(subjects::QUEUE_CANCEL).await.unwrap();
    bus.publish(subjects::MODEL_DOWNLOAD, b"progress".to_vec()).await.unwrap();

    let recv = tokio::time::timeout(std::time::Duration::from_millis(50), cancel_sub.recv()).await;
    assert!(recv.is_err(), "message published to a different subject must not be observed");
}

#[tokio::test]
async fn multiple_subscribers_each_receive_the_message() {
    let bus = InMemoryBus::new();
    let mut a = bus.stream(subjects::TRIGGER_CYCLE).await.unwrap();
    let mut b = bus.stream(subjects::TRIGGER_CYCLE).await.unwrap();

    bus.publish(subjects::TRIGGER_CYCLE, b"go".to_vec()).await.unwrap();

    assert_eq!(a.recv().await.unwrap(), b"go".to_vec());
    assert_eq!(b.recv().await.unwrap(), b"go".to_vec());
}

#[tokio::test]
async fn dropping_all_senders_closes_the_subscription() {
    let bus = InMemoryBus::new();
    let mut sub = bus.stream(subjects::QUEUE_CANCEL).await.unwrap();
    drop(bus);
    assert!(matches!(sub.recv().await, Err(BusError::SubjectClosed)));
}
