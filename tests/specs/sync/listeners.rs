// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Sitework Labs

//! Spec: status broadcasts reach subscribers, and unsubscribing mid-pass
//! affects only the unsubscribed listener.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};

use serde_json::json;
use sw_core::{ActionDraft, ActionKind, SyncStatus};
use sw_sync::{
    DispatchRegistry, FileStore, FixedNetwork, NetworkState, Subscription, SyncConfig, SyncEngine,
};
use tempfile::TempDir;

fn world(dir: &TempDir) -> (SyncEngine, Arc<FixedNetwork>) {
    let mut registry = DispatchRegistry::new();
    registry.register("job", ActionKind::Create, |_| async { Ok(()) });

    let store = Arc::new(FileStore::open(&dir.path().join("queue.json")).unwrap());
    let network = Arc::new(FixedNetwork::offline());
    let engine = SyncEngine::new(store, network.clone(), Arc::new(registry), SyncConfig::default());
    (engine, network)
}

fn draft() -> ActionDraft {
    ActionDraft::new(ActionKind::Create, "job", json!({"title": "clear gutters"}))
}

#[tokio::test]
async fn every_subscriber_sees_the_full_transition_sequence() {
    let dir = TempDir::new().unwrap();
    let (engine, network) = world(&dir);

    let first: Arc<Mutex<Vec<(SyncStatus, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let second: Arc<Mutex<Vec<(SyncStatus, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&first);
    let _sub_a = engine.subscribe(move |status, pending| sink.lock().unwrap().push((status, pending)));
    let sink = Arc::clone(&second);
    let _sub_b = engine.subscribe(move |status, pending| sink.lock().unwrap().push((status, pending)));

    engine.enqueue(draft()).await.unwrap();
    network.set(NetworkState::ONLINE);
    engine.sync_queue().await;

    let expected =
        vec![(SyncStatus::Pending, 1), (SyncStatus::Syncing, 0), (SyncStatus::Synced, 0)];
    assert_eq!(*first.lock().unwrap(), expected);
    assert_eq!(*second.lock().unwrap(), expected);
}

#[tokio::test]
async fn mid_pass_unsubscribe_stops_only_that_listener() {
    let dir = TempDir::new().unwrap();
    let (engine, network) = world(&dir);

    // Listener A unsubscribes itself as soon as the pass starts; listener B
    // stays for the whole run.
    let a_log: Arc<Mutex<Vec<SyncStatus>>> = Arc::new(Mutex::new(Vec::new()));
    let b_log: Arc<Mutex<Vec<SyncStatus>>> = Arc::new(Mutex::new(Vec::new()));
    let a_handle: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

    let sink = Arc::clone(&a_log);
    let handle = Arc::clone(&a_handle);
    let sub_a = engine.subscribe(move |status, _| {
        sink.lock().unwrap().push(status);
        if status == SyncStatus::Syncing {
            if let Some(sub) = handle.lock().unwrap().take() {
                sub.unsubscribe();
            }
        }
    });
    *a_handle.lock().unwrap() = Some(sub_a);

    let sink = Arc::clone(&b_log);
    let _sub_b = engine.subscribe(move |status, _| sink.lock().unwrap().push(status));

    engine.enqueue(draft()).await.unwrap();
    network.set(NetworkState::ONLINE);
    engine.sync_queue().await;

    // A saw the pass start but not its completion.
    assert_eq!(*a_log.lock().unwrap(), vec![SyncStatus::Pending, SyncStatus::Syncing]);
    // B saw everything.
    assert_eq!(
        *b_log.lock().unwrap(),
        vec![SyncStatus::Pending, SyncStatus::Syncing, SyncStatus::Synced]
    );
}

#[tokio::test]
async fn a_throwing_listener_does_not_starve_the_rest() {
    let dir = TempDir::new().unwrap();
    let (engine, network) = world(&dir);

    let _broken = engine.subscribe(|status, _| {
        if status == SyncStatus::Syncing {
            panic!("app callback bug");
        }
    });
    let survivor: Arc<Mutex<Vec<SyncStatus>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&survivor);
    let _sub = engine.subscribe(move |status, _| sink.lock().unwrap().push(status));

    engine.enqueue(draft()).await.unwrap();
    network.set(NetworkState::ONLINE);
    engine.sync_queue().await;

    assert_eq!(
        *survivor.lock().unwrap(),
        vec![SyncStatus::Pending, SyncStatus::Syncing, SyncStatus::Synced]
    );
}
