// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;

fn status_event() -> Event {
    Event::StatusChanged {
        workspace_id: WorkspaceId::new("ws-1"),
        old: WorkspaceStatus::Stopped,
        new: WorkspaceStatus::Starting,
        epoch_ms: 1_000,
        reason: None,
        error: None,
    }
}

#[test]
fn status_changed_serializes_with_tag() {
    let json = serde_json::to_string(&status_event()).unwrap();
    assert!(json.contains("\"type\":\"runtime:status\""));
    assert!(json.contains("\"old\":\"stopped\""));
    assert!(json.contains("\"new\":\"starting\""));
    // optional fields are omitted
    assert!(!json.contains("reason"));
    assert!(!json.contains("error"));
}

#[test]
fn event_roundtrip() {
    let event = Event::StoppingIntent {
        workspace_id: WorkspaceId::new("ws-1"),
        requested_by: NodeId::new("node-b"),
        epoch_ms: 42,
    };
    let json = serde_json::to_string(&event).unwrap();
    let parsed: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, event);
}

#[test]
fn workspace_id_is_topic_key() {
    assert_eq!(status_event().workspace_id().as_str(), "ws-1");

    let recovered = Event::RuntimeRecovered {
        identity: RuntimeIdentity::new("ws-9", "owner", "dev", "a1"),
        epoch_ms: 7,
    };
    assert_eq!(recovered.workspace_id().as_str(), "ws-9");
}

#[test]
fn event_names() {
    assert_eq!(status_event().name(), "runtime:status");
}
