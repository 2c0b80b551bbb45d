// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

use super::*;

#[test]
fn workspace_id_display() {
    let id = WorkspaceId::new("ws-1");
    assert_eq!(id.to_string(), "ws-1");
}

#[test]
fn workspace_id_equality() {
    let a = WorkspaceId::new("ws-1");
    let b = WorkspaceId::new("ws-1");
    let c = WorkspaceId::new("ws-2");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a, "ws-1");
}

#[test]
fn workspace_id_from_str() {
    let id: WorkspaceId = "ws".into();
    assert_eq!(id.as_str(), "ws");
}

#[test]
fn workspace_id_serde() {
    let id = WorkspaceId::new("my-ws");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"my-ws\"");

    let parsed: WorkspaceId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[yare::parameterized(
    shorter = { "abc", 8, "abc" },
    exact   = { "abcdefgh", 8, "abcdefgh" },
    longer  = { "abcdefgh-ijkl", 8, "abcdefgh" },
)]
fn attempt_id_short(input: &str, n: usize, expected: &str) {
    let id = AttemptId::new(input);
    assert_eq!(id.short(n), expected);
}

#[test]
fn uuid_gen_unique() {
    let gen = UuidIdGen;
    let a = gen.next();
    let b = gen.next();
    assert_ne!(a, b);
    assert_eq!(a.len(), 36);
}
