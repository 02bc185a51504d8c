use std::collections::HashSet;
use std::sync::Arc;

use atelier_core::errors::AtelierError;
use atelier_store::{DocumentStore, IdGenerator, IdNamespace, MemoryStore};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn ten_thousand_ids_are_unique() {
    // Widened namespace: uniqueness at scale needs room, which is exactly
    // why the width is configuration rather than a constant.
    let docs = Arc::new(MemoryStore::new());
    let ids = IdGenerator::new(IdNamespace::new("client_", 6, 1000));

    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let reserved = ids.reserve(docs.as_ref()).await.unwrap();
        let id = reserved.id().to_string();
        docs.put(&id, b"{}").await.unwrap();
        drop(reserved);
        assert!(seen.insert(id), "generated a duplicate identifier");
    }
    assert_eq!(seen.len(), 10_000);
}

#[tokio::test]
async fn ids_have_the_configured_prefix_and_width() {
    let docs = Arc::new(MemoryStore::new());
    let clients = IdGenerator::new(IdNamespace::clients());
    let requests = IdGenerator::new(IdNamespace::requests());

    let client_id = {
        let reserved = clients.reserve(docs.as_ref()).await.unwrap();
        reserved.id().to_string()
    };
    let request_id = {
        let reserved = requests.reserve(docs.as_ref()).await.unwrap();
        reserved.id().to_string()
    };

    assert!(client_id.starts_with("client_"));
    assert_eq!(client_id.len(), "client_".len() + 4);
    assert!(client_id["client_".len()..].bytes().all(|b| b.is_ascii_digit()));

    assert!(request_id.starts_with("req_"));
    assert_eq!(request_id.len(), "req_".len() + 5);
}

#[tokio::test]
async fn client_and_request_namespaces_never_overlap() {
    let docs = Arc::new(MemoryStore::new());
    let clients = IdGenerator::new(IdNamespace::clients());
    let requests = IdGenerator::new(IdNamespace::requests());

    let mut client_ids = HashSet::new();
    let mut request_ids = HashSet::new();
    for _ in 0..200 {
        let reserved = clients.reserve(docs.as_ref()).await.unwrap();
        docs.put(reserved.id(), b"{}").await.unwrap();
        client_ids.insert(reserved.id().to_string());

        let reserved = requests.reserve(docs.as_ref()).await.unwrap();
        docs.put(reserved.id(), b"{}").await.unwrap();
        request_ids.insert(reserved.id().to_string());
    }

    assert!(client_ids.is_disjoint(&request_ids));
}

#[tokio::test]
async fn exhausted_namespace_fails_after_the_attempt_bound() {
    let docs = Arc::new(MemoryStore::new());
    // Single-digit namespace: nine possible identifiers.
    let ids = IdGenerator::new(IdNamespace::new("tiny_", 1, 25));
    for n in 1..=9 {
        docs.put(&format!("tiny_{n}"), b"{}").await.unwrap();
    }

    let err = ids.reserve(docs.as_ref()).await.unwrap_err();
    match err {
        AtelierError::IdExhaustion { namespace, attempts } => {
            assert_eq!(namespace, "tiny_");
            assert_eq!(attempts, 25);
        }
        other => panic!("expected IdExhaustion, got {other}"),
    }
}

#[tokio::test]
async fn very_wide_namespaces_saturate_instead_of_overflowing() {
    // 10^10 does not fit in the numeric bound; the namespace clamps it and
    // still hands out full-width identifiers.
    let docs = Arc::new(MemoryStore::new());
    let ids = IdGenerator::new(IdNamespace::new("req_", 10, 5));

    let reserved = ids.reserve(docs.as_ref()).await.unwrap();
    assert_eq!(reserved.id().len(), "req_".len() + 10);
    assert!(reserved.id()["req_".len()..].bytes().all(|b| b.is_ascii_digit()));
}

#[tokio::test]
async fn concurrent_generators_never_hand_out_the_same_id() {
    let docs = Arc::new(MemoryStore::new());
    let ids = Arc::new(IdGenerator::new(IdNamespace::new("client_", 2, 1000)));

    let mut handles = Vec::new();
    for _ in 0..50 {
        let docs = Arc::clone(&docs);
        let ids = Arc::clone(&ids);
        handles.push(tokio::spawn(async move {
            let reserved = ids.reserve(docs.as_ref()).await.unwrap();
            let id = reserved.id().to_string();
            docs.put(&id, b"{}").await.unwrap();
            id
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        assert!(seen.insert(handle.await.unwrap()));
    }
    assert_eq!(seen.len(), 50);
}
