use std::sync::Arc;

use atelier_core::errors::AtelierError;
use atelier_core::models::client::ClientProfile;
use atelier_store::{ClientRegistry, DocumentStore, IdNamespace, MemoryStore};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use pretty_assertions::assert_eq;

fn fake_profile() -> ClientProfile {
    ClientProfile {
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        email: SafeEmail().fake(),
        phone: "+32 470 00 00 00".to_string(),
        message: "Stained glass workshop inquiry".to_string(),
        is_initiated: false,
    }
}

#[tokio::test]
async fn created_clients_can_be_read_back() {
    let docs = Arc::new(MemoryStore::new());
    let registry = ClientRegistry::new(docs, IdNamespace::clients());

    let profile = fake_profile();
    let record = registry.create_client(profile.clone()).await.unwrap();
    assert!(record.id.starts_with("client_"));

    let fetched = registry.get_client(&record.id).await.unwrap();
    assert_eq!(fetched, record);
    assert_eq!(fetched.profile, profile);
}

#[tokio::test]
async fn missing_client_is_not_found() {
    let docs = Arc::new(MemoryStore::new());
    let registry = ClientRegistry::new(docs, IdNamespace::clients());

    let err = registry.get_client("client_9999").await.unwrap_err();
    assert!(matches!(err, AtelierError::NotFound(_)));
}

#[tokio::test]
async fn corrupt_client_record_propagates_the_decode_error() {
    let docs = Arc::new(MemoryStore::new());
    docs.put("client_0042", b"{ broken").await.unwrap();
    let registry = ClientRegistry::new(docs, IdNamespace::clients());

    // Client documents are never masked by defaults: data loss must surface.
    let err = registry.get_client("client_0042").await.unwrap_err();
    match err {
        AtelierError::Decode { id, .. } => assert_eq!(id, "client_0042"),
        other => panic!("expected Decode, got {other}"),
    }
}

#[tokio::test]
async fn each_client_gets_a_distinct_identifier() {
    let docs = Arc::new(MemoryStore::new());
    let registry = ClientRegistry::new(docs, IdNamespace::clients());

    let mut ids = std::collections::HashSet::new();
    for _ in 0..100 {
        let record = registry.create_client(fake_profile()).await.unwrap();
        assert!(ids.insert(record.id));
    }
}
