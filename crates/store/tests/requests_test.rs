use std::sync::Arc;
use std::time::Duration;

use atelier_core::errors::AtelierError;
use atelier_core::models::request::{
    FullContact, RequestClient, RequestStatus, ReservationRequest, SlotRef,
};
use atelier_store::{DocumentStore, IdNamespace, MemoryStore, NewRequest, RequestStore};
use chrono::{NaiveTime, Utc};
use pretty_assertions::assert_eq;

fn slot_ref(time_h: u32) -> SlotRef {
    SlotRef {
        week: "2025-W10".parse().unwrap(),
        day: "monday".parse().unwrap(),
        time: NaiveTime::from_hms_opt(time_h, 0, 0).unwrap(),
        duration: 2,
    }
}

fn new_request(first_name: &str, is_initiated: bool) -> NewRequest {
    NewRequest {
        slot: slot_ref(9),
        client: RequestClient {
            first_name: first_name.to_string(),
            message: String::new(),
            is_initiated,
        },
        full_contact: (!is_initiated).then(|| FullContact {
            last_name: "Durand".to_string(),
            email: "someone@example.org".to_string(),
            phone: String::new(),
        }),
    }
}

fn store() -> (Arc<MemoryStore>, RequestStore) {
    let docs = Arc::new(MemoryStore::new());
    let requests = RequestStore::new(docs.clone(), IdNamespace::requests());
    (docs, requests)
}

#[tokio::test]
async fn created_requests_start_pending() {
    let (_, requests) = store();
    let request = requests
        .create_request(new_request("Claire", false))
        .await
        .unwrap();

    assert!(request.id.starts_with("req_"));
    assert_eq!(request.status, RequestStatus::Pending);
    assert!(request.processed_at.is_none() && request.processed_by.is_none());

    let fetched = requests.get_request(&request.id).await.unwrap();
    assert_eq!(fetched, request);
}

#[tokio::test]
async fn listing_is_newest_first_and_filters_by_status() {
    let (_, requests) = store();
    let first = requests
        .create_request(new_request("Anna", true))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = requests
        .create_request(new_request("Ben", false))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let third = requests
        .create_request(new_request("Chloe", false))
        .await
        .unwrap();

    let all = requests.list_requests(None).await.unwrap();
    let order: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(order, vec![&third.id, &second.id, &first.id]);

    requests
        .approve_request(&second.id, "operator", "Ben Durand")
        .await
        .unwrap();

    let pending = requests
        .list_requests(Some(RequestStatus::Pending))
        .await
        .unwrap();
    assert_eq!(
        pending.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        vec![&third.id, &first.id]
    );
    let approved = requests
        .list_requests(Some(RequestStatus::Approved))
        .await
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, second.id);
}

#[tokio::test]
async fn approval_happens_exactly_once() {
    let (_, requests) = store();
    let request = requests
        .create_request(new_request("Claire", false))
        .await
        .unwrap();

    let approved = requests
        .approve_request(&request.id, "operator", "Claire Dupont")
        .await
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    assert!(approved.processed_at.is_some());
    assert_eq!(approved.processed_by.as_deref(), Some("operator"));
    assert_eq!(approved.final_client_name.as_deref(), Some("Claire Dupont"));

    // A terminal request is no longer in the expected state: both follow-up
    // transitions fail and the record stays untouched.
    let err = requests
        .approve_request(&request.id, "operator", "Claire Dupont")
        .await
        .unwrap_err();
    assert!(matches!(err, AtelierError::NotFound(_)));
    let err = requests
        .reject_request(&request.id, "operator", "changed my mind")
        .await
        .unwrap_err();
    assert!(matches!(err, AtelierError::NotFound(_)));
    assert_eq!(requests.get_request(&request.id).await.unwrap(), approved);
}

#[tokio::test]
async fn rejection_records_the_reason() {
    let (_, requests) = store();
    let request = requests
        .create_request(new_request("Marc", true))
        .await
        .unwrap();

    let rejected = requests
        .reject_request(&request.id, "operator", "slot needed for maintenance")
        .await
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("slot needed for maintenance")
    );
    assert!(rejected.final_client_name.is_none());
}

#[tokio::test]
async fn unknown_request_is_not_found() {
    let (_, requests) = store();
    assert!(matches!(
        requests.get_request("req_99999").await.unwrap_err(),
        AtelierError::NotFound(_)
    ));
    assert!(matches!(
        requests
            .approve_request("req_99999", "operator", "x")
            .await
            .unwrap_err(),
        AtelierError::NotFound(_)
    ));
}

#[tokio::test]
async fn stats_always_add_up() {
    let (_, requests) = store();
    let a = requests.create_request(new_request("A", true)).await.unwrap();
    let b = requests.create_request(new_request("B", false)).await.unwrap();
    requests.create_request(new_request("C", false)).await.unwrap();

    requests.approve_request(&a.id, "op", "A").await.unwrap();
    requests.reject_request(&b.id, "op", "no").await.unwrap();

    let stats = requests.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.pending + stats.approved + stats.rejected, stats.total);
    assert_eq!(stats.approved, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.initiated_clients, 1);
    assert_eq!(stats.new_clients, 2);
}

#[tokio::test]
async fn cleanup_removes_only_old_terminal_requests() {
    let (docs, requests) = store();

    // An old approved request, planted directly in the store.
    let old = ReservationRequest {
        id: "req_00001".to_string(),
        slot: slot_ref(9),
        client: RequestClient {
            first_name: "Old".to_string(),
            message: String::new(),
            is_initiated: true,
        },
        full_contact: None,
        status: RequestStatus::Approved,
        created_at: Utc::now() - chrono::Duration::days(90),
        processed_at: Some(Utc::now() - chrono::Duration::days(60)),
        processed_by: Some("operator".to_string()),
        final_client_name: Some("Old Client".to_string()),
        rejection_reason: None,
    };
    docs.put("req_00001", &serde_json::to_vec(&old).unwrap())
        .await
        .unwrap();

    // An equally old but still-pending request.
    let stale_pending = ReservationRequest {
        id: "req_00002".to_string(),
        status: RequestStatus::Pending,
        processed_at: None,
        processed_by: None,
        final_client_name: None,
        ..old.clone()
    };
    docs.put("req_00002", &serde_json::to_vec(&stale_pending).unwrap())
        .await
        .unwrap();

    // A recently processed one.
    let recent = requests.create_request(new_request("New", true)).await.unwrap();
    requests.reject_request(&recent.id, "op", "full").await.unwrap();

    let removed = requests.cleanup_old_requests(30).await.unwrap();
    assert_eq!(removed, 1);

    assert!(requests.get_request("req_00001").await.is_err());
    // Pending requests survive cleanup regardless of age.
    assert!(requests.get_request("req_00002").await.is_ok());
    assert!(requests.get_request(&recent.id).await.is_ok());
}

#[tokio::test]
async fn corrupt_request_is_skipped_by_listing_but_fails_targeted_reads() {
    let (docs, requests) = store();
    requests.create_request(new_request("Fine", true)).await.unwrap();
    docs.put("req_zzzzz", b"garbage").await.unwrap();

    let listed = requests.list_requests(None).await.unwrap();
    assert_eq!(listed.len(), 1);

    let err = requests.get_request("req_zzzzz").await.unwrap_err();
    assert!(matches!(err, AtelierError::Decode { .. }));
}
