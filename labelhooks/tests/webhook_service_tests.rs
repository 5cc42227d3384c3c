//! End-to-end behaviour of the webhook service over the in-memory store

use std::sync::Arc;

use chrono::{Duration, Utc};
use labelhooks::prelude::*;
use serde_json::{Value, json};

const BASE_URL: &str = "https://annotate.example.com";

async fn setup() -> (WebhookService, Arc<InMemoryWebhookStore>) {
    let store = Arc::new(InMemoryWebhookStore::new());
    store
        .insert_user(BasicUser::new(1, "admin").with_name("Ada", "Admin"))
        .await;
    let service = WebhookService::new(store.clone(), BASE_URL);
    (service, store)
}

fn payload(value: Value) -> WebhookWritePayload {
    serde_json::from_value(value).expect("valid payload shape")
}

#[tokio::test]
async fn test_create_project_webhook_stores_sorted_events() {
    let (service, store) = setup().await;

    let created = service
        .create(payload(json!({
            "target_url": "https://hooks.example.com/labels",
            "type": "project",
            "project_id": 10,
            "owner_id": 1,
            "secret": "shh",
            "events": ["issue_resolved", "comment_created"]
        })))
        .await
        .unwrap();

    let stored = store.get_webhook(created.id).await.unwrap().unwrap();
    let stored_row = serde_json::to_value(&stored).unwrap();
    assert_eq!(stored_row["events"], json!("comment_created,issue_resolved"));
    assert_eq!(stored.secret, "shh");

    let rendered = serde_json::to_value(&created).unwrap();
    assert!(rendered.get("organization").is_none());
    assert!(rendered.get("secret").is_none());
    assert!(rendered.get("last_status").is_none());
    assert_eq!(rendered["project"], json!(10));
    assert_eq!(rendered["events"], json!(["comment_created", "issue_resolved"]));
    assert_eq!(rendered["owner"]["first_name"], json!("Ada"));
    assert_eq!(
        rendered["url"],
        json!(format!("{}/api/webhooks/{}", BASE_URL, created.id))
    );
}

#[tokio::test]
async fn test_create_rejects_organization_event_for_project() {
    let (service, store) = setup().await;

    let err = service
        .create(payload(json!({
            "target_url": "https://hooks.example.com/labels",
            "type": "project",
            "project_id": 10,
            "events": ["project_deleted"]
        })))
        .await
        .unwrap_err();

    match err {
        WebhookError::Validation(ValidationError::EventsNotAllowed { scope, invalid }) => {
            assert_eq!(scope, WebhookScope::Project);
            assert_eq!(invalid, vec!["project_deleted".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Nothing was persisted
    let all = store.list_webhooks(&WebhookFilter::default()).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_sequence_and_string_events_create_identical_webhooks() {
    let (service, _store) = setup().await;

    let from_list = service
        .create(payload(json!({
            "target_url": "https://a.example.com",
            "type": "organization",
            "organization_id": 2,
            "events": ["task_deleted", "membership_updated"]
        })))
        .await
        .unwrap();
    let from_string = service
        .create(payload(json!({
            "target_url": "https://a.example.com",
            "type": "organization",
            "organization_id": 2,
            "events": "membership_updated,task_deleted"
        })))
        .await
        .unwrap();

    assert_eq!(from_list.events, from_string.events);
    let rendered = serde_json::to_value(&from_list).unwrap();
    assert!(rendered.get("project").is_none());
    assert_eq!(rendered["organization"], json!(2));
}

#[tokio::test]
async fn test_unknown_owner_is_rejected_before_persisting() {
    let (service, store) = setup().await;

    let err = service
        .create(payload(json!({
            "target_url": "https://a.example.com",
            "type": "project",
            "project_id": 10,
            "owner_id": 99,
            "events": []
        })))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WebhookError::Validation(ValidationError::UnknownOwner(99))
    ));
    assert!(store.list_webhooks(&WebhookFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_last_status_follows_newest_delivery() {
    let (service, store) = setup().await;
    let created = service
        .create(payload(json!({
            "target_url": "https://a.example.com",
            "type": "project",
            "project_id": 1,
            "events": ["task_created"]
        })))
        .await
        .unwrap();
    assert_eq!(service.get(created.id).await.unwrap().last_status, None);

    let now = Utc::now();
    store
        .record_delivery(NewDelivery::new(created.id, "task_created", Some(200)).delivered_at(now))
        .await
        .unwrap();
    store
        .record_delivery(
            NewDelivery::new(created.id, "task_created", Some(503))
                .delivered_at(now - Duration::hours(1)),
        )
        .await
        .unwrap();

    assert_eq!(service.get(created.id).await.unwrap().last_status, Some(200));

    let deliveries = service.deliveries(created.id).await.unwrap();
    assert_eq!(deliveries.len(), 2);
    assert_eq!(deliveries[0].status_code, Some(200));

    let single = service.delivery(created.id, deliveries[1].id).await.unwrap();
    assert_eq!(single.status_code, Some(503));
}

#[tokio::test]
async fn test_update_revalidates_and_keeps_write_once_fields() {
    let (service, _store) = setup().await;
    let created = service
        .create(payload(json!({
            "target_url": "https://a.example.com",
            "type": "project",
            "project_id": 1,
            "events": ["task_created"]
        })))
        .await
        .unwrap();

    let bad_events: WebhookPatch =
        serde_json::from_value(json!({ "events": ["organization_updated"] })).unwrap();
    assert!(matches!(
        service.update(created.id, bad_events).await,
        Err(WebhookError::Validation(ValidationError::EventsNotAllowed { .. }))
    ));

    let change_scope: WebhookPatch =
        serde_json::from_value(json!({ "type": "organization" })).unwrap();
    assert!(matches!(
        service.update(created.id, change_scope).await,
        Err(WebhookError::Validation(ValidationError::WriteOnce { field: "type" }))
    ));

    let ok: WebhookPatch = serde_json::from_value(json!({
        "events": "job_updated,task_created",
        "enable_ssl": false
    }))
    .unwrap();
    let updated = service.update(created.id, ok).await.unwrap();
    assert_eq!(updated.events.to_joined(), "job_updated,task_created");
    assert!(!updated.enable_ssl);
    assert_eq!(updated.scope(), WebhookScope::Project);
}

#[tokio::test]
async fn test_delete_and_not_found() {
    let (service, _store) = setup().await;
    let created = service
        .create(payload(json!({
            "target_url": "https://a.example.com",
            "type": "organization",
            "organization_id": 2,
            "events": []
        })))
        .await
        .unwrap();

    service.delete(created.id).await.unwrap();
    assert!(matches!(
        service.get(created.id).await,
        Err(WebhookError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete(created.id).await,
        Err(WebhookError::NotFound { .. })
    ));
    assert!(matches!(
        service.deliveries(created.id).await,
        Err(WebhookError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_list_filters_by_scope() {
    let (service, _store) = setup().await;
    for (scope, reference, events) in [
        ("project", json!({ "project_id": 1 }), json!(["task_created"])),
        ("organization", json!({ "organization_id": 2 }), json!(["project_created"])),
        ("project", json!({ "project_id": 3 }), json!(["issue_created"])),
    ] {
        let mut body = json!({
            "target_url": "https://a.example.com",
            "type": scope,
            "events": events
        });
        for (key, value) in reference.as_object().unwrap() {
            body[key.as_str()] = value.clone();
        }
        service
            .create(payload(body))
            .await
            .unwrap();
    }

    let projects = service
        .list(&WebhookFilter {
            scope: Some(WebhookScope::Project),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(projects.len(), 2);
    assert!(projects.iter().all(|w| w.scope() == WebhookScope::Project));

    let catalog = service.events_catalog(WebhookScope::Organization);
    assert!(catalog.events.contains(&"project_created".to_string()));
}

#[tokio::test]
async fn test_missing_scope_reference_is_rejected() {
    let (service, store) = setup().await;

    for (scope, field) in [("project", "project_id"), ("organization", "organization_id")] {
        let err = service
            .create(payload(json!({
                "target_url": "https://a.example.com",
                "type": scope,
                "events": ["task_created"]
            })))
            .await
            .unwrap_err();

        match err {
            WebhookError::Validation(ValidationError::MissingReference { field: missing, .. }) => {
                assert_eq!(missing, field);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    let all = store.list_webhooks(&WebhookFilter::default()).await.unwrap();
    assert!(all.is_empty());
}

#[test]
fn test_payload_without_events_key_is_rejected() {
    let result = serde_json::from_value::<WebhookWritePayload>(json!({
        "target_url": "https://a.example.com",
        "type": "project",
        "project_id": 1
    }));
    assert!(result.is_err());

    let empty = payload(json!({
        "target_url": "https://a.example.com",
        "type": "project",
        "project_id": 1,
        "events": []
    }));
    assert!(empty.events.is_empty());
    assert!(empty.validate().is_ok());
}
