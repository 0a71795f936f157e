mod common;

use adpatterns_core::domain::{Platform, ProductPayload, SuggestionCriteria};
use adpatterns_core::ports::{
    AuthService, CampaignService, KeyValueStore, PortError, Registration, SuggestionService,
};
use adpatterns_core::publish::PublishFlow;
use adpatterns_core::suggestions::fetch_suggestions;
use adpatterns_core::{CampaignDraft, DraftStore};
use chrono::Utc;
use common::{start_backend, PASSWORD, TOKEN};
use dashboard_lib::adapters::{
    BackendClient, HttpAuthAdapter, HttpCampaignAdapter, HttpSuggestionAdapter, JsonFileStore,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn client(url: &str) -> BackendClient {
    BackendClient::new(url, Duration::from_secs(5)).unwrap()
}

fn criteria(price: Option<&str>) -> SuggestionCriteria {
    let payload = ProductPayload {
        category: Some("Clothing".to_string()),
        price: price.map(str::to_string),
        ..Default::default()
    };
    SuggestionCriteria::from_payload(&payload, Platform::Google)
}

#[tokio::test]
async fn suggestions_are_decoded() {
    let (url, backend) = start_backend().await;
    let adapter = HttpSuggestionAdapter::new(client(&url));

    let result = adapter.generate_suggestions(&criteria(Some("799"))).await.unwrap();
    assert_eq!(result.headlines.len(), 3);
    assert_eq!(result.cta, "Shop Now");
    assert_eq!(result.total_matches, 12);
    assert_eq!(result.image_prompts, vec!["a model in a cotton shirt"]);
    assert!(!result.degraded);
    assert_eq!(backend.requests(), vec!["suggestions:Google"]);
}

#[tokio::test]
async fn failing_backend_degrades_to_empty_copy() {
    let (url, backend) = start_backend().await;
    *backend.suggestions_down.lock().unwrap() = true;
    let adapter = HttpSuggestionAdapter::new(client(&url));

    let err = adapter.generate_suggestions(&criteria(None)).await.unwrap_err();
    assert_eq!(err.to_string(), "Error generating suggestions");

    let result = fetch_suggestions(&adapter, &criteria(None)).await;
    assert!(result.degraded);
    assert!(result.is_empty());
    assert_eq!(result.cta, "Learn More");
}

#[tokio::test]
async fn unreachable_backend_is_an_unexpected_error() {
    // Nothing listens on port 9 of localhost.
    let adapter = HttpSuggestionAdapter::new(client("http://127.0.0.1:9"));
    let err = adapter.generate_suggestions(&criteria(None)).await.unwrap_err();
    assert!(matches!(err, PortError::Unexpected(_)));
}

#[tokio::test]
async fn login_returns_token_or_server_detail() {
    let (url, _backend) = start_backend().await;
    let adapter = HttpAuthAdapter::new(client(&url));

    assert_eq!(adapter.login("ada@example.com", PASSWORD).await.unwrap(), TOKEN);

    let err = adapter.login("ada@example.com", "nope").await.unwrap_err();
    assert!(matches!(err, PortError::Rejected(ref d) if d == "Incorrect email or password"));
}

#[tokio::test]
async fn register_surfaces_duplicate_email() {
    let (url, _backend) = start_backend().await;
    let adapter = HttpAuthAdapter::new(client(&url));
    let registration = Registration {
        full_name: "Ada".to_string(),
        email: "taken@example.com".to_string(),
        phone_number: "9999999999".to_string(),
        password: PASSWORD.to_string(),
    };
    let err = adapter.register(&registration).await.unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");
}

fn sample_campaign() -> adpatterns_core::CampaignCreate {
    let draft: CampaignDraft = adpatterns_core::draft::build_draft(
        &ProductPayload::default(),
        Platform::Meta,
        &Default::default(),
    );
    draft.to_campaign_create(None, Platform::Meta, Utc::now())
}

#[tokio::test]
async fn created_campaign_id_may_come_as_underscore_id() {
    let (url, backend) = start_backend().await;
    let adapter = HttpCampaignAdapter::new(client(&url));

    let id = adapter.create_campaign(TOKEN, &sample_campaign()).await.unwrap();
    assert_eq!(id, "camp-42");
    adapter.publish_campaign(TOKEN, &id).await.unwrap();
    assert_eq!(backend.requests(), vec!["create:draft", "publish:camp-42"]);

    let sent = backend.last_campaign.lock().unwrap().clone().unwrap();
    assert_eq!(sent["platform"], "meta");
    assert_eq!(sent["ad_creative"]["link_url"], "https://example.com");
}

#[tokio::test]
async fn bad_token_is_rejected_with_detail() {
    let (url, _backend) = start_backend().await;
    let adapter = HttpCampaignAdapter::new(client(&url));
    let err = adapter.create_campaign("stale", &sample_campaign()).await.unwrap_err();
    assert_eq!(err.to_string(), "Could not validate credentials");
}

#[tokio::test]
async fn publish_retry_skips_the_create_call() {
    let (url, backend) = start_backend().await;
    *backend.publish_failures.lock().unwrap() = 1;
    let adapter = HttpCampaignAdapter::new(client(&url));
    let mut flow = PublishFlow::new();

    let err = flow.publish(&adapter, Some(TOKEN), &sample_campaign()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to publish campaign");

    let id = flow.publish(&adapter, Some(TOKEN), &sample_campaign()).await.unwrap();
    assert_eq!(id, "camp-42");
    assert_eq!(
        backend.requests(),
        vec!["create:draft", "publish:camp-42", "publish:camp-42"]
    );
}

#[test]
fn file_store_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = JsonFileStore::open(&path);
    store.set("adpatterns_auth_token", "\"tok\"").unwrap();
    store.set("theme-preference", "\"dark\"").unwrap();
    store.remove("theme-preference").unwrap();
    drop(store);

    let reopened = JsonFileStore::open(&path);
    assert_eq!(reopened.get("adpatterns_auth_token").unwrap().as_deref(), Some("\"tok\""));
    assert_eq!(reopened.get("theme-preference").unwrap(), None);

    let drafts = DraftStore::new(Arc::new(reopened));
    assert_eq!(drafts.auth_token().as_deref(), Some("tok"));
}

#[test]
fn malformed_store_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = DraftStore::new(Arc::new(JsonFileStore::open(&path)));
    assert_eq!(store.last_payload(), None);
    assert_eq!(store.selected_platform(), Platform::Meta);

    assert!(store.save_platform(Platform::LinkedIn));
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("adpatterns_selected_platform"));
}
