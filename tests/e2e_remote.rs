// EstateHub - tests/e2e_remote.rs
//
// End-to-end tests for the REST client against a local mock backend.
// Payloads are the seed catalog serialised with the real serde model,
// so the wire shape under test is the one the client sends and expects.

use estatehub::app::session::SessionStore;
use estatehub::app::state::AppState;
use estatehub::app::store::Marketplace;
use estatehub::core::model::{ContactRequest, Role};
use estatehub::core::seed;
use estatehub::platform::api::{ApiClient, NewUserPayload};
use estatehub::platform::config::AppConfig;
use estatehub::util::error::ApiError;
use mockito::Matcher;
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.url())).unwrap()
}

fn buyer_requests(buyer_id: &str) -> Vec<ContactRequest> {
    seed::contact_requests()
        .into_iter()
        .filter(|r| r.buyer_id == buyer_id)
        .collect()
}

#[tokio::test]
async fn e2e_buyer_feed_fetches_both_endpoints() {
    let mut server = mockito::Server::new_async().await;
    let listings = server
        .mock("GET", "/api/listings/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&seed::properties()[..2]).unwrap())
        .create_async()
        .await;
    let requests = server
        .mock("GET", "/api/contact-requests/")
        .match_query(Matcher::UrlEncoded("buyer_id".into(), "user-1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&buyer_requests("user-1")).unwrap())
        .create_async()
        .await;

    let feed = client_for(&server).fetch_buyer_feed("user-1").await.unwrap();

    assert_eq!(feed.properties.len(), 2);
    assert_eq!(feed.properties[0].id, "property-1");
    assert_eq!(feed.requests.len(), 2);
    listings.assert_async().await;
    requests.assert_async().await;
}

#[tokio::test]
async fn e2e_failed_feed_keeps_previous_state() {
    let mut server = mockito::Server::new_async().await;
    let _listings = server
        .mock("GET", "/api/listings/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let _requests = server
        .mock("GET", "/api/contact-requests/")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let mut state = AppState::new(
        AppConfig::default(),
        Marketplace::seeded(),
        SessionStore::seeded(None),
    );
    let api = client_for(&server);
    let err = state.refresh_buyer_feed(&api, "user-1").await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    // No partial update: the empty listings response was not applied.
    assert_eq!(state.market.properties.len(), 5);
    assert_eq!(state.filtered_indices.len(), 5);
}

#[tokio::test]
async fn e2e_successful_feed_replaces_listings() {
    let mut server = mockito::Server::new_async().await;
    let _listings = server
        .mock("GET", "/api/listings/")
        .with_status(200)
        .with_body(serde_json::to_string(&seed::properties()[4..]).unwrap())
        .create_async()
        .await;
    let _requests = server
        .mock("GET", "/api/contact-requests/")
        .match_query(Matcher::UrlEncoded("buyer_id".into(), "user-2".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let mut state = AppState::new(
        AppConfig::default(),
        Marketplace::seeded(),
        SessionStore::seeded(None),
    );
    state
        .refresh_buyer_feed(&client_for(&server), "user-2")
        .await
        .unwrap();

    assert_eq!(state.market.properties.len(), 1);
    assert_eq!(state.property_page().items[0].id, "property-5");
    assert!(state.market.requests.iter().all(|r| r.buyer_id != "user-2"));
}

#[tokio::test]
async fn e2e_undecodable_body_is_network_failure() {
    let mut server = mockito::Server::new_async().await;
    let _users = server
        .mock("GET", "/api/users/")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let err = client_for(&server).fetch_users().await.unwrap_err();
    assert!(matches!(err, ApiError::NetworkFailure { ref endpoint, .. } if endpoint == "/users/"));
}

#[tokio::test]
async fn e2e_fetch_users_decodes_directory() {
    let mut server = mockito::Server::new_async().await;
    let _users = server
        .mock("GET", "/api/users/")
        .with_status(200)
        .with_body(serde_json::to_string(&seed::users()).unwrap())
        .create_async()
        .await;

    let users = client_for(&server).fetch_users().await.unwrap();
    assert_eq!(users.len(), 7);
    assert_eq!(users[6].role, Role::Admin);
}

#[tokio::test]
async fn e2e_create_user_posts_payload() {
    let mut server = mockito::Server::new_async().await;
    let created = server
        .mock("POST", "/api/users/")
        .match_body(Matcher::PartialJson(json!({
            "email": "dana@example.com",
            "role": "seller"
        })))
        .with_status(201)
        .with_body(
            json!({
                "id": "user-8",
                "name": "Dana Lee",
                "email": "dana@example.com",
                "role": "seller",
                "createdAt": "2024-05-01T00:00:00Z"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let payload = NewUserPayload {
        name: "Dana Lee".to_string(),
        email: "dana@example.com".to_string(),
        password: "pw".to_string(),
        role: Role::Seller,
    };
    let user = client_for(&server).create_user(&payload).await.unwrap();

    assert_eq!(user.id, "user-8");
    assert_eq!(user.avatar, None);
    created.assert_async().await;
}
