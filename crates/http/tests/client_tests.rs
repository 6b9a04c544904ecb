//! Integration tests for the Voltbay HTTP client

use std::sync::Arc;
use voltbay_core::storage::{CredentialStore, MemoryCredentialStore};
use voltbay_core::types::TokenPair;
use voltbay_http::client::error::ClientError;
use voltbay_http::types::{CreateOrderRequest, ListingQuery, SendMessageRequest};
use voltbay_http::VoltbayClient;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Tesla Model 3 pack",
        "brand": "Tesla",
        "type": "lithium-ion",
        "voltage": "350V",
        "capacity": "75kWh",
        "condition": "used",
        "status": "available",
        "cycleCount": 420,
        "year": 2021,
        "price": 95_000_000i64,
        "location": "Ho Chi Minh City",
        "warranty": "6 months",
        "images": ["https://img.example/1.jpg"],
        "description": "Healthy pack, 92% SoH",
        "ownerId": "u-9"
    })
}

async fn client_with_tokens(base_url: &str, pair: TokenPair) -> VoltbayClient {
    let store = Arc::new(MemoryCredentialStore::with_tokens(pair).await);
    VoltbayClient::builder()
        .base_url(base_url)
        .credential_store(store)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_client_builder() {
    let client = VoltbayClient::builder()
        .base_url("http://localhost:8080/")
        .build();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = VoltbayClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_anonymous_requests_carry_no_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([listing_body("l-1")])))
        .mount(&mock_server)
        .await;

    let client = VoltbayClient::new(mock_server.uri()).unwrap();
    let listings = client.list_listings(&ListingQuery::default()).await.unwrap();
    assert_eq!(listings.len(), 1);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_authenticated_requests_carry_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/my-products"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        client_with_tokens(&mock_server.uri(), TokenPair::new("access-1", "refresh-1")).await;
    let listings = client.my_listings().await.unwrap();
    assert!(listings.is_empty());
}

#[tokio::test]
async fn test_listing_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("brand", "VinFast"))
        .and(query_param("maxPrice", "50000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = VoltbayClient::new(mock_server.uri()).unwrap();
    let query = ListingQuery {
        brand: Some("VinFast".into()),
        max_price: Some(50_000_000),
        ..ListingQuery::default()
    };
    client.list_listings(&query).await.unwrap();
}

#[tokio::test]
async fn test_login_persists_credential_pair() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "buyer@example.com",
            "password": "Str0ng!pass"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "access-1",
            "refreshToken": "refresh-1"
        })))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let client = VoltbayClient::builder()
        .base_url(mock_server.uri())
        .credential_store(store.clone())
        .build()
        .unwrap();

    let pair = client
        .login(voltbay_http::types::LoginRequest {
            email: "buyer@example.com".into(),
            password: "Str0ng!pass".into(),
        })
        .await
        .unwrap();

    assert_eq!(pair, TokenPair::new("access-1", "refresh-1"));
    assert_eq!(store.load_tokens().await.unwrap(), Some(pair));
    assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn test_register_validates_before_dispatch() {
    // No mock server needed: the request must never leave the client.
    let client = VoltbayClient::new("http://localhost:59999").unwrap();

    let err = client
        .register(voltbay_http::types::RegisterRequest {
            email: "not-an-email".into(),
            password: "Str0ng!pass".into(),
            full_name: None,
            phone: None,
            address: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let err = client
        .register(voltbay_http::types::RegisterRequest {
            email: "buyer@example.com".into(),
            password: "weak".into(),
            full_name: None,
            phone: None,
            address: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_business_error_message_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "insufficient wallet balance"
        })))
        .mount(&mock_server)
        .await;

    let client =
        client_with_tokens(&mock_server.uri(), TokenPair::new("access-1", "refresh-1")).await;
    let err = client
        .place_order(&CreateOrderRequest {
            product_id: "l-1".into(),
            payment_method: "wallet".into(),
            shipping_address: "12 Le Loi, District 1".into(),
            notes: None,
            shipping_fee: None,
        })
        .await
        .unwrap_err();

    match err {
        ClientError::BadRequest(message) => assert_eq!(message, "insufficient wallet balance"),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_mapping() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such listing"))
        .mount(&mock_server)
        .await;

    let client = VoltbayClient::new(mock_server.uri()).unwrap();
    let result = client.get_listing("missing").await;
    assert!(matches!(result, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn test_wallet_balance_decodes_string_amount() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wallets/users/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "w-1",
            "userId": "u-1",
            "balance": "150000"
        })))
        .mount(&mock_server)
        .await;

    let client =
        client_with_tokens(&mock_server.uri(), TokenPair::new("access-1", "refresh-1")).await;
    let wallet = client.wallet_for_user("u-1").await.unwrap();
    assert_eq!(wallet.balance.unwrap().to_string(), "150000");
}

#[tokio::test]
async fn test_top_up_returns_redirect_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/zalopay/create-order"))
        .and(body_json(json!({
            "amount": 200_000,
            "description": "Top up wallet"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "returncode": "1",
            "orderurl": "https://gateway.example/pay/ord-1"
        })))
        .mount(&mock_server)
        .await;

    let client =
        client_with_tokens(&mock_server.uri(), TokenPair::new("access-1", "refresh-1")).await;
    let url = client.create_top_up(200_000, "Top up wallet").await.unwrap();
    assert_eq!(url, "https://gateway.example/pay/ord-1");
}

#[tokio::test]
async fn test_top_up_gateway_decline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/zalopay/create-order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "returncode": "-49"
        })))
        .mount(&mock_server)
        .await;

    let client =
        client_with_tokens(&mock_server.uri(), TokenPair::new("access-1", "refresh-1")).await;
    let err = client.create_top_up(200_000, "Top up").await.unwrap_err();
    assert!(matches!(err, ClientError::GatewayDeclined(_)));
}

#[tokio::test]
async fn test_top_up_amount_bounds_checked_locally() {
    let client = VoltbayClient::new("http://localhost:59999").unwrap();
    let err = client.create_top_up(5_000, "Too small").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_chat_send_and_history() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chats/c-1/messages"))
        .and(body_json(json!({ "content": "Is the pack still available?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m-1",
            "chatId": "c-1",
            "content": "Is the pack still available?"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/chats/c-1/messages"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "m-1",
            "chatId": "c-1",
            "content": "Is the pack still available?"
        }])))
        .mount(&mock_server)
        .await;

    let client =
        client_with_tokens(&mock_server.uri(), TokenPair::new("access-1", "refresh-1")).await;

    let sent = client
        .send_chat_message(
            "c-1",
            &SendMessageRequest {
                content: "Is the pack still available?".into(),
                attachments: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(sent.id.as_deref(), Some("m-1"));

    let history = client.chat_messages("c-1", 1, 50).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_watch_messages_yields_only_new_messages() {
    use futures::StreamExt;
    use std::time::Duration;
    use tokio::time::timeout;

    let mock_server = MockServer::start().await;
    let m1 = json!({ "id": "m-1", "chatId": "c-1", "content": "hello" });
    let m2 = json!({ "id": "m-2", "chatId": "c-1", "content": "still available?" });

    // First poll sees one message, later polls see two.
    Mock::given(method("GET"))
        .and(path("/chats/c-1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([m1.clone()])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chats/c-1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([m1, m2])))
        .mount(&mock_server)
        .await;

    let client =
        client_with_tokens(&mock_server.uri(), TokenPair::new("access-1", "refresh-1")).await;
    let stream = client.watch_messages("c-1", Duration::from_millis(50));
    futures::pin_mut!(stream);

    let first = timeout(Duration::from_secs(2), stream.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(first.id.as_deref(), Some("m-1"));

    // The repeated m-1 is deduplicated; only m-2 comes through.
    let second = timeout(Duration::from_secs(2), stream.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(second.id.as_deref(), Some("m-2"));
}

#[tokio::test]
async fn test_profile_fetch_caches_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "email": "buyer@example.com",
            "fullName": "Binh Tran"
        })))
        .mount(&mock_server)
        .await;

    let store = Arc::new(
        MemoryCredentialStore::with_tokens(TokenPair::new("access-1", "refresh-1")).await,
    );
    let client = VoltbayClient::builder()
        .base_url(mock_server.uri())
        .credential_store(store.clone())
        .build()
        .unwrap();

    let profile = client.profile().await.unwrap();
    assert_eq!(profile.full_name.as_deref(), Some("Binh Tran"));
    assert_eq!(store.load_profile().await.unwrap(), Some(profile));
}
