//! Session controller integration tests

use serde_json::json;
use std::sync::Arc;
use tessera_core::{
    AuthConfig, KeyValueStorage, MemoryStorage, RegistrationForm, SessionStatus, TokenStore,
};
use tessera_http::{AuthClient, SessionController};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn controller_with_storage(server: &MockServer, storage: Arc<MemoryStorage>) -> SessionController {
    let client = AuthClient::builder()
        .base_url(server.uri())
        .token_store(TokenStore::new(storage))
        .build()
        .unwrap();
    SessionController::new(client)
}

fn controller(server: &MockServer) -> SessionController {
    controller_with_storage(server, Arc::new(MemoryStorage::new()))
}

fn user_json() -> serde_json::Value {
    json!({
        "id": 7,
        "cedula": "1712345678",
        "first_name": "Ana",
        "last_name": "Pérez",
        "is_active": true
    })
}

async fn mount_verify(server: &MockServer, token: &str, user: bool, times: u64) {
    let body = if user {
        json!({"isValid": true, "user": user_json()})
    } else {
        json!({"isValid": true})
    };
    Mock::given(method("GET"))
        .and(path("/auth/verify-token"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_initial_snapshot_is_unauthenticated() {
    let server = MockServer::start().await;
    let controller = controller(&server);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.status, SessionStatus::Unauthenticated);
    assert!(!snapshot.is_loading());
    assert_eq!(snapshot.revision, 0);
}

#[tokio::test]
async fn test_check_auth_status_with_valid_token() {
    let server = MockServer::start().await;
    mount_verify(&server, "access-1", true, 1).await;

    let mut controller = controller(&server);
    controller.client().tokens().save("access-1", "refresh-1", 3600);

    let snapshot = controller.check_auth_status().await;
    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.user().map(|u| u.id.as_str()), Some("7"));
    assert_eq!(snapshot.user().unwrap().full_name(), "Ana Pérez");
}

#[tokio::test]
async fn test_check_auth_status_without_tokens() {
    let server = MockServer::start().await;
    let mut controller = controller(&server);

    let snapshot = controller.check_auth_status().await;
    assert_eq!(snapshot.status, SessionStatus::Unauthenticated);
    assert_eq!(snapshot.error(), None);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_check_auth_status_recovers_with_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "access-2",
            "refreshToken": "refresh-2",
            "expiresIn": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_verify(&server, "access-2", true, 1).await;

    let storage = Arc::new(MemoryStorage::new());
    storage
        .set_many(&[(AuthConfig::REFRESH_TOKEN_KEY, "refresh-1".to_string())])
        .unwrap();
    let mut controller = controller_with_storage(&server, Arc::clone(&storage));

    let snapshot = controller.check_auth_status().await;
    assert!(snapshot.is_authenticated());
    assert_eq!(
        storage.get(AuthConfig::ACCESS_TOKEN_KEY).unwrap().as_deref(),
        Some("access-2")
    );
}

#[tokio::test]
async fn test_login_after_bootstrap_without_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_in": 3600,
                "user": user_json()
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    let snapshot = controller.check_auth_status().await;
    assert_eq!(snapshot.status, SessionStatus::Unauthenticated);

    let snapshot = controller.login("1712345678", "Secret123").await;
    assert!(snapshot.is_authenticated());
    assert_eq!(
        controller.client().tokens().access_token().as_deref(),
        Some("access-1")
    );
}

#[tokio::test]
async fn test_check_auth_status_refreshes_after_verify_outage() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/verify-token"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .and(body_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "access-2",
            "refreshToken": "refresh-2",
            "expiresIn": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_verify(&server, "access-2", true, 1).await;

    let mut controller = controller(&server);
    controller.client().tokens().save("access-1", "refresh-1", 3600);

    let snapshot = controller.check_auth_status().await;
    assert!(snapshot.is_authenticated());
    assert_eq!(
        controller.client().tokens().refresh_token().as_deref(),
        Some("refresh-2")
    );
}

#[tokio::test]
async fn test_check_auth_status_clears_unusable_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/verify-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"isValid": false})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    controller.client().tokens().save("access-1", "refresh-1", 3600);

    let snapshot = controller.check_auth_status().await;
    assert_eq!(snapshot.status, SessionStatus::Unauthenticated);
    assert_eq!(controller.client().tokens().tokens(), None);
}

#[tokio::test]
async fn test_login_with_user_in_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_in": 3600,
                "user": user_json()
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_verify(&server, "access-1", true, 0).await;

    let mut controller = controller(&server);
    let mut updates = controller.subscribe();

    let snapshot = controller.login("1712345678", "Secret123").await;
    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.user().unwrap().first_name, "Ana");
    // Authenticating then Authenticated
    assert_eq!(snapshot.revision, 2);

    assert!(updates.has_changed().unwrap());
    assert!(updates.borrow_and_update().is_authenticated());
}

#[tokio::test]
async fn test_login_fetches_profile_when_missing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_in": 3600
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_verify(&server, "access-1", true, 1).await;

    let mut controller = controller(&server);
    let snapshot = controller.login("1712345678", "Secret123").await;

    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.user().unwrap().national_id, "1712345678");
}

#[tokio::test]
async fn test_login_failure_then_logout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Credenciales inválidas"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    let snapshot = controller.login("1712345678", "wrong").await;
    assert_eq!(snapshot.error(), Some("Credenciales inválidas"));
    assert!(!snapshot.is_authenticated());

    let snapshot = controller.logout();
    assert_eq!(snapshot.status, SessionStatus::Unauthenticated);
    assert_eq!(snapshot.error(), None);
}

#[tokio::test]
async fn test_login_validation_failure_sets_error() {
    let server = MockServer::start().await;
    let mut controller = controller(&server);

    let snapshot = controller.login("", "").await;
    assert_eq!(
        snapshot.error(),
        Some("cedula: Cedula is required; password: Password is required")
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_leaves_session_logged_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"message": "Usuario registrado"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    let form = RegistrationForm {
        cedula: "1712345678".into(),
        password: "Secret123".into(),
        confirm_password: "Secret123".into(),
        first_name: "Ana".into(),
        last_name: "Pérez".into(),
        ..RegistrationForm::default()
    };

    let snapshot = controller.register(&form).await;
    assert_eq!(snapshot.status, SessionStatus::Unauthenticated);
    assert_eq!(snapshot.notice.as_deref(), Some("Usuario registrado"));
    assert_eq!(controller.client().tokens().access_token(), None);
}

#[tokio::test]
async fn test_logout_clears_tokens() {
    let server = MockServer::start().await;
    mount_verify(&server, "access-1", false, 1).await;

    let mut controller = controller(&server);
    controller.client().tokens().save("access-1", "refresh-1", 3600);
    assert!(controller.check_auth_status().await.is_authenticated());
    assert_eq!(controller.snapshot().user(), None);

    let snapshot = controller.logout();
    assert_eq!(snapshot.status, SessionStatus::Unauthenticated);
    assert_eq!(controller.client().tokens().tokens(), None);
}
