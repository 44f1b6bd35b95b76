use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use energycoop_server::{
    api::app_router,
    build_state,
    config::{AdminBootstrap, Config},
};

const ADMIN_EMAIL: &str = "root@energycoop.test";
const ADMIN_PASSWORD: &str = "root-password";

struct TestApp {
    router: Router,
    _tmp: TempDir,
}

async fn build_test_app() -> TestApp {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        db_path: tmp.path().join("test.db").to_string_lossy().into_owned(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(10),
        jwt_secret: Some("0123456789abcdef0123456789abcdef".to_string()),
        token_ttl: Duration::from_secs(600),
        admin: Some(AdminBootstrap {
            name: "Root".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        }),
    };
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config).unwrap(),
        _tmp: tmp,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Creates an organization and a customer inside it, returning the customer's token.
    async fn customer_token(&self, admin: &str) -> String {
        let (status, org) = self
            .send(
                Method::POST,
                "/api/v1/organizations",
                Some(admin),
                Some(json!({ "name": "Solar Valley" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{org}");

        let (status, user) = self
            .send(
                Method::POST,
                "/api/v1/users",
                Some(admin),
                Some(json!({
                    "name": "Marta",
                    "email": "marta@energycoop.test",
                    "password": "marta-password",
                    "organization_id": org["id"],
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{user}");
        assert_eq!(user["role"], "customer");

        self.login("marta@energycoop.test", "marta-password").await
    }
}

#[tokio::test]
async fn healthz_is_public() {
    let app = build_test_app().await;
    let (status, body) = app.send(Method::GET, "/api/v1/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn login_issues_a_bearer_token_for_the_bootstrapped_admin() {
    let app = build_test_app().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": ADMIN_EMAIL, "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);

    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, me) = app.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], ADMIN_EMAIL);
    assert_eq!(me["role"], "super-admin");
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn mutations_require_a_valid_token() {
    let app = build_test_app().await;
    let payload = json!({ "name": "Anonymous Coop" });

    let (status, _) = app
        .send(Method::POST, "/api/v1/organizations", None, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/organizations",
            Some("not-a-jwt"),
            Some(payload),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn customers_are_forbidden_from_admin_operations() {
    let app = build_test_app().await;
    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let customer = app.customer_token(&admin).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/regions",
            Some(&customer),
            Some(json!({ "name": "Andalucia", "code": "AN" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);

    let (status, _) = app
        .send(Method::GET, "/api/v1/contacts", Some(&customer), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn cash_movements_respect_the_available_balance() {
    let app = build_test_app().await;
    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let customer = app.customer_token(&admin).await;

    let (status, deposit) = app
        .send(
            Method::POST,
            "/api/v1/balances/deposit",
            Some(&customer),
            Some(json!({ "amount": 100, "payment_method": "card" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{deposit}");
    assert_eq!(deposit["transaction_type"], "deposit");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/balances/withdraw",
            Some(&customer),
            Some(json!({ "amount": 150 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/balances/withdraw",
            Some(&customer),
            Some(json!({ "amount": 40 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, summary) = app
        .send(Method::GET, "/api/v1/balances/summary", Some(&customer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["available_balance"].as_f64(), Some(60.0));
    assert_eq!(summary["current_balance"].as_f64(), Some(100.0));

    // The pending 40 is reserved, so the full completed balance is not withdrawable.
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/balances/withdraw",
            Some(&customer),
            Some(json!({ "amount": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/balances/deposit",
            Some(&customer),
            Some(json!({ "amount": -5 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["amount"].is_array(), "{body}");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/balances/deposit",
            Some(&customer),
            Some(json!({ "amount": "79228162514264337593543950335" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    assert!(body["errors"]["amount"].is_array(), "{body}");

    let (status, _) = app
        .send(Method::GET, "/api/v1/balances/summary", Some(&customer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn draft_articles_are_hidden_from_anonymous_readers() {
    let app = build_test_app().await;
    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, article) = app
        .send(
            Method::POST,
            "/api/v1/articles",
            Some(&admin),
            Some(json!({ "title": "Community Solar 101", "body": "Panels on every roof." })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{article}");
    assert_eq!(article["status"], "draft");
    let slug = article["slug"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/articles/slug/{slug}");
    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send(Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], article["id"]);
}

#[tokio::test]
async fn listings_use_the_pagination_envelope() {
    let app = build_test_app().await;
    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    for (name, code) in [("Aragon", "AR"), ("Castilla", "CL"), ("Galicia", "GA")] {
        let (status, _) = app
            .send(
                Method::POST,
                "/api/v1/regions",
                Some(&admin),
                Some(json!({ "name": name, "code": code })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = app
        .send(Method::GET, "/api/v1/regions?per_page=2", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["data"][0]["name"], "Aragon");
    assert_eq!(page["meta"]["total"], 3);
    assert_eq!(page["meta"]["last_page"], 2);
    assert_eq!(page["meta"]["from"], 1);
    assert_eq!(page["meta"]["to"], 2);
    assert_eq!(page["links"]["next"], "/api/v1/regions?per_page=2&page=2");
    assert!(page["links"]["prev"].is_null());
}

#[tokio::test]
async fn contact_form_is_public_but_inbox_is_not() {
    let app = build_test_app().await;

    let (status, contact) = app
        .send(
            Method::POST,
            "/api/v1/contacts",
            None,
            Some(json!({
                "name": "Luis",
                "email": "luis@example.com",
                "message": "How do I join the cooperative?",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{contact}");

    let (status, _) = app.send(Method::GET, "/api/v1/contacts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/contacts",
            None,
            Some(json!({ "name": "Luis" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);
}

#[tokio::test]
async fn out_of_range_pages_return_an_empty_listing() {
    let app = build_test_app().await;
    let (status, page) = app
        .send(Method::GET, "/api/v1/regions?page=9223372036854775807", None, None)
        .await;
    assert_eq!(status, StatusCode::OK, "{page}");
    assert!(page["data"].as_array().unwrap().is_empty());
    assert!(page["meta"]["from"].is_null());
}
