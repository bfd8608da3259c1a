// Shared harness for driving the public router against in-memory storage.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wedding_server::{app, AppState, ServiceSettings};

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            router: app(AppState::in_memory(ServiceSettings::default())),
        }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("expected request to build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        let payload = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("expected json body")
        };
        (status, payload)
    }

    /// Registers an owner and returns a bearer token for them.
    pub async fn owner(&self, email: &str, full_name: &str) -> String {
        let (status, _) = self
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({"email": email, "full_name": full_name, "password": "correct-horse"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, payload) = self
            .send(
                "POST",
                "/auth/login",
                None,
                Some(json!({"email": email, "password": "correct-horse"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        payload["token"]
            .as_str()
            .expect("expected token")
            .to_string()
    }

    /// Creates a guest for the owner and returns (id, hash link).
    pub async fn guest(&self, token: &str, name: &str) -> (i64, String) {
        let (status, payload) = self
            .send("POST", "/me/guests", Some(token), Some(json!({"name": name})))
            .await;
        assert_eq!(status, StatusCode::OK);
        (
            payload["id"].as_i64().expect("expected guest id"),
            payload["hash_link"]
                .as_str()
                .expect("expected hash link")
                .to_string(),
        )
    }
}
