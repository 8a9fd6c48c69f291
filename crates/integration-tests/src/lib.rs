//! Integration tests for minik.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p minik-integration-tests
//! ```
//!
//! Tests drive the real admin router in-process with `tower::ServiceExt`.
//! The identity provider and the roles backend are replaced by a `wiremock`
//! server: the provider answers under `/identity`, the backend under
//! `/functions`.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use minik_admin::state::AppState;
use minik_admin::testing::{FAR_FUTURE, config, jwt};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the `listAdmins` endpoint on the mock server.
pub const LIST_ADMINS_PATH: &str = "/functions/listAdmins";

/// Path of the `setAdminRole` endpoint on the mock server.
pub const SET_ADMIN_ROLE_PATH: &str = "/functions/setAdminRole";

/// Email of the account `sign_in` uses.
pub const SIGNED_IN_EMAIL: &str = "root@x.com";

/// A response with its body read.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

/// The admin app wired to a mock backend, with a cookie jar of one.
pub struct TestApp {
    pub server: MockServer,
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let state = AppState::new(config(&server.uri()));

        Self {
            router: minik_admin::app(state),
            server,
            cookie: None,
        }
    }

    /// Sign in through `/auth/login` as an account with or without the
    /// admin claim.
    pub async fn sign_in(&mut self, admin: bool) -> TestResponse {
        self.sign_in_with(id_token(admin)).await
    }

    /// Sign in with a specific ID token, e.g. one that is about to expire.
    pub async fn sign_in_with(&mut self, id_token: String) -> TestResponse {
        let _guard = Mock::given(method("POST"))
            .and(path("/identity/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "u1",
                "email": SIGNED_IN_EMAIL,
                "idToken": id_token,
                "refreshToken": "refresh-1"
            })))
            .mount_as_scoped(&self.server)
            .await;

        self.post_form(
            "/auth/login",
            &format!("email={SIGNED_IN_EMAIL}&password=hunter22"),
        )
        .await
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri);
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// How many requests the mock server saw on `path`.
    pub async fn hits(&self, endpoint: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == endpoint)
            .count()
    }
}

/// Unsigned ID token that stays valid for the whole test run.
#[must_use]
pub fn id_token(admin: bool) -> String {
    id_token_expiring(admin, FAR_FUTURE)
}

/// Unsigned ID token expiring at `exp` (unix seconds).
#[must_use]
pub fn id_token_expiring(admin: bool, exp: i64) -> String {
    let claims = json!({
        "sub": "u1",
        "email": SIGNED_IN_EMAIL,
        "exp": exp,
        "admin": admin
    });
    jwt(&claims)
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
#[must_use]
pub fn occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
