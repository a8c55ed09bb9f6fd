//! End-to-end tests for the Axum HTTP layer.
//!
//! Run with: `cargo test --features axum_api --test e2e_axum`

#![cfg(feature = "axum_api")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use cookie::Cookie;
use crumbs::api::axum::gate_routes;
use crumbs::{AuthGate, CookieStore, KeyPair, SessionConfig, StaticCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn create_app() -> Router {
    let config = SessionConfig::development();
    let keys = KeyPair::generate(&config).unwrap();
    let store = CookieStore::new(config, keys).unwrap();
    let gate = AuthGate::new(Arc::new(store), StaticCode::new("code"));

    gate_routes::<StaticCode>().with_state(gate)
}

async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` pair a browser would send back, if the response set one.
fn cookie_pair(response: &Response<Body>) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().unwrap();
    let cookie = Cookie::parse(header.to_owned()).unwrap();
    Some(format!("{}={}", cookie.name(), cookie.value()))
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn login(form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/login")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(form.to_owned())).unwrap()
}

#[tokio::test]
async fn test_index_shows_login_form() {
    let app = create_app();

    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SET_COOKIE).is_none());

    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("name=\"code\""));
}

#[tokio::test]
async fn test_secret_without_cookie_redirects() {
    let app = create_app();

    let response = app.clone().oneshot(get("/secret", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/forbidden");
    let cookie = cookie_pair(&response).unwrap();

    let response = app
        .oneshot(get("/forbidden", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("you dont have access"));
}

#[tokio::test]
async fn test_login_then_secret() {
    let app = create_app();

    let response = app
        .clone()
        .oneshot(login("code=code&username=alice", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/secret");

    let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=900"));
    let cookie = cookie_pair(&response).unwrap();

    let response = app.oneshot(get("/secret", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("alice"));
}

#[tokio::test]
async fn test_empty_code_flashes_shown_once() {
    let app = create_app();

    let response = app
        .clone()
        .oneshot(login("code=&username=alice", None))
        .await
        .unwrap();
    assert_eq!(response.headers()[LOCATION], "/forbidden");
    let cookie = cookie_pair(&response).unwrap();

    let response = app
        .clone()
        .oneshot(get("/forbidden", Some(&cookie)))
        .await
        .unwrap();
    let drained = cookie_pair(&response).unwrap();
    let body = body_to_string(response.into_body()).await;
    let missing = body.find("must enter a code").unwrap();
    let incorrect = body.find("the code was incorrect").unwrap();
    assert!(missing < incorrect);

    let response = app
        .oneshot(get("/forbidden", Some(&drained)))
        .await
        .unwrap();
    let body = body_to_string(response.into_body()).await;
    assert!(!body.contains("must enter a code"));
}

#[tokio::test]
async fn test_user_name_is_escaped() {
    let app = create_app();

    let response = app
        .clone()
        .oneshot(login("code=code&username=%3Cscript%3E", None))
        .await
        .unwrap();
    let cookie = cookie_pair(&response).unwrap();

    let response = app.oneshot(get("/secret", Some(&cookie))).await.unwrap();
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("&lt;script&gt;"));
    assert!(!body.contains("<script>"));
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = create_app();

    let response = app
        .clone()
        .oneshot(login("code=code&username=alice", None))
        .await
        .unwrap();
    let cookie = cookie_pair(&response).unwrap();

    let response = app
        .clone()
        .oneshot(get("/logout", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/");
    let removal = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(removal.contains("Max-Age=0"));

    // A browser drops the cookie, so the next request carries none.
    let response = app.oneshot(get("/secret", None)).await.unwrap();
    assert_eq!(response.headers()[LOCATION], "/forbidden");
}

#[tokio::test]
async fn test_tampered_cookie_is_anonymous() {
    let app = create_app();

    let response = app
        .clone()
        .oneshot(login("code=code&username=alice", None))
        .await
        .unwrap();
    let mut cookie = cookie_pair(&response).unwrap();
    // The final character carries padding bits; change the one before it.
    let last = cookie.pop().unwrap();
    let second_last = cookie.pop().unwrap();
    cookie.push(if second_last == 'A' { 'B' } else { 'A' });
    cookie.push(last);

    let response = app.oneshot(get("/secret", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/forbidden");
}
