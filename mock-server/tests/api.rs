use axum::http::{self, Request, StatusCode};
use echo_server::{app, app_with_journal, Echo, Journal};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reports_method_uri_and_body() {
    let resp = app()
        .oneshot(request("POST", "/echo/runtime/tasks?ignored=1", "hello"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.uri, "/echo/runtime/tasks?ignored=1");
    assert_eq!(echo.body, "hello");
}

#[tokio::test]
async fn echo_keeps_repeated_headers() {
    let req = Request::builder()
        .method("GET")
        .uri("/echo")
        .header(http::header::AUTHORIZATION, "Bearer t")
        .header(http::header::AUTHORIZATION, "Basic dTpw")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.header_values("authorization"), vec!["Bearer t", "Basic dTpw"]);
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn echo_accepts_delete() {
    let resp = app().oneshot(request("DELETE", "/echo/items/3", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "DELETE");
    assert_eq!(echo.uri, "/echo/items/3");
}

#[tokio::test]
async fn echo_appends_to_journal() {
    let journal = Journal::default();
    let resp = app_with_journal(journal.clone())
        .oneshot(request("PUT", "/echo", r#"{"a":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let seen = journal.read().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "PUT");
    assert_eq!(seen[0].body, r#"{"a":1}"#);
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code() {
    let resp = app().oneshot(request("GET", "/status/503", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_bytes(resp).await, "Service Unavailable");
}

#[tokio::test]
async fn status_rejects_out_of_range_code() {
    let resp = app().oneshot(request("GET", "/status/1000", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_rejects_non_numeric_code() {
    let resp = app().oneshot(request("GET", "/status/teapot", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- mirror ---

#[tokio::test]
async fn mirror_returns_body_verbatim() {
    let body = r#"{"nested":{"list":[1,2.5,"x"]},"flag":true}"#;
    let resp = app().oneshot(request("PUT", "/mirror", body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, body);
}

#[tokio::test]
async fn mirror_rejects_get() {
    let resp = app().oneshot(request("GET", "/mirror", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- big ---

#[tokio::test]
async fn big_returns_body_of_requested_length() {
    let resp = app().oneshot(request("GET", "/big/2048", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(body.len(), 2048);
    assert!(body.iter().all(|b| *b == b'a'));
}

// --- slow ---

#[tokio::test]
async fn slow_responds_after_delay() {
    let resp = app().oneshot(request("GET", "/slow/10", "")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "done");
}
