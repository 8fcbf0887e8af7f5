use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use server::auth::ServerState;
use server::routes;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

async fn build_app() -> anyhow::Result<Router> {
    // Use DATABASE_URL from the environment; tests are skipped without it.
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("missing DATABASE_URL"))?;
    let db_cfg = configs::DatabaseConfig {
        url,
        max_connections: 10,
        min_connections: 2,
        connect_timeout_secs: 30,
        acquire_timeout_secs: 30,
        sqlx_logging: false,
    };
    let db = models::db::connect(&db_cfg).await?;
    migration::Migrator::up(&db, None).await?;
    let state = ServerState::new(db, "test-secret");
    Ok(routes::build_router(cors(), state))
}

fn skip() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

async fn send(app: &mut Router, req: Request<Body>) -> anyhow::Result<Response> {
    Ok(app.call(req).await?)
}

async fn body_json(resp: Response) -> anyhow::Result<Value> {
    let bytes = resp.into_body().collect().await?.to_bytes();
    if bytes.is_empty() {
        return Ok(json!(null));
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri).header("x-auth", token);
    match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

fn unique_email() -> String {
    format!("user_{}@example.com", Uuid::new_v4())
}

/// Register a fresh user and return (email, token).
async fn register(app: &mut Router, password: &str) -> anyhow::Result<(String, String)> {
    let email = unique_email();
    let resp = send(
        app,
        json_request("POST", "/users", json!({"email": email, "password": password})),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let token = resp
        .headers()
        .get("x-auth")
        .expect("x-auth header")
        .to_str()?
        .to_string();
    Ok((email, token))
}

#[tokio::test]
async fn register_returns_user_body_and_token_header() -> anyhow::Result<()> {
    if skip() {
        return Ok(());
    }
    let mut app = build_app().await?;

    let email = unique_email();
    let resp = send(
        &mut app,
        json_request("POST", "/users", json!({"email": email, "password": "hunter2!"})),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-auth").is_some());

    let body = body_json(resp).await?;
    assert_eq!(body["email"], email);
    assert!(body["id"].is_string());
    // The external representation carries id and email, nothing else.
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password_hash").is_none());
    assert!(body.get("tokens").is_none());
    Ok(())
}

#[tokio::test]
async fn register_validation_failures_are_400() -> anyhow::Result<()> {
    if skip() {
        return Ok(());
    }
    let mut app = build_app().await?;

    // Bad email
    let resp = send(
        &mut app,
        json_request("POST", "/users", json!({"email": "nope", "password": "hunter2!"})),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await?;
    assert!(body["errors"]["email"].is_string());

    // Short password
    let resp = send(
        &mut app,
        json_request("POST", "/users", json!({"email": unique_email(), "password": "tiny"})),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Duplicate email
    let email = unique_email();
    let req = json_request("POST", "/users", json!({"email": email, "password": "hunter2!"}));
    let resp = send(&mut app, req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let req = json_request("POST", "/users", json!({"email": email, "password": "hunter2!"}));
    let resp = send(&mut app, req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_succeeds_with_right_password_only() -> anyhow::Result<()> {
    if skip() {
        return Ok(());
    }
    let mut app = build_app().await?;
    let (email, _) = register(&mut app, "hunter2!").await?;

    let resp = send(
        &mut app,
        json_request("POST", "/users/login", json!({"email": email, "password": "wrong"})),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(
        &mut app,
        json_request("POST", "/users/login", json!({"email": email, "password": "hunter2!"})),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-auth").is_some());
    let body = body_json(resp).await?;
    assert_eq!(body["email"], email);
    Ok(())
}

#[tokio::test]
async fn me_requires_a_valid_token() -> anyhow::Result<()> {
    if skip() {
        return Ok(());
    }
    let mut app = build_app().await?;

    // No header: 401 with an empty JSON body.
    let resp = send(
        &mut app,
        Request::builder().method("GET").uri("/users/me").body(Body::empty())?,
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await?, json!({}));

    // Garbage token: same opaque 401.
    let resp = send(&mut app, authed_request("GET", "/users/me", "garbage", None)).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await?, json!({}));

    // Valid token resolves to the registered identity.
    let (email, token) = register(&mut app, "hunter2!").await?;
    let resp = send(&mut app, authed_request("GET", "/users/me", &token, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?["email"], email);
    Ok(())
}

#[tokio::test]
async fn todo_crud_end_to_end() -> anyhow::Result<()> {
    if skip() {
        return Ok(());
    }
    let mut app = build_app().await?;
    let (_, token) = register(&mut app, "hunter2!").await?;

    // Create
    let resp = send(
        &mut app,
        authed_request("POST", "/todos", &token, Some(json!({"text": "a"}))),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let created = body_json(resp).await?;
    assert_eq!(created["text"], "a");
    assert_eq!(created["completed"], false);
    assert_eq!(created["completedAt"], Value::Null);
    let id = created["id"].as_str().expect("id").to_string();

    // Empty body fails validation
    let resp = send(&mut app, authed_request("POST", "/todos", &token, Some(json!({})))).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // List is wrapped and owner-filtered
    let resp = send(&mut app, authed_request("GET", "/todos", &token, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = body_json(resp).await?;
    assert_eq!(listed["todos"].as_array().expect("todos").len(), 1);

    // Get one
    let resp = send(&mut app, authed_request("GET", &format!("/todos/{id}"), &token, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?["todo"]["text"], "a");

    // Valid-format but nonexistent id
    let missing = Uuid::new_v4();
    let resp =
        send(&mut app, authed_request("GET", &format!("/todos/{missing}"), &token, None)).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Malformed id never reaches the store
    let resp = send(&mut app, authed_request("GET", "/todos/123", &token, None)).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Complete it
    let resp = send(
        &mut app,
        authed_request("PATCH", &format!("/todos/{id}"), &token, Some(json!({"completed": true}))),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let done = body_json(resp).await?;
    assert_eq!(done["todo"]["completed"], true);
    assert!(done["todo"]["completedAt"].is_i64());

    // A patch omitting `completed` forces it back off
    let resp = send(
        &mut app,
        authed_request("PATCH", &format!("/todos/{id}"), &token, Some(json!({"text": "b"}))),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let undone = body_json(resp).await?;
    assert_eq!(undone["todo"]["text"], "b");
    assert_eq!(undone["todo"]["completed"], false);
    assert_eq!(undone["todo"]["completedAt"], Value::Null);

    // Patch misses are 400, malformed patch ids are 404
    let resp = send(
        &mut app,
        authed_request("PATCH", &format!("/todos/{missing}"), &token, Some(json!({"text": "x"}))),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let resp = send(
        &mut app,
        authed_request("PATCH", "/todos/123", &token, Some(json!({"text": "x"}))),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Delete returns the record; a second delete misses with 400
    let resp =
        send(&mut app, authed_request("DELETE", &format!("/todos/{id}"), &token, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?["todo"]["text"], "b");
    let resp =
        send(&mut app, authed_request("DELETE", &format!("/todos/{id}"), &token, None)).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn todos_are_invisible_across_owners() -> anyhow::Result<()> {
    if skip() {
        return Ok(());
    }
    let mut app = build_app().await?;
    let (_, owner_token) = register(&mut app, "hunter2!").await?;
    let (_, stranger_token) = register(&mut app, "hunter2!").await?;

    let resp = send(
        &mut app,
        authed_request("POST", "/todos", &owner_token, Some(json!({"text": "mine"}))),
    )
    .await?;
    let id = body_json(resp).await?["id"].as_str().expect("id").to_string();

    // Reads miss with 404, writes with 400; the body never admits the id exists.
    let resp = send(
        &mut app,
        authed_request("GET", &format!("/todos/{id}"), &stranger_token, None),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = send(
        &mut app,
        authed_request("DELETE", &format!("/todos/{id}"), &stranger_token, None),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Record is unchanged for its owner.
    let resp = send(
        &mut app,
        authed_request("GET", &format!("/todos/{id}"), &owner_token, None),
    )
    .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?["todo"]["text"], "mine");
    Ok(())
}

#[tokio::test]
async fn logout_revokes_exactly_this_session() -> anyhow::Result<()> {
    if skip() {
        return Ok(());
    }
    let mut app = build_app().await?;
    let (email, first) = register(&mut app, "hunter2!").await?;

    // Second session for the same account (multi-device).
    let resp = send(
        &mut app,
        json_request("POST", "/users/login", json!({"email": email, "password": "hunter2!"})),
    )
    .await?;
    let second = resp.headers().get("x-auth").expect("x-auth").to_str()?.to_string();

    let resp = send(&mut app, authed_request("DELETE", "/users/me/token", &first, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // The revoked token is dead, the other session still works.
    let resp = send(&mut app, authed_request("GET", "/users/me", &first, None)).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = send(&mut app, authed_request("GET", "/users/me", &second, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}
