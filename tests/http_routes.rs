use auction_web::config::{AppConfig, StoreBackend};
use auction_web::routes::{build_router, AppState};
use auction_web::store::InMemoryStore;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

// region:    --- Helpers
fn app() -> Router {
    let config = AppConfig {
        store_backend: StoreBackend::Memory,
        ..AppConfig::default()
    };
    build_router(AppState::new(Arc::new(InMemoryStore::new()), config))
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("요청 처리 실패")
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers().get(LOCATION).unwrap().to_str().unwrap()
}

/// 회원 가입 후 세션 쿠키 반환
async fn register(app: &Router, username: &str) -> String {
    let body = format!(
        "username={0}&email={0}%40example.com&password=pw&confirmation=pw",
        username
    );
    let response = send(app, post_form("/register", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn create_listing(app: &Router, cookie: &str, name: &str, category: &str) {
    let body = format!(
        "name={}&category={}&starting_bid=10&description=desc&url=http%3A%2F%2Fimg",
        name, category
    );
    let response = send(app, post_form("/create_listing", &body, Some(cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}
// endregion: --- Helpers

#[tokio::test]
async fn test_bid_and_close_flow() {
    let app = app();
    let seller = register(&app, "seller").await;
    let bidder = register(&app, "bidder").await;
    create_listing(&app, &seller, "Lamp", "Home").await;

    // 입찰 성공
    let response = send(
        &app,
        post_form("/active_listing/1", "amount=12", Some(&bidder)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/active_listing/1");

    // 현재 최고가 이하 입찰 거절
    let response = send(
        &app,
        post_form("/active_listing/1", "amount=11", Some(&bidder)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["code"], "LOW_BID");
    assert_eq!(body["current_max"], "12.00");

    // 숫자가 아닌 입찰
    let response = send(
        &app,
        post_form("/active_listing/1", "amount=abc", Some(&bidder)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, get("/active_listing/1", Some(&bidder))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = json_body(response).await;
    assert_eq!(view["bid_count"], 1);
    assert_eq!(view["max_bid"], "12.00");
    assert_eq!(view["owner"], "seller");
    assert_eq!(view["is_owner"], false);

    // 판매자가 아니면 종료 불가
    let response = send(&app, post_form("/close_bid", "listing_id=1", Some(&bidder))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, post_form("/close_bid", "listing_id=1", Some(&seller))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let view = json_body(send(&app, get("/active_listing/1", None)).await).await;
    assert_eq!(view["listing"]["active"], false);
    assert_eq!(view["winner"], "bidder");
}

#[tokio::test]
async fn test_anonymous_actions_redirect_to_login() {
    let app = app();
    for request in [
        post_form("/watchlist", "listing_id=1", None),
        post_form("/active_listing/1", "amount=5", None),
        get("/watchlist", None),
        get("/create_listing", None),
    ] {
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }
}

#[tokio::test]
async fn test_unknown_listing_is_not_found() {
    let app = app();
    let response = send(&app, get("/active_listing/77", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_close_bid_rejects_bad_listing_id() {
    let app = app();
    let seller = register(&app, "seller").await;

    let response = send(&app, post_form("/close_bid", "listing_id=abc", Some(&seller))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "VALIDATION");

    let response = send(&app, post_form("/close_bid", "listing_id=999", Some(&seller))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        post_form("/comment", "listing_id=999&comment=hi", Some(&seller)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_errors() {
    let app = app();
    let response = send(
        &app,
        post_form(
            "/register",
            "username=frank&email=&password=a&confirmation=b",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Passwords must match.");

    register(&app, "frank").await;
    let response = send(
        &app,
        post_form(
            "/register",
            "username=frank&email=&password=pw&confirmation=pw",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Username already taken.");
}

#[tokio::test]
async fn test_login_and_logout() {
    let app = app();
    register(&app, "gina").await;

    let response = send(
        &app,
        post_form("/login", "username=gina&password=wrong", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, post_form("/login", "username=gina&password=pw", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = send(&app, get("/watchlist", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // 로그아웃 후 세션 무효
    let response = send(&app, get("/watchlist", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_index_categories_and_watchlist() {
    let app = app();
    let seller = register(&app, "seller").await;
    create_listing(&app, &seller, "Lamp", "Home").await;
    create_listing(&app, &seller, "Novel", "Books").await;
    create_listing(&app, &seller, "Chair", "Home").await;

    let index = json_body(send(&app, get("/", None)).await).await;
    assert_eq!(index["categories"], serde_json::json!(["Books", "Home"]));
    assert_eq!(index["listings"].as_array().unwrap().len(), 3);

    let category = json_body(send(&app, get("/category/Home", None)).await).await;
    assert_eq!(category["category"], "Home");
    assert_eq!(category["listings"].as_array().unwrap().len(), 2);

    // 관심 목록 토글 두 번
    let response = send(&app, post_form("/watchlist", "listing_id=2", Some(&seller))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/watchlist");
    let watchlist = json_body(send(&app, get("/watchlist", Some(&seller))).await).await;
    assert_eq!(watchlist["listings"][0]["name"], "Novel");

    let view = json_body(send(&app, get("/active_listing/2", Some(&seller))).await).await;
    assert_eq!(view["watching"], true);
    assert_eq!(view["is_owner"], true);

    send(&app, post_form("/watchlist", "listing_id=2", Some(&seller))).await;
    let watchlist = json_body(send(&app, get("/watchlist", Some(&seller))).await).await;
    assert!(watchlist["listings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_flow() {
    let app = app();
    let seller = register(&app, "seller").await;
    create_listing(&app, &seller, "Lamp", "").await;

    let response = send(
        &app,
        post_form("/comment", "listing_id=1&comment=Nice+lamp", Some(&seller)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/active_listing/1");

    let response = send(
        &app,
        post_form("/comment", "listing_id=1&comment=", Some(&seller)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let view = json_body(send(&app, get("/active_listing/1", None)).await).await;
    assert_eq!(view["comments"].as_array().unwrap().len(), 1);
    assert_eq!(view["comments"][0]["body"], "Nice lamp");
    assert_eq!(view["comments"][0]["author_username"], "seller");
}

#[tokio::test]
async fn test_health() {
    let response = send(&app(), get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}
