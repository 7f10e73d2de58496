//! 실행 중인 서버(PostgreSQL 저장소)를 대상으로 하는 테스트.
//! `cargo test -- --ignored` 로 실행하며 `AUCTION_TEST_URL`(기본 http://localhost:3000)을 사용한다.
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

fn base_url() -> String {
    std::env::var("AUCTION_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// 리다이렉트를 따라가지 않는 클라이언트
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("클라이언트 생성 실패")
}

/// 테스트마다 겹치지 않는 사용자명
fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}_{}", prefix, nanos)
}

/// 회원 가입 후 세션 쿠키 반환
async fn register(client: &Client, username: &str) -> String {
    let response = client
        .post(format!("{}/register", base_url()))
        .form(&[
            ("username", username),
            ("email", "test@example.com"),
            ("password", "pw"),
            ("confirmation", "pw"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response.headers()[SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

/// 테스트용 상품 생성 후 id 반환
async fn create_test_listing(client: &Client, cookie: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/create_listing", base_url()))
        .header(COOKIE, cookie)
        .form(&[
            ("name", name),
            ("category", "IntegrationTest"),
            ("starting_bid", "10"),
            ("description", "통합 테스트를 위한 상품입니다."),
            ("url", ""),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let category: Value = client
        .get(format!("{}/category/IntegrationTest", base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    category["listings"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["name"] == name)
        .and_then(|l| l["id"].as_i64())
        .expect("등록한 상품을 찾을 수 없음")
}

/// 입찰 및 경매 종료 테스트
#[tokio::test]
#[ignore = "requires a running server backed by PostgreSQL"]
async fn test_place_bid_and_close() {
    let client = client();
    let seller = register(&client, &unique_name("seller")).await;
    let bidder_name = unique_name("bidder");
    let bidder = register(&client, &bidder_name).await;
    let listing_id = create_test_listing(&client, &seller, &unique_name("item")).await;
    let listing_url = format!("{}/active_listing/{}", base_url(), listing_id);

    for (amount, expected) in [
        ("12", StatusCode::SEE_OTHER),
        ("15", StatusCode::SEE_OTHER),
        ("11", StatusCode::CONFLICT),
    ] {
        let response = client
            .post(&listing_url)
            .header(COOKIE, &bidder)
            .form(&[("amount", amount)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), expected, "amount: {}", amount);
    }

    let view: Value = client.get(&listing_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(view["max_bid"], "15.00");
    assert_eq!(view["bid_count"], 2);

    let response = client
        .post(format!("{}/close_bid", base_url()))
        .header(COOKIE, &seller)
        .form(&[("listing_id", listing_id.to_string())])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");

    let view: Value = client.get(&listing_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(view["listing"]["active"], false);
    assert_eq!(view["winner"], bidder_name.as_str());
}

/// 동시성 입찰 테스트
#[tokio::test]
#[ignore = "requires a running server backed by PostgreSQL"]
async fn test_concurrent_bidding() {
    let client = client();
    let seller = register(&client, &unique_name("seller")).await;
    let bidder = register(&client, &unique_name("bidder")).await;
    let listing_id = create_test_listing(&client, &seller, &unique_name("item")).await;
    let listing_url = format!("{}/active_listing/{}", base_url(), listing_id);

    // 50개의 동시 입찰 (같은 금액 두 번씩)
    let mut handles = vec![];
    for i in 1..=50 {
        let client = client.clone();
        let bidder = bidder.clone();
        let listing_url = listing_url.clone();
        handles.push(tokio::spawn(async move {
            let amount = (10 + (i + 1) / 2).to_string();
            client
                .post(&listing_url)
                .header(COOKIE, bidder)
                .form(&[("amount", amount)])
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    let mut successful_bids = 0;
    let mut failed_bids = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::SEE_OTHER => successful_bids += 1,
            StatusCode::CONFLICT => failed_bids += 1,
            other => panic!("예상하지 못한 응답: {}", other),
        }
    }
    info!(
        "성공한 입찰 수: {}, 실패한 입찰 수: {}",
        successful_bids, failed_bids
    );

    let view: Value = client.get(&listing_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(view["bid_count"], successful_bids);
    assert!(successful_bids <= 25);
}

/// 관심 목록 토글 테스트
#[tokio::test]
#[ignore = "requires a running server backed by PostgreSQL"]
async fn test_watchlist_toggle() {
    let client = client();
    let user = register(&client, &unique_name("watcher")).await;
    let listing_id = create_test_listing(&client, &user, &unique_name("item")).await;

    for expected_len in [1, 0] {
        let response = client
            .post(format!("{}/watchlist", base_url()))
            .header(COOKIE, &user)
            .form(&[("listing_id", listing_id.to_string())])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let watchlist: Value = client
            .get(format!("{}/watchlist", base_url()))
            .header(COOKIE, &user)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(watchlist["listings"].as_array().unwrap().len(), expected_len);
    }
}
