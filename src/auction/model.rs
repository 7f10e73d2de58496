use super::money::Amount;
use chrono::{DateTime, Utc};
use serde::Serialize;

// 사용자 모델
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// 경매 상품 모델
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub starting_price: Amount,
    pub description: String,
    pub image_url: String,
    pub owner_id: i64,
    pub active: bool,
    pub winner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
}

// 댓글 모델 (작성자 이름 포함)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// 신규 상품 등록 데이터 (검증 완료)
#[derive(Debug, Clone)]
pub struct NewListing {
    pub name: String,
    pub category: String,
    pub starting_price: Amount,
    pub description: String,
    pub image_url: String,
    pub owner_id: i64,
}

/// 신규 사용자 등록 데이터 (비밀번호는 해시 상태)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// 입찰 현황 (입찰 수, 최고 입찰가)
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BidSummary {
    pub bid_count: i64,
    pub max_bid: Option<Amount>,
}

/// 입찰 저장 결과
#[derive(Debug, Clone)]
pub enum BidOutcome {
    Accepted(Bid),
    TooLow { current_max: Amount },
    AuctionClosed,
    ListingNotFound,
}
