/// 저장소 인터페이스
/// 각 트레이트는 요청 핸들러가 필요로 하는 연산만 노출한다.
/// 확인 후 쓰기(check-then-act)가 필요한 연산은 구현체 안에서 원자적으로 처리한다.
// region:    --- Imports
use crate::auction::{
    Amount, Bid, BidOutcome, BidSummary, Comment, Listing, NewListing, NewUser, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

// endregion: --- Imports

// region:    --- Store Error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Username already taken")]
    DuplicateUsername,
}

pub type StoreResult<T> = Result<T, StoreError>;
// endregion: --- Store Error

// region:    --- Repository Traits
/// 상품 저장소
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create_listing(&self, listing: NewListing) -> StoreResult<Listing>;

    async fn get_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>>;

    /// 최신 등록순
    async fn list_listings(&self) -> StoreResult<Vec<Listing>>;

    async fn list_by_category(&self, category: &str) -> StoreResult<Vec<Listing>>;

    /// 빈 값을 제외한 카테고리 목록 (정렬)
    async fn list_categories(&self) -> StoreResult<Vec<String>>;

    /// 경매 종료: 최고 입찰자를 낙찰자로 지정하고 비활성화한다.
    /// 이미 종료된 상품은 변경하지 않고 그대로 반환한다.
    async fn close_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>>;
}

/// 입찰 원장
#[async_trait]
pub trait BidRepository: Send + Sync {
    /// 현재 최고가(없으면 시작 가격)보다 높을 때만 저장
    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Amount,
        at: DateTime<Utc>,
    ) -> StoreResult<BidOutcome>;

    async fn bid_summary(&self, listing_id: i64) -> StoreResult<BidSummary>;

    /// 입찰 순서대로
    async fn list_bids(&self, listing_id: i64) -> StoreResult<Vec<Bid>>;
}

/// 댓글 저장소
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        body: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Comment>;

    /// 작성 순서대로
    async fn list_comments(&self, listing_id: i64) -> StoreResult<Vec<Comment>>;
}

/// 관심 목록 저장소
#[async_trait]
pub trait WatchlistRepository: Send + Sync {
    /// 존재하면 삭제, 없으면 추가. 반환값은 토글 이후의 상태
    async fn toggle_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<bool>;

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> StoreResult<bool>;

    async fn watchlist_for(&self, user_id: i64) -> StoreResult<Vec<Listing>>;
}

/// 사용자 저장소
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 중복된 사용자명은 `StoreError::DuplicateUsername`
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, user_id: i64) -> StoreResult<Option<User>>;
}

/// 세션 저장소
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, token: &str, user_id: i64) -> StoreResult<()>;

    async fn session_user(&self, token: &str) -> StoreResult<Option<User>>;

    async fn delete_session(&self, token: &str) -> StoreResult<()>;
}

/// 전체 저장소
pub trait AuctionStore:
    ListingRepository
    + BidRepository
    + CommentRepository
    + WatchlistRepository
    + UserRepository
    + SessionRepository
{
}

impl<T> AuctionStore for T where
    T: ListingRepository
        + BidRepository
        + CommentRepository
        + WatchlistRepository
        + UserRepository
        + SessionRepository
{
}
// endregion: --- Repository Traits
