/// PostgreSQL 저장소 구현체
/// 입찰과 경매 종료는 상품 행을 `FOR UPDATE`로 잠근 트랜잭션 안에서 처리한다.
// region:    --- Imports
use super::{
    BidRepository, CommentRepository, ListingRepository, SessionRepository, StoreError,
    StoreResult, UserRepository, WatchlistRepository,
};
use crate::auction::{
    Amount, Bid, BidOutcome, BidSummary, Comment, Listing, NewListing, NewUser, User,
};
use crate::database::DatabaseManager;
use crate::query::queries;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Store
pub struct PostgresStore {
    db: Arc<DatabaseManager>,
}

impl PostgresStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

/// 유니크 제약 위반 여부
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
// endregion: --- Postgres Store

// region:    --- Listings
#[async_trait]
impl ListingRepository for PostgresStore {
    async fn create_listing(&self, listing: NewListing) -> StoreResult<Listing> {
        let created = sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
            .bind(&listing.name)
            .bind(&listing.category)
            .bind(listing.starting_price)
            .bind(&listing.description)
            .bind(&listing.image_url)
            .bind(listing.owner_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(created)
    }

    async fn get_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(listing)
    }

    async fn list_listings(&self) -> StoreResult<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(queries::GET_ALL_LISTINGS)
            .fetch_all(self.db.pool())
            .await?;
        Ok(listings)
    }

    async fn list_by_category(&self, category: &str) -> StoreResult<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(queries::GET_LISTINGS_BY_CATEGORY)
            .bind(category)
            .fetch_all(self.db.pool())
            .await?;
        Ok(listings)
    }

    async fn list_categories(&self) -> StoreResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(queries::GET_CATEGORIES)
            .fetch_all(self.db.pool())
            .await?;
        Ok(categories)
    }

    async fn close_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>> {
        self.db
            .transaction::<_, _, StoreError>(|tx| {
                Box::pin(async move {
                    let locked: Option<(bool, Amount)> = sqlx::query_as(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?;

                    let Some((active, _)) = locked else {
                        return Ok(None);
                    };

                    // 이미 종료된 경매는 그대로 반환
                    if !active {
                        let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING)
                            .bind(listing_id)
                            .fetch_optional(&mut **tx)
                            .await?;
                        return Ok(listing);
                    }

                    let winner_id: Option<i64> = sqlx::query_scalar(queries::GET_TOP_BIDDER)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?;

                    let listing = sqlx::query_as::<_, Listing>(queries::CLOSE_LISTING)
                        .bind(listing_id)
                        .bind(winner_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    info!(
                        "{:<12} --> 경매 종료 id: {}, 낙찰자: {:?}",
                        "Store", listing_id, winner_id
                    );
                    Ok(Some(listing))
                })
            })
            .await
    }
}
// endregion: --- Listings

// region:    --- Bids
#[async_trait]
impl BidRepository for PostgresStore {
    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Amount,
        at: DateTime<Utc>,
    ) -> StoreResult<BidOutcome> {
        self.db
            .transaction::<_, _, StoreError>(|tx| {
                Box::pin(async move {
                    let locked: Option<(bool, Amount)> = sqlx::query_as(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?;

                    let Some((active, starting_price)) = locked else {
                        return Ok(BidOutcome::ListingNotFound);
                    };
                    if !active {
                        return Ok(BidOutcome::AuctionClosed);
                    }

                    let max_bid: Option<Amount> = sqlx::query_scalar(queries::GET_MAX_BID)
                        .bind(listing_id)
                        .fetch_one(&mut **tx)
                        .await?;
                    let current_max = max_bid.unwrap_or(starting_price);

                    if amount <= current_max {
                        debug!(
                            "{:<12} --> 입찰 거절 id: {}, 현재 최고가: {}",
                            "Store", listing_id, current_max
                        );
                        return Ok(BidOutcome::TooLow { current_max });
                    }

                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(listing_id)
                        .bind(bidder_id)
                        .bind(amount)
                        .bind(at)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok(BidOutcome::Accepted(bid))
                })
            })
            .await
    }

    async fn bid_summary(&self, listing_id: i64) -> StoreResult<BidSummary> {
        let (bid_count, max_bid): (i64, Option<Amount>) =
            sqlx::query_as(queries::GET_BID_SUMMARY)
                .bind(listing_id)
                .fetch_one(self.db.pool())
                .await?;
        Ok(BidSummary { bid_count, max_bid })
    }

    async fn list_bids(&self, listing_id: i64) -> StoreResult<Vec<Bid>> {
        let bids = sqlx::query_as::<_, Bid>(queries::GET_BIDS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?;
        Ok(bids)
    }
}
// endregion: --- Bids

// region:    --- Comments
#[async_trait]
impl CommentRepository for PostgresStore {
    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        body: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(listing_id)
            .bind(author_id)
            .bind(body)
            .bind(at)
            .fetch_one(self.db.pool())
            .await?;
        Ok(comment)
    }

    async fn list_comments(&self, listing_id: i64) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(queries::GET_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?;
        Ok(comments)
    }
}
// endregion: --- Comments

// region:    --- Watchlist
#[async_trait]
impl WatchlistRepository for PostgresStore {
    async fn toggle_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        // 삭제된 행이 없을 때만 추가. 동시 요청은 기본키 충돌로 무시된다.
        let deleted = sqlx::query(queries::DELETE_WATCHLIST_ENTRY)
            .bind(user_id)
            .bind(listing_id)
            .execute(self.db.pool())
            .await?
            .rows_affected();
        if deleted > 0 {
            return Ok(false);
        }

        sqlx::query(queries::INSERT_WATCHLIST_ENTRY)
            .bind(user_id)
            .bind(listing_id)
            .execute(self.db.pool())
            .await?;
        Ok(true)
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(queries::EXISTS_WATCHLIST_ENTRY)
            .bind(user_id)
            .bind(listing_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(exists)
    }

    async fn watchlist_for(&self, user_id: i64) -> StoreResult<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(queries::GET_WATCHLIST)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?;
        Ok(listings)
    }
}
// endregion: --- Watchlist

// region:    --- Users & Sessions
#[async_trait]
impl UserRepository for PostgresStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateUsername
                } else {
                    StoreError::Database(e)
                }
            })
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(queries::GET_USER_BY_ID)
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl SessionRepository for PostgresStore {
    async fn create_session(&self, token: &str, user_id: i64) -> StoreResult<()> {
        sqlx::query(queries::INSERT_SESSION)
            .bind(token)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn session_user(&self, token: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(queries::GET_SESSION_USER)
            .bind(token)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(user)
    }

    async fn delete_session(&self, token: &str) -> StoreResult<()> {
        sqlx::query(queries::DELETE_SESSION)
            .bind(token)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}
// endregion: --- Users & Sessions
