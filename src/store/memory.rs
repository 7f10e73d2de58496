/// 메모리 저장소 구현체
/// 데이터베이스 없이 서버를 띄우거나 테스트할 때 사용한다.
/// 모든 테이블을 하나의 뮤텍스로 보호하므로 각 연산은 원자적이다.
// region:    --- Imports
use super::{
    BidRepository, CommentRepository, ListingRepository, SessionRepository, StoreError,
    StoreResult, UserRepository, WatchlistRepository,
};
use crate::auction::{
    Amount, Bid, BidOutcome, BidSummary, Comment, Listing, NewListing, NewUser, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::Mutex;

// endregion: --- Imports

// region:    --- Memory State
#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    sessions: HashMap<String, i64>,
    listings: Vec<Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    // (user_id, listing_id) -> 추가 순번
    watchlist: HashMap<(i64, i64), u64>,
    watch_seq: u64,
}

impl MemoryState {
    fn next_id(len: usize) -> i64 {
        len as i64 + 1
    }

    fn listing(&self, listing_id: i64) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == listing_id)
    }

    fn user(&self, user_id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    fn max_bid(&self, listing_id: i64) -> Option<Amount> {
        self.bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .map(|b| b.amount)
            .max()
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    listings
}
// endregion: --- Memory State

// region:    --- Listings
#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn create_listing(&self, listing: NewListing) -> StoreResult<Listing> {
        let mut state = self.state.lock().await;
        let created = Listing {
            id: MemoryState::next_id(state.listings.len()),
            name: listing.name,
            category: listing.category,
            starting_price: listing.starting_price,
            description: listing.description,
            image_url: listing.image_url,
            owner_id: listing.owner_id,
            active: true,
            winner_id: None,
            created_at: Utc::now(),
        };
        state.listings.push(created.clone());
        Ok(created)
    }

    async fn get_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>> {
        let state = self.state.lock().await;
        Ok(state.listing(listing_id).cloned())
    }

    async fn list_listings(&self) -> StoreResult<Vec<Listing>> {
        let state = self.state.lock().await;
        Ok(newest_first(state.listings.clone()))
    }

    async fn list_by_category(&self, category: &str) -> StoreResult<Vec<Listing>> {
        let state = self.state.lock().await;
        let listings = state
            .listings
            .iter()
            .filter(|l| l.category == category)
            .cloned()
            .collect();
        Ok(newest_first(listings))
    }

    async fn list_categories(&self) -> StoreResult<Vec<String>> {
        let state = self.state.lock().await;
        let categories: BTreeSet<String> = state
            .listings
            .iter()
            .filter(|l| !l.category.is_empty())
            .map(|l| l.category.clone())
            .collect();
        Ok(categories.into_iter().collect())
    }

    async fn close_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>> {
        let mut state = self.state.lock().await;

        // 최고 금액, 동일 금액이면 먼저 들어온 입찰
        let winner_id = state
            .bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .max_by(|a, b| a.amount.cmp(&b.amount).then(b.id.cmp(&a.id)))
            .map(|b| b.bidder_id);

        let Some(listing) = state.listings.iter_mut().find(|l| l.id == listing_id) else {
            return Ok(None);
        };
        if listing.active {
            listing.active = false;
            listing.winner_id = winner_id;
        }
        Ok(Some(listing.clone()))
    }
}
// endregion: --- Listings

// region:    --- Bids
#[async_trait]
impl BidRepository for InMemoryStore {
    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Amount,
        at: DateTime<Utc>,
    ) -> StoreResult<BidOutcome> {
        let mut state = self.state.lock().await;

        let Some(listing) = state.listing(listing_id) else {
            return Ok(BidOutcome::ListingNotFound);
        };
        if !listing.active {
            return Ok(BidOutcome::AuctionClosed);
        }

        let current_max = state.max_bid(listing_id).unwrap_or(listing.starting_price);
        if amount <= current_max {
            return Ok(BidOutcome::TooLow { current_max });
        }

        let bid = Bid {
            id: MemoryState::next_id(state.bids.len()),
            listing_id,
            bidder_id,
            amount,
            created_at: at,
        };
        state.bids.push(bid.clone());
        Ok(BidOutcome::Accepted(bid))
    }

    async fn bid_summary(&self, listing_id: i64) -> StoreResult<BidSummary> {
        let state = self.state.lock().await;
        let bid_count = state
            .bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .count() as i64;
        Ok(BidSummary {
            bid_count,
            max_bid: state.max_bid(listing_id),
        })
    }

    async fn list_bids(&self, listing_id: i64) -> StoreResult<Vec<Bid>> {
        let state = self.state.lock().await;
        Ok(state
            .bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .cloned()
            .collect())
    }
}
// endregion: --- Bids

// region:    --- Comments
#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        body: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Comment> {
        let mut state = self.state.lock().await;
        let author_username = state
            .user(author_id)
            .map(|u| u.username.clone())
            .unwrap_or_default();
        let comment = Comment {
            id: MemoryState::next_id(state.comments.len()),
            listing_id,
            author_id,
            author_username,
            body: body.to_string(),
            created_at: at,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, listing_id: i64) -> StoreResult<Vec<Comment>> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect())
    }
}
// endregion: --- Comments

// region:    --- Watchlist
#[async_trait]
impl WatchlistRepository for InMemoryStore {
    async fn toggle_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        if state.watchlist.remove(&(user_id, listing_id)).is_some() {
            return Ok(false);
        }
        state.watch_seq += 1;
        let seq = state.watch_seq;
        state.watchlist.insert((user_id, listing_id), seq);
        Ok(true)
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        let state = self.state.lock().await;
        Ok(state.watchlist.contains_key(&(user_id, listing_id)))
    }

    async fn watchlist_for(&self, user_id: i64) -> StoreResult<Vec<Listing>> {
        let state = self.state.lock().await;
        let mut entries: Vec<(u64, i64)> = state
            .watchlist
            .iter()
            .filter(|((uid, _), _)| *uid == user_id)
            .map(|((_, listing_id), seq)| (*seq, *listing_id))
            .collect();
        // 최근 추가순
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(entries
            .into_iter()
            .filter_map(|(_, listing_id)| state.listing(listing_id).cloned())
            .collect())
    }
}
// endregion: --- Watchlist

// region:    --- Users & Sessions
#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        let created = User {
            id: MemoryState::next_id(state.users.len()),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, user_id: i64) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.user(user_id).cloned())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create_session(&self, token: &str, user_id: i64) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.sessions.insert(token.to_string(), user_id);
        Ok(())
    }

    async fn session_user(&self, token: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .get(token)
            .and_then(|user_id| state.user(*user_id))
            .cloned())
    }

    async fn delete_session(&self, token: &str) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.sessions.remove(token);
        Ok(())
    }
}
// endregion: --- Users & Sessions
