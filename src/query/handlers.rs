// region:    --- Imports
use crate::auction::{Amount, Comment, Listing, User};
use crate::error::AppError;
use crate::store::AuctionStore;
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Views
/// 메인 페이지
#[derive(Debug, Serialize)]
pub struct IndexView {
    pub categories: Vec<String>,
    pub listings: Vec<Listing>,
}

/// 카테고리 페이지
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub category: String,
    pub listings: Vec<Listing>,
}

/// 상품 상세 페이지
#[derive(Debug, Serialize)]
pub struct ListingView {
    pub listing: Listing,
    pub owner: Option<String>,
    pub winner: Option<String>,
    pub bid_count: i64,
    /// 입찰이 없으면 시작 가격
    pub max_bid: Amount,
    pub comments: Vec<Comment>,
    pub watching: bool,
    pub is_owner: bool,
}

/// 관심 목록 페이지
#[derive(Debug, Serialize)]
pub struct WatchlistView {
    pub listings: Vec<Listing>,
}
// endregion: --- Views

// region:    --- Query Handlers

/// 모든 상품 + 카테고리 조회
pub async fn get_index(store: &dyn AuctionStore) -> Result<IndexView, AppError> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    Ok(IndexView {
        categories: store.list_categories().await?,
        listings: store.list_listings().await?,
    })
}

/// 카테고리별 상품 조회
pub async fn get_category(
    store: &dyn AuctionStore,
    category: String,
) -> Result<CategoryView, AppError> {
    info!("{:<12} --> 카테고리 조회: {}", "Query", category);
    let listings = store.list_by_category(&category).await?;
    Ok(CategoryView { category, listings })
}

/// 상품 상세 조회
pub async fn get_listing_view(
    store: &dyn AuctionStore,
    listing_id: i64,
    viewer: Option<&User>,
) -> Result<ListingView, AppError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", listing_id);
    let listing = store
        .get_listing(listing_id)
        .await?
        .ok_or_else(AppError::listing_not_found)?;

    let summary = store.bid_summary(listing_id).await?;
    let comments = store.list_comments(listing_id).await?;
    let owner = store
        .find_user_by_id(listing.owner_id)
        .await?
        .map(|u| u.username);
    let winner = match listing.winner_id {
        Some(winner_id) => store.find_user_by_id(winner_id).await?.map(|u| u.username),
        None => None,
    };
    let watching = match viewer {
        Some(user) => store.is_watching(user.id, listing_id).await?,
        None => false,
    };
    let is_owner = viewer.is_some_and(|user| user.id == listing.owner_id);

    Ok(ListingView {
        max_bid: summary.max_bid.unwrap_or(listing.starting_price),
        bid_count: summary.bid_count,
        listing,
        owner,
        winner,
        comments,
        watching,
        is_owner,
    })
}

/// 관심 목록 조회
pub async fn get_watchlist(
    store: &dyn AuctionStore,
    user_id: i64,
) -> Result<WatchlistView, AppError> {
    info!("{:<12} --> 관심 목록 조회 user_id: {}", "Query", user_id);
    Ok(WatchlistView {
        listings: store.watchlist_for(user_id).await?,
    })
}

// endregion: --- Query Handlers
