/// 상품 관련 커맨드 처리
/// 1. 상품 등록
/// 2. 댓글 작성
/// 3. 관심 목록 토글
// region:    --- Imports
use crate::auction::{Amount, Comment, Listing, NewListing};
use crate::error::AppError;
use crate::store::{CommentRepository, ListingRepository, WatchlistRepository};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Commands
const MAX_NAME_LEN: usize = 64;
const MAX_CATEGORY_LEN: usize = 64;
const MAX_DESCRIPTION_LEN: usize = 254;
const MAX_URL_LEN: usize = 254;
const MAX_COMMENT_LEN: usize = 1024;

/// 상품 등록 폼
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateListingForm {
    pub name: String,
    pub category: String,
    pub starting_bid: String,
    pub description: String,
    pub url: String,
}

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

/// 1. 상품 등록
pub async fn handle_create_listing<S>(
    store: &S,
    owner_id: i64,
    form: CreateListingForm,
) -> Result<Listing, AppError>
where
    S: ListingRepository + ?Sized,
{
    info!("{:<12} --> 상품 등록 요청: {}", "Command", form.name);

    let name = form.name.trim();
    if name.is_empty() || too_long(name, MAX_NAME_LEN) {
        return Err(AppError::Validation("Invalid listing name.".to_string()));
    }
    let category = form.category.trim();
    if too_long(category, MAX_CATEGORY_LEN) {
        return Err(AppError::Validation("Invalid category.".to_string()));
    }
    if too_long(&form.description, MAX_DESCRIPTION_LEN) {
        return Err(AppError::Validation("Description is too long.".to_string()));
    }
    let url = form.url.trim();
    if too_long(url, MAX_URL_LEN) {
        return Err(AppError::Validation("Image URL is too long.".to_string()));
    }
    let starting_price = Amount::parse_decimal(&form.starting_bid)
        .map_err(|_| AppError::Validation("Invalid starting bid.".to_string()))?;

    let listing = store
        .create_listing(NewListing {
            name: name.to_string(),
            category: category.to_string(),
            starting_price,
            description: form.description.trim().to_string(),
            image_url: url.to_string(),
            owner_id,
        })
        .await?;
    info!("{:<12} --> 상품 등록 완료 id: {}", "Command", listing.id);
    Ok(listing)
}

/// 2. 댓글 작성
pub async fn handle_add_comment<S>(
    store: &S,
    author_id: i64,
    listing_id: i64,
    text: &str,
) -> Result<Comment, AppError>
where
    S: ListingRepository + CommentRepository + ?Sized,
{
    info!("{:<12} --> 댓글 작성 요청 listing: {}", "Command", listing_id);

    let text = text.trim();
    if text.is_empty() || too_long(text, MAX_COMMENT_LEN) {
        return Err(AppError::Validation("Invalid comment.".to_string()));
    }
    if store.get_listing(listing_id).await?.is_none() {
        return Err(AppError::listing_not_found());
    }

    let comment = store
        .add_comment(listing_id, author_id, text, Utc::now())
        .await?;
    Ok(comment)
}

/// 3. 관심 목록 토글 (반환값: 토글 이후 관심 여부)
pub async fn handle_toggle_watchlist<S>(
    store: &S,
    user_id: i64,
    listing_id: i64,
) -> Result<bool, AppError>
where
    S: ListingRepository + WatchlistRepository + ?Sized,
{
    if store.get_listing(listing_id).await?.is_none() {
        return Err(AppError::listing_not_found());
    }
    let watching = store.toggle_watchlist(user_id, listing_id).await?;
    info!(
        "{:<12} --> 관심 목록 토글 user_id: {}, listing: {}, 상태: {}",
        "Command", user_id, listing_id, watching
    );
    Ok(watching)
}

// endregion: --- Commands
