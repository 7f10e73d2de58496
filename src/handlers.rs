// region:    --- Imports
use crate::accounts::commands::{self as accounts, LoginForm, RegisterForm};
use crate::bidding::commands::{
    handle_close_auction, handle_place_bid as command_handle_place_bid, CloseAuctionCommand,
    PlaceBidCommand,
};
use crate::config::StoreBackend;
use crate::error::AppError;
use crate::listing::commands::{
    handle_add_comment, handle_create_listing as command_handle_create_listing,
    handle_toggle_watchlist as command_handle_toggle_watchlist, CreateListingForm,
};
use crate::query;
use crate::routes::AppState;
use crate::session::{expired_session_cookie, session_cookie, session_token, CurrentUser, MaybeUser};
use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Forms
/// 입찰 폼
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BidForm {
    pub amount: String,
}

/// 상품 id만 받는 폼 (경매 종료, 관심 목록)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListingIdForm {
    pub listing_id: String,
}

/// 댓글 폼
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub listing_id: String,
    pub comment: String,
}

fn parse_listing_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation("Invalid listing id.".to_string()))
}

fn listing_location(listing_id: i64) -> String {
    format!("/active_listing/{}", listing_id)
}

fn form_descriptor(form: &str, fields: &[&str]) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "form": form,
        "fields": fields,
    }))
}
// endregion: --- Forms

// region:    --- Command Handlers

/// 입찰 요청 처리
pub async fn handle_place_bid(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<BidForm>,
) -> Result<Redirect, AppError> {
    info!(
        "{:<12} --> 입찰 요청 listing: {}, user: {}",
        "Handler", listing_id, user.username
    );
    let cmd = PlaceBidCommand {
        listing_id,
        bidder_id: user.id,
        amount: form.amount,
    };
    command_handle_place_bid(state.store.as_ref(), cmd).await?;
    Ok(Redirect::to(&listing_location(listing_id)))
}

/// 경매 종료 요청 처리
pub async fn handle_close_bid(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ListingIdForm>,
) -> Result<Redirect, AppError> {
    let listing_id = parse_listing_id(&form.listing_id)?;
    info!("{:<12} --> 경매 종료 요청 listing: {}", "Handler", listing_id);
    let cmd = CloseAuctionCommand {
        listing_id,
        user_id: user.id,
    };
    handle_close_auction(state.store.as_ref(), cmd).await?;
    Ok(Redirect::to("/"))
}

/// 댓글 작성 처리
pub async fn handle_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, AppError> {
    let listing_id = parse_listing_id(&form.listing_id)?;
    handle_add_comment(state.store.as_ref(), user.id, listing_id, &form.comment).await?;
    Ok(Redirect::to(&listing_location(listing_id)))
}

/// 상품 등록 처리
pub async fn handle_create_listing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<CreateListingForm>,
) -> Result<Redirect, AppError> {
    command_handle_create_listing(state.store.as_ref(), user.id, form).await?;
    Ok(Redirect::to("/"))
}

/// 관심 목록 토글 처리
pub async fn handle_toggle_watchlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ListingIdForm>,
) -> Result<Redirect, AppError> {
    let listing_id = parse_listing_id(&form.listing_id)?;
    command_handle_toggle_watchlist(state.store.as_ref(), user.id, listing_id).await?;
    Ok(Redirect::to("/watchlist"))
}

/// 회원 가입 처리
pub async fn handle_register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let grant = accounts::register(state.store.as_ref(), form).await?;
    Ok((
        [(SET_COOKIE, session_cookie(&grant.token))],
        Redirect::to("/"),
    )
        .into_response())
}

/// 로그인 처리
pub async fn handle_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let grant = accounts::login(state.store.as_ref(), form).await?;
    Ok((
        [(SET_COOKIE, session_cookie(&grant.token))],
        Redirect::to("/"),
    )
        .into_response())
}

/// 로그아웃 처리
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(&headers) {
        accounts::logout(state.store.as_ref(), &token).await?;
    }
    Ok((
        [(SET_COOKIE, expired_session_cookie())],
        Redirect::to("/"),
    )
        .into_response())
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 메인 페이지
pub async fn handle_index(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 메인 페이지 조회", "HandlerQuery");
    Ok(Json(query::handlers::get_index(state.store.as_ref()).await?))
}

/// 상품 상세 페이지
pub async fn handle_get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    MaybeUser(viewer): MaybeUser,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 상품 조회 id: {}", "HandlerQuery", listing_id);
    let view =
        query::handlers::get_listing_view(state.store.as_ref(), listing_id, viewer.as_ref())
            .await?;
    Ok(Json(view))
}

/// 카테고리 페이지
pub async fn handle_get_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 카테고리 조회: {}", "HandlerQuery", category);
    Ok(Json(
        query::handlers::get_category(state.store.as_ref(), category).await?,
    ))
}

/// 관심 목록 페이지
pub async fn handle_get_watchlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        query::handlers::get_watchlist(state.store.as_ref(), user.id).await?,
    ))
}

/// 상품 등록 폼
pub async fn handle_create_listing_form(CurrentUser(_user): CurrentUser) -> impl IntoResponse {
    form_descriptor(
        "create_listing",
        &["name", "category", "starting_bid", "description", "url"],
    )
}

/// 로그인 폼
pub async fn handle_login_form() -> impl IntoResponse {
    form_descriptor("login", &["username", "password"])
}

/// 회원 가입 폼
pub async fn handle_register_form() -> impl IntoResponse {
    form_descriptor("register", &["username", "email", "password", "confirmation"])
}

/// 헬스 체크
pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let store = match state.config.store_backend {
        StoreBackend::Postgres => "postgres",
        StoreBackend::Memory => "memory",
    };
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "store": store,
    }))
}

// endregion: --- Query Handlers
