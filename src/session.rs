/// 요청별 사용자 식별
/// 세션 쿠키를 저장소에서 확인하고 사용자 정보를 핸들러 인자로 넘긴다.
// region:    --- Imports
use crate::auction::User;
use crate::error::AppError;
use crate::routes::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;

// endregion: --- Imports

// region:    --- Cookie
pub const SESSION_COOKIE: &str = "auction_session";

/// 요청 헤더에서 세션 토큰 추출
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// 로그인 시 발급하는 쿠키
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        SESSION_COOKIE, token
    )
}

/// 로그아웃 시 쿠키 삭제
pub fn expired_session_cookie() -> String {
    format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    )
}
// endregion: --- Cookie

// region:    --- Extractors
/// 로그인 필수
pub struct CurrentUser(pub User);

/// 로그인 선택
pub struct MaybeUser(pub Option<User>);

async fn resolve_user(parts: &Parts, state: &AppState) -> Result<Option<User>, AppError> {
    match session_token(&parts.headers) {
        Some(token) => Ok(state.store.session_user(&token).await?),
        None => Ok(None),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state)
            .await?
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve_user(parts, state).await?))
    }
}
// endregion: --- Extractors
