//! 환경 변수 기반 서버 설정.
//!
//! `DATABASE_URL` 외의 값은 모두 기본값이 있다.

use std::net::SocketAddr;
use thiserror::Error;
use tracing::warn;

/// 저장소 백엔드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set for the postgres store")]
    MissingDatabaseUrl,
}

/// 서버 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Env: `DATABASE_URL`
    pub database_url: Option<String>,

    /// Env: `AUCTION_STORE` (`postgres` | `memory`)
    /// Default: `postgres`
    pub store_backend: StoreBackend,

    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:3000`
    pub http_addr: SocketAddr,

    /// Env: `DB_MAX_CONNECTIONS`
    /// Default: `5`
    pub max_connections: u32,

    /// 시작 시 테이블 재생성 여부
    /// Env: `RESET_DATABASE`
    /// Default: `false`
    pub reset_database: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            store_backend: StoreBackend::Postgres,
            http_addr: ([0, 0, 0, 0], 3000).into(),
            max_connections: 5,
            reset_database: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 생성 (테스트용으로도 사용)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            if !url.is_empty() {
                config.database_url = Some(url);
            }
        }

        if let Some(backend) = lookup("AUCTION_STORE") {
            match backend.to_ascii_lowercase().as_str() {
                "postgres" => config.store_backend = StoreBackend::Postgres,
                "memory" => config.store_backend = StoreBackend::Memory,
                other => warn!(
                    "{:<12} --> 알 수 없는 AUCTION_STORE 값: {}, 기본값 사용",
                    "Config", other
                ),
            }
        }

        if let Some(addr) = lookup("HTTP_ADDR") {
            match addr.parse::<SocketAddr>() {
                Ok(parsed) => config.http_addr = parsed,
                Err(_) => warn!(
                    "{:<12} --> 잘못된 HTTP_ADDR 값: {}, 기본값 사용",
                    "Config", addr
                ),
            }
        }

        if let Some(value) = lookup("DB_MAX_CONNECTIONS") {
            match value.parse::<u32>() {
                Ok(n) if n > 0 => config.max_connections = n,
                _ => warn!(
                    "{:<12} --> 잘못된 DB_MAX_CONNECTIONS 값: {}, 기본값 사용",
                    "Config", value
                ),
            }
        }

        if let Some(value) = lookup("RESET_DATABASE") {
            config.reset_database = parse_flag(&value);
        }

        config
    }

    /// postgres 백엔드일 때 DATABASE_URL 확인
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
