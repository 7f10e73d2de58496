// region:    --- Imports
use auction_web::config::{AppConfig, StoreBackend};
use auction_web::database::DatabaseManager;
use auction_web::routes::{build_router, AppState};
use auction_web::store::{AuctionStore, InMemoryStore, PostgresStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = AppConfig::from_env();

    // 저장소 생성
    let store: Arc<dyn AuctionStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config.require_database_url()?;
            let db_manager =
                Arc::new(DatabaseManager::connect(database_url, config.max_connections).await?);

            // 데이터베이스 초기화
            if let Err(e) = db_manager.initialize_database(&config).await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresStore::new(db_manager))
        }
        StoreBackend::Memory => {
            warn!(
                "{:<12} --> 메모리 저장소 사용: 재시작 시 데이터가 사라집니다",
                "Main"
            );
            Arc::new(InMemoryStore::new())
        }
    };

    let http_addr = config.http_addr;
    let routes_all = build_router(AppState::new(store, config));

    // 리스너 생성
    let listener = TcpListener::bind(http_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
