/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 경매 종료(낙찰)
// region:    --- Imports
use crate::auction::{Amount, Bid, BidOutcome, Listing};
use crate::error::AppError;
use crate::store::{BidRepository, ListingRepository};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령 (금액은 폼에서 받은 문자열 그대로)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: String,
}

/// 경매 종료 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloseAuctionCommand {
    pub listing_id: i64,
    pub user_id: i64,
}

/// 1. 입찰
pub async fn handle_place_bid<S>(store: &S, cmd: PlaceBidCommand) -> Result<Bid, AppError>
where
    S: BidRepository + ?Sized,
{
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    // 숫자가 아닌 입력은 비교 전에 거절
    let amount = Amount::parse_whole(&cmd.amount).map_err(|e| {
        warn!("{:<12} --> 잘못된 입찰 금액: {}", "Command", e);
        AppError::Validation("Invalid bid amount.".to_string())
    })?;

    match store
        .place_bid(cmd.listing_id, cmd.bidder_id, amount, Utc::now())
        .await?
    {
        BidOutcome::Accepted(bid) => {
            info!(
                "{:<12} --> 입찰 성공 listing: {}, 금액: {}",
                "Command", bid.listing_id, bid.amount
            );
            Ok(bid)
        }
        BidOutcome::TooLow { current_max } => {
            info!(
                "{:<12} --> 입찰 실패: 현재 최고가 {} 이하",
                "Command", current_max
            );
            Err(AppError::BidTooLow { current_max })
        }
        BidOutcome::AuctionClosed => Err(AppError::AuctionClosed),
        BidOutcome::ListingNotFound => Err(AppError::listing_not_found()),
    }
}

/// 2. 경매 종료
/// 판매자만 종료할 수 있고, 이미 종료된 경매는 변경하지 않는다.
pub async fn handle_close_auction<S>(
    store: &S,
    cmd: CloseAuctionCommand,
) -> Result<Listing, AppError>
where
    S: ListingRepository + ?Sized,
{
    info!("{:<12} --> 경매 종료 요청 처리 시작: {:?}", "Command", cmd);

    let listing = store
        .get_listing(cmd.listing_id)
        .await?
        .ok_or_else(AppError::listing_not_found)?;

    if listing.owner_id != cmd.user_id {
        warn!(
            "{:<12} --> 판매자가 아닌 사용자의 종료 요청 user_id: {}",
            "Command", cmd.user_id
        );
        return Err(AppError::Forbidden(
            "Only the owner can close this auction.".to_string(),
        ));
    }

    if !listing.active {
        info!("{:<12} --> 이미 종료된 경매: {}", "Command", listing.id);
        return Ok(listing);
    }

    let closed = store
        .close_listing(cmd.listing_id)
        .await?
        .ok_or_else(AppError::listing_not_found)?;
    info!(
        "{:<12} --> 경매 종료 완료 id: {}, 낙찰자: {:?}",
        "Command", closed.id, closed.winner_id
    );
    Ok(closed)
}

// endregion: --- Commands
