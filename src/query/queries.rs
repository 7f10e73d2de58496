// region:    --- Listings
/// 상품 등록
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (name, category, starting_price, description, image_url, owner_id)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, name, category, starting_price, description, image_url, owner_id, active, winner_id, created_at
"#;

/// 상품 조회
pub const GET_LISTING: &str = "SELECT id, name, category, starting_price, description, image_url, owner_id, active, winner_id, created_at FROM listings WHERE id = $1";

/// 모든 상품 조회
pub const GET_ALL_LISTINGS: &str = "SELECT id, name, category, starting_price, description, image_url, owner_id, active, winner_id, created_at FROM listings ORDER BY created_at DESC, id DESC";

/// 카테고리별 상품 조회
pub const GET_LISTINGS_BY_CATEGORY: &str = "SELECT id, name, category, starting_price, description, image_url, owner_id, active, winner_id, created_at FROM listings WHERE category = $1 ORDER BY created_at DESC, id DESC";

/// 카테고리 목록 조회
pub const GET_CATEGORIES: &str =
    "SELECT DISTINCT category FROM listings WHERE category <> '' ORDER BY category";

/// 상품 행 잠금 (입찰, 경매 종료 직렬화)
pub const LOCK_LISTING: &str = "SELECT active, starting_price FROM listings WHERE id = $1 FOR UPDATE";

/// 경매 종료
pub const CLOSE_LISTING: &str = r#"
    UPDATE listings SET active = FALSE, winner_id = $2
    WHERE id = $1
    RETURNING id, name, category, starting_price, description, image_url, owner_id, active, winner_id, created_at
"#;
// endregion: --- Listings

// region:    --- Bids
/// 최고 입찰가 조회
pub const GET_MAX_BID: &str = "SELECT MAX(amount) AS max_bid FROM bids WHERE listing_id = $1";

/// 입찰 현황 조회
pub const GET_BID_SUMMARY: &str =
    "SELECT COUNT(*) AS bid_count, MAX(amount) AS max_bid FROM bids WHERE listing_id = $1";

/// 최고 입찰자 조회 (동일 금액이면 먼저 들어온 입찰)
pub const GET_TOP_BIDDER: &str =
    "SELECT bidder_id FROM bids WHERE listing_id = $1 ORDER BY amount DESC, id ASC LIMIT 1";

/// 입찰 저장
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, bidder_id, amount, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, listing_id, bidder_id, amount, created_at
"#;

/// 입찰 이력 조회
pub const GET_BIDS: &str = r#"
    SELECT id, listing_id, bidder_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY id ASC
"#;
// endregion: --- Bids

// region:    --- Comments
/// 댓글 저장
pub const INSERT_COMMENT: &str = r#"
    WITH inserted AS (
        INSERT INTO comments (listing_id, author_id, body, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, listing_id, author_id, body, created_at
    )
    SELECT i.id, i.listing_id, i.author_id, u.username AS author_username, i.body, i.created_at
    FROM inserted i JOIN users u ON u.id = i.author_id
"#;

/// 댓글 조회
pub const GET_COMMENTS: &str = r#"
    SELECT c.id, c.listing_id, c.author_id, u.username AS author_username, c.body, c.created_at
    FROM comments c JOIN users u ON u.id = c.author_id
    WHERE c.listing_id = $1
    ORDER BY c.created_at ASC, c.id ASC
"#;
// endregion: --- Comments

// region:    --- Watchlist
pub const DELETE_WATCHLIST_ENTRY: &str =
    "DELETE FROM watchlist WHERE user_id = $1 AND listing_id = $2";

pub const INSERT_WATCHLIST_ENTRY: &str =
    "INSERT INTO watchlist (user_id, listing_id) VALUES ($1, $2) ON CONFLICT DO NOTHING";

pub const EXISTS_WATCHLIST_ENTRY: &str =
    "SELECT EXISTS(SELECT 1 FROM watchlist WHERE user_id = $1 AND listing_id = $2)";

/// 관심 목록 상품 조회
pub const GET_WATCHLIST: &str = r#"
    SELECT l.id, l.name, l.category, l.starting_price, l.description, l.image_url,
           l.owner_id, l.active, l.winner_id, l.created_at
    FROM watchlist w JOIN listings l ON l.id = w.listing_id
    WHERE w.user_id = $1
    ORDER BY w.created_at DESC, l.id DESC
"#;
// endregion: --- Watchlist

// region:    --- Users & Sessions
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash)
    VALUES ($1, $2, $3)
    RETURNING id, username, email, password_hash, created_at
"#;

pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1";

pub const GET_USER_BY_ID: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1";

pub const INSERT_SESSION: &str = "INSERT INTO sessions (token, user_id) VALUES ($1, $2)";

pub const GET_SESSION_USER: &str = r#"
    SELECT u.id, u.username, u.email, u.password_hash, u.created_at
    FROM sessions s JOIN users u ON u.id = s.user_id
    WHERE s.token = $1
"#;

pub const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = $1";
// endregion: --- Users & Sessions
