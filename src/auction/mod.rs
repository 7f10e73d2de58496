pub mod model;
pub mod money;

pub use model::{Bid, BidOutcome, BidSummary, Comment, Listing, NewListing, NewUser, User};
pub use money::{Amount, AmountError};
