pub mod listing;
pub mod transaction;

pub use listing::{round_currency, ItemSnapshot, Listing};
pub use transaction::TransactionRecord;
