//! Core domain entities
//!
//! All dashboard entities are defined here. These are pure data structures
//! with normalization logic - no I/O or external dependencies.

mod account;
mod bank_link;
mod institution;
pub mod page;
pub mod result;
mod summary;
mod transaction;
pub mod transfer;

pub use account::AccountSnapshot;
pub use bank_link::BankLink;
pub use institution::Institution;
pub use page::{paginate, Page};
pub use summary::{AccountDetail, AggregateSummary};
pub use transaction::{sort_newest_first, Direction, TransactionRecord, TransactionSource};
pub use transfer::TransferRecord;
