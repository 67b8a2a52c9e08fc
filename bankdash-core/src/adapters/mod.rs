//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Plaid HTTP client for BankDataProvider
//! - Appwrite HTTP client for BankLinkStore
//! - In-memory store and static provider for tests
//! - Demo data built on the in-memory adapters

pub mod appwrite;
pub mod demo;
pub mod memory;
pub mod plaid;

#[cfg(test)]
pub mod mock_server;
