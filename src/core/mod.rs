//! Foundational types: accounts, transactions, tunable configuration.

pub mod account;
pub mod config;
pub mod transaction;
