pub mod balance;
pub mod claim;
pub mod cli;
pub mod commands;
pub mod eligibility;
pub mod error;
pub mod node;
pub mod provider;
pub mod session;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod mock;
