pub mod balance;
pub mod check;
pub mod claim;
pub mod connect;
pub mod deep_link;
pub mod genesis;
pub mod status;
pub mod switch_account;
pub mod switch_network;
