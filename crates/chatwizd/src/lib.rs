//! ChatWizard daemon - scores chat messages along fixed behavioral
//! categories and keeps a per-user running total.

pub mod backend;
pub mod bot;
pub mod chatlog;
pub mod config;
pub mod engine;
pub mod ledger;
pub mod server;
