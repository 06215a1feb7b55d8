pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod identity;
pub mod metrics;
pub mod registration;
pub mod renewal;
pub mod router;
pub mod server;
