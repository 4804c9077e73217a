pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod keys;
pub mod metrics;
pub mod models;
pub mod policy;
pub mod state;
pub mod throttle;
pub mod upstream;
