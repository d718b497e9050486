pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod notify;
pub mod policy;

pub use app::{router, AppState};
