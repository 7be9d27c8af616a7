pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod oauth;
pub mod services;
pub mod state;
pub mod store;
pub mod suggest;
pub mod text;
pub mod twitter;

pub use app::app;
