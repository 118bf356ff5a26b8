pub mod api;
pub mod app_state;
pub mod config;
pub mod entities;
pub mod fetcher;
pub mod health;
pub mod library;
pub mod reupload;
pub mod scrape;
pub mod session;
