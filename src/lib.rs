pub mod auth;
pub mod db;
pub mod error;
pub mod format;
pub mod handlers;
pub mod listing;
pub mod models;
pub mod schedule;
pub mod state;
pub mod workspace;
