pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod features;
pub mod handlers;
pub mod models;
pub mod rating;
pub mod review_flow;
pub mod services;
pub mod state;
pub mod storage;

pub use db::create_pool;
