pub mod app;
pub mod attendance;
pub mod auth;
pub mod config;
pub mod courses;
pub mod error;
pub mod extract;
pub mod pages;
pub mod state;
pub mod store;
