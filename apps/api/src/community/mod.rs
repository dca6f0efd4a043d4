// Community feed and gamification.

pub mod handlers;
pub mod levels;
pub mod models;
pub mod store;
