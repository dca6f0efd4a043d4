// Company side: posting management and application review.

pub mod handlers;
pub mod models;
pub mod store;
