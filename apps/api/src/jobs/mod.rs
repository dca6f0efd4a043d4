// Public job board: fetch, filter, render state, detail and apply.

pub mod apply;
pub mod cache;
pub mod filter;
pub mod gateway;
pub mod handlers;
pub mod listing;
pub mod models;
pub mod store;
