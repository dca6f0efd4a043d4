// Candidate side: profile, completeness, own applications, dashboard.

pub mod completeness;
pub mod handlers;
pub mod models;
pub mod store;
