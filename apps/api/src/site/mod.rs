//! Admin-managed site content: placement banners and key/value site settings.

pub mod handlers;
pub mod models;
pub mod store;
pub mod targeting;
