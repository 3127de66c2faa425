pub mod auth;
pub mod client;

pub use auth::{refresh_access_token, refresh_access_token_at};
pub use client::LinkedInClient;
