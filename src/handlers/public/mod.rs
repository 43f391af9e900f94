// handlers/public/mod.rs - endpoints reachable without a token

pub mod auth;

pub use auth::auth_post;
