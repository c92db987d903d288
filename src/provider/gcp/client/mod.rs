//! GCP Secret Manager client implementations
//!
//! - `rest`: native REST client (reqwest + rustls)
//! - `auth`: OAuth2 access token sources for the REST client

pub mod auth;
mod common;
pub mod paths;
pub mod rest;

pub use rest::SecretManagerREST;
