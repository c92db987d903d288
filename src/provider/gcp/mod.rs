//! # GCP Secret Manager
//!
//! Google Cloud Secret Manager backend for the sync.

pub mod client;

pub use client::SecretManagerREST;
