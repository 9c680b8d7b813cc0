//! Control Room API client utilities.
//!
//! This crate provides the HTTP request gateway used by every Control Room
//! operation. It focuses on:
//!
//! - Resolving workspace configuration from the environment (and `.env`)
//! - Validating the API base URL for safety
//! - Issuing single GET/POST requests with a fixed header set
//! - Classifying responses into success (200/201) or failure
//!
//! The primary entry point is [`ControlRoomClient`], which implements the
//! [`Gateway`] trait.
//!
//! # Example
//!
//! ```ignore
//! use controlroom_api::{ControlRoomClient, Gateway};
//!
//! async fn processes() -> Result<serde_json::Value, controlroom_api::ControlRoomError> {
//!     let client = ControlRoomClient::from_env()?;
//!     let url = format!("{}/processes", client.config().workspace_url());
//!     client.get(&url).await
//! }
//! ```

mod client;
mod config;
mod error;
pub mod gateway;

pub use client::ControlRoomClient;
pub use config::*;
pub use error::ControlRoomError;
pub use gateway::{Gateway, Reply, describe_call};
pub use reqwest::Method;
