//! # Clubdesk Session
//!
//! `clubdesk-session` is the access layer every clubdesk API goes through. It
//! owns the access/refresh token pair, attaches bearer credentials, and
//! recovers from an expired access token with one refresh and one retry.
//!
//! ## Key Components
//!
//! - **[`SessionClient`]**: The request function plus `login`, `logout`, `refresh`.
//! - **[`RequestOptions`]**: Method, query, headers and body of a request.
//! - **[`SessionEvent`]**: Lifecycle notifications, including session expiry.
//! - **[`ClientConfig`]**: Base URL, timeout and login entry point.

#![warn(missing_docs)]

/// The session client.
pub mod client;
/// Client configuration.
pub mod config;
/// Session lifecycle events.
pub mod events;
/// Request descriptions.
pub mod request;

pub use client::{LoginResponse, SessionClient, LOGIN_PATH, LOGOUT_PATH, REFRESH_PATH};
pub use clubdesk_core::{ClientError, CredentialPair, SessionUser};
pub use config::ClientConfig;
pub use events::SessionEvent;
pub use request::{FilePart, Method, MultipartBody, RequestBody, RequestOptions};
