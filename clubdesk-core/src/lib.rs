//! # Clubdesk Core
//!
//! `clubdesk-core` provides the foundational types for the clubdesk client: the
//! credential pair and session user, the shared error type, and the durable
//! key-value storage the session lives in.
//!
//! ## Key Components
//!
//! - **[`KeyValueStore`]**: The storage abstraction, with [`MemoryStore`] and [`FileStore`].
//! - **[`SessionState`]**: Typed access to the credential pair and cached user.
//! - **[`Preferences`]**: UI preferences kept alongside, but outside, the session.

#![warn(missing_docs)]

/// Errors shared by every clubdesk crate.
pub mod error;
/// Session data: credential pair, session user and their typed accessors.
pub mod state;
/// Key-value storage backends.
pub mod store;
/// UI preferences persisted next to the session.
pub mod preferences;

pub use error::ClientError;
pub use preferences::{Preferences, Theme};
pub use state::{CredentialPair, SessionState, SessionUser};
pub use store::{FileStore, KeyValueStore, MemoryStore};
