//! # Clubdesk
//!
//! Client for a sports-club administration backend. The pieces live in
//! separate crates and are re-exported here behind features:
//!
//! - `clubdesk-core` (always): errors, key-value stores, session state and UI preferences.
//! - `session` (default): [`SessionClient`], the HTTP client that attaches bearer
//!   tokens and renews them once on a 401.
//! - `api`: typed resource APIs and the weekly schedule grid.

pub use clubdesk_core::*;

#[cfg(feature = "session")]
pub use clubdesk_session::{
    ClientConfig, FilePart, LoginResponse, Method, MultipartBody, RequestBody, RequestOptions,
    SessionClient, SessionEvent,
};

#[cfg(feature = "session")]
pub mod session {
    //! Re-export of `clubdesk-session`.
    pub use clubdesk_session::*;
}

#[cfg(feature = "api")]
pub use clubdesk_api::{ClubApi, WeekSchedule};

#[cfg(feature = "api")]
pub mod api {
    //! Re-export of `clubdesk-api`.
    pub use clubdesk_api::*;
}
