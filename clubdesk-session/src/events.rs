use clubdesk_core::SessionUser;

/// Session lifecycle notifications.
///
/// The session client never navigates anywhere itself; whoever renders the
/// application subscribes and decides what a lost session means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login succeeded.
    LoggedIn {
        /// The user now cached.
        user: SessionUser,
    },
    /// The access token was renewed.
    Refreshed,
    /// The user logged out.
    LoggedOut,
    /// The session could not be renewed and was cleared.
    Expired {
        /// Login entry point the user should be sent to.
        redirect_to: String,
    },
}
