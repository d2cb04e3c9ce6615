//! Identity provider port.
//!
//! The conversation core only reads who is signed in, for greeting text.
//! Sign-in flows belong to whatever implements this trait.

use lexai_types::identity::CurrentUser;
use tokio::sync::watch;

/// Read-only source of the current user.
pub trait IdentityProvider: Send + Sync {
    /// Subscribe to the current user. `None` means anonymous.
    ///
    /// The receiver always holds the latest value, so a late subscriber
    /// still sees who is signed in right now.
    fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>>;
}
