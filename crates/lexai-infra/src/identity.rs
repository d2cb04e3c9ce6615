//! Local identity provider backed by a `tokio::sync::watch` channel.
//!
//! Seeded from configuration; whoever embeds the client can swap the user
//! at runtime and every subscriber sees the change.

use lexai_core::identity::IdentityProvider;
use lexai_types::config::ClientConfig;
use lexai_types::identity::CurrentUser;
use tokio::sync::watch;

use crate::config::configured_user;

pub struct LocalIdentityProvider {
    tx: watch::Sender<Option<CurrentUser>>,
}

impl LocalIdentityProvider {
    pub fn new(user: Option<CurrentUser>) -> Self {
        let (tx, _) = watch::channel(user);
        Self { tx }
    }

    /// Anonymous unless the config names a user.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(configured_user(config))
    }

    /// Replace the current user. `None` signs out.
    pub fn set_user(&self, user: Option<CurrentUser>) {
        tracing::debug!(signed_in = user.is_some(), "Identity updated");
        self.tx.send_replace(user);
    }

    pub fn current(&self) -> Option<CurrentUser> {
        self.tx.borrow().clone()
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.tx.subscribe()
    }
}
