pub mod store;

use std::sync::{Arc, Mutex};

use crate::model::user::UserData;

pub use store::{FileSessionStore, MemorySessionStore};

/// Persistent key-value store for the signed-in session.
pub trait SessionStore: Send + Sync {
    fn get_token(&self) -> Option<String>;
    fn save_token(&self, token: &str);
    fn is_logged_in(&self) -> bool;
    /// Clears token, user and remember-me.
    fn logout(&self);
    fn save_user(&self, user: &UserData);
    fn get_user(&self) -> Option<UserData>;
    fn set_remember_me(&self, remember: bool);
    fn remember_me(&self) -> bool;
}

/// The UI side: present the unauthenticated entry screen and drop whatever
/// navigation state existed before.
pub trait Navigator: Send + Sync {
    fn show_login(&self);
}

/// Shared session state for the whole process.
///
/// Teardown is a one-way LoggedIn → LoggedOut transition. Concurrent callers
/// are serialised, and only the first one to see a live session acts.
pub struct Session {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    transition: Mutex<()>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            transition: Mutex::new(()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get_token().filter(|t| !t.trim().is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.is_logged_in()
    }

    pub fn user(&self) -> Option<UserData> {
        self.store.get_user()
    }

    pub fn start(&self, token: &str, user: Option<&UserData>, remember_me: bool) {
        let _guard = self.lock();
        self.store.save_token(token);
        if let Some(user) = user {
            self.store.save_user(user);
        }
        self.store.set_remember_me(remember_me);
        tracing::info!("session started");
    }

    pub fn replace_token(&self, token: &str) {
        let _guard = self.lock();
        self.store.save_token(token);
    }

    /// Forced logout. Returns `false` without side effects if the session was
    /// already logged out.
    pub fn teardown(&self) -> bool {
        let _guard = self.lock();
        if !self.store.is_logged_in() {
            return false;
        }
        self.store.logout();
        tracing::warn!("session invalidated, returning to login");
        self.navigator.show_login();
        true
    }

    /// User-initiated logout: clear local state, no navigation.
    pub fn sign_out(&self) {
        let _guard = self.lock();
        self.store.logout();
        tracing::info!("signed out");
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.transition
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
