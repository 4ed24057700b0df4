use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::SessionStore;
use crate::config::data_dir;
use crate::model::user::UserData;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserData>,
    #[serde(default)]
    pub remember_me: bool,
    #[serde(default)]
    pub logged_in: bool,
}

impl SessionData {
    fn save_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
        self.logged_in = true;
    }

    fn clear(&mut self) {
        *self = SessionData::default();
    }
}

fn lock(data: &Mutex<SessionData>) -> MutexGuard<'_, SessionData> {
    data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Process-lifetime store, used by tests and embedders with their own persistence.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: Mutex<SessionData>,
}

impl MemorySessionStore {
    pub fn with_data(data: SessionData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    pub fn snapshot(&self) -> SessionData {
        lock(&self.data).clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_token(&self) -> Option<String> {
        lock(&self.data).token.clone()
    }

    fn save_token(&self, token: &str) {
        lock(&self.data).save_token(token);
    }

    fn is_logged_in(&self) -> bool {
        lock(&self.data).logged_in
    }

    fn logout(&self) {
        lock(&self.data).clear();
    }

    fn save_user(&self, user: &UserData) {
        lock(&self.data).user = Some(user.clone());
    }

    fn get_user(&self) -> Option<UserData> {
        lock(&self.data).user.clone()
    }

    fn set_remember_me(&self, remember: bool) {
        lock(&self.data).remember_me = remember;
    }

    fn remember_me(&self) -> bool {
        lock(&self.data).remember_me
    }
}

/// JSON file store at `~/.taskdesk/session.json`, rewritten on every change.
pub struct FileSessionStore {
    path: PathBuf,
    data: Mutex<SessionData>,
}

impl FileSessionStore {
    pub fn new() -> Result<Self> {
        Self::open(data_dir().join("session.json"))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            SessionData::default()
        };
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, f: impl FnOnce(&mut SessionData)) {
        let mut data = lock(&self.data);
        f(&mut data);
        if let Err(err) = self.save(&data) {
            tracing::warn!(path = %self.path.display(), "failed to persist session: {err:#}");
        }
    }

    fn save(&self, data: &SessionData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get_token(&self) -> Option<String> {
        lock(&self.data).token.clone()
    }

    fn save_token(&self, token: &str) {
        self.update(|data| data.save_token(token));
    }

    fn is_logged_in(&self) -> bool {
        lock(&self.data).logged_in
    }

    fn logout(&self) {
        self.update(SessionData::clear);
    }

    fn save_user(&self, user: &UserData) {
        self.update(|data| data.user = Some(user.clone()));
    }

    fn get_user(&self) -> Option<UserData> {
        lock(&self.data).user.clone()
    }

    fn set_remember_me(&self, remember: bool) {
        self.update(|data| data.remember_me = remember);
    }

    fn remember_me(&self) -> bool {
        lock(&self.data).remember_me
    }
}
