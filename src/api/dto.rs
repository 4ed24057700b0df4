//! Wire shapes. Every field is optional and decoded leniently; the mapper
//! decides what a missing or malformed value means.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::util::lenient;

/// `{ "success": bool?, "message": string?, "data": T? }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "lenient::bool")]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Body of a non-2xx response.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl ErrorBody {
    /// `message`, else the first entry of a validation `errors` map.
    pub fn best_message(&self) -> Option<String> {
        let message = self
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());
        if let Some(message) = message {
            return Some(message.to_string());
        }
        first_error(self.errors.as_ref()?)
    }
}

fn first_error(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items.iter().find_map(first_error),
        Value::Object(map) => map.values().find_map(first_error),
        _ => None,
    }
}

/// Laravel-style paginator: position metadata next to the item array.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct PageDto<T> {
    #[serde(default, deserialize_with = "lenient::int")]
    pub current_page: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub last_page: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub per_page: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub total: Option<i64>,
    #[serde(default = "Option::default", deserialize_with = "lenient::seq")]
    pub data: Option<Vec<Option<T>>>,
}

/// The users endpoint has answered both as a bare array and as a page.
#[derive(Debug)]
pub struct ListPayload<T>(Option<Vec<Option<T>>>);

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Option<Vec<Option<T>>> {
        self.0
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ListPayload<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let items = match value {
            Value::Array(_) => lenient::seq(value).ok().flatten(),
            Value::Object(_) => serde_json::from_value::<PageDto<T>>(value)
                .ok()
                .and_then(|page| page.data),
            _ => None,
        };
        Ok(Self(items))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDto {
    #[serde(default, deserialize_with = "lenient::int")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub avis_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email_verified_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentDto {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub file_path: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub file_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub file_size: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskDto {
    #[serde(default, deserialize_with = "lenient::int")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub work_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub work_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub creator: Option<UserDto>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub assignees: Option<Vec<Option<UserDto>>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub attachments: Option<Vec<Option<AttachmentDto>>>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated_at: Option<String>,
}

/// `data` of a login response. Some deployments say `access_token`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginDto {
    #[serde(default, alias = "access_token", deserialize_with = "lenient::string")]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub user: Option<UserDto>,
}
