use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::RecordId;

/// Account role. Stored and transmitted as the codes `"1"`, `"2"` and `"3"`.
/// Corresponds to the `user_role` SQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    /// Regular account: creates projects, assigns and edits tasks.
    #[serde(rename = "1")]
    #[sqlx(rename = "1")]
    Member,
    /// May not create or edit tasks, but may delete any task.
    #[serde(rename = "2")]
    #[sqlx(rename = "2")]
    Moderator,
    /// Same task rights as a member.
    #[serde(rename = "3")]
    #[sqlx(rename = "3")]
    Admin,
}

impl Role {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Role::Member),
            "2" => Some(Role::Moderator),
            "3" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Role::Member => "1",
            Role::Moderator => "2",
            Role::Admin => "3",
        }
    }

    /// Whether the role may create and edit tasks.
    pub fn can_assign_tasks(self) -> bool {
        self != Role::Moderator
    }

    /// Whether the role may delete tasks it did not create.
    pub fn can_delete_any_task(self) -> bool {
        self == Role::Moderator
    }
}

/// A user row as persisted, including the password hash.
///
/// Not `Serialize`; responses go through [`UserProfile`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: RecordId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything about a user except the password hash.
///
/// This is what the authentication gate attaches to a request and what the auth
/// endpoints return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// The `{name, email}` shape used when a user is embedded in a project or task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Insert payload for the store. The password is already hashed at this point.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
}

/// Body of `POST /api/auth/signup`.
///
/// Fields default to empty so that a missing field fails its own check with its
/// own message instead of a generic deserialization error. `role` is kept as raw
/// JSON for the same reason: only the strings `"1"`, `"2"` and `"3"` are roles.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub confirmpassword: String,
    pub name: String,
    pub role: serde_json::Value,
}

impl SignupRequest {
    pub fn role(&self) -> Option<Role> {
        self.role.as_str().and_then(Role::from_code)
    }
}

/// Body of `POST /api/auth/signin`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}
