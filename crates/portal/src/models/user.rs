//! User records.

use core::fmt;

use serde::{Deserialize, Serialize};

use threadline_core::{Email, Role, UserId};

/// A portal user as stored by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email address.
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// Display name.
    pub name: String,
    /// Argon2 PHC string. Absent on records that cannot log in with a password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("name", &self.name)
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Body for `POST /users` and `PUT /users/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: Email,
    pub role: Role,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

/// Body for `PATCH /users/{id}`. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password_hash() {
        let user = User {
            id: UserId::new(1),
            email: Email::parse("ana@shop.com").unwrap(),
            role: Role::Customer,
            name: "Ana".to_owned(),
            password_hash: Some("$argon2id$v=19$secret".to_owned()),
        };
        let debug = format!("{user:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("argon2id"));
    }

    #[test]
    fn test_user_without_hash_deserializes() {
        let user: User = serde_json::from_str(
            r#"{"id":2,"email":"brand@atelier.io","role":"brand","name":"Atelier"}"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::Brand);
        assert!(user.password_hash.is_none());
    }
}
