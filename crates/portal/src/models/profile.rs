//! Profiles and notification preferences.

use serde::{Deserialize, Serialize};

use threadline_core::{PreferencesId, ProfileId, UserId};

/// Contact profile owned 1:1 by a user.
///
/// `website`, `industry` and `company_size` are only filled in by brands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
}

/// Editable profile fields.
///
/// Sent as the PATCH body for an existing profile; on first save it is
/// combined with the owner's id into a [`NewProfile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
}

/// Body for `POST /profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub user_id: UserId,
    #[serde(flatten)]
    pub fields: ProfileUpdate,
}

/// Per-channel notification opt-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    /// Backend id; `None` until the record has been created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PreferencesId>,
    pub user_id: UserId,
    // Flags missing from a stored record take their `defaults_for` value.
    #[serde(default = "opted_in")]
    pub email_orders: bool,
    #[serde(default)]
    pub email_marketing: bool,
    #[serde(default = "opted_in")]
    pub email_quotes: bool,
    #[serde(default = "opted_in")]
    pub email_projects: bool,
    #[serde(default)]
    pub sms_orders: bool,
    #[serde(default)]
    pub sms_quotes: bool,
    #[serde(default)]
    pub sms_marketing: bool,
}

const fn opted_in() -> bool {
    true
}

impl NotificationPreferences {
    /// Defaults for a user who never saved preferences.
    #[must_use]
    pub const fn defaults_for(user_id: UserId) -> Self {
        Self {
            id: None,
            user_id,
            email_orders: true,
            email_marketing: false,
            email_quotes: true,
            email_projects: true,
            sms_orders: false,
            sms_quotes: false,
            sms_marketing: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = NotificationPreferences::defaults_for(UserId::new(4));
        assert!(prefs.email_orders && prefs.email_quotes && prefs.email_projects);
        assert!(!prefs.email_marketing);
        assert!(!prefs.sms_orders && !prefs.sms_quotes && !prefs.sms_marketing);
    }

    #[test]
    fn test_partial_preferences_fill_missing_flags_with_defaults() {
        let prefs: NotificationPreferences =
            serde_json::from_str(r#"{"id":5,"userId":3,"emailOrders":false,"smsOrders":true}"#)
                .unwrap();
        assert_eq!(prefs.id, Some(PreferencesId::new(5)));
        assert!(!prefs.email_orders);
        assert!(prefs.sms_orders);
        assert!(prefs.email_quotes && prefs.email_projects);
        assert!(!prefs.email_marketing && !prefs.sms_quotes && !prefs.sms_marketing);
    }

    #[test]
    fn test_new_profile_flattens_fields() {
        let body = NewProfile {
            user_id: UserId::new(4),
            fields: ProfileUpdate {
                name: Some("Atelier Norte".to_owned()),
                industry: Some("apparel".to_owned()),
                ..ProfileUpdate::default()
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["userId"], 4);
        assert_eq!(json["name"], "Atelier Norte");
        assert_eq!(json["industry"], "apparel");
        assert!(json.get("phone").is_none());
    }
}
