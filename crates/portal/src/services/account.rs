//! Profile and notification preference management.

use tracing::instrument;

use threadline_core::UserId;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{NewProfile, NotificationPreferences, Profile, ProfileUpdate};

/// Account settings for the logged-in user.
#[derive(Clone)]
pub struct AccountService {
    api: ApiClient,
}

impl AccountService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `PortalError::Api` if the backend call fails.
    pub async fn profile(&self, user_id: UserId) -> Result<Option<Profile>> {
        Ok(self.api.profile_by_user(user_id).await?)
    }

    /// Create the user's profile on first save, patch it afterwards.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Api` if a backend call fails.
    #[instrument(skip(self, update), fields(user_id = %user_id))]
    pub async fn save_profile(&self, user_id: UserId, update: ProfileUpdate) -> Result<Profile> {
        let profile = match self.api.profile_by_user(user_id).await? {
            Some(existing) => self.api.update_profile(existing.id, &update).await?,
            None => {
                tracing::debug!("No profile yet, creating one");
                self.api
                    .create_profile(&NewProfile {
                        user_id,
                        fields: update,
                    })
                    .await?
            }
        };
        Ok(profile)
    }

    /// Stored preferences, or the defaults if none were ever saved.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Api` if the backend call fails.
    pub async fn notification_preferences(
        &self,
        user_id: UserId,
    ) -> Result<NotificationPreferences> {
        Ok(self
            .api
            .notification_preferences_by_user(user_id)
            .await?
            .unwrap_or_else(|| NotificationPreferences::defaults_for(user_id)))
    }

    /// Persist preferences: POST when they have no backend id yet, PATCH
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Api` if the backend call fails.
    #[instrument(skip(self, prefs), fields(user_id = %prefs.user_id))]
    pub async fn save_notification_preferences(
        &self,
        prefs: &NotificationPreferences,
    ) -> Result<NotificationPreferences> {
        let saved = match prefs.id {
            Some(id) => self.api.update_notification_preferences(id, prefs).await?,
            None => self.api.create_notification_preferences(prefs).await?,
        };
        Ok(saved)
    }
}
