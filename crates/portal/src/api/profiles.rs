//! `/profiles` and `/notificationPreferences`.

use reqwest::Method;
use tracing::instrument;

use threadline_core::{PreferencesId, ProfileId, UserId};

use super::{ApiClient, ApiError};
use crate::models::{NewProfile, NotificationPreferences, Profile, ProfileUpdate};

impl ApiClient {
    // =========================================================================
    // Profile Methods
    // =========================================================================

    /// The profile owned by `user_id`, if one was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id, request_id = tracing::field::Empty))]
    pub async fn profile_by_user(&self, user_id: UserId) -> Result<Option<Profile>, ApiError> {
        let profiles: Vec<Profile> = self
            .get_json(&["profiles"], &[("userId", user_id.to_string())])
            .await?;
        Ok(profiles.into_iter().next())
    }

    /// Get a profile by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the profile does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(profile_id = %id, request_id = tracing::field::Empty))]
    pub async fn get_profile(&self, id: ProfileId) -> Result<Profile, ApiError> {
        self.get_json(&["profiles", &id.to_string()], &[]).await
    }

    /// Create a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, profile), fields(user_id = %profile.user_id, request_id = tracing::field::Empty))]
    pub async fn create_profile(&self, profile: &NewProfile) -> Result<Profile, ApiError> {
        self.send_json(Method::POST, &["profiles"], profile).await
    }

    /// Patch a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, update), fields(profile_id = %id, request_id = tracing::field::Empty))]
    pub async fn update_profile(
        &self,
        id: ProfileId,
        update: &ProfileUpdate,
    ) -> Result<Profile, ApiError> {
        self.send_json(Method::PATCH, &["profiles", &id.to_string()], update)
            .await
    }

    // =========================================================================
    // Notification Preference Methods
    // =========================================================================

    /// Stored notification preferences for `user_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id, request_id = tracing::field::Empty))]
    pub async fn notification_preferences_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<NotificationPreferences>, ApiError> {
        let prefs: Vec<NotificationPreferences> = self
            .get_json(
                &["notificationPreferences"],
                &[("userId", user_id.to_string())],
            )
            .await?;
        Ok(prefs.into_iter().next())
    }

    /// Create the preference record for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, prefs), fields(user_id = %prefs.user_id, request_id = tracing::field::Empty))]
    pub async fn create_notification_preferences(
        &self,
        prefs: &NotificationPreferences,
    ) -> Result<NotificationPreferences, ApiError> {
        self.send_json(Method::POST, &["notificationPreferences"], prefs)
            .await
    }

    /// Replace the flags of an existing preference record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, prefs), fields(preferences_id = %id, request_id = tracing::field::Empty))]
    pub async fn update_notification_preferences(
        &self,
        id: PreferencesId,
        prefs: &NotificationPreferences,
    ) -> Result<NotificationPreferences, ApiError> {
        self.send_json(
            Method::PATCH,
            &["notificationPreferences", &id.to_string()],
            prefs,
        )
        .await
    }
}
