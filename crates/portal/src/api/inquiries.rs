//! `/serviceInquiries`.
//!
//! Raw transport only. Validation, ordering and classification live in
//! [`crate::inquiries`].

use reqwest::Method;
use tracing::instrument;

use threadline_core::{InquiryId, UserId};

use super::{ApiClient, ApiError};
use crate::models::{InquiryPatch, NewInquiry, ServiceInquiry};

impl ApiClient {
    /// List every inquiry (brand side).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(request_id = tracing::field::Empty))]
    pub async fn list_inquiries(&self) -> Result<Vec<ServiceInquiry>, ApiError> {
        self.get_json(&["serviceInquiries"], &[]).await
    }

    /// List a user's inquiries in whatever order the backend returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id, request_id = tracing::field::Empty))]
    pub async fn inquiries_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ServiceInquiry>, ApiError> {
        self.get_json(&["serviceInquiries"], &[("userId", user_id.to_string())])
            .await
    }

    /// Get an inquiry by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the inquiry does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(inquiry_id = %id, request_id = tracing::field::Empty))]
    pub async fn get_inquiry(&self, id: InquiryId) -> Result<ServiceInquiry, ApiError> {
        self.get_json(&["serviceInquiries", &id.to_string()], &[])
            .await
    }

    /// Create an inquiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, inquiry), fields(user_id = %inquiry.user_id, request_id = tracing::field::Empty))]
    pub async fn create_inquiry(&self, inquiry: &NewInquiry) -> Result<ServiceInquiry, ApiError> {
        self.send_json(Method::POST, &["serviceInquiries"], inquiry)
            .await
    }

    /// Patch an inquiry, typically its status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, patch), fields(inquiry_id = %id, request_id = tracing::field::Empty))]
    pub async fn update_inquiry(
        &self,
        id: InquiryId,
        patch: &InquiryPatch,
    ) -> Result<ServiceInquiry, ApiError> {
        self.send_json(Method::PATCH, &["serviceInquiries", &id.to_string()], patch)
            .await
    }

    /// Delete an inquiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(inquiry_id = %id, request_id = tracing::field::Empty))]
    pub async fn delete_inquiry(&self, id: InquiryId) -> Result<(), ApiError> {
        self.delete_resource(&["serviceInquiries", &id.to_string()])
            .await
    }
}
