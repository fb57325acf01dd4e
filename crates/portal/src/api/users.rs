//! `/users`.

use reqwest::Method;
use tracing::instrument;

use threadline_core::{Email, UserId};

use super::{ApiClient, ApiError};
use crate::models::{NewUser, User, UserUpdate};

impl ApiClient {
    /// List every user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(request_id = tracing::field::Empty))]
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json(&["users"], &[]).await
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the user does not exist, or an error
    /// if the API request fails.
    #[instrument(skip(self), fields(user_id = %id, request_id = tracing::field::Empty))]
    pub async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.get_json(&["users", &id.to_string()], &[]).await
    }

    /// Find the user registered under `email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(request_id = tracing::field::Empty))]
    pub async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, ApiError> {
        let users: Vec<User> = self
            .get_json(&["users"], &[("email", email.as_str().to_string())])
            .await?;
        Ok(users.into_iter().find(|u| u.email == *email))
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, user), fields(request_id = tracing::field::Empty))]
    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        self.send_json(Method::POST, &["users"], user).await
    }

    /// Replace a user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, user), fields(user_id = %id, request_id = tracing::field::Empty))]
    pub async fn replace_user(&self, id: UserId, user: &NewUser) -> Result<User, ApiError> {
        self.send_json(Method::PUT, &["users", &id.to_string()], user)
            .await
    }

    /// Patch selected user fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, update), fields(user_id = %id, request_id = tracing::field::Empty))]
    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<User, ApiError> {
        self.send_json(Method::PATCH, &["users", &id.to_string()], update)
            .await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %id, request_id = tracing::field::Empty))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.delete_resource(&["users", &id.to_string()]).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;
    use serde_json::json;
    use threadline_core::Role;
    use url::Url;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::store::MemoryStore;

    fn test_client(uri: &str) -> ApiClient {
        ApiClient::new(Url::parse(uri).unwrap(), Arc::new(MemoryStore::new())).unwrap()
    }

    #[tokio::test]
    async fn test_find_user_by_email_filters_on_exact_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("email", "ana@shop.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "email": "ana@shop.com", "role": "customer", "name": "Ana"}
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let email = Email::parse("Ana@Shop.com").unwrap();
        let user = client.find_user_by_email(&email).await.unwrap().unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_bearer_token_attached_when_stored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/1"))
            .and(header("authorization", "Bearer tok_abc"))
            .and(header_exists(crate::api::REQUEST_ID_HEADER))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"id": 1, "email": "ana@shop.com", "role": "customer", "name": "Ana"}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.set_token(&SecretString::from("tok_abc")).unwrap();
        client.get_user(UserId::new(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"id": 1, "email": "ana@shop.com", "role": "customer", "name": "Ana"}),
            ))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.get_user(UserId::new(1)).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let request = requests.first().unwrap();
        assert!(!request.headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_delete_user_sends_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/users/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.delete_user(UserId::new(5)).await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.list_users().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, .. }));
        assert!(err.is_retryable());
    }
}
