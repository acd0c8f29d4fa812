use greentick_types::{BusinessProfile, SignupRequest, TokenResponse, User};
use reqwest::Method;
use serde_json::Value as JsonValue;

use super::{BUSINESS_PROFILE_PATH, CURRENT_USER_PATH, SIGNUP_PATH};
use crate::{
    client::{ApiClient, ApiResponse},
    error::Result,
};

impl ApiClient {
    /// Create an account. Sent without any bearer token.
    pub async fn signup(&self, request: &SignupRequest) -> Result<TokenResponse> {
        let body = serde_json::to_value(request)?;
        self.request_as(Method::POST, SIGNUP_PATH, Some(body), None)
            .await?
            .require(SIGNUP_PATH)
    }

    pub async fn current_user(&self) -> Result<User> {
        self.get(CURRENT_USER_PATH).await
    }

    /// Fetch the profile belonging to `token`, ignoring the current session.
    pub(crate) async fn current_user_as(&self, token: &str) -> Result<User> {
        self.request_as(Method::GET, CURRENT_USER_PATH, None, Some(token))
            .await?
            .require(CURRENT_USER_PATH)
    }

    pub async fn business_profile(&self) -> Result<BusinessProfile> {
        self.get(BUSINESS_PROFILE_PATH).await
    }

    /// Returns the backend's view of the updated profile, to be merged into
    /// the current user, or `NoContent` when the backend sends none.
    pub async fn update_business_profile(
        &self,
        profile: &BusinessProfile,
    ) -> Result<ApiResponse<JsonValue>> {
        self.put(BUSINESS_PROFILE_PATH, profile).await
    }
}
