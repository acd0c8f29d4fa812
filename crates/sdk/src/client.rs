use reqwest::{Method, RequestBuilder, StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;
use tracing::{debug, error, warn};
use url::Url;

use crate::{
    config::ClientConfig,
    endpoints::LOGIN_PATH,
    error::{ApiError, Result},
    session::SessionStore,
};

/// Message used when a failed response carries no `detail`
pub const GENERIC_ERROR_MESSAGE: &str = "An API error occurred";

/// Message used when a failed login carries no `detail`
pub const LOGIN_ERROR_MESSAGE: &str = "Login failed";

/// Successful outcome of an API call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    /// 2xx with a JSON body
    Data(T),
    /// 204, or 2xx with an empty body
    NoContent,
}

impl<T> ApiResponse<T> {
    pub fn is_no_content(&self) -> bool {
        matches!(self, ApiResponse::NoContent)
    }

    pub fn data(self) -> Option<T> {
        match self {
            ApiResponse::Data(data) => Some(data),
            ApiResponse::NoContent => None,
        }
    }

    /// Unwrap the payload of an endpoint that always returns one.
    pub fn require(self, path: &str) -> Result<T> {
        match self {
            ApiResponse::Data(data) => Ok(data),
            ApiResponse::NoContent => Err(ApiError::Decode {
                path: path.to_string(),
                reason: "expected a response body, got no content".to_string(),
            }),
        }
    }
}

/// Single chokepoint for GreenTick backend calls.
///
/// Attaches the session's bearer token, serializes JSON bodies and turns
/// every response into an [`ApiResponse`] or an [`ApiError`]. One attempt per
/// call: no retry, no timeout, no backoff.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    session: SessionStore,
    http: reqwest::Client,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: SessionStore) -> Self {
        Self {
            config,
            session,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        Ok(self.config.endpoint(path)?)
    }

    /// Issue a JSON request authenticated with the current session, if any.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
    ) -> Result<ApiResponse<T>> {
        let token = self.session.token();
        self.request_as(method, path, body, token.as_deref()).await
    }

    /// Same as [`ApiClient::request`] with an explicit bearer token.
    pub(crate) async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>> {
        let url = self.url(path)?;
        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        self.dispatch(builder, &method, path, token, GENERIC_ERROR_MESSAGE)
            .await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None).await?.require(path)
    }

    /// JSON POST. A 204 reply is a success without a record.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(body)).await
    }

    /// JSON PUT. A 204 reply is a success without a record.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse<JsonValue>> {
        self.request(Method::DELETE, path, None).await
    }

    /// Body-less POST used by action endpoints such as `/send`
    pub async fn post_action(&self, path: &str) -> Result<ApiResponse<JsonValue>> {
        self.request(Method::POST, path, None).await
    }

    /// Exchange credentials for a token.
    ///
    /// Unlike every other endpoint, `/auth/token` takes a form-encoded body
    /// with the email sent as `username`.
    pub async fn login(&self, email: &str, password: &str) -> Result<greentick_types::TokenResponse> {
        let url = self.url(LOGIN_PATH)?;
        let builder = self
            .http
            .post(url)
            .form(&[("username", email), ("password", password)]);
        self.dispatch(builder, &Method::POST, LOGIN_PATH, None, LOGIN_ERROR_MESSAGE)
            .await?
            .require(LOGIN_PATH)
    }

    /// Send a multipart form, authenticated with the current session.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<ApiResponse<T>> {
        let url = self.url(path)?;
        let token = self.session.token();
        let mut builder = self.http.post(url).multipart(form);
        if let Some(token) = token.as_deref() {
            builder = builder.bearer_auth(token);
        }
        self.dispatch(builder, &Method::POST, path, token.as_deref(), GENERIC_ERROR_MESSAGE)
            .await
    }

    /// Send the request and normalize the response.
    ///
    /// Every failure is logged here before being returned. A 401 only ends
    /// the session when `token` is the one the session currently holds.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &Method,
        path: &str,
        token: Option<&str>,
        fallback_message: &str,
    ) -> Result<ApiResponse<T>> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(method = %method, path = %path, error = %e, "API request error");
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            debug!(method = %method, path = %path, "API request returned no content");
            return Ok(ApiResponse::NoContent);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!(method = %method, path = %path, error = %e, "Failed to read API response");
                return Err(ApiError::Transport(e));
            }
        };

        if status == StatusCode::UNAUTHORIZED
            && token.is_some()
            && self.session.token().as_deref() == token
        {
            warn!(method = %method, path = %path, "Bearer token rejected, clearing session");
            self.session.logout();
            let err = ApiError::SessionExpired;
            error!(method = %method, path = %path, status = status.as_u16(), error = %err, "API request error");
            return Err(err);
        }

        if !status.is_success() {
            let message =
                error_detail(&body).unwrap_or_else(|| fallback_message.to_string());
            error!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                message = %message,
                "API request error"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            debug!(method = %method, path = %path, "API request returned an empty body");
            return Ok(ApiResponse::NoContent);
        }

        match serde_json::from_str(&body) {
            Ok(data) => {
                debug!(method = %method, path = %path, status = status.as_u16(), "API request succeeded");
                Ok(ApiResponse::Data(data))
            }
            Err(e) => {
                let err = ApiError::Decode {
                    path: path.to_string(),
                    reason: e.to_string(),
                };
                error!(method = %method, path = %path, error = %err, "API request error");
                Err(err)
            }
        }
    }
}

/// Extract a human readable message from an error body.
///
/// Understands `{"detail": "..."}`, validation lists
/// `{"detail": [{"msg": "..."}]}` and `{"message": "..."}`.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(body).ok()?;
    let message = match value.get("detail") {
        Some(JsonValue::String(detail)) => Some(detail.clone()),
        Some(JsonValue::Array(errors)) => {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("msg").and_then(JsonValue::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Some(JsonValue::Object(detail)) => detail
            .get("message")
            .and_then(JsonValue::as_str)
            .map(str::to_string),
        _ => value
            .get("message")
            .and_then(JsonValue::as_str)
            .map(str::to_string),
    };
    message.filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        storage::MemoryStore,
        test_backend::{TEST_EMAIL, TEST_PASSWORD, TestBackend},
    };

    #[test]
    fn test_error_detail_shapes() {
        assert_eq!(
            error_detail(r#"{"detail": "Customer not found"}"#).as_deref(),
            Some("Customer not found")
        );
        assert_eq!(
            error_detail(r#"{"detail": [{"loc": ["body", "phone"], "msg": "field required"}, {"msg": "bad amount"}]}"#)
                .as_deref(),
            Some("field required; bad amount")
        );
        assert_eq!(
            error_detail(r#"{"message": "Down for maintenance"}"#).as_deref(),
            Some("Down for maintenance")
        );
        assert_eq!(error_detail(r#"{"detail": ""}"#), None);
        assert_eq!(error_detail("<html>502</html>"), None);
    }

    #[test]
    fn test_require_rejects_no_content() {
        let response: ApiResponse<JsonValue> = ApiResponse::NoContent;
        assert!(matches!(
            response.require("/customers/"),
            Err(ApiError::Decode { .. })
        ));
        assert_eq!(
            ApiResponse::Data(1).require("/customers/").unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_request_attaches_bearer_token() {
        let backend = TestBackend::spawn().await;
        let api = backend.client(SessionStore::new(MemoryStore::new()));

        // no token: rejected, but the session is not "expired"
        let err = api.current_user().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));

        api.session().login(&api, TEST_EMAIL, TEST_PASSWORD).await.unwrap();
        let user = api.current_user().await.unwrap();
        assert_eq!(user.email, TEST_EMAIL);
    }

    #[tokio::test]
    async fn test_delete_no_content_is_success() {
        let backend = TestBackend::spawn().await;
        let api = backend.logged_in_client().await;
        let id = backend.add_customer("Alice", "111");

        let response = api.delete(&format!("/customers/{}", id)).await.unwrap();
        assert!(response.is_no_content());
    }

    #[tokio::test]
    async fn test_status_error_carries_detail() {
        let backend = TestBackend::spawn().await;
        let api = backend.logged_in_client().await;

        let err = api.get::<JsonValue>("/customers/999").await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Customer not found");
            }
            other => panic!("Expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_status_error_falls_back_to_generic_message() {
        let backend = TestBackend::spawn().await;
        let api = backend.logged_in_client().await;
        backend.fail_next_mutation(500, json!({}));

        let err = api
            .post::<JsonValue, _>("/customers/", &json!({"name": "Bob", "phone": "222"}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let backend = TestBackend::spawn().await;
        let api = backend.logged_in_client().await;
        assert!(api.session().is_authenticated());

        backend.revoke_tokens();
        let err = api.get::<JsonValue>("/customers/").await.unwrap_err();

        assert!(matches!(err, ApiError::SessionExpired));
        assert!(!api.session().is_authenticated());
        assert_eq!(api.session().load(), None);
    }

    #[tokio::test]
    async fn test_unauthorized_foreign_token_keeps_session() {
        let backend = TestBackend::spawn().await;
        let api = backend.logged_in_client().await;
        let token = api.session().token();

        let err = api.current_user_as("someone-elses-token").await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 401, .. }));
        assert!(api.session().is_authenticated());
        assert_eq!(api.session().token(), token);
        assert_eq!(api.session().load().map(|s| s.token), token);
    }

    #[tokio::test]
    async fn test_unauthorized_after_relogin_keeps_new_session() {
        let backend = TestBackend::spawn().await;
        let api = backend.logged_in_client().await;
        let stale = api.session().token().unwrap();

        backend.revoke_tokens();
        api.session().login(&api, TEST_EMAIL, TEST_PASSWORD).await.unwrap();
        let err = api.current_user_as(&stale).await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 401, .. }));
        assert!(api.session().is_authenticated());
        assert_ne!(api.session().token().as_deref(), Some(stale.as_str()));
    }

    #[tokio::test]
    async fn test_put_no_content_is_success() {
        let backend = TestBackend::spawn().await;
        let api = backend.logged_in_client().await;
        let id = backend.add_customer("Alice", "111");
        backend.reply_no_content_to_next_mutation();

        let response = api
            .put::<JsonValue, _>(&format!("/customers/{}", id), &json!({"name": "Al", "phone": "111"}))
            .await
            .unwrap();

        assert!(response.is_no_content());
        assert!(api.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let backend = TestBackend::spawn().await;
        let api = backend.client(SessionStore::new(MemoryStore::new()));

        let err = api.login(TEST_EMAIL, "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect username or password");
    }

    #[tokio::test]
    async fn test_transport_error_when_backend_unreachable() {
        let api = ApiClient::new(
            ClientConfig::new("http://127.0.0.1:9").unwrap(),
            SessionStore::new(MemoryStore::new()),
        );
        let err = api.get::<JsonValue>("/customers/").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
