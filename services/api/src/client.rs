//! services/api/src/client.rs
//!
//! The client side of the platform: an HTTP client for the API and the
//! session-aware front end that stands in for the browser application.

use std::sync::Arc;

use oceanus_core::access::{authorize, landing_route, navigation_for, NavItem, Navigation, Route};
use oceanus_core::domain::PublicUser;
use oceanus_core::ports::{PortError, SessionStorage};
use oceanus_core::session::SessionStore;
use oceanus_core::upload::{UploadForm, UploadRequest};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::web::protocol::{LoginResponse, MessageBody, RefreshResponse, UploadResponse, UserView};

//=========================================================================================
// HTTP client
//=========================================================================================

/// Thin typed wrapper over the `/api` endpoints. Every call is a single attempt.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> ApiResult<LoginResponse> {
        let resp = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password, "rememberMe": remember_me }))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn refresh(&self, token: &str) -> ApiResult<RefreshResponse> {
        let resp = self
            .http
            .post(self.url("/api/auth/refresh"))
            .bearer_auth(token)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn me(&self, token: &str) -> ApiResult<UserView> {
        let resp = self
            .http
            .get(self.url("/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn upload(&self, token: &str, req: &UploadRequest) -> ApiResult<UploadResponse> {
        let resp = self
            .http
            .post(self.url("/api/upload"))
            .bearer_auth(token)
            .json(req)
            .send()
            .await?;
        decode(resp).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a response into `T`, or into the error its status and message describe.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let message = resp
        .json::<MessageBody>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| status.to_string());
    debug!("API answered {}: {}", status, message);

    Err(match status {
        StatusCode::BAD_REQUEST => ApiError::bad_request(message),
        StatusCode::UNAUTHORIZED => ApiError::unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::not_found(message),
        _ => ApiError::Internal(message),
    })
}

//=========================================================================================
// Session-aware front end
//=========================================================================================

/// The browser application's behaviour without the markup: holds the session,
/// guards every navigation, and drops the session when the API rejects it.
pub struct OceanusClient {
    api: ApiClient,
    session: SessionStore,
}

impl OceanusClient {
    pub fn new(api: ApiClient, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            api,
            session: SessionStore::restore(storage),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Logs in and returns the route the user lands on.
    pub async fn login(&self, email: &str, password: &str, remember_me: bool) -> ApiResult<Route> {
        let resp = self.api.login(email, password, remember_me).await?;
        let user: PublicUser = resp.user.into();
        let role = user.role;
        self.session.login(resp.token, user, resp.expires_in)?;
        info!("Logged in as {}", role);
        Ok(landing_route(role))
    }

    /// Clears the session; the caller should show the login view.
    pub fn logout(&self) -> ApiResult<Route> {
        self.session.logout()?;
        Ok(Route::Login)
    }

    pub async fn whoami(&self) -> ApiResult<PublicUser> {
        let token = self.require_token()?;
        let user = self.expire_on_unauthorized(self.api.me(&token).await)?;
        Ok(user.into())
    }

    pub async fn refresh(&self) -> ApiResult<()> {
        let token = self.require_token()?;
        let resp = self.expire_on_unauthorized(self.api.refresh(&token).await)?;
        self.session.refresh(resp.token, resp.expires_in)?;
        Ok(())
    }

    /// Evaluates the route guard for `path` against the current session.
    pub fn open(&self, path: &str) -> Navigation {
        authorize(self.session.get().as_ref(), path)
    }

    pub fn navigation(&self) -> Vec<NavItem> {
        self.session
            .user()
            .map(|user| navigation_for(user.role))
            .unwrap_or_default()
    }

    /// Validates the form locally and only then sends it.
    pub async fn upload(&self, form: UploadForm) -> ApiResult<UploadResponse> {
        let req = form.into_request()?;
        let token = self.require_token()?;
        self.expire_on_unauthorized(self.api.upload(&token, &req).await)
    }

    fn require_token(&self) -> ApiResult<String> {
        self.session
            .token()
            .ok_or_else(|| ApiError::Port(PortError::Unauthorized("Not logged in".to_string())))
    }

    fn expire_on_unauthorized<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(ApiError::Port(PortError::Unauthorized(_))) = &result {
            info!("Session rejected by the API, logging out");
            self.session.logout()?;
        }
        result
    }
}
