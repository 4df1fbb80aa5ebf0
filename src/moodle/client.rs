// Moodle web-service HTTP client.
// Handles token login, REST function calls, and Moodle error payloads.

use reqwest::{
    Client, Response, StatusCode,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::backend::LoginDetails;
use crate::error::{Result, TauError};

use super::types::{MoodleException, SiteInfo, TokenResponse};

const LOGIN_PATH: &str = "/login/token.php";
const REST_PATH: &str = "/webservice/rest/server.php";
const MOBILE_SERVICE: &str = "moodle_mobile_app";
const SERVICE_NAME: &str = "Moodle";

/// Token and user id obtained at login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: u64,
}

/// Moodle client. Logs in lazily on the first call and reuses the token.
pub struct MoodleClient {
    client: Client,
    base_url: String,
    login: LoginDetails,
    session: OnceCell<Session>,
}

impl MoodleClient {
    /// Create a client for the Moodle site at `base_url`.
    pub fn new(base_url: &str, login: LoginDetails) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("tau-cli"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(TauError::Api)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            login,
            session: OnceCell::new(),
        })
    }

    /// Current session, logging in first if needed.
    pub async fn session(&self) -> Result<&Session> {
        self.session.get_or_try_init(|| self.log_in()).await
    }

    async fn log_in(&self) -> Result<Session> {
        tracing::info!(username = %self.login.username, "logging in to Moodle");
        let url = format!("{}{}", self.base_url, LOGIN_PATH);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("username", self.login.username.as_str()),
                ("password", self.login.password.as_str()),
                ("service", MOBILE_SERVICE),
            ])
            .send()
            .await
            .map_err(TauError::Api)?;

        let body: TokenResponse = check_response(response).await?.json().await?;
        let token = match body {
            TokenResponse {
                token: Some(token), ..
            } => token,
            TokenResponse {
                errorcode: Some(code),
                ..
            } if code == "invalidlogin" => return Err(TauError::Unauthorized),
            TokenResponse { error, .. } => {
                return Err(TauError::Remote {
                    service: SERVICE_NAME,
                    message: error.unwrap_or_else(|| "login returned no token".to_string()),
                });
            }
        };

        let info: SiteInfo = self
            .call_with_token(&token, "core_webservice_get_site_info", &[])
            .await?;

        Ok(Session {
            token,
            user_id: info.userid,
        })
    }

    /// Call a web-service function and decode its JSON result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        function: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let session = self.session().await?;
        self.call_with_token(&session.token, function, params).await
    }

    async fn call_with_token<T: DeserializeOwned>(
        &self,
        token: &str,
        function: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, REST_PATH);
        let mut form: Vec<(&str, &str)> = vec![
            ("wstoken", token),
            ("wsfunction", function),
            ("moodlewsrestformat", "json"),
        ];
        form.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        tracing::debug!(function, "calling Moodle web service");
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(TauError::Api)?;

        let value: serde_json::Value = check_response(response).await?.json().await?;
        if let Some(exception) = MoodleException::from_value(&value) {
            return Err(exception.into_error());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Make a pluginfile URL downloadable outside the app by attaching the token.
    pub fn file_url(&self, file_url: &str) -> String {
        match self.session.get() {
            Some(session) if file_url.contains("/webservice/pluginfile.php") => {
                let separator = if file_url.contains('?') { '&' } else { '?' };
                format!("{}{}token={}", file_url, separator, session.token)
            }
            _ => file_url.to_string(),
        }
    }
}

impl MoodleException {
    fn into_error(self) -> TauError {
        match self.errorcode.as_deref() {
            Some("invalidtoken") | Some("invalidlogin") => TauError::Unauthorized,
            _ => TauError::Remote {
                service: SERVICE_NAME,
                message: self.message.unwrap_or(self.exception),
            },
        }
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        StatusCode::OK => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(TauError::Unauthorized),
        status => Err(TauError::Remote {
            service: SERVICE_NAME,
            message: format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ),
        }),
    }
}
