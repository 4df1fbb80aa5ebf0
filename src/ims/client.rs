// IMS grading gateway HTTP client.
// Logs in with the full credential triple and fetches grades one year at a time.

use reqwest::{
    Client, Response, StatusCode,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::backend::{Grade, LoginDetails};
use crate::error::{Result, TauError};

const SERVICE_NAME: &str = "IMS";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    id: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Grade value as reported: numeric, textual ("85", "Pass"), or absent.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GradeValue {
    Number(f64),
    Text(String),
}

impl GradeValue {
    fn numeric(self) -> Option<f64> {
        match self {
            GradeValue::Number(n) => Some(n),
            GradeValue::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImsGrade {
    semester: String,
    course_id: String,
    grade: Option<GradeValue>,
}

impl From<ImsGrade> for Grade {
    fn from(grade: ImsGrade) -> Self {
        Grade {
            semester: grade.semester,
            course_id: grade.course_id,
            grade: grade.grade.and_then(GradeValue::numeric),
        }
    }
}

/// IMS client. Connects lazily on the first grade request.
pub struct ImsClient {
    client: Client,
    base_url: String,
    login: LoginDetails,
    token: OnceCell<String>,
}

impl ImsClient {
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
            token: OnceCell::new(),
        })
    }

    /// Session token, logging in first if needed.
    pub async fn token(&self) -> Result<&str> {
        let token = self.token.get_or_try_init(|| self.log_in()).await?;
        Ok(token.as_str())
    }

    async fn log_in(&self) -> Result<String> {
        tracing::info!(username = %self.login.username, "connecting to IMS");
        let url = format!("{}/api/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest {
                username: &self.login.username,
                id: &self.login.id,
                password: &self.login.password,
            })
            .send()
            .await
            .map_err(TauError::Api)?;

        let body: LoginResponse = check_response(response).await?.json().await?;
        Ok(body.token)
    }

    /// Grades recorded for one academic year. Years with no record yield nothing.
    pub async fn get_grades_for_year(&self, year: i32) -> Result<Vec<Grade>> {
        let token = self.token().await?;
        let url = format!("{}/api/grades", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("year", year)])
            .send()
            .await
            .map_err(TauError::Api)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let grades: Vec<ImsGrade> = check_response(response).await?.json().await?;
        tracing::debug!(year, count = grades.len(), "fetched grades");
        Ok(grades.into_iter().map(Grade::from).collect())
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
