//! reqwest-backed implementation of the repository traits.
//!
//! Talks to the course backend's REST surface:
//!
//! | Operation | Route |
//! |-----------|-------|
//! | fetch detail | `GET courses/{id}/` |
//! | enroll / leave | `POST` / `DELETE courses/{id}/enroll/` |
//! | invite | `POST courses/{id}/members/` |
//! | update / remove membership | `PATCH` / `DELETE courses/{id}/members/{mid}/` |
//! | create module | `POST courses/{id}/modules/` |
//! | update / delete module | `PATCH` / `DELETE courses/{id}/modules/{mid}/` |
//!
//! Documented response codes are mapped onto [`CourseError`] per
//! endpoint (a 409 on enroll means "already a member", a 409 on leave
//! means "last teacher"); anything else becomes
//! [`CourseError::Backend`]. No retrying happens here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};

use crate::repository::{
    CourseRepository, CreateModule, InviteMember, MembershipChanges, MembershipRepository,
    ModuleChanges, ModuleRepository,
};
use crate::types::{CourseDetail, CourseMembership, CourseModule};
use crate::CourseError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the course backend.
#[derive(Clone)]
pub struct HttpCourseBackend {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpCourseBackend {
    /// Creates a client for the API rooted at `base_url`
    /// (e.g. `https://example.org/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, CourseError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CourseError::Backend(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token: None,
            client,
        })
    }

    /// Attaches a bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, CourseError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| CourseError::Backend(e.to_string()))
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, CourseError> {
        response
            .json::<T>()
            .await
            .map_err(|e| CourseError::Backend(e.to_string()))
    }

    async fn backend_error(response: Response) -> CourseError {
        let status = response.status();
        let detail = response.text().await.unwrap_or_default();
        CourseError::Backend(format!("unexpected status {status}: {detail}"))
    }
}

#[async_trait]
impl CourseRepository for HttpCourseBackend {
    async fn fetch_detail(&self, course_id: i64) -> Result<CourseDetail, CourseError> {
        let url = self.url(&format!("courses/{course_id}/"));
        let response = self.send(self.client.get(url)).await?;

        match response.status() {
            StatusCode::OK => Self::parse(response).await,
            StatusCode::NOT_FOUND => Err(CourseError::CourseNotFound),
            StatusCode::FORBIDDEN => Err(CourseError::Forbidden),
            _ => Err(Self::backend_error(response).await),
        }
    }
}

#[async_trait]
impl MembershipRepository for HttpCourseBackend {
    async fn enroll(&self, course_id: i64) -> Result<CourseMembership, CourseError> {
        let url = self.url(&format!("courses/{course_id}/enroll/"));
        let response = self.send(self.client.post(url)).await?;

        match response.status() {
            StatusCode::CREATED => Self::parse(response).await,
            StatusCode::CONFLICT => Err(CourseError::AlreadyMember),
            StatusCode::FORBIDDEN => Err(CourseError::EnrollmentClosed),
            StatusCode::NOT_FOUND => Err(CourseError::CourseNotFound),
            _ => Err(Self::backend_error(response).await),
        }
    }

    async fn leave(&self, course_id: i64) -> Result<(), CourseError> {
        let url = self.url(&format!("courses/{course_id}/enroll/"));
        let response = self.send(self.client.delete(url)).await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(CourseError::MembershipNotFound),
            StatusCode::CONFLICT => Err(CourseError::LastTeacher),
            _ => Err(Self::backend_error(response).await),
        }
    }

    async fn invite(
        &self,
        course_id: i64,
        data: InviteMember,
    ) -> Result<CourseMembership, CourseError> {
        let url = self.url(&format!("courses/{course_id}/members/"));
        let response = self.send(self.client.post(url).json(&data)).await?;

        match response.status() {
            StatusCode::CREATED => Self::parse(response).await,
            StatusCode::CONFLICT => Err(CourseError::AlreadyMember),
            StatusCode::FORBIDDEN => Err(CourseError::Forbidden),
            StatusCode::NOT_FOUND => Err(CourseError::CourseNotFound),
            _ => Err(Self::backend_error(response).await),
        }
    }

    async fn update(
        &self,
        course_id: i64,
        membership_id: i64,
        changes: MembershipChanges,
    ) -> Result<CourseMembership, CourseError> {
        let url = self.url(&format!("courses/{course_id}/members/{membership_id}/"));
        let response = self.send(self.client.patch(url).json(&changes)).await?;

        match response.status() {
            StatusCode::OK => Self::parse(response).await,
            StatusCode::NOT_FOUND => Err(CourseError::MembershipNotFound),
            StatusCode::FORBIDDEN => Err(CourseError::Forbidden),
            StatusCode::CONFLICT => Err(CourseError::LastTeacher),
            _ => Err(Self::backend_error(response).await),
        }
    }

    async fn remove(&self, course_id: i64, membership_id: i64) -> Result<(), CourseError> {
        let url = self.url(&format!("courses/{course_id}/members/{membership_id}/"));
        let response = self.send(self.client.delete(url)).await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(CourseError::MembershipNotFound),
            StatusCode::FORBIDDEN => Err(CourseError::Forbidden),
            StatusCode::CONFLICT => Err(CourseError::LastTeacher),
            _ => Err(Self::backend_error(response).await),
        }
    }
}

#[async_trait]
impl ModuleRepository for HttpCourseBackend {
    async fn create(
        &self,
        course_id: i64,
        data: CreateModule,
    ) -> Result<CourseModule, CourseError> {
        let url = self.url(&format!("courses/{course_id}/modules/"));
        let response = self.send(self.client.post(url).json(&data)).await?;

        match response.status() {
            StatusCode::CREATED => Self::parse(response).await,
            StatusCode::FORBIDDEN => Err(CourseError::Forbidden),
            StatusCode::NOT_FOUND => Err(CourseError::CourseNotFound),
            _ => Err(Self::backend_error(response).await),
        }
    }

    async fn update(
        &self,
        course_id: i64,
        module_id: i64,
        changes: ModuleChanges,
    ) -> Result<CourseModule, CourseError> {
        let url = self.url(&format!("courses/{course_id}/modules/{module_id}/"));
        let response = self.send(self.client.patch(url).json(&changes)).await?;

        match response.status() {
            StatusCode::OK => Self::parse(response).await,
            StatusCode::NOT_FOUND => Err(CourseError::ModuleNotFound),
            StatusCode::FORBIDDEN => Err(CourseError::Forbidden),
            _ => Err(Self::backend_error(response).await),
        }
    }

    async fn delete(&self, course_id: i64, module_id: i64) -> Result<(), CourseError> {
        let url = self.url(&format!("courses/{course_id}/modules/{module_id}/"));
        let response = self.send(self.client.delete(url)).await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(CourseError::ModuleNotFound),
            StatusCode::FORBIDDEN => Err(CourseError::Forbidden),
            _ => Err(Self::backend_error(response).await),
        }
    }
}
