use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, instrument};

use crate::db;
use crate::env::AppConfig;
use crate::error::{AppError, ErrorResponse};
use crate::models::{MessageResponse, NewTeacher, Teacher, TeacherChanges};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error(transparent)]
    Store(#[from] AppError),
}

/// Operations the teacher page needs from the backend.
#[rocket::async_trait]
pub trait TeacherApi: Send + Sync {
    async fn list_teachers(&self) -> Result<Vec<Teacher>, ClientError>;

    async fn available_subjects(&self) -> Result<Vec<String>, ClientError>;

    async fn create_teacher(&self, teacher: &NewTeacher) -> Result<Teacher, ClientError>;

    /// `None` when the server has no teacher with this id.
    async fn update_teacher(
        &self,
        id: i64,
        changes: &TeacherChanges,
    ) -> Result<Option<Teacher>, ClientError>;

    async fn delete_teacher(&self, id: i64) -> Result<(), ClientError>;
}

/// JSON client for the `/api` routes.
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[rocket::async_trait]
impl TeacherApi for HttpApi {
    #[instrument(skip(self))]
    async fn list_teachers(&self) -> Result<Vec<Teacher>, ClientError> {
        let response = self.client.get(self.url("/teachers")).send().await?;
        read_json(response).await
    }

    #[instrument(skip(self))]
    async fn available_subjects(&self) -> Result<Vec<String>, ClientError> {
        let response = self
            .client
            .get(self.url("/scheduling/available-subjects"))
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(skip_all, fields(username = %teacher.username))]
    async fn create_teacher(&self, teacher: &NewTeacher) -> Result<Teacher, ClientError> {
        let response = self
            .client
            .post(self.url("/teachers"))
            .json(teacher)
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(skip(self, changes))]
    async fn update_teacher(
        &self,
        id: i64,
        changes: &TeacherChanges,
    ) -> Result<Option<Teacher>, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/teachers/{}", id)))
            .json(changes)
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(skip(self))]
    async fn delete_teacher(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/teachers/{}", id)))
            .send()
            .await?;
        let confirmation: MessageResponse = read_json(response).await?;
        info!(message = %confirmation.message, "Teacher delete confirmed");
        Ok(())
    }
}

/// Same operations without HTTP, straight against the database.
#[derive(Clone, Debug)]
pub struct StoreApi {
    pool: SqlitePool,
}

impl StoreApi {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[rocket::async_trait]
impl TeacherApi for StoreApi {
    async fn list_teachers(&self) -> Result<Vec<Teacher>, ClientError> {
        Ok(db::get_all_teachers(&self.pool).await?)
    }

    async fn available_subjects(&self) -> Result<Vec<String>, ClientError> {
        Ok(db::get_available_subjects(&self.pool).await?)
    }

    async fn create_teacher(&self, teacher: &NewTeacher) -> Result<Teacher, ClientError> {
        Ok(db::create_teacher(&self.pool, teacher).await?)
    }

    async fn update_teacher(
        &self,
        id: i64,
        changes: &TeacherChanges,
    ) -> Result<Option<Teacher>, ClientError> {
        Ok(db::update_teacher(&self.pool, id, changes).await?)
    }

    async fn delete_teacher(&self, id: i64) -> Result<(), ClientError> {
        db::delete_teacher(&self.pool, id).await?;
        Ok(())
    }
}
