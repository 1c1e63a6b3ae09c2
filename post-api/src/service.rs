use std::future::Future;
use std::time::Duration;

use post_composition::{
    Category, CategorySource, LocalImage, PostSubmitter, Submission, UploadError, UploadResolver,
};
use serde::de::DeserializeOwned;

use crate::models::{
    ApiConfig, ApiResponse, CategoryList, CreatePostRequest, CreatedPost, PreSignedUrl,
};

/// Error type for backend calls
#[derive(Debug)]
pub enum ApiError {
    NetworkError(String),
    JsonError(String),
    ServerError(String),
    ImageError(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ApiError::JsonError(msg) => write!(f, "JSON error: {}", msg),
            ApiError::ServerError(msg) => write!(f, "Server error: {}", msg),
            ApiError::ImageError(msg) => write!(f, "Image error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ApiError> for UploadError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::ImageError(msg) => UploadError::CorruptImage(msg),
            other => UploadError::Transfer(other.to_string()),
        }
    }
}

/// Client for the post backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct PostApiService {
    config: ApiConfig,
    client: reqwest::Client,
}

impl PostApiService {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent(concat!("post-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::NetworkError(format!("Client build failed: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and unwraps the response envelope
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self
            .authorized(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::ServerError(format!(
                "Server returned status: {}",
                response.status()
            )));
        }

        let envelope = response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| ApiError::JsonError(format!("Failed to parse response: {}", e)))?;

        envelope.data.ok_or_else(|| {
            ApiError::ServerError(format!(
                "Empty response ({}): {}",
                envelope.status_code, envelope.response_message
            ))
        })
    }

    /// Requests a pre-signed URL for one post image
    pub async fn pre_signed_post_url(&self) -> Result<String, ApiError> {
        let url = self.endpoint("images/presigned-url");
        let signed: PreSignedUrl = self.send_json(self.client.get(&url)).await?;
        Ok(signed.url)
    }

    /// PUTs raw image bytes to a pre-signed URL
    pub async fn put_image(&self, signed_url: &str, data: Vec<u8>) -> Result<(), ApiError> {
        let response = self
            .client
            .put(signed_url)
            .header("Content-Type", "image/jpeg")
            .body(data)
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(format!("Image upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::ServerError(format!(
                "Storage returned status: {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Uploads a local image and returns its public URL
    pub async fn upload_image(&self, image: &LocalImage) -> Result<String, ApiError> {
        let data = read_local_image(image).await?;
        let signed_url = self.pre_signed_post_url().await?;
        self.put_image(&signed_url, data).await?;

        let public_url = strip_query(&signed_url).to_string();
        log::info!("Uploaded {} to {}", image.uri, public_url);
        Ok(public_url)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint("categories");
        let list: CategoryList = self.send_json(self.client.get(&url)).await?;
        Ok(list.selectable())
    }

    pub async fn create_post(&self, submission: &Submission) -> Result<i64, ApiError> {
        let url = self.endpoint("posts");
        let body = CreatePostRequest::from(submission);
        let created: CreatedPost = self.send_json(self.client.post(&url).json(&body)).await?;
        log::info!(
            "Created post {} with {} image(s)",
            created.id,
            body.images.len()
        );
        Ok(created.id)
    }
}

impl UploadResolver for PostApiService {
    fn resolve(
        &self,
        image: &LocalImage,
    ) -> impl Future<Output = Result<String, UploadError>> + Send {
        let service = self.clone();
        let image = image.clone();
        async move { service.upload_image(&image).await.map_err(UploadError::from) }
    }
}

impl CategorySource for PostApiService {
    type Error = ApiError;

    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, ApiError>> {
        self.fetch_categories()
    }
}

impl PostSubmitter for PostApiService {
    type Error = ApiError;

    fn submit(&self, submission: &Submission) -> impl Future<Output = Result<i64, ApiError>> {
        self.create_post(submission)
    }
}

/// Public object URL: the pre-signed URL without its signature query
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Local path behind an image handle (`file://` URIs or plain paths)
pub fn local_path(image: &LocalImage) -> &str {
    image.uri.strip_prefix("file://").unwrap_or(&image.uri)
}

async fn read_local_image(image: &LocalImage) -> Result<Vec<u8>, ApiError> {
    let path = local_path(image);
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::ImageError(format!("{}: {}", path, e)))?;

    if data.is_empty() {
        return Err(ApiError::ImageError(format!("{}: file is empty", path)));
    }
    Ok(data)
}
