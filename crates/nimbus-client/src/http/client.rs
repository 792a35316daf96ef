//! HTTP gateway implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use nimbus_core::config::ApiConfig;
use nimbus_core::error::{AppError, ErrorKind};
use nimbus_core::result::AppResult;
use nimbus_core::types::{FileId, FolderId, Page, PageRequest};
use nimbus_entity::user::AuthResponse;
use nimbus_entity::{
    AuthSession, File, Folder, LoginRequest, RegisterRequest, StorageUsage, UserProfile,
};

use super::envelope::{self, ApiEnvelope};
use crate::gateway::{DriveGateway, FileUpload};

/// Gateway that talks to the drive REST API over HTTP.
pub struct HttpGateway {
    /// Shared connection pool.
    client: Client,
    /// API root; endpoint segments are appended to its path.
    base_url: Url,
    /// Bearer token for authenticated calls.
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    /// Build a gateway from the `[api]` configuration section.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid api.base_url '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "api.base_url '{}' cannot carry endpoint paths",
                config.base_url
            )));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .default_headers(default_headers)
            .user_agent(concat!("nimbus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e.without_url(),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Resolve an endpoint from path segments and query pairs.
    ///
    /// Segments are percent-encoded individually so opaque ids cannot
    /// escape their position in the path.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::configuration("api.base_url cannot carry endpoint paths"))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Attach the bearer token, if one is set.
    async fn authorize(&self, request: RequestBuilder) -> AppResult<RequestBuilder> {
        let token = self.token.read().await;
        match token.as_deref() {
            Some(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    AppError::authentication("Stored token contains invalid characters")
                })?;
                Ok(request.header(AUTHORIZATION, value))
            }
            None => Ok(request),
        }
    }

    /// Send a request and turn non-2xx answers into errors.
    async fn execute(&self, request: RequestBuilder) -> AppResult<Response> {
        let request = request.build().map_err(transport_error)?;
        // Query strings can carry folder passwords; only the path is logged.
        debug!(method = %request.method(), path = request.url().path(), "Drive API request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let fallback = status.canonical_reason().unwrap_or("Request failed");
        let message = envelope::error_message(&body, fallback);
        warn!(status = status.as_u16(), message = %message, "Drive API returned an error");
        Err(AppError::from_status(status.as_u16(), message))
    }

    /// Authenticated call returning the envelope payload.
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let request = self.authorize(request).await?;
        self.decode(self.execute(request).await?).await
    }

    /// Authenticated call whose payload is ignored.
    async fn call_unit(&self, request: RequestBuilder) -> AppResult<()> {
        let request = self.authorize(request).await?;
        let body = self
            .execute(request)
            .await?
            .bytes()
            .await
            .map_err(transport_error)?;
        if body.is_empty() {
            return Ok(());
        }
        let envelope: ApiEnvelope<IgnoredAny> = serde_json::from_slice(&body)?;
        envelope.into_unit()
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> AppResult<T> {
        let body = response.bytes().await.map_err(transport_error)?;
        envelope::decode(&body)
    }
}

/// Classify a reqwest failure. The URL is stripped because query strings
/// may hold secrets.
fn transport_error(err: reqwest::Error) -> AppError {
    let err = err.without_url();
    let (kind, message) = if err.is_timeout() {
        (ErrorKind::Network, "Request timed out")
    } else if err.is_connect() {
        (ErrorKind::Network, "Could not connect to the drive server")
    } else if err.is_decode() || err.is_body() {
        (ErrorKind::Server, "Could not read the server response")
    } else if err.is_builder() {
        (ErrorKind::Internal, "Could not build the request")
    } else {
        (ErrorKind::Network, "Request failed")
    };
    AppError::with_source(kind, format!("{message}: {err}"), err)
}

#[async_trait]
impl DriveGateway for HttpGateway {
    async fn set_bearer_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn login(&self, request: &LoginRequest) -> AppResult<AuthSession> {
        let url = self.endpoint(&["auth", "login"], &[])?;
        let response = self.execute(self.request(Method::POST, url).json(request)).await?;
        let auth: AuthResponse = self.decode(response).await?;
        Ok(auth.into())
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<AuthSession> {
        let url = self.endpoint(&["auth", "register"], &[])?;
        let response = self.execute(self.request(Method::POST, url).json(request)).await?;
        let auth: AuthResponse = self.decode(response).await?;
        Ok(auth.into())
    }

    async fn current_user(&self) -> AppResult<UserProfile> {
        let url = self.endpoint(&["auth", "me"], &[])?;
        self.call(self.request(Method::GET, url)).await
    }

    async fn list_files(&self, folder_id: Option<&FolderId>) -> AppResult<Vec<File>> {
        let query: Vec<(&str, &str)> = folder_id
            .map(|id| vec![("folderId", id.as_str())])
            .unwrap_or_default();
        let url = self.endpoint(&["files"], &query)?;
        self.call(self.request(Method::GET, url)).await
    }

    async fn search_files(&self, query: &str, page: PageRequest) -> AppResult<Page<File>> {
        let page_number = page.page.to_string();
        let size = page.size.to_string();
        let url = self.endpoint(
            &["files", "search"],
            &[("q", query), ("page", &page_number), ("size", &size)],
        )?;
        self.call(self.request(Method::GET, url)).await
    }

    async fn starred_files(&self) -> AppResult<Vec<File>> {
        let url = self.endpoint(&["files", "starred"], &[])?;
        self.call(self.request(Method::GET, url)).await
    }

    async fn recent_files(&self) -> AppResult<Vec<File>> {
        let url = self.endpoint(&["files", "recent"], &[])?;
        self.call(self.request(Method::GET, url)).await
    }

    async fn get_file(&self, id: &FileId) -> AppResult<File> {
        let url = self.endpoint(&["files", id.as_str()], &[])?;
        self.call(self.request(Method::GET, url)).await
    }

    async fn upload_file(&self, upload: FileUpload) -> AppResult<File> {
        let url = self.endpoint(&["files", "upload"], &[])?;
        let size = upload.size();
        let part = reqwest::multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| {
                AppError::validation(format!("Invalid MIME type '{}': {e}", upload.mime_type))
            })?;
        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(folder_id) = upload.folder_id {
            form = form.text("folderId", folder_id.into_inner());
        }

        debug!(name = %upload.name, size, "Uploading file");
        self.call(self.request(Method::POST, url).multipart(form))
            .await
    }

    async fn download_file(&self, id: &FileId) -> AppResult<Bytes> {
        let url = self.endpoint(&["files", id.as_str(), "download"], &[])?;
        let request = self
            .authorize(self.request(Method::GET, url).header(ACCEPT, "*/*"))
            .await?;
        self.execute(request)
            .await?
            .bytes()
            .await
            .map_err(transport_error)
    }

    async fn toggle_file_star(&self, id: &FileId) -> AppResult<File> {
        let url = self.endpoint(&["files", id.as_str(), "star"], &[])?;
        self.call(self.request(Method::POST, url)).await
    }

    async fn rename_file(&self, id: &FileId, name: &str) -> AppResult<File> {
        let url = self.endpoint(&["files", id.as_str()], &[("name", name)])?;
        self.call(self.request(Method::PUT, url)).await
    }

    async fn delete_file(&self, id: &FileId) -> AppResult<()> {
        let url = self.endpoint(&["files", id.as_str()], &[])?;
        self.call_unit(self.request(Method::DELETE, url)).await
    }

    async fn create_folder(&self, name: &str, parent_id: Option<&FolderId>) -> AppResult<Folder> {
        let mut query = vec![("name", name)];
        if let Some(parent_id) = parent_id {
            query.push(("parentId", parent_id.as_str()));
        }
        let url = self.endpoint(&["folders"], &query)?;
        self.call(self.request(Method::POST, url)).await
    }

    async fn list_folders(&self, parent_id: Option<&FolderId>) -> AppResult<Vec<Folder>> {
        let query: Vec<(&str, &str)> = parent_id
            .map(|id| vec![("parentId", id.as_str())])
            .unwrap_or_default();
        let url = self.endpoint(&["folders"], &query)?;
        self.call(self.request(Method::GET, url)).await
    }

    async fn get_folder(&self, id: &FolderId) -> AppResult<Folder> {
        let url = self.endpoint(&["folders", id.as_str()], &[])?;
        self.call(self.request(Method::GET, url)).await
    }

    async fn rename_folder(&self, id: &FolderId, name: &str) -> AppResult<Folder> {
        let url = self.endpoint(&["folders", id.as_str()], &[("name", name)])?;
        self.call(self.request(Method::PUT, url)).await
    }

    async fn toggle_folder_star(&self, id: &FolderId) -> AppResult<Folder> {
        let url = self.endpoint(&["folders", id.as_str(), "star"], &[])?;
        self.call(self.request(Method::POST, url)).await
    }

    async fn delete_folder(&self, id: &FolderId) -> AppResult<()> {
        let url = self.endpoint(&["folders", id.as_str()], &[])?;
        self.call_unit(self.request(Method::DELETE, url)).await
    }

    async fn lock_folder(&self, id: &FolderId, password: &str) -> AppResult<Folder> {
        let url = self.endpoint(&["folders", id.as_str(), "lock"], &[("password", password)])?;
        self.call(self.request(Method::POST, url)).await
    }

    async fn unlock_folder(&self, id: &FolderId, password: &str) -> AppResult<Folder> {
        let url = self.endpoint(
            &["folders", id.as_str(), "unlock"],
            &[("password", password)],
        )?;
        self.call(self.request(Method::POST, url)).await
    }

    async fn verify_folder_password(&self, id: &FolderId, password: &str) -> AppResult<bool> {
        let url = self.endpoint(
            &["folders", id.as_str(), "verify-password"],
            &[("password", password)],
        )?;
        self.call(self.request(Method::POST, url)).await
    }

    async fn storage_usage(&self) -> AppResult<StorageUsage> {
        let url = self.endpoint(&["storage", "usage"], &[])?;
        self.call(self.request(Method::GET, url)).await
    }
}
