use crate::config::WorkflowConfig;
use crate::traits::StorageBackend;
use crate::types::{Document, Result, UploadResponse, UploadResult, WorkflowError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Uploads documents to the storage endpoint as multipart form data
pub struct HttpStorageBackend {
    client: Client,
    endpoint: String,
    api_token: String,
    user_id: String,
    app_slug: String,
    timeout: Duration,
}

impl HttpStorageBackend {
    pub fn new(config: &WorkflowConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &WorkflowConfig) -> Self {
        Self {
            client,
            endpoint: config.upload_endpoint(),
            api_token: config.api_token.clone(),
            user_id: config.user_id.clone(),
            app_slug: config.app_slug.clone(),
            timeout: config.upload_timeout(),
        }
    }

    fn build_form(&self, document: &Document) -> Result<Form> {
        let file_part = Part::bytes(document.bytes.clone())
            .file_name(document.name.clone())
            .mime_str(&document.mime_type)?;

        Ok(Form::new()
            .part("file", file_part)
            .text("userId", self.user_id.clone())
            .text("appSlug", self.app_slug.clone()))
    }

    // The request timeout also covers reading the body
    fn transport_failure(&self, e: reqwest::Error) -> WorkflowError {
        if e.is_timeout() {
            WorkflowError::UploadFailed(format!("timed out after {:?}", self.timeout))
        } else {
            WorkflowError::UploadFailed(e.to_string())
        }
    }
}

#[async_trait]
impl StorageBackend for HttpStorageBackend {
    fn backend_name(&self) -> String {
        format!("HTTP storage ({})", self.endpoint)
    }

    async fn upload(&self, document: &Document) -> Result<UploadResult> {
        let start_time = Instant::now();
        debug!("Uploading {} ({} bytes) to {}", document.name, document.len(), self.endpoint);

        let form = self.build_form(document)?;

        let response = self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Storage endpoint answered HTTP {} for {}", status, document.name);
            return Err(WorkflowError::UploadFailed(format!(
                "HTTP {}: {}",
                status,
                error_text
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.transport_failure(e)
                } else {
                    WorkflowError::UploadFailed(format!("malformed response: {}", e))
                }
            })?;

        info!(
            "Upload of {} finished in {}ms (success: {})",
            document.name,
            start_time.elapsed().as_millis(),
            body.success
        );

        Ok(body.into())
    }
}

/// Storage stand-in that pretends to process the file for a while.
/// Always succeeds with a `memory://` URL.
pub struct SimulatedStorageBackend {
    delay_ms: u64,
}

impl SimulatedStorageBackend {
    pub fn new() -> Self {
        Self {
            delay_ms: 2000,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

impl Default for SimulatedStorageBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for SimulatedStorageBackend {
    fn backend_name(&self) -> String {
        "Simulated storage".to_string()
    }

    async fn upload(&self, document: &Document) -> Result<UploadResult> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        debug!("Simulated upload of {}", document.name);
        Ok(UploadResult {
            success: true,
            url: format!("memory://{}/{}", Uuid::new_v4(), document.name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_upload_points_at_the_file() -> Result<()> {
        let backend = SimulatedStorageBackend::new().with_delay(0);
        let doc = Document::new("report.pdf", "application/pdf", b"%PDF".to_vec());

        let result = backend.upload(&doc).await?;
        assert!(result.success);
        assert!(result.url.starts_with("memory://"));
        assert!(result.url.ends_with("/report.pdf"));
        Ok(())
    }

    #[test]
    fn bad_mime_string_fails_form_building() {
        let backend = HttpStorageBackend::new(&WorkflowConfig::default()).unwrap();
        let doc = Document::new("x.pdf", "not a mime", Vec::new());
        assert!(backend.build_form(&doc).is_err());
    }
}
