use crate::config::WorkflowConfig;
use crate::traits::SummaryBackend;
use crate::types::{AiMessage, AiRequest, AiResponse, ContentPart, ImageUrl, Result, SummaryLength, WorkflowError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const SUMMARY_PROMPT: &str = "Please analyze this document and provide a summary with key points";

/// Instruction sent with every document.
///
/// With `thread_length` off the selected length is not sent at all and the
/// prompt is always `SUMMARY_PROMPT`.
pub fn build_prompt(length: SummaryLength, thread_length: bool) -> String {
    if !thread_length {
        return SUMMARY_PROMPT.to_string();
    }

    let guidance = match length {
        SummaryLength::Short => "Keep the summary short.",
        SummaryLength::Medium => "Keep the summary of medium length.",
        SummaryLength::Long => "Make the summary detailed.",
    };
    format!("{}. {}", SUMMARY_PROMPT, guidance)
}

/// One user message carrying the prompt and a reference to the uploaded file.
pub fn build_request(prompt: String, document_url: &str) -> AiRequest {
    AiRequest {
        messages: vec![AiMessage {
            role: "user".to_string(),
            content: vec![
                ContentPart::Text { text: prompt },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: document_url.to_string(),
                    },
                },
            ],
        }],
    }
}

/// Calls the AI endpoint over HTTP
pub struct HttpSummaryBackend {
    client: Client,
    endpoint: String,
    api_token: String,
    timeout: Duration,
    thread_length: bool,
}

impl HttpSummaryBackend {
    pub fn new(config: &WorkflowConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &WorkflowConfig) -> Self {
        Self {
            client,
            endpoint: config.ai_endpoint(),
            api_token: config.api_token.clone(),
            timeout: config.summarize_timeout(),
            thread_length: config.thread_summary_length,
        }
    }

    // The request timeout also covers reading the body
    fn transport_failure(&self, e: reqwest::Error) -> WorkflowError {
        if e.is_timeout() {
            WorkflowError::SummarizationFailed(format!("timed out after {:?}", self.timeout))
        } else {
            WorkflowError::SummarizationFailed(e.to_string())
        }
    }
}

#[async_trait]
impl SummaryBackend for HttpSummaryBackend {
    fn backend_name(&self) -> String {
        format!("HTTP AI ({})", self.endpoint)
    }

    async fn summarize(&self, document_url: &str, length: SummaryLength) -> Result<String> {
        let start_time = Instant::now();
        let request = build_request(build_prompt(length, self.thread_length), document_url);
        debug!("Requesting summary for {} (length: {})", document_url, length);

        let response = self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("AI endpoint answered HTTP {}", status);
            return Err(WorkflowError::SummarizationFailed(format!(
                "HTTP {}: {}",
                status,
                error_text
            )));
        }

        let body: AiResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.transport_failure(e)
                } else {
                    WorkflowError::SummarizationFailed(format!("malformed response: {}", e))
                }
            })?;

        let message = body.message.unwrap_or_default();
        info!("Summary received in {}ms ({} chars)", start_time.elapsed().as_millis(), message.len());
        Ok(message)
    }
}

/// Summary stand-in returning a fixed sample text for development and testing
pub struct SimulatedSummaryBackend {
    delay_ms: u64,
}

impl SimulatedSummaryBackend {
    pub const SAMPLE_SUMMARY: &'static str = "This is a sample summary of the document. In a real application, this would be generated based on the document content and the selected length.";
    pub const SAMPLE_POINTS: [&'static str; 3] = [
        "First key point from the document",
        "Second important finding",
        "Third significant detail",
    ];

    pub fn new() -> Self {
        Self {
            delay_ms: 100, // Simulate processing time
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn sample_message() -> String {
        let mut message = Self::SAMPLE_SUMMARY.to_string();
        for point in Self::SAMPLE_POINTS {
            message.push_str("\n- ");
            message.push_str(point);
        }
        message
    }
}

impl Default for SimulatedSummaryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummaryBackend for SimulatedSummaryBackend {
    fn backend_name(&self) -> String {
        "Simulated AI".to_string()
    }

    async fn summarize(&self, document_url: &str, length: SummaryLength) -> Result<String> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        debug!("Simulated {} summary for {}", length, document_url);
        Ok(Self::sample_message())
    }
}
