//! Client for the image verdict endpoint.
//!
//! `POST {base}/api/scan` with a base64 data-URL image and the requesting
//! user's ID; the backend forwards the image to a generative model and
//! returns a structured verdict. The server answers 502 with `{error, raw}`
//! when the model's output cannot be validated, and the client surfaces that
//! as a scan error the same way the chat path surfaces its failures.

use crate::config::ScanConfig;
use crate::error::{AssistError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Request body for the scan endpoint.
#[derive(Debug, Serialize)]
struct ScanRequest<'a> {
    /// Base64 data URL of the image under analysis.
    image: &'a str,
    /// ID of the requesting user.
    uid: &'a str,
}

/// Error body returned by the scan endpoint on validation failure.
#[derive(Debug, Deserialize)]
struct ScanErrorBody {
    error: Option<String>,
    /// Truncated raw model output, included when JSON parsing failed upstream.
    raw: Option<String>,
}

/// Structured verdict for one scanned image.
///
/// `verdict` and `confidence` are validated server-side; the remaining
/// fields are best-effort and may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanVerdict {
    /// One of "Likely AI-Generated", "Likely Human-Created", "Uncertain".
    pub verdict: String,
    /// Model confidence in the verdict, 0–100.
    pub confidence: f64,
    /// Short summary of the reasoning.
    pub reasoning: Option<String>,
    /// Free-form per-aspect assessments.
    #[serde(rename = "detailedAnalysis")]
    pub detailed_analysis: Option<serde_json::Value>,
    /// Numeric sub-scores (texture consistency, edge quality, ...).
    pub parameters: Option<serde_json::Value>,
    /// Specific issues the model flagged.
    pub flags: Option<Vec<String>>,
}

impl ScanVerdict {
    /// How trustworthy the image looks, 0–100.
    ///
    /// Confidence counts toward trust only when the verdict is
    /// human-created; otherwise it counts against it.
    pub fn trust_score(&self) -> f64 {
        if self.verdict == "Likely Human-Created" {
            self.confidence
        } else {
            100.0 - self.confidence
        }
    }

    /// Probability the image is synthetic, 0–100.
    pub fn deepfake_probability(&self) -> f64 {
        if self.verdict == "Likely AI-Generated" {
            self.confidence
        } else {
            100.0 - self.confidence
        }
    }
}

/// HTTP client for the image verdict endpoint.
pub struct ScanClient {
    base_url: String,
    http: reqwest::Client,
}

impl ScanClient {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AssistError::Scan(format!("HTTP client build failed: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_owned();
        info!("scan client configured for {base_url}/api/scan");

        Ok(Self { base_url, http })
    }

    /// Submit an image for analysis and return the structured verdict.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::Scan`] on network failure, a non-success
    /// status (including the backend's 502 invalid-model-output shape), or
    /// a response that fails validation.
    pub async fn analyze_image(&self, image_data_url: &str, uid: &str) -> Result<ScanVerdict> {
        let url = format!("{}/api/scan", self.base_url);
        let body = ScanRequest {
            image: image_data_url,
            uid,
        };

        debug!("submitting image scan for uid {uid}");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistError::Scan(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            // The backend reports validation failures as {error, raw}.
            let detail = match response.json::<ScanErrorBody>().await {
                Ok(err_body) => {
                    let mut detail = err_body
                        .error
                        .unwrap_or_else(|| "analysis failed".to_owned());
                    if let Some(raw) = err_body.raw {
                        detail.push_str(&format!(" (raw: {raw})"));
                    }
                    detail
                }
                Err(_) => "analysis failed".to_owned(),
            };
            return Err(AssistError::Scan(format!("{status}: {detail}")));
        }

        response
            .json::<ScanVerdict>()
            .await
            .map_err(|e| AssistError::Scan(format!("invalid verdict body: {e}")))
    }
}
