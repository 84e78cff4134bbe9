use std::time::Duration;

use reqwest::{multipart, Client};
use serde::Serialize;
use serde_json::Value;

use crate::{classifier::Classification, config::Config, error::BillError};

const UPLOAD_PATH: &str = "utilities/upload";

/// What the backend answered for one accepted upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReceipt {
    pub status: u16,
    /// JSON body when it parses, otherwise the raw text as a JSON string.
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base: String,
    api_token: Option<String>,
}

impl BackendClient {
    pub fn from_config(cfg: &Config) -> Result<Self, BillError> {
        let api_token = cfg
            .get("BACKEND_API_TOKEN")
            .filter(|s| !s.trim().is_empty());
        Self::new(&cfg.backend_base_url(), api_token, Duration::from_secs(cfg.request_timeout_secs()))
    }

    pub fn new(base: &str, api_token: Option<String>, timeout: Duration) -> Result<Self, BillError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    pub fn upload_url(&self) -> String {
        format!("{}/{}", self.base, UPLOAD_PATH)
    }

    /// Send one classified bill to the backend's upload endpoint.
    pub async fn upload_bill(
        &self,
        hotel_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
        classification: &Classification,
    ) -> Result<UploadReceipt, BillError> {
        let file = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new()
            .text("hotel_id", hotel_id.to_string())
            .text("supplier", classification.supplier.clone())
            .text("utility_type", classification.bill_type.as_str())
            .part("file", file);

        let mut req = self.client.post(self.upload_url()).multipart(form);
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(BillError::Upload { status, body: text });
        }

        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
        Ok(UploadReceipt { status: status.as_u16(), body })
    }
}
