use crate::config::ReportSettings;
use crate::error::AppError;
use crate::models::{FormSubmission, LeadershipAlert, SubmitResponse};
use serde::Serialize;
use std::time::Duration;

const USER_AGENT: &str = concat!("CrisisChecklist/", env!("CARGO_PKG_VERSION"));

/// Posts incident reports to JSON webhooks
pub struct ReportService {
    client: reqwest::Client,
    leadership_webhook_url: Option<String>,
}

impl ReportService {
    pub fn new(settings: &ReportSettings) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Network(format!("Client build failed: {}", e)))?;

        Ok(Self {
            client,
            leadership_webhook_url: settings.leadership_webhook_url.clone(),
        })
    }

    /// Sends an alert to the leadership chat webhook
    pub async fn post_alert(&self, alert: &LeadershipAlert) -> Result<SubmitResponse, AppError> {
        let url = self.leadership_webhook_url.as_deref().ok_or_else(|| {
            AppError::Config("leadership_webhook_url is not configured".to_string())
        })?;
        log::debug!("Posting leadership alert '{}'", alert.category_label);
        self.post_json(url, alert).await
    }

    /// Submits a completed form to its own endpoint
    pub async fn submit_form(
        &self,
        url: &str,
        form: &FormSubmission,
    ) -> Result<SubmitResponse, AppError> {
        form.validate().map_err(AppError::Validation)?;
        log::debug!(
            "Submitting form '{}' ({} fields, {} attachments)",
            form.form_title,
            form.fields.len(),
            form.attachments.len()
        );
        self.post_json(url, form).await
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<SubmitResponse, AppError> {
        let response = self
            .client
            .post(url)
            .header("Accept", "application/json, text/plain, */*")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        // unreadable body reads as empty
        let body_text = response.text().await.unwrap_or_default();

        if status.is_success() {
            log::info!("Webhook accepted report with status {}", status);
        } else {
            log::warn!("Webhook rejected report with status {}: {}", status, body_text);
        }

        Ok(SubmitResponse {
            ok: status.is_success(),
            status: status.as_u16(),
            body_text,
        })
    }
}
