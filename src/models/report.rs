use super::photo::FilePayload;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Alert posted to the leadership chat webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipAlert {
    pub category_label: String,
    pub reporter_name: String,
    pub reporter_email: String,
    /// Usually the current proximity text
    pub location_text: String,
    pub note: String,
    pub dont_ask_again: bool,
}

/// A filled-in form. Serializes flat: `formTitle` plus one string per field id,
/// with photos under `attachments` when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub form_title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<FilePayload>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

const RESERVED_KEYS: [&str; 2] = ["formTitle", "attachments"];

impl FormSubmission {
    pub fn new(form_title: impl Into<String>) -> Self {
        Self {
            form_title: form_title.into(),
            attachments: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field; later values for the same id replace earlier ones
    pub fn with_field(mut self, id: impl Into<String>, value: impl ToString) -> Self {
        self.fields.insert(id.into(), value.to_string());
        self
    }

    pub fn with_attachment(mut self, file: FilePayload) -> Self {
        self.attachments.push(file);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.form_title.trim().is_empty() {
            return Err("Form title is required".to_string());
        }
        if let Some(key) = self.fields.keys().find(|k| RESERVED_KEYS.contains(&k.as_str())) {
            return Err(format!("Field id '{}' is reserved", key));
        }
        Ok(())
    }
}

/// Webhook outcome. Non-2xx statuses are reported here, not as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub ok: bool,
    pub status: u16,
    pub body_text: String,
}
