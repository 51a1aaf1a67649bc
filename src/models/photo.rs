use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A photo as picked by the user, before compression
#[derive(Debug, Clone, PartialEq)]
pub struct PickedPhoto {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One compressed attachment, ready for preview and upload
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedPhoto {
    pub original_name: String,
    pub content_type: String,
    pub original_bytes: usize,
    pub compressed_bytes: usize,
    /// Payload without the `data:` prefix
    pub base64: String,
    /// Unknown for formats kept as-is without decoding
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Budget was unreachable and the smallest settings were applied
    pub best_effort: bool,
}

impl CompressedPhoto {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.base64)
    }

    /// Whether the attachment still exceeds the byte budget
    pub fn exceeds_budget(&self, max_bytes: usize) -> bool {
        self.compressed_bytes > max_bytes
    }

    pub fn to_payload(&self) -> FilePayload {
        FilePayload::new(&self.original_name, &self.content_type, self.data_url())
    }

    pub fn decoded_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.base64)
    }
}

/// Attachment shape embedded in submitted forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    pub id: Uuid,
    pub name: String,
    pub content_type: String,
    /// `data:<type>;base64,<payload>`
    pub data_url: String,
}

impl FilePayload {
    pub fn new(name: &str, content_type: &str, data_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            content_type: content_type.to_string(),
            data_url,
        }
    }
}
