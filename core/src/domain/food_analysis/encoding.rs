use std::sync::LazyLock;

use base64::{Engine as _, engine::general_purpose};
use regex::Regex;
use sha2::{Digest, Sha256};

const DEFAULT_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

const DATA_URL_PATTERN: &str = r"^data:(image/[a-z]+);base64,";

static DATA_URL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DATA_URL_PATTERN).expect("data URL pattern compiles"));

/// Strips a `data:image/<subtype>;base64,` prefix. Anything else, including
/// an already bare base64 string, comes back unchanged.
pub fn extract_base64_data(data_url: &str) -> String {
    match DATA_URL_PREFIX.find(data_url) {
        Some(prefix) => data_url[prefix.end()..].to_string(),
        None => data_url.to_string(),
    }
}

/// Media type declared by a data URL, `image/jpeg` for bare payloads.
pub fn image_media_type(payload: &str) -> &str {
    DATA_URL_PREFIX
        .captures(payload)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_IMAGE_MEDIA_TYPE)
}

pub fn encode_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Hex SHA-256 of the payload, for correlating logs without logging images.
pub fn payload_digest(payload: &str) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}

/// Base64 image plus its media type, ready to attach to a model request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn from_payload(payload: &str) -> Self {
        Self {
            mime_type: image_media_type(payload).to_string(),
            data: extract_base64_data(payload),
        }
    }
}
