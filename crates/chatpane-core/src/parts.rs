//! Multi-part message content
//!
//! Callers composing richer payloads (text next to inline images) use these
//! shapes. The transcript view never reads them; it renders the flat
//! `ChatMessage::content` string.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Plain text content part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
}

/// Base64 payload tagged with its mime type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Inline image content part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePart {
    pub inline_data: InlineData,
}

impl ImagePart {
    /// Build an image part from raw bytes, encoding them as standard base64
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            inline_data: InlineData {
                mime_type: mime_type.to_string(),
                data: STANDARD.encode(bytes),
            },
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.inline_data.mime_type
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.inline_data.data.as_bytes())
            .with_context(|| format!("Invalid base64 data for {} image", self.inline_data.mime_type))
    }
}

/// Either kind of part; serialized without a tag so the field names alone
/// identify the variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text(TextPart),
    Image(ImagePart),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(TextPart { text: text.into() })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(part) => Some(&part.text),
            ContentPart::Image(_) => None,
        }
    }

    /// Collapse parts into a single renderable string (images are skipped)
    pub fn text_content(parts: &[ContentPart]) -> String {
        parts
            .iter()
            .filter_map(ContentPart::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<TextPart> for ContentPart {
    fn from(part: TextPart) -> Self {
        ContentPart::Text(part)
    }
}

impl From<ImagePart> for ContentPart {
    fn from(part: ImagePart) -> Self {
        ContentPart::Image(part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_part_wire_names() {
        let part = ImagePart::from_bytes("image/png", b"abc");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"inlineData": {"mimeType": "image/png", "data": "YWJj"}})
        );
    }

    #[test]
    fn test_image_part_decode() {
        let part = ImagePart::from_bytes("image/jpeg", &[0, 159, 255]);
        assert_eq!(part.decode().unwrap(), vec![0, 159, 255]);
        assert_eq!(part.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_image_part_decode_invalid() {
        let part = ImagePart {
            inline_data: InlineData {
                mime_type: "image/png".to_string(),
                data: "not base64!".to_string(),
            },
        };
        let err = part.decode().unwrap_err();
        assert!(err.to_string().contains("image/png"));
    }

    #[test]
    fn test_untagged_parts_deserialize() {
        let json = r#"[
            {"text": "Look at this"},
            {"inlineData": {"mimeType": "image/gif", "data": "R0lG"}},
            {"text": "and this"}
        ]"#;
        let parts: Vec<ContentPart> = serde_json::from_str(json).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(matches!(parts[1], ContentPart::Image(_)));
        assert_eq!(ContentPart::text_content(&parts), "Look at this\nand this");
    }

    #[test]
    fn test_text_content_empty() {
        assert_eq!(ContentPart::text_content(&[]), "");
    }
}
