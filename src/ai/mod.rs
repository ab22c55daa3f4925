//! AI collaborator - Text and vision completion behind the [`Advisor`] trait.
//!
//! The consultant only ever talks to `dyn Advisor`, so tests can swap in a stub
//! and the binary uses [`gemini::GeminiAdvisor`].

/// Gemini `generateContent` client
pub mod gemini;

use crate::errors::Result;
use async_trait::async_trait;
use base64::Engine as _;

pub use gemini::GeminiAdvisor;

/// An image handed to the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanImage {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// MIME type sent alongside the data
    pub mime_type: String,
}

impl PlanImage {
    /// Wraps JPEG bytes, the only encoding the consultant sends.
    #[must_use]
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "image/jpeg".to_string(),
        }
    }

    /// Standard base64 of the image bytes
    #[must_use]
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// A generative model able to answer construction questions.
///
/// Implementations return the raw text of the reply, which may be empty. Any
/// transport or API failure is an error; the consultant decides what the user sees.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Answers `query` under the given system instruction.
    async fn complete_text(&self, system_instruction: &str, query: &str) -> Result<String>;

    /// Describes `image` following `prompt`.
    async fn complete_vision(&self, image: &PlanImage, prompt: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_image_base64() {
        let image = PlanImage::jpeg(vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.to_base64(), "/9j/");
    }
}
