//! Produce annotation via the Gemini generative model
//!
//! Builds a prompt from crop metadata, sends it with the produce photo to
//! the external model, and parses the JSON verdict (expiry date, quality
//! description, preservation tips). Any transport or parse failure surfaces
//! as an error; nothing is persisted here.

use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Language choices offered to farmers, code to English name. The model is
/// asked to answer in the named language; JSON keys stay English.
pub const LANGUAGES: [(&str, &str); 23] = [
    ("en", "English"),
    ("hi", "Hindi"),
    ("mr", "Marathi"),
    ("gu", "Gujarati"),
    ("bn", "Bengali"),
    ("pa", "Punjabi"),
    ("te", "Telugu"),
    ("ta", "Tamil"),
    ("ml", "Malayalam"),
    ("kn", "Kannada"),
    ("ur", "Urdu"),
    ("or", "Odia"),
    ("as", "Assamese"),
    ("mni", "Manipuri"),
    ("ne", "Nepali"),
    ("sa", "Sanskrit"),
    ("sd", "Sindhi"),
    ("doi", "Dogri"),
    ("kok", "Konkani"),
    ("brx", "Bodo"),
    ("mai", "Maithili"),
    ("sat", "Santali"),
    ("ks", "Kashmiri"),
];

/// Display name for a language code; unknown codes fall back to English
pub fn language_name(code: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("English")
}

/// Annotation client errors
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Unusable model reply: {0}")]
    Parse(String),
}

/// Crop metadata carried into the prompt
#[derive(Debug, Clone)]
pub struct CropDetails {
    pub name: String,
    pub category: String,
    pub pick_time: String,
    pub temperature: String,
    /// Resolved display name, not the code
    pub language: &'static str,
}

/// Structured verdict merged into a product record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub expiry: String,
    pub desc: String,
    pub tips: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini API client
pub struct AnnotationClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AnnotationClient {
    pub fn new(api_key: String) -> Result<Self, AnnotationError> {
        Self::with_base_url(api_key, GEMINI_BASE_URL.to_string())
    }

    /// Client against a non-default endpoint
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, AnnotationError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AnnotationError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    /// Analyze one produce photo and return the structured verdict
    pub async fn analyze(
        &self,
        image: &[u8],
        details: &CropDetails,
    ) -> Result<Annotation, AnnotationError> {
        let prompt = build_prompt(details);
        let mime_type = infer::get(image)
            .map(|t| t.mime_type())
            .unwrap_or("image/jpeg");
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, GEMINI_MODEL, self.api_key
        );
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    { "inline_data": { "mime_type": mime_type, "data": encoded } },
                ]
            }]
        });

        tracing::debug!(model = GEMINI_MODEL, crop = %details.name, "Requesting produce analysis");

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnnotationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AnnotationError::Api(status.as_u16(), text));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnnotationError::Parse(e.to_string()))?;

        let text = reply
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| AnnotationError::Parse("reply contains no text part".to_string()))?;

        parse_annotation(&text)
    }
}

fn build_prompt(details: &CropDetails) -> String {
    format!(
        "You are an expert Agricultural Scientist and Post-Harvest Technologist.\n\
         Analyze the attached image of a harvested crop with high precision.\n\
         \n\
         CROP DETAILS:\n\
         - Name: {name}\n\
         - Category: {category}\n\
         - Harvest Date: {pick_time}\n\
         - Current Temperature: {temperature}\u{b0}C\n\
         - User's Preferred Language: {language}\n\
         \n\
         TASKS:\n\
         1. VISUAL INSPECTION: Analyze the visual condition of the product in the image \
         (color, texture, signs of bruising, wilt, or spoilage).\n\
         2. SHELF-LIFE CALCULATION: Based on the visual inspection, the elapsed time since \
         harvest, and the current storage temperature, scientifically estimate the remaining \
         shelf-life date (Format: YYYY-MM-DD). Be realistic.\n\
         3. QUALITY DESCRIPTION: Write a concise, professional 2-sentence assessment of the \
         crop's current quality based on the visual evidence.\n\
         4. PRESERVATION TIPS: Provide 2 specific, actionable storage tips to extend the \
         life of this specific crop under the given temperature.\n\
         \n\
         OUTPUT FORMAT REQUIREMENTS:\n\
         - Provide the content for 'desc' (Description) and 'tips' translated into {language}.\n\
         - The JSON keys must remain in English ('expiry', 'desc', 'tips').\n\
         - The 'expiry' date must be strictly in YYYY-MM-DD format.\n\
         \n\
         Return ONLY raw JSON: {{\"expiry\": \"YYYY-MM-DD\", \"desc\": \"Translated Description...\", \
         \"tips\": \"Translated Tips...\"}}",
        name = details.name,
        category = details.category,
        pick_time = details.pick_time,
        temperature = details.temperature,
        language = details.language,
    )
}

/// Drop markdown code-fence wrapping the model tends to add
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "")
}

/// Parse a model reply into an annotation. Missing keys, an empty
/// description or tips, or a malformed expiry date all reject the reply.
pub fn parse_annotation(raw: &str) -> Result<Annotation, AnnotationError> {
    let cleaned = strip_code_fences(raw);
    let annotation: Annotation = serde_json::from_str(cleaned.trim())
        .map_err(|e| AnnotationError::Parse(e.to_string()))?;

    if NaiveDate::parse_from_str(&annotation.expiry, "%Y-%m-%d").is_err() {
        return Err(AnnotationError::Parse(format!(
            "expiry not in YYYY-MM-DD form: {:?}",
            annotation.expiry
        )));
    }
    if annotation.desc.trim().is_empty() || annotation.tips.trim().is_empty() {
        return Err(AnnotationError::Parse(
            "empty description or tips".to_string(),
        ));
    }

    Ok(annotation)
}
