//! Request and result types shared by the prompt builder, the generator and
//! the dispatcher.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The six supported marketing-asset categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    BlogPost,
    SocialPost,
    AdCopy,
    Email,
    LandingPage,
    ProductDescription,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::BlogPost,
        ContentType::SocialPost,
        ContentType::AdCopy,
        ContentType::Email,
        ContentType::LandingPage,
        ContentType::ProductDescription,
    ];

    /// Stable tag attached to results, e.g. `social_post`.
    pub fn tag(&self) -> &'static str {
        match self {
            ContentType::BlogPost => "blog_post",
            ContentType::SocialPost => "social_post",
            ContentType::AdCopy => "ad_copy",
            ContentType::Email => "email",
            ContentType::LandingPage => "landing_page",
            ContentType::ProductDescription => "product_description",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ContentType::BlogPost => "Blog Post",
            ContentType::SocialPost => "Social Post",
            ContentType::AdCopy => "Ad Copy",
            ContentType::Email => "Email",
            ContentType::LandingPage => "Landing Page",
            ContentType::ProductDescription => "Product Description",
        }
    }

    /// Parameter keys this type reads, in prompt order. `tone` is always last.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            ContentType::BlogPost => &["topic", "keywords", "word_count", "tone"],
            ContentType::SocialPost => &["topic", "platform", "tone"],
            ContentType::AdCopy => &["product", "target_audience", "tone"],
            ContentType::Email => &["purpose", "audience", "tone"],
            ContentType::LandingPage => &["offer", "target_audience", "tone"],
            ContentType::ProductDescription => &["product_name", "features", "tone"],
        }
    }

    /// Output-token ceiling used when generating this type.
    pub fn max_output_tokens(&self) -> u32 {
        match self {
            ContentType::BlogPost => 3000,
            ContentType::SocialPost => 500,
            ContentType::AdCopy => 1000,
            ContentType::Email => 1500,
            ContentType::LandingPage => 2000,
            ContentType::ProductDescription => 1000,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ContentType {
    type Err = ValidationError;

    /// Accepts display names ("Social Media Post", "Landing Page Copy", ...),
    /// tags (`social_post`) and kebab-case (`social-post`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "blog_post" | "blog" => Ok(ContentType::BlogPost),
            "social_post" | "social_media_post" | "social" => Ok(ContentType::SocialPost),
            "ad_copy" | "ad" => Ok(ContentType::AdCopy),
            "email" | "email_template" => Ok(ContentType::Email),
            "landing_page" | "landing_page_copy" => Ok(ContentType::LandingPage),
            "product_description" | "product" => Ok(ContentType::ProductDescription),
            _ => Err(ValidationError::UnknownContentType(s.to_string())),
        }
    }
}

/// A single request parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(u32),
    Text(String),
}

pub type Parameters = BTreeMap<String, ParamValue>;

/// One user submission. Each variant carries exactly the fields its prompt
/// template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRequest {
    BlogPost {
        topic: String,
        keywords: String,
        tone: String,
        word_count: u32,
    },
    SocialPost {
        topic: String,
        platform: String,
        tone: String,
    },
    AdCopy {
        product: String,
        target_audience: String,
        tone: String,
    },
    Email {
        purpose: String,
        audience: String,
        tone: String,
    },
    LandingPage {
        offer: String,
        target_audience: String,
        tone: String,
    },
    ProductDescription {
        product_name: String,
        features: String,
        tone: String,
    },
}

impl ContentRequest {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentRequest::BlogPost { .. } => ContentType::BlogPost,
            ContentRequest::SocialPost { .. } => ContentType::SocialPost,
            ContentRequest::AdCopy { .. } => ContentType::AdCopy,
            ContentRequest::Email { .. } => ContentType::Email,
            ContentRequest::LandingPage { .. } => ContentType::LandingPage,
            ContentRequest::ProductDescription { .. } => ContentType::ProductDescription,
        }
    }

    pub fn tone(&self) -> &str {
        match self {
            ContentRequest::BlogPost { tone, .. }
            | ContentRequest::SocialPost { tone, .. }
            | ContentRequest::AdCopy { tone, .. }
            | ContentRequest::Email { tone, .. }
            | ContentRequest::LandingPage { tone, .. }
            | ContentRequest::ProductDescription { tone, .. } => tone,
        }
    }

    /// Required string fields as `(name, value)` pairs.
    fn text_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            ContentRequest::BlogPost {
                topic,
                keywords,
                tone,
                ..
            } => vec![
                ("topic", topic.as_str()),
                ("keywords", keywords.as_str()),
                ("tone", tone.as_str()),
            ],
            ContentRequest::SocialPost {
                topic,
                platform,
                tone,
            } => vec![
                ("topic", topic.as_str()),
                ("platform", platform.as_str()),
                ("tone", tone.as_str()),
            ],
            ContentRequest::AdCopy {
                product,
                target_audience,
                tone,
            } => vec![
                ("product", product.as_str()),
                ("target_audience", target_audience.as_str()),
                ("tone", tone.as_str()),
            ],
            ContentRequest::Email {
                purpose,
                audience,
                tone,
            } => vec![
                ("purpose", purpose.as_str()),
                ("audience", audience.as_str()),
                ("tone", tone.as_str()),
            ],
            ContentRequest::LandingPage {
                offer,
                target_audience,
                tone,
            } => vec![
                ("offer", offer.as_str()),
                ("target_audience", target_audience.as_str()),
                ("tone", tone.as_str()),
            ],
            ContentRequest::ProductDescription {
                product_name,
                features,
                tone,
            } => vec![
                ("product_name", product_name.as_str()),
                ("features", features.as_str()),
                ("tone", tone.as_str()),
            ],
        }
    }

    /// The original inputs, keyed by field name, for tagging results.
    pub fn parameters(&self) -> Parameters {
        let mut params: Parameters = self
            .text_fields()
            .into_iter()
            .map(|(k, v)| (k.to_string(), ParamValue::Text(v.to_string())))
            .collect();

        if let ContentRequest::BlogPost { word_count, .. } = self {
            params.insert("word_count".to_string(), ParamValue::Integer(*word_count));
        }
        params
    }

    /// Rejects empty or whitespace-only strings and a zero word count.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in self.text_fields() {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(name));
            }
        }

        if let ContentRequest::BlogPost { word_count: 0, .. } = self {
            return Err(ValidationError::NonPositive("word_count"));
        }

        Ok(())
    }
}

/// Which layer produced a failed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Generation,
}

/// Normalized outcome of one generation request.
///
/// `content` is set iff `success`, `error` and `error_kind` are set iff not.
/// The fields are private so the constructors are the only way to build one.
/// Deserializing goes through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredResult")]
pub struct GenerationResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<FailureKind>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    content_type: Option<ContentType>,
    parameters: Parameters,
}

/// Unchecked wire form of a [`GenerationResult`].
#[derive(Deserialize)]
struct StoredResult {
    success: bool,
    content: Option<String>,
    tokens_used: Option<u32>,
    elapsed_seconds: Option<f64>,
    model: Option<String>,
    error: Option<String>,
    error_kind: Option<FailureKind>,
    #[serde(rename = "type")]
    content_type: Option<ContentType>,
    #[serde(default)]
    parameters: Parameters,
}

impl TryFrom<StoredResult> for GenerationResult {
    type Error = String;

    fn try_from(raw: StoredResult) -> Result<Self, Self::Error> {
        let consistent = if raw.success {
            raw.content.is_some() && raw.error.is_none() && raw.error_kind.is_none()
        } else {
            raw.content.is_none() && raw.error.is_some() && raw.error_kind.is_some()
        };
        if !consistent {
            return Err(format!(
                "inconsistent result: success={} requires {}",
                raw.success,
                if raw.success {
                    "content and no error"
                } else {
                    "an error, an error kind and no content"
                }
            ));
        }

        Ok(Self {
            success: raw.success,
            content: raw.content,
            tokens_used: raw.tokens_used,
            elapsed_seconds: raw.elapsed_seconds,
            model: raw.model,
            error: raw.error,
            error_kind: raw.error_kind,
            content_type: raw.content_type,
            parameters: raw.parameters,
        })
    }
}

impl GenerationResult {
    pub fn success(content: String, tokens_used: u32, elapsed_seconds: f64, model: &str) -> Self {
        Self {
            success: true,
            content: Some(content),
            tokens_used: Some(tokens_used),
            elapsed_seconds: Some(elapsed_seconds),
            model: Some(model.to_string()),
            error: None,
            error_kind: None,
            content_type: None,
            parameters: Parameters::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::failed(error.into(), FailureKind::Generation)
    }

    pub fn validation_failure(error: &ValidationError) -> Self {
        Self::failed(error.to_string(), FailureKind::Validation)
    }

    fn failed(error: String, kind: FailureKind) -> Self {
        Self {
            success: false,
            content: None,
            tokens_used: None,
            elapsed_seconds: None,
            model: None,
            error: Some(error),
            error_kind: Some(kind),
            content_type: None,
            parameters: Parameters::new(),
        }
    }

    /// Attaches the content type and original inputs.
    pub fn with_request(mut self, content_type: ContentType, parameters: Parameters) -> Self {
        self.content_type = Some(content_type);
        self.parameters = parameters;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn tokens_used(&self) -> Option<u32> {
        self.tokens_used
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.elapsed_seconds
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<FailureKind> {
        self.error_kind
    }

    pub fn content_type(&self) -> Option<ContentType> {
        self.content_type
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Whitespace-delimited word count of the generated content.
    pub fn word_count(&self) -> usize {
        self.content
            .as_deref()
            .map(|c| c.split_whitespace().count())
            .unwrap_or(0)
    }
}
