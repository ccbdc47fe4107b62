//! Routes a validated request to the matching generator wrapper.

use crate::content::{ContentRequest, ContentType, GenerationResult};
use crate::error::ValidationError;
use crate::generator::ContentGenerator;
use std::collections::HashMap;
use tracing::{info, warn};

pub struct RequestDispatcher {
    generator: ContentGenerator,
}

impl RequestDispatcher {
    pub fn new(generator: ContentGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &ContentGenerator {
        &self.generator
    }

    /// Validates `request` and generates it.
    ///
    /// Invalid input yields a validation failure without contacting the
    /// completion API.
    pub async fn dispatch(&self, request: &ContentRequest) -> GenerationResult {
        let content_type = request.content_type();

        if let Err(err) = request.validate() {
            warn!("Rejected {} request: {}", content_type, err);
            return GenerationResult::validation_failure(&err)
                .with_request(content_type, request.parameters());
        }

        info!("Dispatching {} request in {} tone", content_type, request.tone());

        let g = &self.generator;
        match request {
            ContentRequest::BlogPost {
                topic,
                keywords,
                tone,
                word_count,
            } => g.generate_blog_post(topic, keywords, tone, *word_count).await,
            ContentRequest::SocialPost {
                topic,
                platform,
                tone,
            } => g.generate_social_post(topic, platform, tone).await,
            ContentRequest::AdCopy {
                product,
                target_audience,
                tone,
            } => g.generate_ad_copy(product, target_audience, tone).await,
            ContentRequest::Email {
                purpose,
                audience,
                tone,
            } => g.generate_email(purpose, audience, tone).await,
            ContentRequest::LandingPage {
                offer,
                target_audience,
                tone,
            } => g.generate_landing_page(offer, target_audience, tone).await,
            ContentRequest::ProductDescription {
                product_name,
                features,
                tone,
            } => g.generate_product_description(product_name, features, tone).await,
        }
    }

    /// Like [`dispatch`](Self::dispatch) but takes a content type name and a
    /// loose parameter map, as collected from a form or the command line.
    pub async fn dispatch_named(
        &self,
        content_type: &str,
        params: &HashMap<String, String>,
    ) -> GenerationResult {
        match build_request(content_type, params) {
            Ok(request) => self.dispatch(&request).await,
            Err(err) => {
                warn!("Rejected request for '{}': {}", content_type, err);
                let result = GenerationResult::validation_failure(&err);
                match content_type.parse::<ContentType>() {
                    Ok(ty) => result.with_request(ty, Default::default()),
                    Err(_) => result,
                }
            }
        }
    }
}

/// Builds a typed request from a name and string parameters.
///
/// Missing keys become empty strings so that [`ContentRequest::validate`]
/// reports them. Only a malformed `word_count` or an unknown type name fail here.
pub fn build_request(
    content_type: &str,
    params: &HashMap<String, String>,
) -> Result<ContentRequest, ValidationError> {
    let field = |name: &str| params.get(name).cloned().unwrap_or_default();
    let tone = field("tone");

    let request = match content_type.parse::<ContentType>()? {
        ContentType::BlogPost => ContentRequest::BlogPost {
            topic: field("topic"),
            keywords: field("keywords"),
            tone,
            word_count: parse_count("word_count", params.get("word_count"))?,
        },
        ContentType::SocialPost => ContentRequest::SocialPost {
            topic: field("topic"),
            platform: field("platform"),
            tone,
        },
        ContentType::AdCopy => ContentRequest::AdCopy {
            product: field("product"),
            target_audience: field("target_audience"),
            tone,
        },
        ContentType::Email => ContentRequest::Email {
            purpose: field("purpose"),
            audience: field("audience"),
            tone,
        },
        ContentType::LandingPage => ContentRequest::LandingPage {
            offer: field("offer"),
            target_audience: field("target_audience"),
            tone,
        },
        ContentType::ProductDescription => ContentRequest::ProductDescription {
            product_name: field("product_name"),
            features: field("features"),
            tone,
        },
    };

    Ok(request)
}

fn parse_count(field: &'static str, raw: Option<&String>) -> Result<u32, ValidationError> {
    let raw = match raw.map(|s| s.trim()) {
        Some(s) if !s.is_empty() => s,
        _ => return Err(ValidationError::EmptyField(field)),
    };
    raw.parse::<u32>().map_err(|_| ValidationError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FailureKind, ParamValue};
    use crate::error::GenerationError;
    use crate::generator::testing::ScriptedTransport;
    use crate::providers::testing::RecordingSleeper;
    use crate::retry::RetryPolicy;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn dispatcher(transport: &ScriptedTransport) -> RequestDispatcher {
        RequestDispatcher::new(
            ContentGenerator::new(Box::new(transport.clone()), "llama-test")
                .with_retry_policy(RetryPolicy::immediate(3))
                .with_sleeper(Box::new(RecordingSleeper::default())),
        )
    }

    // =========================================================================
    // build_request
    // =========================================================================

    #[test]
    fn test_build_request_reads_type_specific_keys() {
        let request = build_request(
            "Blog Post",
            &params(&[
                ("topic", "Email Marketing"),
                ("keywords", "email,marketing"),
                ("tone", "Professional"),
                ("word_count", "800"),
            ]),
        )
        .unwrap();

        assert_eq!(
            request,
            ContentRequest::BlogPost {
                topic: "Email Marketing".to_string(),
                keywords: "email,marketing".to_string(),
                tone: "Professional".to_string(),
                word_count: 800,
            }
        );
    }

    #[test]
    fn test_build_request_missing_keys_become_empty() {
        let request = build_request("Ad Copy", &params(&[("tone", "Bold")])).unwrap();
        assert_eq!(request.validate(), Err(ValidationError::EmptyField("product")));
    }

    #[test]
    fn test_build_request_rejects_bad_word_count() {
        let base = [("topic", "t"), ("keywords", "k"), ("tone", "x")];

        let mut bad = params(&base);
        bad.insert("word_count".to_string(), "lots".to_string());
        assert_eq!(
            build_request("blog_post", &bad),
            Err(ValidationError::InvalidNumber {
                field: "word_count",
                value: "lots".to_string()
            })
        );

        assert_eq!(
            build_request("blog_post", &params(&base)),
            Err(ValidationError::EmptyField("word_count"))
        );
    }

    #[test]
    fn test_build_request_rejects_unknown_type() {
        assert_eq!(
            build_request("Podcast Script", &HashMap::new()),
            Err(ValidationError::UnknownContentType("Podcast Script".to_string()))
        );
    }

    // =========================================================================
    // dispatch
    // =========================================================================

    #[tokio::test]
    async fn test_dispatch_empty_field_fails_before_any_call() {
        let transport = ScriptedTransport::always_ok("never", 1);

        let result = dispatcher(&transport)
            .dispatch(&ContentRequest::BlogPost {
                topic: String::new(),
                keywords: "email".to_string(),
                tone: "Professional".to_string(),
                word_count: 800,
            })
            .await;

        assert!(!result.is_success());
        assert_eq!(result.error_kind(), Some(FailureKind::Validation));
        assert_eq!(result.error(), Some("required field 'topic' is empty"));
        assert_eq!(result.content_type(), Some(ContentType::BlogPost));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_named_social_post_end_to_end() {
        let transport = ScriptedTransport::always_ok("Exciting news...", 42);

        let result = dispatcher(&transport)
            .dispatch_named(
                "Social Post",
                &params(&[
                    ("topic", "Launch"),
                    ("platform", "LinkedIn"),
                    ("tone", "Professional"),
                ]),
            )
            .await;

        assert!(result.is_success());
        assert_eq!(result.content(), Some("Exciting news..."));
        assert_eq!(result.tokens_used(), Some(42));
        assert_eq!(result.content_type().map(|t| t.tag()), Some("social_post"));
        assert_eq!(
            result.parameters()["platform"],
            ParamValue::Text("LinkedIn".to_string())
        );
        assert_eq!(transport.calls(), 1);

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].max_tokens, 500);
        assert!(requests[0].prompt().contains("Launch"));
    }

    #[tokio::test]
    async fn test_dispatch_named_unknown_type_is_validation_failure() {
        let transport = ScriptedTransport::always_ok("never", 1);

        let result = dispatcher(&transport)
            .dispatch_named("Haiku", &params(&[("tone", "Calm")]))
            .await;

        assert_eq!(result.error_kind(), Some(FailureKind::Validation));
        assert!(result.content_type().is_none());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_named_bad_count_keeps_type_tag() {
        let transport = ScriptedTransport::always_ok("never", 1);

        let result = dispatcher(&transport)
            .dispatch_named(
                "Blog Post",
                &params(&[
                    ("topic", "t"),
                    ("keywords", "k"),
                    ("tone", "x"),
                    ("word_count", "-5"),
                ]),
            )
            .await;

        assert_eq!(result.error_kind(), Some(FailureKind::Validation));
        assert_eq!(result.content_type(), Some(ContentType::BlogPost));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_generation_failure_is_not_validation() {
        let transport =
            ScriptedTransport::always_failing(GenerationError::Transport("down".to_string()));

        let result = dispatcher(&transport)
            .dispatch(&ContentRequest::LandingPage {
                offer: "Free trial".to_string(),
                target_audience: "Marketers".to_string(),
                tone: "Casual".to_string(),
            })
            .await;

        assert!(!result.is_success());
        assert_eq!(result.error_kind(), Some(FailureKind::Generation));
        assert_eq!(result.content_type(), Some(ContentType::LandingPage));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_dispatch_routes_every_type() {
        let transport = ScriptedTransport::always_ok("ok", 5);
        let dispatcher = dispatcher(&transport);

        let named = [
            ("Blog Post", params(&[("topic", "a"), ("keywords", "b"), ("word_count", "300"), ("tone", "x")])),
            ("Social Media Post", params(&[("topic", "a"), ("platform", "Instagram"), ("tone", "x")])),
            ("Ad Copy", params(&[("product", "a"), ("target_audience", "b"), ("tone", "x")])),
            ("Email Template", params(&[("purpose", "a"), ("audience", "b"), ("tone", "x")])),
            ("Landing Page Copy", params(&[("offer", "a"), ("target_audience", "b"), ("tone", "x")])),
            ("Product Description", params(&[("product_name", "a"), ("features", "b"), ("tone", "x")])),
        ];

        let mut tags = Vec::new();
        for (name, p) in &named {
            let result = dispatcher.dispatch_named(name, p).await;
            assert!(result.is_success(), "{name}: {:?}", result.error());
            tags.push(result.content_type().map(|t| t.tag()).unwrap_or_default());
        }

        assert_eq!(
            tags,
            vec![
                "blog_post",
                "social_post",
                "ad_copy",
                "email",
                "landing_page",
                "product_description"
            ]
        );
    }
}
