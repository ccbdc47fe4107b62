use crate::completion::{
    ChatCompletionsClient, CompletionRequest, CompletionTransport, MockCompletionClient,
};
use crate::config::Config;
use crate::content::{ContentRequest, GenerationResult};
use crate::error::{ConfigError, GenerationError};
use crate::http_client::ReqwestHttpClient;
use crate::prompts::{self, SYSTEM_PROMPT};
use crate::providers::{Sleeper, TokioSleeper};
use crate::retry::RetryPolicy;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Turns prompts into [`GenerationResult`]s through a completion transport.
///
/// All I/O failures are retried according to the [`RetryPolicy`] and then
/// folded into a failed result, so none of the `generate*` methods can fail.
pub struct ContentGenerator {
    transport: Box<dyn CompletionTransport>,
    sleeper: Box<dyn Sleeper>,
    retry: RetryPolicy,
    model: String,
    default_temperature: f32,
    default_max_tokens: u32,
}

impl ContentGenerator {
    pub fn new(transport: Box<dyn CompletionTransport>, model: &str) -> Self {
        let defaults = Config::default();
        Self {
            transport,
            sleeper: Box::new(TokioSleeper),
            retry: RetryPolicy::default(),
            model: model.to_string(),
            default_temperature: defaults.default_temperature as f32,
            default_max_tokens: defaults.default_max_tokens,
        }
    }

    /// Builds the production generator, or the offline one in mock mode.
    ///
    /// Fails if the configuration is invalid, most commonly a missing API key.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let transport: Box<dyn CompletionTransport> = if config.is_mock_mode() {
            info!("Using mock completion transport");
            Box::new(MockCompletionClient::new())
        } else {
            let api_key = config.get_api_key().ok_or(ConfigError::MissingApiKey)?;
            let http = ReqwestHttpClient::with_timeout(Duration::from_secs(
                config.request_timeout_secs,
            ))
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
            Box::new(ChatCompletionsClient::new(
                Box::new(http),
                &config.api_base,
                api_key,
            ))
        };

        info!("ContentGenerator initialized with model: {}", config.model);

        Ok(Self::new(transport, &config.model)
            .with_retry_policy(RetryPolicy::from_config(config))
            .with_defaults(config.default_temperature as f32, config.default_max_tokens))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_defaults(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.default_temperature = temperature;
        self.default_max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` to the model, retrying transient failures.
    ///
    /// `temperature` is clamped to `0.0..=1.0` and `max_output_tokens` to at
    /// least 1.
    pub async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> GenerationResult {
        let temperature = if temperature.is_nan() {
            warn!("Temperature is NaN, using default {}", self.default_temperature);
            self.default_temperature
        } else if !(0.0..=1.0).contains(&temperature) {
            let clamped = temperature.clamp(0.0, 1.0);
            warn!("Temperature {} out of range, clamped to {}", temperature, clamped);
            clamped
        } else {
            temperature
        };
        let max_output_tokens = if max_output_tokens == 0 {
            warn!("max_output_tokens was 0, using 1");
            1
        } else {
            max_output_tokens
        };

        let request =
            CompletionRequest::new(&self.model, SYSTEM_PROMPT, prompt, temperature, max_output_tokens);
        let transport = self.transport.as_ref();

        let outcome = self
            .retry
            .run(self.sleeper.as_ref(), "generation", |_| {
                let request = &request;
                async move {
                    let started = Instant::now();
                    let completion = transport.complete(request).await?;
                    Ok::<_, GenerationError>((completion, started.elapsed()))
                }
            })
            .await;

        match outcome {
            Ok((completion, elapsed)) => {
                info!(
                    "Generation successful: {} tokens in {:.2}s",
                    completion.total_tokens,
                    elapsed.as_secs_f64()
                );
                GenerationResult::success(
                    completion.text,
                    completion.total_tokens,
                    elapsed.as_secs_f64(),
                    &self.model,
                )
            }
            Err(err) => GenerationResult::failure(err.to_string()),
        }
    }

    /// [`generate`](Self::generate) with the configured temperature and token ceiling.
    pub async fn generate_with_defaults(&self, prompt: &str) -> GenerationResult {
        self.generate(prompt, self.default_temperature, self.default_max_tokens)
            .await
    }

    /// Renders, generates and tags one request. Does not validate it.
    pub async fn generate_content(&self, request: &ContentRequest) -> GenerationResult {
        let content_type = request.content_type();
        let prompt = prompts::render(request);

        self.generate(&prompt, self.default_temperature, content_type.max_output_tokens())
            .await
            .with_request(content_type, request.parameters())
    }

    pub async fn generate_blog_post(
        &self,
        topic: &str,
        keywords: &str,
        tone: &str,
        word_count: u32,
    ) -> GenerationResult {
        info!("Generating blog post: {}", topic);
        self.generate_content(&ContentRequest::BlogPost {
            topic: topic.to_string(),
            keywords: keywords.to_string(),
            tone: tone.to_string(),
            word_count,
        })
        .await
    }

    pub async fn generate_social_post(&self, topic: &str, platform: &str, tone: &str) -> GenerationResult {
        info!("Generating {} post: {}", platform, topic);
        self.generate_content(&ContentRequest::SocialPost {
            topic: topic.to_string(),
            platform: platform.to_string(),
            tone: tone.to_string(),
        })
        .await
    }

    pub async fn generate_ad_copy(&self, product: &str, target_audience: &str, tone: &str) -> GenerationResult {
        info!("Generating ad copy for: {}", product);
        self.generate_content(&ContentRequest::AdCopy {
            product: product.to_string(),
            target_audience: target_audience.to_string(),
            tone: tone.to_string(),
        })
        .await
    }

    pub async fn generate_email(&self, purpose: &str, audience: &str, tone: &str) -> GenerationResult {
        info!("Generating email: {}", purpose);
        self.generate_content(&ContentRequest::Email {
            purpose: purpose.to_string(),
            audience: audience.to_string(),
            tone: tone.to_string(),
        })
        .await
    }

    pub async fn generate_landing_page(&self, offer: &str, target_audience: &str, tone: &str) -> GenerationResult {
        info!("Generating landing page: {}", offer);
        self.generate_content(&ContentRequest::LandingPage {
            offer: offer.to_string(),
            target_audience: target_audience.to_string(),
            tone: tone.to_string(),
        })
        .await
    }

    pub async fn generate_product_description(
        &self,
        product_name: &str,
        features: &str,
        tone: &str,
    ) -> GenerationResult {
        info!("Generating product description: {}", product_name);
        self.generate_content(&ContentRequest::ProductDescription {
            product_name: product_name.to_string(),
            features: features.to_string(),
            tone: tone.to_string(),
        })
        .await
    }
}
