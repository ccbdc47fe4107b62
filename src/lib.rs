//! Copysmith - AI-powered marketing copy generation library.
//!
//! This library turns structured content requests into prompts, sends them to
//! a hosted chat-completion API and normalizes the answer. It supports:
//!
//! - **Six content types**: blog posts, social posts, ad copy, emails,
//!   landing pages and product descriptions
//! - **Retry with backoff** around every completion call
//! - **Uniform results** that carry either content or an error, never both
//! - **Mock mode** for running without network access
//!
//! # Architecture
//!
//! - [`config`] - Configuration management (API key, model, retry tuning)
//! - [`content`] - Content types, requests and results
//! - [`prompts`] - Prompt templates per content type
//! - [`completion`] - Chat-completion transport and wire format
//! - [`retry`] - Retry policy and backoff
//! - [`generator`] - Prompt-to-result generation with retries
//! - [`dispatcher`] - Input validation and routing by content type
//! - [`providers`] - Shared dependency injection traits
//! - [`http_client`] - HTTP client abstraction
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use copysmith::config::Config;
//! use copysmith::content::ContentRequest;
//! use copysmith::dispatcher::RequestDispatcher;
//! use copysmith::generator::ContentGenerator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let dispatcher = RequestDispatcher::new(ContentGenerator::from_config(&config)?);
//!
//!     let result = dispatcher
//!         .dispatch(&ContentRequest::SocialPost {
//!             topic: "Launch".to_string(),
//!             platform: "LinkedIn".to_string(),
//!             tone: "Professional".to_string(),
//!         })
//!         .await;
//!
//!     match result.content() {
//!         Some(text) => println!("{text}"),
//!         None => eprintln!("{}", result.error().unwrap_or("unknown error")),
//!     }
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod config;
pub mod content;
pub mod dispatcher;
pub mod error;
pub mod generator;
pub mod http_client;
pub mod prompts;
pub mod providers;
pub mod retry;
