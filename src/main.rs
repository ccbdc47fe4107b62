use anyhow::{bail, Context};
use clap::{Arg, ArgAction, Command};
use copysmith::config::Config;
use copysmith::content::{ContentType, GenerationResult};
use copysmith::dispatcher::RequestDispatcher;
use copysmith::generator::ContentGenerator;
use copysmith::prompts::Platform;
use std::collections::HashMap;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// `(flag, parameter key)` for every content field accepted on the command line.
const FIELD_ARGS: [(&str, &str); 11] = [
    ("topic", "topic"),
    ("keywords", "keywords"),
    ("word-count", "word_count"),
    ("platform", "platform"),
    ("product", "product"),
    ("target-audience", "target_audience"),
    ("purpose", "purpose"),
    ("audience", "audience"),
    ("offer", "offer"),
    ("product-name", "product_name"),
    ("features", "features"),
];

fn cli() -> Command {
    let mut command = Command::new("copysmith")
        .about("AI-powered marketing copy generator")
        .long_about(
            "copysmith turns a content type and a few details into ready-to-use \
             marketing copy using a hosted language model",
        )
        .arg(
            Arg::new("content-type")
                .help("Content type, e.g. \"Blog Post\", social_post, ad-copy")
                .num_args(1),
        )
        .arg(
            Arg::new("tone")
                .long("tone")
                .help("Writing tone")
                .value_name("TONE")
                .default_value("Professional"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the full result as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-types")
                .long("list-types")
                .help("List content types and their fields")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("set-api-key")
                .long("set-api-key")
                .help("Set the Groq API key")
                .value_name("API_KEY")
                .num_args(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Show configuration information")
                .action(ArgAction::SetTrue),
        );

    for (flag, key) in FIELD_ARGS {
        let mut arg = Arg::new(key).long(flag).value_name("TEXT").num_args(1);
        if key == "word_count" {
            arg = arg
                .value_name("N")
                .default_value("800")
                .help("Target word count for blog posts");
        }
        command = command.arg(arg);
    }

    command
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = Config::load()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = Config::get_config_path()?;
    if config_path.exists() {
        info!("Loaded config from: {}", config_path.display());
    } else {
        info!("No config file found, using defaults");
    }

    // Handle configuration commands
    if let Some(api_key) = matches.get_one::<String>("set-api-key") {
        // Session-only environment overrides must not be written back
        let mut stored = Config::load_stored()?;
        stored.set_api_key(api_key.clone())?;
        println!("✅ API key saved successfully");
        return Ok(());
    }

    if matches.get_flag("config") {
        config.show_config_info()?;
        return Ok(());
    }

    if matches.get_flag("list-types") {
        print_content_types();
        return Ok(());
    }

    let Some(content_type) = matches.get_one::<String>("content-type") else {
        eprintln!("No content type provided. Use 'copysmith --help' for usage information.");
        return Ok(());
    };

    let mut params: HashMap<String, String> = FIELD_ARGS
        .iter()
        .filter_map(|(_, key)| {
            matches
                .get_one::<String>(key)
                .map(|value| (key.to_string(), value.clone()))
        })
        .collect();
    if let Some(tone) = matches.get_one::<String>("tone") {
        params.insert("tone".to_string(), tone.clone());
    }

    // A missing key is fatal here, before any request is attempted
    let generator = ContentGenerator::from_config(&config).context("Configuration error")?;
    let dispatcher = RequestDispatcher::new(generator);
    info!("Using model {}", dispatcher.generator().model());

    info!("Processing {} request", content_type);
    let result = dispatcher.dispatch_named(content_type, &params).await;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(content) = result.content() {
        println!("{content}");
        eprintln!("\n{}", summary(&result));
    }

    if !result.is_success() {
        bail!(
            "❌ Generation failed: {}",
            result.error().unwrap_or("Unknown error")
        );
    }

    Ok(())
}

fn summary(result: &GenerationResult) -> String {
    format!(
        "✅ Tokens: {} | Time: {:.2}s | Words: {}",
        result.tokens_used().unwrap_or_default(),
        result.elapsed_seconds().unwrap_or_default(),
        result.word_count()
    )
}

fn print_content_types() {
    println!("Content types:");
    for ty in ContentType::ALL {
        println!(
            "  {:<20} ({}) fields: {}",
            ty.display_name(),
            ty.tag(),
            ty.required_fields().join(", ")
        );
    }

    let platforms: Vec<&str> = Platform::ALL.iter().map(|p| p.label()).collect();
    println!("\nSocial platforms: {}", platforms.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_cli_collects_field_flags() {
        let matches = cli().get_matches_from([
            "copysmith",
            "Ad Copy",
            "--product",
            "Marketing Software",
            "--target-audience",
            "Small business owners",
        ]);

        assert_eq!(
            matches.get_one::<String>("content-type").map(String::as_str),
            Some("Ad Copy")
        );
        assert_eq!(
            matches.get_one::<String>("target_audience").map(String::as_str),
            Some("Small business owners")
        );
        assert_eq!(
            matches.get_one::<String>("tone").map(String::as_str),
            Some("Professional")
        );
        assert_eq!(
            matches.get_one::<String>("word_count").map(String::as_str),
            Some("800")
        );
    }

    #[test]
    fn test_summary_formats_metrics() {
        let result = GenerationResult::success("one two three".to_string(), 42, 1.234, "m");
        assert_eq!(summary(&result), "✅ Tokens: 42 | Time: 1.23s | Words: 3");
    }
}
