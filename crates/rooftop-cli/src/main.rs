//! rooftop-render: render construction stages of a rooftop image from the
//! command line.
//!
//! Uploads the given image into a fresh session, renders each requested
//! stage through the image model and writes every successful render to
//! the output directory as `rooftop-{stage}-{timestamp}.png`.
//!
//! # Usage
//!
//! ```text
//! GEMINI_API_KEY=... cargo run --bin rooftop-render -- [OPTIONS] <IMAGE_PATH>
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use rooftop_gen::{GeminiClient, GeneratorConfig, generate_stage};
use rooftop_stages::payload::mime_for_filename;
use rooftop_stages::{Completion, ImagePayload, Session, Stage, catalog, now_millis};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Render rooftop construction stages with a generative image model.
///
/// Every stage is rendered from the original image. Stages given more
/// than once are rendered and written once.
#[derive(Parser)]
#[command(name = "rooftop-render", version)]
struct Cli {
    /// Path to the base image. Its type is taken from the extension.
    image_path: PathBuf,

    /// Stage to render (foundation, masonry, finishing, completed).
    ///
    /// Repeatable. All stages are rendered in order when omitted.
    #[arg(long = "stage", value_parser = parse_stage)]
    stages: Vec<Stage>,

    /// Directory the renders are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Image API key. Falls back to `API_KEY` when neither the flag nor
    /// `GEMINI_API_KEY` is set; a missing key is reported by the API.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier.
    #[arg(long, default_value = rooftop_gen::DEFAULT_MODEL)]
    model: String,

    /// API base URL.
    #[arg(long, default_value = rooftop_gen::DEFAULT_ENDPOINT)]
    endpoint: String,
}

impl Cli {
    /// Stages to render, in the order first given, without repeats.
    fn stages(&self) -> Vec<Stage> {
        if self.stages.is_empty() {
            return catalog().iter().map(|config| config.id).collect();
        }
        let mut stages = Vec::with_capacity(self.stages.len());
        for &stage in &self.stages {
            if !stages.contains(&stage) {
                stages.push(stage);
            }
        }
        stages
    }

    fn api_key(&self) -> String {
        self.api_key
            .clone()
            .or_else(|| std::env::var("API_KEY").ok())
            .unwrap_or_default()
    }

    fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new(self.api_key())
            .with_model(self.model.clone())
            .with_endpoint(self.endpoint.clone())
    }
}

/// Parse a generatable stage slug.
fn parse_stage(slug: &str) -> Result<Stage, String> {
    Stage::from_slug(slug)
        .filter(|stage| stage.is_generatable())
        .ok_or_else(|| {
            let valid: Vec<&str> = catalog().iter().map(|config| config.id.slug()).collect();
            format!("unknown stage '{slug}' (expected one of: {})", valid.join(", "))
        })
}

/// Read an image file into a payload, picking the MIME type from its name.
async fn load_image(path: &Path) -> Result<ImagePayload, String> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = mime_for_filename(&name)
        .ok_or_else(|| format!("Unsupported image type: {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    ImagePayload::from_bytes(mime_type, &bytes)
        .map_err(|e| format!("Invalid image {}: {e}", path.display()))
}

/// Write the session's displayed image into `out_dir`.
async fn save_active(session: &Session, out_dir: &Path) -> Result<PathBuf, String> {
    let download = session
        .download(now_millis())
        .ok_or_else(|| "nothing to save".to_owned())?;
    let bytes = download
        .image
        .decode()
        .map_err(|e| format!("Error decoding render: {e}"))?;
    let path = out_dir.join(&download.filename);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    Ok(path)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let base = match load_image(&cli.image_path).await {
        Ok(base) => base,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let config = cli.generator_config();
    tracing::debug!(?config, "image client configured");
    let client = match GeminiClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating image client: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = tokio::fs::create_dir_all(&cli.out_dir).await {
        eprintln!("Error creating {}: {e}", cli.out_dir.display());
        return ExitCode::FAILURE;
    }

    let mut session = Session::new();
    session.upload(base);

    let mut failed = 0usize;
    for stage in cli.stages() {
        eprintln!("Rendering {stage}...");
        match generate_stage(&mut session, &client, stage).await {
            Ok(Completion::Applied(_)) => match save_active(&session, &cli.out_dir).await {
                Ok(path) => println!("{}", path.display()),
                Err(msg) => {
                    eprintln!("{msg}");
                    failed += 1;
                }
            },
            Ok(Completion::Failed(_)) => {
                let msg = session.error().unwrap_or_default().to_owned();
                eprintln!("{stage}: {msg}");
                session.dismiss_error();
                failed += 1;
            }
            Ok(Completion::Stale) => {
                eprintln!("{stage}: render was discarded");
                failed += 1;
            }
            Err(e) => {
                eprintln!("{stage}: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("{failed} stage(s) failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_stages() {
        let cli = Cli::try_parse_from([
            "rooftop-render",
            "roof.png",
            "--api-key",
            "k",
            "--stage",
            "masonry",
            "--stage",
            "FOUNDATION",
        ])
        .unwrap();
        assert_eq!(cli.stages(), vec![Stage::Masonry, Stage::Foundation]);
        assert_eq!(cli.out_dir, PathBuf::from("."));
    }

    #[test]
    fn repeated_stage_is_rendered_once() {
        let cli = Cli::try_parse_from([
            "rooftop-render",
            "roof.png",
            "--api-key",
            "k",
            "--stage",
            "finishing",
            "--stage",
            "masonry",
            "--stage",
            "finishing",
        ])
        .unwrap();
        assert_eq!(cli.stages(), vec![Stage::Finishing, Stage::Masonry]);
    }

    #[test]
    fn parses_without_api_key() {
        let cli = Cli::try_parse_from(["rooftop-render", "roof.png"]).unwrap();
        assert_eq!(cli.image_path, PathBuf::from("roof.png"));
    }

    #[test]
    fn explicit_api_key_is_used() {
        let cli = Cli::try_parse_from(["rooftop-render", "roof.png", "--api-key", "secret"]).unwrap();
        assert_eq!(cli.generator_config().api_key, "secret");
    }

    #[test]
    fn defaults_to_every_catalog_stage() {
        let cli = Cli::try_parse_from(["rooftop-render", "roof.png", "--api-key", "k"]).unwrap();
        assert_eq!(
            cli.stages(),
            vec![
                Stage::Foundation,
                Stage::Masonry,
                Stage::Finishing,
                Stage::Completed
            ]
        );
        let config = cli.generator_config();
        assert_eq!(config.model, rooftop_gen::DEFAULT_MODEL);
        assert_eq!(config.endpoint, rooftop_gen::DEFAULT_ENDPOINT);
    }

    #[test]
    fn rejects_original_and_unknown_stages() {
        assert!(parse_stage("original").is_err());
        let err = parse_stage("roof").unwrap_err();
        assert!(err.contains("foundation, masonry, finishing, completed"));
    }
}
