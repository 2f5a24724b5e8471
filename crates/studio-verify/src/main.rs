// studio-verify command line entry point
//
// With no arguments this runs the original smoke test: headless Chromium
// against http://localhost:5000, artifacts in ./verification.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use studio_verify::config::{DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR, DEFAULT_POPUP_CONTROLS};
use studio_verify::{RunReport, SeedSession, Timeouts, VerifyConfig, exit_code, verify};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "studio-verify",
    version,
    about = "Smoke-test the admin dashboard and AI Studio screens in a headless browser"
)]
struct Cli {
    /// Home page of the application under test
    #[arg(long, env = "STUDIO_VERIFY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory for screenshots and result.json
    #[arg(long, env = "STUDIO_VERIFY_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// JSON file with the session to seed (defaults to the admin session)
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Try to dismiss the known onboarding popups after loading
    #[arg(long)]
    dismiss_popups: bool,

    /// Extra popup control to dismiss, by visible text (repeatable)
    #[arg(long = "dismiss", value_name = "TEXT")]
    dismiss: Vec<String>,

    /// Extra text that must be visible on the AI Studio screen (repeatable)
    #[arg(long = "expect-text", value_name = "TEXT")]
    expect_text: Vec<String>,

    /// Wait for the optional consent button, in milliseconds
    #[arg(long, default_value_t = 3000)]
    consent_timeout_ms: u64,

    /// Wait for the admin dashboard, in milliseconds
    #[arg(long, default_value_t = 20000)]
    landing_timeout_ms: u64,

    /// Wait for the AI Studio heading, in milliseconds
    #[arg(long, default_value_t = 5000)]
    heading_timeout_ms: u64,

    /// Wait for any other element, in milliseconds
    #[arg(long, default_value_t = 5000)]
    default_timeout_ms: u64,

    /// Do not write result.json
    #[arg(long)]
    no_result_file: bool,
}

impl Cli {
    async fn into_config(self) -> anyhow::Result<VerifyConfig> {
        let seed = match &self.seed_file {
            Some(path) => SeedSession::from_file(path)
                .await
                .with_context(|| format!("failed to load seed file {}", path.display()))?,
            None => SeedSession::default(),
        };

        let timeouts = Timeouts {
            consent: Duration::from_millis(self.consent_timeout_ms),
            landing: Duration::from_millis(self.landing_timeout_ms),
            heading: Duration::from_millis(self.heading_timeout_ms),
            default: Duration::from_millis(self.default_timeout_ms),
            ..Timeouts::default()
        };

        let mut builder = VerifyConfig::builder()
            .base_url(self.base_url)
            .output_dir(self.output_dir)
            .headless(!self.headed)
            .timeouts(timeouts)
            .seed(seed)
            .write_result(!self.no_result_file);

        if self.dismiss_popups {
            builder = builder.dismiss_default_popups();
        }
        for text in self.dismiss {
            builder = builder.dismiss_popup(text);
        }
        for text in self.expect_text {
            builder = builder.extra_text(text);
        }

        let config = builder.build();
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("studio_verify=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn execute(cli: Cli) -> anyhow::Result<RunReport> {
    let config = cli.into_config().await?;
    let report = verify(&config)
        .await
        .context("could not start the verification run")?;
    Ok(report)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    if cli.dismiss_popups {
        info!("Popup sweep enabled: {}", DEFAULT_POPUP_CONTROLS.join(", "));
    }

    match execute(cli).await {
        Ok(report) => {
            if report.passed() {
                info!("PASSED ({} steps, {} ms)", report.steps.len(), report.duration_ms);
            } else {
                error!(
                    "FAILED: {}",
                    report.error.as_deref().unwrap_or("unknown error")
                );
            }
            ExitCode::from(report.exit_code())
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

// verify() only returns errors for runs that never started, so anything that
// is not a studio_verify::Error (e.g. a seed file context) is a setup failure too.
fn exit_code_for(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<studio_verify::Error>()
        .map_or(exit_code::SETUP, studio_verify::Error::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_arguments_reproduce_defaults() {
        let cli = Cli::try_parse_from(["studio-verify"]).unwrap();
        let config = cli.into_config().await.unwrap();
        let defaults = VerifyConfig::default();

        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.output_dir, defaults.output_dir);
        assert_eq!(config.timeouts, defaults.timeouts);
        assert_eq!(config.seed, defaults.seed);
        assert!(config.headless);
        assert!(config.write_result);
        assert!(config.dismiss_popups.is_empty());
    }

    #[tokio::test]
    async fn test_repeatable_flags() {
        let cli = Cli::try_parse_from([
            "studio-verify",
            "--base-url",
            "http://127.0.0.1:8080",
            "--headed",
            "--dismiss-popups",
            "--dismiss",
            "Maybe Later",
            "--expect-text",
            "Normal Notes Prompt",
            "--expect-text",
            "MCQ Generator Prompt",
            "--landing-timeout-ms",
            "45000",
            "--no-result-file",
        ])
        .unwrap();
        let config = cli.into_config().await.unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert!(!config.headless);
        assert_eq!(config.dismiss_popups.last().map(String::as_str), Some("Maybe Later"));
        assert_eq!(config.dismiss_popups.len(), DEFAULT_POPUP_CONTROLS.len() + 1);
        assert_eq!(config.extra_texts.len(), 2);
        assert_eq!(config.timeouts.landing, Duration::from_millis(45000));
        assert!(!config.write_result);
    }

    #[tokio::test]
    async fn test_zero_timeout_is_rejected() {
        let cli =
            Cli::try_parse_from(["studio-verify", "--heading-timeout-ms", "0"]).unwrap();
        let error = cli.into_config().await.unwrap_err();
        assert_eq!(exit_code_for(&error), exit_code::SETUP);
    }

    #[tokio::test]
    async fn test_seed_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        tokio::fs::write(&path, r#"{"user": {"role": "STUDENT"}, "adSeen": false}"#)
            .await
            .unwrap();
        let cli = Cli::try_parse_from([
            "studio-verify",
            "--seed-file",
            path.to_str().unwrap(),
        ])
        .unwrap();

        let config = cli.into_config().await.unwrap();

        assert_eq!(config.seed.user.role, studio_verify::Role::Student);
        assert!(!config.seed.ad_seen);
        assert!(config.seed.terms_accepted);
    }

    #[tokio::test]
    async fn test_missing_seed_file_is_setup_failure() {
        let cli = Cli::try_parse_from([
            "studio-verify",
            "--seed-file",
            "/nonexistent/seed.json",
        ])
        .unwrap();
        let error = cli.into_config().await.unwrap_err();
        assert_eq!(exit_code_for(&error), exit_code::SETUP);
    }

    #[test]
    fn test_launch_failure_exits_with_setup_code() {
        let launch = studio_verify::Error::from(playwright_rs::Error::LaunchFailed(
            "Executable doesn't exist".to_string(),
        ));
        let error = anyhow::Error::new(launch).context("could not start the verification run");
        assert_eq!(exit_code_for(&error), exit_code::SETUP);
    }

    #[test]
    fn test_runner_error_maps_to_failed_code() {
        let error = anyhow::Error::new(
            studio_verify::Error::from(playwright_rs::Error::ChannelClosed).at_step("navigate"),
        );
        assert_eq!(exit_code_for(&error), exit_code::FAILED);
    }
}
