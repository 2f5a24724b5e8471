// Verification configuration
//
// Everything that used to be a literal in the smoke script: where the app
// lives, where artifacts go, how long each wait may take and which session
// is seeded. Defaults reproduce the original run exactly.

use crate::error::{Error, Result};
use crate::seed::SeedSession;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default address of the locally hosted application
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default artifact directory
pub const DEFAULT_OUTPUT_DIR: &str = "verification";

/// Popups the optional sweep tries to dismiss
pub const DEFAULT_POPUP_CONTROLS: &[&str] = &["Resume Learning", "Get Started", "Continue Learning"];

/// Per-step wait limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Optional "I Agree & Continue" click
    pub consent: Duration,
    /// "Admin Console" landing assertion
    pub landing: Duration,
    /// "AI Studio" heading assertion
    pub heading: Duration,
    /// Any other assertion
    pub default: Duration,
    /// Each click of the popup sweep
    pub popup: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            consent: Duration::from_millis(3000),
            landing: Duration::from_millis(20000),
            heading: Duration::from_millis(5000),
            default: Duration::from_millis(5000),
            popup: Duration::from_millis(500),
        }
    }
}

impl Timeouts {
    fn validate(&self) -> Result<()> {
        let named = [
            ("consent", self.consent),
            ("landing", self.landing),
            ("heading", self.heading),
            ("default", self.default),
            ("popup", self.popup),
        ];
        for (name, timeout) in named {
            if timeout.is_zero() {
                return Err(Error::Config(format!("{} timeout must be non-zero", name)));
            }
        }
        Ok(())
    }
}

/// Configuration for one verification run
///
/// # Example
///
/// ```ignore
/// use studio_verify::VerifyConfig;
///
/// let config = VerifyConfig::builder()
///     .base_url("http://127.0.0.1:4173")
///     .output_dir("target/verification")
///     .extra_text("MCQ Generator Prompt")
///     .build();
/// config.validate()?;
/// ```
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Home page of the target application
    pub base_url: String,
    /// Directory receiving screenshots and the result file
    pub output_dir: PathBuf,
    /// Run the browser without a window
    pub headless: bool,
    pub timeouts: Timeouts,
    /// Session written into client storage before navigation
    pub seed: SeedSession,
    /// Popup controls clicked (tolerantly) after the consent step
    pub dismiss_popups: Vec<String>,
    /// Additional texts asserted on the AI Studio screen
    pub extra_texts: Vec<String>,
    /// Write `result.json` after the run
    pub write_result: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            headless: true,
            timeouts: Timeouts::default(),
            seed: SeedSession::default(),
            dismiss_popups: Vec::new(),
            extra_texts: Vec::new(),
            write_result: true,
        }
    }
}

impl VerifyConfig {
    /// Create a new builder for VerifyConfig
    pub fn builder() -> VerifyConfigBuilder {
        VerifyConfigBuilder::default()
    }

    /// Parses the base URL, accepting only absolute http(s) URLs.
    pub fn url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::Config(format!(
                "base URL must use http or https, got '{}'",
                other
            ))),
        }
    }

    /// Checks the configuration before any browser is launched.
    pub fn validate(&self) -> Result<()> {
        self.url()?;
        self.timeouts.validate()?;
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::Config("output directory must not be empty".to_string()));
        }
        Ok(())
    }

    /// Artifact paths for this run
    pub fn artifacts(&self) -> Artifacts {
        Artifacts::new(&self.output_dir)
    }
}

/// Builder for VerifyConfig
#[derive(Debug, Clone, Default)]
pub struct VerifyConfigBuilder {
    config: VerifyConfig,
}

impl VerifyConfigBuilder {
    /// Set the application home page
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the artifact directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Run headless (default) or with a window
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Replace all wait limits
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.config.timeouts = timeouts;
        self
    }

    /// Set the seeded session
    pub fn seed(mut self, seed: SeedSession) -> Self {
        self.config.seed = seed;
        self
    }

    /// Enable the popup sweep with the default controls
    pub fn dismiss_default_popups(mut self) -> Self {
        self.config
            .dismiss_popups
            .extend(DEFAULT_POPUP_CONTROLS.iter().map(|text| text.to_string()));
        self
    }

    /// Add one control to the popup sweep
    pub fn dismiss_popup(mut self, text: impl Into<String>) -> Self {
        self.config.dismiss_popups.push(text.into());
        self
    }

    /// Add a text that must be visible on the AI Studio screen
    pub fn extra_text(mut self, text: impl Into<String>) -> Self {
        self.config.extra_texts.push(text.into());
        self
    }

    /// Write (default) or skip `result.json`
    pub fn write_result(mut self, write_result: bool) -> Self {
        self.config.write_result = write_result;
        self
    }

    /// Build the VerifyConfig
    pub fn build(self) -> VerifyConfig {
        self.config
    }
}

/// Fixed artifact file names inside the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    dir: PathBuf,
}

impl Artifacts {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn dashboard(&self) -> PathBuf {
        self.dir.join("dashboard.png")
    }

    pub fn ai_studio(&self) -> PathBuf {
        self.dir.join("ai_studio.png")
    }

    pub fn error(&self) -> PathBuf {
        self.dir.join("error.png")
    }

    pub fn result(&self) -> PathBuf {
        self.dir.join("result.json")
    }

    /// Creates the output directory. Existing artifacts are overwritten by the run.
    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_run() {
        let config = VerifyConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.output_dir, PathBuf::from("verification"));
        assert!(config.headless);
        assert_eq!(config.timeouts.consent, Duration::from_millis(3000));
        assert_eq!(config.timeouts.landing, Duration::from_millis(20000));
        assert_eq!(config.timeouts.heading, Duration::from_millis(5000));
        assert!(config.dismiss_popups.is_empty());
        assert!(config.extra_texts.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = VerifyConfig::builder()
            .base_url("https://staging.example.com/app/")
            .output_dir("/tmp/out")
            .headless(false)
            .dismiss_default_popups()
            .dismiss_popup("Close")
            .extra_text("MCQ Generator Prompt")
            .write_result(false)
            .build();

        assert_eq!(config.url().unwrap().host_str(), Some("staging.example.com"));
        assert!(!config.headless);
        assert_eq!(config.dismiss_popups.len(), DEFAULT_POPUP_CONTROLS.len() + 1);
        assert_eq!(config.extra_texts, vec!["MCQ Generator Prompt".to_string()]);
        assert!(!config.write_result);
    }

    #[test]
    fn test_rejects_bad_urls() {
        let relative = VerifyConfig::builder().base_url("localhost:5000/home").build();
        assert!(relative.validate().is_err());

        let file = VerifyConfig::builder().base_url("file:///tmp/index.html").build();
        assert!(matches!(file.validate(), Err(Error::Config(_))));

        let garbage = VerifyConfig::builder().base_url("not a url").build();
        assert!(matches!(garbage.validate(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_zero_timeouts() {
        let config = VerifyConfig::builder()
            .timeouts(Timeouts {
                landing: Duration::ZERO,
                ..Timeouts::default()
            })
            .build();
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("landing timeout"));
    }

    #[test]
    fn test_artifact_paths() {
        let artifacts = VerifyConfig::default().artifacts();
        assert_eq!(artifacts.dashboard(), PathBuf::from("verification/dashboard.png"));
        assert_eq!(artifacts.ai_studio(), PathBuf::from("verification/ai_studio.png"));
        assert_eq!(artifacts.error(), PathBuf::from("verification/error.png"));
        assert_eq!(artifacts.result(), PathBuf::from("verification/result.json"));
    }

    #[tokio::test]
    async fn test_prepare_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = Artifacts::new(dir.path().join("nested/verification"));
        artifacts.prepare().await.unwrap();
        assert!(artifacts.dir().is_dir());
    }
}
