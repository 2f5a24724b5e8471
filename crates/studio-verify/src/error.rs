// Error types for studio-verify

use crate::report::exit_code;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for verification operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while verifying the target application
#[derive(Debug, Error)]
pub enum Error {
    /// Failure reported by the browser automation layer
    ///
    /// Covers navigation, clicks, screenshots and launching the browser.
    #[error("Playwright error: {0}")]
    Playwright(#[from] playwright_rs::Error),

    /// A mandatory visibility assertion ran out of time
    #[error("Expected {target} to be visible, but it was not visible after {timeout:?}")]
    NotVisible { target: String, timeout: Duration },

    /// A runner step failed
    ///
    /// Wraps the underlying error with the name of the step that raised it.
    #[error("Step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<Error>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// I/O error (artifact directory, seed file, result file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attaches the name of the failing step.
    pub fn at_step(self, step: impl Into<String>) -> Self {
        Error::Step {
            step: step.into(),
            source: Box::new(self),
        }
    }

    /// Returns true when the error means "the element did not show up in time".
    ///
    /// Only these failures are tolerated by optional steps.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::NotVisible { .. } => true,
            Error::Playwright(error) => is_playwright_timeout(error),
            Error::Step { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Returns true for failures that happen before the runner touches the page:
    /// bad configuration, artifact or seed files, or a Playwright server or
    /// browser that would not launch.
    ///
    /// Runner failures are wrapped in [`Error::Step`] and never count as setup.
    pub fn is_setup(&self) -> bool {
        match self {
            Error::Step { .. } | Error::NotVisible { .. } => false,
            Error::Playwright(_)
            | Error::Config(_)
            | Error::InvalidUrl(_)
            | Error::Io(_)
            | Error::Json(_) => true,
        }
    }

    /// Process exit code for an error that ended the run.
    pub fn exit_code(&self) -> u8 {
        if self.is_setup() {
            exit_code::SETUP
        } else {
            exit_code::FAILED
        }
    }
}

// The Playwright server reports action timeouts as protocol errors named
// TimeoutError, e.g. "Timeout 3000ms exceeded."
fn is_playwright_timeout(error: &playwright_rs::Error) -> bool {
    use playwright_rs::Error as Pw;

    match error {
        Pw::Timeout(_) | Pw::AssertionTimeout(_) | Pw::ElementNotFound(_) => true,
        Pw::NavigationTimeout { .. } => true,
        Pw::ProtocolError(message) => {
            message.contains("TimeoutError")
                || (message.contains("Timeout") && message.contains("exceeded"))
        }
        Pw::Context(_, inner) => is_playwright_timeout(inner),
        _ => false,
    }
}
