// Top-level driver
//
// Owns the Playwright server, the browser and the page for the duration of a
// run. Runner failures are turned into an error screenshot and a failed
// report; the browser is released on every path.

use crate::config::VerifyConfig;
use crate::error::Result;
use crate::page::VerifyPage;
use crate::report::{Journal, Outcome, RunReport};
use crate::runner::VerificationRunner;
use playwright_rs::{Browser, LaunchOptions, Playwright};
use std::time::Instant;
use tracing::{error, info, warn};

/// Launches a browser, runs the verification and releases everything.
///
/// Returns `Err` only when the run could not start (invalid configuration,
/// Playwright or the browser failed to launch). A failed verification is an
/// `Ok` report with [`Outcome::Failed`].
///
/// # Example
///
/// ```ignore
/// use studio_verify::{VerifyConfig, verify};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let report = verify(&VerifyConfig::default()).await?;
///     std::process::exit(report.exit_code().into());
/// }
/// ```
pub async fn verify(config: &VerifyConfig) -> Result<RunReport> {
    config.validate()?;
    let artifacts = config.artifacts();
    artifacts.prepare().await?;

    info!("Launching Playwright (headless: {})", config.headless);
    let playwright = Playwright::launch().await?;

    let options = LaunchOptions::new().headless(config.headless);
    let browser = match playwright.chromium().launch_with_options(options).await {
        Ok(browser) => browser,
        Err(e) => {
            shutdown(&playwright).await;
            return Err(e.into());
        }
    };

    let report: Result<RunReport> = match browser.new_page().await {
        Ok(page) => Ok(run_on_page(&page, config).await),
        Err(e) => Err(e.into()),
    };

    release(&browser, &playwright).await;
    let report = report?;

    if config.write_result {
        let path = artifacts.result();
        match report.write_to(&path).await {
            Ok(()) => info!("Result written to {}", path.display()),
            Err(e) => warn!("Could not write result file {}: {}", path.display(), e),
        }
    }

    Ok(report)
}

/// Runs the verification on an already open page and builds the report.
///
/// On failure the error is logged and an error screenshot is attempted; a
/// failing error screenshot is logged and does not replace the original error.
pub async fn run_on_page(page: &dyn VerifyPage, config: &VerifyConfig) -> RunReport {
    let started = Instant::now();
    let artifacts = config.artifacts();
    let mut journal = Journal::new();

    let result = VerificationRunner::new(config).run(page, &mut journal).await;

    let (outcome, error, error_screenshot) = match result {
        Ok(()) => {
            info!("Verification passed in {:?}", started.elapsed());
            (Outcome::Passed, None, None)
        }
        Err(e) => {
            error!("Error: {}", e);
            let path = artifacts.error();
            let screenshot = match page.screenshot(&path).await {
                Ok(_) => {
                    info!("Error screenshot saved: {}", path.display());
                    Some(path)
                }
                Err(shot_error) => {
                    warn!("Could not capture error screenshot: {}", shot_error);
                    None
                }
            };
            (Outcome::Failed, Some(e.to_string()), screenshot)
        }
    };

    RunReport {
        outcome,
        base_url: config.base_url.clone(),
        duration_ms: started.elapsed().as_millis() as u64,
        steps: journal.into_steps(),
        error,
        error_screenshot,
    }
}

async fn release(browser: &Browser, playwright: &Playwright) {
    if let Err(e) = browser.close().await {
        warn!("Failed to close browser: {}", e);
    }
    shutdown(playwright).await;
}

async fn shutdown(playwright: &Playwright) {
    if let Err(e) = playwright.shutdown().await {
        warn!("Failed to shut down Playwright server: {}", e);
    }
}
