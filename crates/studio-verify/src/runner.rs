// Verification runner
//
// Drives one page through the admin dashboard and AI Studio checks. The flow
// is linear: each step gates the next, and only the optional clicks are
// allowed to time out without failing the run.

use crate::config::{Artifacts, VerifyConfig};
use crate::error::Result;
use crate::page::{ClickMode, VerifyPage};
use crate::report::{Journal, StepStatus};
use crate::target::{AriaRole, Target};
use std::future::Future;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Consent dialog button, normally skipped thanks to the seeded flag
pub const CONSENT_TEXT: &str = "I Agree & Continue";
/// Landing element proving the seeded admin session was accepted
pub const LANDING_TEXT: &str = "Admin Console";
/// Navigation control and page heading of the AI Studio screen
pub const STUDIO_TEXT: &str = "AI Studio";
/// Settings panel on the AI Studio screen
pub const SETTINGS_TEXT: &str = "API Configuration";

/// Step names as they appear in logs and the result file
pub mod steps {
    pub const SEED_SESSION: &str = "seed-session";
    pub const NAVIGATE: &str = "navigate";
    pub const ACCEPT_TERMS: &str = "accept-terms";
    pub const LANDING_VISIBLE: &str = "landing-visible";
    pub const DASHBOARD_SCREENSHOT: &str = "dashboard-screenshot";
    pub const OPEN_AI_STUDIO: &str = "open-ai-studio";
    pub const STUDIO_HEADING_VISIBLE: &str = "studio-heading-visible";
    pub const SETTINGS_VISIBLE: &str = "api-configuration-visible";
    pub const AI_STUDIO_SCREENSHOT: &str = "ai-studio-screenshot";
}

/// Runs the verification flow against a page
pub struct VerificationRunner<'a> {
    config: &'a VerifyConfig,
    artifacts: Artifacts,
}

impl<'a> VerificationRunner<'a> {
    pub fn new(config: &'a VerifyConfig) -> Self {
        Self {
            config,
            artifacts: config.artifacts(),
        }
    }

    /// Executes every step in order, recording each one in `journal`.
    ///
    /// Returns the first failure, wrapped with the name of its step. The
    /// journal keeps everything recorded up to that point.
    pub async fn run(&self, page: &dyn VerifyPage, journal: &mut Journal) -> Result<()> {
        let timeouts = &self.config.timeouts;
        let url = self.config.url()?;

        let script = self.config.seed.init_script()?;
        debug!("Seed script:\n{}", script);
        required(journal, steps::SEED_SESSION, page.add_init_script(&script)).await?;

        info!("Navigating to {}", url);
        required(journal, steps::NAVIGATE, page.goto(url.as_str())).await?;

        let consent = Target::text(CONSENT_TEXT);
        optional(
            journal,
            steps::ACCEPT_TERMS,
            page.click(&consent, ClickMode::within(timeouts.consent)),
        )
        .await?;

        for control in &self.config.dismiss_popups {
            let target = Target::text(control.as_str());
            let step = format!("dismiss:{}", control);
            optional(
                journal,
                &step,
                page.click(&target, ClickMode::within(timeouts.popup)),
            )
            .await?;
        }

        info!("Waiting for dashboard...");
        let landing = Target::text(LANDING_TEXT);
        required(
            journal,
            steps::LANDING_VISIBLE,
            page.expect_visible(&landing, timeouts.landing),
        )
        .await?;

        screenshot(journal, steps::DASHBOARD_SCREENSHOT, page, &self.artifacts.dashboard())
            .await?;

        info!("Clicking AI Studio...");
        let studio = Target::text(STUDIO_TEXT);
        required(
            journal,
            steps::OPEN_AI_STUDIO,
            page.click(&studio, ClickMode::forced()),
        )
        .await?;

        info!("Waiting for header...");
        let heading = Target::role(AriaRole::Heading, STUDIO_TEXT);
        required(
            journal,
            steps::STUDIO_HEADING_VISIBLE,
            page.expect_visible(&heading, timeouts.heading),
        )
        .await?;

        let settings = Target::text(SETTINGS_TEXT);
        required(
            journal,
            steps::SETTINGS_VISIBLE,
            page.expect_visible(&settings, timeouts.default),
        )
        .await?;

        for text in &self.config.extra_texts {
            let target = Target::text(text.as_str());
            let step = format!("expect:{}", text);
            required(journal, &step, page.expect_visible(&target, timeouts.default)).await?;
        }

        screenshot(journal, steps::AI_STUDIO_SCREENSHOT, page, &self.artifacts.ai_studio())
            .await?;

        Ok(())
    }
}

/// Runs a step whose failure aborts the run.
async fn required<F>(journal: &mut Journal, step: &str, action: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    let started = Instant::now();
    match action.await {
        Ok(()) => {
            journal.record(step, StepStatus::Passed, started.elapsed());
            Ok(())
        }
        Err(e) => {
            journal.record(step, StepStatus::Failed, started.elapsed()).detail = Some(e.to_string());
            Err(e.at_step(step))
        }
    }
}

/// Runs a step that may time out; any other failure still aborts the run.
async fn optional<F>(journal: &mut Journal, step: &str, action: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    let started = Instant::now();
    match action.await {
        Ok(()) => {
            journal.record(step, StepStatus::Passed, started.elapsed());
            Ok(())
        }
        Err(e) if e.is_timeout() => {
            debug!("Optional step '{}' skipped: {}", step, e);
            journal.record(step, StepStatus::Tolerated, started.elapsed()).detail = Some(e.to_string());
            Ok(())
        }
        Err(e) => {
            warn!("Optional step '{}' failed with a non-timeout error", step);
            journal.record(step, StepStatus::Failed, started.elapsed()).detail = Some(e.to_string());
            Err(e.at_step(step))
        }
    }
}

async fn screenshot(
    journal: &mut Journal,
    step: &str,
    page: &dyn VerifyPage,
    path: &Path,
) -> Result<()> {
    let started = Instant::now();
    match page.screenshot(path).await {
        Ok(bytes) => {
            info!("Screenshot saved: {} ({} bytes)", path.display(), bytes);
            journal.record(step, StepStatus::Passed, started.elapsed()).screenshot =
                Some(path.to_path_buf());
            Ok(())
        }
        Err(e) => {
            journal.record(step, StepStatus::Failed, started.elapsed()).detail = Some(e.to_string());
            Err(e.at_step(step))
        }
    }
}
