//! studio-verify: browser smoke test for the admin dashboard and AI Studio
//!
//! Seeds client storage with an admin session, opens the application's home
//! page, checks that the admin dashboard loads, clicks through to AI Studio
//! and checks its heading and settings panel. Screenshots of both screens are
//! saved; a failure produces an error screenshot, a failed [`RunReport`] and a
//! non-zero exit code.
//!
//! # Example
//!
//! ```ignore
//! use studio_verify::{SeedSession, VerifyConfig, verify};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut seed = SeedSession::default();
//!     seed.user.credits = 0;
//!
//!     let config = VerifyConfig::builder()
//!         .base_url("http://localhost:5000")
//!         .output_dir("verification")
//!         .seed(seed)
//!         .build();
//!
//!     let report = verify(&config).await?;
//!     assert!(report.passed(), "{:?}", report.error);
//!     Ok(())
//! }
//! ```
//!
//! # Testing without a browser
//!
//! The runner only needs the [`VerifyPage`] trait, so scenarios can be driven
//! through [`run_on_page`] with a scripted page implementation.

pub mod config;
pub mod driver;
mod error;
pub mod page;
pub mod report;
pub mod runner;
pub mod seed;
pub mod target;

pub use config::{Artifacts, Timeouts, VerifyConfig, VerifyConfigBuilder};
pub use driver::{run_on_page, verify};
pub use error::{Error, Result};
pub use page::{ClickMode, VerifyPage};
pub use report::{Journal, Outcome, RunReport, StepRecord, StepStatus, exit_code};
pub use runner::VerificationRunner;
pub use seed::{Role, SeedSession, SeedUser};
pub use target::{AriaRole, Target};
