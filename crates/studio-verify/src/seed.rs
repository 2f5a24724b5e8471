// Seed session state
//
// The fake authenticated user and onboarding flags written into the target
// application's client storage before its first script runs. The storage
// keys and the JSON shape of the user record are the application's contract.

use crate::error::Result;
use crate::target::quoted;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Storage keys read by the target application
pub mod keys {
    /// JSON user record (localStorage)
    pub const CURRENT_USER: &str = "nst_current_user";
    /// Terms-of-service acceptance flag (localStorage)
    pub const TERMS_ACCEPTED: &str = "nst_terms_accepted";
    /// Welcome screen flag (localStorage)
    pub const HAS_SEEN_WELCOME: &str = "nst_has_seen_welcome";
    /// Startup ad flag (sessionStorage)
    pub const AD_SEEN: &str = "nst_ad_seen";
    /// JSON system settings (localStorage)
    pub const SYSTEM_SETTINGS: &str = "nst_system_settings";
}

/// User role as stored in the user record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Admin,
    Student,
}

/// User record stored under [`keys::CURRENT_USER`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedUser {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub credits: i64,
    pub is_premium: bool,
    /// Subscription tier, e.g. "LIFETIME"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<String>,
    /// Subscription level, e.g. "ULTRA"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_level: Option<String>,
}

impl Default for SeedUser {
    fn default() -> Self {
        Self {
            id: "admin-1".to_string(),
            name: "Admin User".to_string(),
            role: Role::Admin,
            email: "admin@example.com".to_string(),
            credits: 1000,
            is_premium: true,
            subscription_tier: None,
            subscription_level: None,
        }
    }
}

/// Everything written into client storage before navigation
///
/// The default value is the admin session the dashboard checks expect.
/// Flags set to `false` remove their key rather than storing `"false"`.
///
/// # Example
///
/// ```ignore
/// use studio_verify::seed::{Role, SeedSession};
///
/// let mut seed = SeedSession::default();
/// seed.user.role = Role::Student;
/// seed.terms_accepted = false;
/// let script = seed.init_script()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedSession {
    pub user: SeedUser,
    pub terms_accepted: bool,
    pub has_seen_welcome: bool,
    pub ad_seen: bool,
    /// Optional settings object stored under [`keys::SYSTEM_SETTINGS`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_settings: Option<serde_json::Value>,
}

impl Default for SeedSession {
    fn default() -> Self {
        Self {
            user: SeedUser::default(),
            terms_accepted: true,
            has_seen_welcome: true,
            ad_seen: true,
            system_settings: None,
        }
    }
}

impl SeedSession {
    /// Loads a seed from a JSON file. Missing fields keep their defaults.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Builds the script registered with `page.add_init_script()`.
    pub fn init_script(&self) -> Result<String> {
        let user = serde_json::to_string(&self.user)?;

        let mut lines = vec![
            set_item("localStorage", keys::CURRENT_USER, &user),
            flag("localStorage", keys::TERMS_ACCEPTED, self.terms_accepted),
            flag("localStorage", keys::HAS_SEEN_WELCOME, self.has_seen_welcome),
            flag("sessionStorage", keys::AD_SEEN, self.ad_seen),
        ];

        if let Some(settings) = &self.system_settings {
            let settings = serde_json::to_string(settings)?;
            lines.push(set_item("localStorage", keys::SYSTEM_SETTINGS, &settings));
        }

        Ok(lines.join("\n"))
    }
}

fn set_item(storage: &str, key: &str, value: &str) -> String {
    format!("{}.setItem({}, {});", storage, quoted(key), quoted(value))
}

fn flag(storage: &str, key: &str, enabled: bool) -> String {
    if enabled {
        set_item(storage, key, "true")
    } else {
        format!("{}.removeItem({});", storage, quoted(key))
    }
}
