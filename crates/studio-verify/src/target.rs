// Element targets
//
// Describes how the runner finds elements on the page. Targets render to
// Playwright's internal selector engines, the same ones behind getByText()
// and getByRole() in the other language bindings.
//
// See: https://playwright.dev/docs/locators

use std::fmt;

/// ARIA role used by role targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Heading,
}

impl AriaRole {
    /// Role name as understood by the role selector engine
    pub fn as_str(&self) -> &'static str {
        match self {
            AriaRole::Heading => "heading",
        }
    }
}

/// An element on the target page
///
/// Text and name matching is case-insensitive and matches substrings,
/// mirroring Playwright's defaults for `getByText` and `getByRole`.
///
/// # Example
///
/// ```ignore
/// use studio_verify::{AriaRole, Target};
///
/// let landing = Target::text("Admin Console");
/// assert_eq!(landing.selector(), r#"internal:text="Admin Console"i"#);
///
/// let heading = Target::role(AriaRole::Heading, "AI Studio");
/// assert_eq!(heading.selector(), r#"internal:role=heading[name="AI Studio"i]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Element whose visible text contains the given string
    Text(String),
    /// Element with an ARIA role and an accessible name
    Role { role: AriaRole, name: String },
}

impl Target {
    /// Target an element by its visible text
    pub fn text(text: impl Into<String>) -> Self {
        Target::Text(text.into())
    }

    /// Target an element by ARIA role and accessible name
    pub fn role(role: AriaRole, name: impl Into<String>) -> Self {
        Target::Role {
            role,
            name: name.into(),
        }
    }

    /// Selector string passed to `page.locator()`
    pub fn selector(&self) -> String {
        match self {
            Target::Text(text) => format!("internal:text={}i", quoted(text)),
            Target::Role { role, name } => {
                format!("internal:role={}[name={}i]", role.as_str(), quoted(name))
            }
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Text(text) => write!(f, "text {}", quoted(text)),
            Target::Role { role, name } => write!(f, "{} {}", role.as_str(), quoted(name)),
        }
    }
}

/// Double-quoted, escaped string literal.
///
/// JSON string literals are valid in both selector syntax and JavaScript.
pub(crate) fn quoted(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_selector() {
        let target = Target::text("I Agree & Continue");
        assert_eq!(target.selector(), r#"internal:text="I Agree & Continue"i"#);
    }

    #[test]
    fn test_role_selector() {
        let target = Target::role(AriaRole::Heading, "AI Studio");
        assert_eq!(
            target.selector(),
            r#"internal:role=heading[name="AI Studio"i]"#
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let target = Target::text(r#"Say "hi""#);
        assert_eq!(target.selector(), r#"internal:text="Say \"hi\""i"#);
    }

    #[test]
    fn test_display() {
        assert_eq!(Target::text("API Configuration").to_string(), "text \"API Configuration\"");
        assert_eq!(
            Target::role(AriaRole::Heading, "AI Studio").to_string(),
            "heading \"AI Studio\""
        );
    }
}
