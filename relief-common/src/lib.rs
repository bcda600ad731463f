pub mod config;
pub mod error;
pub mod json;
pub mod logging;

pub use config::Config;
pub use error::{ReliefError, Result};

/// Normalize a free-text label into a stable id fragment: lowercase, strip
/// non-alphanumerics (keeping spaces), collapse whitespace, hyphenate.
///
/// ```
/// assert_eq!(relief_common::slugify("Asheville Regional Airport"), "asheville-regional-airport");
/// assert_eq!(relief_common::slugify("  Multiple   Spaces  "), "multiple-spaces");
/// ```
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() || c == ' ' { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<&str>>().join("-")
}
