//! Release version validation

use regex::Regex;
use std::sync::OnceLock;

/// Version used when building without `-BUILD_VERSION`
pub const DEV_VERSION: &str = "0.0.0";

fn version_regex() -> &'static Regex {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    VERSION.get_or_init(|| {
        Regex::new(r"^\d{0,3}\.\d{0,3}\.\d{0,3}$").expect("version pattern is a valid regex")
    })
}

/// Check that a version has three dot-separated numeric components of at
/// most three digits each (`1.2.3`, `123.0.5`).
pub fn is_valid_version(version: &str) -> bool {
    version_regex().is_match(version)
}
