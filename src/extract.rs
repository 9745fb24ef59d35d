//! Directive extraction: recover desired settings from a setup script.
//!
//! The script is third-party maintained and mostly noise from our point of
//! view — authentication calls, header setup, server startup. Only one shape
//! of line expresses a setting, and recognition is a single regex applied per
//! line. A line that fails any part of the pattern is skipped silently; a
//! near-miss is not an error, it is just not a directive.
//!
//! Keeping the recognition rule in one place ([`DIRECTIVE`]) is deliberate:
//! the upstream script format drifts, and when it does, only this regex
//! should need to change — the merge algorithm never sees script text.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::InimergeError;
use crate::types::Setting;

/// Matches one configuration call in the setup script:
///
/// ```text
/// curl -X PUT "http://127.0.0.1:5984/_node/nonode@nohost/_config/chttpd/require_valid_user" -d '"true"'
/// ```
///
/// The `curl` token is case-insensitive. The section is the path segment
/// between `/_config/` and the first following slash; everything after that
/// slash up to the closing quote is the key, further slashes included. The
/// payload is a double-quoted JSON string wrapped in single quotes; the
/// capture is the unwrapped inner text.
static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i:curl)\b.*?/_config/([^/"'\s]+)/([^"'\s]+)["'].*?-d\s+'"([^"]*)"'"#).unwrap()
});

/// Scan script text and return one [`Setting`] per recognized line, in file
/// order. Unrecognized lines are skipped; duplicates are reported as-is
/// (the merge resolves them, later occurrences winning).
pub fn extract_settings(script: &str) -> Vec<Setting> {
    script
        .lines()
        .filter_map(|line| {
            let caps = DIRECTIVE.captures(line)?;
            Some(Setting::new(&caps[1], &caps[2], &caps[3]))
        })
        .collect()
}

/// I/O wrapper: read the script file and extract its settings.
pub fn load_settings(path: &Path) -> Result<Vec<Setting>, InimergeError> {
    let script = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InimergeError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(InimergeError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    Ok(extract_settings(&script))
}
