//! The full pipeline: extract settings from the script, merge them into the
//! target file, report what happened.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::InimergeError;
use crate::extract::load_settings;
use crate::merge::apply_settings;

/// What a reconcile run did. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    /// Number of settings extracted from the script (duplicates included).
    pub settings: usize,
    /// The file that was rewritten.
    pub target: PathBuf,
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Applied {} settings to {}",
            self.settings,
            self.target.display()
        )
    }
}

/// Run the whole pipeline once: read the script, extract its settings, and
/// rewrite the target config file.
///
/// The script is read first, so a missing script means the target is never
/// touched; a missing target fails before any write. Both surface as
/// [`InimergeError::NotFound`].
pub fn reconcile(script: &Path, target: &Path) -> Result<ReconcileReport, InimergeError> {
    let settings = load_settings(script)?;
    apply_settings(target, &settings)?;
    Ok(ReconcileReport {
        settings: settings.len(),
        target: target.to_path_buf(),
    })
}
