//! Reconcile scripted configuration calls into an INI file, preserving
//! comments and layout.
//!
//! Inimerge takes a third-party setup script that configures a CouchDB node
//! through `curl` calls against the `/_config` API, extracts the settings
//! those calls would have applied, and enforces them in the node's INI file
//! directly — before the server ever starts. It exists for one-shot container
//! initialization, where the file must be right at boot and a live
//! administrative API is not yet available.
//!
//! ```ignore
//! let report = inimerge::reconcile(
//!     Path::new("couchdb-setup.sh"),
//!     Path::new("/opt/couchdb/etc/local.ini"),
//! )?;
//! println!("{report}");
//! ```
//!
//! # Two stages, one seam
//!
//! - **Extraction** ([`extract_settings`]) scans the script line-by-line for
//!   one fixed invocation shape and yields `(section, key, value)` triples.
//!   Everything else in the script — auth calls, health checks, the server
//!   exec — is skipped without comment. The recognition rule lives behind a
//!   single regex so it can track upstream format drift without touching the
//!   merge.
//! - **Merging** ([`merge_settings`]) walks the INI file section by section
//!   and rewrites only assignment lines for targeted keys, commented or not.
//!   Unrelated keys, comments, and blank lines survive byte-for-byte, in
//!   order. Keys missing from their section are appended to it; sections
//!   missing from the file are appended at the end. Running the merge twice
//!   yields the same file as running it once.
//!
//! Both stages are pure functions over text. Their I/O wrappers
//! ([`load_settings`], [`apply_settings`]) read and write real files and map
//! a missing file to [`InimergeError::NotFound`]; [`reconcile`] composes the
//! two, so a missing script means the target is never touched.
//!
//! # What this is not
//!
//! There is no shell interpreter here — only the one `curl ... /_config/...`
//! pattern is recognized — no validation of values against CouchDB semantics,
//! no multi-line values, and no talking to a running server. The target file
//! is read once and written once per run, with no locking: concurrent runs
//! against the same file are not supported.

pub mod error;
pub mod types;

mod extract;
mod merge;
mod reconcile;

pub use error::InimergeError;
pub use extract::{extract_settings, load_settings};
pub use merge::{apply_settings, merge_settings};
pub use reconcile::{ReconcileReport, reconcile};
pub use types::Setting;
