//! Structure-preserving merge of desired settings into an INI document.
//!
//! The merge rewrites only lines that assign a targeted key inside a targeted
//! section. Everything else — comments, blank lines, unrelated keys,
//! directives we don't understand — passes through byte-for-byte, in order.
//! Keys requested but absent from their section are appended to it; sections
//! absent from the file are appended at the end.
//!
//! [`merge_settings`] is pure (text in, text out); [`apply_settings`] is the
//! I/O wrapper that reads the target, merges, and writes the result back in a
//! single call. A failed read means no write happens.

use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::InimergeError;
use crate::types::Setting;

/// A section header line: `[chttpd]`, possibly with trailing whitespace.
static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*$").unwrap());

/// An assignment line we are allowed to rewrite: an optional `;` comment
/// marker, a word/hyphen key, `=`, and a (possibly empty) word-token value.
/// Anything looser — inline comments, quoted values, continuation lines —
/// deliberately fails to match and is preserved untouched.
static KEY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^;?\s*([\w-]+)\s*=\s*\w*\s*$").unwrap());

/// Desired keys for one section, in insertion order.
type SectionSettings = IndexMap<String, String>;

/// Group the flat settings list by section, keeping script order.
/// A duplicate `(section, key)` overwrites the earlier value but keeps the
/// earlier position, so later script lines win deterministically.
fn partition(settings: &[Setting]) -> IndexMap<String, SectionSettings> {
    let mut by_section: IndexMap<String, SectionSettings> = IndexMap::new();
    for s in settings {
        by_section
            .entry(s.section.clone())
            .or_default()
            .insert(s.key.clone(), s.value.clone());
    }
    by_section
}

/// Pure function: produce the updated document enforcing every setting.
///
/// Lines are split and re-joined on `\n`; whatever trailing newline the input
/// had survives as a final empty line through the join.
pub fn merge_settings(content: &str, settings: &[Setting]) -> String {
    let mut desired = partition(settings);
    let mut out: Vec<String> = Vec::new();

    // Name of the open section and its buffered lines. None until the first
    // header; preamble lines pass through directly.
    let mut open: Option<(String, Vec<&str>)> = None;

    for line in content.split('\n') {
        if let Some(caps) = SECTION_HEADER.captures(line) {
            if let Some((name, lines)) = open.take() {
                finalize_section(&mut out, &name, &lines, &mut desired);
            }
            out.push(line.to_string());
            open = Some((caps[1].to_string(), Vec::new()));
        } else if let Some((_, lines)) = open.as_mut() {
            lines.push(line);
        } else {
            out.push(line.to_string());
        }
    }
    if let Some((name, lines)) = open.take() {
        finalize_section(&mut out, &name, &lines, &mut desired);
    }

    // Sections never seen in the file become new blocks at the end.
    for (name, pairs) in desired {
        out.push(format!("[{name}]"));
        for (key, value) in pairs {
            out.push(format!("{key} = {value}"));
        }
    }

    out.join("\n")
}

/// Emit one section's lines, rewriting assignments of still-desired keys and
/// appending desired keys the section never mentioned. Consumes the section's
/// entry in `desired`, so a later duplicate `[name]` block passes through
/// verbatim.
fn finalize_section(
    out: &mut Vec<String>,
    name: &str,
    lines: &[&str],
    desired: &mut IndexMap<String, SectionSettings>,
) {
    let Some(mut remaining) = desired.shift_remove(name) else {
        out.extend(lines.iter().map(|l| l.to_string()));
        return;
    };

    for line in lines {
        let matched = KEY_LINE
            .captures(line)
            .and_then(|caps| remaining.shift_remove_entry(&caps[1]));
        match matched {
            // Replaces the whole line: comment marker and original spacing drop.
            Some((key, value)) => out.push(format!("{key} = {value}")),
            None => out.push(line.to_string()),
        }
    }

    for (key, value) in remaining {
        out.push(format!("{key} = {value}"));
    }
}

/// I/O wrapper: read the target file, merge, write the result back.
pub fn apply_settings(path: &Path, settings: &[Setting]) -> Result<(), InimergeError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
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

    let updated = merge_settings(&content, settings);

    std::fs::write(path, updated).map_err(|e| InimergeError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setting(section: &str, key: &str, value: &str) -> Setting {
        Setting::new(section, key, value)
    }

    #[test]
    fn updates_existing_key_in_place() {
        let content = "[chttpd]\nport = 5984\nbind_address = any\n";
        let result = merge_settings(content, &[setting("chttpd", "port", "8080")]);
        assert_eq!(result, "[chttpd]\nport = 8080\nbind_address = any\n");
    }

    #[test]
    fn commented_key_is_uncommented_and_updated() {
        let content = "[couchdb]\n;max_document_size = 0\n";
        let result = merge_settings(
            content,
            &[setting("couchdb", "max_document_size", "4294967296")],
        );
        assert_eq!(result, "[couchdb]\nmax_document_size = 4294967296\n");
    }

    #[test]
    fn missing_key_is_appended_to_its_section() {
        let content = "[chttpd]\nport = 5984\n\n[log]\nlevel = info\n";
        let result = merge_settings(content, &[setting("chttpd", "require_valid_user", "true")]);
        // Appended after the section's existing lines, before the next header.
        assert_eq!(
            result,
            "[chttpd]\nport = 5984\n\nrequire_valid_user = true\n[log]\nlevel = info\n"
        );
    }

    #[test]
    fn missing_section_is_appended_at_end() {
        let content = "[chttpd]\nport = 5984";
        let result = merge_settings(content, &[setting("foo", "bar", "1")]);
        assert_eq!(result, "[chttpd]\nport = 5984\n[foo]\nbar = 1");
    }

    #[test]
    fn missing_section_after_trailing_newline() {
        // The input's final empty line is emitted with its section, so the
        // new block follows it and the output carries no trailing newline.
        let content = "[chttpd]\nport = 5984\n";
        let result = merge_settings(content, &[setting("foo", "bar", "1")]);
        assert_eq!(result, "[chttpd]\nport = 5984\n\n[foo]\nbar = 1");
    }

    #[test]
    fn empty_desired_set_leaves_file_untouched() {
        let content = "; global notes\n[chttpd]\nport = 5984\n\n[log]\nlevel = info\n";
        assert_eq!(merge_settings(content, &[]), content);
    }

    #[test]
    fn preamble_before_any_section_passes_through() {
        let content = "; managed file, do not edit\n\n[chttpd]\nport = 5984\n";
        let result = merge_settings(content, &[setting("chttpd", "port", "8080")]);
        assert!(result.starts_with("; managed file, do not edit\n\n[chttpd]\n"));
    }

    #[test]
    fn unrelated_lines_survive_in_updated_section() {
        let content = "\
[couchdb]
; The maximum size a document may occupy after
; JSON encoding. Raise with care.
;max_document_size = 0
uuid = 9a1b
";
        let result = merge_settings(
            content,
            &[setting("couchdb", "max_document_size", "4294967296")],
        );
        assert_eq!(
            result,
            "\
[couchdb]
; The maximum size a document may occupy after
; JSON encoding. Raise with care.
max_document_size = 4294967296
uuid = 9a1b
"
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let content = "[chttpd]\n;require_valid_user = false\nport = 5984\n";
        let settings = vec![
            setting("chttpd", "require_valid_user", "true"),
            setting("chttpd", "max_connections", "2048"),
            setting("cors", "credentials", "true"),
        ];
        let once = merge_settings(content, &settings);
        let twice = merge_settings(&once, &settings);
        assert_eq!(once, twice);
    }

    #[test]
    fn later_duplicate_directive_wins() {
        let content = "[chttpd]\nport = 5984\n";
        let settings = vec![setting("chttpd", "port", "1111"), setting("chttpd", "port", "2222")];
        let result = merge_settings(content, &settings);
        assert_eq!(result, "[chttpd]\nport = 2222\n");
    }

    #[test]
    fn duplicate_section_headers_stay_separate_blocks() {
        let content = "[chttpd]\nport = 5984\n[log]\nlevel = info\n[chttpd]\nport = 5984\n";
        let result = merge_settings(content, &[setting("chttpd", "port", "8080")]);
        // Only the first block is updated; the second passes through verbatim.
        assert_eq!(
            result,
            "[chttpd]\nport = 8080\n[log]\nlevel = info\n[chttpd]\nport = 5984\n"
        );
    }

    #[test]
    fn rewritten_key_is_consumed_once() {
        // Once a key is rewritten, later lines naming it are left alone.
        let content = "[chttpd]\nport = 5984\nport = 5985\n";
        let result = merge_settings(content, &[setting("chttpd", "port", "8080")]);
        assert_eq!(result, "[chttpd]\nport = 8080\nport = 5985\n");
    }

    #[test]
    fn non_word_values_are_out_of_reach() {
        // Value is not a bare word token, so the line is out of reach; the
        // missing key lands after the buffered final empty line.
        let content = "[chttpd]\nbind_address = 127.0.0.1\n";
        let result = merge_settings(content, &[setting("chttpd", "port", "8080")]);
        assert_eq!(result, "[chttpd]\nbind_address = 127.0.0.1\n\nport = 8080");
    }

    #[test]
    fn appended_sections_follow_desired_order() {
        let content = "";
        let settings = vec![
            setting("zzz", "a", "1"),
            setting("aaa", "b", "2"),
            setting("zzz", "c", "3"),
        ];
        let result = merge_settings(content, &settings);
        assert_eq!(result, "\n[zzz]\na = 1\nc = 3\n[aaa]\nb = 2");
    }

    // --- apply_settings ---

    #[test]
    fn apply_overwrites_the_target_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local.ini");
        fs::write(&path, "[chttpd]\nport = 5984\n").unwrap();

        apply_settings(&path, &[setting("chttpd", "port", "8080")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[chttpd]\nport = 8080\n");
    }

    #[test]
    fn apply_missing_target_is_not_found_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local.ini");

        let result = apply_settings(&path, &[setting("chttpd", "port", "8080")]);
        assert!(matches!(result, Err(InimergeError::NotFound { .. })));
        assert!(!path.exists());
    }
}
