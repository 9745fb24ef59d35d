/// One desired configuration entry: set `key` to `value` inside `[section]`.
///
/// Settings are produced by the extractor in script order and consumed by the
/// merger as a flat list. Uniqueness by `(section, key)` is resolved during
/// the merge, not here — the extractor reports every directive it sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub section: String,
    pub key: String,
    pub value: String,
}

impl Setting {
    pub fn new(
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Setting {
            section: section.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}
