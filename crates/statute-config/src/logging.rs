//! Log output format selection.

use strum::{Display, EnumString, VariantNames};

/// How log events are rendered on standard error.
///
/// Parsing is case-insensitive so `--log-format JSON` and
/// `STATUTE_LOG_FORMAT=compact` are both accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, VariantNames)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event with fields flattened to the top level.
    #[default]
    Json,
    /// Single-line human-readable events.
    Compact,
}

impl LogFormat {
    /// Accepted spellings, lowercase.
    #[must_use]
    pub const fn names() -> &'static [&'static str] {
        Self::VARIANTS
    }
}
