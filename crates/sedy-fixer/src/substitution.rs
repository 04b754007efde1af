// substitution.rs - Apply one s/from/to/ to a text.
//
// Like sed without the `g` flag, only the first occurrence is replaced.

use regex::Regex;
use sedy_core::{Match, MatchKind};

/// Content after applying `m`, or `None` when `from` does not occur.
///
/// An empty `from` never matches, and neither does an invalid pattern.
pub fn apply(content: &str, m: &Match) -> Option<String> {
    if m.from.is_empty() {
        return None;
    }

    match m.kind {
        MatchKind::Literal => content
            .contains(m.from.as_str())
            .then(|| content.replacen(m.from.as_str(), &m.to, 1)),
        MatchKind::Pattern => {
            let regex = match Regex::new(&m.from) {
                Ok(regex) => regex,
                Err(e) => {
                    tracing::debug!(pattern = %m.from, "invalid pattern: {}", e);
                    return None;
                }
            };
            regex
                .is_match(content)
                .then(|| regex.replacen(content, 1, m.to.as_str()).into_owned())
        }
    }
}
