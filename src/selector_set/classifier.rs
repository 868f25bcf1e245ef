//! Selector classification
//!
//! Splits a selector into its comma-separated alternatives and picks, for the
//! clause that ends each alternative (the compound the node itself must match),
//! the first index kind able to key it. Deeper clauses are left to the final
//! structural test.

use std::sync::LazyLock;

use regex::Regex;

use super::index::{IndexKind, UNIVERSAL_KEY};

/// Next clause: parenthesized groups, attribute groups, escapes and plain
/// characters up to whitespace, a combinator or a comma; or a lone combinator.
/// Group 2 is a terminating comma, group 3 the unscanned remainder.
static CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"((?:\((?:\([^()]+\)|[^()]+)+\)|\[(?:\[[^\[\]]*\]|['"][^'"]*['"]|[^\[\]'"]+)+\]|\\.|[^ >+~,(\[\\]+)+|[>+~])(\s*,\s*)?(?s:(.*))"#,
    )
    .expect("valid clause pattern")
});

/// One (index, key) pair a selector is filed under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contribution {
    pub kind: IndexKind,
    pub key: String,
}

impl Contribution {
    /// Pair `kind` with `key`
    pub fn new(kind: IndexKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

/// Ordered, deduplicated index contributions for `selector`.
///
/// Never empty: a selector with no scannable clause is filed under the
/// universal index.
pub fn classify(selector: &str) -> Vec<Contribution> {
    let mut contributions: Vec<Contribution> = Vec::new();
    let mut rest = selector;

    while let Some(captures) = CLAUSE.captures(rest) {
        let clause = captures.get(1).map_or("", |m| m.as_str());
        let terminated = captures.get(2).is_some();
        rest = captures.get(3).map_or("", |m| m.as_str());

        if !terminated && !rest.trim().is_empty() {
            continue;
        }

        let contribution = IndexKind::PRIORITY
            .iter()
            .find_map(|&kind| kind.classify(clause).map(|key| Contribution::new(kind, key)));
        if let Some(contribution) = contribution {
            if !contributions.contains(&contribution) {
                contributions.push(contribution);
            }
        }
    }

    if contributions.is_empty() {
        contributions.push(Contribution::new(IndexKind::Universal, UNIVERSAL_KEY));
    }
    contributions
}
