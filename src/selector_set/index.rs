//! Index definitions
//!
//! Each kind knows how to read a lookup key out of a selector clause and the
//! matching keys out of a live node. Priority is declaration order, with
//! `Universal` last as the catch-all.

use std::sync::LazyLock;

use cssparser::ParserInput;
use regex::Regex;
use serde::Serialize;

use crate::dom::Dom;

/// Key every node and every unclassifiable clause shares in the universal index
pub const UNIVERSAL_KEY: &str = "*";

static ID_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#((?:[\w\x{00c0}-\x{ffff}-]|\\.)+)").expect("valid id clause pattern")
});

static CLASS_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.((?:[\w\x{00c0}-\x{ffff}-]|\\.)+)").expect("valid class clause pattern")
});

static TAG_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:[\w\x{00c0}-\x{ffff}-]|\\.)+)").expect("valid tag clause pattern")
});

/// An index strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexKind {
    /// `#name`, keyed by the id attribute
    Id,
    /// `.name`, keyed by each class
    Class,
    /// `name`, keyed by the upper-cased node name
    Tag,
    /// Anything else
    Universal,
}

impl IndexKind {
    /// Classification order
    pub const PRIORITY: [IndexKind; 4] = [
        IndexKind::Id,
        IndexKind::Class,
        IndexKind::Tag,
        IndexKind::Universal,
    ];

    /// Upper-case index name as it appears in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            IndexKind::Id => "ID",
            IndexKind::Class => "CLASS",
            IndexKind::Tag => "TAG",
            IndexKind::Universal => "UNIVERSAL",
        }
    }

    /// Lookup key for a selector clause, if this kind can index it
    pub fn classify(self, clause: &str) -> Option<String> {
        let capture = |pattern: &Regex| {
            pattern
                .captures(clause)
                .and_then(|captures| captures.get(1))
                .and_then(|name| unescape(name.as_str()))
        };

        match self {
            IndexKind::Id => capture(&ID_CLAUSE),
            IndexKind::Class => capture(&CLASS_CLAUSE),
            IndexKind::Tag => capture(&TAG_CLAUSE).map(|tag| tag.to_uppercase()),
            IndexKind::Universal => Some(UNIVERSAL_KEY.to_string()),
        }
    }

    /// Keys under which `node` can be found in this index
    pub fn extract_keys<D: Dom>(self, dom: &D, node: &D::Node) -> Vec<String> {
        match self {
            IndexKind::Id => dom
                .element_id(node)
                .filter(|id| !id.is_empty())
                .map(|id| vec![id.into_owned()])
                .unwrap_or_default(),
            IndexKind::Class => dom
                .class_name(node)
                .map(|classes| classes.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            IndexKind::Tag => vec![dom.node_name(node).to_uppercase()],
            IndexKind::Universal => vec![UNIVERSAL_KEY.to_string()],
        }
    }
}

/// Resolve CSS escapes in a scanned name, so `a\:b` keys as `a:b` just like
/// the id the node reports. `None` when the escapes do not form one identifier.
fn unescape(raw: &str) -> Option<String> {
    if !raw.contains('\\') {
        return Some(raw.to_string());
    }

    let mut input = ParserInput::new(raw);
    let mut parser = cssparser::Parser::new(&mut input);
    let ident = parser.expect_ident_cloned().ok()?;
    parser.is_exhausted().then(|| ident.to_string())
}
