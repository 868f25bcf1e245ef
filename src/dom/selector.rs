//! Structural selector engine for the in-memory document
//!
//! This is the "native" `matches` / `querySelectorAll` primitive the matching
//! engine confirms its candidates with. Parsing and matching are done by the
//! `selectors` crate over `cssparser` tokens; this module only supplies the
//! selector implementation types. Tree-structural pseudo-classes
//! (`:first-child`, `:not(..)`, `:nth-child(..)`) are supported. Stateful
//! pseudo-classes and pseudo-elements are a [`SelectorError`], the same way a
//! browser throws a `SyntaxError` for a selector it cannot evaluate.

use std::borrow::Borrow;
use std::fmt;

use cssparser::{ParserInput, ToCss};
use selectors::matching::{
    self, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode, NeedsSelectorFlags,
    QuirksMode,
};
use selectors::parser::{self, ParseRelative, SelectorParseErrorKind};

/// Selector parse failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("invalid selector at {line}:{column}: {reason}")]
    Invalid {
        line: u32,
        column: u32,
        reason: String,
    },
}

/// A parsed, comma-separated selector list
#[derive(Debug, Clone)]
pub struct SelectorList(parser::SelectorList<SelectorImpl>);

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut input = ParserInput::new(input);
        let mut css = cssparser::Parser::new(&mut input);
        parser::SelectorList::parse(&SelectorParser, &mut css, ParseRelative::No)
            .map(Self)
            .map_err(|err| SelectorError::Invalid {
                line: err.location.line,
                column: err.location.column,
                reason: format!("{:?}", err.kind),
            })
    }

    /// Number of comma-separated alternatives
    pub fn len(&self) -> usize {
        self.0 .0.len()
    }

    /// Always false for a parsed list
    pub fn is_empty(&self) -> bool {
        self.0 .0.is_empty()
    }

    /// Whether `element` matches any selector of the list
    pub fn matches<E>(&self, element: &E) -> bool
    where
        E: selectors::Element<Impl = SelectorImpl>,
    {
        let mut nth_index_cache = Default::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut nth_index_cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );

        self.0 .0
            .iter()
            .any(|selector| matching::matches_selector(selector, 0, None, element, &mut context))
    }
}

/// Accepts the standard grammar; every non-structural pseudo-class or
/// pseudo-element is rejected by the trait defaults.
struct SelectorParser;

impl<'i> parser::Parser<'i> for SelectorParser {
    type Impl = SelectorImpl;
    type Error = SelectorParseErrorKind<'i>;
}

/// Selector implementation types for the in-memory document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorImpl;

impl selectors::SelectorImpl for SelectorImpl {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssIdent;
    type LocalName = CssIdent;
    type NamespacePrefix = CssIdent;
    type NamespaceUrl = ();
    type BorrowedLocalName = str;
    type BorrowedNamespaceUrl = ();
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// Identifier (tag, id, class or attribute name) with escapes resolved
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CssIdent(pub String);

impl From<&str> for CssIdent {
    fn from(value: &str) -> Self {
        CssIdent(value.to_string())
    }
}

impl Borrow<str> for CssIdent {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssIdent {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

/// Attribute value from an attribute selector
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CssString(pub String);

impl From<&str> for CssString {
    fn from(value: &str) -> Self {
        CssString(value.to_string())
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssString {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        cssparser::serialize_string(&self.0, dest)
    }
}

/// Non-tree-structural pseudo-classes: none are supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonTSPseudoClass {}

impl parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = SelectorImpl;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl ToCss for NonTSPseudoClass {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

/// Pseudo-elements: none are supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoElement {}

impl parser::PseudoElement for PseudoElement {
    type Impl = SelectorImpl;
}

impl ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}
