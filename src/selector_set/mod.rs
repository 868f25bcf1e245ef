//! Selector-indexed matching engine
//!
//! A [`SelectorSet`] stores selector strings with opaque payloads and answers
//! "which of these selectors does this node satisfy" without testing every
//! stored selector:
//!
//! 1. Each selector is classified into (index, key) pairs when it is added
//!    (see [`classifier`]) and filed into lazily created per-index buckets.
//! 2. A node is looked up by its own keys (id, classes, tag, universal), which
//!    narrows the candidates to a few buckets.
//! 3. Every candidate is confirmed with the platform's structural test.
//!
//! Results are always reported in registration order.

#[cfg(test)]
mod tests;

pub mod classifier;
pub mod index;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::dom::Dom;
use classifier::classify;
use index::IndexKind;

/// Identity of a registered selector, unique within its set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

/// A registered selector and its payload
#[derive(Debug, Clone)]
pub struct Entry<P> {
    id: EntryId,
    selector: String,
    payload: P,
}

impl<P> Entry<P> {
    /// Registration identity
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Selector text exactly as it was added
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Payload stored with the selector
    pub fn payload(&self) -> &P {
        &self.payload
    }
}

/// One index kind materialized as key -> entry ids
#[derive(Debug, Clone)]
struct ActiveIndex {
    kind: IndexKind,
    buckets: HashMap<String, Vec<EntryId>>,
}

/// Result of [`SelectorSet::query_all`]: one registered selector and every
/// node under the root it matched
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMatch<'a, P, N> {
    pub id: EntryId,
    pub selector: &'a str,
    pub payload: &'a P,
    pub elements: Vec<N>,
}

/// Serializable view of a selector set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorSetSnapshot {
    pub size: usize,
    pub selectors: Vec<String>,
    pub entries: Vec<EntrySnapshot>,
    pub indexes: Vec<IndexSnapshot>,
}

/// One entry in a [`SelectorSetSnapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySnapshot {
    pub id: EntryId,
    pub selector: String,
}

/// One active index in a [`SelectorSetSnapshot`], keys sorted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSnapshot {
    pub name: IndexKind,
    pub keys: BTreeMap<String, Vec<EntryId>>,
}

/// Reverse selector matcher
#[derive(Debug, Clone)]
pub struct SelectorSet<P> {
    next_id: u64,
    /// Raw selector texts in registration order, duplicates kept
    selectors: Vec<String>,
    entries: BTreeMap<EntryId, Entry<P>>,
    indexes: Vec<ActiveIndex>,
    log_universal_fallback: bool,
}

impl<P> Default for SelectorSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> SelectorSet<P> {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            next_id: 0,
            selectors: Vec::new(),
            entries: BTreeMap::new(),
            indexes: Vec::new(),
            log_universal_fallback: true,
        }
    }

    /// Toggle the debug line emitted when a selector can only be filed under
    /// the universal index
    pub fn with_universal_logging(mut self, enabled: bool) -> Self {
        self.log_universal_fallback = enabled;
        self
    }

    /// Number of registered selectors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no selector is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw selector texts, duplicates kept
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = &Entry<P>> {
        self.entries.values()
    }

    /// Entry registered under `id`, if it is still present
    pub fn get(&self, id: EntryId) -> Option<&Entry<P>> {
        self.entries.get(&id)
    }

    /// Index kinds that have been materialized, in creation order
    pub fn active_indexes(&self) -> Vec<IndexKind> {
        self.indexes.iter().map(|index| index.kind).collect()
    }

    /// Register `selector` with `payload`. Empty selectors are ignored.
    pub fn add(&mut self, selector: &str, payload: P) -> Option<EntryId> {
        if selector.is_empty() {
            return None;
        }

        let id = EntryId(self.next_id);
        self.next_id += 1;

        for contribution in classify(selector) {
            if contribution.kind == IndexKind::Universal && self.log_universal_fallback {
                log::debug!("selector `{selector}` is filed under the universal index");
            }

            let position = match self
                .indexes
                .iter()
                .position(|index| index.kind == contribution.kind)
            {
                Some(position) => position,
                None => {
                    self.indexes.push(ActiveIndex {
                        kind: contribution.kind,
                        buckets: HashMap::new(),
                    });
                    self.indexes.len() - 1
                }
            };
            self.indexes[position]
                .buckets
                .entry(contribution.key)
                .or_default()
                .push(id);
        }

        self.entries.insert(
            id,
            Entry {
                id,
                selector: selector.to_string(),
                payload,
            },
        );
        self.selectors.push(selector.to_string());
        log::trace!("registered selector `{selector}` as entry {}", id.0);
        Some(id)
    }

    /// Registered entries `node` satisfies, in registration order
    pub fn matches<D: Dom>(&self, dom: &D, node: &D::Node) -> Vec<&Entry<P>> {
        let mut seen = HashSet::new();
        let mut matched = Vec::new();

        for index in &self.indexes {
            for key in index.kind.extract_keys(dom, node) {
                let Some(bucket) = index.buckets.get(&key) else {
                    continue;
                };
                for id in bucket {
                    if !seen.insert(*id) {
                        continue;
                    }
                    let Some(entry) = self.entries.get(id) else {
                        continue;
                    };
                    match dom.matches_selector(node, &entry.selector) {
                        Ok(true) => matched.push(entry),
                        Ok(false) => {}
                        Err(err) => {
                            log::trace!("selector `{}` never matches: {err}", entry.selector)
                        }
                    }
                }
            }
        }

        matched.sort_by_key(|entry| entry.id);
        matched
    }

    /// Every registered selector matched under `root`, with its nodes, in
    /// registration order
    pub fn query_all<D: Dom>(&self, dom: &D, root: &D::Node) -> Vec<QueryMatch<'_, P, D::Node>> {
        if self.selectors.is_empty() {
            return Vec::new();
        }

        let candidates = match dom.query_selector_all(root, &self.selectors.join(", ")) {
            Ok(candidates) => candidates,
            Err(err) => {
                log::debug!("combined query failed ({err}); querying selectors one by one");
                self.query_each(dom, root)
            }
        };

        let mut groups: Vec<QueryMatch<'_, P, D::Node>> = Vec::new();
        let mut positions: HashMap<EntryId, usize> = HashMap::new();
        for node in candidates {
            for entry in self.matches(dom, &node) {
                let position = *positions.entry(entry.id).or_insert_with(|| {
                    groups.push(QueryMatch {
                        id: entry.id,
                        selector: &entry.selector,
                        payload: &entry.payload,
                        elements: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[position].elements.push(node.clone());
            }
        }

        groups.sort_by_key(|group| group.id);
        groups
    }

    /// Query the raw selectors one at a time in registration order, then
    /// re-query the ones that parsed so candidates come back in document order
    fn query_each<D: Dom>(&self, dom: &D, root: &D::Node) -> Vec<D::Node> {
        let mut tried: HashSet<&str> = HashSet::new();
        let mut valid: Vec<&str> = Vec::new();
        let mut merged: Vec<D::Node> = Vec::new();
        for selector in &self.selectors {
            if !tried.insert(selector.as_str()) {
                continue;
            }
            match dom.query_selector_all(root, selector) {
                Ok(nodes) => {
                    valid.push(selector);
                    for node in nodes {
                        if !merged.contains(&node) {
                            merged.push(node);
                        }
                    }
                }
                Err(err) => log::trace!("skipping selector `{selector}`: {err}"),
            }
        }

        if valid.len() > 1 {
            match dom.query_selector_all(root, &valid.join(", ")) {
                Ok(nodes) => return nodes,
                Err(err) => log::debug!("re-query of valid selectors failed: {err}"),
            }
        }
        merged
    }

    /// Serializable view for diagnostics
    pub fn snapshot(&self) -> SelectorSetSnapshot {
        SelectorSetSnapshot {
            size: self.len(),
            selectors: self.selectors.clone(),
            entries: self
                .entries
                .values()
                .map(|entry| EntrySnapshot {
                    id: entry.id,
                    selector: entry.selector.clone(),
                })
                .collect(),
            indexes: self
                .indexes
                .iter()
                .map(|index| IndexSnapshot {
                    name: index.kind,
                    keys: index
                        .buckets
                        .iter()
                        .map(|(key, ids)| (key.clone(), ids.clone()))
                        .collect(),
                })
                .collect(),
        }
    }
}

impl<P: PartialEq> SelectorSet<P> {
    /// Remove every entry registered with exactly `selector`, restricted to
    /// entries whose payload equals `payload` when one is given.
    ///
    /// Returns the number of entries removed.
    pub fn remove(&mut self, selector: &str, payload: Option<&P>) -> usize {
        if selector.is_empty() {
            return 0;
        }

        let entries = &self.entries;
        let is_target = |id: &EntryId| {
            entries.get(id).is_some_and(|entry| {
                entry.selector == selector && payload.map_or(true, |p| entry.payload == *p)
            })
        };

        let mut removed = BTreeSet::new();
        for contribution in classify(selector) {
            let Some(index) = self
                .indexes
                .iter_mut()
                .find(|index| index.kind == contribution.kind)
            else {
                continue;
            };
            let Some(bucket) = index.buckets.get_mut(&contribution.key) else {
                continue;
            };
            bucket.retain(|id| {
                if is_target(id) {
                    removed.insert(*id);
                    false
                } else {
                    true
                }
            });
            if bucket.is_empty() {
                index.buckets.remove(&contribution.key);
            }
        }

        for id in &removed {
            self.entries.remove(id);
        }
        if !removed.is_empty() {
            self.selectors = self
                .entries
                .values()
                .map(|entry| entry.selector.clone())
                .collect();
            log::trace!("removed {} entries for selector `{selector}`", removed.len());
        }
        removed.len()
    }
}
