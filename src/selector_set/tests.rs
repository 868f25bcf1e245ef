use super::index::IndexKind;
use super::{EntryId, SelectorSet};
use crate::dom::{Document, NodeId};

struct Fixture {
    doc: Document,
    container: NodeId,
    save: NodeId,
    cancel: NodeId,
    note: NodeId,
}

fn fixture() -> Fixture {
    let mut doc = Document::new();
    let html = doc.element(NodeId::DOCUMENT, "html", &[]).unwrap();
    let container = doc
        .element(html, "div", &[("id", "toolbar"), ("class", "panel")])
        .unwrap();
    let save = doc
        .element(container, "button", &[("id", "save"), ("class", "primary")])
        .unwrap();
    let cancel = doc
        .element(container, "button", &[("class", "secondary")])
        .unwrap();
    let note = doc
        .element(container, "p", &[("class", "x y")])
        .unwrap();
    Fixture {
        doc,
        container,
        save,
        cancel,
        note,
    }
}

fn matched_payloads<'a>(set: &'a SelectorSet<&'static str>, f: &Fixture, node: NodeId) -> Vec<&'static str> {
    set.matches(&f.doc, &node)
        .into_iter()
        .map(|entry| *entry.payload())
        .collect()
}

#[test]
fn test_add_ignores_empty_selector() {
    let mut set = SelectorSet::new();
    assert_eq!(set.add("", "nothing"), None);
    assert!(set.is_empty());
    assert!(set.active_indexes().is_empty());
}

#[test]
fn test_ids_are_monotonic_and_indexes_lazy() {
    let mut set = SelectorSet::new();
    assert_eq!(set.add("#save", "a"), Some(EntryId(0)));
    assert_eq!(set.active_indexes(), vec![IndexKind::Id]);
    assert_eq!(set.add(".primary", "b"), Some(EntryId(1)));
    assert_eq!(set.add("button", "c"), Some(EntryId(2)));
    assert_eq!(
        set.active_indexes(),
        vec![IndexKind::Id, IndexKind::Class, IndexKind::Tag]
    );
    assert_eq!(set.len(), 3);
    assert_eq!(set.selectors(), ["#save", ".primary", "button"]);

    set.remove("button", None);
    assert_eq!(set.add("button", "d"), Some(EntryId(3)));
}

#[test]
fn test_matches_confirms_structurally() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("button.primary", "primary-button");
    set.add("#toolbar > button", "toolbar-button");
    set.add("p button", "button-in-paragraph");
    set.add(".panel", "panel");

    assert_eq!(
        matched_payloads(&set, &f, f.save),
        vec!["primary-button", "toolbar-button"]
    );
    assert_eq!(matched_payloads(&set, &f, f.cancel), vec!["toolbar-button"]);
    assert_eq!(matched_payloads(&set, &f, f.container), vec!["panel"]);
    assert!(matched_payloads(&set, &f, f.note).is_empty());
}

#[test]
fn test_duplicate_selectors_are_distinct_entries() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("#save", "first");
    set.add("#save", "second");

    let matched = set.matches(&f.doc, &f.save);
    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].id(), EntryId(0));
    assert_eq!(*matched[0].payload(), "first");
    assert_eq!(*matched[1].payload(), "second");
}

#[test]
fn test_results_follow_registration_order_across_indexes() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("button", "tag");
    set.add("#save", "id");
    set.add(".primary", "class");
    set.add("[id=save]", "universal");

    assert_eq!(
        matched_payloads(&set, &f, f.save),
        vec!["tag", "id", "class", "universal"]
    );
}

#[test]
fn test_alternatives_match_once() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("#save, .primary, button", "any");

    assert_eq!(matched_payloads(&set, &f, f.save), vec!["any"]);
    assert_eq!(matched_payloads(&set, &f, f.cancel), vec!["any"]);
}

#[test]
fn test_compound_selector_files_one_pair() {
    let mut set = SelectorSet::new();
    let id = set.add(".x.y", "xy").unwrap();

    let snapshot = set.snapshot();
    assert_eq!(snapshot.indexes.len(), 1);
    assert_eq!(snapshot.indexes[0].name, IndexKind::Class);
    assert_eq!(snapshot.indexes[0].keys.len(), 1);
    assert_eq!(snapshot.indexes[0].keys["x"], vec![id]);
}

#[test]
fn test_remove_by_text_removes_all_payloads() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("#save", "first");
    set.add(".primary", "other");
    set.add("#save", "second");

    assert_eq!(set.remove("#save", None), 2);
    assert_eq!(set.len(), 1);
    assert_eq!(set.selectors(), [".primary"]);
    assert_eq!(matched_payloads(&set, &f, f.save), vec!["other"]);
}

#[test]
fn test_remove_with_payload_filter() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("#save", "first");
    set.add("#save", "second");

    assert_eq!(set.remove("#save", Some(&"second")), 1);
    assert_eq!(matched_payloads(&set, &f, f.save), vec!["first"]);
    assert_eq!(set.selectors(), ["#save"]);
}

#[test]
fn test_remove_missing_is_noop() {
    let mut set = SelectorSet::new();
    set.add("#save", "first");

    assert_eq!(set.remove("#other", None), 0);
    assert_eq!(set.remove("#save", Some(&"nope")), 0);
    assert_eq!(set.remove("", None), 0);
    assert_eq!(set.remove("#save ", None), 0);
    assert_eq!(set.len(), 1);
}

#[test]
fn test_remove_clears_every_bucket() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("#save, p", "multi");

    assert_eq!(set.remove("#save, p", None), 1);
    assert!(set.is_empty());
    assert!(set.snapshot().indexes.iter().all(|index| index.keys.is_empty()));
    assert!(matched_payloads(&set, &f, f.note).is_empty());
}

#[test]
fn test_escaped_names_are_indexed_by_their_value() {
    let mut doc = Document::new();
    let node = doc
        .element(NodeId::DOCUMENT, "div", &[("id", "a:b"), ("class", "x.y")])
        .unwrap();
    let mut set = SelectorSet::new();
    set.add("#a\\:b", "id");
    set.add(".x\\.y", "class");
    set.add(".x", "plain-class");

    let matched: Vec<&str> = set
        .matches(&doc, &node)
        .into_iter()
        .map(|entry| *entry.payload())
        .collect();
    assert_eq!(matched, vec!["id", "class"]);
    assert_eq!(set.snapshot().indexes[0].keys["a:b"], vec![EntryId(0)]);
}

#[test]
fn test_malformed_selector_never_matches() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("button:hover", "pseudo");
    set.add("!!", "garbage");
    set.add("#save", "ok");

    assert_eq!(matched_payloads(&set, &f, f.save), vec!["ok"]);
    assert_eq!(set.len(), 3);
}

#[test]
fn test_query_all_groups_by_selector() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("button", "buttons");
    set.add("#save", "save");
    set.add(".missing", "none");

    let results = set.query_all(&f.doc, &f.container);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, EntryId(0));
    assert_eq!(results[0].selector, "button");
    assert_eq!(results[0].elements, vec![f.save, f.cancel]);
    assert_eq!(*results[1].payload, "save");
    assert_eq!(results[1].elements, vec![f.save]);
}

#[test]
fn test_query_all_survives_malformed_selector() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("p", "paragraphs");
    set.add("div >", "broken");

    let results = set.query_all(&f.doc, &NodeId::DOCUMENT);
    assert_eq!(results.len(), 1);
    assert_eq!(*results[0].payload, "paragraphs");
    assert_eq!(results[0].elements, vec![f.note]);
}

#[test]
fn test_query_all_fallback_keeps_document_order() {
    let f = fixture();
    let mut set = SelectorSet::new();
    set.add("p", "paragraph");
    set.add("p, button", "controls");
    set.add("div >", "broken");

    let results = set.query_all(&f.doc, &NodeId::DOCUMENT);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].elements, vec![f.note]);
    assert_eq!(*results[1].payload, "controls");
    assert_eq!(results[1].elements, vec![f.save, f.cancel, f.note]);
}

#[test]
fn test_query_all_empty_set() {
    let f = fixture();
    let set: SelectorSet<()> = SelectorSet::new();
    assert!(set.query_all(&f.doc, &NodeId::DOCUMENT).is_empty());
}
