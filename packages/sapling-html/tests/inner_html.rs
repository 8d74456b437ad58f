//! End-to-end `innerHTML` behaviour with the real parsers.

use sapling_dom::diagnostics::{self, DiagnosticKind};
use sapling_dom::{DocumentConfig, INNER_HTML, NodeData};
use sapling_html::HtmlDocument;

fn document_with_target() -> (HtmlDocument, usize) {
    let doc = HtmlDocument::from_html(
        "<!DOCTYPE html><html><body><div id=\"target\">initial</div></body></html>",
        DocumentConfig::default(),
    );
    let target = doc.get_element_by_id("target").unwrap();
    (doc, target)
}

#[test]
fn reads_existing_content() {
    let (doc, target) = document_with_target();
    assert_eq!(doc.inner_html(target), "initial");
}

#[test]
fn well_formed_markup_round_trips() {
    let (mut doc, target) = document_with_target();
    let markup = "<a href=\"http://fivefilters.org\">FiveFilters.org</a>";

    doc.mutate().set_inner_html(target, markup);

    assert_eq!(doc.inner_html(target), markup);
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    let (mut doc, target) = document_with_target();

    doc.mutate().set_inner_html(target, "\n\t <i>x</i> \r\n");

    assert_eq!(doc.inner_html(target), "<i>x</i>");
}

#[test]
fn blank_markup_clears_the_element() {
    let (mut doc, target) = document_with_target();

    doc.mutate().set_inner_html(target, "");
    assert_eq!(doc.inner_html(target), "");

    doc.mutate().set_inner_html(target, "<b>back</b>");
    doc.mutate().set_inner_html(target, "0");
    assert_eq!(doc.inner_html(target), "");
    assert!(doc.get_node(target).unwrap().children.is_empty());
}

#[test]
fn malformed_markup_falls_back_to_html_parsing() {
    let (mut doc, target) = document_with_target();

    doc.mutate().set_inner_html(target, "<p>Para 1<p>Para 2");

    assert_eq!(doc.inner_html(target), "<p>Para 1</p><p>Para 2</p>");
}

#[test]
fn html_entities_fall_back_to_html_parsing() {
    let (mut doc, target) = document_with_target();

    doc.mutate().set_inner_html(target, "a&nbsp;b");

    assert_eq!(doc.inner_html(target), "a\u{a0}b");
}

#[test]
fn setting_twice_replaces_instead_of_appending() {
    let (mut doc, target) = document_with_target();

    doc.mutate().set_inner_html(target, "<a>x</a>");
    doc.mutate().set_inner_html(target, "<b>y</b>");

    assert_eq!(doc.inner_html(target), "<b>y</b>");
}

#[test]
fn parsed_nodes_belong_to_the_target_document() {
    let (mut doc, target) = document_with_target();

    // One strict and one lenient parse
    for markup in ["<span>ok</span>", "<span>unclosed"] {
        doc.mutate().set_inner_html(target, markup);

        let children = doc.get_node(target).unwrap().children.clone();
        assert!(!children.is_empty());
        for child in children {
            let node = doc.get_node(child).unwrap();
            assert_eq!(node.owner_document_id(), doc.id());
            assert_eq!(node.parent, Some(target));
        }
    }
    assert!(doc.first_element_by_tag_name("htmlfragment").is_none());
}

#[test]
fn parsed_ids_are_reachable() {
    let (mut doc, target) = document_with_target();

    doc.mutate()
        .set_inner_html(target, "<section id=\"inner\"><p>deep</p></section>");
    let inner = doc.get_element_by_id("inner").unwrap();
    assert_eq!(doc.text_content(inner), "deep");

    doc.mutate().set_inner_html(target, "0");
    assert_eq!(doc.get_element_by_id("inner"), None);
}

#[test]
fn parse_errors_do_not_leak_out() {
    let (mut doc, target) = document_with_target();
    let guard = diagnostics::set_error_capture_mode(true);

    doc.mutate().set_inner_html(target, "<p>broken");

    assert!(diagnostics::is_capturing());
    assert!(diagnostics::take_captured().is_empty());
    drop(guard);
    assert!(!diagnostics::is_capturing());
}

#[test]
fn generic_accessors() {
    let (mut doc, target) = document_with_target();

    doc.mutate().set_property(target, INNER_HTML, "<em>hi</em>");
    assert_eq!(
        doc.get_property(target, INNER_HTML).as_deref(),
        Some("<em>hi</em>")
    );

    let guard = diagnostics::set_error_capture_mode(true);
    assert_eq!(doc.get_property(target, "outerHTML"), None);
    let captured = diagnostics::take_captured();
    drop(guard);

    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].kind, DiagnosticKind::UndefinedProperty);
    assert!(captured[0].to_string().contains("outerHTML"));
    assert!(captured[0].to_string().contains(file!()));
}

#[test]
fn comments_survive_strict_parsing() {
    let (mut doc, target) = document_with_target();

    doc.mutate().set_inner_html(target, "<!-- keep --><br/>");

    let first = doc.get_node(target).unwrap().children[0];
    assert!(matches!(
        &doc.get_node(first).unwrap().data,
        NodeData::Comment { contents } if contents == " keep "
    ));
    assert_eq!(doc.inner_html(target), "<!-- keep --><br/>");
}

#[test]
fn deeply_nested_markup_is_handled_without_recursion() {
    let depth = 20_000;
    let (mut doc, target) = document_with_target();

    doc.mutate().set_inner_html(target, &"<div>".repeat(depth));
    let expected = format!(
        "{}<div/>{}",
        "<div>".repeat(depth - 1),
        "</div>".repeat(depth - 1)
    );
    assert_eq!(doc.inner_html(target), expected);

    let well_formed = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
    doc.mutate().set_inner_html(target, &well_formed);
    assert_eq!(doc.inner_html(target), well_formed);

    doc.mutate().set_inner_html(target, "");
    assert!(doc.get_node(target).unwrap().children.is_empty());
}

#[test]
fn namespaced_attributes_round_trip() {
    let (mut doc, target) = document_with_target();
    let markup = "<a xmlns=\"u\" xmlns:q=\"u\" q:at=\"1\"/>";

    doc.mutate().set_inner_html(target, markup);

    assert_eq!(doc.inner_html(target), markup);
}
