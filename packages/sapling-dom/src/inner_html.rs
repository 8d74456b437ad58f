//! Reading and replacing the serialized content of an element (`innerHTML`).
//!
//! Setting content first tries a strict, well-formed XML parse of the markup into a detached
//! fragment. Markup the strict parser rejects is handed to a lenient HTML parser, which builds a
//! scratch document around a wrapper element; the wrapper's children are then imported into the
//! target document. If both parsers give up the element is simply left empty.

use crate::diagnostics::{self, Diagnostic};
use crate::html::ParseError;
use crate::{BaseDocument, DocumentMutator, HtmlParserProvider};

/// The only property name understood by the generic accessors
pub const INNER_HTML: &str = "innerHTML";

/// Tag name of the element the lenient parser wraps markup in
pub const FRAGMENT_WRAPPER: &str = "htmlfragment";

/// Characters stripped from both ends of markup before parsing
const TRIMMED: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// One way of turning markup into detached nodes owned by the mutator's document.
trait FragmentStrategy {
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    fn name(&self) -> &'static str;

    fn parse(
        &self,
        provider: &dyn HtmlParserProvider,
        mutr: &mut DocumentMutator<'_>,
        markup: &str,
    ) -> Result<Vec<usize>, ParseError>;
}

/// Well-formed XML only.
struct StrictXml;

impl FragmentStrategy for StrictXml {
    fn name(&self) -> &'static str {
        "strict-xml"
    }

    fn parse(
        &self,
        provider: &dyn HtmlParserProvider,
        mutr: &mut DocumentMutator<'_>,
        markup: &str,
    ) -> Result<Vec<usize>, ParseError> {
        let fragment_id = provider.parse_xml_fragment(mutr, markup)?;
        let Some(fragment) = mutr.doc.get_node_mut(fragment_id) else {
            return Err(ParseError::Malformed {
                message: format!("fragment node {fragment_id} does not exist"),
            });
        };
        let child_ids = std::mem::take(&mut fragment.children);
        for &child_id in &child_ids {
            mutr.doc.nodes[child_id].parent = None;
        }
        mutr.remove_and_drop_node(fragment_id);
        Ok(child_ids)
    }
}

/// Tolerant whole-document HTML parse of the wrapped markup.
struct LenientHtml;

impl FragmentStrategy for LenientHtml {
    fn name(&self) -> &'static str {
        "lenient-html"
    }

    fn parse(
        &self,
        provider: &dyn HtmlParserProvider,
        mutr: &mut DocumentMutator<'_>,
        markup: &str,
    ) -> Result<Vec<usize>, ParseError> {
        let payload =
            format!("<meta charset=\"utf-8\"><{FRAGMENT_WRAPPER}>{markup}</{FRAGMENT_WRAPPER}>");
        let scratch = provider.parse_html_document(&payload)?;

        let wrapper_id = scratch
            .first_element_by_tag_name(FRAGMENT_WRAPPER)
            .ok_or(ParseError::MissingWrapper(FRAGMENT_WRAPPER))?;

        Ok(scratch.nodes[wrapper_id]
            .children
            .iter()
            .filter_map(|&child_id| mutr.import_node(&scratch, child_id))
            .collect())
    }
}

/// Tried in order; the first strategy to succeed wins.
const FRAGMENT_STRATEGIES: &[&dyn FragmentStrategy] = &[&StrictXml, &LenientHtml];

/// Whether markup should be treated as "no content".
///
/// A lone `"0"` also counts as blank, for compatibility with loosely-typed callers where
/// `"0"` is falsy.
fn is_blank_markup(markup: &str) -> bool {
    markup.is_empty() || markup == "0"
}

fn parse_with_strategies(
    provider: &dyn HtmlParserProvider,
    mutr: &mut DocumentMutator<'_>,
    markup: &str,
) -> Vec<usize> {
    for strategy in FRAGMENT_STRATEGIES {
        match strategy.parse(provider, mutr, markup) {
            Ok(node_ids) => return node_ids,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(strategy = strategy.name(), "innerHTML parse failed: {_err}");
            }
        }
    }
    Vec::new()
}

impl BaseDocument {
    /// The serialized children of the node, concatenated in order.
    ///
    /// Returns an empty string if the node does not exist or has no children.
    pub fn inner_html(&self, node_id: usize) -> String {
        let Some(node) = self.get_node(node_id) else {
            return String::new();
        };

        let mut inner = String::new();
        for &child_id in &node.children {
            self.write_outer_html(child_id, &mut inner);
        }
        inner
    }

    /// Generic property read. Only [`INNER_HTML`] is supported; any other name reports an
    /// [`UndefinedProperty`](crate::DiagnosticKind::UndefinedProperty) diagnostic pointing at
    /// the caller and returns `None`.
    #[track_caller]
    pub fn get_property(&self, node_id: usize, name: &str) -> Option<String> {
        if name == INNER_HTML {
            return Some(self.inner_html(node_id));
        }
        diagnostics::report(Diagnostic::undefined_property("get_property", name));
        None
    }
}

impl DocumentMutator<'_> {
    /// Replace the children of `node_id` with the nodes parsed from `html`.
    ///
    /// Never fails: markup that neither parser accepts leaves the element empty. Parse errors
    /// are captured while parsing and discarded afterwards.
    pub fn set_inner_html(&mut self, node_id: usize, html: &str) {
        if self.doc.get_node(node_id).is_none() {
            #[cfg(feature = "tracing")]
            tracing::debug!(node_id, "set_inner_html on a node that does not exist");
            return;
        }

        self.clear_children(node_id);

        let html = html.trim_matches(TRIMMED);
        if is_blank_markup(html) {
            return;
        }

        let _capture = diagnostics::set_error_capture_mode(true);

        let provider = self.doc.html_parser_provider.clone();
        let child_ids = parse_with_strategies(provider.as_ref(), self, html);
        self.append_children(node_id, &child_ids);
    }

    /// Generic property write. Only [`INNER_HTML`] is supported; any other name reports an
    /// [`UndefinedProperty`](crate::DiagnosticKind::UndefinedProperty) diagnostic pointing at
    /// the caller and does nothing.
    #[track_caller]
    pub fn set_property(&mut self, node_id: usize, name: &str, value: &str) {
        if name == INNER_HTML {
            self.set_inner_html(node_id, value);
            return;
        }
        diagnostics::report(Diagnostic::undefined_property("set_property", name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, is_capturing, set_error_capture_mode, take_captured};
    use crate::{DocumentConfig, LocalName, NodeData, QualName, ns, qual_name};
    use std::cell::Cell;
    use std::sync::Arc;

    /// Strictly accepts markup without tags as a single text node ("-" yields no nodes at all).
    /// Leniently turns the whole payload into one text node inside the wrapper element.
    #[derive(Default)]
    struct FakeProvider {
        lenient_fails: bool,
        strict_calls: Cell<usize>,
        lenient_calls: Cell<usize>,
    }

    impl HtmlParserProvider for FakeProvider {
        fn parse_xml_fragment(
            &self,
            mutr: &mut DocumentMutator<'_>,
            markup: &str,
        ) -> Result<usize, ParseError> {
            self.strict_calls.set(self.strict_calls.get() + 1);
            diagnostics::report(Diagnostic::parse("strict attempt"));
            if markup.contains('<') {
                return Err(ParseError::Malformed {
                    message: "tags not supported".to_string(),
                });
            }
            let fragment = mutr.create_fragment();
            if markup != "-" {
                let text = mutr.create_text_node(markup);
                mutr.append_children(fragment, &[text]);
            }
            Ok(fragment)
        }

        fn parse_html_document(&self, html: &str) -> Result<BaseDocument, ParseError> {
            self.lenient_calls.set(self.lenient_calls.get() + 1);
            if self.lenient_fails {
                return Err(ParseError::Unsupported);
            }
            let mut doc = BaseDocument::new(DocumentConfig::default());
            let mut mutr = doc.mutate();
            let wrapper_name = QualName::new(None, ns!(html), LocalName::from(FRAGMENT_WRAPPER));
            let wrapper = mutr.create_element(wrapper_name, vec![]);
            mutr.append_children(0, &[wrapper]);
            let text = mutr.create_text_node(&html.replace('<', "["));
            mutr.append_children(wrapper, &[text]);
            Ok(doc)
        }
    }

    fn doc_with(provider: Arc<FakeProvider>) -> (BaseDocument, usize) {
        let mut doc = BaseDocument::new(DocumentConfig {
            html_parser_provider: Some(provider as _),
        });
        let div = doc.mutate().create_element(qual_name!("div", html), vec![]);
        doc.append(0, &[div]);
        (doc, div)
    }

    #[test]
    fn strict_success_skips_lenient() {
        let provider = Arc::new(FakeProvider::default());
        let (mut doc, div) = doc_with(provider.clone());

        doc.mutate().set_inner_html(div, "  plain text \n");

        assert_eq!(doc.inner_html(div), "plain text");
        assert_eq!(provider.strict_calls.get(), 1);
        assert_eq!(provider.lenient_calls.get(), 0);
    }

    #[test]
    fn empty_strict_result_does_not_fall_back() {
        let provider = Arc::new(FakeProvider::default());
        let (mut doc, div) = doc_with(provider.clone());

        doc.mutate().set_inner_html(div, "-");

        assert_eq!(doc.inner_html(div), "");
        assert_eq!(provider.lenient_calls.get(), 0);
    }

    #[test]
    fn strict_failure_falls_back_and_imports() {
        let provider = Arc::new(FakeProvider::default());
        let (mut doc, div) = doc_with(provider.clone());

        doc.mutate().set_inner_html(div, "<p>x");

        assert_eq!(provider.lenient_calls.get(), 1);
        let children = &doc.get_node(div).unwrap().children;
        assert_eq!(children.len(), 1);
        let child = doc.get_node(children[0]).unwrap();
        assert_eq!(child.owner_document_id(), doc.id());
        assert!(matches!(child.data, NodeData::Text(_)));
    }

    #[test]
    fn total_failure_leaves_element_empty() {
        let provider = Arc::new(FakeProvider {
            lenient_fails: true,
            ..Default::default()
        });
        let (mut doc, div) = doc_with(provider.clone());
        doc.mutate().set_inner_html(div, "old");
        assert_eq!(doc.inner_html(div), "old");

        doc.mutate().set_inner_html(div, "<broken");

        assert_eq!(doc.inner_html(div), "");
        assert_eq!(provider.lenient_calls.get(), 1);
    }

    #[test]
    fn blank_markup_only_clears() {
        let provider = Arc::new(FakeProvider::default());
        let (mut doc, div) = doc_with(provider.clone());

        for blank in ["", "0", " \t0\r\n", "\0\x0B"] {
            doc.mutate().set_inner_html(div, "content");
            doc.mutate().set_inner_html(div, blank);
            assert_eq!(doc.inner_html(div), "", "{blank:?}");
        }
        assert_eq!(provider.strict_calls.get(), 4);
    }

    #[test]
    fn capture_mode_is_restored_and_diagnostics_discarded() {
        let provider = Arc::new(FakeProvider::default());
        let (mut doc, div) = doc_with(provider);

        assert!(!is_capturing());
        doc.mutate().set_inner_html(div, "<p>x");
        assert!(!is_capturing());

        let outer = set_error_capture_mode(true);
        doc.mutate().set_inner_html(div, "text");
        assert!(is_capturing());
        assert!(take_captured().is_empty());
        drop(outer);
        assert!(!is_capturing());
    }

    #[test]
    fn capture_mode_is_restored_when_the_parser_panics() {
        struct PanickingProvider;
        impl HtmlParserProvider for PanickingProvider {
            fn parse_xml_fragment(
                &self,
                _mutr: &mut DocumentMutator<'_>,
                _markup: &str,
            ) -> Result<usize, ParseError> {
                panic!("parser bug");
            }
            fn parse_html_document(&self, _html: &str) -> Result<BaseDocument, ParseError> {
                Err(ParseError::Unsupported)
            }
        }

        let mut doc = BaseDocument::new(DocumentConfig {
            html_parser_provider: Some(Arc::new(PanickingProvider) as _),
        });
        let div = doc.mutate().create_element(qual_name!("div", html), vec![]);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            doc.mutate().set_inner_html(div, "boom");
        }));

        assert!(result.is_err());
        assert!(!is_capturing());
    }

    #[test]
    fn missing_node_is_degenerate_not_an_error() {
        let provider = Arc::new(FakeProvider::default());
        let (mut doc, _div) = doc_with(provider.clone());

        assert_eq!(doc.inner_html(12345), "");
        doc.mutate().set_inner_html(12345, "text");
        assert_eq!(provider.strict_calls.get(), 0);
    }

    #[test]
    fn dummy_provider_only_clears() {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let div = doc.mutate().create_element(qual_name!("div", html), vec![]);
        let text = doc.create_text_node("before");
        doc.append(div, &[text]);

        doc.mutate().set_inner_html(div, "<p>after</p>");

        assert_eq!(doc.inner_html(div), "");
    }

    #[test]
    fn generic_accessors_only_know_inner_html() {
        let provider = Arc::new(FakeProvider::default());
        let (mut doc, div) = doc_with(provider);

        doc.mutate().set_property(div, INNER_HTML, "hello");
        assert_eq!(doc.get_property(div, INNER_HTML).as_deref(), Some("hello"));

        let guard = set_error_capture_mode(true);
        assert_eq!(doc.get_property(div, "outerHTML"), None);
        doc.mutate().set_property(div, "textContent", "ignored");
        let captured = take_captured();
        drop(guard);

        assert_eq!(doc.inner_html(div), "hello");
        assert_eq!(captured.len(), 2);
        assert!(
            captured
                .iter()
                .all(|d| d.kind == DiagnosticKind::UndefinedProperty)
        );
        assert_eq!(captured[0].location.map(|l| l.file()), Some(file!()));
        assert!(captured[1].message.contains("textContent"));
    }
}
