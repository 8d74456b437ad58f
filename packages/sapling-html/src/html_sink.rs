//! An implementation for Html5ever's sink trait, allowing us to parse HTML into a DOM.

use html5ever::ParseOpts;
use html5ever::tokenizer::TokenizerOpts;
use html5ever::tree_builder::TreeBuilderOpts;
use std::borrow::Cow;
use std::cell::{Ref, RefCell, RefMut};

use sapling_dom::diagnostics::{self, Diagnostic};
use sapling_dom::{Attribute, BaseDocument, DocumentMutator, ParseError};
use html5ever::{
    QualName,
    tendril::{StrTendril, TendrilSink},
    tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink},
};

/// Convert an html5ever Attribute which uses tendril for its value to a sapling Attribute
/// which uses String.
fn html5ever_to_sapling_attr(attr: html5ever::Attribute) -> Attribute {
    Attribute {
        name: attr.name,
        value: attr.value.to_string(),
    }
}

/// Whether the markup announces itself as XHTML (an xml declaration, or an XHTML doctype)
pub fn is_xhtml(markup: &str) -> bool {
    markup.starts_with("<?xml")
        || markup.starts_with("<!DOCTYPE")
            && markup
                .lines()
                .next()
                .is_some_and(|first_line| first_line.contains("XHTML") || first_line.contains("xhtml"))
}

pub struct DocumentHtmlParser<'doc> {
    document_mutator: RefCell<DocumentMutator<'doc>>,

    /// Errors that occurred during parsing.
    pub errors: RefCell<Vec<Cow<'static, str>>>,
}

impl<'doc> DocumentHtmlParser<'doc> {
    #[track_caller]
    /// Get a mutable borrow of the DocumentMutator
    fn mutr(&self) -> RefMut<'_, DocumentMutator<'doc>> {
        self.document_mutator.borrow_mut()
    }
}

impl DocumentHtmlParser<'_> {
    pub fn new(doc: &mut BaseDocument) -> DocumentHtmlParser<'_> {
        DocumentHtmlParser {
            document_mutator: RefCell::new(doc.mutate()),
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Parse a whole document into `doc`, as XHTML if it looks like XHTML and as HTML otherwise
    pub fn parse_into_doc<'d>(
        doc: &'d mut BaseDocument,
        markup: &str,
    ) -> Result<&'d mut BaseDocument, ParseError> {
        if is_xhtml(markup) {
            Self::parse_xhtml_into_doc(doc, markup)
        } else {
            Self::parse_html_into_doc(doc, markup)
        }
    }

    pub fn parse_html_into_doc<'d>(
        doc: &'d mut BaseDocument,
        html: &str,
    ) -> Result<&'d mut BaseDocument, ParseError> {
        let sink = Self::new(doc);

        let opts = ParseOpts {
            tokenizer: TokenizerOpts::default(),
            tree_builder: TreeBuilderOpts {
                exact_errors: false,
                scripting_enabled: false, // Enables parsing of <noscript> tags
                iframe_srcdoc: false,
                drop_doctype: true,
                quirks_mode: QuirksMode::NoQuirks,
            },
        };
        html5ever::parse_document(sink, opts)
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        Ok(doc)
    }

    pub fn parse_xhtml_into_doc<'d>(
        doc: &'d mut BaseDocument,
        xhtml: &str,
    ) -> Result<&'d mut BaseDocument, ParseError> {
        let sink = Self::new(doc);

        xml5ever::driver::parse_document(sink, Default::default())
            .from_utf8()
            .read_from(&mut xhtml.as_bytes())?;

        Ok(doc)
    }
}

impl<'b> TreeSink for DocumentHtmlParser<'b> {
    type Output = ();

    // we use the ID of the nodes in the tree as the handle
    type Handle = usize;

    type ElemName<'a>
        = Ref<'a, QualName>
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        drop(self.document_mutator.into_inner());
        for error in self.errors.into_inner() {
            diagnostics::report(Diagnostic::parse(error));
        }
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.errors.borrow_mut().push(msg);
    }

    fn get_document(&self) -> Self::Handle {
        0
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.document_mutator.borrow(), |docm| {
            docm.element_name(*target)
                .expect("TreeSink::elem_name called on a node which is not an element!")
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs.into_iter().map(html5ever_to_sapling_attr).collect();
        self.mutr().create_element(name, attrs)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.mutr().create_comment_node(&text)
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        self.mutr().create_pi_node(&target, &data)
    }

    fn append(&self, parent_id: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(id) => self.mutr().append_children(*parent_id, &[id]),
            // If content to append is text, first attempt to append it to the last child of parent.
            // Else create a new text node and append it to the parent
            NodeOrText::AppendText(text) => {
                let last_child_id = self.mutr().last_child_id(*parent_id);
                let has_appended = if let Some(id) = last_child_id {
                    self.mutr().append_text_to_node(id, &text).is_ok()
                } else {
                    false
                };
                if !has_appended {
                    let new_child_id = self.mutr().create_text_node(&text);
                    self.mutr().append_children(*parent_id, &[new_child_id]);
                }
            }
        }
    }

    // Note: The tree builder promises we won't have a text node after the insertion point.
    // https://github.com/servo/html5ever/blob/main/rcdom/lib.rs#L338
    fn append_before_sibling(&self, sibling_id: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        match new_node {
            NodeOrText::AppendNode(id) => self.mutr().insert_nodes_before(*sibling_id, &[id]),
            // If content to append is text, first attempt to append it to the node before sibling_node
            // Else create a new text node and insert it before sibling_node
            NodeOrText::AppendText(text) => {
                let previous_sibling_id = self.mutr().previous_sibling_id(*sibling_id);
                let has_appended = if let Some(id) = previous_sibling_id {
                    self.mutr().append_text_to_node(id, &text).is_ok()
                } else {
                    false
                };
                if !has_appended {
                    let new_child_id = self.mutr().create_text_node(&text);
                    self.mutr()
                        .insert_nodes_before(*sibling_id, &[new_child_id]);
                }
            }
        };
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.mutr().node_has_parent(*element) {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Ignore. Serialization never emits a DOCTYPE.
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are parsed as regular children of the <template> element.
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {
        // Ignore. Quirks mode only affects styling.
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        let attrs = attrs.into_iter().map(html5ever_to_sapling_attr).collect();
        self.mutr().add_attrs_if_missing(*target, attrs);
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.mutr().remove_node(*target);
    }

    fn reparent_children(&self, old_parent_id: &Self::Handle, new_parent_id: &Self::Handle) {
        self.mutr()
            .reparent_children(*old_parent_id, *new_parent_id);
    }
}
