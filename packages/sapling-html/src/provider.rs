//! The [`HtmlParserProvider`] backing `set_inner_html`.
//!
//! Strict fragments are parsed with roxmltree, which rejects anything that is not well-formed
//! XML. Lenient documents go through html5ever via [`DocumentHtmlParser`].

use roxmltree::NodeType;
use sapling_dom::diagnostics::{self, Diagnostic};
use sapling_dom::{
    Attribute, BaseDocument, DocumentConfig, DocumentMutator, HtmlParserProvider, LocalName,
    Namespace, ParseError, Prefix, QualName, local_name, ns,
};

use crate::DocumentHtmlParser;

/// Root element strict markup is wrapped in so that it may contain several top-level nodes
const XML_FRAGMENT_ROOT: &str = "sapling-fragment-root";

/// Deepest element nesting the strict parser accepts (libxml's default)
pub const MAX_XML_DEPTH: usize = 256;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlProvider;

impl HtmlParserProvider for HtmlProvider {
    fn parse_xml_fragment(
        &self,
        mutr: &mut DocumentMutator<'_>,
        markup: &str,
    ) -> Result<usize, ParseError> {
        if exceeds_nesting_depth(markup, MAX_XML_DEPTH) {
            return Err(malformed(format!(
                "elements nested deeper than {MAX_XML_DEPTH} levels"
            )));
        }

        let wrapped = format!("<{XML_FRAGMENT_ROOT}>{markup}</{XML_FRAGMENT_ROOT}>");
        let xml = roxmltree::Document::parse(&wrapped).map_err(|err| malformed(err.to_string()))?;

        let fragment_id = mutr.create_fragment();
        let mut stack: Vec<(roxmltree::Node<'_, '_>, usize)> = xml
            .root_element()
            .children()
            .rev()
            .map(|child| (child, fragment_id))
            .collect();
        while let Some((node, parent_id)) = stack.pop() {
            let Some(node_id) = create_xml_node(mutr, node, &wrapped) else {
                continue;
            };
            mutr.append_children(parent_id, &[node_id]);
            stack.extend(node.children().rev().map(|child| (child, node_id)));
        }
        Ok(fragment_id)
    }

    fn parse_html_document(&self, html: &str) -> Result<BaseDocument, ParseError> {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        DocumentHtmlParser::parse_html_into_doc(&mut doc, html)?;
        Ok(doc)
    }
}

fn malformed(message: String) -> ParseError {
    diagnostics::report(Diagnostic::parse(message.clone()));
    ParseError::Malformed { message }
}

/// Cheap scan for element nesting beyond `limit`, run before handing markup to roxmltree.
///
/// Comments, CDATA sections and processing instructions are skipped; quoted attribute
/// values may contain `>`.
fn exceeds_nesting_depth(markup: &str, limit: usize) -> bool {
    let bytes = markup.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0;

    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'<') {
        let start = pos + offset;
        let rest = &markup[start..];

        let skip_to = |terminator: &str| {
            rest.find(terminator)
                .map_or(bytes.len(), |end| start + end + terminator.len())
        };
        if rest.starts_with("<!--") {
            pos = skip_to("-->");
            continue;
        }
        if rest.starts_with("<![CDATA[") {
            pos = skip_to("]]>");
            continue;
        }
        if rest.starts_with("<?") {
            pos = skip_to("?>");
            continue;
        }

        let end = tag_end(bytes, start);
        let self_closing = end < bytes.len() && bytes[end - 1] == b'/';
        if rest.starts_with("</") {
            depth = depth.saturating_sub(1);
        } else if !rest.starts_with("<!") && !self_closing {
            depth += 1;
            if depth > limit {
                return true;
            }
        }
        pos = (end + 1).min(bytes.len());
    }
    false
}

/// Index of the `>` closing the tag opened at `start`, or the input length if there is none
fn tag_end(bytes: &[u8], start: usize) -> usize {
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate().skip(start + 1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return i,
            None => {}
        }
    }
    bytes.len()
}

/// Copy a single roxmltree node (without its children) into the mutator's document.
fn create_xml_node(
    mutr: &mut DocumentMutator<'_>,
    node: roxmltree::Node<'_, '_>,
    input: &str,
) -> Option<usize> {
    match node.node_type() {
        NodeType::Root => None,
        NodeType::Text => Some(mutr.create_text_node(node.text().unwrap_or_default())),
        NodeType::Comment => Some(mutr.create_comment_node(node.text().unwrap_or_default())),
        NodeType::PI => {
            let pi = node.pi()?;
            Some(mutr.create_pi_node(pi.target, pi.value.unwrap_or_default()))
        }
        NodeType::Element => {
            let tag = node.tag_name();
            let name = qualified(element_prefix(input, node), tag.namespace(), tag.name());

            let mut attrs = namespace_declarations(node);
            attrs.extend(node.attributes().map(|attr| {
                let prefix = attr
                    .namespace()
                    .and_then(|uri| attribute_prefix(node, uri));
                Attribute::new(qualified(prefix, attr.namespace(), attr.name()), attr.value())
            }));

            Some(mutr.create_element(name, attrs))
        }
    }
}

fn qualified(prefix: Option<Prefix>, namespace: Option<&str>, local: &str) -> QualName {
    QualName {
        prefix,
        ns: namespace.map(Namespace::from).unwrap_or(ns!()),
        local: LocalName::from(local),
    }
}

/// The prefix an element was written with, read back from its start tag
fn element_prefix(input: &str, node: roxmltree::Node<'_, '_>) -> Option<Prefix> {
    let tag = input.get(node.range().start..)?.strip_prefix('<')?;
    let name_end = tag.find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')?;
    let (prefix, _) = tag[..name_end].split_once(':')?;
    Some(Prefix::from(prefix))
}

/// A non-empty prefix bound to `uri` at this element. Unprefixed attributes are never in the
/// default namespace, so a default binding of the same uri must not be picked.
fn attribute_prefix(node: roxmltree::Node<'_, '_>, uri: &str) -> Option<Prefix> {
    if uri == XML_NAMESPACE {
        return Some(Prefix::from("xml"));
    }
    node.namespaces()
        .find(|ns| ns.uri() == uri && ns.name().is_some())
        .and_then(|ns| ns.name())
        .map(Prefix::from)
}

/// `xmlns` attributes for the namespaces that come into scope at this element
fn namespace_declarations(node: roxmltree::Node<'_, '_>) -> Vec<Attribute> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| {
            let name = match ns.name() {
                Some(prefix) => QualName {
                    prefix: Some(Prefix::from("xmlns")),
                    ns: ns!(xmlns),
                    local: LocalName::from(prefix),
                },
                None => QualName {
                    prefix: None,
                    ns: ns!(xmlns),
                    local: local_name!("xmlns"),
                },
            };
            Attribute::new(name, ns.uri())
        })
        .collect()
}
