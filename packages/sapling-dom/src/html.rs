use crate::{BaseDocument, DocumentMutator};

/// Why a [`HtmlParserProvider`] could not produce nodes from some markup.
///
/// These never escape [`DocumentMutator::set_inner_html`]: a failed strict parse falls back to
/// the lenient parser, and a failed lenient parse leaves the element empty.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no html parser is available")]
    Unsupported,
    #[error("markup is not well-formed: {message}")]
    Malformed { message: String },
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),
    #[error("wrapper element <{0}> not found in parsed document")]
    MissingWrapper(&'static str),
}

/// The parsing engine used by [`DocumentMutator::set_inner_html`].
pub trait HtmlParserProvider {
    /// Strictly parse `markup` as well-formed XML content.
    ///
    /// On success, returns the id of a detached `DocumentFragment` node created in the
    /// mutator's document holding the parsed nodes. On failure nothing must be left behind
    /// in the document.
    fn parse_xml_fragment(
        &self,
        mutr: &mut DocumentMutator<'_>,
        markup: &str,
    ) -> Result<usize, ParseError>;

    /// Leniently parse `html` as a whole HTML document into a new, standalone document.
    fn parse_html_document(&self, html: &str) -> Result<BaseDocument, ParseError>;
}

pub struct DummyHtmlParserProvider;
impl HtmlParserProvider for DummyHtmlParserProvider {
    fn parse_xml_fragment(
        &self,
        mutr: &mut DocumentMutator<'_>,
        markup: &str,
    ) -> Result<usize, ParseError> {
        let _ = mutr;
        let _ = markup;
        Err(ParseError::Unsupported)
    }

    fn parse_html_document(&self, html: &str) -> Result<BaseDocument, ParseError> {
        let _ = html;
        Err(ParseError::Unsupported)
    }
}
