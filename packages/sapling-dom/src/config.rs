use crate::HtmlParserProvider;
use std::sync::Arc;

/// Options used when constructing a [`BaseDocument`](crate::BaseDocument)
#[derive(Default, Clone)]
pub struct DocumentConfig {
    /// HTML parser provider. Used to parse markup for `set_inner_html`.
    ///
    /// Falls back to [`DummyHtmlParserProvider`](crate::DummyHtmlParserProvider), which rejects
    /// all markup, so `set_inner_html` only clears the element.
    pub html_parser_provider: Option<Arc<dyn HtmlParserProvider>>,
}
