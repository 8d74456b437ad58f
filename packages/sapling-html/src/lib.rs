//! HTML and XML parsing for Sapling.
//!
//! Provides [`HtmlProvider`], the parser behind `set_inner_html` (roxmltree for the strict
//! well-formed-XML attempt, html5ever for the lenient fallback), and [`HtmlDocument`] for
//! loading whole HTML or XHTML documents.
//!
//! ## Feature flags
//!  - `default`: Enables the features listed below.
//!  - `tracing`: Enables tracing support.

mod html_document;
mod html_sink;
mod provider;

pub use html_document::HtmlDocument;
pub use html_sink::{DocumentHtmlParser, is_xhtml};
pub use provider::HtmlProvider;
