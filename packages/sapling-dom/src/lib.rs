//! The core DOM abstraction in Sapling
//!
//! This crate implements a small headless DOM ([`BaseDocument`]) whose elements support the
//! `innerHTML` contract familiar from browsers: [`BaseDocument::inner_html`] serializes an
//! element's children and [`DocumentMutator::set_inner_html`] replaces them with parsed markup.
//!
//! Parsing is delegated to an [`HtmlParserProvider`]. Most users will want the one from the
//! [sapling-html](https://docs.rs/sapling-html) crate, which also provides `HtmlDocument` for
//! parsing whole HTML (or XHTML) documents. Without a provider, setting `innerHTML` only clears
//! the element.
//!
//! ## Feature flags
//!  - `default`: Enables the features listed below.
//!  - `tracing`: Enables tracing support.

/// The DOM implementation.
///
/// This is the primary entry point for this crate.
mod document;

/// The nodes themselves, and their data.
pub mod node;

mod config;
pub mod diagnostics;
mod html;
mod inner_html;
mod mutator;
mod serialize;
mod traversal;

pub mod util;

pub use config::DocumentConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, ErrorCaptureGuard, set_error_capture_mode};
pub use document::BaseDocument;
pub use html::{DummyHtmlParserProvider, HtmlParserProvider, ParseError};
pub use inner_html::{FRAGMENT_WRAPPER, INNER_HTML};
pub use markup5ever::{LocalName, Namespace, Prefix, QualName, local_name, ns};
pub use mutator::{AppendTextErr, DocumentMutator};
pub use node::{Attribute, Attributes, ElementData, Node, NodeData, TextNodeData};
pub use traversal::{AncestorTraverser, TreeTraverser};
