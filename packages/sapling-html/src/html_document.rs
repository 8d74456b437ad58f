use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::{DocumentHtmlParser, HtmlProvider};

use sapling_dom::{BaseDocument, DocumentConfig, ParseError};

pub struct HtmlDocument {
    inner: BaseDocument,
}

impl Deref for HtmlDocument {
    type Target = BaseDocument;
    fn deref(&self) -> &BaseDocument {
        &self.inner
    }
}
impl DerefMut for HtmlDocument {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
impl From<HtmlDocument> for BaseDocument {
    fn from(doc: HtmlDocument) -> BaseDocument {
        doc.inner
    }
}

impl HtmlDocument {
    /// Parse HTML (or XHTML) into an [`HtmlDocument`]
    ///
    /// Unless the config already names one, [`HtmlProvider`] is installed as the document's
    /// parser so that `set_inner_html` works out of the box.
    pub fn from_html(html: &str, config: DocumentConfig) -> Self {
        match Self::try_from_html(html, config) {
            Ok(doc) => doc,
            Err((doc, _err)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Failed to read HTML input: {_err}");
                doc
            }
        }
    }

    /// Like [`HtmlDocument::from_html`], but hands back the partially-built document alongside
    /// the error if the input could not be read.
    pub fn try_from_html(
        html: &str,
        mut config: DocumentConfig,
    ) -> Result<Self, (Self, ParseError)> {
        config
            .html_parser_provider
            .get_or_insert_with(|| Arc::new(HtmlProvider) as _);

        let mut doc = BaseDocument::new(config);
        let result = DocumentHtmlParser::parse_into_doc(&mut doc, html).map(|_| ());
        let doc = HtmlDocument { inner: doc };
        match result {
            Ok(()) => Ok(doc),
            Err(err) => Err((doc, err)),
        }
    }

    /// Convert the [`HtmlDocument`] into its inner [`BaseDocument`]
    pub fn into_inner(self) -> BaseDocument {
        self.into()
    }
}
