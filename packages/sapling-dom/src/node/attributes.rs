use std::ops::{Deref, DerefMut};

use markup5ever::QualName;

/// A tag attribute, e.g. `class="test"` in `<div class="test" ...>`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub struct Attribute {
    /// The name of the attribute (e.g. the `class` in `<div class="test">`)
    pub name: QualName,
    /// The value of the attribute (e.g. the `"test"` in `<div class="test">`)
    pub value: String,
}

impl Attribute {
    pub fn new(name: QualName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Write `prefix:local` (or just `local` when there is no prefix).
pub(crate) fn write_qualified_name(writer: &mut String, name: &QualName) {
    if let Some(prefix) = &name.prefix {
        writer.push_str(prefix);
        writer.push(':');
    }
    writer.push_str(&name.local);
}

/// The attribute list of an element. Insertion order is preserved so that
/// serialization reproduces the source order.
#[derive(Clone, Debug, Default)]
pub struct Attributes {
    inner: Vec<Attribute>,
}

impl Attributes {
    pub fn new(inner: Vec<Attribute>) -> Self {
        Self { inner }
    }

    /// Set an attribute, replacing the value of an existing attribute with the same name.
    /// Returns the previous value, if any.
    pub fn set(&mut self, name: QualName, value: &str) -> Option<String> {
        match self.inner.iter_mut().find(|a| a.name == name) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, value.to_string())),
            None => {
                self.inner.push(Attribute::new(name, value));
                None
            }
        }
    }

    /// Remove the attribute with exactly this name (namespace included).
    pub fn remove(&mut self, name: &QualName) -> Option<Attribute> {
        let idx = self.inner.iter().position(|attr| attr.name == *name)?;
        Some(self.inner.remove(idx))
    }
}

impl From<Vec<Attribute>> for Attributes {
    fn from(inner: Vec<Attribute>) -> Self {
        Self::new(inner)
    }
}

impl Deref for Attributes {
    type Target = Vec<Attribute>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl DerefMut for Attributes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
