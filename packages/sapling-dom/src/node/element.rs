use markup5ever::{LocalName, QualName, local_name};

use super::{Attribute, Attributes};

#[derive(Debug, Clone)]
pub struct ElementData {
    /// The elements tag name, namespace and prefix
    pub name: QualName,

    /// The elements id attribute (if it has one)
    pub id: Option<String>,

    /// The element's attributes
    pub attrs: Attributes,

    /// The element's template contents (\<template\> elements only)
    pub template_contents: Option<usize>,
}

impl ElementData {
    pub fn new(name: QualName, attrs: Vec<Attribute>) -> Self {
        let id = attrs
            .iter()
            .find(|attr| attr.name.local == local_name!("id"))
            .map(|attr| attr.value.clone());

        ElementData {
            name,
            id,
            attrs: Attributes::new(attrs),
            template_contents: None,
        }
    }

    /// The tag name without prefix or namespace, e.g. `div`
    pub fn tag_name(&self) -> &str {
        &self.name.local
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn attr(&self, name: impl PartialEq<LocalName>) -> Option<&str> {
        let attr = self.attrs.iter().find(|attr| name == attr.name.local)?;
        Some(&attr.value)
    }

    /// Keep the cached `id` in sync after an attribute write.
    pub(crate) fn sync_id(&mut self) {
        self.id = self.attr(local_name!("id")).map(str::to_string);
    }
}
