#![allow(clippy::module_inception)]

mod attributes;
mod element;
mod node;

pub(crate) use attributes::write_qualified_name;
pub use attributes::{Attribute, Attributes};
pub use element::ElementData;
pub use node::*;
