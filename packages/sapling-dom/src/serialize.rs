//! XML serialization of DOM subtrees.
//!
//! Output follows XML rules rather than HTML ones: childless elements are self-closed
//! (`<br/>`), and text and attribute values are always escaped.

use crate::BaseDocument;
use crate::node::{NodeData, write_qualified_name};

impl BaseDocument {
    /// Serialize the node and its subtree. Returns an empty string for unknown node ids.
    pub fn outer_html(&self, node_id: usize) -> String {
        let mut output = String::new();
        self.write_outer_html(node_id, &mut output);
        output
    }

    pub fn write_outer_html(&self, node_id: usize, writer: &mut String) {
        let mut stack = vec![Step::Open(node_id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(id) => self.write_open(id, writer, &mut stack),
                Step::Close(id) => {
                    if let Some(data) = self.get_node(id).and_then(|node| node.element_data()) {
                        writer.push_str("</");
                        write_qualified_name(writer, &data.name);
                        writer.push('>');
                    }
                }
            }
        }
    }

    /// Write everything up to the node's children, scheduling the children and closing tag.
    fn write_open(&self, node_id: usize, writer: &mut String, stack: &mut Vec<Step>) {
        let Some(node) = self.get_node(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document | NodeData::DocumentFragment => {}
            NodeData::Text(data) => {
                writer.push_str(&html_escape::encode_text(&data.content));
            }
            NodeData::Comment { contents } => {
                writer.push_str("<!--");
                writer.push_str(contents);
                writer.push_str("-->");
            }
            NodeData::ProcessingInstruction { target, contents } => {
                writer.push_str("<?");
                writer.push_str(target);
                if !contents.is_empty() {
                    writer.push(' ');
                    writer.push_str(contents);
                }
                writer.push_str("?>");
            }
            NodeData::Element(data) => {
                writer.push('<');
                write_qualified_name(writer, &data.name);

                for attr in data.attrs() {
                    writer.push(' ');
                    write_qualified_name(writer, &attr.name);
                    writer.push_str("=\"");
                    writer.push_str(&html_escape::encode_double_quoted_attribute(&attr.value));
                    writer.push('"');
                }

                if node.children.is_empty() {
                    writer.push_str("/>");
                    return;
                }
                writer.push('>');
                stack.push(Step::Close(node_id));
            }
        }

        stack.extend(node.children.iter().rev().map(|&child_id| Step::Open(child_id)));
    }
}

enum Step {
    Open(usize),
    Close(usize),
}
