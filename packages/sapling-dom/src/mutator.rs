use std::collections::HashSet;

use crate::{Attribute, BaseDocument, ElementData, NodeData, QualName, local_name};

pub enum AppendTextErr {
    /// The node is not a text node
    NotTextNode,
}

pub struct DocumentMutator<'doc> {
    /// Document is public as an escape hatch, but users of this API should ideally avoid using it
    /// and prefer exposing additional functionality in DocumentMutator.
    pub doc: &'doc mut BaseDocument,
}

impl DocumentMutator<'_> {
    pub fn new<'doc>(doc: &'doc mut BaseDocument) -> DocumentMutator<'doc> {
        DocumentMutator { doc }
    }

    pub fn node_has_parent(&self, node_id: usize) -> bool {
        self.doc.nodes[node_id].parent.is_some()
    }

    pub fn previous_sibling_id(&self, node_id: usize) -> Option<usize> {
        let parent = &self.doc.nodes[self.doc.nodes[node_id].parent?];
        let idx = parent.index_of_child(node_id)?;
        idx.checked_sub(1).map(|idx| parent.children[idx])
    }

    pub fn next_sibling_id(&self, node_id: usize) -> Option<usize> {
        let parent = &self.doc.nodes[self.doc.nodes[node_id].parent?];
        let idx = parent.index_of_child(node_id)?;
        parent.children.get(idx + 1).copied()
    }

    pub fn last_child_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].children.last().copied()
    }

    pub fn element_name(&self, node_id: usize) -> Option<&QualName> {
        self.doc.nodes[node_id].element_data().map(|el| &el.name)
    }

    pub fn create_comment_node(&mut self, contents: &str) -> usize {
        self.doc.create_node(NodeData::Comment {
            contents: contents.to_string(),
        })
    }

    pub fn create_pi_node(&mut self, target: &str, contents: &str) -> usize {
        self.doc.create_node(NodeData::ProcessingInstruction {
            target: target.to_string(),
            contents: contents.to_string(),
        })
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        self.doc.create_text_node(text)
    }

    pub fn create_fragment(&mut self) -> usize {
        self.doc.create_fragment()
    }

    /// Remove all of the children from old_parent_id and append them to new_parent_id
    pub fn reparent_children(&mut self, old_parent_id: usize, new_parent_id: usize) {
        let child_ids = std::mem::take(&mut self.doc.nodes[old_parent_id].children);
        for &child_id in &child_ids {
            self.doc.nodes[child_id].parent = None;
        }
        self.append_children(new_parent_id, &child_ids);
    }

    pub fn append_children(&mut self, parent_id: usize, child_ids: &[usize]) {
        self.doc.append(parent_id, child_ids);
    }

    pub fn insert_nodes_before(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        self.doc.insert_before(anchor_node_id, new_node_ids);
    }

    pub fn insert_nodes_after(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        match self.next_sibling_id(anchor_node_id) {
            Some(next_sibling_id) => self.doc.insert_before(next_sibling_id, new_node_ids),
            None => {
                if let Some(parent_id) = self.doc.nodes[anchor_node_id].parent {
                    self.doc.append(parent_id, new_node_ids);
                }
            }
        }
    }

    /// Detach the node from its parent, keeping it (and its subtree) alive in the document
    pub fn remove_node(&mut self, node_id: usize) {
        self.doc.remove_node(node_id);
    }

    /// Detach the node from its parent and free it along with its subtree
    pub fn remove_and_drop_node(&mut self, node_id: usize) {
        self.doc.remove_and_drop_node(node_id);
    }

    /// Drop every child of the node, last child first
    pub fn clear_children(&mut self, node_id: usize) {
        let Some(node) = self.doc.get_node(node_id) else {
            return;
        };
        for child_id in node.children.clone().into_iter().rev() {
            self.doc.remove_and_drop_node(child_id);
        }
    }

    pub fn append_text_to_node(&mut self, node_id: usize, text: &str) -> Result<(), AppendTextErr> {
        match self.doc.nodes[node_id].text_data_mut() {
            Some(data) => {
                data.content += text;
                Ok(())
            }
            None => Err(AppendTextErr::NotTextNode),
        }
    }

    /// Deep-copy a node from another document into this one. The copy is returned detached.
    pub fn import_node(&mut self, source: &BaseDocument, node_id: usize) -> Option<usize> {
        self.doc.import_node(source, node_id, true)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> usize {
        let data = ElementData::new(name, attrs);
        self.doc.create_node(NodeData::Element(data))
    }

    pub fn add_attrs_if_missing(&mut self, node_id: usize, attrs: Vec<Attribute>) {
        let Some(element_data) = self.doc.nodes[node_id].element_data() else {
            return;
        };

        let existing_names = element_data
            .attrs
            .iter()
            .map(|e| e.name.clone())
            .collect::<HashSet<_>>();

        for attr in attrs
            .into_iter()
            .filter(|attr| !existing_names.contains(&attr.name))
        {
            self.set_attribute(node_id, attr.name, &attr.value);
        }
    }

    pub fn set_attribute(&mut self, node_id: usize, name: QualName, value: &str) {
        let node = &mut self.doc.nodes[node_id];
        let NodeData::Element(ref mut element) = node.data else {
            return;
        };

        let is_id = name.local == local_name!("id");
        let previous = element.attrs.set(name, value);

        if is_id {
            element.sync_id();
            if let Some(old_id) = previous {
                if self.doc.nodes_to_id.get(&old_id) == Some(&node_id) {
                    self.doc.nodes_to_id.remove(&old_id);
                }
            }
            self.doc.nodes_to_id.insert(value.to_string(), node_id);
        }
    }

    pub fn clear_attribute(&mut self, node_id: usize, name: QualName) {
        let node = &mut self.doc.nodes[node_id];
        let NodeData::Element(ref mut element) = node.data else {
            return;
        };

        let Some(removed) = element.attrs.remove(&name) else {
            return;
        };

        if name.local == local_name!("id") {
            element.sync_id();
            if self.doc.nodes_to_id.get(&removed.value) == Some(&node_id) {
                self.doc.nodes_to_id.remove(&removed.value);
            }
        }
    }
}
