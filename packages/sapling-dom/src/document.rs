use crate::traversal::TreeTraverser;
use crate::{
    DocumentConfig, DocumentMutator, DummyHtmlParserProvider, HtmlParserProvider, Node, NodeData,
    TextNodeData,
};
use slab::Slab;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct BaseDocument {
    /// ID of the document
    id: usize,

    /// A slab-backed tree of nodes. Node 0 is always the `Document` node.
    pub(crate) nodes: Slab<Node>,

    /// Map of node ID's for fast lookups
    pub(crate) nodes_to_id: HashMap<String, usize>,

    /// HTML parser provider. Used to parse HTML for setInnerHTML
    pub html_parser_provider: Arc<dyn HtmlParserProvider>,
}

impl BaseDocument {
    /// Create a new (empty) [`BaseDocument`] with the specified configuration
    pub fn new(config: DocumentConfig) -> Self {
        static ID_GENERATOR: AtomicUsize = AtomicUsize::new(1);

        let id = ID_GENERATOR.fetch_add(1, Ordering::SeqCst);

        let html_parser_provider = config
            .html_parser_provider
            .unwrap_or_else(|| Arc::new(DummyHtmlParserProvider));

        let mut doc = Self {
            id,
            nodes: Slab::new(),
            nodes_to_id: HashMap::new(),
            html_parser_provider,
        };

        // Initialise document with root Document node
        doc.create_node(NodeData::Document);

        doc
    }

    pub fn tree(&self) -> &Slab<Node> {
        &self.nodes
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn get_node(&self, node_id: usize) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn get_node_mut(&mut self, node_id: usize) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub fn mutate<'doc>(&'doc mut self) -> DocumentMutator<'doc> {
        DocumentMutator::new(self)
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[0]
    }

    /// The document element (e.g. `<html>`), if the document has one
    pub fn try_root_element(&self) -> Option<&Node> {
        self.root_node()
            .children
            .iter()
            .map(|id| &self.nodes[*id])
            .find(|node| node.is_element())
    }

    pub fn create_node(&mut self, node_data: NodeData) -> usize {
        let entry = self.nodes.vacant_entry();
        let id = entry.key();
        entry.insert(Node::new(self.id, id, node_data));

        // If the node has an "id" attribute, store it in the ID map.
        if let Some(id_attr) = self.nodes[id].element_data().and_then(|el| el.id.clone()) {
            self.nodes_to_id.insert(id_attr, id);
        }

        id
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        let content = text.to_string();
        let data = NodeData::Text(TextNodeData::new(content));
        self.create_node(data)
    }

    /// Create a detached, empty `DocumentFragment` node
    pub fn create_fragment(&mut self) -> usize {
        self.create_node(NodeData::DocumentFragment)
    }

    /// Copy a node (and, if `deep`, its whole subtree) out of `source` into this document.
    ///
    /// The copy is owned by this document and is returned detached. Nothing is shared with
    /// `source`, which may be mutated or dropped afterwards. Returns `None` if `node_id` does
    /// not exist in `source`.
    pub fn import_node(&mut self, source: &BaseDocument, node_id: usize, deep: bool) -> Option<usize> {
        let root = self.import_single_node(source.get_node(node_id)?);
        if !deep {
            return Some(root);
        }

        // (source node, parent copy) pairs, children pushed in reverse to keep their order
        let mut stack: Vec<(usize, usize)> = source.nodes[node_id]
            .children
            .iter()
            .rev()
            .map(|&child_id| (child_id, root))
            .collect();
        while let Some((source_id, parent_id)) = stack.pop() {
            let Some(node) = source.get_node(source_id) else {
                continue;
            };
            let new_node_id = self.import_single_node(node);
            self.nodes[new_node_id].parent = Some(parent_id);
            self.nodes[parent_id].children.push(new_node_id);
            stack.extend(node.children.iter().rev().map(|&child_id| (child_id, new_node_id)));
        }

        Some(root)
    }

    fn import_single_node(&mut self, node: &Node) -> usize {
        let mut data = node.data.clone();
        if let NodeData::Element(element) = &mut data {
            // Template contents refer to a node id in the source document
            element.template_contents = None;
        }
        self.create_node(data)
    }

    /// Insert `inserted_node_ids` before `node_id` in `node_id`'s parent.
    /// Does nothing if `node_id` has no parent.
    pub fn insert_before(&mut self, node_id: usize, inserted_node_ids: &[usize]) {
        let Some(parent_id) = self.nodes.get(node_id).and_then(|node| node.parent) else {
            return;
        };

        for &inserted_id in inserted_node_ids {
            self.detach(inserted_id);
        }

        let parent = &mut self.nodes[parent_id];
        let node_child_idx = parent.index_of_child(node_id).unwrap_or(parent.children.len());
        parent.children.splice(
            node_child_idx..node_child_idx,
            inserted_node_ids.iter().copied(),
        );

        for &inserted_id in inserted_node_ids {
            self.nodes[inserted_id].parent = Some(parent_id);
        }
    }

    /// Append `appended_node_ids` to the children of `parent_id`, detaching them from any
    /// previous parent first.
    pub fn append(&mut self, parent_id: usize, appended_node_ids: &[usize]) {
        for &child_id in appended_node_ids {
            self.detach(child_id);
            self.nodes[child_id].parent = Some(parent_id);
            self.nodes[parent_id].children.push(child_id);
        }
    }

    /// Detach the node from its parent. The node (and its subtree) stays in the document.
    pub fn remove_node(&mut self, node_id: usize) -> Option<&Node> {
        self.detach(node_id);
        self.nodes.get(node_id)
    }

    /// Detach the node from its parent and free it and its whole subtree.
    pub fn remove_and_drop_node(&mut self, node_id: usize) -> Option<Node> {
        self.detach(node_id);
        let root = self.drop_single_node(node_id)?;

        let mut stack = root.children.clone();
        while let Some(child_id) = stack.pop() {
            if let Some(child) = self.drop_single_node(child_id) {
                stack.extend(child.children);
            }
        }
        Some(root)
    }

    fn drop_single_node(&mut self, node_id: usize) -> Option<Node> {
        let node = self.nodes.try_remove(node_id)?;
        if let Some(id_attr) = node.element_data().and_then(|el| el.id.as_ref()) {
            if self.nodes_to_id.get(id_attr) == Some(&node_id) {
                self.nodes_to_id.remove(id_attr);
            }
        }
        Some(node)
    }

    fn detach(&mut self, node_id: usize) {
        let Some(parent_id) = self.nodes.get_mut(node_id).and_then(|node| node.parent.take())
        else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.retain(|id| *id != node_id);
        }
    }

    /// Look up a connected element by its `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<usize> {
        self.nodes_to_id
            .get(id)
            .copied()
            .filter(|node_id| self.nodes.contains(*node_id) && self.is_connected(*node_id))
    }

    /// All elements with the given local name that are reachable from the document node,
    /// in document order.
    pub fn get_elements_by_tag_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = usize> + 'a {
        TreeTraverser::new(self).filter(move |id| {
            self.nodes[*id]
                .element_data()
                .is_some_and(|el| el.tag_name() == name)
        })
    }

    pub fn first_element_by_tag_name(&self, name: &str) -> Option<usize> {
        self.get_elements_by_tag_name(name).next()
    }

    /// Concatenated text of the node's descendant text nodes, in document order
    pub fn text_content(&self, node_id: usize) -> String {
        TreeTraverser::new_with_root(self, node_id)
            .filter_map(|id| match &self.nodes[id].data {
                NodeData::Text(data) => Some(data.content.as_str()),
                _ => None,
            })
            .collect()
    }
}
