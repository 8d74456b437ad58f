use super::ElementData;

pub struct Node {
    /// The id of the document that owns this node
    pub(crate) owner: usize,

    /// Our Id
    pub id: usize,
    /// Our parent's ID
    pub parent: Option<usize>,
    // What are our children?
    pub children: Vec<usize>,

    /// Node type (Element, TextNode, etc) specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(owner: usize, id: usize, data: NodeData) -> Self {
        Self {
            owner,
            id,
            parent: None,
            children: vec![],
            data,
        }
    }

    /// The id of the [`BaseDocument`](crate::BaseDocument) this node belongs to
    pub fn owner_document_id(&self) -> usize {
        self.owner
    }

    // Get the index of the current node in the parents child list
    pub fn index_of_child(&self, child_id: usize) -> Option<usize> {
        self.children.iter().position(|id| *id == child_id)
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    pub fn element_data(&self) -> Option<&ElementData> {
        self.data.downcast_element()
    }

    pub fn text_data_mut(&mut self) -> Option<&mut TextNodeData> {
        match self.data {
            NodeData::Text(ref mut data) => Some(data),
            _ => None,
        }
    }
}

/// The different kinds of nodes in the DOM.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The `Document` itself - the root node of a HTML document.
    Document,

    /// A detached container produced by fragment parsing.
    DocumentFragment,

    /// An element with attributes.
    Element(ElementData),

    /// A text node.
    Text(TextNodeData),

    /// A comment.
    Comment { contents: String },

    /// A Processing instruction.
    ProcessingInstruction { target: String, contents: String },
}

impl NodeData {
    pub fn downcast_element(&self) -> Option<&ElementData> {
        match self {
            Self::Element(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextNodeData {
    /// The textual content of the text node
    pub content: String,
}

impl TextNodeData {
    pub fn new(content: String) -> Self {
        Self { content }
    }
}
