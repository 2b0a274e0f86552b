//! Arena document tree produced by the thicket tree builder.
//!
//! Nodes live in one `Vec` and refer to each other through [`NodeId`]
//! indices. The builder's stacks and lists hold the same ids, so popping
//! them never touches the tree and a detached node stays addressable.
//! Every element is bound to an entry of the static [`tag`] registry.

mod attributes;
pub mod tag;

pub use attributes::{Attribute, Attributes};
pub use tag::{Tag, TagError, TagInfo};

/// Index of a node in its [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node, allocated by [`DomTree::new`].
    pub const ROOT: Self = Self(0);
}

/// One slot of the arena.
///
/// The `children` list is authoritative; `prev_sibling` and `next_sibling`
/// mirror it and are kept in step by the mutation methods on [`DomTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// What this node is.
    pub node_type: NodeType,
    /// Containing node, `None` for the document and for detached nodes.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
    /// Following child of the same parent.
    pub next_sibling: Option<NodeId>,
    /// Preceding child of the same parent.
    pub prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// Node payloads.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// The document root.
    Document,
    /// An element with its tag, namespace and attributes.
    Element(ElementData),
    /// A `<!DOCTYPE>` node.
    Doctype(DoctypeData),
    /// Character data.
    Text(String),
    /// Comment text, without the `<!--`/`-->` delimiters.
    Comment(String),
}

/// Name and identifiers carried by a doctype token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctypeData {
    /// Doctype name, usually `html`.
    pub name: String,
    /// Public identifier, empty when absent.
    pub public_id: String,
    /// System identifier, empty when absent.
    pub system_id: String,
}

/// Element namespaces the tree builder creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Namespace {
    /// `http://www.w3.org/1999/xhtml`
    #[default]
    Html,
    /// `http://www.w3.org/2000/svg`
    Svg,
    /// `http://www.w3.org/1998/Math/MathML`
    MathMl,
}

/// Element payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Registry entry for the element name.
    pub tag: Tag,
    /// Namespace the element was created in.
    pub namespace: Namespace,
    /// Attributes in source order, names unique.
    pub attrs: Attributes,
}

impl ElementData {
    /// Bundle a tag, namespace and attribute list.
    #[must_use]
    pub const fn new(tag: Tag, namespace: Namespace, attrs: Attributes) -> Self {
        Self {
            tag,
            namespace,
            attrs,
        }
    }

    /// Name as stored, in source case when tags are case sensitive.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        self.tag.name()
    }

    /// Lower-cased name used for every structural comparison.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.tag.normal_name()
    }

    /// True for an HTML-namespace element named `name`.
    #[must_use]
    pub fn is_html(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.local_name() == name
    }

    /// The `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }
}

/// Document compatibility mode.
///
/// [§ 4.5](https://dom.spec.whatwg.org/#concept-document-quirks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuirksMode {
    /// Standards mode.
    #[default]
    NoQuirks,
    /// Set by a doctype that forces quirks.
    Quirks,
}

/// The document tree.
///
/// Node 0 is the document. Nodes are never freed: removal only unlinks, so
/// an id handed out by [`DomTree::alloc`] stays valid for the tree's life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomTree {
    nodes: Vec<Node>,
    quirks_mode: QuirksMode,
}

impl DomTree {
    /// A tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
            quirks_mode: QuirksMode::NoQuirks,
        }
    }

    /// Compatibility mode chosen by the initial doctype.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// Record the compatibility mode.
    pub const fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }

    /// Node `id`, if allocated.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutable node `id`, if allocated.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a detached node to the arena.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// Make `child` the last child of `parent`, moving it if attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let index = self.nodes[parent.0].children.len();
        self.link(parent, index, child);
    }

    /// Put `child` directly before `reference` under `parent`, moving it
    /// if attached. A `reference` that is not a child of `parent` turns
    /// this into [`append_child`](Self::append_child).
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        let index = self
            .child_index(parent, reference)
            .unwrap_or(self.nodes[parent.0].children.len());
        self.link(parent, index, child);
    }

    /// Unlink `child` from `parent`. Ignored when `child` lives elsewhere.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(index) = self.child_index(parent, child) {
            let _ = self.unlink(parent, index);
        }
    }

    /// Unlink `id` from its parent, if it has one.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
    }

    /// Append all children of `from` to `to`, in order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        while !self.nodes[from.0].children.is_empty() {
            let child = self.unlink(from, 0);
            self.append_child(to, child);
        }
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == child)
    }

    /// Splice a detached `child` into `parent.children[index]`.
    fn link(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let siblings = &mut self.nodes[parent.0].children;
        let prev = index.checked_sub(1).map(|i| siblings[i]);
        let next = siblings.get(index).copied();
        siblings.insert(index, child);

        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = next;
        if let Some(prev) = prev {
            self.nodes[prev.0].next_sibling = Some(child);
        }
        if let Some(next) = next {
            self.nodes[next.0].prev_sibling = Some(child);
        }
    }

    /// Cut `parent.children[index]` out, stitching its neighbours together.
    fn unlink(&mut self, parent: NodeId, index: usize) -> NodeId {
        let child = self.nodes[parent.0].children.remove(index);
        let node = &mut self.nodes[child.0];
        node.parent = None;
        let prev = node.prev_sibling.take();
        let next = node.next_sibling.take();
        if let Some(prev) = prev {
            self.nodes[prev.0].next_sibling = next;
        }
        if let Some(next) = next {
            self.nodes[next.0].prev_sibling = prev;
        }
        child
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Children of `id`; empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Last child of `id`.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Following sibling of `id`.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling
    }

    /// Preceding sibling of `id`.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev_sibling
    }

    /// Element payload of `id`, if it is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id)?.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Character data of `id`, if it is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.node_type {
            NodeType::Text(data) => Some(data),
            _ => None,
        }
    }

    /// The element child of the document, normally `<html>`.
    ///
    /// [§ 3.1.1](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }

    /// First `<body>` or `<frameset>` child of the document element.
    ///
    /// [§ 3.1.3](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html).iter().copied().find(|&id| {
            self.as_element(id)
                .is_some_and(|element| element.is_html("body") || element.is_html("frameset"))
        })
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
