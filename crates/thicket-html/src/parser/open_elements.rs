//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows downwards; the
//! topmost node on the stack is the first one added to the stack, and the bottommost
//! node of the stack is the most recently added node in the stack."
//!
//! Entries are ids into the [`DomTree`](thicket_dom::DomTree) arena. Each entry
//! carries the element's local name, namespace and the categories its name
//! falls into, so scope queries never have to go back to the tree.

use thicket_dom::{Namespace, NodeId};

/// The element categories that matter while an element is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Category(u8);

impl Category {
    const SPECIAL: u8 = 1 << 0;
    const SCOPE: u8 = 1 << 1;
    const LIST_ITEM_SCOPE: u8 = 1 << 2;
    const BUTTON_SCOPE: u8 = 1 << 3;
    const TABLE_SCOPE: u8 = 1 << 4;
    const SELECT_PASSTHROUGH: u8 = 1 << 5;

    /// Classify an element by namespace and lower-cased local name.
    pub(crate) fn of(namespace: Namespace, name: &str) -> Self {
        let mut bits = 0;
        match namespace {
            Namespace::Html => {
                if is_special_html(name) {
                    bits |= Self::SPECIAL;
                }
                if matches!(
                    name,
                    "applet"
                        | "caption"
                        | "html"
                        | "table"
                        | "td"
                        | "th"
                        | "marquee"
                        | "object"
                        | "template"
                ) {
                    bits |= Self::SCOPE;
                }
                if matches!(name, "ol" | "ul") {
                    bits |= Self::LIST_ITEM_SCOPE;
                }
                if name == "button" {
                    bits |= Self::BUTTON_SCOPE;
                }
                if matches!(name, "html" | "table" | "template") {
                    bits |= Self::TABLE_SCOPE;
                }
                if matches!(name, "optgroup" | "option") {
                    bits |= Self::SELECT_PASSTHROUGH;
                }
            }
            Namespace::MathMl => {
                if matches!(name, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml") {
                    bits |= Self::SPECIAL | Self::SCOPE;
                }
            }
            Namespace::Svg => {
                if matches!(name, "foreignobject" | "desc" | "title") {
                    bits |= Self::SPECIAL | Self::SCOPE;
                }
            }
        }
        Self(bits)
    }

    /// [§ 13.1.1 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
    pub(crate) const fn is_special(self) -> bool {
        self.0 & Self::SPECIAL != 0
    }

    const fn bounds(self, scope: ScopeKind) -> bool {
        match scope {
            ScopeKind::Default => self.0 & Self::SCOPE != 0,
            ScopeKind::ListItem => self.0 & (Self::SCOPE | Self::LIST_ITEM_SCOPE) != 0,
            ScopeKind::Button => self.0 & (Self::SCOPE | Self::BUTTON_SCOPE) != 0,
            ScopeKind::Table => self.0 & Self::TABLE_SCOPE != 0,
            ScopeKind::Select => self.0 & Self::SELECT_PASSTHROUGH == 0,
        }
    }
}

/// [§ 13.1.1 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// "The following elements have varying levels of special parsing rules"
fn is_special_html(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "applet"
            | "area"
            | "article"
            | "aside"
            | "base"
            | "basefont"
            | "bgsound"
            | "blockquote"
            | "body"
            | "br"
            | "button"
            | "caption"
            | "center"
            | "col"
            | "colgroup"
            | "dd"
            | "details"
            | "dir"
            | "div"
            | "dl"
            | "dt"
            | "embed"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "frame"
            | "frameset"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "head"
            | "header"
            | "hgroup"
            | "hr"
            | "html"
            | "iframe"
            | "img"
            | "input"
            | "keygen"
            | "li"
            | "link"
            | "listing"
            | "main"
            | "marquee"
            | "menu"
            | "meta"
            | "nav"
            | "noembed"
            | "noframes"
            | "noscript"
            | "object"
            | "ol"
            | "p"
            | "param"
            | "plaintext"
            | "pre"
            | "script"
            | "search"
            | "section"
            | "select"
            | "source"
            | "style"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "template"
            | "textarea"
            | "tfoot"
            | "th"
            | "thead"
            | "title"
            | "tr"
            | "track"
            | "ul"
            | "wbr"
            | "xmp"
    )
}

/// [§ 13.2.4.3 Has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
///
/// Which elements stop a scope search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope": default plus `ol`, `ul`
    ListItem,
    /// "has an element in button scope": default plus `button`
    Button,
    /// "has an element in table scope": `html`, `table`, `template`
    Table,
    /// "has an element in select scope": everything but `optgroup`, `option`
    Select,
}

/// One open element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenElement {
    pub(crate) node: NodeId,
    pub(crate) name: String,
    pub(crate) namespace: Namespace,
    pub(crate) category: Category,
}

impl OpenElement {
    pub(crate) fn new(node: NodeId, name: &str, namespace: Namespace) -> Self {
        Self {
            node,
            name: name.to_string(),
            namespace,
            category: Category::of(namespace, name),
        }
    }

    /// Whether this is the HTML element called `name`.
    pub(crate) fn is(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.name == name
    }

    /// Whether this is an HTML element with one of `names`.
    pub(crate) fn is_one_of(&self, names: &[&str]) -> bool {
        self.namespace == Namespace::Html && names.contains(&self.name.as_str())
    }
}

/// The stack itself.
#[derive(Debug, Clone, Default)]
pub(crate) struct OpenElements {
    entries: Vec<OpenElement>,
}

impl OpenElements {
    pub(crate) fn push(&mut self, node: NodeId, name: &str, namespace: Namespace) {
        self.entries.push(OpenElement::new(node, name, namespace));
    }

    pub(crate) fn pop(&mut self) -> Option<OpenElement> {
        self.entries.pop()
    }

    /// "The current node is the bottommost node in this stack of open elements."
    pub(crate) fn current(&self) -> Option<&OpenElement> {
        self.entries.last()
    }

    pub(crate) fn current_node(&self) -> Option<NodeId> {
        self.entries.last().map(|entry| entry.node)
    }

    pub(crate) fn current_is(&self, name: &str) -> bool {
        self.current().is_some_and(|entry| entry.is(name))
    }

    pub(crate) fn current_is_one_of(&self, names: &[&str]) -> bool {
        self.current().is_some_and(|entry| entry.is_one_of(names))
    }

    pub(crate) fn first(&self) -> Option<&OpenElement> {
        self.entries.first()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&OpenElement> {
        self.entries.get(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, OpenElement> {
        self.entries.iter()
    }

    pub(crate) fn contains(&self, node: NodeId) -> bool {
        self.entries.iter().any(|entry| entry.node == node)
    }

    /// Whether any open element is the HTML element `name`, regardless of scope.
    pub(crate) fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.is(name))
    }

    pub(crate) fn position(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.node == node)
    }

    /// Remove `node` wherever it sits in the stack.
    pub(crate) fn remove(&mut self, node: NodeId) -> Option<OpenElement> {
        let index = self.position(node)?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> OpenElement {
        self.entries.remove(index)
    }

    pub(crate) fn insert(&mut self, index: usize, entry: OpenElement) {
        self.entries.insert(index, entry);
    }

    /// Swap the node of the entry at `index`, keeping its name and category.
    pub(crate) fn replace_node(&mut self, index: usize, node: NodeId) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.node = node;
        }
    }

    /// Drop every entry from `index` upwards.
    pub(crate) fn truncate(&mut self, index: usize) {
        self.entries.truncate(index);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pop until an HTML element called `name` has been popped.
    pub(crate) fn pop_until(&mut self, name: &str) {
        while let Some(entry) = self.entries.pop() {
            if entry.is(name) {
                break;
            }
        }
    }

    /// Pop until an HTML element with one of `names` has been popped.
    pub(crate) fn pop_until_one_of(&mut self, names: &[&str]) {
        while let Some(entry) = self.entries.pop() {
            if entry.is_one_of(names) {
                break;
            }
        }
    }

    /// Pop until `node` has been popped.
    pub(crate) fn pop_until_node(&mut self, node: NodeId) {
        if let Some(index) = self.position(node) {
            self.entries.truncate(index);
        }
    }

    /// Pop while the current node is not one of `names` (or the stack is empty).
    pub(crate) fn pop_until_current_is_one_of(&mut self, names: &[&str]) {
        while let Some(current) = self.entries.last() {
            if current.is_one_of(names) {
                break;
            }
            let _ = self.entries.pop();
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the stack).
    ///  2. If node is the target node, terminate in a match state.
    ///  3. Otherwise, if node is one of the element types in list, terminate in a
    ///     failure state.
    ///  4. Otherwise, set node to the previous entry in the stack of open elements
    ///     and return to step 2."
    pub(crate) fn has_in_scope(&self, names: &[&str], scope: ScopeKind) -> bool {
        for entry in self.entries.iter().rev() {
            if entry.is_one_of(names) {
                return true;
            }
            if entry.category.bounds(scope) {
                return false;
            }
        }
        false
    }

    /// Single-name shorthand for [`OpenElements::has_in_scope`].
    pub(crate) fn has_name_in_scope(&self, name: &str, scope: ScopeKind) -> bool {
        self.has_in_scope(&[name], scope)
    }

    /// Scope test for a specific node rather than a tag name.
    pub(crate) fn has_node_in_scope(&self, node: NodeId, scope: ScopeKind) -> bool {
        for entry in self.entries.iter().rev() {
            if entry.node == node {
                return true;
            }
            if entry.category.bounds(scope) {
                return false;
            }
        }
        false
    }
}
