//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//!
//! Element creation, the appropriate place for inserting a node, and foster
//! parenting.

use thicket_dom::{
    Attribute, Attributes, DoctypeData, ElementData, Namespace, NodeId, NodeType, Tag,
};

use super::core::HTMLParser;
use super::foreign_content::adjusted_svg_tag_name;
use crate::error::ParserError;

/// Where a new node goes: inside `parent`, before `before` if set, otherwise
/// as its last child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InsertionPoint {
    pub(crate) parent: NodeId,
    pub(crate) before: Option<NodeId>,
}

impl InsertionPoint {
    const fn inside(parent: NodeId) -> Self {
        Self {
            parent,
            before: None,
        }
    }
}

impl HTMLParser {
    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "1. If there was an override target specified, then let target be the
    /// override target. Otherwise, let target be the current node.
    ///  2. Determine the adjusted insertion location using the first matching
    /// steps from the following list: If foster parenting is enabled and target
    /// is a table, tbody, tfoot, thead, or tr element ..."
    pub(crate) fn appropriate_place(&self, override_target: Option<NodeId>) -> InsertionPoint {
        let target = override_target
            .or_else(|| self.open_elements.current_node())
            .unwrap_or(NodeId::ROOT);

        let table_like = self.tree.as_element(target).is_some_and(|element| {
            element.namespace == Namespace::Html
                && matches!(
                    element.local_name(),
                    "table" | "tbody" | "tfoot" | "thead" | "tr"
                )
        });

        if self.foster_parenting && table_like {
            self.foster_parent_location()
        } else {
            InsertionPoint::inside(target)
        }
    }

    /// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// Content that may not sit inside a table is placed immediately before
    /// the last open table instead. The stack of open elements is untouched.
    pub(crate) fn foster_parent_location(&self) -> InsertionPoint {
        // "Let last template be the last template element in the stack of open
        // elements, if any."
        let last_template = self.open_elements.iter().rposition(|entry| entry.is("template"));
        // "Let last table be the last table element in the stack of open
        // elements, if any."
        let last_table = self.open_elements.iter().rposition(|entry| entry.is("table"));

        // "If there is a last template and either there is no last table, or
        // there is one, but last template is lower (more recently added) than
        // last table in the stack of open elements, then: let adjusted insertion
        // location be inside last template's template contents"
        if let Some(template) = last_template
            && last_table.is_none_or(|table| template > table)
            && let Some(entry) = self.open_elements.get(template)
        {
            return InsertionPoint::inside(entry.node);
        }

        // "If there is no last table, then let adjusted insertion location be
        // inside the first element in the stack of open elements (the html
        // element)"
        let Some(table_index) = last_table else {
            let first = self
                .open_elements
                .first()
                .map_or(NodeId::ROOT, |entry| entry.node);
            return InsertionPoint::inside(first);
        };

        let Some(table) = self.open_elements.get(table_index).map(|entry| entry.node) else {
            return InsertionPoint::inside(NodeId::ROOT);
        };

        // "If last table has a parent node, then let adjusted insertion location
        // be inside last table's parent node, immediately before last table"
        if let Some(parent) = self.tree.parent(table) {
            return InsertionPoint {
                parent,
                before: Some(table),
            };
        }

        // "Let previous element be the element immediately above last table in
        // the stack of open elements."
        let previous = table_index
            .checked_sub(1)
            .and_then(|index| self.open_elements.get(index))
            .map_or(NodeId::ROOT, |entry| entry.node);
        InsertionPoint::inside(previous)
    }

    pub(crate) fn insert_at(&mut self, point: InsertionPoint, node: NodeId) {
        match point.before {
            Some(reference) => self.tree.insert_before(point.parent, node, reference),
            None => self.tree.append_child(point.parent, node),
        }
    }

    /// The tag for a new element. Tag names reach the builder lower-cased;
    /// when case is preserved, the element takes the spelling from the
    /// source token instead.
    fn tag_for(&self, name: &str, namespace: Namespace) -> Result<Tag, ParserError> {
        if namespace == Namespace::Svg
            && let Some(adjusted) = adjusted_svg_tag_name(name)
        {
            return Ok(Tag::lookup(adjusted, true)?);
        }

        let spelled = self
            .tag_spelling
            .as_deref()
            .filter(|spelling| spelling.eq_ignore_ascii_case(name))
            .unwrap_or(name);
        Ok(Tag::lookup(spelled, self.settings.case_sensitive_tags)?)
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    pub(crate) fn create_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> Result<NodeId, ParserError> {
        let tag = self.tag_for(name, namespace)?;
        let attrs: Attributes = attributes.iter().cloned().collect();
        Ok(self
            .tree
            .alloc(NodeType::Element(ElementData::new(tag, namespace, attrs))))
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "1. Let the adjusted insertion location be the appropriate place for
    /// inserting a node.
    ///  2. Let element be the result of creating an element for the token in the
    /// given namespace, with the intended parent being the element in which the
    /// adjusted insertion location finds itself.
    ///  3. ... insert element at the adjusted insertion location.
    ///  4. Push element onto the stack of open elements so that it is the new
    /// current node."
    pub(crate) fn insert_foreign_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> Result<NodeId, ParserError> {
        let point = self.appropriate_place(None);
        let node = self.create_element(name, namespace, attributes)?;
        self.insert_at(point, node);
        self.push_open_element(node);
        Ok(node)
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the token,
    /// in the HTML namespace."
    pub(crate) fn insert_html_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
    ) -> Result<NodeId, ParserError> {
        self.insert_foreign_element(name, Namespace::Html, attributes)
    }

    /// Insert an HTML element that has no token behind it, such as the
    /// implied `tbody` of `<table><tr>`.
    pub(crate) fn insert_implied_element(&mut self, name: &str) -> Result<NodeId, ParserError> {
        self.insert_html_element(name, &[])
    }

    /// Insert a copy of `element` at the appropriate place and push it. Used
    /// when reopening formatting elements.
    pub(crate) fn insert_element_from_snapshot(&mut self, element: &ElementData) -> NodeId {
        let point = self.appropriate_place(None);
        let node = self.tree.alloc(NodeType::Element(element.clone()));
        self.insert_at(point, node);
        self.push_open_element(node);
        node
    }

    /// Push an element already in the tree onto the stack of open elements.
    pub(crate) fn push_open_element(&mut self, node: NodeId) {
        if let Some(element) = self.tree.as_element(node) {
            let name = element.local_name().to_string();
            let namespace = element.namespace;
            self.open_elements.push(node, &name, namespace);
        }
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// Appends `data` to a Text node directly before the insertion point, or
    /// creates one. Text is never inserted directly into the Document.
    pub(crate) fn insert_characters(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }

        // STEP 1: "Let the adjusted insertion location be the appropriate place
        //         for inserting a node."
        let point = self.appropriate_place(None);

        // STEP 2: "If the adjusted insertion location is in a Document node,
        //         then return."
        if point.parent == NodeId::ROOT {
            return;
        }

        // STEP 3: "If there is a Text node immediately before the adjusted
        //         insertion location, then append data to that Text node's data."
        let adjacent = match point.before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(point.parent),
        };
        if let Some(text_id) = adjacent
            && let Some(node) = self.tree.get_mut(text_id)
            && let NodeType::Text(text) = &mut node.node_type
        {
            text.push_str(data);
            return;
        }

        // STEP 4: "Otherwise, create a new Text node whose data is data ... and
        //         insert the newly created node at the adjusted insertion location."
        let text_id = self.tree.alloc(NodeType::Text(data.to_string()));
        self.insert_at(point, text_id);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(crate) fn insert_comment(&mut self, data: &str) {
        let point = self.appropriate_place(None);
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.insert_at(point, comment);
    }

    /// Insert a comment as the last child of `parent`, e.g. the Document for
    /// comments before `<html>` or after `</html>`.
    pub(crate) fn insert_comment_in(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    /// Append a DocumentType node to the Document.
    pub(crate) fn insert_doctype(&mut self, doctype: DoctypeData) {
        let node = self.tree.alloc(NodeType::Doctype(doctype));
        self.tree.append_child(NodeId::ROOT, node);
    }
}
