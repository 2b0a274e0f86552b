//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used to handle
//! mis-nested formatting element tags."

use thicket_dom::{ElementData, NodeId};

use super::core::HTMLParser;

/// An entry in the list: a formatting element or a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormattingEntry {
    /// A formatting element, with the element data it was created from so it
    /// can be recreated during reconstruction or adoption.
    Element {
        node: NodeId,
        element: ElementData,
    },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Pushed on entering applet, object, marquee, template, td, th and caption.
    Marker,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ActiveFormattingElements {
    entries: Vec<FormattingEntry>,
}

fn same_element(a: &ElementData, b: &ElementData) -> bool {
    a.local_name() == b.local_name()
        && a.namespace == b.namespace
        && a.attrs.len() == b.attrs.len()
        && a.attrs.iter().all(|attr| b.attrs.get(&attr.name) == Some(attr.value.as_str()))
}

impl ActiveFormattingElements {
    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "1. If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if there are
    /// no markers, that have the same tag name, namespace, and attributes as
    /// element, then remove the earliest such element from the list of active
    /// formatting elements.
    ///  2. Add element to the list of active formatting elements."
    pub(crate) fn push(&mut self, node: NodeId, element: ElementData) {
        let mut count = 0;
        let mut earliest = None;
        for (i, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => break,
                FormattingEntry::Element { element: other, .. } => {
                    if same_element(other, &element) {
                        count += 1;
                        earliest = Some(i);
                    }
                }
            }
        }
        if count >= 3
            && let Some(index) = earliest
        {
            let _ = self.entries.remove(index);
        }

        self.entries.push(FormattingEntry::Element { node, element });
    }

    pub(crate) fn insert_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "1. Let entry be the last (most recently added) entry in the list.
    ///  2. Remove entry from the list.
    ///  3. If entry was a marker, then stop. Otherwise, go to step 1."
    pub(crate) fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if entry == FormattingEntry::Marker {
                break;
            }
        }
    }

    /// Index of the most recent element called `name` after the last marker.
    pub(crate) fn find_after_last_marker(&self, name: &str) -> Option<usize> {
        for (i, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element { element, .. } if element.is_html(name) => {
                    return Some(i);
                }
                FormattingEntry::Element { .. } => {}
            }
        }
        None
    }

    pub(crate) fn position(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().position(
            |entry| matches!(entry, FormattingEntry::Element { node: id, .. } if *id == node),
        )
    }

    pub(crate) fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&FormattingEntry> {
        self.entries.get(index)
    }

    pub(crate) fn node_at(&self, index: usize) -> Option<NodeId> {
        match self.entries.get(index) {
            Some(FormattingEntry::Element { node, .. }) => Some(*node),
            _ => None,
        }
    }

    pub(crate) fn element_at(&self, index: usize) -> Option<&ElementData> {
        match self.entries.get(index) {
            Some(FormattingEntry::Element { element, .. }) => Some(element),
            _ => None,
        }
    }

    /// Point the entry at `index` to a freshly created clone.
    pub(crate) fn replace_node(&mut self, index: usize, new_node: NodeId) {
        if let Some(FormattingEntry::Element { node, .. }) = self.entries.get_mut(index) {
            *node = new_node;
        }
    }

    pub(crate) fn insert(&mut self, index: usize, entry: FormattingEntry) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<FormattingEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub(crate) fn remove(&mut self, node: NodeId) {
        if let Some(index) = self.position(node) {
            let _ = self.entries.remove(index);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn last(&self) -> Option<&FormattingEntry> {
        self.entries.last()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl HTMLParser {
    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// Reopens formatting elements that were closed implicitly, e.g. by a
    /// paragraph boundary, so that following text keeps its formatting.
    pub(crate) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1-2: nothing to do for an empty list, or when the last entry is a
        // marker or still open.
        let Some(last) = self.active_formatting_elements.last() else {
            return;
        };
        match last {
            FormattingEntry::Marker => return,
            FormattingEntry::Element { node, .. } if self.open_elements.contains(*node) => {
                return;
            }
            FormattingEntry::Element { .. } => {}
        }

        // STEP 3-6: Rewind to the entry after the last marker or open element.
        let mut index = self.active_formatting_elements.len() - 1;
        while index > 0 {
            let previous = match self.active_formatting_elements.get(index - 1) {
                Some(FormattingEntry::Marker) => break,
                Some(FormattingEntry::Element { node, .. }) => *node,
                None => break,
            };
            if self.open_elements.contains(previous) {
                break;
            }
            index -= 1;
        }

        // STEP 7-10: Advance, create, replace.
        while index < self.active_formatting_elements.len() {
            let Some(element) = self.active_formatting_elements.element_at(index).cloned() else {
                index += 1;
                continue;
            };
            let new_node = self.insert_element_from_snapshot(&element);
            self.active_formatting_elements.replace_node(index, new_node);
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use thicket_dom::{Attribute, Attributes, Namespace, Tag};

    use super::*;

    fn element(name: &str, attrs: &[(&str, &str)]) -> ElementData {
        ElementData::new(
            Tag::lookup(name, false).unwrap(),
            Namespace::Html,
            attrs
                .iter()
                .map(|&(name, value)| Attribute::new(name, value))
                .collect::<Attributes>(),
        )
    }

    #[test]
    fn test_noahs_ark_keeps_three() {
        let mut list = ActiveFormattingElements::default();
        for i in 0..4 {
            list.push(NodeId(i + 1), element("b", &[("class", "x")]));
        }

        assert_eq!(list.len(), 3);
        assert_eq!(list.position(NodeId(1)), None);
        assert_eq!(list.position(NodeId(4)), Some(2));
    }

    #[test]
    fn test_noahs_ark_compares_attributes_unordered() {
        let mut list = ActiveFormattingElements::default();
        list.push(NodeId(1), element("a", &[("href", "1"), ("id", "x")]));
        list.push(NodeId(2), element("a", &[("id", "x"), ("href", "1")]));
        list.push(NodeId(3), element("a", &[("href", "1"), ("id", "x")]));
        list.push(NodeId(4), element("a", &[("href", "1"), ("id", "x")]));

        assert!(!list.contains(NodeId(1)));
    }

    #[test]
    fn test_noahs_ark_stops_at_marker() {
        let mut list = ActiveFormattingElements::default();
        list.push(NodeId(1), element("i", &[]));
        list.push(NodeId(2), element("i", &[]));
        list.insert_marker();
        list.push(NodeId(3), element("i", &[]));
        list.push(NodeId(4), element("i", &[]));

        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_clear_to_last_marker() {
        let mut list = ActiveFormattingElements::default();
        list.push(NodeId(1), element("b", &[]));
        list.insert_marker();
        list.push(NodeId(2), element("i", &[]));
        list.clear_to_last_marker();

        assert_eq!(list.len(), 1);
        assert!(list.contains(NodeId(1)));

        list.clear_to_last_marker();
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_find_after_last_marker() {
        let mut list = ActiveFormattingElements::default();
        list.push(NodeId(1), element("a", &[]));
        list.push(NodeId(2), element("b", &[]));
        list.push(NodeId(3), element("a", &[]));

        assert_eq!(list.find_after_last_marker("a"), Some(2));

        list.insert_marker();
        assert_eq!(list.find_after_last_marker("a"), None);
    }
}
