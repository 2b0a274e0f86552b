//! [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
//!
//! Repairs mis-nested formatting elements such as `<b><p>x</b>y</p>`: the
//! formatting element is closed where the end tag appears and clones of it
//! are reopened inside the block that outlived it.

use thicket_dom::{Namespace, NodeId, NodeType};

use super::core::{HTMLParser, LOG_TARGET};
use super::formatting::FormattingEntry;
use super::open_elements::{OpenElement, ScopeKind};
use crate::token::Token;

/// "Outer loop: If outer loop counter is greater than or equal to 8, then return."
const OUTER_LOOP_LIMIT: usize = 8;

/// "If inner loop counter is greater than 3 and node is in the list of active
/// formatting elements, then remove node from the list of active formatting
/// elements."
const INNER_LOOP_LIMIT: usize = 3;

impl HTMLParser {
    /// Run the adoption agency algorithm for an end tag called `subject`, or
    /// for the implied end tag of a repeated `<a>` or `<nobr>`.
    pub(crate) fn run_adoption_agency(&mut self, token: &Token, subject: &str) {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //         subject, and the current node is not in the list of active
        //         formatting elements, then pop the current node off the stack
        //         of open elements and return."
        if let Some(current) = self.open_elements.current()
            && current.is(subject)
            && !self.active_formatting_elements.contains(current.node)
        {
            self.pop_current();
            return;
        }

        // STEP 3-4: "Let outer loop counter be 0. Outer loop: ..."
        for _ in 0..OUTER_LOOP_LIMIT {
            if !self.adoption_agency_iteration(token, subject) {
                return;
            }
        }

        log::debug!(
            target: LOG_TARGET,
            "adoption agency for </{subject}> stopped after {OUTER_LOOP_LIMIT} iterations"
        );
    }

    /// One pass of the outer loop. Returns whether the loop continues.
    fn adoption_agency_iteration(&mut self, token: &Token, subject: &str) -> bool {
        // STEP 4.3: "Let formatting element be the last element in the list of
        //           active formatting elements that is between the end of the
        //           list and the last marker in the list, if any, or the start of
        //           the list otherwise, and has the tag name subject. If there is
        //           no such element, then return and instead act as described in
        //           the "any other end tag" entry above."
        let Some(formatting_index) = self.active_formatting_elements.find_after_last_marker(subject)
        else {
            self.any_other_end_tag(token, subject);
            return false;
        };
        let Some(formatting_node) = self.active_formatting_elements.node_at(formatting_index) else {
            return false;
        };

        // STEP 4.4: "If formatting element is not in the stack of open
        //           elements, then this is a parse error; remove the element
        //           from the list, and return."
        let Some(formatting_stack_index) = self.open_elements.position(formatting_node) else {
            self.parse_error(token);
            let _ = self.active_formatting_elements.remove_at(formatting_index);
            return false;
        };

        // STEP 4.5: "If formatting element is in the stack of open elements,
        //           but the element is not in scope, then this is a parse error;
        //           return."
        if !self
            .open_elements
            .has_node_in_scope(formatting_node, ScopeKind::Default)
        {
            self.parse_error(token);
            return false;
        }

        // STEP 4.6: "If formatting element is not the current node, this is a
        //           parse error. (But do not return.)"
        if self.open_elements.current_node() != Some(formatting_node) {
            self.parse_error(token);
        }

        // STEP 4.7: "Let furthest block be the topmost node in the stack of open
        //           elements that is lower in the stack than formatting element,
        //           and is an element in the special category."
        let furthest_block_index = (formatting_stack_index + 1..self.open_elements.len()).find(
            |&index| {
                self.open_elements
                    .get(index)
                    .is_some_and(|entry| entry.category.is_special())
            },
        );

        // STEP 4.8: "If there is no furthest block, then the UA must first pop
        //           all the nodes from the bottom of the stack of open elements,
        //           from the current node up to and including formatting element,
        //           then remove formatting element from the list of active
        //           formatting elements, and finally return."
        let Some(furthest_block_index) = furthest_block_index else {
            self.open_elements.truncate(formatting_stack_index);
            let _ = self.active_formatting_elements.remove_at(formatting_index);
            return false;
        };
        let Some(furthest_block) = self
            .open_elements
            .get(furthest_block_index)
            .map(|entry| entry.node)
        else {
            return false;
        };

        // STEP 4.9: "Let common ancestor be the element immediately above
        //           formatting element in the stack of open elements."
        let Some(common_ancestor) = formatting_stack_index
            .checked_sub(1)
            .and_then(|index| self.open_elements.get(index))
            .map(|entry| entry.node)
        else {
            return false;
        };

        // STEP 4.10: "Let a bookmark note the position of formatting element in
        //            the list of active formatting elements relative to the
        //            elements on either side of it in the list."
        let mut bookmark = formatting_index;

        // STEP 4.11-12: "Let node and last node be furthest block."
        let mut node_index = furthest_block_index;
        let mut last_node = furthest_block;

        // STEP 4.13: "Inner loop"
        let mut inner_loop_counter = 0;
        loop {
            inner_loop_counter += 1;

            // STEP 4.13.2: "Let node be the element immediately above node in the
            //              stack of open elements, or if node is no longer in the
            //              stack of open elements (e.g. because it got removed by
            //              this algorithm), the element that was immediately above
            //              node in the stack of open elements before node was
            //              removed."
            let Some(above) = node_index.checked_sub(1) else {
                break;
            };
            node_index = above;
            let Some(node) = self.open_elements.get(node_index).map(|entry| entry.node) else {
                break;
            };

            // STEP 4.13.3: "If node is formatting element, then break."
            if node == formatting_node {
                break;
            }

            // STEP 4.13.4
            let mut node_formatting_index = self.active_formatting_elements.position(node);
            if inner_loop_counter > INNER_LOOP_LIMIT
                && let Some(index) = node_formatting_index
            {
                let _ = self.active_formatting_elements.remove_at(index);
                if index < bookmark {
                    bookmark -= 1;
                }
                node_formatting_index = None;
            }

            // STEP 4.13.5: "If node is not in the list of active formatting
            //              elements, then remove node from the stack of open
            //              elements and continue."
            let Some(node_formatting_index) = node_formatting_index else {
                let _ = self.open_elements.remove_at(node_index);
                continue;
            };

            // STEP 4.13.6: "Create an element for the token for which the element
            //              node was created, in the HTML namespace, with common
            //              ancestor as the intended parent; replace the entry for
            //              node in the list of active formatting elements with an
            //              entry for the new element, replace the entry for node
            //              in the stack of open elements with an entry for the new
            //              element, and let node be the new element."
            let Some(element) = self
                .active_formatting_elements
                .element_at(node_formatting_index)
                .cloned()
            else {
                break;
            };
            let new_node = self.tree.alloc(NodeType::Element(element));
            self.active_formatting_elements
                .replace_node(node_formatting_index, new_node);
            self.open_elements.replace_node(node_index, new_node);

            // STEP 4.13.7: "If last node is furthest block, then move the
            //              aforementioned bookmark to be immediately after the new
            //              node in the list of active formatting elements."
            if last_node == furthest_block {
                bookmark = node_formatting_index + 1;
            }

            // STEP 4.13.8: "Append last node to node."
            self.tree.append_child(new_node, last_node);

            // STEP 4.13.9: "Set last node to node."
            last_node = new_node;
        }

        // STEP 4.14: "Insert whatever last node ended up being in the previous
        //            step at the appropriate place for inserting a node, but using
        //            common ancestor as the override target."
        let place = self.appropriate_place(Some(common_ancestor));
        self.insert_at(place, last_node);

        // STEP 4.15: "Create an element for the token for which formatting
        //            element was created, in the HTML namespace, with furthest
        //            block as the intended parent."
        let Some(formatting_index) = self.active_formatting_elements.position(formatting_node)
        else {
            return false;
        };
        let Some(element) = self
            .active_formatting_elements
            .element_at(formatting_index)
            .cloned()
        else {
            return false;
        };
        let name = element.local_name().to_string();
        let namespace = element.namespace;
        let new_element = self.tree.alloc(NodeType::Element(element.clone()));

        // STEP 4.16: "Take all of the child nodes of furthest block and append
        //            them to the element created in the last step."
        self.tree.move_children(furthest_block, new_element);

        // STEP 4.17: "Append that new element to furthest block."
        self.tree.append_child(furthest_block, new_element);

        // STEP 4.18: "Remove formatting element from the list of active
        //            formatting elements, and insert the new element into the
        //            list of active formatting elements at the position of the
        //            aforementioned bookmark."
        let _ = self.active_formatting_elements.remove_at(formatting_index);
        if formatting_index < bookmark {
            bookmark -= 1;
        }
        self.active_formatting_elements.insert(
            bookmark,
            FormattingEntry::Element {
                node: new_element,
                element,
            },
        );

        // STEP 4.19: "Remove formatting element from the stack of open elements,
        //            and insert the new element into the stack of open elements
        //            immediately below the position of furthest block in that
        //            stack."
        let _ = self.open_elements.remove(formatting_node);
        self.insert_open_element_below(furthest_block, new_element, &name, namespace);

        // STEP 4.20: "Jump back to the step labeled outer loop."
        true
    }

    fn insert_open_element_below(
        &mut self,
        anchor: NodeId,
        node: NodeId,
        name: &str,
        namespace: Namespace,
    ) {
        let index = self
            .open_elements
            .position(anchor)
            .map_or(self.open_elements.len(), |index| index + 1);
        self.open_elements
            .insert(index, OpenElement::new(node, name, namespace));
    }
}
