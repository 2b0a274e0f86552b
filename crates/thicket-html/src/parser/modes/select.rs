//! [§ 13.2.6.4.16 "in select"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
//! and [§ 13.2.6.4.17 "in select in table"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable).
//!
//! Only `option`, `optgroup` and `hr` are accepted inside a select; other
//! markup is reported and dropped.

use crate::error::ParserError;
use crate::parser::core::{HTMLParser, InsertionMode, Step};
use crate::parser::open_elements::ScopeKind;
use crate::token::Token;

/// Table tags that close a select opened inside a table.
const TABLE_TAGS: &[&str] = &[
    "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
];

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(crate) fn handle_in_select_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data } => {
                if data.contains('\0') {
                    self.parse_error(token);
                    self.insert_characters(&data.replace('\0', ""));
                } else {
                    self.insert_characters(data);
                }
                Ok(Step::Done)
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
                Ok(Step::Done)
            }

            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => Ok(Step::Using(InsertionMode::InBody)),

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node from the stack of
                // open elements."
                // "Insert an HTML element for the token."
                "option" => {
                    if self.open_elements.current_is("option") {
                        self.pop_current();
                    }
                    let _ = self.insert_html_element(name, attributes)?;
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "optgroup""
                // "If the current node is an option element, pop that node from the stack of
                // open elements."
                // "If the current node is an optgroup element, pop that node from the stack of
                // open elements."
                // "Insert an HTML element for the token."
                "optgroup" => {
                    self.pop_open_option_and_optgroup();
                    let _ = self.insert_html_element(name, attributes)?;
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "hr""
                // As "optgroup", then "Immediately pop the current node off the stack of open
                // elements."
                "hr" => {
                    self.pop_open_option_and_optgroup();
                    let _ = self.insert_html_element(name, attributes)?;
                    self.pop_current();
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "select""
                // "Parse error."
                // "If the stack of open elements does not have a select element in select
                // scope, ignore the token. (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements until a select
                // element has been popped from the stack. Reset the insertion mode
                // appropriately."
                "select" => {
                    self.parse_error(token);
                    let _ = self.close_select();
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is one of: "input", "keygen", "textarea""
                // "Parse error."
                // "If the stack of open elements does not have a select element in select
                // scope, ignore the token. (fragment case)"
                // "Otherwise: ... Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.parse_error(token);
                    Ok(if self.close_select() {
                        Step::Reprocess
                    } else {
                        Step::Done
                    })
                }

                // "A start tag whose tag name is one of: "script", "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "script" | "template" => Ok(Step::Using(InsertionMode::InHead)),

                _ => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                // "First, if the current node is an option element, and the node immediately
                // before it in the stack of open elements is an optgroup element, then pop the
                // current node from the stack of open elements."
                // "If the current node is an optgroup element, then pop that node from the
                // stack of open elements. Otherwise, this is a parse error; ignore the token."
                "optgroup" => {
                    let below_is_optgroup = self
                        .open_elements
                        .len()
                        .checked_sub(2)
                        .and_then(|index| self.open_elements.get(index))
                        .is_some_and(|entry| entry.is("optgroup"));
                    if self.open_elements.current_is("option") && below_is_optgroup {
                        self.pop_current();
                    }
                    if self.open_elements.current_is("optgroup") {
                        self.pop_current();
                    } else {
                        self.parse_error(token);
                    }
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is "option""
                // "If the current node is an option element, then pop that node from the stack
                // of open elements. Otherwise, this is a parse error; ignore the token."
                "option" => {
                    if self.open_elements.current_is("option") {
                        self.pop_current();
                    } else {
                        self.parse_error(token);
                    }
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is "select""
                // "If the stack of open elements does not have a select element in select
                // scope, this is a parse error; ignore the token. (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements until a select
                // element has been popped from the stack. Reset the insertion mode
                // appropriately."
                "select" => {
                    if !self.close_select() {
                        self.parse_error(token);
                    }
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "template" => Ok(Step::Using(InsertionMode::InHead)),

                _ => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => Ok(Step::Using(InsertionMode::InBody)),

            // "A DOCTYPE token"
            // "Anything else"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error(token);
                Ok(Step::Done)
            }
        }
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(crate) fn handle_in_select_in_table_mode(
        &mut self,
        token: &Token,
    ) -> Result<Step, ParserError> {
        match token {
            // "A start tag whose tag name is one of: "caption", "table", "tbody", "tfoot",
            // "thead", "tr", "td", "th""
            // "Parse error."
            // "Pop elements from the stack of open elements until a select element has been
            // popped from the stack."
            // "Reset the insertion mode appropriately."
            // "Reprocess the token."
            Token::StartTag { name, .. } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error(token);
                self.open_elements.pop_until("select");
                self.reset_insertion_mode_appropriately();
                Ok(Step::Reprocess)
            }

            // "An end tag whose tag name is one of: "caption", "table", "tbody", "tfoot",
            // "thead", "tr", "td", "th""
            // "Parse error."
            // "If the stack of open elements does not have an element in table scope that is an
            // HTML element with the same tag name as that of the token, then ignore the token."
            // "Otherwise: ... Reprocess the token."
            Token::EndTag { name } if TABLE_TAGS.contains(&name.as_str()) => {
                self.parse_error(token);
                if !self.open_elements.has_name_in_scope(name, ScopeKind::Table) {
                    return Ok(Step::Done);
                }
                self.open_elements.pop_until("select");
                self.reset_insertion_mode_appropriately();
                Ok(Step::Reprocess)
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion mode."
            _ => Ok(Step::Using(InsertionMode::InSelect)),
        }
    }

    fn pop_open_option_and_optgroup(&mut self) {
        if self.open_elements.current_is("option") {
            self.pop_current();
        }
        if self.open_elements.current_is("optgroup") {
            self.pop_current();
        }
    }

    /// Pop up to and including the open select and reset the insertion mode.
    /// Returns false when no select is in select scope.
    fn close_select(&mut self) -> bool {
        if !self
            .open_elements
            .has_name_in_scope("select", ScopeKind::Select)
        {
            return false;
        }
        self.open_elements.pop_until("select");
        self.reset_insertion_mode_appropriately();
        true
    }
}
