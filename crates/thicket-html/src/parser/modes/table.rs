//! Table content.
//!
//! [§ 13.2.6.4.9 "in table"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
//! through [§ 13.2.6.4.15 "in cell"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell).

use std::mem;

use crate::error::ParserError;
use crate::parser::core::{HTMLParser, InsertionMode, Step, is_all_whitespace};
use crate::parser::open_elements::ScopeKind;
use crate::token::{Token, TokenKind};

use super::body::is_hidden_input;

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];
const CELLS: &[&str] = &["td", "th"];

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(crate) fn handle_in_table_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token, if the current node is table, tbody, template, tfoot, thead,
            // or tr element"
            // "Let the pending table character tokens be an empty list of tokens."
            // "Let the original insertion mode be the current insertion mode."
            // "Switch the insertion mode to "in table text" and reprocess the token."
            Token::Character { .. }
                if self.open_elements.current_is_one_of(&[
                    "table", "tbody", "template", "tfoot", "thead", "tr",
                ]) =>
            {
                self.pending_table_text.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.switch_to(InsertionMode::InTableText);
                Ok(Step::Reprocess)
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
                Ok(Step::Done)
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error(token);
                Ok(Step::Done)
            }

            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "caption""
                // "Clear the stack back to a table context. Insert a marker at the end of the
                // list of active formatting elements. Insert an HTML element for the token, then
                // switch the insertion mode to "in caption"."
                "caption" => {
                    self.clear_stack_back_to_table_context();
                    self.active_formatting_elements.insert_marker();
                    let _ = self.insert_html_element(name, attributes)?;
                    self.switch_to(InsertionMode::InCaption);
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "colgroup""
                // "Clear the stack back to a table context. Insert an HTML element for the
                // token, then switch the insertion mode to "in column group"."
                "colgroup" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(name, attributes)?;
                    self.switch_to(InsertionMode::InColumnGroup);
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "col""
                // "Clear the stack back to a table context. Insert an HTML element for a
                // "colgroup" start tag token with no attributes, then switch the insertion mode
                // to "in column group". Reprocess the current token."
                "col" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_implied_element("colgroup")?;
                    self.switch_to(InsertionMode::InColumnGroup);
                    Ok(Step::Reprocess)
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
                // "Clear the stack back to a table context. Insert an HTML element for the
                // token, then switch the insertion mode to "in table body"."
                "tbody" | "tfoot" | "thead" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(name, attributes)?;
                    self.switch_to(InsertionMode::InTableBody);
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                // "Clear the stack back to a table context. Insert an HTML element for a
                // "tbody" start tag token with no attributes, then switch the insertion mode to
                // "in table body". Reprocess the current token."
                "td" | "th" | "tr" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_implied_element("tbody")?;
                    self.switch_to(InsertionMode::InTableBody);
                    Ok(Step::Reprocess)
                }

                // "A start tag whose tag name is "table""
                // "Parse error."
                // "If the stack of open elements does not have a table element in table scope,
                // ignore the token."
                // "Otherwise: Pop elements from this stack until a table element has been
                // popped from the stack. Reset the insertion mode appropriately. Reprocess the
                // token."
                "table" => {
                    self.parse_error(token);
                    if self.open_elements.has_name_in_scope("table", ScopeKind::Table) {
                        self.open_elements.pop_until("table");
                        self.reset_insertion_mode_appropriately();
                        Ok(Step::Reprocess)
                    } else {
                        Ok(Step::Done)
                    }
                }

                // "A start tag whose tag name is one of: "style", "script", "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "style" | "script" | "template" => Ok(Step::Using(InsertionMode::InHead)),

                // "A start tag whose tag name is "input""
                // "If the token does not have an attribute with the name "type", or if it does,
                // but that attribute's value is not an ASCII case-insensitive match for the
                // string "hidden", then: act as described in the "anything else" entry below."
                // "Otherwise: Parse error. Insert an HTML element for the token. Pop that input
                // element off the stack of open elements."
                "input" if is_hidden_input(attributes) => {
                    self.parse_error(token);
                    let _ = self.insert_html_element(name, attributes)?;
                    self.pop_current();
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "form""
                // "Parse error."
                // "If there is a template element on the stack of open elements, or if the form
                // element pointer is not null, ignore the token."
                // "Otherwise: Insert an HTML element for the token, and set the form element
                // pointer to point to the element created. Pop that form element off the stack
                // of open elements."
                "form" => {
                    self.parse_error(token);
                    if !self.template_is_open() && self.form_element_pointer.is_none() {
                        let form = self.insert_html_element(name, attributes)?;
                        self.form_element_pointer = Some(form);
                        self.pop_current();
                    }
                    Ok(Step::Done)
                }

                _ => Ok(self.in_table_anything_else(token)),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "table""
                // "If the stack of open elements does not have a table element in table scope,
                // this is a parse error; ignore the token."
                // "Otherwise: Pop elements from this stack until a table element has been
                // popped from the stack. Reset the insertion mode appropriately."
                "table" => {
                    if self.open_elements.has_name_in_scope("table", ScopeKind::Table) {
                        self.open_elements.pop_until("table");
                        self.reset_insertion_mode_appropriately();
                    } else {
                        self.parse_error(token);
                    }
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is one of: "body", "caption", "col", "colgroup",
                // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "template" => Ok(Step::Using(InsertionMode::InHead)),

                _ => Ok(self.in_table_anything_else(token)),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => Ok(Step::Using(InsertionMode::InBody)),

            Token::Character { .. } => Ok(self.in_table_anything_else(token)),
        }
    }

    /// "Anything else"
    /// "Parse error. Enable foster parenting, process the token using the rules for the "in
    /// body" insertion mode, and then disable foster parenting."
    ///
    /// The dispatcher turns foster parenting back off once the token is done.
    fn in_table_anything_else(&mut self, token: &Token) -> Step {
        self.parse_error(token);
        self.foster_parenting = true;
        Step::Using(InsertionMode::InBody)
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(crate) fn handle_in_table_text_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        // "A character token that is U+0000 NULL"
        // "Parse error. Ignore the token."
        // "Any other character token"
        // "Append the character token to the pending table character tokens list."
        if let Token::Character { data } = token {
            if data.contains('\0') {
                self.parse_error(token);
                self.pending_table_text
                    .extend(data.chars().filter(|&c| c != '\0'));
            } else {
                self.pending_table_text.push_str(data);
            }
            return Ok(Step::Done);
        }

        // "Anything else"
        // "If any of the tokens in the pending table character tokens list are character tokens
        // that are not ASCII whitespace, then this is a parse error: reprocess the character
        // tokens in the pending table character tokens list using the rules given in the
        // "anything else" entry in the "in table" insertion mode."
        // "Otherwise, insert the characters given by the pending table character tokens list."
        // "Switch the insertion mode to the original insertion mode and reprocess the token."
        self.flush_pending_table_text();
        self.return_to_original_mode();
        Ok(Step::Reprocess)
    }

    /// Insert the buffered table text. A run with anything but whitespace in
    /// it is reported once and foster parented.
    fn flush_pending_table_text(&mut self) {
        let text = mem::take(&mut self.pending_table_text);
        if text.is_empty() {
            return;
        }

        if is_all_whitespace(&text) {
            self.insert_characters(&text);
        } else {
            self.parse_error_kind(TokenKind::Character);
            self.foster_parenting = true;
            self.in_body_characters(&text);
            self.foster_parenting = false;
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(crate) fn handle_in_caption_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name } if name == "caption" => {
                let _ = self.close_caption(token);
                Ok(Step::Done)
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup", "tbody",
            // "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            // "If the stack of open elements does not have a caption element in table scope,
            // this is a parse error; ignore the token. (fragment case)"
            // "Otherwise: ... close the caption ... Reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                Ok(self.close_caption_and_reprocess(token))
            }
            Token::EndTag { name } if name == "table" => Ok(self.close_caption_and_reprocess(token)),

            // "An end tag whose tag name is one of: "body", "col", "colgroup", "html",
            // "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.parse_error(token);
                Ok(Step::Done)
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => Ok(Step::Using(InsertionMode::InBody)),
        }
    }

    fn close_caption_and_reprocess(&mut self, token: &Token) -> Step {
        if self.close_caption(token) {
            Step::Reprocess
        } else {
            Step::Done
        }
    }

    /// "If the stack of open elements does not have a caption element in table scope, this is
    /// a parse error; ignore the token. (fragment case)"
    /// "Otherwise: Generate implied end tags. Now, if the current node is not a caption
    /// element, then this is a parse error. Pop elements from this stack until a caption
    /// element has been popped from the stack. Clear the list of active formatting elements
    /// up to the last marker. Switch the insertion mode to "in table"."
    ///
    /// Returns whether a caption was closed.
    fn close_caption(&mut self, token: &Token) -> bool {
        if !self.open_elements.has_name_in_scope("caption", ScopeKind::Table) {
            self.parse_error(token);
            return false;
        }
        self.generate_implied_end_tags();
        if !self.open_elements.current_is("caption") {
            self.parse_error(token);
        }
        self.open_elements.pop_until("caption");
        self.active_formatting_elements.clear_to_last_marker();
        self.switch_to(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    pub(crate) fn handle_in_column_group_mode(
        &mut self,
        token: &Token,
    ) -> Result<Step, ParserError> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED
            // (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } => match self.insert_leading_whitespace(data) {
                Some(step) => Ok(step),
                None => Ok(self.in_column_group_anything_else(token)),
            },

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
                Ok(Step::Done)
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error(token);
                Ok(Step::Done)
            }

            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => Ok(Step::Using(InsertionMode::InBody)),

                // "A start tag whose tag name is "col""
                // "Insert an HTML element for the token. Immediately pop the current node off
                // the stack of open elements."
                "col" => {
                    let _ = self.insert_html_element(name, attributes)?;
                    self.pop_current();
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "template" => Ok(Step::Using(InsertionMode::InHead)),

                _ => Ok(self.in_column_group_anything_else(token)),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "colgroup""
                // "If the current node is not a colgroup element, then this is a parse error;
                // ignore the token."
                // "Otherwise, pop the current node from the stack of open elements. Switch the
                // insertion mode to "in table"."
                "colgroup" => {
                    if self.open_elements.current_is("colgroup") {
                        self.pop_current();
                        self.switch_to(InsertionMode::InTable);
                    } else {
                        self.parse_error(token);
                    }
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is "col""
                // "Parse error. Ignore the token."
                "col" => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "template" => Ok(Step::Using(InsertionMode::InHead)),

                _ => Ok(self.in_column_group_anything_else(token)),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => Ok(Step::Using(InsertionMode::InBody)),
        }
    }

    /// "Anything else"
    /// "If the current node is not a colgroup element, then this is a parse error; ignore the
    /// token."
    /// "Otherwise, pop the current node from the stack of open elements."
    /// "Switch the insertion mode to "in table"."
    /// "Reprocess the token."
    fn in_column_group_anything_else(&mut self, token: &Token) -> Step {
        if !self.open_elements.current_is("colgroup") {
            self.parse_error(token);
            return Step::Done;
        }
        self.pop_current();
        self.switch_to(InsertionMode::InTable);
        Step::Reprocess
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    pub(crate) fn handle_in_table_body_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "tr""
                // "Clear the stack back to a table body context. Insert an HTML element for the
                // token, then switch the insertion mode to "in row"."
                "tr" => {
                    self.clear_stack_back_to_table_body_context();
                    let _ = self.insert_html_element(name, attributes)?;
                    self.switch_to(InsertionMode::InRow);
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is one of: "th", "td""
                // "Parse error."
                // "Clear the stack back to a table body context. Insert an HTML element for a
                // "tr" start tag token with no attributes, then switch the insertion mode to
                // "in row". Reprocess the current token."
                "th" | "td" => {
                    self.parse_error(token);
                    self.clear_stack_back_to_table_body_context();
                    let _ = self.insert_implied_element("tr")?;
                    self.switch_to(InsertionMode::InRow);
                    Ok(Step::Reprocess)
                }

                // "A start tag whose tag name is one of: "caption", "col", "colgroup",
                // "tbody", "tfoot", "thead""
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    Ok(self.close_table_section(token))
                }

                // "Anything else"
                // "Process the token using the rules for the "in table" insertion mode."
                _ => Ok(Step::Using(InsertionMode::InTable)),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
                // "If the stack of open elements does not have an element in table scope that
                // is an HTML element with the same tag name as the token, this is a parse
                // error; ignore the token."
                // "Otherwise: Clear the stack back to a table body context. Pop the current
                // node from the stack of open elements. Switch the insertion mode to "in
                // table"."
                "tbody" | "tfoot" | "thead" => {
                    if self.open_elements.has_name_in_scope(name, ScopeKind::Table) {
                        self.clear_stack_back_to_table_body_context();
                        self.pop_current();
                        self.switch_to(InsertionMode::InTable);
                    } else {
                        self.parse_error(token);
                    }
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is "table""
                "table" => Ok(self.close_table_section(token)),

                // "An end tag whose tag name is one of: "body", "caption", "col", "colgroup",
                // "html", "td", "th", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr" => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }

                _ => Ok(Step::Using(InsertionMode::InTable)),
            },

            _ => Ok(Step::Using(InsertionMode::InTable)),
        }
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot element in table
    /// scope, this is a parse error; ignore the token."
    /// "Otherwise: Clear the stack back to a table body context. Pop the current node from the
    /// stack of open elements. Switch the insertion mode to "in table". Reprocess the token."
    fn close_table_section(&mut self, token: &Token) -> Step {
        if !self.open_elements.has_in_scope(TABLE_SECTIONS, ScopeKind::Table) {
            self.parse_error(token);
            return Step::Done;
        }
        self.clear_stack_back_to_table_body_context();
        self.pop_current();
        self.switch_to(InsertionMode::InTable);
        Step::Reprocess
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    pub(crate) fn handle_in_row_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is one of: "th", "td""
                // "Clear the stack back to a table row context. Insert an HTML element for the
                // token, then switch the insertion mode to "in cell". Insert a marker at the end
                // of the list of active formatting elements."
                "th" | "td" => {
                    self.clear_stack_back_to_table_row_context();
                    let _ = self.insert_html_element(name, attributes)?;
                    self.switch_to(InsertionMode::InCell);
                    self.active_formatting_elements.insert_marker();
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is one of: "caption", "col", "colgroup",
                // "tbody", "tfoot", "thead", "tr""
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr" => {
                    Ok(self.close_row_and_reprocess(token))
                }

                _ => Ok(Step::Using(InsertionMode::InTable)),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "tr""
                "tr" => {
                    let _ = self.close_row(token);
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is "table""
                "table" => Ok(self.close_row_and_reprocess(token)),

                // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
                // "If the stack of open elements does not have an element in table scope that
                // is an HTML element with the same tag name as the token, this is a parse
                // error; ignore the token."
                // "If the stack of open elements does not have a tr element in table scope,
                // ignore the token."
                // "Otherwise: close the row. Reprocess the token."
                "tbody" | "tfoot" | "thead" => {
                    if !self.open_elements.has_name_in_scope(name, ScopeKind::Table) {
                        self.parse_error(token);
                        return Ok(Step::Done);
                    }
                    if !self.open_elements.has_name_in_scope("tr", ScopeKind::Table) {
                        return Ok(Step::Done);
                    }
                    Ok(self.close_row_and_reprocess(token))
                }

                // "An end tag whose tag name is one of: "body", "caption", "col", "colgroup",
                // "html", "td", "th""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }

                _ => Ok(Step::Using(InsertionMode::InTable)),
            },

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => Ok(Step::Using(InsertionMode::InTable)),
        }
    }

    fn close_row_and_reprocess(&mut self, token: &Token) -> Step {
        if self.close_row(token) {
            Step::Reprocess
        } else {
            Step::Done
        }
    }

    /// "If the stack of open elements does not have a tr element in table scope, this is a
    /// parse error; ignore the token."
    /// "Otherwise: Clear the stack back to a table row context. Pop the current node (which
    /// will be a tr element) from the stack of open elements. Switch the insertion mode to "in
    /// table body"."
    ///
    /// Returns whether a row was closed.
    fn close_row(&mut self, token: &Token) -> bool {
        if !self.open_elements.has_name_in_scope("tr", ScopeKind::Table) {
            self.parse_error(token);
            return false;
        }
        self.clear_stack_back_to_table_row_context();
        self.pop_current();
        self.switch_to(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    pub(crate) fn handle_in_cell_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is one of: "td", "th""
                // "If the stack of open elements does not have an element in table scope that
                // is an HTML element with the same tag name as that of the token, then this is
                // a parse error; ignore the token."
                // "Otherwise: Generate implied end tags. Now, if the current node is not an
                // HTML element with the same tag name as the token, then this is a parse error.
                // Pop elements from the stack of open elements until an HTML element with the
                // same tag name as the token has been popped from the stack. Clear the list of
                // active formatting elements up to the last marker. Switch the insertion mode
                // to "in row"."
                "td" | "th" => {
                    if !self.open_elements.has_name_in_scope(name, ScopeKind::Table) {
                        self.parse_error(token);
                        return Ok(Step::Done);
                    }
                    self.generate_implied_end_tags();
                    if !self.open_elements.current_is(name) {
                        self.parse_error(token);
                    }
                    self.open_elements.pop_until(name);
                    self.active_formatting_elements.clear_to_last_marker();
                    self.switch_to(InsertionMode::InRow);
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is one of: "body", "caption", "col", "colgroup",
                // "html""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is one of: "table", "tbody", "tfoot", "thead",
                // "tr""
                // "If the stack of open elements does not have an element in table scope that
                // is an HTML element with the same tag name as that of the token, then this is
                // a parse error; ignore the token."
                // "Otherwise, close the cell and reprocess the token."
                "table" | "tbody" | "tfoot" | "thead" | "tr" => {
                    if self.open_elements.has_name_in_scope(name, ScopeKind::Table) {
                        self.close_the_cell(token);
                        Ok(Step::Reprocess)
                    } else {
                        self.parse_error(token);
                        Ok(Step::Done)
                    }
                }

                _ => Ok(Step::Using(InsertionMode::InBody)),
            },

            // "A start tag whose tag name is one of: "caption", "col", "colgroup", "tbody",
            // "td", "tfoot", "th", "thead", "tr""
            // "Assert: The stack of open elements has a td or th element in table scope."
            // "Close the cell and reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                if self.open_elements.has_in_scope(CELLS, ScopeKind::Table) {
                    self.close_the_cell(token);
                    Ok(Step::Reprocess)
                } else {
                    self.parse_error(token);
                    Ok(Step::Done)
                }
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => Ok(Step::Using(InsertionMode::InBody)),
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "1. Generate implied end tags.
    ///  2. If the current node is not now a td element or a th element, then this is a parse
    ///  error.
    ///  3. Pop elements from the stack of open elements until a td element or a th element has
    ///  been popped from the stack.
    ///  4. Clear the list of active formatting elements up to the last marker.
    ///  5. Switch the insertion mode to "in row"."
    fn close_the_cell(&mut self, token: &Token) {
        self.generate_implied_end_tags();
        if !self.open_elements.current_is_one_of(CELLS) {
            self.parse_error(token);
        }
        self.open_elements.pop_until_one_of(CELLS);
        self.active_formatting_elements.clear_to_last_marker();
        self.switch_to(InsertionMode::InRow);
    }

    /// "When the steps above require the UA to clear the stack back to a table context, it
    /// means that the UA must, while the current node is not a table, template, or html
    /// element, pop elements from the stack of open elements."
    fn clear_stack_back_to_table_context(&mut self) {
        self.open_elements
            .pop_until_current_is_one_of(&["table", "template", "html"]);
    }

    /// "... while the current node is not a tbody, tfoot, thead, template, or html element,
    /// pop elements from the stack of open elements."
    fn clear_stack_back_to_table_body_context(&mut self) {
        self.open_elements
            .pop_until_current_is_one_of(&["tbody", "tfoot", "thead", "template", "html"]);
    }

    /// "... while the current node is not a tr, template, or html element, pop elements from
    /// the stack of open elements."
    fn clear_stack_back_to_table_row_context(&mut self) {
        self.open_elements
            .pop_until_current_is_one_of(&["tr", "template", "html"]);
    }
}
