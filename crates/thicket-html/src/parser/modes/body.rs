//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
//! and [§ 13.2.6.4.8 the "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata).

use std::borrow::Cow;

use thicket_dom::{Namespace, NodeId, NodeType, QuirksMode};

use crate::error::ParserError;
use crate::parser::core::{HTMLParser, InsertionMode, Step, is_all_whitespace};
use crate::parser::open_elements::ScopeKind;
use crate::token::{Attribute, Token, TokenKind};

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Start tags that close an open `p` and otherwise just open an element.
const BLOCK_START_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "search",
    "section",
    "summary",
    "ul",
];

/// End tags closed with "generate implied end tags, pop until".
const BLOCK_END_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "button",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "listing",
    "main",
    "menu",
    "nav",
    "ol",
    "pre",
    "search",
    "section",
    "summary",
    "ul",
];

/// "a start tag whose tag name is one of: "b", "big", "code", "em", "font",
/// "i", "s", "small", "strike", "strong", "tt", "u""
const FORMATTING_START_TAGS: &[&str] = &[
    "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong", "tt", "u",
];

/// "An end tag whose tag name is one of: "a", "b", "big", "code", "em",
/// "font", "i", "nobr", "s", "small", "strike", "strong", "tt", "u""
const FORMATTING_END_TAGS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

impl HTMLParser {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(crate) fn handle_in_body_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            Token::Character { data } => {
                self.in_body_characters(data);
                Ok(Step::Done)
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
                name,
                self_closing,
                attributes,
            } => self.in_body_start_tag(token, name, *self_closing, attributes),

            Token::EndTag { name } => self.in_body_end_tag(token, name),

            // "An end-of-file token"
            // "If the stack of template insertion modes is not empty, then process the token
            // using the rules for the "in template" insertion mode."
            // "Otherwise, ... Stop parsing."
            Token::EndOfFile => {
                if self.template_insertion_modes.is_empty() {
                    Ok(Step::Done)
                } else {
                    Ok(Step::Using(InsertionMode::InTemplate))
                }
            }
        }
    }

    /// Character tokens under the "in body" rules.
    ///
    /// "A character token that is U+0000 NULL"
    /// "Parse error. Ignore the token."
    ///
    /// "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
    /// U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
    /// "Reconstruct the active formatting elements, if any. Insert the token's character."
    ///
    /// "Any other character token"
    /// "Reconstruct the active formatting elements, if any. Insert the token's character.
    /// Set the frameset-ok flag to "not ok"."
    pub(crate) fn in_body_characters(&mut self, data: &str) {
        let data = if data.contains('\0') {
            self.parse_error_kind(TokenKind::Character);
            Cow::Owned(data.replace('\0', ""))
        } else {
            Cow::Borrowed(data)
        };
        if data.is_empty() {
            return;
        }

        self.reconstruct_active_formatting_elements();
        self.insert_characters(&data);
        if !is_all_whitespace(&data) {
            self.frameset_ok = false;
        }
    }

    fn in_body_start_tag(
        &mut self,
        token: &Token,
        name: &str,
        self_closing: bool,
        attributes: &[Attribute],
    ) -> Result<Step, ParserError> {
        match name {
            // "A start tag whose tag name is "html""
            // "Parse error."
            // "If there is a template element on the stack of open elements, then ignore the
            // token."
            // "Otherwise, for each attribute on the token, check to see if the attribute is
            // already present on the top element of the stack of open elements. If it is not,
            // add the attribute and its corresponding value to that element."
            "html" => {
                self.parse_error(token);
                if !self.template_is_open()
                    && let Some(html) = self.open_elements.first().map(|entry| entry.node)
                {
                    self.merge_attributes(html, attributes);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link",
            // "meta", "noframes", "script", "style", "template", "title""
            // "Process the token using the rules for the "in head" insertion mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "template" | "title" => return Ok(Step::Using(InsertionMode::InHead)),

            // "A start tag whose tag name is "body""
            // "Parse error."
            // "If the stack of open elements has only one node on it, or if the second element
            // on the stack of open elements is not a body element, or if there is a template
            // element on the stack of open elements, then ignore the token. (fragment case or
            // there is a template element on the stack)"
            // "Otherwise, set the frameset-ok flag to "not ok"; then, for each attribute on the
            // token, check to see if the attribute is already present on the body element (the
            // second element) on the stack of open elements, and if it is not, add the attribute
            // and its corresponding value to that element."
            "body" => {
                self.parse_error(token);
                if let Some(body) = self.second_body_element()
                    && !self.template_is_open()
                {
                    self.frameset_ok = false;
                    self.merge_attributes(body, attributes);
                }
            }

            // "A start tag whose tag name is "frameset""
            // "Parse error."
            // "If the stack of open elements has only one node on it, or if the second element
            // on the stack of open elements is not a body element, then ignore the token."
            // "If the frameset-ok flag is set to "not ok", ignore the token."
            // "Otherwise, run the following steps:"
            // "1. Remove the second element on the stack of open elements from its parent node,
            //  if it has one.
            //  2. Pop all the nodes from the bottom of the stack of open elements, from the
            //  current node up to, but not including, the root html element.
            //  3. Insert an HTML element for the token.
            //  4. Switch the insertion mode to "in frameset"."
            "frameset" => {
                self.parse_error(token);
                if let Some(body) = self.second_body_element()
                    && self.frameset_ok
                {
                    self.tree.detach(body);
                    self.open_elements.truncate(1);
                    let _ = self.insert_html_element(name, attributes)?;
                    self.switch_to(InsertionMode::InFrameset);
                }
            }

            // "A start tag whose tag name is one of: "address", "article", "aside",
            // "blockquote", "center", "details", "dialog", "dir", "div", "dl", "fieldset",
            // "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav", "ol",
            // "p", "search", "section", "summary", "ul""
            // "If the stack of open elements has a p element in button scope, then close a p
            // element."
            // "Insert an HTML element for the token."
            tag if BLOCK_START_TAGS.contains(&tag) => {
                self.close_p_in_button_scope(token);
                let _ = self.insert_html_element(name, attributes)?;
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            // "If the stack of open elements has a p element in button scope, then close a p
            // element."
            // "If the current node is an HTML element whose tag name is one of "h1", "h2",
            // "h3", "h4", "h5", or "h6", then this is a parse error; pop the current node off
            // the stack of open elements."
            // "Insert an HTML element for the token."
            tag if HEADINGS.contains(&tag) => {
                self.close_p_in_button_scope(token);
                if self.open_elements.current_is_one_of(HEADINGS) {
                    self.parse_error(token);
                    self.pop_current();
                }
                let _ = self.insert_html_element(name, attributes)?;
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            // "If the stack of open elements has a p element in button scope, then close a p
            // element."
            // "Insert an HTML element for the token."
            // "If the next token is a U+000A LINE FEED (LF) character token, then ignore that
            // token and move on to the next one. (Newlines at the start of pre blocks are
            // ignored as an authoring convenience.)"
            // "Set the frameset-ok flag to "not ok"."
            "pre" | "listing" => {
                self.close_p_in_button_scope(token);
                let _ = self.insert_html_element(name, attributes)?;
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            // "If the form element pointer is not null, and there is no template element on
            // the stack of open elements, then this is a parse error; ignore the token."
            // "Otherwise: If the stack of open elements has a p element in button scope, then
            // close a p element. Insert an HTML element for the token, and, if there is no
            // template element on the stack of open elements, set the form element pointer to
            // point to the element created."
            "form" => {
                let template_open = self.template_is_open();
                if self.form_element_pointer.is_some() && !template_open {
                    self.parse_error(token);
                } else {
                    self.close_p_in_button_scope(token);
                    let form = self.insert_html_element(name, attributes)?;
                    if !template_open {
                        self.form_element_pointer = Some(form);
                    }
                }
            }

            // "A start tag whose tag name is "li""
            // "A start tag whose tag name is one of: "dd", "dt""
            "li" | "dd" | "dt" => {
                // STEP 1: "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // STEP 2-5: close an open item of the same kind.
                let kinds: &[&str] = if name == "li" { &["li"] } else { &["dd", "dt"] };
                self.close_open_list_item(token, kinds);
                // STEP 6: "Done: If the stack of open elements has a p element in button
                //         scope, then close a p element."
                self.close_p_in_button_scope(token);
                // STEP 7: "Finally, insert an HTML element for the token."
                let _ = self.insert_html_element(name, attributes)?;
            }

            // "A start tag whose tag name is "plaintext""
            // "If the stack of open elements has a p element in button scope, then close a p
            // element."
            // "Insert an HTML element for the token."
            "plaintext" => {
                self.close_p_in_button_scope(token);
                let _ = self.insert_html_element(name, attributes)?;
            }

            // "A start tag whose tag name is "button""
            // "1. If the stack of open elements has a button element in scope, then run these
            //  substeps: Parse error. Generate implied end tags. Pop elements from the stack of
            //  open elements until a button element has been popped from the stack.
            //  2. Reconstruct the active formatting elements, if any.
            //  3. Insert an HTML element for the token.
            //  4. Set the frameset-ok flag to "not ok"."
            "button" => {
                if self
                    .open_elements
                    .has_name_in_scope("button", ScopeKind::Default)
                {
                    self.parse_error(token);
                    self.generate_implied_end_tags();
                    self.open_elements.pop_until("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes)?;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            // "If the list of active formatting elements contains an a element between the end
            // of the list and the last marker on the list (or the start of the list if there is
            // no marker on the list), then this is a parse error; run the adoption agency
            // algorithm for the token, then remove that element from the list of active
            // formatting elements and the stack of open elements if the adoption agency
            // algorithm didn't already remove it (it might not have if the element is not in
            // table scope)."
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Push onto the list of active formatting
            // elements that element."
            "a" => {
                if let Some(index) = self.active_formatting_elements.find_after_last_marker("a") {
                    self.parse_error(token);
                    let stale = self.active_formatting_elements.node_at(index);
                    self.run_adoption_agency(token, "a");
                    if let Some(stale) = stale {
                        self.active_formatting_elements.remove(stale);
                        let _ = self.open_elements.remove(stale);
                    }
                }
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(name, attributes)?;
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em", "font", "i", "s",
            // "small", "strike", "strong", "tt", "u""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Push onto the list of active formatting
            // elements that element."
            tag if FORMATTING_START_TAGS.contains(&tag) => {
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(name, attributes)?;
            }

            // "A start tag whose tag name is "nobr""
            // "Reconstruct the active formatting elements, if any."
            // "If the stack of open elements has a nobr element in scope, then this is a parse
            // error; run the adoption agency algorithm for the token, then once again
            // reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Push onto the list of active formatting
            // elements that element."
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.open_elements.has_name_in_scope("nobr", ScopeKind::Default) {
                    self.parse_error(token);
                    self.run_adoption_agency(token, "nobr");
                    self.reconstruct_active_formatting_elements();
                }
                self.insert_formatting_element(name, attributes)?;
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Insert a marker at the end of the list of active formatting elements."
            // "Set the frameset-ok flag to "not ok"."
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes)?;
                self.active_formatting_elements.insert_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            // "If the Document is not set to quirks mode, and the stack of open elements has a
            // p element in button scope, then close a p element."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in table"."
            "table" => {
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_in_button_scope(token);
                }
                let _ = self.insert_html_element(name, attributes)?;
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed", "img", "keygen",
            // "wbr""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Immediately pop the current node off the
            // stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "Set the frameset-ok flag to "not ok"."
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes)?;
                self.pop_current();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Immediately pop the current node off the
            // stack of open elements."
            // "If the token does not have an attribute with the name "type", or if it does,
            // but that attribute's value is not an ASCII case-insensitive match for the string
            // "hidden", then: set the frameset-ok flag to "not ok"."
            "input" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes)?;
                self.pop_current();
                if !is_hidden_input(attributes) {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the current node off the
            // stack of open elements."
            "param" | "source" | "track" => {
                let _ = self.insert_html_element(name, attributes)?;
                self.pop_current();
            }

            // "A start tag whose tag name is "hr""
            // "If the stack of open elements has a p element in button scope, then close a p
            // element."
            // "Insert an HTML element for the token. Immediately pop the current node off the
            // stack of open elements."
            // "Set the frameset-ok flag to "not ok"."
            "hr" => {
                self.close_p_in_button_scope(token);
                let _ = self.insert_html_element(name, attributes)?;
                self.pop_current();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess it. (Don't ask.)"
            "image" => {
                self.parse_error(token);
                return Ok(Step::ReprocessWith(Token::StartTag {
                    name: "img".to_string(),
                    self_closing,
                    attributes: attributes.to_vec(),
                }));
            }

            // "A start tag whose tag name is "textarea""
            // "1. Insert an HTML element for the token.
            //  2. If the next token is a U+000A LINE FEED (LF) character token, then ignore that
            //  token and move on to the next one.
            //  3. Switch the tokenizer to the RCDATA state.
            //  4. Let the original insertion mode be the current insertion mode.
            //  5. Set the frameset-ok flag to "not ok".
            //  6. Switch the insertion mode to "text"."
            "textarea" => {
                let step = self.parse_text_element(name, attributes)?;
                self.skip_next_newline = true;
                self.frameset_ok = false;
                return Ok(step);
            }

            // "A start tag whose tag name is "xmp""
            // "If the stack of open elements has a p element in button scope, then close a p
            // element."
            // "Reconstruct the active formatting elements, if any."
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            "xmp" => {
                self.close_p_in_button_scope(token);
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                return self.parse_text_element(name, attributes);
            }

            // "A start tag whose tag name is "iframe""
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            "iframe" => {
                self.frameset_ok = false;
                return self.parse_text_element(name, attributes);
            }

            // "A start tag whose tag name is "noembed""
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => return self.parse_text_element(name, attributes),

            // "A start tag whose tag name is "select""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "If the insertion mode is one of "in table", "in caption", "in table body", "in
            // row", or "in cell", then switch the insertion mode to "in select in table".
            // Otherwise, switch the insertion mode to "in select"."
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes)?;
                self.frameset_ok = false;
                let in_table = matches!(
                    self.insertion_mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                );
                self.switch_to(if in_table {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                });
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current node off the
            // stack of open elements."
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            "optgroup" | "option" => {
                if self.open_elements.current_is("option") {
                    self.pop_current();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes)?;
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "If the stack of open elements has a ruby element in scope, then generate implied
            // end tags. If the current node is not now a ruby element, this is a parse error."
            // "Insert an HTML element for the token."
            "rb" | "rtc" => {
                if self.open_elements.has_name_in_scope("ruby", ScopeKind::Default) {
                    self.generate_implied_end_tags();
                    if !self.open_elements.current_is("ruby") {
                        self.parse_error(token);
                    }
                }
                let _ = self.insert_html_element(name, attributes)?;
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            // "If the stack of open elements has a ruby element in scope, then generate implied
            // end tags, except for rtc elements. If the current node is not now a rtc element or
            // a ruby element, this is a parse error."
            // "Insert an HTML element for the token."
            "rp" | "rt" => {
                if self.open_elements.has_name_in_scope("ruby", ScopeKind::Default) {
                    self.generate_implied_end_tags_excluding(Some("rtc"));
                    if !self.open_elements.current_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error(token);
                    }
                }
                let _ = self.insert_html_element(name, attributes)?;
            }

            // "A start tag whose tag name is "math""
            // "A start tag whose tag name is "svg""
            // "Reconstruct the active formatting elements, if any."
            // "Adjust MathML attributes for the token. / Adjust SVG attributes for the token."
            // "Adjust foreign attributes for the token."
            // "Insert a foreign element for the token, with MathML namespace / SVG namespace."
            // "If the token has its self-closing flag set, pop the current node off the stack of
            // open elements and acknowledge the token's self-closing flag."
            "math" | "svg" => {
                self.reconstruct_active_formatting_elements();
                let namespace = if name == "math" {
                    Namespace::MathMl
                } else {
                    Namespace::Svg
                };
                self.insert_foreign_start_tag(namespace, name, self_closing, attributes)?;
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup", "frame",
            // "head", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => self.parse_error(token),

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            //
            // Elements the registry knows as void, and unknown elements written
            // self-closing, are closed straight away.
            _ => {
                self.reconstruct_active_formatting_elements();
                let node = self.insert_html_element(name, attributes)?;
                let mut closes_itself = false;
                if let Some(node) = self.tree.get_mut(node)
                    && let NodeType::Element(element) = &mut node.node_type
                {
                    if self_closing {
                        element.tag.mark_self_closing();
                    }
                    closes_itself = element.tag.is_self_closing();
                }
                if closes_itself {
                    self.pop_current();
                }
            }
        }
        Ok(Step::Done)
    }

    fn in_body_end_tag(&mut self, token: &Token, name: &str) -> Result<Step, ParserError> {
        match name {
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            "template" => return Ok(Step::Using(InsertionMode::InHead)),

            // "An end tag whose tag name is "body""
            // "If the stack of open elements does not have a body element in scope, this is a
            // parse error; ignore the token."
            // "Switch the insertion mode to "after body"."
            "body" => {
                if self.open_elements.has_name_in_scope("body", ScopeKind::Default) {
                    self.switch_to(InsertionMode::AfterBody);
                } else {
                    self.parse_error(token);
                }
            }

            // "An end tag whose tag name is "html""
            // "If the stack of open elements does not have a body element in scope, this is a
            // parse error; ignore the token."
            // "Switch the insertion mode to "after body"."
            // "Reprocess the token."
            "html" => {
                if self.open_elements.has_name_in_scope("body", ScopeKind::Default) {
                    self.switch_to(InsertionMode::AfterBody);
                    return Ok(Step::Reprocess);
                }
                self.parse_error(token);
            }

            // "An end tag whose tag name is one of: "address", "article", "aside",
            // "blockquote", "button", "center", "details", "dialog", "dir", "div", "dl",
            // "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
            // "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul""
            // "If the stack of open elements does not have an element in scope that is an HTML
            // element with the same tag name as that of the token, then this is a parse error;
            // ignore the token."
            // "Otherwise: Generate implied end tags. If the current node is not an HTML element
            // with the same tag name as that of the token, then this is a parse error. Pop
            // elements from the stack of open elements until an HTML element with the same tag
            // name as the token has been popped from the stack."
            tag if BLOCK_END_TAGS.contains(&tag) => {
                let _ = self.close_element_in_scope(token, name, ScopeKind::Default);
            }

            // "An end tag whose tag name is "form""
            "form" => self.in_body_form_end_tag(token),

            // "An end tag whose tag name is "p""
            // "If the stack of open elements does not have a p element in button scope, then
            // this is a parse error; insert an HTML element for a "p" start tag token with no
            // attributes."
            // "Close a p element."
            "p" => {
                if !self.open_elements.has_name_in_scope("p", ScopeKind::Button) {
                    self.parse_error(token);
                    let _ = self.insert_implied_element("p")?;
                }
                self.close_p_element(token);
            }

            // "An end tag whose tag name is "li""
            // "If the stack of open elements does not have an li element in list item scope,
            // then this is a parse error; ignore the token."
            // "Otherwise: Generate implied end tags, except for li elements. If the current
            // node is not an li element, then this is a parse error. Pop elements from the stack
            // of open elements until an li element has been popped from the stack."
            "li" => {
                let _ = self.close_element_in_scope(token, name, ScopeKind::ListItem);
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            // Same as "li", with the default scope.
            "dd" | "dt" => {
                let _ = self.close_element_in_scope(token, name, ScopeKind::Default);
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            // "If the stack of open elements does not have an element in scope that is an HTML
            // element and whose tag name is one of "h1", "h2", "h3", "h4", "h5", or "h6", then
            // this is a parse error; ignore the token."
            // "Otherwise: Generate implied end tags. If the current node is not an HTML element
            // with the same tag name as that of the token, then this is a parse error. Pop
            // elements from the stack of open elements until an HTML element whose tag name is
            // one of "h1", "h2", "h3", "h4", "h5", or "h6" has been popped from the stack."
            tag if HEADINGS.contains(&tag) => {
                if self.open_elements.has_in_scope(HEADINGS, ScopeKind::Default) {
                    self.generate_implied_end_tags();
                    if !self.open_elements.current_is(name) {
                        self.parse_error(token);
                    }
                    self.open_elements.pop_until_one_of(HEADINGS);
                } else {
                    self.parse_error(token);
                }
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code", "em", "font", "i",
            // "nobr", "s", "small", "strike", "strong", "tt", "u""
            // "Run the adoption agency algorithm for the token."
            tag if FORMATTING_END_TAGS.contains(&tag) => self.run_adoption_agency(token, name),

            // "An end tag token whose tag name is one of: "applet", "marquee", "object""
            // "If the stack of open elements does not have an element in scope that is an HTML
            // element with the same tag name as that of the token, then this is a parse error;
            // ignore the token."
            // "Otherwise: Generate implied end tags. If the current node is not an HTML element
            // with the same tag name as that of the token, then this is a parse error. Pop
            // elements from the stack of open elements until an HTML element with the same tag
            // name as the token has been popped from the stack. Clear the list of active
            // formatting elements up to the last marker."
            "applet" | "marquee" | "object" => {
                if self.close_element_in_scope(token, name, ScopeKind::Default) {
                    self.active_formatting_elements.clear_to_last_marker();
                }
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as described in the next
            // entry; i.e. act as if this was a "br" start tag token with no attributes, rather
            // than the end tag token that it actually is."
            "br" => {
                self.parse_error(token);
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_implied_element("br")?;
                self.pop_current();
                self.frameset_ok = false;
            }

            // A stray frameset end tag has nothing to close once content has
            // started; it is dropped without an error.
            "frameset" => {}

            // "Any other end tag"
            _ => self.any_other_end_tag(token, name),
        }
        Ok(Step::Done)
    }

    /// "An end tag whose tag name is "form""
    fn in_body_form_end_tag(&mut self, token: &Token) {
        // "If there is no template element on the stack of open elements, then run these
        // substeps:"
        if !self.template_is_open() {
            // "1. Let node be the element that the form element pointer is set to, or null if
            //  it is not set to an element.
            //  2. Set the form element pointer to null."
            let node = self.form_element_pointer.take();

            // "3. If node is null or if the stack of open elements does not have node in scope,
            //  then this is a parse error; return and ignore the token."
            let Some(node) = node.filter(|&node| {
                self.open_elements
                    .has_node_in_scope(node, ScopeKind::Default)
            }) else {
                self.parse_error(token);
                return;
            };

            // "4. Generate implied end tags.
            //  5. If the current node is not node, then this is a parse error.
            //  6. Remove node from the stack of open elements."
            self.generate_implied_end_tags();
            if self.open_elements.current_node() != Some(node) {
                self.parse_error(token);
            }
            let _ = self.open_elements.remove(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then run these
        // substeps instead:" the same as any other block end tag.
        let _ = self.close_element_in_scope(token, "form", ScopeKind::Default);
    }

    /// "If the stack of open elements does not have an element in scope that
    /// is an HTML element with the same tag name as that of the token, then
    /// this is a parse error; ignore the token. Otherwise: generate implied
    /// end tags, except for elements with the token's tag name; if the
    /// current node is not such an element, this is a parse error; pop until
    /// one has been popped."
    ///
    /// Returns whether an element was closed.
    fn close_element_in_scope(&mut self, token: &Token, name: &str, scope: ScopeKind) -> bool {
        if !self.open_elements.has_name_in_scope(name, scope) {
            self.parse_error(token);
            return false;
        }
        self.generate_implied_end_tags_excluding(Some(name));
        if !self.open_elements.current_is(name) {
            self.parse_error(token);
        }
        self.open_elements.pop_until(name);
        true
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag"
    /// "1. Initialize node to be the current node (the bottommost node of the stack).
    ///  2. Loop: If node is an HTML element with the same tag name as the token, then:
    ///     Generate implied end tags, except for HTML elements with the same tag name as the
    ///     token. If node is not the current node, then this is a parse error. Pop all the
    ///     nodes from the current node up to node, including node, then stop these steps.
    ///  3. Otherwise, if node is in the special category, then this is a parse error; ignore
    ///     the token, and return.
    ///  4. Set node to the previous entry in the stack of open elements.
    ///  5. Return to the step labeled loop."
    pub(crate) fn any_other_end_tag(&mut self, token: &Token, name: &str) {
        for index in (0..self.open_elements.len()).rev() {
            let Some(entry) = self.open_elements.get(index) else {
                return;
            };

            if entry.is(name) {
                let node = entry.node;
                self.generate_implied_end_tags_excluding(Some(name));
                if self.open_elements.current_node() != Some(node) {
                    self.parse_error(token);
                }
                self.open_elements.pop_until_node(node);
                return;
            }

            if entry.category.is_special() {
                self.parse_error(token);
                return;
            }
        }
    }

    /// Steps 2-5 of the "li" and "dd"/"dt" start tag rules: walk down the
    /// stack and close an open item of the same kind, unless a special
    /// element other than `address`, `div` or `p` comes first.
    fn close_open_list_item(&mut self, token: &Token, kinds: &[&str]) {
        for index in (0..self.open_elements.len()).rev() {
            let Some(entry) = self.open_elements.get(index) else {
                return;
            };

            if entry.is_one_of(kinds) {
                let name = entry.name.clone();
                self.generate_implied_end_tags_excluding(Some(&name));
                if !self.open_elements.current_is(&name) {
                    self.parse_error(token);
                }
                self.open_elements.pop_until(&name);
                return;
            }

            if entry.category.is_special() && !entry.is_one_of(&["address", "div", "p"]) {
                return;
            }
        }
    }

    /// The element under `html` when it is a `body`.
    fn second_body_element(&self) -> Option<NodeId> {
        self.open_elements
            .get(1)
            .filter(|entry| entry.is("body"))
            .map(|entry| entry.node)
    }

    /// Copy attributes that `node` does not have yet.
    fn merge_attributes(&mut self, node: NodeId, attributes: &[Attribute]) {
        if let Some(element) = self.tree.get_mut(node)
            && let NodeType::Element(element) = &mut element.node_type
        {
            for attr in attributes {
                let _ = element.attrs.insert_if_absent(attr.clone());
            }
        }
    }

    /// Insert an HTML element and push it onto the list of active formatting
    /// elements.
    fn insert_formatting_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
    ) -> Result<(), ParserError> {
        let node = self.insert_html_element(name, attributes)?;
        if let Some(element) = self.tree.as_element(node).cloned() {
            self.active_formatting_elements.push(node, element);
        }
        Ok(())
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(crate) fn handle_text_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => {
                self.insert_characters(data);
                Ok(Step::Done)
            }

            // "An end-of-file token"
            // "Parse error."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and reprocess the token."
            Token::EndOfFile => {
                self.parse_error(token);
                self.pop_current();
                self.return_to_original_mode();
                Ok(Step::Reprocess)
            }

            // "An end tag whose tag name is "script""
            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                self.pop_current();
                self.return_to_original_mode();
                Ok(Step::Done)
            }

            // A tokenizer in a text state emits nothing else.
            _ => Ok(Step::Done),
        }
    }

    pub(crate) fn return_to_original_mode(&mut self) {
        let mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
        self.switch_to(mode);
    }
}

/// Whether a start tag has `type=hidden`, ignoring ASCII case.
pub(crate) fn is_hidden_input(attributes: &[Attribute]) -> bool {
    attributes
        .iter()
        .any(|attr| attr.name == "type" && attr.value.eq_ignore_ascii_case("hidden"))
}
