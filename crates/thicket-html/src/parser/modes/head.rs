//! The head section.
//!
//! [§ 13.2.6.4.4 "in head"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead),
//! [§ 13.2.6.4.5 "in head noscript"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript),
//! [§ 13.2.6.4.6 "after head"](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)

use crate::error::ParserError;
use crate::parser::core::{HTMLParser, InsertionMode, Step, split_leading_whitespace};
use crate::token::Token;

/// Start tags that "after head" hands to the "in head" rules after
/// reopening the head element.
const HEAD_CONTENT_TAGS: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

impl HTMLParser {
    /// Insert the leading whitespace of a character run. Returns the step
    /// for the rest, or `None` when the run starts with something else.
    pub(crate) fn insert_leading_whitespace(&mut self, data: &str) -> Option<Step> {
        let (whitespace, rest) = split_leading_whitespace(data);
        if whitespace.is_empty() {
            return None;
        }
        self.insert_characters(whitespace);
        Some(if rest.is_empty() {
            Step::Done
        } else {
            Step::ReprocessWith(Token::character(rest))
        })
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(crate) fn handle_in_head_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } => match self.insert_leading_whitespace(data) {
                Some(step) => Ok(step),
                None => Ok(self.in_head_anything_else()),
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

                // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link""
                // "Insert an HTML element for the token. Immediately pop the current node off the
                // stack of open elements."
                // "Acknowledge the token's self-closing flag, if it is set."
                //
                // "A start tag whose tag name is "meta"": the same, with charset
                // handling left to the caller.
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    let _ = self.insert_html_element(name, attributes)?;
                    self.pop_current();
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "title""
                // "Follow the generic RCDATA element parsing algorithm."
                //
                // "A start tag whose tag name is "noframes", "style""
                // "Follow the generic raw text element parsing algorithm."
                "title" | "noframes" | "style" => self.parse_text_element(name, attributes),

                // "A start tag whose tag name is "noscript", if the scripting flag is disabled"
                // "Insert an HTML element for the token."
                // "Switch the insertion mode to "in head noscript"."
                "noscript" => {
                    let _ = self.insert_html_element(name, attributes)?;
                    self.switch_to(InsertionMode::InHeadNoscript);
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "script""
                // Insert at the adjusted insertion location, push it, then
                // "Let the original insertion mode be the current insertion mode."
                // "Switch the insertion mode to "text"."
                "script" => self.parse_text_element(name, attributes),

                // "A start tag whose tag name is "template""
                "template" => {
                    // STEP 1: "Insert an HTML element for the token."
                    let _ = self.insert_html_element(name, attributes)?;
                    // STEP 2: "Insert a marker at the end of the list of active formatting elements."
                    self.active_formatting_elements.insert_marker();
                    // STEP 3: "Set the frameset-ok flag to "not ok"."
                    self.frameset_ok = false;
                    // STEP 4: "Switch the insertion mode to "in template"."
                    self.switch_to(InsertionMode::InTemplate);
                    // STEP 5: "Push "in template" onto the stack of template insertion modes"
                    self.template_insertion_modes.push(InsertionMode::InTemplate);
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }

                _ => Ok(self.in_head_anything_else()),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "head""
                // "Pop the current node (which will be the head element) off the stack of open elements."
                // "Switch the insertion mode to "after head"."
                "head" => {
                    self.pop_current();
                    self.switch_to(InsertionMode::AfterHead);
                    Ok(Step::Done)
                }

                // "An end tag whose tag name is one of: "body", "html", "br""
                // "Act as described in the "anything else" entry below."
                "body" | "html" | "br" => Ok(self.in_head_anything_else()),

                // "An end tag whose tag name is "template""
                "template" => {
                    // "If there is no template element on the stack of open
                    // elements, then this is a parse error; ignore the token."
                    if !self.template_is_open() {
                        self.parse_error(token);
                        return Ok(Step::Done);
                    }
                    // STEP 1: "Generate all implied end tags thoroughly."
                    self.generate_all_implied_end_tags_thoroughly();
                    // STEP 2: "If the current node is not a template element, then this is a parse error."
                    if !self.open_elements.current_is("template") {
                        self.parse_error(token);
                    }
                    // STEP 3: "Pop elements from the stack of open elements until a template
                    //         element has been popped from the stack."
                    self.open_elements.pop_until("template");
                    // STEP 4-6
                    self.leave_template();
                    Ok(Step::Done)
                }

                // "Any other end tag"
                // "Parse error. Ignore the token."
                _ => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }
            },

            Token::EndOfFile => Ok(self.in_head_anything_else()),
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "Anything else":
    /// "Pop the current node (which will be the head element) off the stack of open elements."
    /// "Switch the insertion mode to "after head"."
    /// "Reprocess the token."
    fn in_head_anything_else(&mut self) -> Step {
        self.pop_current();
        self.switch_to(InsertionMode::AfterHead);
        Step::Reprocess
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(crate) fn handle_in_head_noscript_mode(
        &mut self,
        token: &Token,
    ) -> Result<Step, ParserError> {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error(token);
                Ok(Step::Done)
            }

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => Ok(Step::Using(InsertionMode::InBody)),

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the stack of open
            // elements; the new current node will be a head element."
            // "Switch the insertion mode to "in head"."
            Token::EndTag { name } if name == "noscript" => {
                self.pop_current();
                self.switch_to(InsertionMode::InHead);
                Ok(Step::Done)
            }

            // "A character token that is one of U+0009 ... or U+0020 SPACE"
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Character { data } => match self.insert_leading_whitespace(data) {
                Some(step) => Ok(step),
                None => Ok(self.in_head_noscript_anything_else(token)),
            },

            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound", "link", "meta",
            // "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Comment { .. } => Ok(Step::Using(InsertionMode::InHead)),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                Ok(Step::Using(InsertionMode::InHead))
            }

            // "An end tag whose tag name is "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if name == "br" => Ok(self.in_head_noscript_anything_else(token)),

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.parse_error(token);
                Ok(Step::Done)
            }
            Token::EndTag { .. } => {
                self.parse_error(token);
                Ok(Step::Done)
            }

            _ => Ok(self.in_head_noscript_anything_else(token)),
        }
    }

    /// "Anything else"
    /// "Parse error."
    /// "Pop the current node (which will be a noscript element) from the stack of open
    /// elements; the new current node will be a head element."
    /// "Switch the insertion mode to "in head"."
    /// "Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) -> Step {
        self.parse_error(token);
        self.pop_current();
        self.switch_to(InsertionMode::InHead);
        Step::Reprocess
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(crate) fn handle_after_head_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token that is one of U+0009 ... or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } => match self.insert_leading_whitespace(data) {
                Some(step) => Ok(step),
                None => self.after_head_anything_else(),
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

                // "A start tag whose tag name is "body""
                // "Insert an HTML element for the token."
                // "Set the frameset-ok flag to "not ok"."
                // "Switch the insertion mode to "in body"."
                "body" => {
                    let _ = self.insert_html_element(name, attributes)?;
                    self.frameset_ok = false;
                    self.switch_to(InsertionMode::InBody);
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token."
                // "Switch the insertion mode to "in frameset"."
                "frameset" => {
                    let _ = self.insert_html_element(name, attributes)?;
                    self.switch_to(InsertionMode::InFrameset);
                    Ok(Step::Done)
                }

                // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link",
                // "meta", "noframes", "script", "style", "template", "title""
                // "Parse error."
                // "Push the node pointed to by the head element pointer onto the stack of open
                // elements."
                // "Process the token using the rules for the "in head" insertion mode."
                // "Remove the node pointed to by the head element pointer from the stack of
                // open elements. (It might not be the current node at this point.)"
                tag if HEAD_CONTENT_TAGS.contains(&tag) => {
                    self.parse_error(token);
                    if let Some(head) = self.head_element_pointer {
                        self.push_open_element(head);
                        self.head_reopened = true;
                    }
                    Ok(Step::Using(InsertionMode::InHead))
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }

                _ => self.after_head_anything_else(),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "template" => Ok(Step::Using(InsertionMode::InHead)),

                // "An end tag whose tag name is one of: "body", "html", "br""
                // "Act as described in the "anything else" entry below."
                "body" | "html" | "br" => self.after_head_anything_else(),

                // "Any other end tag"
                // "Parse error. Ignore the token."
                _ => {
                    self.parse_error(token);
                    Ok(Step::Done)
                }
            },

            Token::EndOfFile => self.after_head_anything_else(),
        }
    }

    /// "Anything else"
    /// "Insert an HTML element for a "body" start tag token with no attributes."
    /// "Switch the insertion mode to "in body"."
    /// "Reprocess the current token."
    fn after_head_anything_else(&mut self) -> Result<Step, ParserError> {
        let _ = self.insert_implied_element("body")?;
        self.switch_to(InsertionMode::InBody);
        Ok(Step::Reprocess)
    }
}
