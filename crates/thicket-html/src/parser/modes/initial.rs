//! The modes before any content is seen.
//!
//! [§ 13.2.6.4.1 "initial"](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode),
//! [§ 13.2.6.4.2 "before html"](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode),
//! [§ 13.2.6.4.3 "before head"](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)

use thicket_dom::{DoctypeData, Namespace, NodeId, QuirksMode};

use crate::error::ParserError;
use crate::parser::core::{HTMLParser, InsertionMode, Step, split_leading_whitespace};
use crate::token::Token;

/// Leading whitespace is dropped in these modes. Returns the step to take
/// when the run is not only whitespace, or `None` for "anything else".
fn skip_leading_whitespace(data: &str) -> Option<Step> {
    let (whitespace, rest) = split_leading_whitespace(data);
    if rest.is_empty() {
        Some(Step::Done)
    } else if whitespace.is_empty() {
        None
    } else {
        Some(Step::ReprocessWith(Token::character(rest)))
    }
}

impl HTMLParser {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(crate) fn handle_initial_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } => match skip_leading_whitespace(data) {
                Some(step) => Ok(step),
                None => Ok(self.initial_anything_else()),
            },

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_in(NodeId::ROOT, data);
                Ok(Step::Done)
            }

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                let is_html = name
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case("html"));

                // "If the DOCTYPE token's name is not "html", or the token's
                // public identifier is not missing, or the token's system
                // identifier is neither missing nor "about:legacy-compat", then
                // there is a parse error."
                if !is_html
                    || public_identifier.is_some()
                    || system_identifier
                        .as_deref()
                        .is_some_and(|system| system != "about:legacy-compat")
                {
                    self.parse_error(token);
                }

                // "Append a DocumentType node to the Document node, with its
                // name set to the name given in the DOCTYPE token, or the empty
                // string if the name was missing"
                self.insert_doctype(DoctypeData {
                    name: name.clone().unwrap_or_default(),
                    public_id: public_identifier.clone().unwrap_or_default(),
                    system_id: system_identifier.clone().unwrap_or_default(),
                });

                // "Then, if the document is not an iframe srcdoc document, and
                // the parser cannot change the mode flag is false, and the
                // DOCTYPE token matches one of the conditions in the following
                // list, then set the Document to quirks mode"
                if *force_quirks || !is_html {
                    self.tree.set_quirks_mode(QuirksMode::Quirks);
                }

                // "Then, switch the insertion mode to "before html"."
                self.switch_to(InsertionMode::BeforeHtml);
                Ok(Step::Done)
            }

            _ => Ok(self.initial_anything_else()),
        }
    }

    /// "Anything else": switch to "before html" and reprocess. A document
    /// without a doctype stays in no-quirks mode.
    fn initial_anything_else(&mut self) -> Step {
        self.switch_to(InsertionMode::BeforeHtml);
        Step::Reprocess
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(crate) fn handle_before_html_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error(token);
                Ok(Step::Done)
            }

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_in(NodeId::ROOT, data);
                Ok(Step::Done)
            }

            // "A character token that is one of U+0009 ... or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } => match skip_leading_whitespace(data) {
                Some(step) => Ok(step),
                None => self.before_html_anything_else(),
            },

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document object.
            // Put this element in the stack of open elements."
            // "Switch the insertion mode to "before head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let html = self.create_element(name, Namespace::Html, attributes)?;
                self.tree.append_child(NodeId::ROOT, html);
                self.push_open_element(html);
                self.switch_to(InsertionMode::BeforeHead);
                Ok(Step::Done)
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_html_anything_else()
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {
                self.parse_error(token);
                Ok(Step::Done)
            }

            _ => self.before_html_anything_else(),
        }
    }

    /// "Anything else"
    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess
    /// the token."
    fn before_html_anything_else(&mut self) -> Result<Step, ParserError> {
        let html = self.create_element("html", Namespace::Html, &[])?;
        self.tree.append_child(NodeId::ROOT, html);
        self.push_open_element(html);
        self.switch_to(InsertionMode::BeforeHead);
        Ok(Step::Reprocess)
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(crate) fn handle_before_head_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token that is one of U+0009 ... or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } => match skip_leading_whitespace(data) {
                Some(step) => Ok(step),
                None => self.before_head_anything_else(),
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

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => Ok(Step::Using(InsertionMode::InBody)),

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                let head = self.insert_html_element(name, attributes)?;
                self.head_element_pointer = Some(head);
                self.switch_to(InsertionMode::InHead);
                Ok(Step::Done)
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_head_anything_else()
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {
                self.parse_error(token);
                Ok(Step::Done)
            }

            _ => self.before_head_anything_else(),
        }
    }

    /// "Anything else"
    /// "Insert an HTML element for a "head" start tag token with no attributes.
    /// Set the head element pointer to the newly created head element. Switch
    /// the insertion mode to "in head". Reprocess the current token."
    fn before_head_anything_else(&mut self) -> Result<Step, ParserError> {
        let head = self.insert_implied_element("head")?;
        self.head_element_pointer = Some(head);
        self.switch_to(InsertionMode::InHead);
        Ok(Step::Reprocess)
    }
}
