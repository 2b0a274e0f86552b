//! Everything after the body, and framesets.
//!
//! [§ 13.2.6.4.19 "after body"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
//! through [§ 13.2.6.4.23 "after after frameset"](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode).

use thicket_dom::NodeId;

use crate::error::ParserError;
use crate::parser::core::{
    HTMLParser, InsertionMode, LOG_TARGET, Step, is_whitespace, split_leading_whitespace,
};
use crate::token::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(crate) fn handle_after_body_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED
            // (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { data } => Ok(self
                .leading_whitespace_in_body(data)
                .unwrap_or_else(|| self.after_body_anything_else(token))),

            // "A comment token"
            // "Insert a comment as the last child of the first element in the stack of open
            // elements (the html element)."
            Token::Comment { data } => {
                let html = self
                    .open_elements
                    .first()
                    .map_or(NodeId::ROOT, |entry| entry.node);
                self.insert_comment_in(html, data);
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

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing algorithm, this is
            // a parse error; ignore the token. (fragment case)"
            // "Otherwise, switch the insertion mode to "after after body"."
            Token::EndTag { name } if name == "html" => {
                if self.is_fragment() {
                    self.parse_error(token);
                } else {
                    self.switch_to(InsertionMode::AfterAfterBody);
                }
                Ok(Step::Done)
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => Ok(Step::Done),

            _ => Ok(self.after_body_anything_else(token)),
        }
    }

    /// "Anything else"
    /// "Parse error. Switch the insertion mode to "in body" and reprocess the token."
    fn after_body_anything_else(&mut self, token: &Token) -> Step {
        self.parse_error(token);
        self.switch_to(InsertionMode::InBody);
        Step::Reprocess
    }

    /// Process the leading whitespace of a run with the "in body" rules.
    /// Returns the step for the rest, or `None` when the run does not start
    /// with whitespace.
    fn leading_whitespace_in_body(&mut self, data: &str) -> Option<Step> {
        let (whitespace, rest) = split_leading_whitespace(data);
        if whitespace.is_empty() {
            return None;
        }
        self.in_body_characters(whitespace);
        Some(if rest.is_empty() {
            Step::Done
        } else {
            Step::ReprocessWith(Token::character(rest))
        })
    }

    /// Keep only the whitespace of a run, reporting one parse error if
    /// anything else had to be dropped. Frameset documents carry no text.
    fn frameset_whitespace(&mut self, token: &Token, data: &str) -> String {
        let whitespace: String = data.chars().filter(|&c| is_whitespace(c)).collect();
        if whitespace.len() != data.len() {
            self.parse_error(token);
        }
        whitespace
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(crate) fn handle_in_frameset_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED
            // (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } => {
                let whitespace = self.frameset_whitespace(token, data);
                self.insert_characters(&whitespace);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => return Ok(Step::Using(InsertionMode::InBody)),

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token."
                "frameset" => {
                    let _ = self.insert_html_element(name, attributes)?;
                }

                // "A start tag whose tag name is "frame""
                // "Insert an HTML element for the token. Immediately pop the current node off the
                // stack of open elements."
                "frame" => {
                    let _ = self.insert_html_element(name, attributes)?;
                    self.pop_current();
                }

                // "A start tag whose tag name is "noframes""
                // "Process the token using the rules for the "in head" insertion mode."
                "noframes" => return Ok(Step::Using(InsertionMode::InHead)),

                _ => self.parse_error(token),
            },

            // "An end tag whose tag name is "frameset""
            // "If the current node is the root html element, then this is a parse error; ignore
            // the token. (fragment case)"
            // "Otherwise, pop the current node from the stack of open elements."
            // "If the parser was not created as part of the HTML fragment parsing algorithm
            // (fragment case), and the current node is no longer a frameset element, then switch
            // the insertion mode to "after frameset"."
            Token::EndTag { name } if name == "frameset" => {
                if self.open_elements.len() <= 1 {
                    self.parse_error(token);
                } else {
                    self.pop_current();
                    if !self.is_fragment() && !self.open_elements.current_is("frameset") {
                        self.switch_to(InsertionMode::AfterFrameset);
                    }
                }
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a parse error."
            // "Note: The current node can only be the root html element in the fragment case."
            // "Stop parsing."
            Token::EndOfFile => {
                // Token input cannot get here: the "</frameset>" rule above
                // never pops the root element.
                if self.open_elements.is_empty() {
                    log::warn!(
                        target: LOG_TARGET,
                        "end of file in frameset with no open elements"
                    );
                    return Err(ParserError::EofInFramesetWithoutRoot);
                }
                if self.open_elements.len() > 1 {
                    self.parse_error(token);
                }
            }

            // "A DOCTYPE token"
            // "Anything else"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } | Token::EndTag { .. } => self.parse_error(token),
        }
        Ok(Step::Done)
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(crate) fn handle_after_frameset_mode(
        &mut self,
        token: &Token,
    ) -> Result<Step, ParserError> {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED
            // (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } => {
                let whitespace = self.frameset_whitespace(token, data);
                self.insert_characters(&whitespace);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                return Ok(Step::Using(InsertionMode::InBody));
            }

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. } if name == "noframes" => {
                return Ok(Step::Using(InsertionMode::InHead));
            }

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            Token::EndTag { name } if name == "html" => {
                self.switch_to(InsertionMode::AfterAfterFrameset);
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {}

            // "A DOCTYPE token"
            // "Anything else"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } | Token::StartTag { .. } | Token::EndTag { .. } => {
                self.parse_error(token);
            }
        }
        Ok(Step::Done)
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(crate) fn handle_after_after_body_mode(
        &mut self,
        token: &Token,
    ) -> Result<Step, ParserError> {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_in(NodeId::ROOT, data);
                Ok(Step::Done)
            }

            // "A DOCTYPE token"
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Doctype { .. } => Ok(Step::Using(InsertionMode::InBody)),
            Token::StartTag { name, .. } if name == "html" => Ok(Step::Using(InsertionMode::InBody)),

            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED
            // (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { data } => Ok(self
                .leading_whitespace_in_body(data)
                .unwrap_or_else(|| self.after_body_anything_else(token))),

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => Ok(Step::Done),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess the token."
            _ => Ok(self.after_body_anything_else(token)),
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(crate) fn handle_after_after_frameset_mode(
        &mut self,
        token: &Token,
    ) -> Result<Step, ParserError> {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment_in(NodeId::ROOT, data),

            // "A DOCTYPE token"
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Doctype { .. } => return Ok(Step::Using(InsertionMode::InBody)),
            Token::StartTag { name, .. } if name == "html" => {
                return Ok(Step::Using(InsertionMode::InBody));
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED
            // (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { data } => {
                let whitespace = self.frameset_whitespace(token, data);
                self.in_body_characters(&whitespace);
            }

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. } if name == "noframes" => {
                return Ok(Step::Using(InsertionMode::InHead));
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {}

            // "Anything else"
            // "Parse error. Ignore the token."
            Token::StartTag { .. } | Token::EndTag { .. } => self.parse_error(token),
        }
        Ok(Step::Done)
    }
}
