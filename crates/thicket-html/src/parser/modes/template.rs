//! [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)

use crate::error::ParserError;
use crate::parser::core::{HTMLParser, InsertionMode, Step};
use crate::token::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(crate) fn handle_in_template_mode(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token"
            // "A comment token"
            // "A DOCTYPE token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                Ok(Step::Using(InsertionMode::InBody))
            }

            Token::StartTag { name, .. } => Ok(match name.as_str() {
                // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link",
                // "meta", "noframes", "script", "style", "template", "title""
                // "Process the token using the rules for the "in head" insertion mode."
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => Step::Using(InsertionMode::InHead),

                // "A start tag whose tag name is one of: "caption", "colgroup", "tbody",
                // "tfoot", "thead""
                "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.switch_template_mode(InsertionMode::InTable)
                }

                // "A start tag whose tag name is "col""
                "col" => self.switch_template_mode(InsertionMode::InColumnGroup),

                // "A start tag whose tag name is "tr""
                "tr" => self.switch_template_mode(InsertionMode::InTableBody),

                // "A start tag whose tag name is one of: "td", "th""
                "td" | "th" => self.switch_template_mode(InsertionMode::InRow),

                // "Any other start tag"
                _ => self.switch_template_mode(InsertionMode::InBody),
            }),

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::EndTag { name } if name == "template" => Ok(Step::Using(InsertionMode::InHead)),

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {
                self.parse_error(token);
                Ok(Step::Done)
            }

            // "An end-of-file token"
            // "If there is no template element on the stack of open elements, then stop
            // parsing. (fragment case)"
            // "Otherwise, this is a parse error."
            // "Pop elements from the stack of open elements until a template element has been
            // popped from the stack."
            // "Clear the list of active formatting elements up to the last marker."
            // "Pop the current template insertion mode off the stack of template insertion
            // modes."
            // "Reset the insertion mode appropriately."
            // "Reprocess the token."
            Token::EndOfFile => {
                if !self.template_is_open() {
                    return Ok(Step::Done);
                }
                self.parse_error(token);
                self.open_elements.pop_until("template");
                self.leave_template();
                Ok(Step::Reprocess)
            }
        }
    }

    /// "Pop the current template insertion mode off the stack of template insertion modes.
    /// Push `mode` onto the stack of template insertion modes so that it is the new current
    /// template insertion mode. Switch the insertion mode to `mode`, and reprocess the token."
    fn switch_template_mode(&mut self, mode: InsertionMode) -> Step {
        let _ = self.template_insertion_modes.pop();
        self.template_insertion_modes.push(mode);
        self.switch_to(mode);
        Step::Reprocess
    }
}
