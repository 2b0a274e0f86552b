//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

use thicket_dom::Namespace;

use crate::error::ParserError;
use crate::parser::core::{HTMLParser, Step, is_whitespace};
use crate::parser::foreign_content::{
    adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes,
    is_breakout_tag, is_html_integration_point, is_mathml_text_integration_point,
};
use crate::token::{Attribute, Token};

impl HTMLParser {
    /// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(crate) fn handle_foreign_content(&mut self, token: &Token) -> Result<Step, ParserError> {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED
            // (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the token's character."
            // "Any other character token"
            // "Insert the token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                if data.contains('\0') {
                    self.parse_error(token);
                    self.insert_characters(&data.replace('\0', "\u{FFFD}"));
                } else {
                    self.insert_characters(data);
                }
                if data.chars().any(|c| c != '\0' && !is_whitespace(c)) {
                    self.frameset_ok = false;
                }
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

            // "A start tag whose tag name is one of: "b", "big", "blockquote", ... "var""
            // "A start tag whose tag name is "font", if the token has any attributes named
            // "color", "face", or "size""
            // "Parse error."
            // "While the current node is not a MathML text integration point, an HTML
            // integration point, or an element in the HTML namespace, pop elements from the
            // stack of open elements."
            // "Reprocess the token according to the rules given in the section corresponding
            // to the current insertion mode in HTML content."
            Token::StartTag {
                name, attributes, ..
            } if is_breakout_tag(name, attributes) => {
                self.parse_error(token);
                self.pop_to_html_content();
                Ok(Step::Using(self.insertion_mode))
            }

            // "Any other start tag"
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                // "If the adjusted current node is an element in the MathML namespace, adjust
                // MathML attributes for the token."
                // "If the adjusted current node is an element in the SVG namespace, and the
                // token's tag name is one of the ones in the first column of the following
                // table, change the tag name to the name given in the corresponding cell in
                // the second column."
                // "Insert a foreign element for the token, with adjusted current node's
                // namespace and false."
                let namespace = self
                    .adjusted_current_node()
                    .and_then(|node| self.tree.as_element(node))
                    .map_or(Namespace::Html, |element| element.namespace);
                self.insert_foreign_start_tag(namespace, name, *self_closing, attributes)?;
                Ok(Step::Done)
            }

            // "An end tag whose tag name is "script", if the current node is an SVG script
            // element"
            // "Pop the current node off the stack of open elements."
            Token::EndTag { name }
                if name == "script"
                    && self.open_elements.current().is_some_and(|entry| {
                        entry.namespace == Namespace::Svg && entry.name == "script"
                    }) =>
            {
                self.pop_current();
                Ok(Step::Done)
            }

            // "Any other end tag"
            Token::EndTag { name } => Ok(self.foreign_end_tag(token, name)),

            // The dispatcher never hands end of file to these rules.
            Token::EndOfFile => Ok(Step::Using(self.insertion_mode)),
        }
    }

    /// Insert a start tag in the SVG or MathML namespace with its
    /// attributes adjusted, popping it straight away if it was written
    /// self-closing.
    ///
    /// "If the token has its self-closing flag set, pop the current node off
    /// the stack of open elements and acknowledge the token's self-closing
    /// flag."
    pub(crate) fn insert_foreign_start_tag(
        &mut self,
        namespace: Namespace,
        name: &str,
        self_closing: bool,
        attributes: &[Attribute],
    ) -> Result<(), ParserError> {
        let mut attributes = attributes.to_vec();
        match namespace {
            Namespace::MathMl => adjust_mathml_attributes(&mut attributes),
            Namespace::Svg => adjust_svg_attributes(&mut attributes),
            Namespace::Html => {}
        }
        adjust_foreign_attributes(&mut attributes);

        let _ = self.insert_foreign_element(name, namespace, &attributes)?;
        if self_closing {
            self.pop_current();
        }
        Ok(())
    }

    fn pop_to_html_content(&mut self) {
        while let Some(node) = self.open_elements.current_node() {
            let Some(element) = self.tree.as_element(node) else {
                break;
            };
            if element.namespace == Namespace::Html
                || is_mathml_text_integration_point(element)
                || is_html_integration_point(element)
            {
                break;
            }
            self.pop_current();
        }
    }

    /// "Any other end tag"
    /// "1. Initialize node to be the current node (the bottommost node of the stack).
    ///  2. If node's tag name, converted to ASCII lowercase, is not the same as the tag name of
    ///  the token, then this is a parse error.
    ///  3. Loop: If node is the topmost element in the stack of open elements, then return.
    ///  (fragment case)
    ///  4. If node's tag name, converted to ASCII lowercase, is the same as the tag name of the
    ///  token, pop elements from the stack of open elements until node has been popped from
    ///  the stack, and then return.
    ///  5. Set node to the previous entry in the stack of open elements.
    ///  6. If node is not an element in the HTML namespace, return to the step labeled loop.
    ///  7. Otherwise, process the token according to the rules given in the section
    ///  corresponding to the current insertion mode in HTML content."
    fn foreign_end_tag(&mut self, token: &Token, name: &str) -> Step {
        if self
            .open_elements
            .current()
            .is_some_and(|entry| entry.name != name)
        {
            self.parse_error(token);
        }

        let mut index = self.open_elements.len().saturating_sub(1);
        loop {
            if index == 0 {
                return Step::Done;
            }
            let Some(entry) = self.open_elements.get(index) else {
                return Step::Done;
            };
            if entry.name == name {
                let node = entry.node;
                self.open_elements.pop_until_node(node);
                return Step::Done;
            }

            index -= 1;
            if self
                .open_elements
                .get(index)
                .is_some_and(|entry| entry.namespace == Namespace::Html)
            {
                return Step::Using(self.insertion_mode);
            }
        }
    }
}
