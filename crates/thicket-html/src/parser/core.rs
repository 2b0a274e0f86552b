//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! The tree builder state, the token dispatcher, and the algorithms shared
//! between insertion modes. The rules of each mode live under `modes/`.

use std::mem;

use strum_macros::{Display, EnumIter};
use thicket_dom::{DomTree, Namespace, NodeId};

use super::errors::{ParseError, ParseErrors};
use super::foreign_content::{is_html_integration_point, is_mathml_text_integration_point};
use super::formatting::ActiveFormattingElements;
use super::open_elements::{OpenElements, ScopeKind};
use crate::error::ParserError;
use crate::settings::ParseSettings;
use crate::token::{Attribute, Token, TokenKind};

/// Log target for everything the tree builder reports.
pub(crate) const LOG_TARGET: &str = "thicket.tree_builder";

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    ///
    /// Never the current insertion mode. The dispatcher applies these rules
    /// while the adjusted current node is an SVG or MathML element, and
    /// errors raised under them name this mode.
    ForeignContent,
}

/// What the dispatcher does after a set of rules has run.
#[derive(Debug)]
pub(crate) enum Step {
    /// The token has been consumed.
    Done,
    /// "Reprocess the token" in the current insertion mode, which the rules
    /// may have just switched.
    Reprocess,
    /// "Process the token using the rules for the ... insertion mode" without
    /// switching to it.
    Using(InsertionMode),
    /// Reprocess a different token in the current insertion mode, usually the
    /// rest of a character run after its leading whitespace was handled.
    ReprocessWith(Token),
}

/// The result of a parse.
#[derive(Debug)]
pub struct ParseOutput {
    /// The constructed tree. For fragments, the results sit under
    /// [`ParseOutput::fragment_root`].
    pub tree: DomTree,
    /// Recorded parse errors in encounter order, at most
    /// [`ParseSettings::max_errors`] of them.
    pub errors: Vec<ParseError>,
    fragment_root: Option<NodeId>,
}

impl ParseOutput {
    /// The synthetic `html` element that holds a parsed fragment.
    #[must_use]
    pub const fn fragment_root(&self) -> Option<NodeId> {
        self.fragment_root
    }

    /// The top-level nodes produced by the parse: the children of the
    /// fragment root, or of the Document for a full parse.
    #[must_use]
    pub fn fragment_nodes(&self) -> &[NodeId] {
        self.tree
            .children(self.fragment_root.unwrap_or(NodeId::ROOT))
    }
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML tree builder. Consumes a token stream and builds a [`DomTree`].
///
/// ```
/// use thicket_html::{HTMLParser, ParseSettings, Token};
///
/// let tokens = vec![Token::start_tag("p"), Token::character("Hello")];
/// let output = HTMLParser::new(ParseSettings::default())?.parse(tokens)?;
/// assert!(output.tree.body().is_some());
/// # Ok::<(), thicket_html::ParserError>(())
/// ```
pub struct HTMLParser {
    pub(crate) settings: ParseSettings,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(crate) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// Where the "text" and "in table text" modes return to.
    pub(crate) original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1 The stack of template insertion modes](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(crate) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(crate) open_elements: OpenElements,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(crate) active_formatting_elements: ActiveFormattingElements,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(crate) head_element_pointer: Option<NodeId>,

    /// "The form element pointer points to the last form element that was
    /// opened and whose end tag has not yet been seen."
    pub(crate) form_element_pointer: Option<NodeId>,

    /// The fragment context element. Allocated in the arena but never
    /// attached to the tree.
    pub(crate) context_element: Option<NodeId>,

    fragment_root: Option<NodeId>,

    /// `NodeId::ROOT` is the Document node.
    pub(crate) tree: DomTree,

    pub(crate) errors: ParseErrors,

    /// Index of the token being processed, for error positions.
    token_index: usize,

    stopped: bool,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// "The frameset-ok flag is set to "ok" when the parser is created."
    pub(crate) frameset_ok: bool,

    /// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(crate) foster_parenting: bool,

    /// A LF right after `<pre>`, `<listing>` or `<textarea>` is dropped.
    pub(crate) skip_next_newline: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    ///
    /// "The pending table character tokens list"
    pub(crate) pending_table_text: String,

    /// The mode whose rules are running, named in parse errors.
    pub(crate) rules_mode: InsertionMode,

    /// Source spelling of the current start tag when it differs from the
    /// lower-cased name and case is preserved.
    pub(crate) tag_spelling: Option<String>,

    /// The head element was pushed back onto the stack by "after head" and
    /// must be removed once the token is handled.
    pub(crate) head_reopened: bool,
}

impl HTMLParser {
    /// Create a tree builder.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::InvalidFragmentContext`] if a blank fragment
    /// context is configured.
    pub fn new(settings: ParseSettings) -> Result<Self, ParserError> {
        settings.validate()?;

        let errors = ParseErrors::with_capacity(settings.max_errors);
        let context = settings.fragment_context.clone();
        let mut parser = Self {
            settings,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            open_elements: OpenElements::default(),
            active_formatting_elements: ActiveFormattingElements::default(),
            head_element_pointer: None,
            form_element_pointer: None,
            context_element: None,
            fragment_root: None,
            tree: DomTree::new(),
            errors,
            token_index: 0,
            stopped: false,
            frameset_ok: true,
            foster_parenting: false,
            skip_next_newline: false,
            pending_table_text: String::new(),
            rules_mode: InsertionMode::Initial,
            tag_spelling: None,
            head_reopened: false,
        };

        if let Some(context) = context {
            parser.init_fragment(context.trim())?;
        }
        Ok(parser)
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    fn init_fragment(&mut self, context: &str) -> Result<(), ParserError> {
        let name = context.to_ascii_lowercase();
        let namespace = match name.as_str() {
            "svg" => Namespace::Svg,
            "math" => Namespace::MathMl,
            _ => Namespace::Html,
        };

        // STEP 4: "Let root be the result of creating an html element."
        // STEP 5: "Append the element root to the Document node created above."
        let root = self.create_element("html", Namespace::Html, &[])?;
        self.tree.append_child(NodeId::ROOT, root);

        // STEP 6: "Set up the parser's stack of open elements so that it
        //         contains just the single element root."
        self.push_open_element(root);

        // STEP 7: "If the context element is a template element, then push
        //         "in template" onto the stack of template insertion modes"
        if namespace == Namespace::Html && name == "template" {
            self.template_insertion_modes.push(InsertionMode::InTemplate);
        }

        let context_node = self.create_element(&name, namespace, &[])?;
        self.context_element = Some(context_node);
        self.fragment_root = Some(root);

        // STEP 9: "Reset the parser's insertion mode appropriately."
        self.reset_insertion_mode_appropriately();

        // STEP 10: "Set the parser's form element pointer to the nearest node
        //          to the context element that is a form element"
        if namespace == Namespace::Html && name == "form" {
            self.form_element_pointer = Some(context_node);
        }

        log::debug!(
            target: LOG_TARGET,
            "fragment parse in <{name}>, starting in {}",
            self.insertion_mode
        );
        Ok(())
    }

    /// Whether this parser was created for a fragment.
    pub(crate) const fn is_fragment(&self) -> bool {
        self.context_element.is_some()
    }

    /// Run the tree builder over `tokens`.
    ///
    /// An end-of-file token is implied if the stream does not end with one.
    /// Tokens after end of file are ignored.
    ///
    /// # Errors
    ///
    /// Fails on end of file in the "in frameset" mode with nothing open.
    pub fn parse<I>(mut self, tokens: I) -> Result<ParseOutput, ParserError>
    where
        I: IntoIterator<Item = Token>,
    {
        for token in tokens {
            if self.stopped {
                break;
            }
            self.process_token(token)?;
            self.token_index += 1;
        }

        if !self.stopped {
            self.process_token(Token::EndOfFile)?;
        }

        Ok(self.finish())
    }

    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#the-end)
    ///
    /// "Pop all the nodes off the stack of open elements."
    fn finish(mut self) -> ParseOutput {
        self.open_elements.clear();
        self.active_formatting_elements.clear();
        ParseOutput {
            tree: self.tree,
            errors: self.errors.into_vec(),
            fragment_root: self.fragment_root,
        }
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    fn process_token(&mut self, token: Token) -> Result<(), ParserError> {
        let Some(mut token) = self.normalize_token(token) else {
            return Ok(());
        };
        let is_eof = token.is_eof();
        log::trace!(
            target: LOG_TARGET,
            "token {} {token} in {}",
            self.token_index,
            self.insertion_mode
        );

        let mut rules = None;
        loop {
            let step = match rules.take() {
                Some(mode) => self.apply_rules(mode, &token)?,
                None if self.use_foreign_content_rules(&token) => {
                    self.apply_rules(InsertionMode::ForeignContent, &token)?
                }
                None => self.apply_rules(self.insertion_mode, &token)?,
            };

            match step {
                Step::Done => break,
                Step::Using(mode) => rules = Some(mode),
                Step::Reprocess => self.foster_parenting = false,
                Step::ReprocessWith(next) => {
                    self.foster_parenting = false;
                    token = next;
                }
            }
        }

        self.foster_parenting = false;
        if mem::take(&mut self.head_reopened)
            && let Some(head) = self.head_element_pointer
        {
            let _ = self.open_elements.remove(head);
        }
        if is_eof {
            self.stopped = true;
        }
        Ok(())
    }

    /// Lower-case tag names, fold and de-duplicate attribute names, and drop
    /// the newline that directly follows `<pre>`, `<listing>` or `<textarea>`.
    /// A tag with a blank name is a parse error and is dropped.
    fn normalize_token(&mut self, token: Token) -> Option<Token> {
        let skip_newline = mem::take(&mut self.skip_next_newline);
        self.tag_spelling = None;

        if let Token::StartTag { name, .. } | Token::EndTag { name } = &token
            && name.trim().is_empty()
        {
            self.rules_mode = self.insertion_mode;
            self.parse_error(&token);
            return None;
        }

        match token {
            Token::Character { mut data } => {
                if skip_newline && data.starts_with('\n') {
                    let _ = data.remove(0);
                }
                (!data.is_empty()).then_some(Token::Character { data })
            }
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                let lower = name.to_ascii_lowercase();
                if self.settings.case_sensitive_tags && lower != name {
                    self.tag_spelling = Some(name);
                }
                Some(Token::StartTag {
                    name: lower,
                    self_closing,
                    attributes: self.normalize_attributes(attributes),
                })
            }
            Token::EndTag { name } => Some(Token::EndTag {
                name: name.to_ascii_lowercase(),
            }),
            other => Some(other),
        }
    }

    /// "if there is already an attribute on the token with the exact same
    /// name, then this is a duplicate-attribute parse error and the new
    /// attribute must be removed from the token."
    fn normalize_attributes(&self, attributes: Vec<Attribute>) -> Vec<Attribute> {
        let mut normalized: Vec<Attribute> = Vec::with_capacity(attributes.len());
        for mut attr in attributes {
            if !self.settings.case_sensitive_tags {
                attr.name.make_ascii_lowercase();
            }
            if !normalized.iter().any(|seen| seen.name == attr.name) {
                normalized.push(attr);
            }
        }
        normalized
    }

    fn apply_rules(&mut self, mode: InsertionMode, token: &Token) -> Result<Step, ParserError> {
        self.rules_mode = mode;
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
            InsertionMode::ForeignContent => self.handle_foreign_content(token),
        }
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "If the stack of open elements is empty; if the adjusted current node
    /// is an element in the HTML namespace; if the adjusted current node is a
    /// MathML text integration point and the token is a start tag whose tag
    /// name is neither "mglyph" nor "malignmark"; if the adjusted current node
    /// is a MathML text integration point and the token is a character token;
    /// if the adjusted current node is a MathML annotation-xml element and the
    /// token is a start tag whose tag name is "svg"; if the adjusted current
    /// node is an HTML integration point and the token is a start tag; if the
    /// adjusted current node is an HTML integration point and the token is a
    /// character token; if the token is an end-of-file token: Process the token
    /// according to the rules given in the section corresponding to the
    /// current insertion mode in HTML content.
    /// Otherwise: Process the token according to the rules given in the
    /// section for parsing tokens in foreign content."
    fn use_foreign_content_rules(&self, token: &Token) -> bool {
        let Some(element) = self
            .adjusted_current_node()
            .and_then(|node| self.tree.as_element(node))
        else {
            return false;
        };
        if element.namespace == Namespace::Html {
            return false;
        }

        let text_integration_point = is_mathml_text_integration_point(element);
        match token {
            Token::StartTag { name, .. }
                if text_integration_point && name != "mglyph" && name != "malignmark" =>
            {
                false
            }
            Token::Character { .. } if text_integration_point => false,
            Token::StartTag { name, .. }
                if name == "svg"
                    && element.namespace == Namespace::MathMl
                    && element.local_name() == "annotation-xml" =>
            {
                false
            }
            Token::StartTag { .. } | Token::Character { .. }
                if is_html_integration_point(element) =>
            {
                false
            }
            Token::EndOfFile => false,
            _ => true,
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(crate) fn adjusted_current_node(&self) -> Option<NodeId> {
        if self.open_elements.len() == 1
            && let Some(context) = self.context_element
        {
            return Some(context);
        }
        self.open_elements.current_node()
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    pub(crate) fn parse_error(&mut self, token: &Token) {
        self.parse_error_kind(token.kind());
    }

    /// Record a parse error for a token of `kind` under the running rules.
    pub(crate) fn parse_error_kind(&mut self, kind: TokenKind) {
        if self.errors.is_full() {
            return;
        }
        let error = ParseError::unexpected(self.token_index, self.rules_mode, kind);
        log::trace!(target: LOG_TARGET, "{error}");
        self.errors.push(error);
    }

    /// Switch the insertion mode.
    pub(crate) fn switch_to(&mut self, mode: InsertionMode) {
        if mode != self.insertion_mode {
            log::trace!(target: LOG_TARGET, "{} -> {mode}", self.insertion_mode);
        }
        self.insertion_mode = mode;
    }

    /// "Pop the current node off the stack of open elements."
    pub(crate) fn pop_current(&mut self) {
        let _ = self.open_elements.pop();
    }

    /// [§ 13.2.6.2 The generic raw text and RCDATA element parsing algorithms](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "1. Insert an HTML element for the token.
    ///  2. If the algorithm that was invoked is the generic raw text element
    /// parsing algorithm, switch the tokenizer to the RAWTEXT state; otherwise
    /// ... switch the tokenizer to the RCDATA state.
    ///  3. Set the original insertion mode to the current insertion mode.
    ///  4. Then, switch the insertion mode to "text"."
    ///
    /// Tokenizer state is the tokenizer's business; by the time tokens reach
    /// the builder the element's content is a plain character run.
    pub(crate) fn parse_text_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
    ) -> Result<Step, ParserError> {
        let _ = self.insert_html_element(name, attributes)?;
        self.original_insertion_mode = Some(self.insertion_mode);
        self.switch_to(InsertionMode::Text);
        Ok(Step::Done)
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(crate) fn reset_insertion_mode_appropriately(&mut self) {
        let mode = self.appropriate_insertion_mode();
        self.switch_to(mode);
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        // STEP 1-2: "Let last be false. Let node be the last node in the stack
        //           of open elements."
        for index in (0..self.open_elements.len()).rev() {
            // STEP 3: "If node is the first node in the stack of open elements,
            //         then set last to true, and, if the parser was created as
            //         part of the HTML fragment parsing algorithm (fragment
            //         case), set node to the context element"
            let last = index == 0;
            let context = self
                .context_element
                .filter(|_| last)
                .and_then(|node| self.tree.as_element(node))
                .map(|element| (element.local_name(), element.namespace));
            let entry = self
                .open_elements
                .get(index)
                .map(|entry| (entry.name.as_str(), entry.namespace));
            let Some((name, namespace)) = context.or(entry) else {
                continue;
            };

            if namespace == Namespace::Html {
                match name {
                    // STEP 4: "If node is a select element, run these substeps"
                    "select" => {
                        if !last {
                            for ancestor in (0..index).rev() {
                                let Some(ancestor) = self.open_elements.get(ancestor) else {
                                    break;
                                };
                                if ancestor.is("template") {
                                    break;
                                }
                                if ancestor.is("table") {
                                    return InsertionMode::InSelectInTable;
                                }
                            }
                        }
                        return InsertionMode::InSelect;
                    }
                    // STEP 5: "If node is a td or th element and last is false,
                    //         then switch the insertion mode to "in cell""
                    "td" | "th" if !last => return InsertionMode::InCell,
                    // STEP 6: "If node is a tr element ... "in row""
                    "tr" => return InsertionMode::InRow,
                    // STEP 7: "If node is a tbody, thead, or tfoot element ...
                    //         "in table body""
                    "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                    // STEP 8: "If node is a caption element ... "in caption""
                    "caption" => return InsertionMode::InCaption,
                    // STEP 9: "If node is a colgroup element ... "in column group""
                    "colgroup" => return InsertionMode::InColumnGroup,
                    // STEP 10: "If node is a table element ... "in table""
                    "table" => return InsertionMode::InTable,
                    // STEP 11: "If node is a template element, then switch the
                    //          insertion mode to the current template insertion mode"
                    "template" => {
                        return self
                            .template_insertion_modes
                            .last()
                            .copied()
                            .unwrap_or(InsertionMode::InTemplate);
                    }
                    // STEP 12: "If node is a head element and last is false ... "in head""
                    "head" if !last => return InsertionMode::InHead,
                    // STEP 13: "If node is a body element ... "in body""
                    "body" => return InsertionMode::InBody,
                    // STEP 14: "If node is a frameset element ... "in frameset""
                    "frameset" => return InsertionMode::InFrameset,
                    // STEP 15: "If node is an html element: If the head element
                    //          pointer is null, switch to "before head". Otherwise,
                    //          switch to "after head"."
                    "html" => {
                        return if self.head_element_pointer.is_none() {
                            InsertionMode::BeforeHead
                        } else {
                            InsertionMode::AfterHead
                        };
                    }
                    _ => {}
                }
            }

            // STEP 16: "If last is true, then switch the insertion mode to "in body""
            if last {
                return InsertionMode::InBody;
            }
        }
        InsertionMode::InBody
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the user agent must pop
    /// the current node off the stack of open elements."
    pub(crate) fn generate_implied_end_tags(&mut self) {
        self.generate_implied_end_tags_excluding(None);
    }

    /// "If a step requires the user agent to generate implied end tags but
    /// lists an element to exclude from the process, then the user agent must
    /// perform the above steps as if that element was not in the above list."
    pub(crate) fn generate_implied_end_tags_excluding(&mut self, exclude: Option<&str>) {
        const IMPLIED_END_TAG_ELEMENTS: &[&str] = &[
            "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
        ];

        while self.open_elements.current_is_one_of(IMPLIED_END_TAG_ELEMENTS)
            && !exclude.is_some_and(|name| self.open_elements.current_is(name))
        {
            self.pop_current();
        }
    }

    /// "When the steps below require the UA to generate all implied end tags
    /// thoroughly, then, while the current node is a caption element, a
    /// colgroup element, a dd element, a dt element, an li element, an optgroup
    /// element, an option element, a p element, an rb element, an rp element,
    /// an rt element, an rtc element, a tbody element, a td element, a tfoot
    /// element, a th element, a thead element, or a tr element, the UA must pop
    /// the current node off the stack of open elements."
    pub(crate) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        const THOROUGH_END_TAG_ELEMENTS: &[&str] = &[
            "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt",
            "rtc", "tbody", "td", "tfoot", "th", "thead", "tr",
        ];

        while self.open_elements.current_is_one_of(THOROUGH_END_TAG_ELEMENTS) {
            self.pop_current();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "When the steps above say the user agent is to close a p element, it
    /// means that the user agent must generate implied end tags, except for p
    /// elements. If the current node is not a p element, then this is a parse
    /// error. Pop elements from the stack of open elements until a p element
    /// has been popped from the stack."
    pub(crate) fn close_p_element(&mut self, token: &Token) {
        self.generate_implied_end_tags_excluding(Some("p"));
        if !self.open_elements.current_is("p") {
            self.parse_error(token);
        }
        self.open_elements.pop_until("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(crate) fn close_p_in_button_scope(&mut self, token: &Token) {
        if self.open_elements.has_name_in_scope("p", ScopeKind::Button) {
            self.close_p_element(token);
        }
    }

    /// "Clear the list of active formatting elements up to the last marker.
    /// Pop the current template insertion mode off the stack of template
    /// insertion modes. Reset the insertion mode appropriately."
    ///
    /// Shared tail of closing a `template`, after it has been popped.
    pub(crate) fn leave_template(&mut self) {
        self.active_formatting_elements.clear_to_last_marker();
        let _ = self.template_insertion_modes.pop();
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-open-elements)
    ///
    /// Whether a `template` element is anywhere on the stack of open elements.
    pub(crate) fn template_is_open(&self) -> bool {
        self.open_elements.contains_name("template")
    }
}

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR, or
/// U+0020 SPACE."
pub(crate) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// Whether `data` consists of whitespace only.
pub(crate) fn is_all_whitespace(data: &str) -> bool {
    data.chars().all(is_whitespace)
}

/// Split a character run into its leading whitespace and the rest.
pub(crate) fn split_leading_whitespace(data: &str) -> (&str, &str) {
    let split = data
        .find(|c: char| !is_whitespace(c))
        .unwrap_or(data.len());
    data.split_at(split)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_mode_names_are_distinct() {
        let names: std::collections::HashSet<String> =
            InsertionMode::iter().map(|mode| mode.to_string()).collect();
        assert_eq!(names.len(), InsertionMode::iter().count());
        assert_eq!(InsertionMode::InSelectInTable.to_string(), "InSelectInTable");
    }

    #[test]
    fn test_split_leading_whitespace() {
        assert_eq!(split_leading_whitespace(" \n x y"), (" \n ", "x y"));
        assert_eq!(split_leading_whitespace("  "), ("  ", ""));
        assert_eq!(split_leading_whitespace("x"), ("", "x"));
        assert!(is_all_whitespace("\t\x0C\r "));
        assert!(!is_all_whitespace("\u{a0}"));
    }

    #[test]
    fn test_blank_fragment_context_is_rejected() {
        let settings = ParseSettings::default().with_fragment_context("");
        assert!(matches!(
            HTMLParser::new(settings),
            Err(ParserError::InvalidFragmentContext(_))
        ));
    }

    #[test]
    fn test_eof_in_frameset_with_empty_stack_fails() {
        let mut parser = HTMLParser::new(ParseSettings::default()).unwrap();
        parser.switch_to(InsertionMode::InFrameset);

        assert!(matches!(
            parser.parse(Vec::<Token>::new()),
            Err(ParserError::EofInFramesetWithoutRoot)
        ));
    }

    #[test]
    fn test_fragment_context_sets_initial_mode() {
        let cases = [
            ("div", InsertionMode::InBody),
            ("td", InsertionMode::InBody),
            ("tr", InsertionMode::InRow),
            ("table", InsertionMode::InTable),
            ("select", InsertionMode::InSelect),
            ("template", InsertionMode::InTemplate),
            ("html", InsertionMode::BeforeHead),
        ];
        for (context, expected) in cases {
            let parser = HTMLParser::new(ParseSettings::default().with_fragment_context(context))
                .unwrap();
            assert_eq!(parser.insertion_mode, expected, "context <{context}>");
        }
    }
}
