//! Shared helpers for the tree builder integration tests.
//!
//! `lex` is a deliberately small markup reader so test inputs can be written
//! as HTML instead of token vectors. It knows tags, quoted and unquoted
//! attributes, comments, doctypes and raw text elements; it does not decode
//! character references.

#![allow(dead_code)]

use thicket_dom::{DomTree, Namespace, NodeId, NodeType};
use thicket_html::{
    Attribute, ParseOutput, ParseSettings, Token, parse_document, parse_fragment,
};

/// Elements whose content is read verbatim up to the matching end tag.
const RAW_TEXT: &[&str] = &[
    "iframe", "noembed", "noframes", "script", "style", "textarea", "title", "xmp",
];

/// Turn markup into tokens. No end-of-file token is appended.
pub fn lex(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            let end = after.find("-->").unwrap_or(after.len());
            tokens.push(Token::comment(&after[..end]));
            rest = after.get(end + 3..).unwrap_or("");
        } else if rest
            .get(..9)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("<!doctype"))
        {
            let end = rest.find('>').unwrap_or(rest.len());
            tokens.push(lex_doctype(&rest[9..end]));
            rest = rest.get(end + 1..).unwrap_or("");
        } else if let Some(after) = rest.strip_prefix("</")
            && after.starts_with(|c: char| c.is_ascii_alphabetic())
        {
            let end = after.find('>').unwrap_or(after.len());
            let name = after[..end].split_whitespace().next().unwrap_or("");
            tokens.push(Token::end_tag(name));
            rest = after.get(end + 1..).unwrap_or("");
        } else if let Some(after) = rest.strip_prefix('<')
            && after.starts_with(|c: char| c.is_ascii_alphabetic())
        {
            let end = after.find('>').unwrap_or(after.len());
            let tag = lex_start_tag(&after[..end]);
            rest = after.get(end + 1..).unwrap_or("");

            let raw = match &tag {
                Token::StartTag {
                    name,
                    self_closing: false,
                    ..
                } => {
                    let lower = name.to_ascii_lowercase();
                    if lower == "plaintext" {
                        Some((lower, rest.len()))
                    } else if RAW_TEXT.contains(&lower.as_str()) {
                        let close = find_ignore_case(rest, &format!("</{lower}"));
                        Some((lower, close.unwrap_or(rest.len())))
                    } else {
                        None
                    }
                }
                _ => None,
            };
            tokens.push(tag);

            if let Some((_, end)) = raw {
                if end > 0 {
                    tokens.push(Token::character(&rest[..end]));
                }
                rest = &rest[end..];
            }
        } else {
            let end = rest
                .char_indices()
                .skip(1)
                .find(|&(_, c)| c == '<')
                .map_or(rest.len(), |(index, _)| index);
            tokens.push(Token::character(&rest[..end]));
            rest = &rest[end..];
        }
    }
    tokens
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

fn lex_doctype(body: &str) -> Token {
    let mut parts = body.split_whitespace();
    let name = parts.next().map(str::to_ascii_lowercase);
    let keyword = parts.next().map(str::to_ascii_uppercase);

    let quoted: Vec<String> = body
        .split(['"', '\''])
        .skip(1)
        .step_by(2)
        .map(str::to_string)
        .collect();
    let (public_identifier, system_identifier) = match keyword.as_deref() {
        Some("PUBLIC") => (quoted.first().cloned(), quoted.get(1).cloned()),
        Some("SYSTEM") => (None, quoted.first().cloned()),
        _ => (None, None),
    };

    Token::Doctype {
        force_quirks: name.is_none(),
        name,
        public_identifier,
        system_identifier,
    }
}

fn lex_start_tag(body: &str) -> Token {
    let (body, self_closing) = match body.strip_suffix('/') {
        Some(body) => (body, true),
        None => (body, false),
    };
    let name_end = body
        .find(|c: char| c.is_whitespace())
        .unwrap_or(body.len());
    let name = &body[..name_end];

    let mut attributes = Vec::new();
    let mut rest = body[name_end..].trim_start();
    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        let mut value = String::new();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            if let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') {
                let inner = &after[1..];
                let close = inner.find(quote).unwrap_or(inner.len());
                value = inner[..close].to_string();
                rest = inner.get(close + 1..).unwrap_or("");
            } else {
                let end = after
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(after.len());
                value = after[..end].to_string();
                rest = &after[end..];
            }
        }
        if !key.is_empty() {
            attributes.push(Attribute::new(key, value));
        }
        rest = rest.trim_start();
    }

    Token::StartTag {
        name: name.to_string(),
        self_closing,
        attributes,
    }
}

/// Parse a document with error tracking on.
pub fn parse(html: &str) -> ParseOutput {
    parse_document(lex(html), ParseSettings::default().track_errors(100))
        .expect("document parse failed")
}

/// Parse a fragment with error tracking on.
pub fn parse_in(context: &str, html: &str) -> ParseOutput {
    parse_fragment(context, lex(html), ParseSettings::default().track_errors(100))
        .expect("fragment parse failed")
}

/// The recorded error messages.
pub fn error_messages(output: &ParseOutput) -> Vec<String> {
    output
        .errors
        .iter()
        .map(|error| error.message.clone())
        .collect()
}

/// html5lib-style dump of the whole document.
pub fn dump(tree: &DomTree) -> String {
    dump_nodes(tree, tree.children(NodeId::ROOT))
}

/// html5lib-style dump of a parsed fragment.
pub fn dump_fragment(output: &ParseOutput) -> String {
    dump_nodes(&output.tree, output.fragment_nodes())
}

fn dump_nodes(tree: &DomTree, nodes: &[NodeId]) -> String {
    let mut out = String::new();
    for &node in nodes {
        dump_node(tree, node, 0, &mut out);
    }
    out
}

fn dump_node(tree: &DomTree, id: NodeId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => {}
        NodeType::Doctype(doctype) => {
            out.push_str(&format!("| {indent}<!DOCTYPE {}>\n", doctype.name));
        }
        NodeType::Comment(data) => out.push_str(&format!("| {indent}<!-- {data} -->\n")),
        NodeType::Text(data) => out.push_str(&format!("| {indent}\"{data}\"\n")),
        NodeType::Element(element) => {
            let prefix = match element.namespace {
                Namespace::Html => "",
                Namespace::Svg => "svg ",
                Namespace::MathMl => "math ",
            };
            out.push_str(&format!("| {indent}<{prefix}{}>\n", element.tag_name()));

            let mut attrs: Vec<_> = element.attrs.iter().collect();
            attrs.sort_by(|a, b| a.name.cmp(&b.name));
            for attr in attrs {
                out.push_str(&format!("| {indent}  {}=\"{}\"\n", attr.name, attr.value));
            }
        }
    }
    for &child in tree.children(id) {
        dump_node(tree, child, depth + 1, out);
    }
}

/// First element called `tag` in document order below `from`.
pub fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.local_name() == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Concatenated text below `id`.
pub fn text_content(tree: &DomTree, id: NodeId) -> String {
    let mut result = String::new();
    if let Some(text) = tree.as_text(id) {
        result.push_str(text);
    }
    for &child_id in tree.children(id) {
        result.push_str(&text_content(tree, child_id));
    }
    result
}

/// Child element names of `id`, in order.
pub fn child_names(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.as_element(child))
        .map(|element| element.local_name().to_string())
        .collect()
}
