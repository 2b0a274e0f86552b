//! SVG and MathML support for the tree builder.
//!
//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
//!
//! Name tables and element predicates only. The insertion rules themselves
//! live with the other insertion modes.

pub(crate) mod mathml;
pub(crate) mod svg;

pub(crate) use mathml::{adjust_mathml_attributes, is_mathml_text_integration_point};
pub(crate) use svg::{adjust_svg_attributes, adjusted_svg_tag_name};

use thicket_dom::{Attribute, ElementData, Namespace};

/// [§ 13.2.6.1 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "if any of the attributes on the token match the strings in the first
/// column of the following table, let the attribute be a namespaced attribute,
/// with the prefix being the string in the second column, the local name being
/// the string in the third column"
///
/// Attributes carry no namespace in the DOM, so only the qualified name is
/// kept, in the lower-case spelling the table uses.
const FOREIGN_ATTRIBUTES: &[&str] = &[
    "xlink:actuate",
    "xlink:arcrole",
    "xlink:href",
    "xlink:role",
    "xlink:show",
    "xlink:title",
    "xlink:type",
    "xml:lang",
    "xml:space",
    "xmlns",
    "xmlns:xlink",
];

/// [§ 13.2.6.1 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// Namespaced attributes keep their qualified name even when other names
/// keep their source case.
pub(crate) fn adjust_foreign_attributes(attributes: &mut [Attribute]) {
    for attr in attributes.iter_mut() {
        if let Some(qualified) = FOREIGN_ATTRIBUTES
            .iter()
            .find(|name| attr.name.eq_ignore_ascii_case(name))
        {
            attr.name = (*qualified).to_string();
        }
    }
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// "A start tag whose tag name is one of: "b", "big", "blockquote", "body",
/// "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1", "h2",
/// "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing", "menu",
/// "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong",
/// "strike", "sub", "sup", "table", "tt", "u", "ul", "var"
/// A start tag whose tag name is "font", if the token has any attributes named
/// "color", "face", or "size""
pub(crate) fn is_breakout_tag(name: &str, attributes: &[Attribute]) -> bool {
    if name == "font" {
        return attributes
            .iter()
            .any(|attr| matches!(attr.name.to_ascii_lowercase().as_str(), "color" | "face" | "size"));
    }
    matches!(
        name,
        "b" | "big"
            | "blockquote"
            | "body"
            | "br"
            | "center"
            | "code"
            | "dd"
            | "div"
            | "dl"
            | "dt"
            | "em"
            | "embed"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "head"
            | "hr"
            | "i"
            | "img"
            | "li"
            | "listing"
            | "menu"
            | "meta"
            | "nobr"
            | "ol"
            | "p"
            | "pre"
            | "ruby"
            | "s"
            | "small"
            | "span"
            | "strong"
            | "strike"
            | "sub"
            | "sup"
            | "table"
            | "tt"
            | "u"
            | "ul"
            | "var"
    )
}

/// [§ 13.2.6 HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// "A MathML annotation-xml element whose start tag token had an attribute with
/// the name "encoding" whose value was an ASCII case-insensitive match for the
/// string "text/html"
/// A MathML annotation-xml element whose start tag token had an attribute with
/// the name "encoding" whose value was an ASCII case-insensitive match for the
/// string "application/xhtml+xml"
/// An SVG foreignObject element
/// An SVG desc element
/// An SVG title element"
pub(crate) fn is_html_integration_point(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::MathMl => {
            element.local_name() == "annotation-xml"
                && element.attrs.get("encoding").is_some_and(|encoding| {
                    encoding.eq_ignore_ascii_case("text/html")
                        || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                })
        }
        Namespace::Svg => matches!(element.local_name(), "foreignobject" | "desc" | "title"),
        Namespace::Html => false,
    }
}

#[cfg(test)]
mod tests {
    use thicket_dom::{Attributes, Tag};

    use super::*;

    fn element(name: &str, namespace: Namespace, attrs: &[(&str, &str)]) -> ElementData {
        ElementData::new(
            Tag::lookup(name, true).unwrap(),
            namespace,
            attrs
                .iter()
                .map(|&(name, value)| Attribute::new(name, value))
                .collect::<Attributes>(),
        )
    }

    #[test]
    fn test_adjust_foreign_attributes() {
        let mut attributes = vec![
            Attribute::new("XLINK:HREF", "#a"),
            Attribute::new("class", "x"),
        ];
        adjust_foreign_attributes(&mut attributes);

        assert_eq!(attributes[0].name, "xlink:href");
        assert_eq!(attributes[1].name, "class");
    }

    #[test]
    fn test_breakout_tags() {
        assert!(is_breakout_tag("div", &[]));
        assert!(!is_breakout_tag("font", &[]));
        assert!(is_breakout_tag("font", &[Attribute::new("color", "red")]));
        assert!(!is_breakout_tag("rect", &[]));
    }

    #[test]
    fn test_html_integration_points() {
        assert!(is_html_integration_point(&element(
            "foreignObject",
            Namespace::Svg,
            &[]
        )));
        assert!(is_html_integration_point(&element(
            "annotation-xml",
            Namespace::MathMl,
            &[("encoding", "Text/HTML")]
        )));
        assert!(!is_html_integration_point(&element(
            "annotation-xml",
            Namespace::MathMl,
            &[]
        )));
        assert!(!is_html_integration_point(&element("title", Namespace::Html, &[])));
    }
}
