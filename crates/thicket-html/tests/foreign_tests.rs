//! SVG and MathML content.

mod common;

use pretty_assertions::assert_eq;
use thicket_dom::{Namespace, NodeId};
use thicket_html::{ParseSettings, Token, parse_document};

use common::{dump, error_messages, find_element, parse, text_content};

#[test]
fn test_svg_names_are_adjusted() {
    let output = parse("<svg viewbox=\"0 0 1 1\"><foreignobject><p>x</p></foreignobject></svg>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <svg svg>
|       viewBox=\"0 0 1 1\"
|       <svg foreignObject>
|         <p>
|           \"x\"
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_html_inside_foreign_object_is_html() {
    let output = parse("<svg><foreignobject><p>x</p></foreignobject></svg>");
    let p = find_element(&output.tree, NodeId::ROOT, "p").unwrap();

    assert_eq!(output.tree.as_element(p).unwrap().namespace, Namespace::Html);
}

#[test]
fn test_mathml_attributes_and_text_integration() {
    let output = parse("<math definitionurl=x><mi>1</mi></math>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <math math>
|       definitionURL=\"x\"
|       <math mi>
|         \"1\"
"
    );
}

#[test]
fn test_breakout_tag_leaves_svg() {
    let output = parse("<svg><g><b>x</b></g></svg>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <svg svg>
|       <svg g>
|     <b>
|       \"x\"
"
    );
    assert_eq!(
        output.errors[0].message,
        "Unexpected token [StartTag] when in state [ForeignContent]"
    );
}

#[test]
fn test_font_breaks_out_only_with_presentational_attributes() {
    let output = parse("<svg><font>a</font><font color=red>b");
    let body = output.tree.body().unwrap();

    let fonts: Vec<_> = output
        .tree
        .children(body)
        .iter()
        .filter_map(|&child| output.tree.as_element(child))
        .map(|element| (element.local_name().to_string(), element.namespace))
        .collect();
    assert_eq!(
        fonts,
        [
            ("svg".to_string(), Namespace::Svg),
            ("font".to_string(), Namespace::Html),
        ]
    );
}

#[test]
fn test_self_closing_foreign_element() {
    let output = parse("<svg><circle r=1/></svg>x");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <svg svg>
|       <svg circle>
|         r=\"1\"
|     \"x\"
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_mismatched_foreign_end_tag() {
    let output = parse("<svg><g></svg>x");
    let body = output.tree.body().unwrap();

    assert_eq!(text_content(&output.tree, body), "x");
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EndTag] when in state [ForeignContent]"]
    );
}

#[test]
fn test_null_in_foreign_text_is_replaced() {
    let tokens = vec![Token::start_tag("svg"), Token::character("a\0b")];
    let output = parse_document(tokens, ParseSettings::default().track_errors(10)).unwrap();
    let svg = find_element(&output.tree, NodeId::ROOT, "svg").unwrap();

    assert_eq!(text_content(&output.tree, svg), "a\u{FFFD}b");
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [Character] when in state [ForeignContent]"]
    );
}

#[test]
fn test_foreign_attributes_keep_qualified_names() {
    let output = parse("<svg><use XLINK:HREF=#a /></svg>");
    let element = find_element(&output.tree, NodeId::ROOT, "use").unwrap();
    let element = output.tree.as_element(element).unwrap();

    assert_eq!(element.attrs.get("xlink:href"), Some("#a"));
}
