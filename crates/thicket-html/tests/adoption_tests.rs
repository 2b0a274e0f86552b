//! Mis-nested formatting elements and the adoption agency algorithm.

mod common;

use pretty_assertions::assert_eq;
use thicket_dom::NodeId;

use common::{dump, error_messages, find_element, parse, text_content};

#[test]
fn test_formatting_end_tag_inside_block() {
    let output = parse("<b><p>x</b>y");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <b>
|     <p>
|       <b>
|         \"x\"
|       \"y\"
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EndTag] when in state [InBody]"]
    );
}

#[test]
fn test_no_furthest_block() {
    let output = parse("<b><i>x</b>y</i>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <b>
|       <i>
|         \"x\"
|     <i>
|       \"y\"
"
    );
}

#[test]
fn test_anchor_inside_anchor() {
    let output = parse("<a href=1>x<a href=2>y");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <a>
|       href=\"1\"
|       \"x\"
|     <a>
|       href=\"2\"
|       \"y\"
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [InBody]"]
    );
}

#[test]
fn test_furthest_block_with_nested_formatting() {
    let output = parse("<a><b><div>x</a>y");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <a>
|       <b>
|     <b>
|       <div>
|         <a>
|           \"x\"
|         \"y\"
"
    );
}

#[test]
fn test_end_tag_without_open_element() {
    let output = parse("<p>x</b>y");
    let p = find_element(&output.tree, NodeId::ROOT, "p").unwrap();

    assert_eq!(text_content(&output.tree, p), "xy");
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EndTag] when in state [InBody]"]
    );
}

#[test]
fn test_deeply_misnested_formatting_terminates() {
    let mut html = String::from("<b>");
    for _ in 0..12 {
        html.push_str("<div><i>");
    }
    html.push_str("x</b>end");

    let output = parse(&html);
    let body = output.tree.body().unwrap();

    let text = text_content(&output.tree, body);
    assert!(text.contains('x'));
    assert!(text.contains("end"));
    assert!(find_element(&output.tree, body, "b").is_some());
    assert!(!output.errors.is_empty());
    // The original element plus one clone per outer loop iteration.
    assert_eq!(dump(&output.tree).matches("<b>").count(), 9);
}

#[test]
fn test_nobr_reopened() {
    let output = parse("<nobr>a<nobr>b");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <nobr>
|       \"a\"
|     <nobr>
|       \"b\"
"
    );
    assert_eq!(output.errors.len(), 1);
}
