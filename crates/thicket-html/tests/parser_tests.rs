//! Integration tests for document tree construction.

mod common;

use pretty_assertions::assert_eq;
use thicket_dom::{NodeId, NodeType};
use thicket_html::{HTMLParser, ParseSettings, Token, parse_document};

use common::{child_names, dump, error_messages, find_element, lex, parse, text_content};

#[test]
fn test_document_structure() {
    let output = parse("<!DOCTYPE html><html><head></head><body></body></html>");

    assert_eq!(
        dump(&output.tree),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_implied_html_head_and_body() {
    let output = parse("<p>Hello");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <p>
|       \"Hello\"
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_document_accessors() {
    let output = parse("<title>t</title><p>x");
    let tree = &output.tree;

    let html = tree.document_element().unwrap();
    assert_eq!(child_names(tree, html), ["head", "body"]);
    assert_eq!(tree.body(), find_element(tree, NodeId::ROOT, "body"));
    assert_eq!(text_content(tree, html), "tx");
}

#[test]
fn test_comments() {
    let output = parse("<!--top--><p>x</p><!--in body-->");

    assert_eq!(
        dump(&output.tree),
        "\
| <!-- top -->
| <html>
|   <head>
|   <body>
|     <p>
|       \"x\"
|     <!-- in body -->
"
    );
}

#[test]
fn test_comments_after_body() {
    let output = parse("<p>x</body><!--a--></html><!--b-->");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <p>
|       \"x\"
|   <!-- a -->
| <!-- b -->
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_paragraphs_close_each_other() {
    let output = parse("<p>a<p>b");
    let body = output.tree.body().unwrap();

    assert_eq!(child_names(&output.tree, body), ["p", "p"]);
    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <p>
|       \"a\"
|     <p>
|       \"b\"
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_block_closes_paragraph() {
    let output = parse("<p>a<div>b</div>");
    let body = output.tree.body().unwrap();

    assert_eq!(child_names(&output.tree, body), ["p", "div"]);
    assert!(output.errors.is_empty());
}

#[test]
fn test_stray_paragraph_end_tag() {
    let output = parse("<div></p></div>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <div>
|       <p>
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EndTag] when in state [InBody]"]
    );
}

#[test]
fn test_list_items_close_siblings() {
    let output = parse("<ul><li>one<li>two</ul><dl><dt>a<dd>b<dt>c</dl>");
    let tree = &output.tree;

    let ul = find_element(tree, NodeId::ROOT, "ul").unwrap();
    assert_eq!(child_names(tree, ul), ["li", "li"]);
    let dl = find_element(tree, NodeId::ROOT, "dl").unwrap();
    assert_eq!(child_names(tree, dl), ["dt", "dd", "dt"]);
    assert!(output.errors.is_empty());
}

#[test]
fn test_nested_list_keeps_outer_item() {
    let output = parse("<ul><li>a<ul><li>b</ul>c</ul>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <ul>
|       <li>
|         \"a\"
|         <ul>
|           <li>
|             \"b\"
|         \"c\"
"
    );
}

#[test]
fn test_heading_closes_open_heading() {
    let output = parse("<h1>a<h2>b</h2>");
    let body = output.tree.body().unwrap();

    assert_eq!(child_names(&output.tree, body), ["h1", "h2"]);
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [InBody]"]
    );
}

#[test]
fn test_mismatched_heading_end_tag() {
    let output = parse("<h1>a</h2>b");
    let body = output.tree.body().unwrap();

    assert_eq!(child_names(&output.tree, body), ["h1"]);
    assert_eq!(text_content(&output.tree, body), "ab");
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EndTag] when in state [InBody]"]
    );
}

#[test]
fn test_leading_newline_dropped() {
    let output = parse("<pre>\nfoo</pre><textarea>\nbar</textarea>");
    let tree = &output.tree;

    let pre = find_element(tree, NodeId::ROOT, "pre").unwrap();
    assert_eq!(text_content(tree, pre), "foo");
    let textarea = find_element(tree, NodeId::ROOT, "textarea").unwrap();
    assert_eq!(text_content(tree, textarea), "bar");
}

#[test]
fn test_raw_text_in_head() {
    let output = parse("<title>a<b>c</title><script>if (a < b) {}</script>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|     <title>
|       \"a<b>c\"
|     <script>
|       \"if (a < b) {}\"
|   <body>
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_formatting_reconstructed_in_next_paragraph() {
    let output = parse("<p><b>x</p><p>y");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <p>
|       <b>
|         \"x\"
|     <p>
|       <b>
|         \"y\"
"
    );
}

#[test]
fn test_body_attributes_merged() {
    let output = parse("<body class=a><body id=b class=c>");
    let body = output.tree.body().unwrap();
    let element = output.tree.as_element(body).unwrap();

    assert_eq!(element.attrs.get("class"), Some("a"));
    assert_eq!(element.attrs.get("id"), Some("b"));
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [InBody]"]
    );
}

#[test]
fn test_image_becomes_img() {
    let output = parse("<image src=x>");
    let img = find_element(&output.tree, NodeId::ROOT, "img").unwrap();

    assert_eq!(output.tree.as_element(img).unwrap().attrs.get("src"), Some("x"));
    assert_eq!(output.errors.len(), 1);
}

#[test]
fn test_void_and_self_closing_elements() {
    let output = parse("<br>a<foo/>b<div/>c");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <br>
|     \"a\"
|     <foo>
|     \"b\"
|     <div>
|       \"c\"
"
    );
}

#[test]
fn test_unknown_tag_written_self_closing_is_marked() {
    let output = parse("<foo/><foo></foo><br/>");
    let body = output.tree.body().unwrap();
    let tags: Vec<_> = output
        .tree
        .children(body)
        .iter()
        .filter_map(|&child| output.tree.as_element(child))
        .map(|element| (element.local_name().to_string(), element.tag.is_self_closing()))
        .collect();

    assert_eq!(
        tags,
        [
            ("foo".to_string(), true),
            ("foo".to_string(), false),
            ("br".to_string(), true),
        ]
    );
}

#[test]
fn test_case_sensitive_tags() {
    let settings = ParseSettings::default().with_case_sensitive_tags(true);
    let output = parse_document(lex("<DIV Class=x>y</DIV>"), settings).unwrap();

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <DIV>
|       Class=\"x\"
|       \"y\"
"
    );

    let output = parse("<DIV Class=x>y</DIV>");
    let div = find_element(&output.tree, NodeId::ROOT, "div").unwrap();
    let element = output.tree.as_element(div).unwrap();
    assert_eq!(element.tag_name(), "div");
    assert_eq!(element.attrs.get("class"), Some("x"));
}

#[test]
fn test_duplicate_attributes_keep_first() {
    let output = parse("<p id=a ID=b>");
    let p = find_element(&output.tree, NodeId::ROOT, "p").unwrap();
    let element = output.tree.as_element(p).unwrap();

    assert_eq!(element.attrs.len(), 1);
    assert_eq!(element.id(), Some("a"));
}

#[test]
fn test_tokens_after_eof_ignored() {
    let tokens = vec![
        Token::start_tag("p"),
        Token::EndOfFile,
        Token::start_tag("div"),
    ];
    let output = HTMLParser::new(ParseSettings::default())
        .unwrap()
        .parse(tokens)
        .unwrap();

    assert!(find_element(&output.tree, NodeId::ROOT, "p").is_some());
    assert!(find_element(&output.tree, NodeId::ROOT, "div").is_none());
}

#[test]
fn test_empty_input() {
    let output = parse("");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
"
    );
}

#[test]
fn test_text_never_attached_to_document() {
    let output = parse("<!DOCTYPE html>  <html>");
    let tree = &output.tree;

    assert!(
        tree.children(NodeId::ROOT)
            .iter()
            .all(|&child| !matches!(tree.get(child).unwrap().node_type, NodeType::Text(_)))
    );
}

#[test]
fn test_parse_is_deterministic() {
    let html = "<table><b>x<tr><td><p>1<i>2</b>3</table><svg><g/></svg><a><a>";
    let first = parse(html);
    let second = parse(html);

    assert_eq!(dump(&first.tree), dump(&second.tree));
    assert_eq!(first.errors, second.errors);
}
