//! Fragment parsing against a context element.

mod common;

use pretty_assertions::assert_eq;
use thicket_dom::NodeId;
use thicket_html::{ParseSettings, ParserError, parse_fragment};

use common::{dump_fragment, error_messages, lex, parse_in};

#[test]
fn test_fragment_in_div() {
    let output = parse_in("div", "Hello <em>world</em>");

    assert_eq!(
        dump_fragment(&output),
        "\
| \"Hello \"
| <em>
|   \"world\"
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_fragment_root_is_only_document_child() {
    let output = parse_in("div", "<p>x");
    let root = output.fragment_root().unwrap();

    assert_eq!(output.tree.children(NodeId::ROOT), [root]);
    assert_eq!(output.tree.as_element(root).unwrap().local_name(), "html");
}

#[test]
fn test_fragment_in_cell() {
    let output = parse_in("td", "<b>x</b>");

    assert_eq!(
        dump_fragment(&output),
        "\
| <b>
|   \"x\"
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_fragment_in_row() {
    let output = parse_in("tr", "<td>a</td><td>b</td>");

    assert_eq!(
        dump_fragment(&output),
        "\
| <td>
|   \"a\"
| <td>
|   \"b\"
"
    );
}

#[test]
fn test_fragment_in_table() {
    let output = parse_in("table", "<tr><td>x");

    assert_eq!(
        dump_fragment(&output),
        "\
| <tbody>
|   <tr>
|     <td>
|       \"x\"
"
    );
}

#[test]
fn test_fragment_in_select() {
    let output = parse_in("select", "<option>a<option>b<div>c");

    assert_eq!(
        dump_fragment(&output),
        "\
| <option>
|   \"a\"
| <option>
|   \"bc\"
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [InSelect]"]
    );
}

#[test]
fn test_fragment_in_template() {
    let output = parse_in("template", "<td>x</td>");

    assert_eq!(
        dump_fragment(&output),
        "\
| <td>
|   \"x\"
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_body_end_tag_in_fragment() {
    let output = parse_in("div", "x</body>y");

    assert_eq!(dump_fragment(&output), "| \"xy\"\n");
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EndTag] when in state [InBody]"]
    );
}

#[test]
fn test_fragment_in_svg_context() {
    let output = parse_in("svg", "<rect/><p>x");

    assert_eq!(
        dump_fragment(&output),
        "\
| <svg rect>
| <p>
|   \"x\"
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [ForeignContent]"]
    );
}

#[test]
fn test_blank_context_fails() {
    let result = parse_fragment("  ", lex("<p>x"), ParseSettings::default());

    assert!(matches!(
        result,
        Err(ParserError::InvalidFragmentContext(_))
    ));
}
