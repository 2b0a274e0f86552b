//! Parse error reporting: messages, ordering and the error log cap.

mod common;

use pretty_assertions::assert_eq;
use thicket_dom::{NodeId, NodeType};
use thicket_html::{InsertionMode, ParseSettings, Token, TokenKind, parse_document};

use common::{dump, error_messages, find_element, lex, parse, text_content};

#[test]
fn test_select_in_table_errors() {
    let output = parse("<table><select><td></td></select></table>");

    assert!(output.errors.len() >= 2);
    assert_eq!(
        output.errors[0].message,
        "Unexpected token [StartTag] when in state [InTable]"
    );
    assert_eq!(
        output.errors[1].message,
        "Unexpected token [StartTag] when in state [InSelectInTable]"
    );
    assert_eq!(output.errors[1].mode, InsertionMode::InSelectInTable);
    assert_eq!(output.errors[1].kind, TokenKind::StartTag);
    assert_eq!(output.errors[1].position, 2);

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <select>
|     <table>
|       <tbody>
|         <tr>
|           <td>
"
    );
}

#[test]
fn test_error_positions_never_decrease() {
    let output = parse("<table>x<select><b></i></select><tr><td></p><frameset></table></div>");

    assert!(output.errors.len() > 3);
    assert!(
        output
            .errors
            .windows(2)
            .all(|pair| pair[0].position <= pair[1].position)
    );
}

#[test]
fn test_frameset_after_content_is_ignored() {
    let output = parse("<body>a<frameset></frameset></body>");

    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [InBody]"]
    );
    assert!(find_element(&output.tree, NodeId::ROOT, "frameset").is_none());
}

#[test]
fn test_frameset_replaces_empty_body() {
    let output = parse("<div><frameset><frame></frameset>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <frameset>
|     <frame>
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [InBody]"]
    );
}

#[test]
fn test_doctype_in_frameset_is_discarded() {
    let output = parse("<frameset><!DOCTYPE html></frameset>");
    let tree = &output.tree;

    assert_eq!(
        error_messages(&output),
        ["Unexpected token [Doctype] when in state [InFrameset]"]
    );
    let doctypes = (0..tree.len())
        .map(NodeId)
        .filter(|&id| matches!(tree.get(id).unwrap().node_type, NodeType::Doctype(_)))
        .count();
    assert_eq!(doctypes, 0);
}

#[test]
fn test_text_in_frameset_keeps_whitespace() {
    let output = parse("<frameset> x </frameset>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <frameset>
|     \"  \"
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [Character] when in state [InFrameset]"]
    );
}

#[test]
fn test_eof_in_nested_frameset() {
    let output = parse("<frameset><frameset>");

    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EOF] when in state [InFrameset]"]
    );
}

#[test]
fn test_content_after_frameset() {
    let output = parse("<frameset></frameset><p></html><div>");

    assert_eq!(
        error_messages(&output),
        [
            "Unexpected token [StartTag] when in state [AfterFrameset]",
            "Unexpected token [StartTag] when in state [AfterAfterFrameset]",
        ]
    );
    assert!(find_element(&output.tree, NodeId::ROOT, "p").is_none());
}

#[test]
fn test_head_content_after_head() {
    let output = parse("<head></head><title>x</title>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|     <title>
|       \"x\"
|   <body>
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [AfterHead]"]
    );
}

#[test]
fn test_second_head_and_doctype_in_head() {
    let output = parse("<head><head><!DOCTYPE html>");

    assert_eq!(
        error_messages(&output),
        [
            "Unexpected token [StartTag] when in state [InHead]",
            "Unexpected token [Doctype] when in state [InHead]",
        ]
    );
}

#[test]
fn test_unclosed_title_at_eof() {
    let output = parse("<title>x");

    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EOF] when in state [Text]"]
    );
    assert!(output.tree.body().is_some());
}

#[test]
fn test_select_rejects_other_markup() {
    let output = parse("<select><div>x</div></select>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <select>
|       \"x\"
"
    );
    assert_eq!(
        error_messages(&output),
        [
            "Unexpected token [StartTag] when in state [InSelect]",
            "Unexpected token [EndTag] when in state [InSelect]",
        ]
    );
}

#[test]
fn test_error_log_capacity() {
    let tokens = lex("<p></a1></a2></a3></a4>");

    let capped = parse_document(tokens.clone(), ParseSettings::default().track_errors(2)).unwrap();
    assert_eq!(capped.errors.len(), 2);
    let positions: Vec<_> = capped.errors.iter().map(|error| error.position).collect();
    assert_eq!(positions, [1, 2]);

    let roomy = parse_document(tokens.clone(), ParseSettings::default().track_errors(10)).unwrap();
    assert_eq!(roomy.errors.len(), 4);

    let untracked = parse_document(tokens, ParseSettings::default()).unwrap();
    assert!(untracked.errors.is_empty());
    assert_eq!(dump(&untracked.tree), dump(&roomy.tree));
}

#[test]
fn test_bad_doctype_is_reported() {
    let output = parse("<!DOCTYPE foo><p>x");

    assert_eq!(
        error_messages(&output),
        ["Unexpected token [Doctype] when in state [Initial]"]
    );

    let output = parse("<!DOCTYPE html SYSTEM \"about:legacy-compat\">");
    assert!(output.errors.is_empty());
}

#[test]
fn test_cell_end_tag_in_select_in_table() {
    let output = parse("<table><select></td></select></table>");

    assert_eq!(
        error_messages(&output),
        [
            "Unexpected token [StartTag] when in state [InTable]",
            "Unexpected token [EndTag] when in state [InSelectInTable]",
        ]
    );
    assert_eq!(output.errors[1].position, 2);
}

#[test]
fn test_eof_in_frameset() {
    let output = parse("<frameset>");

    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EOF] when in state [InFrameset]"]
    );
}

#[test]
fn test_start_tag_in_frameset_is_ignored() {
    let output = parse("<frameset><a></frameset>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <frameset>
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [InFrameset]"]
    );
}

#[test]
fn test_doctype_after_frameset() {
    let output = parse("<frameset></frameset><!DOCTYPE html>");

    assert_eq!(
        error_messages(&output),
        ["Unexpected token [Doctype] when in state [AfterFrameset]"]
    );
}

#[test]
fn test_script_after_head_goes_into_head() {
    let output = parse("<head></head><script>x</script>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|     <script>
|       \"x\"
|   <body>
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [AfterHead]"]
    );
}

#[test]
fn test_blank_tag_names_are_dropped() {
    let tokens = vec![Token::start_tag(""), Token::character("x"), Token::end_tag(" ")];
    let output = parse_document(tokens, ParseSettings::default().track_errors(5)).unwrap();
    let body = output.tree.body().unwrap();

    assert_eq!(text_content(&output.tree, body), "x");
    assert_eq!(
        error_messages(&output),
        [
            "Unexpected token [StartTag] when in state [Initial]",
            "Unexpected token [EndTag] when in state [InBody]",
        ]
    );
    let positions: Vec<_> = output.errors.iter().map(|error| error.position).collect();
    assert_eq!(positions, [0, 2]);
}
