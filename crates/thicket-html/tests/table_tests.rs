//! Table grammar and foster parenting.

mod common;

use pretty_assertions::assert_eq;
use thicket_dom::NodeId;

use common::{child_names, dump, error_messages, find_element, parse};

#[test]
fn test_implied_tbody() {
    let output = parse("<table><tr><td>x</td></tr></table>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             \"x\"
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_implied_row_for_cell() {
    let output = parse("<table><tbody><td>x</table>");
    let tbody = find_element(&output.tree, NodeId::ROOT, "tbody").unwrap();

    assert_eq!(child_names(&output.tree, tbody), ["tr"]);
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [InTableBody]"]
    );
}

#[test]
fn test_text_is_foster_parented() {
    let output = parse("<table>x<tr><td>y</table>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     \"x\"
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             \"y\"
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [Character] when in state [InTableText]"]
    );
}

#[test]
fn test_elements_are_foster_parented() {
    let output = parse("<table><b>bold</b><tr><td>cell</td></tr></table>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <b>
|       \"bold\"
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             \"cell\"
"
    );
    assert_eq!(
        error_messages(&output),
        [
            "Unexpected token [StartTag] when in state [InTable]",
            "Unexpected token [Character] when in state [InTable]",
            "Unexpected token [EndTag] when in state [InTable]",
        ]
    );
}

#[test]
fn test_whitespace_stays_in_table() {
    let output = parse("<table> <tr><td>x</td></tr> </table>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <table>
|       \" \"
|       <tbody>
|         <tr>
|           <td>
|             \"x\"
|         \" \"
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_split_table_text_joins_foster_parented_text() {
    let output = parse("<table>a<!--c-->b</table>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     \"ab\"
|     <table>
|       <!-- c -->
"
    );
    assert_eq!(
        error_messages(&output),
        [
            "Unexpected token [Character] when in state [InTableText]",
            "Unexpected token [Character] when in state [InTableText]",
        ]
    );
}

#[test]
fn test_caption_closed_by_cell() {
    let output = parse("<table><caption>cap<td>x</table>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <table>
|       <caption>
|         \"cap\"
|       <tbody>
|         <tr>
|           <td>
|             \"x\"
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [InTableBody]"]
    );
}

#[test]
fn test_implied_colgroup() {
    let output = parse("<table><col><tr><td></td></tr></table>");
    let table = find_element(&output.tree, NodeId::ROOT, "table").unwrap();
    let colgroup = find_element(&output.tree, table, "colgroup").unwrap();

    assert_eq!(child_names(&output.tree, table), ["colgroup", "tbody"]);
    assert_eq!(child_names(&output.tree, colgroup), ["col"]);
    assert!(output.errors.is_empty());
}

#[test]
fn test_hidden_input_stays_in_table() {
    let output = parse("<table><input type=hidden><input type=text></table>");
    let body = output.tree.body().unwrap();
    let table = find_element(&output.tree, body, "table").unwrap();

    assert_eq!(child_names(&output.tree, body), ["input", "table"]);
    assert_eq!(child_names(&output.tree, table), ["input"]);
    assert_eq!(output.errors.len(), 2);
}

#[test]
fn test_nested_table_start_closes_table() {
    let output = parse("<table><table>");
    let body = output.tree.body().unwrap();

    assert_eq!(child_names(&output.tree, body), ["table", "table"]);
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [StartTag] when in state [InTable]"]
    );
}

#[test]
fn test_table_inside_cell() {
    let output = parse("<table><tr><td><table><tr><td>in</table>out</table>");
    let outer_td = find_element(&output.tree, NodeId::ROOT, "td").unwrap();

    assert_eq!(child_names(&output.tree, outer_td), ["table"]);
    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             <table>
|               <tbody>
|                 <tr>
|                   <td>
|                     \"in\"
|             \"out\"
"
    );
}

#[test]
fn test_form_in_table_is_empty() {
    let output = parse("<table><form><tr><td>x</td></tr></form></table>");
    let table = find_element(&output.tree, NodeId::ROOT, "table").unwrap();
    let form = find_element(&output.tree, table, "form").unwrap();

    assert!(output.tree.children(form).is_empty());
    assert_eq!(child_names(&output.tree, table), ["form", "tbody"]);
}
