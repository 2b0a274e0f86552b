//! `<template>` contents and the template insertion mode stack.

mod common;

use pretty_assertions::assert_eq;

use common::{dump, error_messages, parse};

#[test]
fn test_template_in_head_holds_flow_content() {
    let output = parse("<template><p>x</p></template>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|     <template>
|       <p>
|         \"x\"
|   <body>
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_template_accepts_bare_table_rows() {
    let output = parse("<template><tr><td>x</td></tr></template>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|     <template>
|       <tr>
|         <td>
|           \"x\"
|   <body>
"
    );
    assert!(output.errors.is_empty());
}

#[test]
fn test_stray_end_tag_in_template() {
    let output = parse("<template></div>a</template>");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|     <template>
|       \"a\"
|   <body>
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EndTag] when in state [InTemplate]"]
    );
}

#[test]
fn test_unclosed_template_at_eof() {
    let output = parse("<template><p>x");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|     <template>
|       <p>
|         \"x\"
|   <body>
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EOF] when in state [InTemplate]"]
    );
}

#[test]
fn test_stray_template_end_tag_is_ignored() {
    let output = parse("<p>a</template>b");

    assert_eq!(
        dump(&output.tree),
        "\
| <html>
|   <head>
|   <body>
|     <p>
|       \"ab\"
"
    );
    assert_eq!(
        error_messages(&output),
        ["Unexpected token [EndTag] when in state [InHead]"]
    );
}
