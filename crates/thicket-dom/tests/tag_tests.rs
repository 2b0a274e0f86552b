//! Tag registry behaviour.

use thicket_dom::{Tag, TagError};

#[test]
fn test_case_sensitive_names_differ() {
    let upper = Tag::lookup("P", true).unwrap();
    let lower = Tag::lookup("p", true).unwrap();

    assert_ne!(upper, lower);
    assert_eq!(upper.name(), "P");
    assert_eq!(upper.normal_name(), "p");
    assert!(upper.same_info(&lower));
}

#[test]
fn test_case_insensitive_names_share_entry() {
    let lower = Tag::lookup("script", false).unwrap();
    let upper = Tag::lookup("SCRIPT", false).unwrap();

    assert_eq!(lower, upper);
    assert!(std::ptr::eq(lower.info(), upper.info()));
    assert_eq!(upper.name(), "script");
}

#[test]
fn test_lookup_trims() {
    let padded = Tag::lookup(" p ", false).unwrap();
    let plain = Tag::lookup("p", false).unwrap();

    assert_eq!(padded, plain);
}

#[test]
fn test_div_flags() {
    let div = Tag::lookup("div", false).unwrap();

    assert!(div.is_block());
    assert!(!div.is_inline());
    assert!(div.format_as_block());
    assert!(div.is_known());
}

#[test]
fn test_p_flags() {
    let p = Tag::lookup("p", false).unwrap();

    assert!(p.is_block());
    assert!(!p.format_as_block());
}

#[test]
fn test_img_flags() {
    let img = Tag::lookup("img", false).unwrap();

    assert!(img.is_inline());
    assert!(img.is_self_closing());
    assert!(!img.is_block());
}

#[test]
fn test_whitespace_preserving_tags() {
    for name in ["pre", "textarea", "title", "plaintext"] {
        assert!(Tag::lookup(name, false).unwrap().preserve_whitespace(), "{name}");
    }
    assert!(!Tag::lookup("div", false).unwrap().preserve_whitespace());
}

#[test]
fn test_form_categories() {
    let select = Tag::lookup("select", false).unwrap();
    assert!(select.info().is_form_listed());
    assert!(select.info().is_form_submittable());

    let button = Tag::lookup("button", false).unwrap();
    assert!(button.info().is_form_listed());
    assert!(!button.info().is_form_submittable());
}

#[test]
fn test_unknown_tag_defaults() {
    let foo = Tag::lookup("FOO", false).unwrap();

    assert!(foo.is_inline());
    assert!(foo.format_as_block());
    assert!(!foo.is_known());
    assert!(!foo.is_self_closing());
    assert_eq!(foo.name(), "foo");
    assert_eq!(foo, Tag::lookup("FOO", false).unwrap());
    assert_eq!(foo, Tag::lookup("foo", false).unwrap());
}

#[test]
fn test_unknown_tag_keeps_case_when_sensitive() {
    let foo = Tag::lookup("FOO", true).unwrap();

    assert_eq!(foo.name(), "FOO");
    assert_eq!(foo.normal_name(), "foo");
    assert_ne!(foo, Tag::lookup("foo", true).unwrap());
}

#[test]
fn test_case_sensitive_known_tag_keeps_flags() {
    let upper = Tag::lookup("DIV", true).unwrap();
    let lower = Tag::lookup("div", true).unwrap();

    assert_ne!(upper, lower);
    assert!(upper.is_block());
    assert!(upper.same_info(&lower));
}

#[test]
fn test_insensitive_lookups_are_interchangeable() {
    let upper = Tag::lookup("DIV", false).unwrap();
    let lower = Tag::lookup("div", false).unwrap();

    assert_eq!(upper, lower);
    assert!(upper.same_info(&lower));
}

#[test]
fn test_empty_names_are_rejected() {
    assert_eq!(Tag::lookup("", false), Err(TagError::EmptyName));
    assert_eq!(Tag::lookup(" \t ", true), Err(TagError::EmptyName));
}

#[test]
fn test_known_tags() {
    assert!(Tag::is_known_tag("div"));
    assert!(Tag::is_known_tag("DIV"));
    assert!(!Tag::is_known_tag("explain"));
}
