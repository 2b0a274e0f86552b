//! Static tag metadata.
//!
//! Every element carries a [`Tag`]: the name it was created with plus a
//! reference to a process-wide, immutable [`TagInfo`] record describing how
//! the tag behaves (block or inline, void, whitespace preserving, ...).
//!
//! The table is built once on first use and shared read-only by every parse.
//! Lookups of the same normalized name in the same case mode return the same
//! `&'static TagInfo`, so callers may compare tags with [`Tag::same_info`]
//! instead of comparing flag sets.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;
use std::sync::LazyLock;

use thiserror::Error;

/// Errors raised by [`Tag::lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The name was empty or contained only whitespace.
    #[error("tag name must not be empty")]
    EmptyName,
}

/// Semantic flags for one tag name.
#[derive(Debug, PartialEq, Eq)]
pub struct TagInfo {
    name: &'static str,
    block: bool,
    format_as_block: bool,
    preserve_whitespace: bool,
    empty: bool,
    self_closing: bool,
    known: bool,
    form_listed: bool,
    form_submittable: bool,
}

impl TagInfo {
    const fn unknown() -> Self {
        Self {
            name: "",
            block: false,
            format_as_block: true,
            preserve_whitespace: false,
            empty: false,
            self_closing: false,
            known: false,
            form_listed: false,
            form_submittable: false,
        }
    }

    /// Block-level element (`div`, `p`, `table`, ...).
    #[must_use]
    pub const fn is_block(&self) -> bool {
        self.block
    }

    /// Anything that is not block-level, including unknown tags.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        !self.block
    }

    /// Whether the element starts on its own line when pretty printed.
    #[must_use]
    pub const fn format_as_block(&self) -> bool {
        self.format_as_block
    }

    /// Text inside the element keeps its whitespace (`pre`, `textarea`, ...).
    #[must_use]
    pub const fn preserve_whitespace(&self) -> bool {
        self.preserve_whitespace
    }

    /// A void element that can never have children (`br`, `img`, ...).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.empty
    }

    /// Whether the tag closes itself. For registry entries this is the same
    /// as [`TagInfo::is_empty`]; unknown tags only get it once written as
    /// `<foo/>` (see [`Tag::mark_self_closing`]).
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// Whether the name is in the registry at all.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.known
    }

    /// [§ 4.10.2 Categories](https://html.spec.whatwg.org/multipage/forms.html#category-listed)
    #[must_use]
    pub const fn is_form_listed(&self) -> bool {
        self.form_listed
    }

    /// [§ 4.10.2 Categories](https://html.spec.whatwg.org/multipage/forms.html#category-submit)
    #[must_use]
    pub const fn is_form_submittable(&self) -> bool {
        self.form_submittable
    }
}

static UNKNOWN: TagInfo = TagInfo::unknown();

static UNKNOWN_SELF_CLOSING: TagInfo = TagInfo {
    self_closing: true,
    ..TagInfo::unknown()
};

const BLOCK_TAGS: &[&str] = &[
    "html", "head", "body", "frameset", "script", "noscript", "style", "meta", "link", "title",
    "frame", "noframes", "section", "nav", "aside", "hgroup", "header", "footer", "p", "h1", "h2",
    "h3", "h4", "h5", "h6", "ul", "ol", "pre", "div", "blockquote", "hr", "address", "figure",
    "figcaption", "form", "fieldset", "ins", "del", "dl", "dt", "dd", "li", "table", "caption",
    "thead", "tfoot", "tbody", "colgroup", "col", "tr", "th", "td", "video", "audio", "canvas",
    "details", "menu", "plaintext", "template", "article", "main", "svg", "math", "center",
    "dir", "applet", "marquee", "listing",
];

const INLINE_TAGS: &[&str] = &[
    "object", "base", "font", "tt", "i", "b", "u", "big", "small", "em", "strong", "dfn", "code",
    "samp", "kbd", "var", "cite", "abbr", "time", "acronym", "mark", "ruby", "rt", "rp", "rtc",
    "a", "img", "br", "wbr", "map", "q", "sub", "sup", "bdo", "iframe", "embed", "span", "input",
    "select", "textarea", "label", "button", "optgroup", "option", "legend", "datalist",
    "keygen", "output", "progress", "meter", "area", "param", "source", "track", "summary",
    "command", "device", "basefont", "bgsound", "menuitem", "data", "bdi", "s", "strike",
    "nobr", "rb", "text", "mi", "mo", "msup", "mn", "mtext",
];

const EMPTY_TAGS: &[&str] = &[
    "meta", "link", "base", "frame", "img", "br", "wbr", "embed", "hr", "input", "keygen", "col",
    "command", "device", "area", "basefont", "bgsound", "menuitem", "param", "source", "track",
];

const FORMAT_AS_INLINE_TAGS: &[&str] = &[
    "title", "a", "p", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "address", "li", "th", "td",
    "script", "style", "ins", "del", "s",
];

const PRESERVE_WHITESPACE_TAGS: &[&str] = &["pre", "plaintext", "title", "textarea"];

const FORM_LISTED_TAGS: &[&str] = &[
    "button", "fieldset", "input", "keygen", "object", "output", "select", "textarea",
];

const FORM_SUBMIT_TAGS: &[&str] = &["input", "keygen", "object", "select", "textarea"];

static REGISTRY: LazyLock<HashMap<&'static str, TagInfo>> = LazyLock::new(|| {
    let mut registry = HashMap::with_capacity(BLOCK_TAGS.len() + INLINE_TAGS.len());

    for &name in BLOCK_TAGS {
        let _ = registry.insert(
            name,
            TagInfo {
                name,
                block: true,
                format_as_block: !FORMAT_AS_INLINE_TAGS.contains(&name),
                known: true,
                ..TagInfo::unknown()
            },
        );
    }
    for &name in INLINE_TAGS {
        let _ = registry.insert(
            name,
            TagInfo {
                name,
                block: false,
                format_as_block: false,
                known: true,
                ..TagInfo::unknown()
            },
        );
    }

    for (name, info) in &mut registry {
        info.empty = EMPTY_TAGS.contains(name);
        info.self_closing = info.empty;
        info.preserve_whitespace = PRESERVE_WHITESPACE_TAGS.contains(name);
        info.form_listed = FORM_LISTED_TAGS.contains(name);
        info.form_submittable = FORM_SUBMIT_TAGS.contains(name);
    }

    registry
});

/// A tag name bound to its registry entry.
///
/// Two tags are equal when they carry the same name and share the same
/// registry entry.
#[derive(Clone)]
pub struct Tag {
    name: Cow<'static, str>,
    normal_name: Cow<'static, str>,
    info: &'static TagInfo,
}

impl Tag {
    /// Look up `name` in the registry.
    ///
    /// The name is trimmed first. When `case_sensitive` is false it is also
    /// lower-cased, so `DIV` and `div` resolve to the same tag. When it is
    /// true the tag keeps the spelling it was given, but still takes its
    /// flags from the lower-cased registry entry if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::EmptyName`] if `name` is empty after trimming.
    pub fn lookup(name: &str, case_sensitive: bool) -> Result<Self, TagError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TagError::EmptyName);
        }

        let normal = trimmed.to_ascii_lowercase();
        let Some(info) = REGISTRY.get(normal.as_str()) else {
            let name = if case_sensitive {
                Cow::Owned(trimmed.to_string())
            } else {
                Cow::Owned(normal.clone())
            };
            return Ok(Self {
                name,
                normal_name: Cow::Owned(normal),
                info: &UNKNOWN,
            });
        };

        let name = if case_sensitive && trimmed != info.name {
            Cow::Owned(trimmed.to_string())
        } else {
            Cow::Borrowed(info.name)
        };
        Ok(Self {
            name,
            normal_name: Cow::Borrowed(info.name),
            info,
        })
    }

    /// Record that an unknown tag was written self-closing, as in `<foo/>`.
    /// Registry tags keep their own flags.
    pub fn mark_self_closing(&mut self) {
        if !self.info.known {
            self.info = &UNKNOWN_SELF_CLOSING;
        }
    }

    /// Whether `name` (case insensitive) is in the registry.
    #[must_use]
    pub fn is_known_tag(name: &str) -> bool {
        REGISTRY.contains_key(name.trim().to_ascii_lowercase().as_str())
    }

    /// The name as stored on the element.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lower-cased name used for matching.
    #[must_use]
    pub fn normal_name(&self) -> &str {
        &self.normal_name
    }

    /// The shared registry entry.
    #[must_use]
    pub const fn info(&self) -> &'static TagInfo {
        self.info
    }

    /// Whether both tags point at the same registry entry.
    #[must_use]
    pub fn same_info(&self, other: &Self) -> bool {
        ptr::eq(self.info, other.info)
    }

    /// See [`TagInfo::is_block`].
    #[must_use]
    pub const fn is_block(&self) -> bool {
        self.info.is_block()
    }

    /// See [`TagInfo::is_inline`].
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        self.info.is_inline()
    }

    /// See [`TagInfo::format_as_block`].
    #[must_use]
    pub const fn format_as_block(&self) -> bool {
        self.info.format_as_block()
    }

    /// See [`TagInfo::preserve_whitespace`].
    #[must_use]
    pub const fn preserve_whitespace(&self) -> bool {
        self.info.preserve_whitespace()
    }

    /// See [`TagInfo::is_self_closing`].
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.info.is_self_closing()
    }

    /// See [`TagInfo::is_known`].
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.info.is_known()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.same_info(other)
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("name", &self.name)
            .field("known", &self.info.known)
            .finish()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tag_is_both_block_and_inline() {
        for name in BLOCK_TAGS {
            assert!(!INLINE_TAGS.contains(name), "{name} listed twice");
        }
    }

    #[test]
    fn test_every_empty_tag_is_registered() {
        for name in EMPTY_TAGS {
            assert!(Tag::is_known_tag(name), "{name} missing");
        }
    }

    #[test]
    fn test_mark_self_closing_only_touches_unknown_tags() {
        let mut foo = Tag::lookup("foo", false).unwrap();
        foo.mark_self_closing();
        assert!(foo.is_self_closing());
        assert!(!foo.is_known());
        assert!(!foo.info().is_empty());
        assert!(!Tag::lookup("foo", false).unwrap().is_self_closing());

        let mut div = Tag::lookup("div", false).unwrap();
        div.mark_self_closing();
        assert!(!div.is_self_closing());
        assert_eq!(div, Tag::lookup("div", false).unwrap());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        assert_eq!(Tag::lookup("   ", false), Err(TagError::EmptyName));
    }
}
