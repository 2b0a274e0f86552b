//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! The tree builder: a state machine over the insertion modes that turns a
//! token stream into a [`DomTree`](thicket_dom::DomTree), recovering from
//! malformed markup the way browsers do.

mod adoption;
mod core;
mod errors;
mod foreign_content;
mod formatting;
mod insertion;
mod modes;
mod open_elements;

pub use self::core::{HTMLParser, InsertionMode, ParseOutput};
pub use errors::{ParseError, ParseErrors};
