//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! One `impl HTMLParser` block per group of insertion modes. Every handler
//! returns a [`Step`](super::core::Step) telling the dispatcher what happens
//! to the token next.

mod after;
mod body;
mod foreign;
mod head;
mod initial;
mod select;
mod table;
mod template;
