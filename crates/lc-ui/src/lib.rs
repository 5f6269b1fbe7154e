//! # lc-ui
//!
//! The page returned to the hidden iframe after every submission. It shows a
//! short message and tells the parent window how things went through
//! `postMessage`, always addressed to `TARGET_ORIGIN`.

use std::fmt;

use askama::filters::{escape, Escaper, Html};
use askama::Template;
use lc_core::TARGET_ORIGIN;

/// What the parent page is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Submitted,
    Error,
}

impl Signal {
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Submitted => "form_submitted",
            Signal::Error => "form_error",
        }
    }
}

#[derive(Template)]
#[template(path = "outcome.html")]
pub struct OutcomePage<'a> {
    /// Already escaped with `escape_message`
    pub message: &'a str,
    pub signal: &'a str,
    pub target_origin: &'a str,
}

/// Askama's HTML escaper plus the backtick, which it leaves alone.
#[derive(Debug, Clone, Copy, Default)]
struct PageText;

impl Escaper for PageText {
    fn write_escaped_str<W: fmt::Write>(&self, mut dest: W, string: &str) -> fmt::Result {
        for (index, chunk) in string.split('`').enumerate() {
            if index > 0 {
                dest.write_str("&#96;")?;
            }
            Html.write_escaped_str(&mut dest, chunk)?;
        }
        Ok(())
    }
}

/// Escapes the characters that could break out of the `<p>` element or an
/// attribute: `<`, `>`, `&`, `"`, `'` and the backtick.
pub fn escape_message(raw: &str) -> String {
    escape(raw, PageText)
        .map(|safe| safe.to_string())
        .unwrap_or_else(|never| match never {})
}

/// Renders the page for `signal` with a plain-text `message`.
pub fn render(signal: Signal, message: &str) -> askama::Result<String> {
    let escaped = escape_message(message);
    OutcomePage {
        message: &escaped,
        signal: signal.as_str(),
        target_origin: TARGET_ORIGIN,
    }
    .render()
}

pub fn render_submitted() -> askama::Result<String> {
    render(Signal::Submitted, "OK")
}

pub fn render_error(message: &str) -> askama::Result<String> {
    render(Signal::Error, message)
}
