//! Utility functions and helpers.

pub mod http;
pub mod log;

use scraper::{Html, Node};
use unicode_segmentation::UnicodeSegmentation;

/// Elements that start a new line when rendered.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dt", "figcaption", "h1", "h2",
    "h3", "h4", "h5", "h6", "hr", "li", "p", "pre", "section", "td", "th", "tr",
];

/// Strip markup from a rendered WordPress field, collapsing whitespace.
///
/// Inline elements join their neighbours as written (`<b>Uni</b>versity`
/// stays one word); block elements are separated by a space.
pub fn html_to_text(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return normalize_whitespace(html);
    }
    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());
    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(chunk) => text.push_str(chunk),
            Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => text.push(' '),
            _ => {}
        }
    }
    normalize_whitespace(&text)
}

/// Shorten text to at most `max` graphemes, appending an ellipsis when cut.
pub fn excerpt(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }
    let mut cut = graphemes[..max].concat();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
