//! HTML rendering for [`HtmlFragment`]s.

use vaill_normalize_models::{Element, HtmlFragment};

/// Renders a fragment as HTML, one top-level element per line.
///
/// Text content is escaped; lists are emitted on a single line as
/// `<ul><li>…</li>…</ul>`.
#[must_use]
pub fn render(fragment: &HtmlFragment) -> String {
    let mut out = String::new();

    for (i, element) in fragment.elements.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_element(element, &mut out);
    }

    out
}

fn render_element(element: &Element, out: &mut String) {
    match element {
        Element::Heading(text) => wrap("h2", text, out),
        Element::Paragraph(text) => wrap("p", text, out),
        Element::List(items) => {
            out.push_str("<ul>");
            for item in items {
                wrap("li", item, out);
            }
            out.push_str("</ul>");
        }
    }
}

fn wrap(tag: &str, text: &str, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(&html_escape::encode_text(text));
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
