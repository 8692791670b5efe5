//! Static HTML page emitter.

use std::fmt::Write;

use sitecanvas_core::canvas::{CANVAS_BOTTOM_PADDING, MIN_CANVAS_HEIGHT};
use sitecanvas_core::Element;

use crate::escape;
use crate::template::{self, Node};

const INDENT: &str = "    ";

/// Elements paired with their sequence index, ordered top to bottom.
///
/// The sort is stable, so elements sharing a `y` keep sequence order.
pub(crate) fn reading_order(elements: &[Element]) -> Vec<(usize, &Element)> {
    let mut ordered: Vec<(usize, &Element)> = elements.iter().enumerate().collect();
    ordered.sort_by_key(|(_, element)| element.position.y);
    ordered
}

/// Height of the generated page container.
pub(crate) fn page_height(elements: &[Element]) -> i32 {
    let bottom = elements.iter().map(Element::bottom).max().unwrap_or(0);
    bottom.saturating_add(CANVAS_BOTTOM_PADDING).max(MIN_CANVAS_HEIGHT)
}

/// Inline geometry of an element.
pub(crate) fn geometry_style(element: &Element) -> String {
    format!(
        "position:absolute; left:{}px; top:{}px; width:{}px; height:{}px;",
        element.position.x, element.position.y, element.size.width, element.size.height
    )
}

/// Render a complete HTML document.
#[must_use]
pub fn render_html(elements: &[Element]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20   <meta charset=\"UTF-8\">\n\
         \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         \x20   <title>Generated Website</title>\n\
         \x20   <link rel=\"stylesheet\" href=\"styles.css\">\n\
         </head>\n\
         <body>\n",
    );
    let _ = writeln!(
        html,
        "{INDENT}<div class=\"page\" style=\"position:relative; min-height:{}px;\">",
        page_height(elements)
    );

    for (index, element) in reading_order(elements) {
        render_element(&mut html, index, element);
    }

    html.push_str(INDENT);
    html.push_str("</div>\n");
    html.push_str(INDENT);
    html.push_str("<script src=\"script.js\"></script>\n</body>\n</html>\n");
    html
}

fn render_element(out: &mut String, index: usize, element: &Element) {
    let template = template::template_for(element);
    let pad = INDENT.repeat(2);

    if let Some(comment) = &template.comment {
        let _ = writeln!(out, "{pad}<!-- {comment} -->");
    }

    let _ = write!(
        out,
        "{pad}<{} class=\"{} {}\" style=\"{}\"",
        template.tag,
        escape::html(&template::html_class(element)),
        template::element_class(index),
        geometry_style(element)
    );
    write_attrs(out, &template.attrs);

    if template.is_void() {
        out.push_str(">\n");
        return;
    }
    out.push('>');
    write_children(out, &template.children, 2);
    let _ = writeln!(out, "</{}>", template.tag);
}

fn write_attrs(out: &mut String, attrs: &[(&'static str, String)]) {
    for (name, value) in attrs {
        let _ = write!(out, " {name}=\"{}\"", escape::html(value));
    }
}

/// Write children after an open tag. Text-only content stays on the tag's
/// line; nested tags go on their own lines and the closing tag is indented.
fn write_children(out: &mut String, children: &[Node], depth: usize) {
    if children.iter().all(|node| matches!(node, Node::Text(_))) {
        for node in children {
            if let Node::Text(text) = node {
                out.push_str(&escape::html(text));
            }
        }
        return;
    }

    out.push('\n');
    let pad = INDENT.repeat(depth + 1);
    for node in children {
        match node {
            Node::Text(text) => {
                let _ = writeln!(out, "{pad}{}", escape::html(text));
            }
            Node::Tag(tag) => {
                out.push_str(&pad);
                let _ = write!(out, "<{}", tag.name);
                if let Some(class) = tag.html_class {
                    let _ = write!(out, " class=\"{class}\"");
                }
                write_attrs(out, &tag.attrs);
                if tag.is_void() {
                    out.push_str(">\n");
                    continue;
                }
                out.push('>');
                write_children(out, &tag.children, depth + 1);
                let _ = writeln!(out, "</{}>", tag.name);
            }
        }
    }
    out.push_str(&INDENT.repeat(depth));
}

/// Render the markup for a single element as it appears in the page.
#[must_use]
pub fn render_element_html(index: usize, element: &Element) -> String {
    let mut out = String::new();
    render_element(&mut out, index, element);
    out
}
