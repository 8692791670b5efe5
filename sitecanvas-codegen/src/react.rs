//! React component emitter.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use sitecanvas_core::{Element, ElementKind};

use crate::escape;
use crate::html::page_height;
use crate::template::{self, Node};

const INDENT: &str = "  ";

/// Options for the React target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    /// Import `./styles.css` from the component.
    pub include_styles: bool,
    /// Add the `responsive` class to the page wrapper.
    pub responsive: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            include_styles: true,
            responsive: true,
        }
    }
}

/// Render a `GeneratedComponent` default export.
#[must_use]
pub fn render_react(elements: &[Element], options: &GenerateOptions) -> String {
    let mut code = String::from("import React from 'react';\n");
    if options.include_styles {
        code.push_str("import './styles.css';\n");
    }
    code.push_str("\nexport default function GeneratedComponent() {\n");
    code.push_str("  return (\n");
    let _ = writeln!(
        code,
        "    <div className=\"generated-page{}\" style={{{{ position: 'relative', minHeight: {} }}}}>",
        if options.responsive { " responsive" } else { "" },
        page_height(elements)
    );

    for element in elements {
        render_element(&mut code, element, 3);
    }

    code.push_str("    </div>\n");
    code.push_str("  );\n");
    code.push_str("}\n");
    code
}

/// The inline style object of an element, without the outer braces.
fn style_object(element: &Element) -> String {
    let mut style = format!(
        "position: 'absolute', left: {}, top: {}, width: {}, height: {}",
        element.position.x, element.position.y, element.size.width, element.size.height
    );
    for (key, value) in element.styles.entries() {
        let rendered = if value.parse::<serde_json::Number>().is_ok() {
            value
        } else {
            escape::js_string(&value)
        };
        let _ = write!(style, ", {}: {rendered}", escape::js_key(&key));
    }
    style
}

fn render_element(out: &mut String, element: &Element, depth: usize) {
    let template = template::template_for(element);
    let pad = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);

    let _ = writeln!(out, "{pad}<{}", template.tag);
    let _ = writeln!(
        out,
        "{inner}className={}",
        escape::jsx_attr(&template::jsx_class(element, &template))
    );
    let _ = writeln!(out, "{inner}style={{{{ {} }}}}", style_object(element));
    for (name, value) in &template.attrs {
        let _ = writeln!(out, "{inner}{name}={}", escape::jsx_attr(value));
    }
    match element.kind {
        ElementKind::Button => {
            let _ = writeln!(
                out,
                "{inner}onClick={{() => console.log('Button clicked')}}"
            );
        }
        ElementKind::Form => {
            let _ = writeln!(out, "{inner}onSubmit={{(event) => event.preventDefault()}}");
        }
        _ => {}
    }

    if template.is_void() {
        let _ = writeln!(out, "{pad}/>");
        return;
    }
    let _ = writeln!(out, "{pad}>");
    if let Some(comment) = &template.comment {
        let _ = writeln!(out, "{inner}{{/* {comment} */}}");
    }
    write_children(out, &template.children, depth + 1);
    let _ = writeln!(out, "{pad}</{}>", template.tag);
}

fn write_children(out: &mut String, children: &[Node], depth: usize) {
    let pad = INDENT.repeat(depth);
    for node in children {
        match node {
            Node::Text(text) => {
                let _ = writeln!(out, "{pad}{}", escape::jsx_text(text));
            }
            Node::Tag(tag) => {
                let _ = write!(out, "{pad}<{}", tag.name);
                if let Some(class) = tag.jsx_class.filter(|c| !c.is_empty()) {
                    let _ = write!(out, " className=\"{class}\"");
                }
                for (name, value) in &tag.attrs {
                    let _ = write!(out, " {name}={}", escape::jsx_attr(value));
                }
                if tag.is_void() {
                    out.push_str(" />\n");
                } else if tag.children.iter().all(|n| matches!(n, Node::Text(_))) {
                    out.push('>');
                    for child in &tag.children {
                        if let Node::Text(text) = child {
                            out.push_str(&escape::jsx_text(text));
                        }
                    }
                    let _ = writeln!(out, "</{}>", tag.name);
                } else {
                    out.push_str(">\n");
                    write_children(out, &tag.children, depth + 1);
                    let _ = writeln!(out, "{pad}</{}>", tag.name);
                }
            }
        }
    }
}
