//! Stylesheet emitter.

use std::fmt::Write;

use sitecanvas_core::{Element, ElementKind, Props};

use crate::escape;
use crate::template;

const BASE: &str = "* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    color: #111827;
}

.page {
    position: relative;
    width: 100%;
}

.nav-links {
    display: flex;
    gap: 1.5rem;
}

.nav-link {
    color: inherit;
    text-decoration: none;
}

.form-field {
    margin-bottom: 1rem;
}

.form-label {
    display: block;
    font-size: 0.875rem;
    font-weight: 500;
    margin-bottom: 0.25rem;
}

.form-input {
    width: 100%;
    padding: 0.5rem 0.75rem;
    border: 1px solid #d1d5db;
    border-radius: 0.375rem;
}

.form-submit {
    width: 100%;
    padding: 0.5rem 1rem;
    background: #4f46e5;
    color: #ffffff;
    border: none;
    border-radius: 0.375rem;
    cursor: pointer;
}

.hero-title {
    font-size: 2.25rem;
    font-weight: 700;
    margin-bottom: 1rem;
}

.hero-subtitle {
    font-size: 1.25rem;
    color: #4b5563;
}

.card-title {
    font-size: 1.125rem;
    font-weight: 600;
    margin-bottom: 0.5rem;
}

.card-content {
    color: #4b5563;
}

.grid-item,
.flex-item {
    background: #f3f4f6;
    padding: 1rem;
    border-radius: 0.25rem;
    text-align: center;
}
";

/// Style keys whose numeric values carry no unit.
const UNITLESS: [&str; 5] = ["opacity", "zIndex", "fontWeight", "lineHeight", "flexGrow"];

/// Render the stylesheet for a page.
///
/// Rule blocks follow sequence order. Each is keyed by the element's class
/// list compounded with the `el-{index}` class the HTML emitter assigns.
#[must_use]
pub fn render_css(elements: &[Element]) -> String {
    let mut css = String::from(BASE);

    for (index, element) in elements.iter().enumerate() {
        let class = selector(element, index);
        if let ElementKind::Unknown(name) = &element.kind {
            let _ = write!(css, "\n/* {} */", template::unknown_marker(name));
        }
        let _ = writeln!(css, "\n{class} {{");
        let _ = writeln!(css, "    position: absolute;");
        let _ = writeln!(css, "    left: {}px;", element.position.x);
        let _ = writeln!(css, "    top: {}px;", element.position.y);
        let _ = writeln!(css, "    width: {}px;", element.size.width);
        let _ = writeln!(css, "    height: {}px;", element.size.height);
        for (property, value) in type_declarations(&element.kind, &element.props) {
            let _ = writeln!(css, "    {property}: {value};");
        }
        for (key, value) in element.styles.entries() {
            let property = escape::kebab_case(&key);
            let value = css_value(&key, &value);
            if property.is_empty() || value.is_empty() {
                continue;
            }
            let _ = writeln!(css, "    {property}: {value};");
        }
        css.push_str("}\n");

        match element.kind {
            ElementKind::Button => {
                let _ = writeln!(css, "\n{class}:hover {{\n    opacity: 0.9;\n}}");
            }
            ElementKind::Input => {
                let _ = writeln!(
                    css,
                    "\n{class}:focus {{\n    outline: none;\n    border-color: #4f46e5;\n    box-shadow: 0 0 0 2px rgba(79, 70, 229, 0.2);\n}}"
                );
            }
            _ => {}
        }
    }

    css
}

/// Compound class selector matching the outer tag the HTML emitter writes.
fn selector(element: &Element, index: usize) -> String {
    let mut selector = String::new();
    for class in template::html_class(element).split_whitespace() {
        selector.push('.');
        selector.push_str(&escape::css_class(class));
    }
    selector.push('.');
    selector.push_str(&template::element_class(index));
    selector
}

/// Append `px` to bare numbers on length properties.
fn css_value(key: &str, value: &str) -> String {
    let value = escape::css_value(value);
    if !UNITLESS.contains(&key) && value.parse::<f64>().is_ok() && value != "0" {
        format!("{value}px")
    } else {
        value
    }
}

fn type_declarations(kind: &ElementKind, props: &Props) -> Vec<(&'static str, String)> {
    let fixed = |pairs: &[(&'static str, &str)]| -> Vec<(&'static str, String)> {
        pairs.iter().map(|(k, v)| (*k, (*v).to_string())).collect()
    };
    let mut decls = match kind {
        ElementKind::Text => fixed(&[("color", "#111827")]),
        ElementKind::Image => fixed(&[("object-fit", "cover"), ("border-radius", "0.5rem")]),
        ElementKind::Button => fixed(&[
            ("background-color", "#4f46e5"),
            ("color", "#ffffff"),
            ("border", "none"),
            ("border-radius", "0.375rem"),
            ("padding", "0.5rem 1rem"),
            ("cursor", "pointer"),
            ("transition", "background-color 0.2s"),
        ]),
        ElementKind::Input => fixed(&[
            ("border", "1px solid #d1d5db"),
            ("border-radius", "0.375rem"),
            ("padding", "0.5rem 0.75rem"),
        ]),
        ElementKind::Form => fixed(&[
            ("padding", "1.5rem"),
            ("background-color", "#ffffff"),
            ("border", "1px solid #e5e7eb"),
            ("border-radius", "0.5rem"),
        ]),
        ElementKind::Container => fixed(&[
            ("padding", "1rem"),
            ("background-color", "#f9fafb"),
            ("border", "1px solid #e5e7eb"),
            ("border-radius", "0.5rem"),
        ]),
        ElementKind::Header => fixed(&[
            ("padding", "1rem 1.5rem"),
            ("background-color", "#ffffff"),
            ("border-bottom", "1px solid #e5e7eb"),
        ]),
        ElementKind::Footer => fixed(&[
            ("padding", "2rem 1.5rem"),
            ("background-color", "#111827"),
            ("color", "#ffffff"),
        ]),
        ElementKind::Navbar => fixed(&[
            ("display", "flex"),
            ("align-items", "center"),
            ("gap", "2rem"),
            ("padding", "1rem 1.5rem"),
            ("background-color", "#111827"),
            ("color", "#ffffff"),
        ]),
        ElementKind::Hero => fixed(&[
            ("text-align", "center"),
            ("padding", "5rem 0"),
            ("background-color", "#f9fafb"),
        ]),
        ElementKind::Card => fixed(&[
            ("padding", "1.5rem"),
            ("background-color", "#ffffff"),
            ("border", "1px solid #e5e7eb"),
            ("border-radius", "0.5rem"),
            ("box-shadow", "0 1px 2px rgba(0, 0, 0, 0.05)"),
        ]),
        ElementKind::Grid => vec![
            ("display", "grid".to_string()),
            (
                "grid-template-columns",
                format!("repeat({}, minmax(0, 1fr))", grid_columns(props)),
            ),
            ("gap", gap(props).to_string()),
            ("padding", "1rem".to_string()),
        ],
        ElementKind::Flex => vec![
            ("display", "flex".to_string()),
            ("flex-direction", flex_direction(props).to_string()),
            ("justify-content", justify(props).to_string()),
            ("align-items", align(props).to_string()),
            ("gap", gap(props).to_string()),
            ("padding", "1rem".to_string()),
        ],
        ElementKind::Unknown(_) => fixed(&[
            ("padding", "1rem"),
            ("background-color", "#f3f4f6"),
            ("border", "1px dashed #d1d5db"),
        ]),
    };

    if let Some(align) = props.non_empty("textAlign").and_then(text_align) {
        decls.push(("text-align", align.to_string()));
    }
    if let Some(fit) = props.non_empty("objectFit").and_then(object_fit) {
        if matches!(kind, ElementKind::Image) {
            decls.retain(|(property, _)| *property != "object-fit");
            decls.push(("object-fit", fit.to_string()));
        }
    }
    decls
}

fn grid_columns(props: &Props) -> u8 {
    props
        .non_empty("columns")
        .and_then(|c| c.trim().parse::<u8>().ok())
        .map_or(2, |c| c.clamp(1, 12))
}

fn gap(props: &Props) -> &'static str {
    match props.non_empty("gap") {
        Some("none") => "0",
        Some("sm") => "0.5rem",
        Some("lg") => "1.5rem",
        Some("xl") => "2rem",
        _ => "1rem",
    }
}

fn flex_direction(props: &Props) -> &'static str {
    match props.non_empty("direction") {
        Some("column" | "col") => "column",
        _ => "row",
    }
}

fn justify(props: &Props) -> &'static str {
    match props.non_empty("justify") {
        Some("start") => "flex-start",
        Some("end") => "flex-end",
        Some("between") => "space-between",
        Some("around") => "space-around",
        _ => "center",
    }
}

fn align(props: &Props) -> &'static str {
    match props.non_empty("align") {
        Some("start") => "flex-start",
        Some("end") => "flex-end",
        Some("stretch") => "stretch",
        _ => "center",
    }
}

fn text_align(value: &str) -> Option<&'static str> {
    match value {
        "left" => Some("left"),
        "center" => Some("center"),
        "right" => Some("right"),
        "justify" => Some("justify"),
        _ => None,
    }
}

fn object_fit(value: &str) -> Option<&'static str> {
    match value {
        "cover" => Some("cover"),
        "contain" => Some("contain"),
        "fill" => Some("fill"),
        "none" => Some("none"),
        _ => None,
    }
}
