//! Per-type markup templates.
//!
//! [`template_for`] is the single dispatch point from an element type to its
//! structure. The HTML and React emitters walk the same [`Template`], so the
//! two outputs always agree on tags, text and attributes.

use sitecanvas_core::defaults::PLACEHOLDER_IMAGE;
use sitecanvas_core::{Element, ElementKind};

use crate::escape;

/// Container tags a `container` element may render as.
const CONTAINER_TAGS: [&str; 5] = ["div", "section", "article", "aside", "main"];

/// Heading tags a `header` title may render as.
const HEADING_TAGS: [&str; 4] = ["h1", "h2", "h3", "h4"];

/// A node inside an element's markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested tag.
    Tag(Tag),
    /// Text content, unescaped.
    Text(String),
}

/// A nested tag with separate class lists for the static site and the
/// React component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name.
    pub name: &'static str,
    /// Class used in generated HTML; styled by the generated stylesheet.
    pub html_class: Option<&'static str>,
    /// Utility classes used in the React component.
    pub jsx_class: Option<&'static str>,
    /// Attributes, unescaped.
    pub attrs: Vec<(&'static str, String)>,
    /// Children.
    pub children: Vec<Node>,
}

impl Tag {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            html_class: None,
            jsx_class: None,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    fn class(mut self, html: &'static str, jsx: &'static str) -> Self {
        self.html_class = Some(html);
        self.jsx_class = Some(jsx);
        self
    }

    fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    fn child(mut self, tag: Tag) -> Self {
        self.children.push(Node::Tag(tag));
        self
    }

    /// Whether the tag has no closing form.
    #[must_use]
    pub fn is_void(&self) -> bool {
        is_void(self.name)
    }
}

/// Tags written without a closing tag.
#[must_use]
pub fn is_void(name: &str) -> bool {
    matches!(name, "img" | "input" | "br" | "hr")
}

/// Everything an emitter needs to render one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Outer tag name.
    pub tag: &'static str,
    /// Attributes of the outer tag, unescaped.
    pub attrs: Vec<(&'static str, String)>,
    /// Inner content.
    pub children: Vec<Node>,
    /// Utility classes used by the React component when the element has no
    /// `className`.
    pub fallback_class: &'static str,
    /// Marker comment for placeholder output, already sanitized.
    pub comment: Option<String>,
}

impl Template {
    fn new(tag: &'static str, fallback_class: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            fallback_class,
            comment: None,
        }
    }

    fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    fn child(mut self, tag: Tag) -> Self {
        self.children.push(Node::Tag(tag));
        self
    }

    /// Whether the outer tag has no closing form.
    #[must_use]
    pub fn is_void(&self) -> bool {
        is_void(self.tag)
    }
}

/// First non-empty prop among `keys`, or `fallback`.
fn text_or(element: &Element, keys: &[&str], fallback: &str) -> String {
    keys.iter()
        .find_map(|key| element.props.non_empty(key))
        .unwrap_or(fallback)
        .to_string()
}

/// Non-empty, trimmed lines of a multi-line prop.
fn lines(element: &Element, key: &str) -> Vec<String> {
    element
        .props
        .non_empty(key)
        .map(|value| {
            value
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn link_list(labels: Vec<String>) -> Tag {
    labels.into_iter().fold(
        Tag::new("div").class("nav-links", "flex space-x-6"),
        |list, label| {
            list.child(
                Tag::new("a")
                    .class("nav-link", "hover:text-gray-300")
                    .attr("href", "#")
                    .text(label),
            )
        },
    )
}

fn form_field(label: &'static str, input_type: &'static str, name: &'static str) -> Tag {
    Tag::new("div")
        .class("form-field", "")
        .child(
            Tag::new("label")
                .class("form-label", "block text-sm font-medium text-gray-700 mb-1")
                .text(label),
        )
        .child(
            Tag::new("input")
                .class(
                    "form-input",
                    "w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-indigo-500",
                )
                .attr("type", input_type)
                .attr("name", name),
        )
}

/// Build the template for an element.
#[must_use]
pub fn template_for(element: &Element) -> Template {
    match &element.kind {
        ElementKind::Text => {
            Template::new("div", "text-gray-900").text(text_or(element, &["children", "text"], "Text"))
        }
        ElementKind::Image => Template::new("img", "rounded-lg object-cover")
            .attr("src", text_or(element, &["src"], PLACEHOLDER_IMAGE))
            .attr("alt", text_or(element, &["alt"], "Image")),
        ElementKind::Button => Template::new(
            "button",
            "px-4 py-2 bg-indigo-600 text-white rounded-md hover:bg-indigo-700 transition-colors",
        )
        .attr("type", "button")
        .text(text_or(element, &["children", "text"], "Button")),
        ElementKind::Input => Template::new("input", "w-full px-3 py-2 border border-gray-300 rounded-md")
            .attr("type", text_or(element, &["type"], "text"))
            .attr("placeholder", text_or(element, &["placeholder"], "Enter text...")),
        ElementKind::Form => {
            let mut template = Template::new(
                "form",
                "space-y-4 p-6 bg-white border border-gray-200 rounded-lg",
            );
            if let Some(title) = element.props.non_empty("title") {
                template = template.child(
                    Tag::new("h3")
                        .class("form-title", "text-lg font-semibold text-gray-900")
                        .text(title),
                );
            }
            template
                .child(form_field("Name", "text", "name"))
                .child(form_field("Email", "email", "email"))
                .child(
                    Tag::new("button")
                        .class(
                            "form-submit",
                            "w-full bg-indigo-600 text-white py-2 px-4 rounded-md hover:bg-indigo-700 transition-colors",
                        )
                        .attr("type", "submit")
                        .text(text_or(element, &["submitText"], "Submit")),
                )
        }
        ElementKind::Container => {
            let tag = element
                .props
                .non_empty("containerType")
                .and_then(|name| CONTAINER_TAGS.iter().find(|t| **t == name))
                .copied()
                .unwrap_or("div");
            Template::new(tag, "p-4 bg-gray-50 border border-gray-200 rounded-lg")
                .text(text_or(element, &["children"], "Container"))
        }
        ElementKind::Header => {
            let template = Template::new("header", "w-full py-4 px-6 bg-white border-b border-gray-200");
            match element.props.non_empty("title") {
                Some(title) => {
                    let level = element
                        .props
                        .non_empty("level")
                        .and_then(|name| HEADING_TAGS.iter().find(|t| **t == name))
                        .copied()
                        .unwrap_or("h1");
                    template.child(
                        Tag::new(level)
                            .class("header-title", "text-2xl font-bold text-gray-900")
                            .text(title),
                    )
                }
                None => template.text(text_or(element, &["children"], "Header")),
            }
        }
        ElementKind::Footer => {
            let template = Template::new("footer", "w-full py-8 px-6 bg-gray-900 text-white")
                .text(text_or(element, &["content", "children"], "Footer"));
            let links = lines(element, "links");
            if links.is_empty() {
                template
            } else {
                template.child(link_list(links))
            }
        }
        ElementKind::Navbar => {
            let mut template = Template::new("nav", "w-full py-4 px-6 bg-gray-900 text-white");
            let links = lines(element, "links");
            match element.props.non_empty("brand") {
                Some(brand) => {
                    template = template.child(
                        Tag::new("span")
                            .class("nav-brand", "text-xl font-bold mr-8")
                            .text(brand),
                    );
                }
                None if links.is_empty() => {
                    template = template.text(text_or(element, &["children"], "Navigation Bar"));
                }
                None => {}
            }
            if !links.is_empty() {
                template = template.child(link_list(links));
            }
            template
        }
        ElementKind::Hero => Template::new("div", "text-center py-20 bg-gray-50")
            .child(
                Tag::new("h1")
                    .class("hero-title", "text-4xl font-bold text-gray-900 mb-4")
                    .text(text_or(element, &["title"], "Hero Title")),
            )
            .child(
                Tag::new("p")
                    .class("hero-subtitle", "text-xl text-gray-600")
                    .text(text_or(element, &["subtitle"], "Hero subtitle goes here")),
            ),
        ElementKind::Card => Template::new("div", "p-6 bg-white border border-gray-200 rounded-lg shadow-sm")
            .child(
                Tag::new("h3")
                    .class("card-title", "text-lg font-semibold text-gray-900 mb-2")
                    .text(text_or(element, &["title"], "Card Title")),
            )
            .child(
                Tag::new("p")
                    .class("card-content", "text-gray-600")
                    .text(text_or(element, &["content"], "Card content goes here")),
            ),
        ElementKind::Grid => (1..=4).fold(
            Template::new("div", "grid grid-cols-2 gap-4 p-4 border border-gray-200 rounded-lg"),
            |template, i| {
                template.child(
                    Tag::new("div")
                        .class("grid-item", "bg-gray-100 p-4 rounded text-center")
                        .text(format!("Grid Item {i}")),
                )
            },
        ),
        ElementKind::Flex => (1..=3).fold(
            Template::new(
                "div",
                "flex items-center justify-center p-4 border border-gray-200 rounded-lg space-x-4",
            ),
            |template, i| {
                template.child(
                    Tag::new("div")
                        .class("flex-item", "bg-gray-100 p-4 rounded")
                        .text(format!("Flex Item {i}")),
                )
            },
        ),
        ElementKind::Unknown(name) => {
            let mut template = Template::new("div", "p-4 bg-gray-100 border border-gray-300 rounded-lg")
                .attr("data-component", name.clone())
                .text(text_or(element, &["children"], "Unknown component"));
            template.comment = Some(unknown_marker(name));
            template
        }
    }
}

/// Marker text naming an unrecognized type, safe inside any comment syntax.
#[must_use]
pub fn unknown_marker(name: &str) -> String {
    format!("Unknown component: {}", escape::identifier(name))
}

/// Class list of the outer tag in generated HTML: the element's
/// `className`, or `{type}-element`.
#[must_use]
pub fn html_class(element: &Element) -> String {
    match element.props.non_empty("className") {
        Some(class) => class.trim().to_string(),
        None => format!("{}-element", escape::identifier(element.kind.as_str())),
    }
}

/// Class list of the outer tag in the React component.
#[must_use]
pub fn jsx_class(element: &Element, template: &Template) -> String {
    element
        .props
        .non_empty("className")
        .map_or_else(|| template.fallback_class.to_string(), |c| c.trim().to_string())
}

/// Per-element class shared by the HTML and the stylesheet.
#[must_use]
pub fn element_class(index: usize) -> String {
    format!("el-{index}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecanvas_core::Props;

    fn count_tags(nodes: &[Node], name: &str) -> usize {
        nodes
            .iter()
            .map(|node| match node {
                Node::Tag(tag) => usize::from(tag.name == name) + count_tags(&tag.children, name),
                Node::Text(_) => 0,
            })
            .sum()
    }

    #[test]
    fn test_missing_props_fall_back() {
        let element = Element::new(ElementKind::Card).with_props(Props::default());
        let template = template_for(&element);
        assert_eq!(count_tags(&template.children, "h3"), 1);
        let Node::Tag(title) = &template.children[0] else {
            panic!("expected a tag");
        };
        assert_eq!(title.children, vec![Node::Text("Card Title".to_string())]);
    }

    #[test]
    fn test_form_always_has_stub_fields() {
        let element = Element::new(ElementKind::Form)
            .with_props(Props::default().with("fields", "phone:tel:Phone"));
        let template = template_for(&element);
        assert_eq!(template.tag, "form");
        assert_eq!(count_tags(&template.children, "input"), 2);
        assert_eq!(count_tags(&template.children, "button"), 1);
    }

    #[test]
    fn test_grid_and_flex_children() {
        let grid = template_for(&Element::new(ElementKind::Grid));
        assert_eq!(grid.children.len(), 4);
        let flex = template_for(&Element::new(ElementKind::Flex));
        assert_eq!(flex.children.len(), 3);
    }

    #[test]
    fn test_container_tag_is_whitelisted() {
        let section = Element::new(ElementKind::Container)
            .with_props(Props::default().with("containerType", "section"));
        assert_eq!(template_for(&section).tag, "section");

        let script = Element::new(ElementKind::Container)
            .with_props(Props::default().with("containerType", "script"));
        assert_eq!(template_for(&script).tag, "div");
    }

    #[test]
    fn test_unknown_is_marked_placeholder() {
        let element = Element::new(ElementKind::Unknown("fancy */ widget".into()));
        let template = template_for(&element);
        assert_eq!(template.tag, "div");
        assert_eq!(
            template.comment.as_deref(),
            Some("Unknown component: fancy----widget")
        );
        assert_eq!(
            template.children,
            vec![Node::Text("Unknown component".to_string())]
        );
        assert_eq!(html_class(&element), "fancy----widget-element");
    }

    #[test]
    fn test_navbar_brand_and_links() {
        let element = Element::new(ElementKind::Navbar).with_props(
            Props::default()
                .with("brand", "Acme")
                .with("links", "Home\n\n About \nContact"),
        );
        let template = template_for(&element);
        assert_eq!(count_tags(&template.children, "span"), 1);
        assert_eq!(count_tags(&template.children, "a"), 3);
    }

    #[test]
    fn test_html_class_defaults_to_type() {
        let element = Element::new(ElementKind::Hero).with_props(Props::default());
        assert_eq!(html_class(&element), "hero-element");
        let styled = Element::new(ElementKind::Hero);
        assert_eq!(html_class(&styled), "text-center py-20 bg-gray-50");
    }
}
