//! Editable fields per element type.
//!
//! A property editor renders [`fields_for`] and writes changes back with
//! [`apply_field`], which returns a patch for [`crate::Canvas::update_element`].

use serde::Serialize;

use crate::defaults;
use crate::element::{Element, ElementKind, ElementPatch, StyleValue};
use crate::{CanvasError, CanvasResult};

/// Which bag a field lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldTarget {
    /// `element.props`
    Prop,
    /// `element.styles`
    Style,
}

/// Input control used to edit a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum FieldControl {
    /// Single-line text.
    Text,
    /// Multi-line text.
    TextArea,
    /// Fixed option list.
    Select {
        /// Allowed values.
        options: &'static [&'static str],
    },
    /// Color picker, stored as CSS text.
    Color,
    /// Numeric slider.
    Range {
        /// Lowest value.
        min: f64,
        /// Highest value.
        max: f64,
        /// Slider increment.
        step: f64,
        /// CSS unit appended when stored; empty stores a bare number.
        unit: &'static str,
    },
}

/// One editable field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Wire key in the target bag.
    pub key: &'static str,
    /// Human label.
    pub label: &'static str,
    /// Bag the value is stored in.
    pub target: FieldTarget,
    /// Editing control.
    #[serde(flatten)]
    pub control: FieldControl,
    /// Value shown when the bag has none.
    pub default: &'static str,
}

const fn prop(key: &'static str, label: &'static str, control: FieldControl, default: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        target: FieldTarget::Prop,
        control,
        default,
    }
}

const fn style(key: &'static str, label: &'static str, control: FieldControl, default: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        target: FieldTarget::Style,
        control,
        default,
    }
}

const fn select(options: &'static [&'static str]) -> FieldControl {
    FieldControl::Select { options }
}

const TEXT: FieldControl = FieldControl::Text;
const TEXT_AREA: FieldControl = FieldControl::TextArea;

const TEXT_FIELDS: &[FieldSpec] = &[
    prop("children", "Text Content", TEXT_AREA, ""),
    prop(
        "fontSize",
        "Font Size",
        select(&["text-xs", "text-sm", "text-base", "text-lg", "text-xl", "text-2xl", "text-3xl", "text-4xl"]),
        "text-base",
    ),
    prop(
        "textAlign",
        "Text Alignment",
        select(&["text-left", "text-center", "text-right", "text-justify"]),
        "text-left",
    ),
];

const IMAGE_FIELDS: &[FieldSpec] = &[
    prop("src", "Image URL", TEXT, ""),
    prop("alt", "Alt Text", TEXT, ""),
    prop(
        "objectFit",
        "Object Fit",
        select(&["object-cover", "object-contain", "object-fill", "object-scale-down"]),
        "object-cover",
    ),
];

const BUTTON_FIELDS: &[FieldSpec] = &[
    prop("children", "Button Text", TEXT, ""),
    prop(
        "variant",
        "Button Style",
        select(&["primary", "secondary", "outline", "danger"]),
        "primary",
    ),
];

const INPUT_FIELDS: &[FieldSpec] = &[
    prop(
        "type",
        "Input Type",
        select(&["text", "email", "password", "number", "tel", "url"]),
        "text",
    ),
    prop("placeholder", "Placeholder", TEXT, ""),
];

const HERO_FIELDS: &[FieldSpec] = &[
    prop("title", "Hero Title", TEXT, ""),
    prop("subtitle", "Hero Subtitle", TEXT_AREA, ""),
];

const CARD_FIELDS: &[FieldSpec] = &[
    prop("title", "Card Title", TEXT, ""),
    prop("content", "Card Content", TEXT_AREA, ""),
];

const NAVBAR_FIELDS: &[FieldSpec] = &[
    prop("brand", "Brand/Logo Text", TEXT, ""),
    prop(
        "links",
        "Navigation Links (one per line)",
        TEXT_AREA,
        "Home\nAbout\nServices\nContact",
    ),
    prop(
        "variant",
        "Navigation Style",
        select(&["default", "transparent", "dark", "light"]),
        "default",
    ),
];

const FORM_FIELDS: &[FieldSpec] = &[
    prop("title", "Form Title", TEXT, ""),
    prop(
        "fields",
        "Form Fields (one per line)",
        TEXT_AREA,
        "name:text:Your Name\nemail:email:Your Email\nmessage:textarea:Your Message",
    ),
    prop("submitText", "Submit Button Text", TEXT, "Submit"),
];

const HEADER_FIELDS: &[FieldSpec] = &[
    prop("title", "Header Title", TEXT, ""),
    prop("level", "Header Level", select(&["h1", "h2", "h3", "h4"]), "h1"),
];

const FOOTER_FIELDS: &[FieldSpec] = &[
    prop("content", "Footer Content", TEXT_AREA, ""),
    prop(
        "links",
        "Footer Links (one per line)",
        TEXT_AREA,
        "Privacy Policy\nTerms of Service\nContact",
    ),
];

const CONTAINER_FIELDS: &[FieldSpec] = &[
    prop(
        "containerType",
        "Container Type",
        select(&["div", "section", "article", "aside", "main"]),
        "div",
    ),
    prop("direction", "Layout Direction", select(&["column", "row"]), "column"),
];

const GRID_FIELDS: &[FieldSpec] = &[
    prop("columns", "Columns", select(&["1", "2", "3", "4", "6"]), "3"),
    prop("gap", "Gap", select(&["none", "sm", "md", "lg", "xl"]), "md"),
];

const FLEX_FIELDS: &[FieldSpec] = &[
    prop(
        "direction",
        "Direction",
        select(&["row", "column", "row-reverse", "column-reverse"]),
        "row",
    ),
    prop(
        "justify",
        "Justify Content",
        select(&["start", "center", "end", "between", "around", "evenly"]),
        "start",
    ),
    prop(
        "align",
        "Align Items",
        select(&["start", "center", "end", "stretch", "baseline"]),
        "start",
    ),
];

const FALLBACK_FIELDS: &[FieldSpec] = &[prop("children", "Content", TEXT_AREA, "")];

/// Shadow presets offered by the editor.
pub const SHADOW_PRESETS: &[&str] = &[
    "none",
    "0 1px 2px 0 rgb(0 0 0 / 0.05)",
    "0 1px 3px 0 rgb(0 0 0 / 0.1), 0 1px 2px -1px rgb(0 0 0 / 0.1)",
    "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)",
    "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)",
    "0 25px 50px -12px rgb(0 0 0 / 0.25)",
];

/// Style fields every element type exposes.
pub const STYLE_FIELDS: &[FieldSpec] = &[
    style("backgroundColor", "Background Color", FieldControl::Color, "#ffffff"),
    style("color", "Text Color", FieldControl::Color, "#000000"),
    style(
        "borderWidth",
        "Border Width",
        FieldControl::Range {
            min: 0.0,
            max: 10.0,
            step: 1.0,
            unit: "px",
        },
        "0",
    ),
    style("borderColor", "Border Color", FieldControl::Color, "#d1d5db"),
    style(
        "borderStyle",
        "Border Style",
        select(&["solid", "dashed", "dotted", "none"]),
        "solid",
    ),
    style(
        "borderRadius",
        "Border Radius",
        FieldControl::Range {
            min: 0.0,
            max: 50.0,
            step: 1.0,
            unit: "px",
        },
        "0",
    ),
    style("boxShadow", "Shadow", select(SHADOW_PRESETS), "none"),
    style(
        "opacity",
        "Opacity",
        FieldControl::Range {
            min: 0.0,
            max: 1.0,
            step: 0.1,
            unit: "",
        },
        "1",
    ),
    style("padding", "Padding", TEXT, ""),
];

fn content_fields(kind: &ElementKind) -> &'static [FieldSpec] {
    match kind {
        ElementKind::Text => TEXT_FIELDS,
        ElementKind::Image => IMAGE_FIELDS,
        ElementKind::Button => BUTTON_FIELDS,
        ElementKind::Input => INPUT_FIELDS,
        ElementKind::Form => FORM_FIELDS,
        ElementKind::Container => CONTAINER_FIELDS,
        ElementKind::Header => HEADER_FIELDS,
        ElementKind::Footer => FOOTER_FIELDS,
        ElementKind::Navbar => NAVBAR_FIELDS,
        ElementKind::Hero => HERO_FIELDS,
        ElementKind::Card => CARD_FIELDS,
        ElementKind::Grid => GRID_FIELDS,
        ElementKind::Flex => FLEX_FIELDS,
        ElementKind::Unknown(_) => FALLBACK_FIELDS,
    }
}

/// Editable fields for an element type: content fields first, then styles.
#[must_use]
pub fn fields_for(kind: &ElementKind) -> Vec<FieldSpec> {
    content_fields(kind)
        .iter()
        .chain(STYLE_FIELDS)
        .copied()
        .collect()
}

fn find_field(kind: &ElementKind, key: &str) -> CanvasResult<FieldSpec> {
    content_fields(kind)
        .iter()
        .chain(STYLE_FIELDS)
        .find(|f| f.key == key)
        .copied()
        .ok_or_else(|| CanvasError::UnknownField {
            key: key.to_string(),
            kind: kind.to_string(),
        })
}

/// Current value of a field, or its default when unset.
///
/// Range fields are returned without their unit.
///
/// # Errors
///
/// Returns [`CanvasError::UnknownField`] if the type has no such field.
pub fn read_field(element: &Element, key: &str) -> CanvasResult<String> {
    let spec = find_field(&element.kind, key)?;
    let stored = match spec.target {
        FieldTarget::Prop => element.props.non_empty(key).map(str::to_string),
        FieldTarget::Style => element.styles.get(key),
    };
    let value = stored.unwrap_or_else(|| spec.default.to_string());
    Ok(match spec.control {
        FieldControl::Range { unit, .. } if !unit.is_empty() => {
            value.trim_end_matches(unit).trim().to_string()
        }
        _ => value,
    })
}

/// Build the patch that writes `value` into a field.
///
/// An empty value clears the field. Setting a button's variant also swaps its
/// class list to the matching preset.
///
/// # Errors
///
/// Returns [`CanvasError::UnknownField`] if the type has no such field, or
/// [`CanvasError::InvalidFieldValue`] if the value does not fit the control.
pub fn apply_field(element: &Element, key: &str, value: &str) -> CanvasResult<ElementPatch> {
    let spec = find_field(&element.kind, key)?;
    let invalid = || CanvasError::InvalidFieldValue {
        key: key.to_string(),
        value: value.to_string(),
    };

    if value.is_empty() {
        return Ok(match spec.target {
            FieldTarget::Prop => {
                let mut props = element.props.clone();
                props.set(key, None);
                ElementPatch::props(props)
            }
            FieldTarget::Style => {
                let mut styles = element.styles.clone();
                styles.set(key, None);
                ElementPatch::styles(styles)
            }
        });
    }

    if let FieldControl::Select { options } = spec.control {
        if !options.contains(&value) {
            return Err(invalid());
        }
    }

    match spec.target {
        FieldTarget::Prop => {
            let mut props = element.props.clone();
            props.set(key, Some(value.to_string()));
            if element.kind == ElementKind::Button && key == "variant" {
                if let Some(class) = defaults::button_variant_class(value) {
                    props.set("className", Some(class.to_string()));
                }
            }
            Ok(ElementPatch::props(props))
        }
        FieldTarget::Style => {
            let stored = match spec.control {
                FieldControl::Range { min, max, unit, .. } => {
                    let number: f64 = value
                        .trim()
                        .trim_end_matches(unit)
                        .trim()
                        .parse()
                        .map_err(|_| invalid())?;
                    if !number.is_finite() {
                        return Err(invalid());
                    }
                    let number = number.clamp(min, max);
                    if unit.is_empty() {
                        serde_json::Number::from_f64(number)
                            .map(StyleValue::Number)
                            .ok_or_else(invalid)?
                    } else {
                        StyleValue::Text(format!("{number}{unit}"))
                    }
                }
                _ => StyleValue::Text(value.to_string()),
            };
            let mut styles = element.styles.clone();
            styles.set(key, Some(stored));
            Ok(ElementPatch::styles(styles))
        }
    }
}
