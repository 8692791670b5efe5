//! Canvas elements - the placed components of a page.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::defaults;
use crate::{CanvasError, CanvasResult};

/// Minimum element width in pixels.
pub const MIN_WIDTH: i32 = 50;

/// Minimum element height in pixels.
pub const MIN_HEIGHT: i32 = 30;

/// Offset subtracted from the pointer when a palette item is dropped, so the
/// element appears under the cursor rather than below-right of it.
pub const DROP_OFFSET: i32 = 20;

/// Largest coordinate or dimension an element may have, in pixels.
///
/// Geometry read from storage is clamped to it, which keeps edge arithmetic
/// (`x + width`) well inside `i32`.
pub const MAX_COORDINATE: i32 = 1_000_000;

/// Unique identifier for an element.
///
/// New ids are UUID v4 strings. Ids read from stored projects are kept
/// verbatim, so older `element_<millis>_<random>` ids survive a round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Parse an id received from a client.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::EmptyElementId`] if the id is blank.
    pub fn parse(id: &str) -> CanvasResult<Self> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(CanvasError::EmptyElementId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The component type of an element.
///
/// The set is closed; any other type string read from storage is preserved in
/// [`ElementKind::Unknown`] and rendered as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// A run of text.
    Text,
    /// An image.
    Image,
    /// A clickable button.
    Button,
    /// A single-line input field.
    Input,
    /// A contact form stub.
    Form,
    /// A generic box.
    Container,
    /// Page header.
    Header,
    /// Page footer.
    Footer,
    /// Navigation bar.
    Navbar,
    /// Hero banner with title and subtitle.
    Hero,
    /// Card with title and body.
    Card,
    /// Grid layout with placeholder cells.
    Grid,
    /// Flex row with placeholder items.
    Flex,
    /// A type this version does not know about.
    Unknown(String),
}

impl ElementKind {
    /// Every known component type, in palette order.
    pub const ALL: [ElementKind; 13] = [
        ElementKind::Text,
        ElementKind::Image,
        ElementKind::Button,
        ElementKind::Input,
        ElementKind::Form,
        ElementKind::Container,
        ElementKind::Header,
        ElementKind::Footer,
        ElementKind::Navbar,
        ElementKind::Hero,
        ElementKind::Card,
        ElementKind::Grid,
        ElementKind::Flex,
    ];

    /// Parse a type name. Never fails; unrecognised names become `Unknown`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "text" => Self::Text,
            "image" => Self::Image,
            "button" => Self::Button,
            "input" => Self::Input,
            "form" => Self::Form,
            "container" => Self::Container,
            "header" => Self::Header,
            "footer" => Self::Footer,
            "navbar" => Self::Navbar,
            "hero" => Self::Hero,
            "card" => Self::Card,
            "grid" => Self::Grid,
            "flex" => Self::Flex,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire name of the type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Button => "button",
            Self::Input => "input",
            Self::Form => "form",
            Self::Container => "container",
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Navbar => "navbar",
            Self::Hero => "hero",
            Self::Card => "card",
            Self::Grid => "grid",
            Self::Flex => "flex",
            Self::Unknown(name) => name,
        }
    }

    /// Whether this is one of the known component types.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Interactive types get hover/focus rules in generated stylesheets.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Button | Self::Input)
    }

    /// Default size when placed from the palette.
    #[must_use]
    pub fn default_size(&self) -> Size {
        defaults::size_for(self)
    }

    /// Default props when placed from the palette.
    #[must_use]
    pub fn default_props(&self) -> Props {
        defaults::props_for(self)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

/// Offset of an element from the canvas origin, in whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Pixels from the left edge.
    #[serde(deserialize_with = "pixel")]
    pub x: i32,
    /// Pixels from the top edge.
    #[serde(deserialize_with = "pixel")]
    pub y: i32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamp both coordinates to `0..=MAX_COORDINATE`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0, MAX_COORDINATE),
            y: self.y.clamp(0, MAX_COORDINATE),
        }
    }
}

/// Width and height of an element, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    #[serde(deserialize_with = "pixel")]
    pub width: i32,
    /// Height in pixels.
    #[serde(deserialize_with = "pixel")]
    pub height: i32,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Clamp to the minimum element dimensions.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.clamp(MIN_WIDTH, MAX_COORDINATE),
            height: self.height.clamp(MIN_HEIGHT, MAX_COORDINATE),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(MIN_WIDTH, MIN_HEIGHT)
    }
}

/// Accepts any JSON number for a pixel coordinate and rounds it.
#[allow(clippy::cast_possible_truncation)]
fn pixel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(D::Error::custom("pixel value must be finite"));
    }
    Ok(value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
}

/// Accepts strings, numbers and booleans for a text prop.
fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!("expected text, found {other}"))),
    }
}

/// Content fields of an element.
///
/// Known keys are typed; anything else lands in `extra` and is preserved on
/// save. Which keys matter depends on the element type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Props {
    /// Primary text content.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
    /// Alternate text content (older documents).
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// CSS class list.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Image source URL.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Image alt text.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// HTML input type.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_type: Option<String>,
    /// Input placeholder.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Heading text for hero, card and form.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Hero subtitle.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Card or footer body text.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Visual variant name.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Navbar brand text.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Newline separated link labels.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub links: Option<String>,
    /// Newline separated `name:type:label` form field lines.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
    /// Form submit label.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub submit_text: Option<String>,
    /// Heading level for headers.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Grid column count.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub columns: Option<String>,
    /// Grid/flex gap keyword.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    /// Flex/container direction.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Semantic tag for containers (`div`, `section`, ...).
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub container_type: Option<String>,
    /// Text size utility class.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    /// Text alignment utility class.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    /// Image object-fit utility class.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub object_fit: Option<String>,
    /// Flex main-axis alignment.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub justify: Option<String>,
    /// Flex cross-axis alignment.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    /// Unrecognised keys, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Props {
    fn slot(&self, key: &str) -> Option<&Option<String>> {
        Some(match key {
            "children" => &self.children,
            "text" => &self.text,
            "className" => &self.class_name,
            "src" => &self.src,
            "alt" => &self.alt,
            "type" => &self.input_type,
            "placeholder" => &self.placeholder,
            "title" => &self.title,
            "subtitle" => &self.subtitle,
            "content" => &self.content,
            "variant" => &self.variant,
            "brand" => &self.brand,
            "links" => &self.links,
            "fields" => &self.fields,
            "submitText" => &self.submit_text,
            "level" => &self.level,
            "columns" => &self.columns,
            "gap" => &self.gap,
            "direction" => &self.direction,
            "containerType" => &self.container_type,
            "fontSize" => &self.font_size,
            "textAlign" => &self.text_align,
            "objectFit" => &self.object_fit,
            "justify" => &self.justify,
            "align" => &self.align,
            _ => return None,
        })
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        Some(match key {
            "children" => &mut self.children,
            "text" => &mut self.text,
            "className" => &mut self.class_name,
            "src" => &mut self.src,
            "alt" => &mut self.alt,
            "type" => &mut self.input_type,
            "placeholder" => &mut self.placeholder,
            "title" => &mut self.title,
            "subtitle" => &mut self.subtitle,
            "content" => &mut self.content,
            "variant" => &mut self.variant,
            "brand" => &mut self.brand,
            "links" => &mut self.links,
            "fields" => &mut self.fields,
            "submitText" => &mut self.submit_text,
            "level" => &mut self.level,
            "columns" => &mut self.columns,
            "gap" => &mut self.gap,
            "direction" => &mut self.direction,
            "containerType" => &mut self.container_type,
            "fontSize" => &mut self.font_size,
            "textAlign" => &mut self.text_align,
            "objectFit" => &mut self.object_fit,
            "justify" => &mut self.justify,
            "align" => &mut self.align,
            _ => return None,
        })
    }

    /// Read a prop by its wire key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.slot(key) {
            Some(value) => value.as_deref(),
            None => self.extra.get(key).and_then(Value::as_str),
        }
    }

    /// Read a prop, treating the empty string as absent.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Write a prop by its wire key. `None` removes it.
    pub fn set(&mut self, key: &str, value: Option<String>) {
        if let Some(slot) = self.slot_mut(key) {
            *slot = value;
            return;
        }
        match value {
            Some(v) => {
                self.extra.insert(key.to_string(), Value::String(v));
            }
            None => {
                self.extra.remove(key);
            }
        }
    }

    /// Builder form of [`Props::set`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, Some(value.into()));
        self
    }
}

/// A single style value as stored by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// Numeric value such as an opacity.
    Number(serde_json::Number),
    /// CSS text such as `#ffffff` or `4px`.
    Text(String),
}

impl StyleValue {
    /// Whether the value renders to nothing.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Presentation fields of an element, independent of its type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    /// Background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<StyleValue>,
    /// Text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<StyleValue>,
    /// Font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<StyleValue>,
    /// Border width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<StyleValue>,
    /// Border color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<StyleValue>,
    /// Border style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<StyleValue>,
    /// Corner radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<StyleValue>,
    /// Drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<StyleValue>,
    /// Opacity between 0 and 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<StyleValue>,
    /// Inner padding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<StyleValue>,
    /// Outer margin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<StyleValue>,
    /// Unrecognised keys, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Styles {
    fn known(&self) -> [(&'static str, &Option<StyleValue>); 11] {
        [
            ("backgroundColor", &self.background_color),
            ("color", &self.color),
            ("fontSize", &self.font_size),
            ("borderWidth", &self.border_width),
            ("borderColor", &self.border_color),
            ("borderStyle", &self.border_style),
            ("borderRadius", &self.border_radius),
            ("boxShadow", &self.box_shadow),
            ("opacity", &self.opacity),
            ("padding", &self.padding),
            ("margin", &self.margin),
        ]
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<StyleValue>> {
        Some(match key {
            "backgroundColor" => &mut self.background_color,
            "color" => &mut self.color,
            "fontSize" => &mut self.font_size,
            "borderWidth" => &mut self.border_width,
            "borderColor" => &mut self.border_color,
            "borderStyle" => &mut self.border_style,
            "borderRadius" => &mut self.border_radius,
            "boxShadow" => &mut self.box_shadow,
            "opacity" => &mut self.opacity,
            "padding" => &mut self.padding,
            "margin" => &mut self.margin,
            _ => return None,
        })
    }

    /// Read a style by its camelCase key, rendered as text.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some((_, value)) = self.known().into_iter().find(|(k, _)| *k == key) {
            return value.as_ref().map(ToString::to_string);
        }
        self.extra.get(key).and_then(render_extra)
    }

    /// Write a style by its camelCase key. `None` removes it.
    pub fn set(&mut self, key: &str, value: Option<StyleValue>) {
        if let Some(slot) = self.slot_mut(key) {
            *slot = value;
            return;
        }
        match value {
            Some(v) => {
                let json = serde_json::to_value(v).unwrap_or(Value::Null);
                self.extra.insert(key.to_string(), json);
            }
            None => {
                self.extra.remove(key);
            }
        }
    }

    /// Builder form of [`Styles::set`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.set(key, Some(value.into()));
        self
    }

    /// All non-blank declarations as `(camelCaseKey, value)` pairs.
    ///
    /// Known keys come first in a fixed order, then extras sorted by key, so
    /// the result is stable for a given bag.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, String)> {
        let known = self.known().into_iter().filter_map(|(key, value)| {
            value
                .as_ref()
                .filter(|v| !v.is_blank())
                .map(|v| (key.to_string(), v.to_string()))
        });
        let extra = self
            .extra
            .iter()
            .filter_map(|(key, value)| render_extra(value).map(|v| (key.clone(), v)));
        known.chain(extra).collect()
    }

    /// Whether no declaration would be emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

fn render_extra(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A placed component on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Component type.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Offset from the canvas origin.
    pub position: Position,
    /// Width and height.
    pub size: Size,
    /// Content fields.
    #[serde(default)]
    pub props: Props,
    /// Presentation fields.
    #[serde(default)]
    pub styles: Styles,
}

impl Element {
    /// Create an element at the origin with the type's default size and props.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            size: kind.default_size(),
            props: kind.default_props(),
            kind,
            position: Position::default(),
            styles: Styles::default(),
        }
    }

    /// Create an element dropped from the palette at the given pointer position.
    ///
    /// The element's top-left corner lands [`DROP_OFFSET`] pixels up and left
    /// of the pointer, clamped to the canvas.
    #[must_use]
    pub fn create(kind: ElementKind, pointer: Position) -> Self {
        let position = Position::new(
            pointer.x.saturating_sub(DROP_OFFSET),
            pointer.y.saturating_sub(DROP_OFFSET),
        )
        .clamped();
        Self::new(kind).with_position(position)
    }

    /// Set the position (clamped).
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position.clamped();
        self
    }

    /// Set the size (clamped).
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size.clamped();
        self
    }

    /// Replace the props.
    #[must_use]
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// Replace the styles.
    #[must_use]
    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    /// Re-establish geometry invariants.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.position = self.position.clamped();
        self.size = self.size.clamped();
        self
    }

    /// Merge a partial update, keeping every field the patch does not name.
    #[must_use]
    pub fn apply(&self, patch: &ElementPatch) -> Self {
        let mut next = self.clone();
        if let Some(position) = patch.position {
            next.position = position;
        }
        if let Some(size) = patch.size {
            next.size = size;
        }
        if let Some(props) = &patch.props {
            next.props = props.clone();
        }
        if let Some(styles) = &patch.styles {
            next.styles = styles.clone();
        }
        next.normalized()
    }

    /// Right edge in canvas pixels.
    #[must_use]
    pub fn right(&self) -> i32 {
        self.position.x.saturating_add(self.size.width)
    }

    /// Bottom edge in canvas pixels.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.position.y.saturating_add(self.size.height)
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.position.x && x <= self.right() && y >= self.position.y && y <= self.bottom()
    }
}

/// A partial element update. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// New size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Replacement props.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    /// Replacement styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
}

impl ElementPatch {
    /// Patch that moves an element.
    #[must_use]
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Patch that moves and resizes an element.
    #[must_use]
    pub fn geometry(position: Position, size: Size) -> Self {
        Self {
            position: Some(position),
            size: Some(size),
            ..Self::default()
        }
    }

    /// Patch that replaces the props.
    #[must_use]
    pub fn props(props: Props) -> Self {
        Self {
            props: Some(props),
            ..Self::default()
        }
    }

    /// Patch that replaces the styles.
    #[must_use]
    pub fn styles(styles: Styles) -> Self {
        Self {
            styles: Some(styles),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.size.is_none() && self.props.is_none() && self.styles.is_none()
    }
}
