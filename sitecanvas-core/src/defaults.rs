//! Per-type palette defaults.

use crate::element::{ElementKind, Props, Size};

/// Placeholder image used for freshly placed image elements.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200";

/// Default primary button classes.
pub const BUTTON_PRIMARY_CLASS: &str =
    "px-4 py-2 bg-indigo-600 text-white rounded-md hover:bg-indigo-700 transition-colors";

/// Default input classes.
pub const INPUT_CLASS: &str = "w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-indigo-500";

/// Size an element of this type gets when dropped from the palette.
#[must_use]
pub fn size_for(kind: &ElementKind) -> Size {
    let (width, height) = match kind {
        ElementKind::Text => (200, 40),
        ElementKind::Image => (300, 200),
        ElementKind::Button => (120, 40),
        ElementKind::Input => (250, 40),
        ElementKind::Form => (400, 200),
        ElementKind::Container => (300, 150),
        ElementKind::Header => (800, 80),
        ElementKind::Footer => (800, 120),
        ElementKind::Navbar => (800, 60),
        ElementKind::Hero => (800, 400),
        ElementKind::Card => (300, 200),
        ElementKind::Grid => (600, 300),
        ElementKind::Flex => (400, 200),
        ElementKind::Unknown(_) => (200, 100),
    };
    Size::new(width, height)
}

/// Props an element of this type gets when dropped from the palette.
#[must_use]
pub fn props_for(kind: &ElementKind) -> Props {
    let props = Props::default();
    match kind {
        ElementKind::Text => props
            .with("children", "Your text here")
            .with("className", "text-gray-900"),
        ElementKind::Image => props
            .with("src", PLACEHOLDER_IMAGE)
            .with("alt", "Placeholder image")
            .with("className", "rounded-lg"),
        ElementKind::Button => props
            .with("children", "Click me")
            .with("className", BUTTON_PRIMARY_CLASS),
        ElementKind::Input => props
            .with("type", "text")
            .with("placeholder", "Enter text...")
            .with("className", INPUT_CLASS),
        ElementKind::Form => props
            .with("children", "Form")
            .with("className", "space-y-4 p-6 bg-white border border-gray-200 rounded-lg"),
        ElementKind::Container => props.with("children", "Container").with(
            "className",
            "p-4 bg-gray-50 border border-gray-200 rounded-lg min-h-[100px]",
        ),
        ElementKind::Header => props
            .with("children", "Header")
            .with("className", "w-full py-4 px-6 bg-white border-b border-gray-200"),
        ElementKind::Footer => props
            .with("children", "Footer")
            .with("className", "w-full py-8 px-6 bg-gray-900 text-white mt-auto"),
        ElementKind::Navbar => props
            .with("children", "Navigation Bar")
            .with("className", "w-full py-4 px-6 bg-gray-900 text-white"),
        ElementKind::Hero => props
            .with("title", "Hero Section")
            .with("subtitle", "This is a hero section")
            .with("className", "text-center py-20 bg-gray-50"),
        ElementKind::Card => props
            .with("title", "Card Title")
            .with("content", "Card content goes here")
            .with("className", "p-6 bg-white border border-gray-200 rounded-lg shadow-sm"),
        ElementKind::Grid => props.with("children", "Grid Layout").with(
            "className",
            "grid grid-cols-2 gap-4 p-4 border border-gray-200 rounded-lg min-h-[100px]",
        ),
        ElementKind::Flex => props.with("children", "Flex Layout").with(
            "className",
            "flex items-center justify-center p-4 border border-gray-200 rounded-lg min-h-[100px]",
        ),
        ElementKind::Unknown(_) => props,
    }
}

/// Button classes for a named variant, as the property editor applies them.
#[must_use]
pub fn button_variant_class(variant: &str) -> Option<&'static str> {
    match variant {
        "primary" => Some(BUTTON_PRIMARY_CLASS),
        "secondary" => Some(
            "px-4 py-2 bg-gray-200 text-gray-900 rounded-md hover:bg-gray-300 transition-colors",
        ),
        "outline" => Some("px-4 py-2 border-2 border-indigo-600 text-indigo-600 rounded-md hover:bg-indigo-600 hover:text-white transition-colors"),
        "danger" => Some(
            "px-4 py-2 bg-red-600 text-white rounded-md hover:bg-red-700 transition-colors",
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes_meet_minimums() {
        for kind in &ElementKind::ALL {
            let size = size_for(kind);
            assert!(size.width >= crate::element::MIN_WIDTH, "{kind}");
            assert!(size.height >= crate::element::MIN_HEIGHT, "{kind}");
        }
        assert_eq!(
            size_for(&ElementKind::Unknown("widget".into())),
            Size::new(200, 100)
        );
    }

    #[test]
    fn test_palette_props() {
        let hero = props_for(&ElementKind::Hero);
        assert_eq!(hero.get("title"), Some("Hero Section"));
        assert_eq!(hero.get("subtitle"), Some("This is a hero section"));

        let input = props_for(&ElementKind::Input);
        assert_eq!(input.get("type"), Some("text"));
        assert_eq!(input.get("placeholder"), Some("Enter text..."));

        assert!(props_for(&ElementKind::Unknown("x".into())).extra.is_empty());
    }

    #[test]
    fn test_button_variants() {
        assert_eq!(button_variant_class("primary"), Some(BUTTON_PRIMARY_CLASS));
        assert!(button_variant_class("danger").is_some());
        assert!(button_variant_class("fancy").is_none());
    }
}
