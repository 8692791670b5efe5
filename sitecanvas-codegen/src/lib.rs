//! # SiteCanvas Codegen
//!
//! Deterministic code generation from a canvas element list.
//!
//! ## Targets
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        template_for(element) -> Template    │
//! ├──────────┬──────────┬──────────┬────────────┤
//! │ HTML     │ CSS      │ JS       │ React      │
//! │ (by y)   │ (by seq) │ (static) │ (by seq)   │
//! └──────────┴──────────┴──────────┴────────────┘
//! ```
//!
//! Generation is pure and total: the same elements always produce the same
//! bytes, and unknown element types render as placeholders.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bundle;
pub mod css;
pub mod error;
pub mod escape;
pub mod html;
pub mod js;
pub mod react;
pub mod template;

use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sitecanvas_core::{Element, ElementKind};

pub use bundle::{deployment_files, nextjs_project_files, slugify, static_site_files, FileMap};
pub use error::{CodegenError, CodegenResult};
pub use react::GenerateOptions;

/// File name of the React component in [`GeneratedCode::files`].
pub const COMPONENT_FILE: &str = "GeneratedComponent.tsx";

/// Output target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Static HTML document.
    Html,
    /// Stylesheet.
    Css,
    /// Bootstrap script.
    #[serde(alias = "javascript")]
    Js,
    /// React component.
    React,
    /// HTML, CSS and JS together.
    Site,
}

impl Target {
    /// Every target.
    pub const ALL: [Target; 5] = [
        Target::Html,
        Target::Css,
        Target::Js,
        Target::React,
        Target::Site,
    ];

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::Js => "js",
            Self::React => "react",
            Self::Site => "site",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "css" => Ok(Self::Css),
            "js" | "javascript" => Ok(Self::Js),
            "react" | "tsx" => Ok(Self::React),
            "site" => Ok(Self::Site),
            _ => Err(CodegenError::UnknownTarget(s.to_string())),
        }
    }
}

/// Result of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCode {
    /// Target that was generated.
    pub target: Target,
    /// Primary output: the document, stylesheet, script or component.
    pub code: String,
    /// Every produced file by name. Single-file targets have one entry.
    pub files: BTreeMap<String, String>,
    /// Packages the output needs (React target only).
    pub dependencies: Vec<String>,
    /// Human-readable usage notes.
    pub instructions: String,
}

/// Generate `target` output with default options.
#[must_use]
pub fn generate(elements: &[Element], target: Target) -> GeneratedCode {
    generate_with(elements, target, &GenerateOptions::default())
}

/// Generate `target` output.
#[must_use]
pub fn generate_with(elements: &[Element], target: Target, options: &GenerateOptions) -> GeneratedCode {
    tracing::debug!(%target, elements = elements.len(), "Generating code");

    let (code, files) = match target {
        Target::Html => single("index.html", html::render_html(elements)),
        Target::Css => single("styles.css", css::render_css(elements)),
        Target::Js => single("script.js", js::render_js()),
        Target::React => single(COMPONENT_FILE, react::render_react(elements, options)),
        Target::Site => {
            let files = static_site_files(elements);
            let code = files.get("index.html").cloned().unwrap_or_default();
            (code, files)
        }
    };

    let dependencies = if target == Target::React {
        dependencies(elements)
    } else {
        Vec::new()
    };

    GeneratedCode {
        target,
        code,
        files,
        dependencies,
        instructions: instructions(elements, target, options),
    }
}

fn single(name: &str, code: String) -> (String, BTreeMap<String, String>) {
    let mut files = BTreeMap::new();
    files.insert(name.to_string(), code.clone());
    (code, files)
}

/// Packages a React component over these elements imports.
#[must_use]
pub fn dependencies(elements: &[Element]) -> Vec<String> {
    let has = |kind: ElementKind| elements.iter().any(|e| e.kind == kind);
    let mut deps = vec!["react".to_string()];
    if has(ElementKind::Image) {
        deps.push("next/image".to_string());
    }
    if has(ElementKind::Form) {
        deps.push("react-hook-form".to_string());
    }
    deps
}

/// Distinct type names in first-appearance order.
fn component_types(elements: &[Element]) -> Vec<&str> {
    let mut seen = Vec::new();
    for element in elements {
        let name = element.kind.as_str();
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

fn instructions(elements: &[Element], target: Target, options: &GenerateOptions) -> String {
    let types = component_types(elements);
    let used = if types.is_empty() {
        "none".to_string()
    } else {
        types.join(", ")
    };

    match target {
        Target::React => {
            let mut text = String::from("Generated React component with the following features:\n\n");
            let _ = writeln!(text, "• Components used: {used}");
            if options.responsive {
                text.push_str("• Responsive design enabled\n");
            }
            if options.include_styles {
                text.push_str("• Custom styles included\n");
            }
            text.push_str("\nTo use this component:\n");
            text.push_str("1. Copy the code to a new .tsx file\n");
            text.push_str("2. Install any required dependencies\n");
            text.push_str("3. Import and use the component in your application\n");
            text
        }
        Target::Html | Target::Css | Target::Js | Target::Site => format!(
            "Generated static site with the following features:\n\n\
             • Components used: {used}\n\n\
             To use these files:\n\
             1. Save index.html, styles.css and script.js in the same folder\n\
             2. Open index.html in a browser\n\
             3. Upload the folder to any static host to publish it\n"
        ),
    }
}
