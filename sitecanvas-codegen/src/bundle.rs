//! Deployable file bundles.
//!
//! Both bundles are `path -> content` maps with forward-slash relative
//! paths, ready to be uploaded to a hosting provider.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use sitecanvas_core::Element;

use crate::{css, html, js};

/// Slug used when a project name has no usable characters.
const FALLBACK_SLUG: &str = "site";

/// Directory of the Next.js bundle that carries the static site.
pub const PREVIEW_DIR: &str = "public/preview";

/// A file map keyed by relative path.
pub type FileMap = BTreeMap<String, String>;

/// Lowercase a project name and replace every character outside
/// `[a-z0-9-]` with `-`.
#[must_use]
pub fn slugify(project_name: &str) -> String {
    let slug: String = project_name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// `index.html`, `styles.css` and `script.js` for the elements.
#[must_use]
pub fn static_site_files(elements: &[Element]) -> FileMap {
    let mut files = FileMap::new();
    files.insert("index.html".to_string(), html::render_html(elements));
    files.insert("styles.css".to_string(), css::render_css(elements));
    files.insert("script.js".to_string(), js::render_js());
    files
}

/// A Next.js app-router project wrapping a generated component.
///
/// `dependencies` are the generator's dependency names; `react` and
/// `next/*` imports are already covered by the base manifest and are
/// skipped.
#[must_use]
pub fn nextjs_project_files(code: &str, project_name: &str, dependencies: &[String]) -> FileMap {
    let mut files = FileMap::new();
    files.insert("package.json".to_string(), package_json(project_name, dependencies));
    files.insert("next.config.js".to_string(), NEXT_CONFIG.to_string());
    files.insert("postcss.config.js".to_string(), POSTCSS_CONFIG.to_string());
    files.insert("tsconfig.json".to_string(), tsconfig_json());
    files.insert("tailwind.config.js".to_string(), TAILWIND_CONFIG.to_string());
    files.insert("src/app/globals.css".to_string(), GLOBALS_CSS.to_string());
    files.insert("src/app/page.tsx".to_string(), client_page(code));
    files.insert("src/app/layout.tsx".to_string(), layout_tsx(project_name));
    files
}

/// Next.js project plus the static site under [`PREVIEW_DIR`], with the
/// generated stylesheet next to the page so its `./styles.css` import
/// resolves.
#[must_use]
pub fn deployment_files(
    elements: &[Element],
    code: &str,
    project_name: &str,
    dependencies: &[String],
) -> FileMap {
    let mut files = nextjs_project_files(code, project_name, dependencies);
    files.insert("src/app/styles.css".to_string(), css::render_css(elements));
    for (path, content) in static_site_files(elements) {
        files.insert(format!("{PREVIEW_DIR}/{path}"), content);
    }
    files
}

fn package_json(project_name: &str, dependencies: &[String]) -> String {
    let mut deps = Map::new();
    deps.insert("next".into(), json!("^14.0.0"));
    deps.insert("react".into(), json!("^18.0.0"));
    deps.insert("react-dom".into(), json!("^18.0.0"));
    for dep in dependencies {
        if dep == "react" || dep.starts_with("next/") || deps.contains_key(dep) {
            continue;
        }
        deps.insert(dep.clone(), json!("latest"));
    }

    let manifest = json!({
        "name": slugify(project_name),
        "version": "1.0.0",
        "private": true,
        "scripts": {
            "dev": "next dev",
            "build": "next build",
            "start": "next start",
            "lint": "next lint",
        },
        "dependencies": Value::Object(deps),
        "devDependencies": {
            "@types/node": "^20.0.0",
            "@types/react": "^18.0.0",
            "@types/react-dom": "^18.0.0",
            "typescript": "^5.0.0",
            "tailwindcss": "^3.0.0",
            "autoprefixer": "^10.0.0",
            "postcss": "^8.0.0",
        },
    });
    pretty(&manifest)
}

fn tsconfig_json() -> String {
    pretty(&json!({
        "compilerOptions": {
            "target": "es5",
            "lib": ["dom", "dom.iterable", "es6"],
            "allowJs": true,
            "skipLibCheck": true,
            "strict": true,
            "noEmit": true,
            "esModuleInterop": true,
            "module": "esnext",
            "moduleResolution": "bundler",
            "resolveJsonModule": true,
            "isolatedModules": true,
            "jsx": "preserve",
            "incremental": true,
            "plugins": [{ "name": "next" }],
            "paths": { "@/*": ["./src/*"] },
        },
        "include": ["next-env.d.ts", "**/*.ts", "**/*.tsx", ".next/types/**/*.ts"],
        "exclude": ["node_modules"],
    }))
}

fn pretty(value: &Value) -> String {
    // Serializing a `Value` cannot fail.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// The page must be a client component for its event handlers.
fn client_page(code: &str) -> String {
    let trimmed = code.trim_start();
    if trimmed.starts_with("'use client'") || trimmed.starts_with("\"use client\"") {
        code.to_string()
    } else {
        format!("'use client';\n\n{code}")
    }
}

fn layout_tsx(project_name: &str) -> String {
    format!(
        "import type {{ Metadata }} from 'next'
import {{ Inter }} from 'next/font/google'
import './globals.css'

const inter = Inter({{ subsets: ['latin'] }})

export const metadata: Metadata = {{
  title: {},
  description: 'Generated by SiteCanvas',
}}

export default function RootLayout({{
  children,
}}: {{
  children: React.ReactNode
}}) {{
  return (
    <html lang=\"en\">
      <body className={{inter.className}}>{{children}}</body>
    </html>
  )
}}
",
        crate::escape::js_string(project_name)
    )
}

const NEXT_CONFIG: &str = "/** @type {import('next').NextConfig} */
const nextConfig = {}

module.exports = nextConfig
";

const POSTCSS_CONFIG: &str = "module.exports = {
  plugins: {
    tailwindcss: {},
    autoprefixer: {},
  },
}
";

const TAILWIND_CONFIG: &str = "/** @type {import('tailwindcss').Config} */
module.exports = {
  content: [
    './src/pages/**/*.{js,ts,jsx,tsx,mdx}',
    './src/components/**/*.{js,ts,jsx,tsx,mdx}',
    './src/app/**/*.{js,ts,jsx,tsx,mdx}',
  ],
  theme: {
    extend: {},
  },
  plugins: [],
}
";

const GLOBALS_CSS: &str = "@tailwind base;
@tailwind components;
@tailwind utilities;

.responsive {
  @apply max-w-7xl mx-auto px-4 sm:px-6 lg:px-8;
}

.generated-page {
  @apply relative min-h-screen;
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use sitecanvas_core::ElementKind;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Site!"), "my-site-");
        assert_eq!(slugify("landing-2024"), "landing-2024");
        assert_eq!(slugify("Café"), "caf-");
        assert_eq!(slugify(""), "site");
    }

    #[test]
    fn test_static_site_files() {
        let files = static_site_files(&[Element::new(ElementKind::Button)]);
        let names: Vec<&str> = files.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["index.html", "script.js", "styles.css"]);
        assert!(files["index.html"].contains("<button"));
    }

    #[test]
    fn test_package_json() {
        let deps = vec![
            "react".to_string(),
            "next/image".to_string(),
            "react-hook-form".to_string(),
        ];
        let files = nextjs_project_files("export default function X() {}", "My Shop", &deps);
        let manifest: Value = serde_json::from_str(&files["package.json"]).expect("valid json");
        assert_eq!(manifest["name"], "my-shop");
        assert_eq!(manifest["dependencies"]["next"], "^14.0.0");
        assert_eq!(manifest["dependencies"]["react-hook-form"], "latest");
        assert!(manifest["dependencies"].get("next/image").is_none());
        assert_eq!(manifest["devDependencies"]["tailwindcss"], "^3.0.0");
        assert_eq!(manifest["scripts"]["build"], "next build");
    }

    #[test]
    fn test_nextjs_layout_and_page() {
        let files = nextjs_project_files("export default function X() {}", "Bob's \"Site\"", &[]);
        assert!(files["src/app/page.tsx"].starts_with("'use client';\n\n"));
        assert!(files["src/app/layout.tsx"].contains("title: \"Bob's \\\"Site\\\"\","));
        assert!(files["src/app/globals.css"].contains("@tailwind base;"));
        for path in ["next.config.js", "tsconfig.json", "tailwind.config.js", "postcss.config.js"] {
            assert!(files.contains_key(path), "{path}");
        }
        let tsconfig: Value = serde_json::from_str(&files["tsconfig.json"]).expect("valid json");
        assert_eq!(tsconfig["compilerOptions"]["jsx"], "preserve");
    }

    #[test]
    fn test_use_client_not_duplicated() {
        let files = nextjs_project_files("'use client';\nexport default 1;", "x", &[]);
        assert_eq!(files["src/app/page.tsx"].matches("use client").count(), 1);
    }

    #[test]
    fn test_deployment_files_include_preview() {
        let elements = vec![Element::new(ElementKind::Text)];
        let files = deployment_files(&elements, "code", "demo", &[]);
        assert!(files.contains_key("public/preview/index.html"));
        assert!(files.contains_key("public/preview/script.js"));
        assert!(files.contains_key("src/app/styles.css"));
    }
}
