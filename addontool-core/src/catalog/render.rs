//! Text outputs: the HTML catalog listing and the CMake include

use std::fmt::Write as _;
use std::path::Path;

use super::{CatalogDocument, InstalledAddons};
use crate::error::{CatalogError, Result};

/// Render the catalog as a standalone HTML page
pub fn render_html(catalog: &CatalogDocument) -> String {
    let title = escape_html(&catalog.repo_name);
    let mut html = String::new();

    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html>\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{title}</title>\n</head>\n<body>");
    let _ = writeln!(html, "<h1>{title}</h1>");

    for (name, group) in &catalog.addon_groups {
        let marker = if catalog.is_default(name) {
            " (default)"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<h2 id=\"group-{id}\">{name}{marker}</h2>",
            id = escape_html(name),
            name = escape_html(name),
        );

        if group.addons.is_empty() {
            let _ = writeln!(html, "<p>no addons</p>");
            continue;
        }

        let _ = writeln!(html, "<table>");
        let _ = writeln!(
            html,
            "<tr><th>Name</th><th>Category</th><th>Description</th><th>Type</th></tr>"
        );
        for addon in &group.addons {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&addon.name),
                escape_html(&addon.category),
                escape_html(&addon.description),
                escape_html(&addon.addon_type),
            );
        }
        let _ = writeln!(html, "</table>");
    }

    let _ = writeln!(html, "</body>\n</html>");
    html
}

pub fn write_html(catalog: &CatalogDocument, path: &Path) -> Result<()> {
    std::fs::write(path, render_html(catalog)).map_err(|e| CatalogError::io(path, e))?;
    tracing::info!("Wrote HTML listing to {}", path.display());
    Ok(())
}

/// Render the CMake include listing installed addons
pub fn render_cmake_include(installed: &InstalledAddons) -> String {
    let mut cmake = String::from("# Generated by addontool. Do not edit.\n\n");

    let names: Vec<&str> = installed.list_installed().map(|a| a.name.as_str()).collect();
    let _ = writeln!(cmake, "set(ADDONS_INSTALLED {})", names.join(" "));

    for addon in installed.list_installed() {
        let _ = writeln!(cmake);
        let _ = writeln!(cmake, "# {} ({}): {}", addon.name, addon.category, addon.description);
        if let Some(local_path) = &addon.local_path {
            let _ = writeln!(
                cmake,
                "set(ADDON_{}_PATH \"{}\")",
                cmake_identifier(&addon.name),
                local_path.display().to_string().replace('\\', "/")
            );
        }
    }

    cmake
}

/// Write the CMake include, creating its directory
pub fn write_cmake_include(installed: &InstalledAddons, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    std::fs::write(path, render_cmake_include(installed)).map_err(|e| CatalogError::io(path, e))
}

fn cmake_identifier(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AddonRecord, DescriptionDocument, GroupListing};
    use indexmap::IndexMap;
    use std::path::PathBuf;

    fn catalog() -> CatalogDocument {
        let mut foo = AddonRecord::new("foo", "lib");
        foo.category = "physics".to_string();
        foo.description = "Rigid <bodies> & joints".to_string();

        let mut addon_groups = IndexMap::new();
        addon_groups.insert(
            "core".to_string(),
            GroupListing {
                addongroup_name: "core".to_string(),
                addons: vec![foo],
            },
        );
        addon_groups.insert(
            "empty".to_string(),
            GroupListing {
                addongroup_name: "empty".to_string(),
                addons: vec![],
            },
        );

        CatalogDocument {
            repo_name: "Engine Addons".to_string(),
            repo_description: DescriptionDocument::from_json(r#"{"repo_name": "Engine Addons"}"#)
                .unwrap(),
            default_group: Some("core".to_string()),
            addon_groups,
        }
    }

    #[test]
    fn test_html_lists_groups_and_escapes() {
        let html = render_html(&catalog());
        assert!(html.contains("<h1>Engine Addons</h1>"));
        assert!(html.contains("core (default)"));
        assert!(html.contains("Rigid &lt;bodies&gt; &amp; joints"));
        assert!(html.contains("<p>no addons</p>"));
        assert!(!html.contains("<bodies>"));
    }

    #[test]
    fn test_cmake_include() {
        let mut installed = InstalledAddons::default();
        let mut record = AddonRecord::new("foo-bar", "lib");
        record.local_path = Some(PathBuf::from("/home/me/.addons/repoA"));
        installed.add_installed(&record);
        installed.add_installed(&AddonRecord::new("baz", "lib"));

        let cmake = render_cmake_include(&installed);
        assert!(cmake.contains("set(ADDONS_INSTALLED foo-bar baz)"));
        assert!(cmake.contains("set(ADDON_FOO_BAR_PATH \"/home/me/.addons/repoA\")"));
        assert!(!cmake.contains("ADDON_BAZ_PATH"));
    }
}
