//! Addontool catalog commands
//!
//! Building and updating the catalog, installing addons into a project
//! and listing groups.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use addontool_core::catalog::{
    CatalogDocument, CopyOutcome, GroupListing, Installer, RepoDescription, SystemGit,
};
use addontool_core::config::ToolConfig;

fn locate_git(config: &ToolConfig) -> Result<SystemGit> {
    Ok(SystemGit::locate(Duration::from_secs(config.git_timeout_secs))?)
}

/// `--init <description>`: build the catalog from a description file
pub async fn execute_init(description_path: &Path, config: &ToolConfig) -> Result<()> {
    let git = locate_git(config)?;

    let mut description = RepoDescription::from_file(description_path)
        .with_context(|| format!("Failed to load {}", description_path.display()))?;

    let catalog = description.publish(&git, config).await?;

    println!(
        "Created catalog '{}' with {} group(s) at {}",
        catalog.repo_name,
        catalog.addon_groups.len(),
        config.catalog_path().display()
    );
    Ok(())
}

/// `--update`: re-sync and relink the current catalog
pub async fn execute_update(config: &ToolConfig) -> Result<()> {
    let git = locate_git(config)?;

    let current = CatalogDocument::load_from_path(&config.catalog_path())?;
    let mut description = RepoDescription::from_document(current.repo_description)?;

    let catalog = description.publish(&git, config).await?;

    println!("updated '{}'", catalog.repo_name);
    Ok(())
}

/// Table row for copy failures
#[derive(Tabled)]
struct CopyFailureRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Problem")]
    problem: String,
}

/// `--install [group/]addon`
pub fn execute_install(selector: &str, destination: &Path, config: &ToolConfig) -> Result<()> {
    let catalog = CatalogDocument::load_from_path(&config.catalog_path())?;

    std::fs::create_dir_all(destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;

    let installer = Installer::new(destination);
    let report = installer.install(&catalog, selector)?;

    println!(
        "installed {} from '{}' ({} file(s) copied)",
        report.addon,
        report.group,
        report.copied_count()
    );

    if !report.is_complete() {
        let rows: Vec<CopyFailureRow> = report
            .failures()
            .map(|failure| CopyFailureRow {
                source: failure.source.display().to_string(),
                problem: match &failure.outcome {
                    CopyOutcome::Copied => "copied".to_string(),
                    CopyOutcome::NotFound => "not found".to_string(),
                    CopyOutcome::PermissionDenied => "permission denied".to_string(),
                    CopyOutcome::Failed(message) => message.clone(),
                },
            })
            .collect();

        println!("\nSkipped:\n");
        println!("{}", styled_table(&rows));
    }

    Ok(())
}

/// Table row for an addon listing
#[derive(Tabled)]
struct AddonRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
}

fn addon_rows(group: &GroupListing) -> Vec<AddonRow> {
    group
        .addons
        .iter()
        .map(|addon| {
            let truncated_desc = if addon.description.chars().count() > 50 {
                format!("{}...", addon.description.chars().take(47).collect::<String>())
            } else {
                addon.description.clone()
            };

            AddonRow {
                name: addon.name.clone(),
                description: truncated_desc,
                category: addon.category.clone(),
            }
        })
        .collect()
}

fn styled_table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

/// `--list_addon_groups`: every group with its addons
pub fn execute_list_groups(config: &ToolConfig) -> Result<()> {
    let catalog = CatalogDocument::load_from_path(&config.catalog_path())?;

    println!("addon-groups of '{}':", catalog.repo_name);
    for (name, group) in &catalog.addon_groups {
        let default_marker = if catalog.is_default(name) {
            " (default)"
        } else {
            ""
        };
        println!("\n  {name}{default_marker}:");

        if group.addons.is_empty() {
            println!("    no addons");
        } else {
            println!("{}", styled_table(&addon_rows(group)));
        }
    }
    println!();

    Ok(())
}

/// `--show_addons [--addon_group g]`: one group, the default if not named
pub fn execute_show_addons(group: Option<&str>, config: &ToolConfig) -> Result<()> {
    let catalog = CatalogDocument::load_from_path(&config.catalog_path())?;
    let listing = catalog.select_group(group)?;

    println!("\naddon-group: {}", listing.addongroup_name);
    if listing.addons.is_empty() {
        println!("  no addons");
    } else {
        println!("{}", styled_table(&addon_rows(listing)));
    }

    Ok(())
}
