//! Bulk import of archive records from a JSON file.

use std::path::Path;

use anyhow::{Context as _, Result};
use console::style;
use serde::Serialize;

use baure_types::archive::SeedFile;

use crate::state::AppState;

/// Records created per collection, and drafts rejected by validation.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub recipes: usize,
    pub life_stories: usize,
    pub cultural_data: usize,
    pub skipped: usize,
}

/// Import every draft in `file` and print the counts.
pub async fn seed(state: &AppState, file: &Path, json: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let seed_file: SeedFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let summary = import(state, seed_file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Imported from {}",
        style("✓").green().bold(),
        style(file.display()).cyan()
    );
    println!("  Recipes:       {}", style(summary.recipes).bold());
    println!("  Life stories:  {}", style(summary.life_stories).bold());
    println!("  Cultural data: {}", style(summary.cultural_data).bold());
    if summary.skipped > 0 {
        println!("  Skipped:       {}", style(summary.skipped).yellow());
    }
    println!();
    Ok(())
}

/// Create the drafts through the archive services.
///
/// Drafts failing validation are skipped with a warning; storage errors
/// abort the import.
pub async fn import(state: &AppState, seed_file: SeedFile) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for draft in seed_file.recipes {
        match state.recipes.create(draft).await {
            Ok(_) => summary.recipes += 1,
            Err(e) if is_rejected(&e) => {
                tracing::warn!(collection = "recipes", error = %e, "skipping seed record");
                summary.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    for draft in seed_file.life_stories {
        match state.life_stories.create(draft).await {
            Ok(_) => summary.life_stories += 1,
            Err(e) if is_rejected(&e) => {
                tracing::warn!(collection = "life_stories", error = %e, "skipping seed record");
                summary.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    for draft in seed_file.cultural_data {
        match state.cultural_data.create(draft).await {
            Ok(_) => summary.cultural_data += 1,
            Err(e) if is_rejected(&e) => {
                tracing::warn!(collection = "cultural_data", error = %e, "skipping seed record");
                summary.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        recipes = summary.recipes,
        life_stories = summary.life_stories,
        cultural_data = summary.cultural_data,
        skipped = summary.skipped,
        "seed import finished"
    );
    Ok(summary)
}

fn is_rejected(err: &baure_types::error::ArchiveError) -> bool {
    matches!(err, baure_types::error::ArchiveError::Validation(_))
}
