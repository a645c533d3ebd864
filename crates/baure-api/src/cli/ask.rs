//! One-shot chat turn from the command line.

use std::path::Path;

use anyhow::{Context as _, Result};
use console::style;

use baure_types::chat::{ChatResponse, RecipeContext};

use crate::state::AppState;

/// Run a chat turn and print the answer.
///
/// With `dry_run`, prints the classification and composed prompt instead
/// of calling the backend.
pub async fn ask(
    state: &AppState,
    question: &str,
    recipe: Option<&Path>,
    recipe_id: Option<&str>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let recipe = load_recipe_context(state, recipe, recipe_id).await?;

    if dry_run {
        let plan = state.chat_service.plan(question, recipe.as_ref());
        if json {
            let out = serde_json::json!({
                "template": plan.template.as_str(),
                "usedWebSearch": plan.uses_web_search(),
                "prompt": plan.prompt,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!();
            println!(
                "  {} {}",
                style("Template:").bold(),
                style(plan.template.as_str()).cyan()
            );
            println!("  {}", style("── Prompt ──").dim());
            println!("{}", plan.prompt);
        }
        return Ok(());
    }

    let turn = match state.chat_service.answer(Some(question), recipe.as_ref()).await {
        Ok(turn) => turn,
        Err(err) => anyhow::bail!("{}", err.user_message()),
    };

    if json {
        let response: ChatResponse = turn.into();
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!();
    if turn.used_web_search {
        println!("  {}", style("🔎 web search").yellow());
    }
    println!("{}", turn.answer);
    println!();
    Ok(())
}

/// Resolve the recipe a question refers to, from a file or the archive.
///
/// The file may hold a full recipe record or just the fields the prompt uses.
pub async fn load_recipe_context(
    state: &AppState,
    file: Option<&Path>,
    recipe_id: Option<&str>,
) -> Result<Option<RecipeContext>> {
    if let Some(path) = file {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let recipe: RecipeContext = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a recipe JSON object", path.display()))?;
        return Ok(Some(recipe));
    }

    if let Some(id) = recipe_id {
        let recipe = state.recipes.get(id).await?;
        return Ok(Some(recipe.to_context()));
    }

    Ok(None)
}
