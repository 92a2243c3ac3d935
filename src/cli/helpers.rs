//! Shared helper functions for CLI commands

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use std::io::IsTerminal;

use crate::core::identity::EntityId;
use crate::core::project::Project;
use crate::core::store::EntityStore;

/// Discover the project and load its store
pub fn open_store() -> Result<(Project, EntityStore)> {
    let project = Project::discover()?;
    let store = project.load_store()?;
    Ok((project, store))
}

/// Load, apply one mutation, and write the store back
///
/// The store is written only if `op` succeeds.
pub fn mutate<T>(op: impl FnOnce(&mut EntityStore) -> Result<T>) -> Result<(EntityStore, T)> {
    let (project, mut store) = open_store()?;
    let out = op(&mut store)?;
    project.save_store(&store)?;
    Ok((store, out))
}

/// Format an EntityId for display, truncating if too long
pub fn format_short_id(id: &EntityId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Alias if known, truncated ID otherwise
pub fn display_ref(store: &EntityStore, id: &EntityId) -> String {
    store.alias_of(id).unwrap_or_else(|| format_short_id(id))
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Two-decimal number for tables
pub fn num(v: f64) -> String {
    format!("{:.2}", v)
}

/// Ask before a destructive step
///
/// `--yes` skips the prompt. Without a terminal there is nobody to ask,
/// so the step is refused.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(miette::miette!(
            "{} (pass --yes to confirm non-interactively)",
            prompt
        ));
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

pub fn print_done(action: &str, noun: &str, reference: &str, label: &str) {
    println!(
        "{} {} {} {}",
        style("✓").green(),
        action,
        noun,
        style(reference).cyan()
    );
    if !label.is_empty() {
        println!("   {}", style(label).yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;

    #[test]
    fn test_format_short_id() {
        let id = EntityId::new(EntityPrefix::Pce);
        let formatted = format_short_id(&id);
        assert!(formatted.len() <= 16);
        assert!(formatted.ends_with("..."));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("vidro temperado", 6), "vid...");
    }

    #[test]
    fn test_num() {
        assert_eq!(num(1.005), "1.00");
        assert_eq!(num(12.0), "12.00");
    }

    #[test]
    fn test_confirm_with_yes_skips_prompt() {
        assert!(confirm("Delete everything?", true).unwrap());
    }
}
