//! Interactive conflict resolution
//!
//! Uses dialoguer for terminal-based selection.

use colored::Colorize;
use dialoguer::Select;

use bibsync_merge::{ConflictResolutionStrategy, EntryConflict, Side};
use bibsync_model::Record;

use crate::error::Result;

const RECORD_CHOICES: &[&str] = &[
    "Keep my values",
    "Take upstream values",
    "Choose field by field",
    "Cancel merge",
];
const DELETION_CHOICES: &[&str] = &["Keep the edited record", "Cancel merge"];

/// Asks the user how to resolve each conflicting record.
///
/// Any prompt failure (for example a non-interactive terminal) cancels the
/// merge.
#[derive(Debug, Default)]
pub struct InteractiveResolver;

impl InteractiveResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ConflictResolutionStrategy for InteractiveResolver {
    fn resolve_conflicts(&self, conflicts: &[EntryConflict]) -> Vec<Record> {
        let mut resolved = Vec::with_capacity(conflicts.len());
        for (idx, conflict) in conflicts.iter().enumerate() {
            println!();
            println!(
                "{} {} ({}/{})",
                "Conflict in".bold(),
                conflict.key.cyan().bold(),
                idx + 1,
                conflicts.len()
            );
            print_conflict(conflict);

            match prompt(conflict) {
                Ok(Some(record)) => resolved.push(record),
                Ok(None) => return Vec::new(),
                Err(e) => {
                    tracing::warn!(error = %e, "Interactive resolution failed");
                    return Vec::new();
                }
            }
        }
        resolved
    }
}

/// Print base/local/remote values of every conflicting field.
pub fn print_conflict(conflict: &EntryConflict) {
    if conflict.is_deletion() {
        let side = if conflict.local.is_none() { "locally" } else { "upstream" };
        println!("  {} deleted {} but edited on the other side", "Record".dimmed(), side);
    }
    for field in &conflict.fields {
        println!("  {}:", field.bold());
        println!("    {:<8} {}", "base".dimmed(), display(conflict.base_value(field)));
        println!("    {:<8} {}", "mine".green(), display(conflict.local_value(field)));
        println!("    {:<8} {}", "upstream".yellow(), display(conflict.remote_value(field)));
    }
}

fn display(value: Option<&str>) -> String {
    match value {
        Some(v) => bibsync_model::value::display(v),
        None => "(absent)".dimmed().to_string(),
    }
}

fn prompt(conflict: &EntryConflict) -> Result<Option<Record>> {
    if conflict.is_deletion() {
        let choice = Select::new()
            .with_prompt("Resolve")
            .items(DELETION_CHOICES)
            .default(0)
            .interact()?;
        return Ok(match choice {
            0 => conflict.resolve(|_| Side::Local),
            _ => None,
        });
    }

    let choice = Select::new()
        .with_prompt("Resolve")
        .items(RECORD_CHOICES)
        .default(0)
        .interact()?;

    let record = match choice {
        0 => conflict.resolve(|_| Side::Local),
        1 => conflict.resolve(|_| Side::Remote),
        2 => {
            let mut sides = Vec::with_capacity(conflict.fields.len());
            for field in &conflict.fields {
                let items = [
                    format!("mine: {}", display(conflict.local_value(field))),
                    format!("upstream: {}", display(conflict.remote_value(field))),
                ];
                let pick = Select::new()
                    .with_prompt(format!("Value for {}", field))
                    .items(&items)
                    .default(0)
                    .interact()?;
                sides.push((field.as_str(), if pick == 0 { Side::Local } else { Side::Remote }));
            }
            conflict.resolve(|field| {
                sides
                    .iter()
                    .find(|(name, _)| *name == field)
                    .map(|(_, side)| *side)
                    .unwrap_or(Side::Remote)
            })
        }
        _ => None,
    };
    Ok(record)
}
