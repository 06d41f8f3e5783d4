//! Photographer roster: a plain text file of `id|name|handle` lines.

use anyhow::Context;
use fotodrop_core::Photographer;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: String,
    pub photographer: Photographer,
}

/// Parse the roster text. Blank lines and lines without the three fields
/// are skipped.
pub fn parse_roster(text: &str) -> Vec<RosterEntry> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.split('|').map(str::trim);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(id), Some(name), Some(handle)) if !id.is_empty() && !name.is_empty() => {
                    Some(RosterEntry {
                        id: id.to_string(),
                        photographer: Photographer {
                            name: name.to_string(),
                            handle: handle.to_string(),
                        },
                    })
                }
                _ => None,
            }
        })
        .collect()
}

pub fn load_roster(path: &Path) -> anyhow::Result<Vec<RosterEntry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster {}", path.display()))?;
    let roster = parse_roster(&text);
    anyhow::ensure!(!roster.is_empty(), "Roster {} has no entries", path.display());
    Ok(roster)
}
