use std::{fs, path::Path};

use anyhow::{Context, Result};
use cart_client::{CartLine, PageRow};
use serde::{Deserialize, Serialize};

/// Priced `lines` as written back by the CLI, plus raw `rows` scraped from
/// the page that still need their unit price worked out.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub lines: Vec<CartLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<PageRow>,
}

impl CartSnapshot {
    pub fn into_lines(self) -> Result<Vec<CartLine>> {
        let mut lines = self.lines;
        for row in self.rows {
            let item_id = row.item_id;
            lines.push(
                row.into_line()
                    .with_context(|| format!("cannot price cart row {item_id}"))?,
            );
        }
        Ok(lines)
    }
}

pub fn load_snapshot(path: &Path) -> Result<CartSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read cart snapshot '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("malformed cart snapshot '{}'", path.display()))
}

pub fn save_snapshot(path: &Path, snapshot: &CartSnapshot) -> Result<()> {
    let raw = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, raw)
        .with_context(|| format!("failed to write cart snapshot '{}'", path.display()))
}
