//! Manifest of exported project links
//!
//! Plain text, one link per line, joined with `\n` and no trailing newline.
//! Only links that produced a record are listed.

use crate::output::traits::OutputResult;
use std::path::Path;

/// Writes the manifest, replacing any previous one
pub fn write_manifest<'a, I>(path: &Path, links: I) -> OutputResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let content = links.into_iter().collect::<Vec<_>>().join("\n");
    std::fs::write(path, content)?;
    Ok(())
}

/// Reads a manifest back into its links, skipping blank lines
pub fn read_manifest(path: &Path) -> OutputResult<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
