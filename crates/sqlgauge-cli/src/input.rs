//! Input handling for file reading and stdin support.

use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::Path;

/// SQL text together with a display name for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub content: String,
}

/// Read SQL from the given path, or from stdin when the path is absent
/// or `-`.
pub fn read_input(path: Option<&Path>) -> Result<Source> {
    match path {
        Some(p) if p.as_os_str() != "-" => read_from_file(p),
        _ => read_from_stdin(),
    }
}

fn read_from_stdin() -> Result<Source> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    Ok(Source {
        name: "<stdin>".to_string(),
        content,
    })
}

fn read_from_file(path: &Path) -> Result<Source> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok(Source {
        name: path.display().to_string(),
        content,
    })
}
