//! Console prompts for the free-text run inputs

use std::io::Write;

/// Ask one free-text question on the console.
pub fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Use the flag/env value when present, otherwise prompt for it.
pub fn resolve(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt(label),
    }
}
