//! `lrcdm lint <FILE>` – lint a lyrics file (`.lrc` synced, anything else plain).

use anyhow::{Context, Result};
use std::path::Path;

use lrcdm_core::lint::{lint_plain, lint_synced};

pub fn run_lint(path: &str) -> Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path))?;

    let synced = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("lrc"))
        .unwrap_or(false);

    let problems = if synced {
        lint_synced(&source)
    } else {
        lint_plain(&source)
    };

    if problems.is_empty() {
        println!("{}: no problems found.", path);
        return Ok(());
    }
    for p in &problems {
        println!("{}:{}: {}", path, p.line, p.message);
    }
    anyhow::bail!("{} problem(s) found", problems.len());
}
