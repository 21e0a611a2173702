//! Feed rendering command.

use super::{Cli, load_document};
use anyhow::{Context, Result};
use feedkit::log;
use std::{fs, io::Write, path::Path};

/// Render the loaded feed to `output`, or stdout when absent.
pub fn render_feed(cli: &Cli, format: &str, output: Option<&Path>) -> Result<()> {
    let doc = load_document(cli)?;

    if doc.should_split() {
        log!("render"; "warning: {} items exceed configured limits, consider splitting", doc.len());
    }

    let xml = doc.render_str(format)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create `{}`", parent.display()))?;
            }
            fs::write(path, &xml)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            log!("render"; "{} ({} bytes)", path.display(), xml.len());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{xml}")?;
        }
    }

    Ok(())
}
