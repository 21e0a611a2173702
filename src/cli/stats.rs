//! Feed statistics command.

use super::{Cli, load_document};
use anyhow::Result;
use feedkit::log;

/// Print document statistics as pretty JSON on stdout.
pub fn print_stats(cli: &Cli) -> Result<()> {
    let doc = load_document(cli)?;
    let stats = doc.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);

    if doc.should_split() {
        log!("stats"; "document exceeds its item or size limit and should be split");
    }
    Ok(())
}
