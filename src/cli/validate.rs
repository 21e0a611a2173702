//! Feed validation command.

use super::{Cli, load_document};
use anyhow::{Result, bail};
use feedkit::{ValidationError, log};
use owo_colors::{OwoColorize, Stream};
use std::{collections::BTreeMap, fmt};

/// Validate the channel and every item, printing all problems found.
///
/// With `json`, the raw error list goes to stdout instead of the grouped
/// report. Fails when at least one error was reported.
pub fn validate_feed(cli: &Cli, json: bool) -> Result<()> {
    let doc = load_document(cli)?;
    log!("validate"; "checking channel and {}", plural_count(doc.len(), "item"));

    let errors = doc.validate();
    if json {
        println!("{}", serde_json::to_string_pretty(&errors)?);
    }

    let report = ValidationReport::new(errors);
    if !json {
        report.print();
    }
    log!("validate"; "{report}");

    if !report.is_empty() {
        bail!("{}", plural_count(report.error_count(), "validation error"));
    }
    Ok(())
}

/// Validation errors grouped by where they occurred.
#[derive(Debug, Default)]
struct ValidationReport {
    /// `channel` or `items[<i>]` -> errors with the group prefix stripped.
    groups: BTreeMap<String, Vec<ValidationError>>,
}

impl ValidationReport {
    fn new(errors: Vec<ValidationError>) -> Self {
        let mut groups: BTreeMap<String, Vec<ValidationError>> = BTreeMap::new();
        for mut error in errors {
            let (group, field) = split_field(&error.field);
            let group = group.to_string();
            error.field = field.to_string();
            groups.entry(group).or_default().push(error);
        }
        Self { groups }
    }

    fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn error_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Print every group to stderr.
    fn print(&self) {
        for (group, errors) in &self.groups {
            eprintln!(
                "{}{}{}",
                "[".if_supports_color(Stream::Stderr, |s| s.dimmed()),
                group.if_supports_color(Stream::Stderr, |s| s.cyan()),
                "]".if_supports_color(Stream::Stderr, |s| s.dimmed()),
            );
            for error in errors {
                eprintln!(
                    "{} {} {}",
                    "→".if_supports_color(Stream::Stderr, |s| s.red()),
                    error.message,
                    format!("({})", error.kind).if_supports_color(Stream::Stderr, |s| s.dimmed()),
                );
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.error_count();
        if total == 0 {
            write!(
                f,
                "{}",
                "all checks passed".if_supports_color(Stream::Stderr, |s| s.green())
            )
        } else {
            write!(
                f,
                "found {} in {}",
                plural_count(total, "error"),
                plural_count(self.groups.len(), "place"),
            )
        }
    }
}

/// Split `items[3].images[0].url` into (`items[3]`, `images[0].url`).
///
/// Channel-level fields have no prefix and land in `channel`.
fn split_field(field: &str) -> (&str, &str) {
    if field.starts_with("items[")
        && let Some(end) = field.find("].")
    {
        return (&field[..=end], &field[end + 2..]);
    }
    ("channel", field)
}

fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedkit::ErrorKind;

    fn error(field: &str) -> ValidationError {
        ValidationError::new(field, ErrorKind::Required, format!("{field} is required"), "")
    }

    #[test]
    fn test_split_field() {
        assert_eq!(split_field("title"), ("channel", "title"));
        assert_eq!(split_field("items[3].link"), ("items[3]", "link"));
        assert_eq!(
            split_field("items[0].images[2].url"),
            ("items[0]", "images[2].url")
        );
    }

    #[test]
    fn test_report_groups_errors() {
        let report = ValidationReport::new(vec![
            error("title"),
            error("items[1].title"),
            error("items[1].description"),
            error("items[0].link"),
        ]);

        assert_eq!(report.error_count(), 4);
        let groups: Vec<_> = report.groups.keys().map(String::as_str).collect();
        assert_eq!(groups, ["channel", "items[0]", "items[1]"]);
        assert_eq!(report.groups["items[1]"][1].field, "description");
    }

    #[test]
    fn test_report_summary() {
        owo_colors::set_override(false);
        assert_eq!(ValidationReport::default().to_string(), "all checks passed");

        let report = ValidationReport::new(vec![error("items[0].title"), error("items[0].link")]);
        assert_eq!(report.to_string(), "found 2 errors in 1 place");
    }

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "item"), "0 items");
        assert_eq!(plural_count(1, "item"), "1 item");
    }
}
