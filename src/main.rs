use std::io::Read;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use clap::{Parser as ClapParser, Subcommand};
use confique::Config as _;
use serde_json::Value;
use tracing::*;

use dotnote::{Error, GrammarError, Notation};

use crate::config::Config;

mod config;
mod logging;

#[derive(Debug, ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a `dotnote.toml` configuration file. A missing file is ignored.
    #[arg(long, global = true, default_value = "dotnote.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a JSON array into dot notation.
    Flatten {
        /// The JSON file to read. Reads standard input if omitted.
        input: Option<PathBuf>,
        /// Write one fully qualified dot path per leaf.
        #[arg(long, conflicts_with = "grouped")]
        dot_only: bool,
        /// Write paths sharing a prefix as `prefix(a, b)`.
        #[arg(long)]
        grouped: bool,
    },
    /// Convert dot notation back into a JSON array.
    Unflatten {
        /// The notation file to read. Reads standard input if omitted.
        input: Option<PathBuf>,
        /// Indent the JSON output.
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,
        /// Print the JSON output on a single line.
        #[arg(long)]
        compact: bool,
    },
}

type DiagnosticReport<'a> = Report<'a, (&'a String, Range<usize>)>;

fn main() -> anyhow::Result<()> {
    logging::setup_logging();

    let cli = Args::parse();

    debug!(?cli);

    let config = Config::builder()
        .env()
        .file(&cli.config)
        .load()
        .with_context(|| format!("failed to load config `{}`", cli.config.display()))?;

    debug!(?config);

    match &cli.command {
        Command::Flatten {
            input,
            dot_only,
            grouped,
        } => {
            let notation = if *dot_only {
                Notation::DotOnly
            } else if *grouped {
                Notation::Grouped
            } else {
                config.notation
            };

            let (path, src) = read_input(input.as_deref())?;
            match dotnote::flatten_with(&src, notation) {
                Ok(flat) => println!("{flat}"),
                Err(e) => {
                    build_report(&path, &src, &e).eprint((&path, Source::from(&src)))?;
                    bail!("failed to flatten `{path}`");
                }
            }
        }
        Command::Unflatten {
            input,
            pretty,
            compact,
        } => {
            let pretty = if *pretty {
                true
            } else if *compact {
                false
            } else {
                config.pretty
            };

            let (path, raw) = read_input(input.as_deref())?;
            let src = raw.trim();
            match dotnote::unflatten_values(src) {
                Ok(elements) => {
                    let json = Value::Array(elements);
                    if pretty {
                        println!("{}", serde_json::to_string_pretty(&json)?);
                    } else {
                        println!("{json}");
                    }
                }
                Err(e) => {
                    build_report(&path, src, &e).eprint((&path, Source::from(src)))?;
                    bail!("failed to unflatten `{path}`");
                }
            }
        }
    }

    Ok(())
}

fn read_input(input: Option<&Path>) -> anyhow::Result<(String, String)> {
    let Some(input) = input else {
        let mut src = String::new();
        std::io::stdin()
            .read_to_string(&mut src)
            .context("failed to read standard input")?;
        return Ok(("<stdin>".to_string(), src));
    };

    match std::fs::read_to_string(input) {
        Ok(src) => Ok((input.display().to_string(), src)),
        Err(e) => {
            error!(path = ?input, "failed to read input");
            Err(e).with_context(|| format!("failed to read file `{}`", input.display()))
        }
    }
}

/// `ariadne` counts chars, while our ranges are byte offsets into `src`.
fn char_range(src: &str, range: Range<usize>) -> Range<usize> {
    let chars_before = |offset: usize| src.get(..offset).map_or(0, |s| s.chars().count());
    chars_before(range.start)..chars_before(range.end)
}

fn build_report<'a>(path: &'a String, src: &str, err: &Error) -> DiagnosticReport<'a> {
    let range = char_range(src, err.source_range(src));

    let label = match err {
        Error::MalformedJson(_) => "not valid JSON".to_string(),
        Error::JsonTooDeep(_) => "nested too deeply".to_string(),
        Error::NotAnArray { found } => format!("expected an array, found {found}"),
        Error::Grammar(GrammarError::ExpectedName { .. }) => "a name is required here".to_string(),
        Error::Grammar(GrammarError::UnclosedGroup { .. }) => "expected `)` here".to_string(),
        Error::Grammar(GrammarError::TrailingInput { .. }) => {
            "fields must be separated by `,`".to_string()
        }
        Error::Grammar(GrammarError::TooDeep { limit, .. }) => {
            format!("this goes past {limit} levels of nesting")
        }
        Error::Conflict(conflict) => format!(
            "\"{}\" already has an incompatible value in this group",
            conflict.name.as_str().fg(Color::Blue)
        ),
    };

    let mut report = Report::build(ReportKind::Error, path, range.start)
        .with_message(err.to_string())
        .with_label(
            Label::new((path, range))
                .with_message(label)
                .with_color(Color::Red),
        );

    if let Error::Grammar(GrammarError::UnclosedGroup { open, .. }) = err {
        report = report.with_label(
            Label::new((path, char_range(src, open.into_range())))
                .with_message("group opened here")
                .with_color(Color::Yellow),
        );
    }

    report.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_range_counts_chars() {
        let src = "ä.b, ü(";
        assert_eq!(char_range(src, 0..2), 0..1);
        assert_eq!(char_range(src, 3..4), 2..3);
        assert_eq!(char_range(src, 6..8), 5..6);
        assert_eq!(char_range(src, 9..9), 7..7);
    }

    #[test]
    fn test_report_ranges_on_non_ascii_input() {
        let src = "[\"é\", ü]";
        let err = dotnote::flatten(src).unwrap_err();
        let range = err.source_range(src);
        assert_eq!(&src[range.clone()], "ü");
        assert_eq!(char_range(src, range), 6..7);
    }
}
