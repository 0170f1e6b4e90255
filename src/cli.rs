//! Command line arguments.

use crate::error::{CliError, Result};
use std::path::PathBuf;

/// Parsed command line; every field overrides the config file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Cli {
    pub url: Option<String>,
    pub scope: Option<String>,
    pub locale: Option<String>,
    pub keymap: Option<String>,
    pub timeout_secs: Option<u64>,
    pub config: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub demo: bool,
    pub help: bool,
}

pub fn print_usage() {
    eprintln!("Usage: yearplan [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --url <URL>               Backend base URL (default: http://localhost:8000)");
    eprintln!("  --scope <ID>              School scope sent with every request");
    eprintln!("  --locale <TAG>            Currency display locale (default: nl-NL)");
    eprintln!("  --keymap <name>           Select keybindings: vim or emacs (default: vim)");
    eprintln!("  --timeout <SECS>          Request timeout in seconds (default: 10)");
    eprintln!("  --config <FILE>           Read settings from FILE instead of the user config");
    eprintln!("  --log-file <FILE>         Append log lines to FILE");
    eprintln!("  --demo                    Use built-in sample data instead of a backend");
    eprintln!("  -o, --output <FILE>       Export to markdown file (non-interactive)");
    eprintln!("  -h, --help                Print help");
}

impl Cli {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Cli>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cli = Cli::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next().ok_or_else(|| CliError::MissingValue {
                    flag: flag.to_string(),
                })
            };
            match arg.as_str() {
                "-h" | "--help" => cli.help = true,
                "--demo" => cli.demo = true,
                "--url" => cli.url = Some(value("--url")?),
                "--scope" => cli.scope = Some(value("--scope")?),
                "--locale" => cli.locale = Some(value("--locale")?),
                "--keymap" => cli.keymap = Some(value("--keymap")?),
                "--config" => cli.config = Some(PathBuf::from(value("--config")?)),
                "--log-file" => cli.log_file = Some(PathBuf::from(value("--log-file")?)),
                "-o" | "--output" => cli.output = Some(PathBuf::from(value(&arg)?)),
                "--timeout" => {
                    let raw = value("--timeout")?;
                    let secs = raw.parse::<u64>().ok().filter(|s| *s > 0).ok_or(
                        CliError::InvalidValue {
                            flag: "--timeout".into(),
                            value: raw,
                        },
                    )?;
                    cli.timeout_secs = Some(secs);
                }
                other if other.starts_with('-') => {
                    return Err(CliError::UnknownOption(other.to_string()));
                }
                other => return Err(CliError::UnexpectedArgument(other.to_string())),
            }
        }
        Ok(cli)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli> {
        Cli::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_overrides() {
        let cli = parse(&[
            "--url",
            "https://plan.example",
            "--scope",
            "school-7",
            "--keymap",
            "emacs",
            "-o",
            "out.md",
            "--timeout",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://plan.example"));
        assert_eq!(cli.scope.as_deref(), Some("school-7"));
        assert_eq!(cli.keymap.as_deref(), Some("emacs"));
        assert_eq!(cli.output, Some(PathBuf::from("out.md")));
        assert_eq!(cli.timeout_secs, Some(3));
        assert!(!cli.demo);
    }

    #[test]
    fn missing_value_is_reported() {
        assert_eq!(
            parse(&["--demo", "--output"]),
            Err(CliError::MissingValue {
                flag: "--output".into()
            })
        );
    }

    #[test]
    fn rejects_unknown_and_positional_arguments() {
        assert_eq!(
            parse(&["--frobnicate"]),
            Err(CliError::UnknownOption("--frobnicate".into()))
        );
        assert_eq!(
            parse(&["plan.grd"]),
            Err(CliError::UnexpectedArgument("plan.grd".into()))
        );
    }

    #[test]
    fn timeout_must_be_positive() {
        assert!(matches!(
            parse(&["--timeout", "0"]),
            Err(CliError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(&["--timeout", "soon"]),
            Err(CliError::InvalidValue { .. })
        ));
    }
}
