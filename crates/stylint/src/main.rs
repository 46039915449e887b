//! Stylint - CSS linter
//!
//! Usage: stylint [OPTIONS] <FILE>...

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use log::{info, warn};
use serde::Serialize;

use stylint_lint::{Engine, LintError, Report, Ruleset, Severity, RULES};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parsed command line
#[derive(Default)]
struct Options {
    json: bool,
    config: Option<String>,
    rules: Vec<(String, Severity)>,
    files: Vec<String>,
}

enum Command {
    Help,
    Version,
    ListRules,
    Lint(Options),
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a str,
    #[serde(flatten)]
    report: &'a Report,
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("stylint", String::as_str);

    let command = match parse_args(&args[1.min(args.len())..]) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program);
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Help => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("Stylint {}", VERSION);
            ExitCode::SUCCESS
        }
        Command::ListRules => {
            for rule in RULES {
                println!("{:<30} {}", rule.id, rule.description);
            }
            ExitCode::SUCCESS
        }
        Command::Lint(opts) => match run(&opts) {
            Ok(true) => ExitCode::FAILURE,
            Ok(false) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn parse_args(args: &[String]) -> Result<Command, LintError> {
    let mut opts = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--list-rules" => return Ok(Command::ListRules),
            "--json" => opts.json = true,
            "--config" => {
                let path = iter.next().ok_or_else(|| missing("--config"))?;
                opts.config = Some(path.clone());
            }
            "--rule" => {
                let entry = iter.next().ok_or_else(|| missing("--rule"))?;
                let (id, level) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
                let severity = Severity::parse(level).ok_or_else(|| LintError::UnknownSeverity(level.to_string()))?;
                opts.rules.push((id.to_string(), severity));
            }
            _ => opts.files.push(arg.clone()),
        }
    }
    if opts.files.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "no input files").into());
    }
    Ok(Command::Lint(opts))
}

fn missing(flag: &str) -> LintError {
    io::Error::new(io::ErrorKind::InvalidInput, format!("{} needs a value", flag)).into()
}

fn print_usage(program: &str) {
    println!(
        r#"Stylint {} - CSS linter

USAGE:
    {} [OPTIONS] <FILE>...

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version information
    --list-rules        List the available rules
    --json              Print the reports as JSON
    --config <FILE>     Load rule severities from a JSON file
    --rule <ID=LEVEL>   Set a rule to 0 (off), 1 (warning) or 2 (error)

A FILE of - reads standard input.

EXAMPLES:
    {} style.css
    {} --rule ids=0 --rule important=2 a.css b.css
    {} --json --config rules.json -
"#,
        VERSION, program, program, program, program
    );
}

/// Build the ruleset from the defaults, the config file and `--rule`
fn ruleset(opts: &Options) -> Result<Ruleset, LintError> {
    let mut ruleset = Ruleset::default();
    if let Some(path) = &opts.config {
        ruleset.merge(&Ruleset::from_file(path)?);
        info!("loaded ruleset from {}", path);
    }
    for (id, severity) in &opts.rules {
        if !RULES.iter().any(|r| r.id == id.as_str()) {
            warn!("unknown rule {}", id);
        }
        ruleset.set(id.as_str(), *severity);
    }
    Ok(ruleset)
}

fn read_input(file: &str) -> Result<String, LintError> {
    if file == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(fs::read_to_string(file)?)
    }
}

/// Lint all files; returns whether any error was reported
fn run(opts: &Options) -> Result<bool, LintError> {
    let ruleset = ruleset(opts)?;
    let mut engine = Engine::new();
    let mut failed = false;
    let mut reports = Vec::new();

    for file in &opts.files {
        let text = read_input(file)?;
        let report = engine.verify(&text, &ruleset);
        failed |= report.has_errors();
        if opts.json {
            reports.push((file.as_str(), report));
        } else {
            print_report(file, &report);
        }
    }

    if opts.json {
        let out: Vec<FileReport<'_>> = reports.iter().map(|(file, report)| FileReport { file: *file, report }).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    }
    Ok(failed)
}

fn print_report(file: &str, report: &Report) {
    for m in &report.messages {
        if m.rollup {
            println!("{}: {}: {} [{}]", file, m.kind, m.message, m.rule);
        } else {
            println!("{}:{}:{}: {}: {} [{}]", file, m.line, m.col, m.kind, m.message, m.rule);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let Ok(Command::Lint(opts)) = parse_args(&args(&["--json", "--rule", "ids=0", "a.css", "-"])) else {
            panic!("expected a lint command");
        };
        assert!(opts.json);
        assert_eq!(opts.rules, [("ids".to_string(), Severity::Off)]);
        assert_eq!(opts.files, ["a.css", "-"]);
        assert!(matches!(parse_args(&args(&["-V"])), Ok(Command::Version)));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
        assert!(matches!(
            parse_args(&args(&["--rule", "ids=loud", "a.css"])),
            Err(LintError::UnknownSeverity(level)) if level == "loud"
        ));
    }

    #[test]
    fn test_ruleset_from_flags() {
        let opts = Options {
            rules: vec![("ids".to_string(), Severity::Off), ("important".to_string(), Severity::Error)],
            ..Default::default()
        };
        let rs = ruleset(&opts).unwrap();
        assert_eq!(rs.get("ids"), Severity::Off);
        assert_eq!(rs.get("important"), Severity::Error);
        assert_eq!(rs.get("floats"), Severity::Warning);
    }
}
