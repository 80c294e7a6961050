//! Interactive shell
//!
//! A REPL with command history and tab completion that walks a session through
//! its transitions without opening the window.

use anyhow::Result;
use clap::Parser;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};

use super::commands;
use super::output::{OutputFormat, print_error, print_formatted, text_rows};
use super::{Cli, Commands};
use crate::scoring::Stars;
use crate::session::{Orchestrator, SessionView};

/// Command completer for the shell
#[derive(Default)]
struct ShellCompleter {
    commands: Vec<(&'static str, Vec<&'static str>)>,
}

impl ShellCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                ("start", vec![]),
                ("complete", vec![]),
                ("play-again", vec![]),
                ("home", vec![]),
                ("status", vec![]),
                ("config", vec!["show", "get", "set", "path"]),
                ("score", vec!["accuracy", "attempts", "rhythm", "rank"]),
                ("stages", vec![]),
                ("help", vec![]),
                ("exit", vec![]),
                ("quit", vec![]),
            ],
        }
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.len() {
            0 => {
                // Empty line - suggest all commands
                let candidates: Vec<Pair> = self
                    .commands
                    .iter()
                    .map(|(cmd, _)| Pair {
                        display: cmd.to_string(),
                        replacement: cmd.to_string(),
                    })
                    .collect();
                Ok((0, candidates))
            }
            1 => {
                // Partial first word - complete command names
                let prefix = words[0];
                if line.ends_with(' ') {
                    // Command complete, suggest subcommands
                    if let Some((_, subs)) = self.commands.iter().find(|(cmd, _)| *cmd == prefix) {
                        let candidates: Vec<Pair> = subs
                            .iter()
                            .map(|sub| Pair {
                                display: sub.to_string(),
                                replacement: sub.to_string(),
                            })
                            .collect();
                        return Ok((pos, candidates));
                    }
                    Ok((pos, vec![]))
                } else {
                    // Still typing command
                    let candidates: Vec<Pair> = self
                        .commands
                        .iter()
                        .filter(|(cmd, _)| cmd.starts_with(prefix))
                        .map(|(cmd, _)| Pair {
                            display: cmd.to_string(),
                            replacement: cmd.to_string(),
                        })
                        .collect();
                    let start = line.rfind(' ').map(|i| i + 1).unwrap_or(0);
                    Ok((start, candidates))
                }
            }
            2 => {
                // Complete subcommand
                let cmd = words[0];
                let prefix = words[1];
                if let Some((_, subs)) = self.commands.iter().find(|(c, _)| *c == cmd) {
                    let candidates: Vec<Pair> = if line.ends_with(' ') {
                        // Subcommand complete, no more suggestions
                        vec![]
                    } else {
                        subs.iter()
                            .filter(|sub| sub.starts_with(prefix))
                            .map(|sub| Pair {
                                display: sub.to_string(),
                                replacement: sub.to_string(),
                            })
                            .collect()
                    };
                    let start = line.rfind(' ').map(|i| i + 1).unwrap_or(0);
                    return Ok((start, candidates));
                }
                Ok((pos, vec![]))
            }
            _ => Ok((pos, vec![])),
        }
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellCompleter {}
impl Validator for ShellCompleter {}
impl Helper for ShellCompleter {}

/// Parse a command line into arguments, handling quotes
fn parse_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_char = ' ';

    for c in line.chars() {
        match c {
            '"' | '\'' if !in_quotes => {
                in_quotes = true;
                quote_char = c;
            }
            c if c == quote_char && in_quotes => {
                in_quotes = false;
            }
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    args.push(current.clone());
                    current.clear();
                }
            }
            _ => {
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Run a single command in the shell.
/// Returns Ok(true) to continue, Ok(false) to exit gracefully.
fn run_command(args: Vec<String>, session: &mut Orchestrator, format: OutputFormat) -> Result<bool> {
    if args.is_empty() {
        return Ok(true);
    }

    // Session commands operate on the shell's own orchestrator
    match args[0].as_str() {
        "help" => {
            print_help();
            return Ok(true);
        }
        "exit" | "quit" => {
            return Ok(false);
        }
        "start" => {
            session.start()?;
            print_status(&session.view(), format);
            return Ok(true);
        }
        "complete" => {
            complete(&args[1..], session)?;
            print_status(&session.view(), format);
            return Ok(true);
        }
        "play-again" => {
            session.play_again()?;
            print_status(&session.view(), format);
            return Ok(true);
        }
        "home" => {
            session.go_home()?;
            print_status(&session.view(), format);
            return Ok(true);
        }
        "status" => {
            print_status(&session.view(), format);
            return Ok(true);
        }
        _ => {}
    }

    // Build a fake argv for clap: ["electronics-universe", ...args]
    let mut argv: Vec<String> = vec!["electronics-universe".to_string()];
    argv.extend(args);

    let cli = match Cli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            // Print clap's error message (includes usage hints)
            println!("{}", e);
            return Ok(true);
        }
    };

    let format = cli.output.format();
    let quiet = cli.output.quiet;

    let result = match cli.command {
        Some(Commands::Config { command }) => commands::config::run(command, format, quiet),
        Some(Commands::Score { command }) => commands::score::run(command, format),
        Some(Commands::Stages) => commands::stages::run(format),
        Some(Commands::Shell) => {
            println!("Already in shell mode.");
            Ok(())
        }
        None => {
            println!("Type 'help' for available commands.");
            Ok(())
        }
    };

    result?;
    Ok(true)
}

/// `complete <stars> [stage-number]`, defaulting to the active stage
fn complete(args: &[String], session: &mut Orchestrator) -> Result<()> {
    let Some(stars) = args.first() else {
        anyhow::bail!("Usage: complete <stars> [stage-number]");
    };
    let stars = Stars::new(stars.parse()?)?;

    let index = match args.get(1) {
        Some(number) => {
            let number: usize = number.parse()?;
            if number == 0 {
                anyhow::bail!("Stage numbers start at 1");
            }
            number - 1
        }
        None => match session.state().stage() {
            Some(kind) => kind.index(),
            None => anyhow::bail!("No stage is active ({})", session.state()),
        },
    };

    session.complete_stage(index, stars)?;
    Ok(())
}

fn print_status(view: &SessionView, format: OutputFormat) {
    print_formatted(view, format, |view| {
        let stages = text_rows(&view.stages, |record| {
            let kind = record.kind();
            let marker = if record.is_current() {
                ">"
            } else if record.is_completed() {
                "x"
            } else {
                " "
            };
            let stars = record
                .stars()
                .map(|stars| stars.to_string())
                .unwrap_or_default();
            format!("  [{}] {}. {} {} {}", marker, kind.number(), kind.icon(), kind.name(), stars)
        });
        let mut lines = vec![format!("Screen: {}", view.state), stages];
        lines.push(format!(
            "Stars: {} / {} ({})",
            view.total_stars, view.max_stars, view.rank
        ));
        if !view.badges.is_empty() {
            let badges: Vec<String> = view
                .badges
                .iter()
                .map(|badge| format!("{} {}", badge.icon, badge.name))
                .collect();
            lines.push(format!("Badges: {}", badges.join(", ")));
        }
        lines.join("\n")
    });
}

fn print_help() {
    println!(
        r#"Electronics Universe Shell

Session:
  start                        Leave the welcome screen
  complete <stars> [stage]     Finish the active stage with 1-3 stars
  play-again                   Reset and restart from the first stage
  home                         Reset and return to the welcome screen
  status                       Show the session and its progress

  config show                  Show current configuration
  config get <key>             Get a specific setting
  config set <key> <value>     Set a configuration value
  config path                  Show config file path

  score accuracy <percent>     Stars for a balance accuracy
  score attempts <count>       Stars for a rotation count
  score rhythm <hits>          Stars for a rhythm hit count
  score rank <total>           Rank for a star total

  stages                       List the four stages

  help                         Show this help
  exit, quit                   Exit the shell

Flags (can be added to config, score and stages):
  --json                       Output in JSON format
  --quiet, -q                  Suppress non-essential output
"#
    );
}

/// Get the history file path
fn history_path() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("com", "electronics-universe", "Electronics Universe")
        .map(|dirs| dirs.data_dir().join("shell_history"))
}

/// Run the interactive shell
pub fn run(format: OutputFormat) -> Result<()> {
    println!("Electronics Universe Shell v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(ShellCompleter::new()));

    if let Some(path) = history_path() {
        let _ = rl.load_history(&path);
    }

    let mut session = Orchestrator::new();

    loop {
        let prompt = format!("{}> ", session.state());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                let args = parse_args(line);
                match run_command(args, &mut session, format) {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(e) => print_error(&e.to_string()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                print_error(&format!("{:?}", err));
                break;
            }
        }
    }

    if let Some(path) = history_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(&path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;

    fn run(line: &str, session: &mut Orchestrator) -> Result<bool> {
        run_command(parse_args(line), session, OutputFormat::Json)
    }

    #[test]
    fn test_parse_args_quotes() {
        assert_eq!(
            parse_args(r#"config set appearance.theme "cosmic""#),
            ["config", "set", "appearance.theme", "cosmic"]
        );
        assert_eq!(parse_args("  complete   3 "), ["complete", "3"]);
        assert!(parse_args("").is_empty());
    }

    #[test]
    fn test_session_runs_to_completion() {
        let mut session = Orchestrator::new();
        run("start", &mut session).unwrap();
        for stars in ["3", "2", "3", "1"] {
            run(&format!("complete {stars}"), &mut session).unwrap();
        }
        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(session.tracker().total_stars(), 9);

        run("home", &mut session).unwrap();
        assert_eq!(session.state(), SessionState::Welcome);
        assert_eq!(session.tracker().total_stars(), 0);
    }

    #[test]
    fn test_stale_completion_changes_nothing() {
        let mut session = Orchestrator::new();
        assert!(run("complete 3", &mut session).is_err());

        run("start", &mut session).unwrap();
        assert!(run("complete 3 2", &mut session).is_err());
        assert!(run("complete 4", &mut session).is_err());
        assert!(run("play-again", &mut session).is_err());
        assert_eq!(session.state(), SessionState::Stage(crate::progress::StageKind::Resistor));
        assert_eq!(session.tracker().total_stars(), 0);
    }

    #[test]
    fn test_exit_and_unknown() {
        let mut session = Orchestrator::new();
        assert!(!run("quit", &mut session).unwrap());
        assert!(run("launch", &mut session).unwrap());
        assert!(run("shell", &mut session).unwrap());
    }
}
