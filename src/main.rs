// SPDX-License-Identifier: MIT
//
// n-shell — a small shell front-end for the n-line editor.
//
// There is no command execution: every accepted line is echoed back, and
// lines starting with `:set` change editor options for the rest of the
// session. That is enough to drive both dispatchers by hand.
//
//   stdin → KeyReader → Session (vi or emacs) → TermRenderer → stdout
//                                  │
//                            MemoryHistory
//
// Options are applied in order: `N_SHELL_OPTS`, then `--mode`, then each
// `--set`, so the command line wins over the environment.

mod history;
mod logging;
mod prompt;

use std::env;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{Level, info};

use n_line::{OptionError, Options, ReadError, ReadOutcome, Session};
use n_term::reader::{KeyReader, Stdin};
use n_term::terminal::{self, Terminal};

use crate::history::MemoryHistory;
use crate::prompt::TermRenderer;

/// Environment variable holding option directives applied before the CLI.
const OPTS_VAR: &str = "N_SHELL_OPTS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Vi,
    Emacs,
}

#[derive(Debug, Parser)]
#[command(name = "n-shell", version, about = "Line editing playground with vi and emacs key bindings")]
struct Cli {
    /// Key bindings to start with.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Option directive, as after `:set` (repeatable).
    #[arg(short = 'o', long = "set", value_name = "DIRECTIVE")]
    set: Vec<String>,

    #[arg(long, default_value = "$ ")]
    prompt: String,

    /// Append logs to this file. Without it nothing is logged.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: Level,
}

impl Cli {
    /// Fold the environment directives and the flags into one `Options`.
    fn options(&self, env_opts: Option<&str>) -> Result<Options, OptionError> {
        let mut options = Options::default();
        if let Some(directives) = env_opts {
            options.apply_all(directives)?;
        }
        match self.mode {
            Some(ModeArg::Vi) => options.edit_mode = n_line::EditMode::Vi,
            Some(ModeArg::Emacs) => options.edit_mode = n_line::EditMode::Emacs,
            None => {}
        }
        for directives in &self.set {
            options.apply_all(directives)?;
        }
        Ok(options)
    }
}

/// The arguments of a `:set` line, if `line` is one.
fn set_command(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(":set")?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest.trim())
}

fn run(options: Options, prompt: &str) -> Result<(), ReadError> {
    let mut terminal = Terminal::new();
    if terminal::is_tty() {
        terminal.enter()?;
    }

    let mut session = Session::new(
        KeyReader::new(Stdin),
        MemoryHistory::default(),
        TermRenderer::new(std::io::stdout(), prompt),
        options,
    );

    loop {
        match session.read_line()? {
            ReadOutcome::Line(line) => {
                if let Some(directives) = set_command(&line) {
                    let reply = match session.set(directives) {
                        Ok(shown) => {
                            info!(directives, "options changed");
                            shown.join("  ")
                        }
                        Err(e) => e.to_string(),
                    };
                    if !reply.is_empty() {
                        session.renderer_mut().println(&reply)?;
                    }
                } else {
                    session.renderer_mut().println(&line)?;
                }
            }
            ReadOutcome::Interrupted => {}
            ReadOutcome::Eof => break,
        }
    }

    terminal.leave()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let options = match cli.options(env::var(OPTS_VAR).ok().as_deref()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("n-shell: {e}");
            process::exit(2);
        }
    };

    if let Err(e) = logging::init(cli.log_file.as_deref(), cli.log_level) {
        eprintln!("n-shell: cannot open log file: {e}");
        process::exit(1);
    }
    info!(mode = %options.edit_mode, "starting");

    if let Err(e) = run(options, &cli.prompt) {
        eprintln!("n-shell: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use n_line::{BellStyle, EditMode};
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("n-shell").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = cli(&[]);
        assert_eq!(cli.prompt, "$ ");
        assert_eq!(cli.log_level, Level::INFO);
        assert_eq!(cli.options(None).unwrap(), Options::default());
    }

    #[test]
    fn flags_override_environment() {
        let cli = cli(&["--mode", "vi", "-o", "bell=none", "--set", "nosi"]);
        let options = cli.options(Some("editmode=emacs bell=visible")).unwrap();
        assert_eq!(options.edit_mode, EditMode::Vi);
        assert_eq!(options.bell, BellStyle::None);
        assert!(!options.start_insert);
    }

    #[test]
    fn environment_alone() {
        let options = cli(&[]).options(Some("em=emacs ul=10")).unwrap();
        assert_eq!(options.edit_mode, EditMode::Emacs);
        assert_eq!(options.undo_levels, 10);
    }

    #[test]
    fn bad_directive_is_reported() {
        assert!(cli(&["-o", "colour=red"]).options(None).is_err());
        assert!(cli(&[]).options(Some("bell=loud")).is_err());
    }

    #[test]
    fn rejects_unknown_mode() {
        let args = ["n-shell", "--mode", "ed"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn set_lines() {
        assert_eq!(set_command(":set bell=none"), Some("bell=none"));
        assert_eq!(set_command("  :set   em? "), Some("em?"));
        assert_eq!(set_command(":set"), Some(""));
        assert_eq!(set_command(":settle"), None);
        assert_eq!(set_command("echo :set"), None);
    }
}
