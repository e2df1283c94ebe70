//! Editor options — the `set` directive system.
//!
//! Options come from the command line (`-o`/`--set`) and the `N_SHELL_OPTS`
//! environment variable, using the same directive grammar as vi's `:set`.
//!
//! # Supported syntax
//!
//! | Syntax         | Effect                        |
//! |----------------|-------------------------------|
//! | `option`       | Enable boolean / show value   |
//! | `nooption`     | Disable boolean               |
//! | `option!`      | Toggle boolean                |
//! | `option?`      | Query current value           |
//! | `option=value` | Assign a value                |
//!
//! # Options
//!
//! | Full name     | Abbrev | Type                         | Default   |
//! |---------------|--------|------------------------------|-----------|
//! | `editmode`    | `em`   | `vi` / `emacs`               | `vi`      |
//! | `bell`        | `bl`   | `audible` / `visible` / `none` | `audible` |
//! | `undolevels`  | `ul`   | integer                      | 1000      |
//! | `startinsert` | `si`   | bool                         | true      |

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::error::OptionError;
use crate::history::DEFAULT_UNDO_LEVELS;

// ---------------------------------------------------------------------------
// Directives
// ---------------------------------------------------------------------------

/// A parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `option` — enable a boolean option (or show a valued one).
    On(String),
    /// `nooption` — disable a boolean option.
    Off(String),
    /// `option!` — toggle a boolean option.
    Toggle(String),
    /// `option?` — query the current value.
    Query(String),
    /// `option=value` — assign a value.
    Assign(String, String),
}

/// Returns `true` if `name` is a known boolean option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(name, "startinsert" | "si")
}

/// Parse a whitespace-separated list of directives.
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    args.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }
    // Only strip "no" when the rest is a boolean option.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }
    SetDirective::On(arg.to_string())
}

/// `name` when true, `noname` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Option values
// ---------------------------------------------------------------------------

/// Which dispatcher drives the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Vi,
    Emacs,
}

impl FromStr for EditMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vi" => Ok(Self::Vi),
            "emacs" => Ok(Self::Emacs),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vi => "vi",
            Self::Emacs => "emacs",
        })
    }
}

/// How a ding is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BellStyle {
    /// BEL to the terminal.
    #[default]
    Audible,
    /// A brief screen flash.
    Visible,
    /// Nothing.
    None,
}

impl FromStr for BellStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audible" => Ok(Self::Audible),
            "visible" => Ok(Self::Visible),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

impl fmt::Display for BellStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Audible => "audible",
            Self::Visible => "visible",
            Self::None => "none",
        })
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Every configurable knob of a line-editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub edit_mode: EditMode,
    pub bell: BellStyle,
    pub undo_levels: usize,
    pub start_insert: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            edit_mode: EditMode::Vi,
            bell: BellStyle::Audible,
            undo_levels: DEFAULT_UNDO_LEVELS,
            start_insert: true,
        }
    }
}

impl Options {
    /// Apply every directive in `args` in order. Stops at the first error;
    /// earlier directives stay applied.
    ///
    /// # Errors
    ///
    /// Returns the first rejected directive's [`OptionError`].
    pub fn apply_all(&mut self, args: &str) -> Result<Vec<String>, OptionError> {
        let mut shown = Vec::new();
        for directive in parse_set(args) {
            if let Some(line) = self.apply(&directive)? {
                shown.push(line);
            }
        }
        Ok(shown)
    }

    /// Apply one directive. Returns `Some(text)` for directives that show a
    /// value (`option?`, or a bare valued option).
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] for unknown names,
    /// [`OptionError::InvalidValue`] for rejected values, and
    /// [`OptionError::NotBoolean`] for `no`/`!` on valued options.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::On(name) => {
                if canonical(name)? == "startinsert" {
                    self.set_start_insert(true);
                    Ok(None)
                } else {
                    self.show(name).map(Some)
                }
            }
            SetDirective::Off(name) => {
                require_bool(name)?;
                self.set_start_insert(false);
                Ok(None)
            }
            SetDirective::Toggle(name) => {
                require_bool(name)?;
                self.set_start_insert(!self.start_insert);
                Ok(None)
            }
            SetDirective::Query(name) => self.show(name).map(Some),
            SetDirective::Assign(name, value) => {
                self.assign(name, value)?;
                Ok(None)
            }
        }
    }

    /// Render `name` as `name=value` (or `name` / `noname` for booleans).
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] for unknown names.
    pub fn show(&self, name: &str) -> Result<String, OptionError> {
        Ok(match canonical(name)? {
            "editmode" => format!("editmode={}", self.edit_mode),
            "bell" => format!("bell={}", self.bell),
            "undolevels" => format!("undolevels={}", self.undo_levels),
            _ => format_bool("startinsert", self.start_insert),
        })
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let invalid = || OptionError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match canonical(name)? {
            "editmode" => self.edit_mode = value.parse().map_err(|()| invalid())?,
            "bell" => self.bell = value.parse().map_err(|()| invalid())?,
            "undolevels" => self.undo_levels = value.parse().map_err(|_| invalid())?,
            _ => {
                let on = match value {
                    "true" | "on" | "1" => true,
                    "false" | "off" | "0" => false,
                    _ => return Err(invalid()),
                };
                self.set_start_insert(on);
                return Ok(());
            }
        }
        info!(option = canonical(name)?, value, "option set");
        Ok(())
    }

    fn set_start_insert(&mut self, on: bool) {
        self.start_insert = on;
        info!(option = "startinsert", value = on, "option set");
    }
}

fn require_bool(name: &str) -> Result<(), OptionError> {
    canonical(name)?;
    if is_bool_option(name) {
        Ok(())
    } else {
        Err(OptionError::NotBoolean(name.to_string()))
    }
}

/// Resolve an abbreviation to its full option name.
fn canonical(name: &str) -> Result<&'static str, OptionError> {
    match name {
        "editmode" | "em" => Ok("editmode"),
        "bell" | "bl" => Ok("bell"),
        "undolevels" | "ul" => Ok("undolevels"),
        "startinsert" | "si" => Ok("startinsert"),
        _ => Err(OptionError::Unknown(name.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
