// SPDX-License-Identifier: MIT
//
// File logging.
//
// The terminal belongs to the line editor, so log output goes to a file or
// nowhere. With no `--log-file`, no subscriber is installed and every
// `tracing` macro is a no-op.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

/// Install a `tracing` subscriber appending to `path` at `level` and above.
///
/// # Errors
///
/// The log file cannot be opened.
pub fn init(path: Option<&Path>, level: Level) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_max_level(level)
        .with_ansi(false)
        .init();
    Ok(())
}

fn open(path: &Path) -> io::Result<File> {
    File::options().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_path_installs_nothing() {
        assert!(init(None, Level::DEBUG).is_ok());
    }

    #[test]
    fn open_appends() {
        let path = std::env::temp_dir().join(format!("n-shell-log-{}.txt", std::process::id()));
        {
            use std::io::Write;
            writeln!(open(&path).unwrap(), "first").unwrap();
            writeln!(open(&path).unwrap(), "second").unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text, "first\nsecond\n");
    }
}
