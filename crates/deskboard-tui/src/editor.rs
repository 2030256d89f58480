//! External-editor round trip for description editing.

use crate::events::EventHandler;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Command;

fn fallback_editor() -> String {
    for editor in ["nvim", "vim", "nano", "vi"] {
        let found = Command::new("which")
            .arg(editor)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false);
        if found {
            return editor.to_string();
        }
    }
    "vi".to_string()
}

/// Suspend the TUI, run `$EDITOR` on a temp file seeded with
/// `initial_content`, and return the edited text. `None` means the
/// editor failed to launch or the content is unchanged.
pub fn edit_in_external_editor(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    event_handler: &EventHandler,
    temp_file: PathBuf,
    initial_content: &str,
) -> io::Result<Option<String>> {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| fallback_editor());

    std::fs::write(&temp_file, initial_content)?;

    // Hand the terminal to the editor
    event_handler.stop();
    disable_raw_mode()?;
    execute!(io::stdout(), DisableFocusChange, LeaveAlternateScreen)?;
    io::stdout().flush()?;

    let status = Command::new(&editor).arg(&temp_file).status();

    // Take it back regardless of how the editor exited
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableFocusChange)?;
    terminal.clear()?;

    let edited = match status {
        Ok(status) if status.success() => std::fs::read_to_string(&temp_file)?,
        Ok(_) => return Ok(None),
        Err(err) => {
            tracing::warn!(error = %err, editor = %editor, "failed to launch editor");
            return Ok(None);
        }
    };
    let _ = std::fs::remove_file(&temp_file);

    if edited == initial_content {
        Ok(None)
    } else {
        Ok(Some(edited))
    }
}
