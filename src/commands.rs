//! Rendering and launching user-defined shell commands.

use crate::config::{CommandContext, CustomCommand};
use crate::data::Issue;
use anyhow::{Context, Result};
use base64::Engine;
use std::io::Write;

/// Quote `s` for POSIX `sh` as a single-quoted word.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Substitute issue fields into a command template. Values are shell-quoted.
pub fn render(template: &str, issue: &Issue) -> String {
    template
        .replace("{id}", &shell_quote(&issue.id))
        .replace("{title}", &shell_quote(&issue.title))
        .replace("{status}", &shell_quote(issue.status.as_str()))
        .replace("{priority}", &shell_quote(issue.priority_label()))
}

/// Index of the first command bound to `key` that is active in `context`.
pub fn find(commands: &[CustomCommand], key: &str, context: CommandContext) -> Option<usize> {
    commands
        .iter()
        .position(|c| c.key == key && c.context.applies_to(context))
}

/// Launch `command` for `issue` through `sh -c` without waiting for it.
pub fn spawn(command: &CustomCommand, issue: &Issue) -> Result<()> {
    let rendered = render(&command.command, issue);
    tracing::info!("Running custom command {:?}: {}", command.key, rendered);

    tokio::process::Command::new("sh")
        .arg("-c")
        .arg(&rendered)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to run custom command `{}`", command.key))?;

    Ok(())
}

/// Let the user edit `initial` in `$EDITOR` (falling back to `nano`) and
/// return what they saved. Blocks until the editor exits.
pub fn edit_in_editor(initial: &str) -> Result<String> {
    let editor = std::env::var("EDITOR")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "nano".to_string());

    let mut file = tempfile::Builder::new()
        .prefix("lazybeads-")
        .suffix(".md")
        .tempfile()
        .context("Failed to create scratch file for editor")?;
    file.write_all(initial.as_bytes())?;
    file.flush()?;

    tracing::info!("Opening {} in {}", file.path().display(), editor);
    // $EDITOR may carry arguments, so let the shell split it
    let status = std::process::Command::new("sh")
        .arg("-c")
        .arg(format!("{} \"$1\"", editor))
        .arg("sh")
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to launch editor `{}`", editor))?;
    if !status.success() {
        anyhow::bail!("`{}` exited with {}", editor, status);
    }

    std::fs::read_to_string(file.path()).context("Failed to read back edited description")
}

/// OSC 52 escape sequence asking the terminal to put `text` on the clipboard.
pub fn osc52_copy(text: &str) -> String {
    format!(
        "\x1b]52;c;{}\x07",
        base64::engine::general_purpose::STANDARD.encode(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Status;
    use pretty_assertions::assert_eq;

    fn command(key: &str, context: CommandContext) -> CustomCommand {
        CustomCommand {
            key: key.to_string(),
            description: String::new(),
            context,
            command: "echo {id}".to_string(),
        }
    }

    #[test]
    fn test_render_quotes_values() {
        let issue = Issue::new("bd-1.2", "it's $HOME", Status::InProgress);
        let out = render("tmux neww -n {id} 'x' {title} {status} {priority}", &issue);
        assert_eq!(
            out,
            r#"tmux neww -n 'bd-1.2' 'x' 'it'\''s $HOME' 'in_progress' 'P2'"#
        );
    }

    #[test]
    fn test_find_respects_context() {
        let commands = vec![
            command("t", CommandContext::Detail),
            command("t", CommandContext::List),
            command("y", CommandContext::Global),
        ];

        assert_eq!(find(&commands, "t", CommandContext::List), Some(1));
        assert_eq!(find(&commands, "t", CommandContext::Detail), Some(0));
        assert_eq!(find(&commands, "t", CommandContext::Board), None);
        assert_eq!(find(&commands, "y", CommandContext::Board), Some(2));
    }

    #[test]
    fn test_osc52_copy_encodes_text() {
        assert_eq!(osc52_copy("bd-1.2"), "\x1b]52;c;YmQtMS4y\x07");
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_in_editor_reads_back_file() {
        // `true` leaves the file untouched
        std::env::set_var("EDITOR", "true");
        assert_eq!(edit_in_editor("keep me").unwrap(), "keep me");
    }
}
