//! Line-oriented session scripts for the `wysiwyg-mount` binary.
//!
//! ```text
//! # comment
//! toolbar
//! mount
//! type Hello
//! focus
//! wait 150
//! upload cat.png {"default": "/uploads/cat.png"}
//! unmount
//! ```

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Mount the component.
    Mount,
    /// Unmount the component.
    Unmount,
    /// Provide the toolbar mount element.
    Toolbar,
    /// Append text to the document, as if typed.
    Type(String),
    /// Replace the document from inside the editor.
    Set(String),
    /// Send a new value prop from the host.
    Value(String),
    Focus,
    Blur,
    Disable,
    Enable,
    /// Simulate a finished upload.
    Upload { file: String, response: Value },
    Wait(Duration),
}

impl Command {
    /// Whether the command acts on the live editor rather than the controller.
    pub const fn needs_editor(&self) -> bool {
        matches!(
            self,
            Self::Type(_) | Self::Set(_) | Self::Focus | Self::Blur | Self::Upload { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` needs an argument")]
    MissingArgument { line: usize, command: &'static str },
    #[error("line {line}: invalid wait duration `{value}`")]
    InvalidDuration { line: usize, value: String },
    #[error("line {line}: invalid upload response")]
    InvalidResponse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A parsed command and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

/// Parse a script. Blank lines and `#` comments are skipped.
///
/// # Errors
/// Returns the first [`ScriptError`] encountered.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    text.lines()
        .enumerate()
        .map(|(index, raw)| (index + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| parse_line(line, text).map(|command| ScriptLine { line, command }))
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<Command, ScriptError> {
    let (word, rest) = text
        .split_once(char::is_whitespace)
        .map_or((text, ""), |(word, rest)| (word, rest.trim()));
    let argument = |command: &'static str| {
        if rest.is_empty() {
            Err(ScriptError::MissingArgument { line, command })
        } else {
            Ok(rest.to_string())
        }
    };
    let command = match word {
        "mount" => Command::Mount,
        "unmount" => Command::Unmount,
        "toolbar" => Command::Toolbar,
        "focus" => Command::Focus,
        "blur" => Command::Blur,
        "disable" => Command::Disable,
        "enable" => Command::Enable,
        "type" => Command::Type(argument("type")?),
        "set" => Command::Set(argument("set")?),
        "value" => Command::Value(argument("value")?),
        "wait" => {
            let value = argument("wait")?;
            let ms = value
                .parse::<u64>()
                .map_err(|_| ScriptError::InvalidDuration { line, value })?;
            Command::Wait(Duration::from_millis(ms))
        }
        "upload" => {
            let rest = argument("upload")?;
            let (file, response) = rest
                .split_once(char::is_whitespace)
                .ok_or(ScriptError::MissingArgument {
                    line,
                    command: "upload",
                })?;
            let response = serde_json::from_str(response.trim())
                .map_err(|source| ScriptError::InvalidResponse { line, source })?;
            Command::Upload {
                file: file.to_string(),
                response,
            }
        }
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            });
        }
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_script_skips_comments_and_blank_lines() {
        let script = "# setup\n\nmount\n  type Hello world  \nwait 120\nunmount\n";
        let parsed = parse_script(script).unwrap();
        assert_eq!(
            parsed,
            vec![
                ScriptLine { line: 3, command: Command::Mount },
                ScriptLine { line: 4, command: Command::Type("Hello world".to_string()) },
                ScriptLine { line: 5, command: Command::Wait(Duration::from_millis(120)) },
                ScriptLine { line: 6, command: Command::Unmount },
            ]
        );
    }

    #[test]
    fn test_parse_upload_with_json_response() {
        let parsed = parse_script(r#"upload cat.png {"default": "/uploads/cat.png"}"#).unwrap();
        assert_eq!(
            parsed[0].command,
            Command::Upload {
                file: "cat.png".to_string(),
                response: json!({"default": "/uploads/cat.png"}),
            }
        );
    }

    #[test]
    fn test_unknown_command_reports_line() {
        let err = parse_script("mount\nexplode\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: unknown command `explode`");
    }

    #[test]
    fn test_missing_argument() {
        let err = parse_script("type").unwrap_err();
        assert!(matches!(err, ScriptError::MissingArgument { line: 1, command: "type" }));
    }

    #[test]
    fn test_invalid_wait() {
        let err = parse_script("wait soon").unwrap_err();
        assert_eq!(err.to_string(), "line 1: invalid wait duration `soon`");
    }

    #[test]
    fn test_invalid_upload_response() {
        let err = parse_script("upload cat.png {nope").unwrap_err();
        assert!(matches!(err, ScriptError::InvalidResponse { line: 1, .. }));
    }

    #[test]
    fn test_editor_commands() {
        assert!(Command::Focus.needs_editor());
        assert!(Command::Type("x".to_string()).needs_editor());
        assert!(!Command::Disable.needs_editor());
        assert!(!Command::Value("x".to_string()).needs_editor());
        assert!(!Command::Wait(Duration::ZERO).needs_editor());
    }
}
