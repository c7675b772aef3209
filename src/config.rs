use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::classify::DEFAULT_CONTENT_CLASS;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::editor::EditorOptions;
use crate::factory::EditorDescriptor;

/// Everything a host supplies to the component at or before mount.
#[derive(Debug, Clone, Default)]
pub struct ComponentArgs {
    /// Which editor to build. `None` means the classic editor.
    pub editor: Option<EditorDescriptor>,
    /// Passed to the editor's constructor untouched.
    pub options: EditorOptions,
    /// Initial content.
    pub value: Option<String>,
    pub disabled: bool,
    pub content_class: Option<String>,
    pub debounce: Option<Duration>,
}

impl ComponentArgs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_editor(mut self, editor: impl Into<EditorDescriptor>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: EditorOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn with_content_class(mut self, class: impl Into<String>) -> Self {
        self.content_class = Some(class.into());
        self
    }

    #[must_use]
    pub const fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = Some(window);
        self
    }

    /// The class for the editable root; an empty override counts as unset.
    pub fn content_class(&self) -> &str {
        self.content_class
            .as_deref()
            .filter(|class| !class.trim().is_empty())
            .unwrap_or(DEFAULT_CONTENT_CLASS)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce.unwrap_or(DEFAULT_DEBOUNCE)
    }
}

/// Defaults for the `wysiwyg-mount` binary, layered global → local → CLI.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub variant: Option<String>,
    pub content_class: Option<String>,
    pub debounce_ms: Option<u64>,
    pub disabled: bool,
    pub event_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            variant: other.variant.clone().or_else(|| self.variant.clone()),
            content_class: other
                .content_class
                .clone()
                .or_else(|| self.content_class.clone()),
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            disabled: self.disabled || other.disabled,
            event_log: other.event_log.clone().or_else(|| self.event_log.clone()),
        }
    }

    /// Component arguments these flags describe. Value and options are per
    /// run and are never stored in a flag file.
    pub fn component_args(&self) -> ComponentArgs {
        let mut args = ComponentArgs::new().with_disabled(self.disabled);
        if let Some(variant) = &self.variant {
            args = args.with_editor(variant.as_str());
        }
        if let Some(class) = &self.content_class {
            args = args.with_content_class(class.as_str());
        }
        if let Some(ms) = self.debounce_ms {
            args = args.with_debounce(Duration::from_millis(ms));
        }
        args
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("wysiwyg-mount").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("wysiwyg-mount")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("wysiwyg-mount").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("wysiwyg-mount")
                .join("config");
        }
    }

    PathBuf::from(".wysiwygrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".wysiwygrc")
}

/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// # Errors
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# wysiwyg-mount defaults (saved with --save)".to_string()];
    if let Some(variant) = &flags.variant {
        lines.push(format!("--variant {variant}"));
    }
    if let Some(class) = &flags.content_class {
        lines.push(format!("--content-class {class}"));
    }
    if let Some(ms) = flags.debounce_ms {
        lines.push(format!("--debounce-ms {ms}"));
    }
    if flags.disabled {
        lines.push("--disabled".to_string());
    }
    if let Some(path) = &flags.event_log {
        lines.push(format!("--event-log {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pull known flags out of a token list; anything else is skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (token, None),
        };
        let takes_value = matches!(
            name,
            "--variant" | "--content-class" | "--debounce-ms" | "--event-log"
        );
        let value = if takes_value && inline_value.is_none() {
            let next = tokens.get(i + 1).cloned();
            if next.is_some() {
                i += 1;
            }
            next
        } else {
            inline_value
        };
        match name {
            "--disabled" => {
                if let Some(disabled) = value.as_deref().map_or(Some(true), |v| v.parse().ok()) {
                    flags.disabled = disabled;
                }
            }
            "--variant" => flags.variant = value,
            "--content-class" => flags.content_class = value,
            "--debounce-ms" => flags.debounce_ms = value.and_then(|v| v.parse().ok()),
            "--event-log" => flags.event_log = value.map(PathBuf::from),
            _ => {}
        }
        i += 1;
    }
    flags
}
