//! wysiwyg-mount - Drive a rich-text editor component through a scripted
//! host session.
//!
//! # Usage
//!
//! ```bash
//! wysiwyg-mount session.txt
//! wysiwyg-mount --variant document --value "<p>Hi</p>" session.txt
//! wysiwyg-mount --options '{"plugins": ["FileRepository"]}' uploads.txt
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use wysiwyg_mount::config::{
    clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags, ConfigFlags,
};
use wysiwyg_mount::eventlog;
use wysiwyg_mount::script::parse_script;
use wysiwyg_mount::session::Session;

/// Mount an editor component and replay a host session against it
#[derive(Parser, Debug)]
#[command(name = "wysiwyg-mount", version, about, long_about = None)]
struct Cli {
    /// Session script to replay
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Editor variant: classic, inline, comment or document
    #[arg(long)]
    variant: Option<String>,

    /// Initial content
    #[arg(long)]
    value: Option<String>,

    /// Start read-only
    #[arg(long)]
    disabled: bool,

    /// Class applied to the editable root
    #[arg(long)]
    content_class: Option<String>,

    /// Input debounce window in milliseconds
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Editor options as a JSON object
    #[arg(long, value_name = "JSON")]
    options: Option<String>,

    /// Write lifecycle events to a file
    #[arg(long, value_name = "PATH")]
    event_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();

    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    if let Err(err) = eventlog::set_log_path(effective.event_log.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize event log {}: {}",
            effective
                .event_log
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    let mut args = effective.component_args();
    if let Some(value) = cli.value {
        args = args.with_value(value);
    }
    if let Some(options) = cli.options.as_deref() {
        let options = serde_json::from_str(options).context("--options is not valid JSON")?;
        args = args.with_options(options);
    }

    let text = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("Failed to read script {}", cli.script.display()))?;
    let script = parse_script(&text)
        .with_context(|| format!("Failed to parse script {}", cli.script.display()))?;

    let mut session = Session::new(args);
    session.run(&script).await;
    for line in session.finish().await {
        println!("{line}");
    }
    Ok(())
}
