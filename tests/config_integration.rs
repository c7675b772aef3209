use std::path::PathBuf;
use std::time::Duration;

use wysiwyg_mount::config::{ConfigFlags, load_config_flags, parse_flag_tokens};
use wysiwyg_mount::factory::{self, EditorKind};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".wysiwygrc");
    let content = r"
# comment
--disabled

--variant inline

--event-log=events.log
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.disabled);
    assert_eq!(flags.variant.as_deref(), Some("inline"));
    assert_eq!(flags.event_log, Some(PathBuf::from("events.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".wysiwygrc");
    let content = "--disabled\n--variant inline\n--event-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "wysiwyg-mount".to_string(),
        "--variant".to_string(),
        "document".to_string(),
        "--debounce-ms".to_string(),
        "40".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.disabled, "file flags should remain enabled");
    assert_eq!(effective.debounce_ms, Some(40), "cli flags should be applied");
    assert_eq!(
        effective.variant.as_deref(),
        Some("document"),
        "cli should override variant"
    );
    assert_eq!(
        effective.event_log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}

#[test]
fn test_flags_resolve_to_a_builtin_editor() {
    let flags = parse_flag_tokens(&[
        "wysiwyg-mount".to_string(),
        "--variant=comment".to_string(),
        "--debounce-ms=10".to_string(),
    ]);
    let args = flags.component_args();
    assert_eq!(args.debounce(), Duration::from_millis(10));

    let constructor = factory::resolve(args.editor.as_ref());
    assert_eq!(constructor.name(), EditorKind::Comment.name());
}

#[test]
fn test_unknown_variant_falls_back_to_classic() {
    let flags = parse_flag_tokens(&["--variant".to_string(), "fancy".to_string()]);
    let constructor = factory::resolve(flags.component_args().editor.as_ref());
    assert_eq!(constructor.name(), "classic");
}
