use super::{
    is_length_sufficient, min_length_for_uniqueness, CommandOverrides, ConfigErrors, MetricsStream,
    StructureType, SweepConfig,
};
use crate::matrix::expand;
use std::{fs, os::unix::fs::PermissionsExt, path::PathBuf};
use tempfile::TempDir;

const SWEEP: &str = r#"
groups:
  - type: string
    key_counts: [1000]
    key_sizes: [16]
    value_sizes: [64, 256]
  - type: zset
    name: sorted
"#;

#[test]
pub fn parse_minimal_sweep_with_default_command() {
    let sweep = SweepConfig::from_yaml(SWEEP).unwrap();

    assert_eq!(sweep.command.exec, PathBuf::from("./resp-cost"));
    assert_eq!(sweep.command.subcommand, "populate");
    assert_eq!(sweep.command.metrics_stream, MetricsStream::Stderr);
    assert_eq!(sweep.groups.len(), 2);
    assert_eq!(sweep.groups[0].structure, StructureType::String);
    assert_eq!(sweep.groups[0].value_sizes, Some(vec![64, 256]));
    assert_eq!(sweep.groups[0].field_counts, None);
    assert_eq!(sweep.groups[0].label(0), "0-string");
    assert_eq!(sweep.groups[1].label(1), "sorted");
}

#[test]
pub fn embedded_sweep_expands() {
    let sweep = SweepConfig::embedded().unwrap();

    let sizes = sweep
        .groups
        .iter()
        .map(|group| expand(group).len())
        .collect::<Vec<_>>();

    assert_eq!(sizes, vec![8, 2]);
}

#[test]
pub fn missing_type_is_rejected() {
    let result = SweepConfig::from_yaml("groups:\n  - key_counts: [1]\n");

    assert!(matches!(result, Err(ConfigErrors::ParseConfig(_))));
}

#[test]
pub fn unknown_type_is_rejected() {
    let result = SweepConfig::from_yaml("groups:\n  - type: stream\n");

    assert!(matches!(result, Err(ConfigErrors::ParseConfig(_))));
}

#[test]
pub fn unknown_fields_are_rejected() {
    let result = SweepConfig::from_yaml("groups:\n  - type: hash\n    key_count: [1]\n");

    assert!(matches!(result, Err(ConfigErrors::ParseConfig(_))));
}

#[test]
pub fn metrics_stream_is_configurable() {
    let sweep =
        SweepConfig::from_yaml("command:\n  metrics_stream: both\ngroups:\n  - type: list\n")
            .unwrap();

    assert_eq!(sweep.command.metrics_stream, MetricsStream::Both);
    assert_eq!(sweep.command.subcommand, "populate");
}

#[test]
pub fn unreadable_file_is_fatal() {
    let dir = TempDir::new().unwrap();

    assert!(matches!(
        SweepConfig::load(&dir.path().join("missing.yaml")),
        Err(ConfigErrors::ReadConfig { .. })
    ));
}

#[test]
pub fn load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sweep.yaml");
    fs::write(&path, SWEEP).unwrap();

    assert_eq!(
        SweepConfig::load(&path).unwrap(),
        SweepConfig::from_yaml(SWEEP).unwrap()
    );
}

fn with_exec(yaml: &str, exec: &str) -> SweepConfig {
    let mut sweep = SweepConfig::from_yaml(yaml).unwrap();
    sweep.command.exec = PathBuf::from(exec);
    sweep
}

#[test]
pub fn preflight_accepts_bare_command_names() {
    assert!(with_exec(SWEEP, "resp-cost").preflight_checks().is_ok());
}

#[test]
pub fn preflight_rejects_empty_groups() {
    let sweep = with_exec("groups: []\n", "resp-cost");

    assert!(matches!(
        sweep.preflight_checks(),
        Err(ConfigErrors::PreflightFailed)
    ));
}

#[test]
pub fn preflight_rejects_empty_candidate_lists() {
    let sweep = with_exec("groups:\n  - type: set\n    value_sizes: []\n", "resp-cost");

    assert!(matches!(
        sweep.preflight_checks(),
        Err(ConfigErrors::PreflightFailed)
    ));
}

#[test]
pub fn preflight_checks_explicit_exec_paths() {
    let dir = TempDir::new().unwrap();
    let exec = dir.path().join("resp-cost");

    let sweep = with_exec(SWEEP, &exec.to_string_lossy());
    assert!(sweep.preflight_checks().is_err());

    fs::write(&exec, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&exec, fs::Permissions::from_mode(0o644)).unwrap();
    assert!(sweep.preflight_checks().is_err());

    fs::set_permissions(&exec, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(sweep.preflight_checks().is_ok());
}

#[test]
pub fn uniqueness_lengths() {
    assert_eq!(min_length_for_uniqueness(0), 1);
    assert_eq!(min_length_for_uniqueness(61), 1);
    assert_eq!(min_length_for_uniqueness(62), 2);
    assert_eq!(min_length_for_uniqueness(3843), 2);
    assert_eq!(min_length_for_uniqueness(3844), 3);
    assert_eq!(min_length_for_uniqueness(u64::MAX), 11);

    assert!(is_length_sufficient(1000, 16));
    assert!(!is_length_sufficient(1000, 1));
    assert!(!is_length_sufficient(10, 0));
}

#[test]
pub fn zero_count_needs_no_name_length() {
    assert!(is_length_sufficient(0, 0));
    assert!(is_length_sufficient(0, 16));
    assert!(!is_length_sufficient(1, 0));
}

#[test]
pub fn overrides_replace_only_given_settings() {
    let mut sweep = SweepConfig::from_yaml(
        "command:\n  exec: /opt/resp-cost\n  subcommand: fill\ngroups:\n  - type: list\n",
    )
    .unwrap();

    sweep.command.apply(CommandOverrides {
        metrics_stream: Some(MetricsStream::Stdout),
        ..CommandOverrides::default()
    });
    assert_eq!(sweep.command.exec, PathBuf::from("/opt/resp-cost"));
    assert_eq!(sweep.command.subcommand, "fill");
    assert_eq!(sweep.command.metrics_stream, MetricsStream::Stdout);

    sweep.command.apply(CommandOverrides {
        exec: Some(PathBuf::from("resp-cost")),
        subcommand: Some("populate".to_owned()),
        metrics_stream: None,
    });
    assert_eq!(sweep.command.exec, PathBuf::from("resp-cost"));
    assert_eq!(sweep.command.subcommand, "populate");
    assert_eq!(sweep.command.metrics_stream, MetricsStream::Stdout);
}
