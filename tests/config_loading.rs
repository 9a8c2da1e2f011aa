// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tempfile::NamedTempFile;

use csvforward::cli::{CliArgs, Command, ConvertArgs, TailArgs};
use csvforward::config::{
    apply_convert_overrides, apply_tail_overrides, load_and_validate, load_from_path,
    load_or_default, ConfigFile, RawConfigFile,
};
use csvforward::errors::ForwardError;
use csvforward::types::{HecProtocol, RunMode};

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn empty_file_takes_every_default() {
    let file = toml_file("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.tail.data_dir, PathBuf::from("data"));
    assert_eq!(cfg.tail.state_dir, PathBuf::from("state"));
    assert_eq!(cfg.tail.poll_interval, 10);
    assert_eq!(cfg.tail.sourcetype, "csv_data");
    assert_eq!(cfg.tail.mode, RunMode::Continuous);
    assert_eq!(cfg.tail.extension, "csv");

    assert_eq!(cfg.convert.output_dir, PathBuf::from("json_output"));
    assert_eq!(cfg.convert.host, "csv-converter");
    assert_eq!(cfg.convert.index, "main");
    assert!(cfg.hec.is_none());
}

#[test]
fn full_file_is_read() {
    let file = toml_file(
        r#"
[tail]
data_dir = "/var/csv"
state_dir = "/var/lib/csvforward"
poll_interval = 3
sourcetype = "audit"
mode = "once"

[convert]
index = "security"

[hec]
host = "splunk.local"
token = "abc"
protocol = "https"
verify_tls = false
batch_size = 50
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.tail.data_dir, PathBuf::from("/var/csv"));
    assert_eq!(cfg.tail.poll_interval, 3);
    assert_eq!(cfg.tail.mode, RunMode::Once);
    assert_eq!(cfg.convert.index, "security");

    let hec = cfg.hec.unwrap();
    assert_eq!(hec.host, "splunk.local");
    assert_eq!(hec.port, 8088);
    assert_eq!(hec.protocol, HecProtocol::Https);
    assert!(!hec.verify_tls);
    assert_eq!(hec.batch_size, 50);
    assert_eq!(hec.timeout_secs, 30);
}

#[test]
fn zero_poll_interval_is_a_config_error() {
    let file = toml_file("[tail]\npoll_interval = 0\n");

    match load_and_validate(file.path()) {
        Err(ForwardError::ConfigError(msg)) => assert!(msg.contains("poll_interval")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn dotted_extension_is_a_config_error() {
    let file = toml_file("[tail]\nextension = \".csv\"\n");

    match load_and_validate(file.path()) {
        Err(ForwardError::ConfigError(msg)) => assert!(msg.contains("extension")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn empty_hec_token_is_a_config_error() {
    let file = toml_file("[hec]\nhost = \"h\"\ntoken = \"\"\n");

    match load_and_validate(file.path()) {
        Err(ForwardError::ConfigError(msg)) => assert!(msg.contains("[hec].token")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn unknown_keys_and_bad_values_are_toml_errors() {
    let unknown = toml_file("[tail]\npoll_intervall = 5\n");
    assert!(matches!(
        load_from_path(unknown.path()),
        Err(ForwardError::TomlError(_))
    ));

    let bad_mode = toml_file("[tail]\nmode = \"sometimes\"\n");
    assert!(matches!(
        load_from_path(bad_mode.path()),
        Err(ForwardError::TomlError(_))
    ));
}

#[test]
fn missing_explicit_config_is_an_io_error() {
    let result = load_or_default(Some(std::path::Path::new("/definitely/not/here.toml")));
    assert!(matches!(result, Err(ForwardError::IoError(_))));
}

#[test]
fn tail_flags_override_file_values() {
    let file = toml_file("[tail]\ndata_dir = \"from-file\"\npoll_interval = 30\n");
    let mut raw = load_from_path(file.path()).unwrap();

    let args = TailArgs {
        poll_interval: Some(2),
        once: true,
        ..TailArgs::default()
    };
    apply_tail_overrides(&mut raw, &args);
    let cfg = ConfigFile::try_from(raw).unwrap();

    assert_eq!(cfg.tail.data_dir, PathBuf::from("from-file"));
    assert_eq!(cfg.tail.poll_interval, 2);
    assert_eq!(cfg.tail.mode, RunMode::Once);
}

#[test]
fn hec_section_appears_only_when_host_or_token_given() {
    let mut raw = RawConfigFile::default();
    apply_convert_overrides(
        &mut raw,
        &ConvertArgs {
            hec_port: Some(9000),
            insecure: true,
            ..ConvertArgs::default()
        },
    );
    assert!(raw.hec.is_none());

    apply_convert_overrides(
        &mut raw,
        &ConvertArgs {
            hec_host: Some("splunk".into()),
            hec_token: Some("tok".into()),
            hec_port: Some(9000),
            ..ConvertArgs::default()
        },
    );
    let cfg = ConfigFile::try_from(raw).unwrap();
    let hec = cfg.hec.unwrap();
    assert_eq!(hec.host, "splunk");
    assert_eq!(hec.token, "tok");
    assert_eq!(hec.port, 9000);
}

#[test]
fn host_without_token_fails_validation() {
    let mut raw = RawConfigFile::default();
    apply_convert_overrides(
        &mut raw,
        &ConvertArgs {
            hec_host: Some("splunk".into()),
            ..ConvertArgs::default()
        },
    );

    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(ForwardError::ConfigError(_))
    ));
}

#[test]
fn cli_parses_subcommands_and_global_flags() {
    let args = CliArgs::try_parse_from([
        "csvforward",
        "tail",
        "--data-dir",
        "/in",
        "--once",
        "--dry-run",
        "--log-level",
        "debug",
    ])
    .unwrap();
    assert!(args.dry_run);
    assert!(args.log_level.is_some());
    match args.command {
        Command::Tail(tail) => {
            assert_eq!(tail.data_dir, Some(PathBuf::from("/in")));
            assert!(tail.once);
        }
        other => panic!("Expected tail, got: {other:?}"),
    }

    let args = CliArgs::try_parse_from([
        "csvforward",
        "convert",
        "--protocol",
        "https",
        "--batch-size",
        "10",
    ])
    .unwrap();
    match args.command {
        Command::Convert(convert) => {
            assert_eq!(convert.protocol, Some(HecProtocol::Https));
            assert_eq!(convert.batch_size, Some(10));
        }
        other => panic!("Expected convert, got: {other:?}"),
    }

    assert!(CliArgs::try_parse_from(["csvforward", "tail", "--mode", "sometimes"]).is_err());
}

#[test]
fn enum_flags_ignore_case() {
    let args = CliArgs::try_parse_from(["csvforward", "tail", "--mode", "Once"]).unwrap();
    match args.command {
        Command::Tail(tail) => assert_eq!(tail.mode, Some(RunMode::Once)),
        other => panic!("Expected tail, got: {other:?}"),
    }

    let args =
        CliArgs::try_parse_from(["csvforward", "tail", "--mode", "CONTINUOUS"]).unwrap();
    match args.command {
        Command::Tail(tail) => assert_eq!(tail.mode, Some(RunMode::Continuous)),
        other => panic!("Expected tail, got: {other:?}"),
    }

    let args = CliArgs::try_parse_from(["csvforward", "convert", "--protocol", "HTTPS"]).unwrap();
    match args.command {
        Command::Convert(convert) => assert_eq!(convert.protocol, Some(HecProtocol::Https)),
        other => panic!("Expected convert, got: {other:?}"),
    }
}
