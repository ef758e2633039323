//! Time and size rotation through the logger

mod common;

use std::fs;

use logit::infrastructure::logging::unix_now;
use logit::{Level, LoggerConfig, RotationLedger};

use common::{quiet_logger, temp_dir};

const DAY: f64 = 86_400.0;

#[test]
fn test_time_rotation_when_threshold_elapsed() {
    let dir = temp_dir();
    let mut logger = quiet_logger(&dir);
    logger
        .configure_full(Level::Clutter, "app.log", Some("1d"), None)
        .unwrap();
    let log_file = logger.log_file_path();
    fs::write(&log_file, "yesterday\n").unwrap();
    logger
        .ledger()
        .save_last_rotation(&log_file, unix_now() - DAY - 2.0)
        .unwrap();

    let report = logger.info("today").unwrap();

    let archived = report.archived_to.expect("log should have rotated");
    assert_eq!(fs::read_to_string(&archived).unwrap(), "yesterday\n");
    assert!(archived
        .file_name()
        .unwrap()
        .to_string_lossy()
        .ends_with("-archive-app.log"));

    let contents = fs::read_to_string(&log_file).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("today"));

    let elapsed = unix_now() - logger.ledger().last_rotation(&log_file).unwrap();
    assert!(elapsed < 60.0);
}

#[test]
fn test_first_observation_is_never_due() {
    let dir = temp_dir();
    let mut logger = quiet_logger(&dir);
    logger
        .configure_full(Level::Clutter, "app.log", Some("1d"), None)
        .unwrap();
    fs::write(logger.log_file_path(), "existing\n").unwrap();

    let report = logger.info("first").unwrap();

    assert!(!report.rotated());
    assert!(dir.path().join(".logit/ledger.json").is_file());
    assert_eq!(logger.ledger().entries().unwrap().len(), 1);
}

#[test]
fn test_due_rotation_without_file_only_records_time() {
    let dir = temp_dir();
    let mut logger = quiet_logger(&dir);
    logger
        .configure_full(Level::Clutter, "fresh.log", Some("1d"), None)
        .unwrap();
    let log_file = logger.log_file_path();
    logger.ledger().save_last_rotation(&log_file, 0.0).unwrap();

    let report = logger.info("hello").unwrap();

    assert!(!report.rotated());
    assert!(report.is_clean());
    assert!(logger.ledger().archives().unwrap().is_empty());
    assert!(logger.ledger().last_rotation(&log_file).unwrap() > 0.0);
}

#[test]
fn test_same_day_archives_do_not_collide() {
    let dir = temp_dir();
    let mut logger = quiet_logger(&dir);
    logger
        .configure_full(Level::Clutter, "app.log", None, Some("1kb"))
        .unwrap();
    let log_file = logger.log_file_path();

    fs::write(&log_file, vec![b'a'; 1_500]).unwrap();
    logger.info("one").unwrap();
    fs::write(&log_file, vec![b'b'; 1_500]).unwrap();
    logger.info("two").unwrap();

    let archives = RotationLedger::for_project(logger.paths()).archives().unwrap();
    assert_eq!(archives.len(), 2);
    assert_ne!(archives[0], archives[1]);
}

#[test]
fn test_archive_directory_sits_beside_config_dir() {
    let dir = temp_dir();
    let mut logger = quiet_logger(&dir);
    logger
        .configure_full(Level::Clutter, "app.log", None, Some("1kb"))
        .unwrap();
    fs::write(logger.log_file_path(), vec![b'x'; 2_000]).unwrap();

    let report = logger.info("rotate").unwrap();

    let archived = report.archived_to.unwrap();
    assert_eq!(archived.parent().unwrap(), dir.path().join(".logit-archives"));
}

#[test]
fn test_one_second_threshold_with_rotation_two_seconds_ago() {
    let dir = temp_dir();
    let mut logger = quiet_logger(&dir);
    logger.set_config(LoggerConfig {
        level: Level::Clutter,
        log_file_path: "app.log".into(),
        rotation_seconds: Some(1),
        rotation_kilobytes: None,
    });
    let log_file = logger.log_file_path();
    fs::write(&log_file, "old\n").unwrap();
    logger
        .ledger()
        .save_last_rotation(&log_file, unix_now() - 2.0)
        .unwrap();

    let report = logger.info("new").unwrap();

    let archived = report.archived_to.expect("log should have rotated");
    assert_eq!(fs::read_to_string(&archived).unwrap(), "old\n");
    let contents = fs::read_to_string(&log_file).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.ends_with(" | new\n"));
}
