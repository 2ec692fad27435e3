//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry, DefaultLogger and logger replacement.

use crate::log::{self, Logger, LogEntry, LogSeverity, DefaultLogger};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// Logger that keeps every entry coming from one source
struct CaptureLogger {
    source: &'static str,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == self.source {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_with_file_line() {
    let entry = LogEntry {
        severity: LogSeverity::Error,
        timestamp: SystemTime::now(),
        source: "boxcull::MockDevice".to_string(),
        message: "buffer creation failed".to_string(),
        file: Some("mock_graphics_device.rs"),
        line: Some(42),
    };

    let cloned = entry.clone();
    assert_eq!(cloned.severity, LogSeverity::Error);
    assert_eq!(cloned.file, Some("mock_graphics_device.rs"));
    assert_eq!(cloned.line, Some(42));
}

#[test]
fn test_default_logger_does_not_panic() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: "boxcull::tests".to_string(),
            message: "message".to_string(),
            file: None,
            line: None,
        });
    }
}

// ============================================================================
// GLOBAL LOGGER
// ============================================================================

#[test]
#[serial]
fn test_set_logger_captures_macros() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger {
        source: "boxcull::log_tests::macros",
        entries: entries.clone(),
    });

    crate::engine_info!("boxcull::log_tests::macros", "{} instances", 100);
    crate::engine_warn!("boxcull::log_tests::macros", "ring saturated");
    crate::engine_error!("boxcull::log_tests::macros", "map failed");

    log::reset_logger();

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[0].message, "100 instances");
    assert!(captured[0].file.is_none());
    assert_eq!(captured[1].severity, LogSeverity::Warn);
    assert_eq!(captured[2].severity, LogSeverity::Error);
    assert!(captured[2].file.is_some());
    assert!(captured[2].line.is_some());
}

#[test]
#[serial]
fn test_engine_bail_logs_error() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger {
        source: "boxcull::log_tests::bail",
        entries: entries.clone(),
    });

    let _ = crate::engine_err!("boxcull::log_tests::bail", MapFailed, "ignored");

    log::reset_logger();

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].message, "ignored");
}

#[test]
#[serial]
fn test_reset_logger_stops_capture() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger {
        source: "boxcull::log_tests::reset",
        entries: entries.clone(),
    });
    log::reset_logger();

    crate::engine_debug!("boxcull::log_tests::reset", "after reset");

    assert!(entries.lock().unwrap().is_empty());
}
