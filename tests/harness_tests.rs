//! Harness helpers: polling, temp scopes, warnings, artifacts, wire framing

mod test_data_gen;

use std::fs;
use std::panic;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use framecheck_assert::AssertError;
use framecheck_core::config::HarnessConfig;
use framecheck_harness::{
    assert_produces_warning, eventually, read_int, search_jar, warn, with_temp_dir, write_int,
    ByteArrayOutput, Check, HarnessError, TempDirScope, WarningCategory, WarningOptions,
};
use test_data_gen::legacy_helper;

/// Counter bumped by a background thread every 5 ms, up to `limit`.
fn spawn_counter(limit: usize) -> Arc<AtomicUsize> {
    let counter = Arc::new(AtomicUsize::new(0));
    let bump = Arc::clone(&counter);
    thread::spawn(move || {
        for _ in 0..limit {
            thread::sleep(Duration::from_millis(5));
            bump.fetch_add(1, Ordering::SeqCst);
        }
    });
    counter
}

#[test]
fn test_eventually_sees_counter_reach_five() {
    let counter = spawn_counter(10);
    let result = eventually(
        || {
            let n = counter.load(Ordering::SeqCst);
            Ok(if n >= 5 { Check::Done } else { Check::pending(n) })
        },
        Duration::from_secs(1),
        false,
    );
    assert!(result.is_ok());
}

#[test]
fn test_eventually_times_out_with_last_value() {
    let counter = spawn_counter(3);
    let start = Instant::now();
    let err = eventually(
        || {
            let n = counter.load(Ordering::SeqCst);
            Ok(if n >= 5 { Check::Done } else { Check::pending(n) })
        },
        Duration::from_secs(1),
        false,
    )
    .unwrap_err();
    assert!(start.elapsed() >= Duration::from_secs(1));
    assert_eq!(
        err.to_string(),
        "Test failed due to timeout after 1 sec, with last condition returning: 3"
    );
}

#[test]
fn test_eventually_returns_caught_assertion() {
    let counter = spawn_counter(3);
    let err = eventually(
        || {
            let n = counter.load(Ordering::SeqCst);
            if n >= 5 {
                Ok(Check::Done)
            } else {
                Err(AssertError::ValueMismatch {
                    detail: format!("{} != 5", n),
                    left: n.to_string(),
                    right: "5".into(),
                })
            }
        },
        Duration::from_millis(200),
        true,
    )
    .unwrap_err();
    assert_eq!(err.as_assertion().map(|e| e.detail()), Some("3 != 5".to_string()));
}

#[test]
fn test_temp_dir_removed_when_body_fails() {
    let mut seen = PathBuf::new();
    let outcome: Result<(), String> = with_temp_dir(|dir| {
        fs::write(dir.join("partial.csv"), "a,b\n").unwrap();
        seen = dir.to_path_buf();
        Err("body failed".to_string())
    })
    .unwrap();
    assert_eq!(outcome, Err("body failed".to_string()));
    assert!(!seen.exists());
}

#[test]
fn test_temp_dir_removed_when_body_panics() {
    let mut seen = PathBuf::new();
    let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        let scope = TempDirScope::new().unwrap();
        seen = scope.path().to_path_buf();
        assert!(seen.is_dir());
        panic!("body panicked");
    }));
    assert!(result.is_err());
    assert!(!seen.as_os_str().is_empty());
    assert!(!seen.exists());
}

#[test]
fn test_warning_from_other_file_fails_stacklevel() {
    let err = assert_produces_warning(
        Some(WarningCategory::FutureWarning),
        WarningOptions::default(),
        legacy_helper,
    )
    .unwrap_err();
    match err {
        HarnessError::WarningStackLevel { raised, caller, .. } => {
            assert!(raised.ends_with("test_data_gen.rs"));
            assert!(caller.ends_with("harness_tests.rs"));
        }
        other => panic!("unexpected {}", other),
    }

    let relaxed = WarningOptions {
        check_stacklevel: false,
        ..WarningOptions::default()
    };
    assert!(
        assert_produces_warning(Some(WarningCategory::FutureWarning), relaxed, legacy_helper)
            .is_ok()
    );
}

#[test]
fn test_no_warning_expected() {
    assert!(assert_produces_warning(None, WarningOptions::default(), || 1 + 1).is_ok());
    let err = assert_produces_warning(None, WarningOptions::default(), || {
        warn(WarningCategory::UserWarning, "surprise")
    })
    .unwrap_err();
    assert!(err.to_string().starts_with("Caused unexpected warning(s): [('UserWarning', 'surprise'"));
}

#[test]
fn test_warnings_on_other_threads_are_not_captured() {
    let err = assert_produces_warning(
        Some(WarningCategory::UserWarning),
        WarningOptions::default(),
        || {
            thread::spawn(|| warn(WarningCategory::UserWarning, "elsewhere"))
                .join()
                .unwrap()
        },
    )
    .unwrap_err();
    assert!(matches!(err, HarnessError::MissingExpectedWarning(_)));
}

#[test]
fn test_search_jar_uses_configured_home() {
    let home = tempfile::tempdir().unwrap();
    let target = home.path().join("connector/avro/target/scala-2.12");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("avro_2.12-3.1.0.jar"), b"").unwrap();
    fs::write(target.join("avro_2.12-3.1.0-tests.jar"), b"").unwrap();

    let config = HarnessConfig::default().with_home(home.path());
    let found = search_jar(&config, "connector/avro", "avro_", "avro-mvn").unwrap();
    assert_eq!(found, Some(target.join("avro_2.12-3.1.0.jar")));
}

#[test]
fn test_int_framing_round_trip_through_sink() {
    use std::io::Write;

    let mut out = ByteArrayOutput::new();
    for v in [0, 1, -1, i32::MAX] {
        out.write_all(&write_int(v)).unwrap();
    }
    let bytes = out.into_inner();
    let decoded: Vec<i32> = bytes.chunks(4).map(|c| read_int(c).unwrap()).collect();
    assert_eq!(decoded, vec![0, 1, -1, i32::MAX]);
}
