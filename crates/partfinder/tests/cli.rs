use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;

fn partfinder(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("partfinder").unwrap();
    cmd.current_dir(dir.path())
        // nothing listens on the discard port, so any request fails fast
        .env("PARTFINDER_PRIMARY_URL", "http://127.0.0.1:9")
        .env("PARTFINDER_DELIVERY_URL", "http://127.0.0.1:9/api/dms")
        .env("PARTFINDER_SECONDARY_URL", "http://127.0.0.1:9/product")
        .env("PARTFINDER_TIMEOUT_SECS", "2")
        .env("RUST_LOG", "warn");
    cmd
}

fn results_files(dir: &TempDir) -> Vec<String> {
    std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("Results_"))
        .collect()
}

#[test]
fn missing_input_file_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = partfinder(&dir).arg("missing.xlsx").output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
    assert!(results_files(&dir).is_empty());
}

#[test]
fn missing_reference_column_aborts() {
    let dir = TempDir::new().unwrap();
    dir.child("parts.csv")
        .write_str("Part No,Package\n1,LQFP48\n")
        .unwrap();

    let output = partfinder(&dir).arg("parts.csv").output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Reference"), "stderr: {stderr}");
    assert!(results_files(&dir).is_empty());
}

#[test]
fn unreachable_vendor_still_writes_sheet() {
    let dir = TempDir::new().unwrap();
    dir.child("parts.csv")
        .write_str("Part No,Reference,Package\n1,STM32F103C8T6,LQFP48\n")
        .unwrap();

    let output = partfinder(&dir).arg("parts.csv").output().unwrap();
    assert!(output.status.success());

    let files = results_files(&dir);
    assert_eq!(files.len(), 1);
    let sheet = std::fs::read_to_string(dir.path().join(&files[0])).unwrap();
    assert_eq!(
        sheet.trim_end(),
        "Model,PN,Price,Min count,InStock,Url,Days,Package,Flash,RAM"
    );
}
