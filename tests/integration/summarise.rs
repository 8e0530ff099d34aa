// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use crate::*;

fn collect(dir: &Path) -> PathBuf {
    let detections = make_detections(dir);
    let output = dir.join("out.rfi");
    let cmd = rfi_tracker()
        .args([
            "collect",
            "-d",
            &format!("{}", detections.display()),
            "-o",
            &format!("{}", output.display()),
            "-c",
            "8",
            "-t",
            "4",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", cmd.err());
    output
}

#[test]
fn test_summarise_from_collect_sidecar() {
    let tmp_dir = TempDir::new().unwrap();
    let output = collect(tmp_dir.path());

    let cmd = rfi_tracker()
        .args(["summarise", &format!("{}.toml", output.display())])
        .ok();
    assert!(cmd.is_ok(), "{:?}", cmd.err());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("3 RFI"), "{stdout}");
    assert!(stdout.contains("channels:  0-2"), "{stdout}");
}

#[test]
fn test_summarize_with_wrong_num_rfi_fails() {
    let tmp_dir = TempDir::new().unwrap();
    let output = collect(tmp_dir.path());

    let cmd = rfi_tracker()
        .args([
            "summarize",
            "-i",
            &format!("{}", output.display()),
            "-n",
            "4",
            "-c",
            "8",
            "-t",
            "4",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error:"), "{stderr}");
    assert!(stderr.contains("ended early"), "{stderr}");
}

#[test]
fn test_summarise_sidecar_from_relative_output() {
    let tmp_dir = TempDir::new().unwrap();
    let work_dir = tmp_dir.path().join("work");
    std::fs::create_dir(&work_dir).unwrap();
    make_detections(&work_dir);

    let cmd = rfi_tracker()
        .current_dir(&work_dir)
        .args([
            "collect",
            "-d",
            "detections.txt",
            "-o",
            "relative.rfi",
            "-c",
            "8",
            "-t",
            "4",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", cmd.err());

    // Run summarise from somewhere else.
    let cmd = rfi_tracker()
        .current_dir(tmp_dir.path())
        .args(["summarise", "work/relative.rfi.toml"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", cmd.err());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("3 RFI"), "{stdout}");
}
