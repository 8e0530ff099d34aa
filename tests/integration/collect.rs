// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use crate::*;
use rfi_tracker::{read_rfi_file, GridShape, Rfi};

#[test]
fn test_collect_writes_rfi() {
    let tmp_dir = TempDir::new().unwrap();
    let detections = make_detections(tmp_dir.path());
    let output = tmp_dir.path().join("out.rfi");

    let cmd = rfi_tracker()
        .args([
            "collect",
            "-d",
            &format!("{}", detections.display()),
            "-o",
            &format!("{}", output.display()),
            "--num-chan",
            "8",
            "--num-int",
            "4",
            "--sort",
        ])
        .ok();
    assert!(cmd.is_ok(), "collect failed on simple test data: {:?}", cmd.err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");

    let grid = GridShape {
        num_chan: 8,
        num_int: 4,
    };
    let len = std::fs::metadata(&output).unwrap().len() as usize;
    assert_eq!(len, 3 * Rfi::num_bytes(grid));

    let rfis = read_rfi_file(&output, grid, 3).unwrap();
    let freqs: Vec<f32> = rfis.iter().map(|rfi| rfi.freq_avg).collect();
    assert!(freqs.windows(2).all(|w| w[0] <= w[1]), "{freqs:?}");
    assert_eq!(rfis[1].numobs, 3);
    assert_eq!(rfis[1].chans().iter_ones().collect::<Vec<_>>(), [0, 1, 2]);
    assert_eq!(rfis[1].times().iter_ones().collect::<Vec<_>>(), [0, 1]);

    assert!(tmp_dir.path().join("out.rfi.toml").exists());
}

#[test]
fn test_collect_without_grid_fails() {
    let tmp_dir = TempDir::new().unwrap();
    let detections = make_detections(tmp_dir.path());
    let output = tmp_dir.path().join("out.rfi");

    let cmd = rfi_tracker()
        .args([
            "collect",
            "-d",
            &format!("{}", detections.display()),
            "-o",
            &format!("{}", output.display()),
            "--num-int",
            "4",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error:"), "{stderr}");
    assert!(stderr.contains("--num-chan"), "{stderr}");
    assert!(!output.exists());
}

#[test]
fn test_collect_save_toml_then_rerun() {
    let tmp_dir = TempDir::new().unwrap();
    let detections = make_detections(tmp_dir.path());
    let output = tmp_dir.path().join("out.rfi");
    let args_toml = tmp_dir.path().join("collect_args.toml");

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
            "--dry-run",
            "--save-toml",
            &format!("{}", args_toml.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", cmd.err());
    assert!(args_toml.exists());
    assert!(!output.exists());

    // The saved arguments reproduce the run.
    let cmd = rfi_tracker()
        .args(["collect", &format!("{}", args_toml.display())])
        .ok();
    assert!(cmd.is_ok(), "{:?}", cmd.err());
    assert!(output.exists());
}
