//! Full prune workflows: dry run, confirmation, deletion and the cleanup log

use crate::common::fixtures::every_1000_to_100k;
use crate::common::TestRun;
use crate::sp;
use anyhow::Result;
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::time::{Duration, SystemTime};

const EXPECTED_KEPT: [u64; 19] = [
    0, 5000, 10000, 15000, 20000, 25000, 30000, 33000, 43000, 53000, 63000, 73000, 83000, 90000,
    92000, 94000, 96000, 98000, 100000,
];

#[test]
fn test_dry_run_never_deletes() -> Result<()> {
    let fixture = TestRun::new()?;
    let run_dir = fixture.run_dir("run-a", every_1000_to_100k())?;
    let dir = run_dir.to_str().unwrap();

    let result = sp!(
        fixture.root(),
        "--model_dir",
        dir,
        "--early_interval",
        "5000",
        "--middle_interval",
        "10000",
        "--last_interval",
        "2000",
        "--middle_start_percent",
        "33",
        "--last_start_percent",
        "90",
        "--dry_run"
    )
    .assert_success()?;

    assert!(result.contains_stdout("Found latest checkpoint: model_step_100000.pt (step: 100000)"));
    assert!(result.contains_stdout("Found 101 model checkpoint files."));
    assert!(result.contains_stdout("Planning to keep 19 files, delete 82 files."));
    assert!(result.contains_stdout("Dry run complete - no files were deleted."));
    assert!(result.deleted_names().is_empty());

    assert_eq!(TestRun::steps_in(&run_dir)?, every_1000_to_100k());

    let log = result.log_path().expect("log path printed");
    let contents = fs::read_to_string(&log)?;
    assert!(contents.contains("Total files: 101\n"));
    assert!(contents.contains("Files kept: 19\n"));
    assert!(contents.contains("Files deleted: 82\n"));
    assert!(contents.contains("\nKept files:\n  model_step_0.pt\n  model_step_5000.pt\n"));
    assert!(contents.contains("\nDeleted files:\n  model_step_1000.pt\n"));
    assert!(!contents.contains("Actual deletions"));

    Ok(())
}

#[test]
fn test_confirmed_deletion() -> Result<()> {
    let fixture = TestRun::new()?;
    let run_dir = fixture.run_dir("run-a", every_1000_to_100k())?;

    let result = sp!(fixture.root(), "--model_dir", run_dir.to_str().unwrap())
        .stdin("yes\n")
        .assert_success()?;

    assert!(result.contains_stdout("Continue with deletion? (yes/no):"));
    assert!(result.contains_stdout("Deletion complete. Deleted 82 files, 0 errors."));
    assert_eq!(result.deleted_names().len(), 82);
    assert_eq!(result.deleted_names()[0], "model_step_1000.pt");

    assert_eq!(TestRun::steps_in(&run_dir)?, EXPECTED_KEPT.to_vec());

    let logs = TestRun::logs_in(&run_dir)?;
    assert_eq!(logs.len(), 1);
    let contents = fs::read_to_string(&logs[0])?;
    assert!(contents.contains("\nActual deletions: 82 files\nDeletion errors: 0 files\nCompletion time: "));

    Ok(())
}

#[test]
fn test_declined_confirmation() -> Result<()> {
    let fixture = TestRun::new()?;
    let run_dir = fixture.run_dir("run-a", every_1000_to_100k())?;

    let result = sp!(fixture.root(), "--model_dir", run_dir.to_str().unwrap())
        .stdin("no\n")
        .assert_success()?;

    assert!(result.contains_stdout("Deletion cancelled."));
    assert!(!result.contains_stdout("Deletion complete"));
    assert_eq!(TestRun::steps_in(&run_dir)?.len(), 101);

    // The plan is still on record
    assert_eq!(TestRun::logs_in(&run_dir)?.len(), 1);

    Ok(())
}

#[test]
fn test_closed_stdin_declines() -> Result<()> {
    let fixture = TestRun::new()?;
    let run_dir = fixture.run_dir("run-a", every_1000_to_100k())?;

    let result = sp!(fixture.root(), "--model_dir", run_dir.to_str().unwrap()).assert_success()?;

    assert!(result.contains_stdout("Deletion cancelled."));
    assert_eq!(TestRun::steps_in(&run_dir)?.len(), 101);

    Ok(())
}

#[test]
fn test_no_confirm_deletes_without_prompt() -> Result<()> {
    let fixture = TestRun::new()?;
    let run_dir = fixture.run_dir("run-a", every_1000_to_100k())?;

    let result = sp!(fixture.root(), "--model_dir", run_dir.to_str().unwrap(), "--no_confirm")
        .assert_success()?;

    assert!(!result.contains_stdout("Continue with deletion?"));
    assert!(result.contains_stdout("Deleted 82 files, 0 errors."));
    assert_eq!(TestRun::steps_in(&run_dir)?, EXPECTED_KEPT.to_vec());

    Ok(())
}

#[test]
fn test_percent_and_step_boundaries_agree() -> Result<()> {
    let fixture = TestRun::new()?;
    let by_percent = fixture.run_dir("by-percent", every_1000_to_100k())?;
    let by_steps = fixture.run_dir("by-steps", every_1000_to_100k())?;

    sp!(
        fixture.root(),
        "--model_dir",
        by_percent.to_str().unwrap(),
        "--middle_start_percent",
        "33",
        "--last_start_percent",
        "90",
        "--no_confirm"
    )
    .assert_success()?;

    sp!(
        fixture.root(),
        "--model_dir",
        by_steps.to_str().unwrap(),
        "--middle_start_steps",
        "33000",
        "--last_start_steps",
        "90000",
        "--no_confirm"
    )
    .assert_success()?;

    assert_eq!(TestRun::steps_in(&by_percent)?, TestRun::steps_in(&by_steps)?);

    Ok(())
}

#[test]
fn test_keep_all_last_phase() -> Result<()> {
    let fixture = TestRun::new()?;
    let run_dir = fixture.run_dir("run-a", every_1000_to_100k())?;

    sp!(
        fixture.root(),
        "--model_dir",
        run_dir.to_str().unwrap(),
        "--keep_all_last",
        "--no_confirm"
    )
    .assert_success()?;

    let remaining = TestRun::steps_in(&run_dir)?;
    for step in (90..=100).map(|i| i * 1000) {
        assert!(remaining.contains(&step), "step {} should survive", step);
    }
    assert!(!remaining.contains(&89000));

    Ok(())
}

#[test]
fn test_auto_selects_newest_run() -> Result<()> {
    let fixture = TestRun::new()?;
    let old_run = fixture.run_dir("run-old", every_1000_to_100k())?;
    let new_run = fixture.run_dir("run-new", [0, 1000, 2000])?;

    let an_hour_ago = SystemTime::now() - Duration::from_secs(3600);
    set_file_mtime(&old_run, FileTime::from_system_time(an_hour_ago))?;

    let result = sp!(fixture.root(), "--dry_run").assert_success()?;

    assert!(result.contains_stdout("Auto-selected newest checkpoint directory: "));
    assert!(result.contains_stdout("run-new"));
    assert!(result.contains_stdout("Found 3 model checkpoint files."));
    assert_eq!(TestRun::logs_in(&new_run)?.len(), 1);
    assert!(TestRun::logs_in(&old_run)?.is_empty());

    Ok(())
}
