use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE: &str = "\
Date,Folder,Read Status,Email Count
2024-01-05,Inbox,Read,10
2024-01-05,Inbox,Unread,5
2024-01-10,Spam,Unread,3
2023-06-01,Inbox,Read,4
";

/// One month only, so the default selection does not depend on today's date.
const JANUARY_ONLY: &str = "\
Date,Folder,Read Status,Email Count
2024-01-05,Inbox,Read,10
2024-01-10,Spam,Unread,3
";

/// A command isolated from the user's settings and terminal colors.
fn cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("email-status").unwrap();
    cmd.env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .current_dir(home);
    cmd
}

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn report_prints_text_for_selected_month() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "mail.csv", SAMPLE);

    cmd(dir.path())
        .args(["report", "--year", "2024", "--month", "January", "--mode", "text"])
        .arg("--file")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("mail.csv: January 2024"))
        .stdout(predicate::str::contains("Email Status by Folder for January 2024"))
        .stdout(predicate::str::contains("(Read 10, Unread 5)"))
        .stdout(predicate::str::contains("Year-to-Date Totals for 2024"))
        .stdout(predicate::str::contains("83.3%"))
        .stdout(predicate::str::contains("16.7%"))
        .stdout(predicate::str::contains("Cumulative Monthly").not());
}

#[test]
fn report_accepts_month_abbreviation_and_line_chart() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "mail.csv", SAMPLE);

    cmd(dir.path())
        .args(["report", "--year", "2024", "--month", "jan", "--line-chart", "--mode", "text"])
        .arg("--file")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cumulative Monthly Email Totals for 2024"));
}

#[test]
fn report_on_empty_period_prints_notice_only() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "mail.csv", SAMPLE);

    // June is offered (2023 has it) but 2024 has no June rows.
    cmd(dir.path())
        .args(["report", "--year", "2024", "--month", "June", "--mode", "text"])
        .arg("--file")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("No data for June 2024."))
        .stdout(predicate::str::contains("Email Status by Folder").not());
}

#[test]
fn report_rejects_year_not_in_data() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "mail.csv", SAMPLE);

    cmd(dir.path())
        .args(["report", "--year", "2030", "--month", "March", "--mode", "text"])
        .arg("--file")
        .arg(&csv)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid selection"))
        .stderr(predicate::str::contains("2030"));
}

#[test]
fn missing_column_fails_the_load() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(
        &dir,
        "bad.csv",
        "Date,Folder,Read Status\n2024-01-05,Inbox,Read\n",
    );

    cmd(dir.path())
        .args(["report", "--mode", "text"])
        .arg("--file")
        .arg(&csv)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: could not load"))
        .stderr(predicate::str::contains("Email Count"));
}

#[test]
fn missing_default_file_is_reported() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .args(["report", "--mode", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("email_status.csv"));
}

#[test]
fn default_file_is_read_from_working_directory() {
    let dir = TempDir::new().unwrap();
    write_csv(&dir, "email_status.csv", JANUARY_ONLY);

    // Not a terminal, so no subcommand prints the text report.
    cmd(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("email_status.csv: January 2024"))
        .stdout(predicate::str::contains("Year-to-Date Totals for 2024"));
}

#[test]
fn settings_choose_file_and_line_chart() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "configured.csv", JANUARY_ONLY);
    let config = dir.path().join(".config").join("email-status");
    std::fs::create_dir_all(&config).unwrap();
    std::fs::write(
        config.join("settings.json"),
        serde_json::json!({
            "default_file": csv.to_str().unwrap(),
            "show_line_chart": true,
        })
        .to_string(),
    )
    .unwrap();

    cmd(dir.path())
        .args(["report", "--mode", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configured.csv:"))
        .stdout(predicate::str::contains("Cumulative Monthly Email Totals"));
}

#[test]
fn malformed_settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    write_csv(&dir, "email_status.csv", SAMPLE);
    let config = dir.path().join(".config").join("email-status");
    std::fs::create_dir_all(&config).unwrap();
    std::fs::write(config.join("settings.json"), "{ not json").unwrap();

    cmd(dir.path())
        .args(["report", "--mode", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("email_status.csv:"))
        .stderr(predicate::str::contains("ignoring settings file"));
}

#[test]
fn periods_lists_years_and_months() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "mail.csv", SAMPLE);

    cmd(dir.path())
        .arg("periods")
        .arg("--file")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("2024"))
        .stdout(predicate::str::contains("2023"))
        .stdout(predicate::str::contains("June"))
        .stdout(predicate::str::contains("January"));
}

#[test]
fn demo_runs_without_a_file() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .args(["demo", "--mode", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo data:"))
        .stdout(predicate::str::contains("Email Status by Folder for"))
        .stdout(predicate::str::contains("Promotions"));
}
