use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("mental-load-{nanos}-{file_name}"))
}

fn write_store(path: &Path, tasks: serde_json::Value, counter: &str) {
    let content = serde_json::json!({
        "schema_version": 1,
        "entries": {
            "tasks": serde_json::to_string(&tasks).unwrap(),
            "taskIdCounter": counter
        }
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn run(store_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mental_load"))
        .args(args)
        .env("MENTAL_LOAD_STORE_PATH", store_path)
        .env("MENTAL_LOAD_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run mental_load")
}

fn one_task() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 5,
            "name": "Pick up kids",
            "category": "Children",
            "priority": 2,
            "scheduledDate": "2024-05-01",
            "repeatRule": "daily",
            "reminder": ["evening"],
            "completed": false
        }
    ])
}

#[test]
fn toggle_command_flips_completion_back_and_forth() {
    let store_path = temp_path("cli-toggle.json");
    write_store(&store_path, one_task(), "6");

    let first = run(&store_path, &["toggle", "5"]);
    let second = run(&store_path, &["toggle", "5", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(first.status.success());
    assert_eq!(
        String::from_utf8_lossy(&first.stdout).trim(),
        "Marked task completed: Pick up kids (#5)"
    );

    let task: serde_json::Value = serde_json::from_slice(&second.stdout).unwrap();
    assert_eq!(task["completed"], false);
    assert_eq!(task["repeatRule"], "daily");
}

#[test]
fn toggle_command_reports_missing_task() {
    let store_path = temp_path("cli-toggle-missing.json");
    write_store(&store_path, one_task(), "6");

    let output = run(&store_path, &["toggle", "1"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: not_found - task 1 not found"));
}

#[test]
fn show_command_prints_details() {
    let store_path = temp_path("cli-show.json");
    write_store(&store_path, one_task(), "6");

    let output = run(&store_path, &["show", "5"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("#5 [ ] Pick up kids"));
    assert!(stdout.contains("category: Children"));
    assert!(stdout.contains("priority: important"));
    assert!(stdout.contains("repeat:   daily"));
    assert!(stdout.contains("reminder: evening"));
}

#[test]
fn clear_command_requires_confirmation() {
    let store_path = temp_path("cli-clear-confirm.json");
    write_store(&store_path, one_task(), "6");

    let output = run(&store_path, &["clear"]);
    let still_there = run(&store_path, &["show", "5"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("pass --yes to confirm"));
    assert!(still_there.status.success());
}

#[test]
fn clear_command_removes_tasks_but_keeps_counter() {
    let store_path = temp_path("cli-clear.json");
    write_store(&store_path, one_task(), "6");

    let cleared = run(&store_path, &["clear", "--yes"]);
    let listed = run(&store_path, &["list"]);
    let added = run(
        &store_path,
        &["add", "Gym", "-c", "Exercise", "-d", "2024-05-04", "--json"],
    );

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(cleared.status.success());
    assert_eq!(String::from_utf8_lossy(&cleared.stdout).trim(), "Removed 1 task(s)");
    assert_eq!(String::from_utf8_lossy(&listed.stdout).trim(), "No tasks.");

    let task: serde_json::Value = serde_json::from_slice(&added.stdout).unwrap();
    assert_eq!(task["id"], 6);
    assert_eq!(stored["entries"]["taskIdCounter"], "7");
}
