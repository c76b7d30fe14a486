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
        .expect("failed to run list command")
}

fn household() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1,
            "name": "Walk dog",
            "category": "Pets",
            "priority": 1,
            "scheduledDate": "2024-05-01",
            "repeatRule": "daily",
            "reminder": ["morning"],
            "completed": true
        },
        {
            "id": 2,
            "taskName": "Vacuum",
            "categoryName": "Rengøring",
            "priority": "Vigtig",
            "chooseDate": "2024-05-02",
            "repeatTask": "",
            "remind": "morgen,aften",
            "isChecked": false
        },
        {
            "id": 3,
            "name": "Vet visit",
            "category": "Pets",
            "priority": 3,
            "scheduledDate": "2024-05-02",
            "completed": false
        }
    ])
}

#[test]
fn list_json_groups_by_category_in_display_order() {
    let store_path = temp_path("cli-list-json.json");
    write_store(&store_path, household(), "4");

    let output = run(&store_path, &["list", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let overview: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(overview["total"], 3);
    assert_eq!(overview["completed"], 1);

    let groups = overview["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["category"], "Cleaning");
    assert_eq!(groups[1]["category"], "Pets");

    let vacuum = &groups[0]["tasks"][0];
    assert_eq!(vacuum["name"], "Vacuum");
    assert_eq!(vacuum["priority"], 2);
    assert_eq!(vacuum["scheduledDate"], "2024-05-02");
    assert_eq!(vacuum["repeatRule"], "never");
    assert_eq!(vacuum["reminder"], serde_json::json!(["morning", "evening"]));

    let pets: Vec<&str> = groups[1]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["name"].as_str().unwrap())
        .collect();
    assert_eq!(pets, vec!["Vet visit", "Walk dog"]);
}

#[test]
fn list_plain_prints_headings_and_summary() {
    let store_path = temp_path("cli-list-plain.json");
    write_store(&store_path, household(), "4");

    let output = run(&store_path, &["list"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    let cleaning = stdout.find("Cleaning (0/1)").unwrap();
    let pets = stdout.find("Pets (1/2)").unwrap();
    assert!(cleaning < pets);
    assert!(stdout.find("Vet visit").unwrap() < stdout.find("Walk dog").unwrap());
    assert!(stdout.contains("[x]"));
    assert!(stdout.contains("1 of 3 tasks completed"));
}

#[test]
fn list_filters_by_category_and_date() {
    let store_path = temp_path("cli-list-filter.json");
    write_store(&store_path, household(), "4");

    let by_category = run(&store_path, &["list", "--category", "kæledyr", "--json"]);
    let by_date = run(&store_path, &["list", "--date", "2024-05-02", "--json"]);
    std::fs::remove_file(&store_path).ok();

    let pets: serde_json::Value = serde_json::from_slice(&by_category.stdout).unwrap();
    assert_eq!(pets["total"], 2);
    assert_eq!(pets["groups"].as_array().unwrap().len(), 1);

    let second: serde_json::Value = serde_json::from_slice(&by_date.stdout).unwrap();
    assert_eq!(second["total"], 2);
    assert_eq!(second["groups"][0]["category"], "Cleaning");
    assert_eq!(second["groups"][1]["tasks"][0]["name"], "Vet visit");
}

#[test]
fn list_empty_store_prints_placeholder() {
    let store_path = temp_path("cli-list-empty.json");

    let output = run(&store_path, &["list"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "No tasks.");
    assert!(!store_path.exists());
}

#[test]
fn list_rejects_unknown_category_filter() {
    let store_path = temp_path("cli-list-bad-filter.json");

    let output = run(&store_path, &["list", "--category", "Laundry"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: validation_error"));
}

#[test]
fn list_reports_corrupted_store() {
    let store_path = temp_path("cli-list-corrupt.json");
    let content = serde_json::json!({
        "schema_version": 1,
        "entries": { "tasks": "[{\"id\": 1, \"name\": " }
    });
    std::fs::write(&store_path, content.to_string()).unwrap();

    let output = run(&store_path, &["list"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: invalid_data"));
}

#[test]
fn list_reports_stored_task_without_name() {
    let store_path = temp_path("cli-list-blank-name.json");
    write_store(
        &store_path,
        serde_json::json!([
            {"id": 1, "name": " ", "category": "Pets", "scheduledDate": "2024-05-01"}
        ]),
        "2",
    );

    let output = run(&store_path, &["list"]);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("ERROR: invalid_data - task 1 has an empty name")
    );
}
