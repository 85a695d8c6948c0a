use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn horizons_cmd(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_horizons"));
    cmd.env("HORIZONS_DATA_DIR", data_dir);
    cmd
}

fn parse_data(stdout: &[u8]) -> serde_json::Value {
    let parsed: serde_json::Value = serde_json::from_slice(stdout).unwrap();
    assert_eq!(parsed["success"], true);
    parsed["data"].clone()
}

#[test]
fn test_task_add_and_list() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["task", "add", "Buy milk", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let task = parse_data(&output.stdout);
    assert!(!task["id"].as_str().unwrap().is_empty());
    assert_eq!(task["completed"], false);
    assert_eq!(task["listId"], "inbox");
    assert_eq!(task["createdAt"], task["updatedAt"]);

    let output = horizons_cmd(tmp.path())
        .args(["task", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tasks = parse_data(&output.stdout);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Buy milk");
}

#[test]
fn test_tasks_persist_across_invocations() {
    let tmp = TempDir::new().unwrap();

    for title in ["first", "second"] {
        let output = horizons_cmd(tmp.path())
            .args(["task", "add", title])
            .output()
            .unwrap();
        assert!(output.status.success());
    }

    let output = horizons_cmd(tmp.path())
        .args(["task", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("first"));
    assert!(stdout.contains("second"));
}

#[test]
fn test_task_done_toggles_completion() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["task", "add", "Water plants", "--json"])
        .output()
        .unwrap();
    let id = parse_data(&output.stdout)["id"].as_str().unwrap().to_string();

    let output = horizons_cmd(tmp.path())
        .args(["task", "done", &id, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(parse_data(&output.stdout)["completed"], true);

    // Completed tasks are hidden from the default listing.
    let output = horizons_cmd(tmp.path())
        .args(["task", "list"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No tasks found"));

    let output = horizons_cmd(tmp.path())
        .args(["task", "list", "--all"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Water plants"));
}

#[test]
fn test_task_done_accepts_id_prefix() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["task", "add", "Prefixed", "--json"])
        .output()
        .unwrap();
    let id = parse_data(&output.stdout)["id"].as_str().unwrap().to_string();

    let output = horizons_cmd(tmp.path())
        .args(["task", "done", &id[..8], "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(parse_data(&output.stdout)["id"], id.as_str());
}

#[test]
fn test_task_rm_requires_force_when_non_interactive() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["task", "add", "Keep me", "--json"])
        .output()
        .unwrap();
    let id = parse_data(&output.stdout)["id"].as_str().unwrap().to_string();

    let output = horizons_cmd(tmp.path())
        .args(["task", "rm", &id])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--force"));

    let output = horizons_cmd(tmp.path())
        .args(["task", "rm", &id, "--force"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = horizons_cmd(tmp.path())
        .args(["task", "list"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No tasks found"));
}

#[test]
fn test_mutating_missing_id_fails() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["task", "done", "nonexistent"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Entity not found"));

    let output = horizons_cmd(tmp.path())
        .args(["task", "rm", "nonexistent", "--force"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Entity not found"));
}

#[test]
fn test_list_rm_moves_tasks_to_inbox() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["list", "add", "Errands", "--json"])
        .output()
        .unwrap();
    let list_id = parse_data(&output.stdout)["id"].as_str().unwrap().to_string();

    for title in ["Buy milk", "Buy stamps"] {
        let output = horizons_cmd(tmp.path())
            .args(["task", "add", title, "--list", &list_id])
            .output()
            .unwrap();
        assert!(output.status.success());
    }

    let output = horizons_cmd(tmp.path())
        .args(["list", "rm", &list_id, "--force"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = horizons_cmd(tmp.path())
        .args(["task", "list", "--json"])
        .output()
        .unwrap();
    let tasks = parse_data(&output.stdout);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    for task in tasks {
        assert_eq!(task["listId"], "inbox");
    }
}

#[test]
fn test_goal_rm_cascades_to_targets_and_plans() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["goal", "add", "Run a marathon", "--json"])
        .output()
        .unwrap();
    let goal_id = parse_data(&output.stdout)["id"].as_str().unwrap().to_string();

    let output = horizons_cmd(tmp.path())
        .args(["target", "add", "Run a 10k", "--goal", &goal_id, "--json"])
        .output()
        .unwrap();
    let target_id = parse_data(&output.stdout)["id"].as_str().unwrap().to_string();

    let output = horizons_cmd(tmp.path())
        .args(["plan", "add", "Three runs", "--target", &target_id])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = horizons_cmd(tmp.path())
        .args(["goal", "rm", &goal_id, "--force"])
        .output()
        .unwrap();
    assert!(output.status.success());

    for noun in ["goal", "target", "plan"] {
        let output = horizons_cmd(tmp.path())
            .args([noun, "list", "--json"])
            .output()
            .unwrap();
        let items = parse_data(&output.stdout);
        assert!(items.as_array().unwrap().is_empty(), "{} not cascaded", noun);
    }
}

#[test]
fn test_target_rm_cascades_to_plans_only() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["goal", "add", "Ship the app", "--json"])
        .output()
        .unwrap();
    let goal_id = parse_data(&output.stdout)["id"].as_str().unwrap().to_string();

    let output = horizons_cmd(tmp.path())
        .args(["target", "add", "Beta release", "--goal", &goal_id, "--json"])
        .output()
        .unwrap();
    let target_id = parse_data(&output.stdout)["id"].as_str().unwrap().to_string();

    let output = horizons_cmd(tmp.path())
        .args(["plan", "add", "Fix crashes", "--target", &target_id])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = horizons_cmd(tmp.path())
        .args(["target", "rm", &target_id, "--force"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = horizons_cmd(tmp.path())
        .args(["plan", "list", "--json"])
        .output()
        .unwrap();
    assert!(parse_data(&output.stdout).as_array().unwrap().is_empty());

    // The parent goal is untouched.
    let output = horizons_cmd(tmp.path())
        .args(["goal", "list", "--json"])
        .output()
        .unwrap();
    assert_eq!(parse_data(&output.stdout).as_array().unwrap().len(), 1);
}

#[test]
fn test_goal_update_status() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["goal", "add", "Learn piano", "--json"])
        .output()
        .unwrap();
    let goal = parse_data(&output.stdout);
    assert_eq!(goal["status"], "active");
    let goal_id = goal["id"].as_str().unwrap().to_string();

    let output = horizons_cmd(tmp.path())
        .args(["goal", "update", &goal_id, "--status", "achieved", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(parse_data(&output.stdout)["status"], "achieved");
}

#[test]
fn test_note_set_and_show() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["note", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Notepad is empty"));

    let output = horizons_cmd(tmp.path())
        .args(["note", "set", "call the dentist"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = horizons_cmd(tmp.path())
        .args(["note", "show"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("call the dentist"));
}

#[test]
fn test_tag_add_and_list() {
    let tmp = TempDir::new().unwrap();

    let output = horizons_cmd(tmp.path())
        .args(["tag", "add", "urgent", "--color", "#ff0000", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let tag = parse_data(&output.stdout);
    assert_eq!(tag["name"], "urgent");
    assert_eq!(tag["color"], "#ff0000");

    let output = horizons_cmd(tmp.path())
        .args(["tag", "list"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("urgent"));
}
