use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_schooldeskd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn schooldeskd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn list_students(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
) -> Vec<serde_json::Value> {
    request_ok(stdin, reader, id, "students.list", json!({}))
        .get("students")
        .and_then(|v| v.as_array())
        .cloned()
        .expect("students array")
}

#[test]
fn create_persists_and_rehydrates_equal_record() {
    let workspace = temp_dir("schooldesk-students-rehydrate");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        json!({
            "name": "Asha Rao",
            "roll": "1001",
            "class": "10A",
            "contact": "555-0100",
            "email": "asha@example.com"
        }),
    );
    let student = created.get("student").cloned().expect("created student");
    let id = student.get("id").and_then(|v| v.as_str()).expect("id");
    assert!(!id.is_empty());

    // Re-selecting the workspace drops the in-memory store and rehydrates
    // from the medium.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let students = list_students(&mut stdin, &mut reader, "4");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0], student);
}

#[test]
fn next_roll_suggests_1001_then_increments_past_the_max() {
    let workspace = temp_dir("schooldesk-students-nextroll");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let first = request_ok(&mut stdin, &mut reader, "2", "students.nextRoll", json!({}));
    assert_eq!(first.get("nextRoll").and_then(|v| v.as_i64()), Some(1001));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.create",
        json!({ "name": "Asha Rao", "roll": "1001", "class": "10A" }),
    );
    let second = request_ok(&mut stdin, &mut reader, "4", "students.nextRoll", json!({}));
    assert_eq!(second.get("nextRoll").and_then(|v| v.as_i64()), Some(1002));
}

#[test]
fn delete_removes_exactly_one_and_preserves_order() {
    let workspace = temp_dir("schooldesk-students-delete");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let mut ids = Vec::new();
    for (i, name) in ["First", "Second", "Third"].iter().enumerate() {
        let created = request_ok(
            &mut stdin,
            &mut reader,
            &format!("c{i}"),
            "students.create",
            json!({ "name": name, "roll": format!("{}", 1001 + i), "class": "10A" }),
        );
        ids.push(
            created
                .get("student")
                .and_then(|s| s.get("id"))
                .and_then(|v| v.as_str())
                .expect("id")
                .to_string(),
        );
    }

    // Unconfirmed deletion aborts with no side effects.
    let refused = request(
        &mut stdin,
        &mut reader,
        "2",
        "students.delete",
        json!({ "id": ids[1] }),
    );
    assert_eq!(
        refused
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("confirm_required")
    );
    assert_eq!(list_students(&mut stdin, &mut reader, "3").len(), 3);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "students.delete",
        json!({ "id": ids[1], "confirmed": true }),
    );
    let remaining = list_students(&mut stdin, &mut reader, "5");
    let names: Vec<_> = remaining
        .iter()
        .map(|s| s.get("name").and_then(|v| v.as_str()).unwrap_or(""))
        .collect();
    assert_eq!(names, ["First", "Third"]);
}

#[test]
fn update_replaces_form_fields_but_keeps_identity() {
    let workspace = temp_dir("schooldesk-students-update");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        json!({ "name": "Asha Rao", "roll": "1001", "class": "10A", "email": "asha@example.com" }),
    );
    let original = created.get("student").cloned().expect("student");
    let id = original.get("id").and_then(|v| v.as_str()).expect("id");

    // Full replace: email is overwritten even though the caller left it out.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.update",
        json!({ "id": id, "name": "Asha R. Rao", "roll": "1001", "class": "10B" }),
    );
    let students = list_students(&mut stdin, &mut reader, "4");
    assert_eq!(students.len(), 1);
    let updated = &students[0];
    assert_eq!(updated.get("id"), original.get("id"));
    assert_eq!(updated.get("dateAdded"), original.get("dateAdded"));
    assert_eq!(updated.get("status").and_then(|v| v.as_str()), Some("active"));
    assert_eq!(updated.get("name").and_then(|v| v.as_str()), Some("Asha R. Rao"));
    assert_eq!(updated.get("class").and_then(|v| v.as_str()), Some("10B"));
    assert_eq!(updated.get("email").and_then(|v| v.as_str()), Some(""));
}

#[test]
fn validation_failure_leaves_store_unchanged() {
    let workspace = temp_dir("schooldesk-students-validation");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let rejected = request(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        json!({ "name": "No Class", "roll": "1001" }),
    );
    assert_eq!(
        rejected
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("bad_params")
    );
    assert!(list_students(&mut stdin, &mut reader, "3").is_empty());
}
