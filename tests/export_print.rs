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

#[test]
fn student_export_writes_fixed_headers_and_rows() {
    let workspace = temp_dir("schooldesk-export-students");
    let out = workspace.join("students.csv");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = request_ok(
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

    let exported = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "export.csv",
        json!({ "type": "students", "outPath": out.to_string_lossy() }),
    );
    assert_eq!(exported.get("rows").and_then(|v| v.as_u64()), Some(1));

    let csv = std::fs::read_to_string(&out).expect("read exported csv");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Roll No,Name,Class,Contact,Email,Status"));
    assert_eq!(
        lines.next(),
        Some("\"1001\",\"Asha Rao\",\"10A\",\"555-0100\",\"asha@example.com\",\"active\"")
    );
}

#[test]
fn unsupported_export_type_errors_and_writes_nothing() {
    let workspace = temp_dir("schooldesk-export-unsupported");
    let out = workspace.join("staff.csv");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let refused = request(
        &mut stdin,
        &mut reader,
        "2",
        "export.csv",
        json!({ "type": "staff", "outPath": out.to_string_lossy() }),
    );
    assert_eq!(
        refused
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("unsupported_type")
    );
    assert!(!out.exists());
}

#[test]
fn print_document_embeds_table_and_fixed_chrome() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "print.document",
        json!({
            "tableHtml": "<table><tr><td>Asha Rao</td></tr></table>",
            "title": "Student Report"
        }),
    );
    let html = result.get("html").and_then(|v| v.as_str()).expect("html");
    assert!(html.contains("<h2>Student Report</h2>"));
    assert!(html.contains("<table><tr><td>Asha Rao</td></tr></table>"));
    assert!(html.contains("Report generated on "));
    assert!(html.contains("All rights reserved"));
}
