use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{self, optional_str, require_confirmed, required_str, HandlerErr};
use crate::ipc::types::{AppState, Request, Session};
use crate::model::{self, RecordStatus, Student};
use crate::project;

/// One greater than the highest numeric roll, or 1001 when none parse.
/// A display suggestion only; duplicates are not prevented.
fn next_roll(students: &[Student]) -> i64 {
    students
        .iter()
        .filter_map(|s| s.roll.trim().parse::<i64>().ok())
        .max()
        .map(|m| m + 1)
        .unwrap_or(1001)
}

fn students_list(session: &Session, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let search = params.get("search").and_then(|v| v.as_str());
    let rows = project::filter_students(&session.store.students, search);
    let students = serde_json::to_value(&rows)
        .map_err(|e| HandlerErr::new("encode_failed", e.to_string()))?;
    Ok(json!({ "students": students }))
}

fn students_create(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = required_str(params, "name")?;
    let roll = required_str(params, "roll")?;
    let class_name = required_str(params, "class")?;

    let student = Student {
        id: model::new_record_id(),
        roll,
        name,
        class_name,
        dob: optional_str(params, "dob"),
        contact: optional_str(params, "contact"),
        email: optional_str(params, "email"),
        address: optional_str(params, "address"),
        status: RecordStatus::Active,
        date_added: model::now_timestamp(),
    };

    session.store.students.push(student.clone());
    session
        .store
        .activities
        .record(&format!("Added student: {}", student.name));
    helpers::persist(session)?;

    let student = serde_json::to_value(&student)
        .map_err(|e| HandlerErr::new("encode_failed", e.to_string()))?;
    Ok(json!({ "student": student }))
}

fn students_update(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let id = required_str(params, "id")?;
    let name = required_str(params, "name")?;
    let roll = required_str(params, "roll")?;
    let class_name = required_str(params, "class")?;

    // Full-record replace of the form fields; id, status and dateAdded
    // survive the edit.
    let Some(student) = session.store.student_mut(&id) else {
        return Err(HandlerErr::new("not_found", "student not found"));
    };
    student.name = name;
    student.roll = roll;
    student.class_name = class_name;
    student.dob = optional_str(params, "dob");
    student.contact = optional_str(params, "contact");
    student.email = optional_str(params, "email");
    student.address = optional_str(params, "address");
    let updated_name = student.name.clone();

    session
        .store
        .activities
        .record(&format!("Updated student: {}", updated_name));
    helpers::persist(session)?;
    Ok(json!({ "ok": true }))
}

fn students_delete(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let id = required_str(params, "id")?;
    require_confirmed(params)?;

    let Some(removed) = session.store.remove_student(&id) else {
        return Err(HandlerErr::new("not_found", "student not found"));
    };
    session
        .store
        .activities
        .record(&format!("Deleted student: {}", removed.name));
    helpers::persist(session)?;
    Ok(json!({ "ok": true }))
}

fn handle(
    state: &mut AppState,
    req: &Request,
    f: impl FnOnce(&mut Session, &serde_json::Value) -> Result<serde_json::Value, HandlerErr>,
) -> serde_json::Value {
    let session = match helpers::session(state) {
        Ok(s) => s,
        Err(e) => return e.response(&req.id),
    };
    match f(session, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle(state, req, |s, p| students_list(s, p))),
        "students.nextRoll" => Some(match helpers::session(state) {
            Ok(session) => ok(
                &req.id,
                json!({ "nextRoll": next_roll(&session.store.students) }),
            ),
            Err(e) => e.response(&req.id),
        }),
        "students.create" => Some(handle(state, req, students_create)),
        "students.update" => Some(handle(state, req, students_update)),
        "students.delete" => Some(handle(state, req, students_delete)),
        _ => None,
    }
}
