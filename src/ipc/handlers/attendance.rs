use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{self, date_or_today, require_confirmed, required_str, HandlerErr};
use crate::ipc::types::{AppState, Request, Session};
use crate::model::{self, AttendanceRecord, AttendanceStatus};
use crate::project;

/// Bulk marking: one default-present record per student lacking one for the
/// date. Set-level idempotent; re-invoking for the same date creates
/// nothing new and never touches manually edited records.
fn attendance_mark(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    if session.store.students.is_empty() {
        return Err(HandlerErr::new(
            "no_students",
            "No students found. Please add students first.",
        ));
    }
    let date = date_or_today(params);

    let new_records: Vec<AttendanceRecord> = session
        .store
        .students
        .iter()
        .filter(|s| !session.store.has_attendance_for(&s.id, &date))
        .map(|s| AttendanceRecord {
            id: model::new_record_id(),
            student_id: s.id.clone(),
            student_name: s.name.clone(),
            student_class: s.class_name.clone(),
            date: date.clone(),
            status: AttendanceStatus::Present,
            remarks: String::new(),
            marked_by: model::OPERATOR.to_string(),
            marked_at: model::now_timestamp(),
        })
        .collect();

    let created = new_records.len();
    let skipped = session.store.students.len() - created;
    session.store.attendance.extend(new_records);

    // One aggregate entry per marking action, not one per student.
    session
        .store
        .activities
        .record("Marked attendance for all students");
    helpers::persist(session)?;

    Ok(json!({ "date": date, "created": created, "skipped": skipped }))
}

fn attendance_list(
    session: &Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = date_or_today(params);
    let class = params.get("class").and_then(|v| v.as_str());
    let filtered = project::filter_attendance(&session.store.attendance, &date, class);

    let rows: Vec<serde_json::Value> = filtered
        .iter()
        .map(|rec| {
            // Roll is looked up live; a deleted student degrades to a
            // placeholder rather than failing.
            let roll = session
                .store
                .student(&rec.student_id)
                .map(|s| s.roll.clone())
                .unwrap_or_else(|| "N/A".to_string());
            json!({
                "id": rec.id,
                "roll": roll,
                "studentId": rec.student_id,
                "studentName": rec.student_name,
                "studentClass": rec.student_class,
                "date": rec.date,
                "status": rec.status.as_str(),
                "remarks": rec.remarks,
                "markedBy": rec.marked_by,
                "markedAt": rec.marked_at,
            })
        })
        .collect();

    Ok(json!({ "date": date, "rows": rows }))
}

fn attendance_set_status(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let id = required_str(params, "id")?;
    let status_raw = required_str(params, "status")?;
    let Some(status) = AttendanceStatus::parse(&status_raw) else {
        return Err(HandlerErr::new(
            "bad_params",
            "status must be one of present, absent, late, excused",
        ));
    };

    let Some(record) = session.store.attendance_mut(&id) else {
        return Err(HandlerErr::new("not_found", "attendance record not found"));
    };
    record.status = status;

    session
        .store
        .activities
        .record(&format!("Updated attendance status to {}", status.as_str()));
    helpers::persist(session)?;
    Ok(json!({ "ok": true }))
}

fn attendance_set_remarks(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let id = required_str(params, "id")?;
    let remarks = params
        .get("remarks")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::new("bad_params", "missing remarks"))?
        .to_string();

    let Some(record) = session.store.attendance_mut(&id) else {
        return Err(HandlerErr::new("not_found", "attendance record not found"));
    };
    record.remarks = remarks;
    helpers::persist(session)?;
    Ok(json!({ "ok": true }))
}

fn attendance_summary(
    session: &Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = date_or_today(params);
    let summary = project::attendance_summary(&session.store.attendance, &date);
    serde_json::to_value(summary)
        .map_err(|e| HandlerErr::new("encode_failed", e.to_string()))
        .map(|mut v| {
            v["date"] = json!(date);
            v
        })
}

fn attendance_delete(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let id = required_str(params, "id")?;
    require_confirmed(params)?;

    let Some(removed) = session.store.remove_attendance(&id) else {
        return Err(HandlerErr::new("not_found", "attendance record not found"));
    };
    session.store.activities.record(&format!(
        "Deleted attendance record: {}",
        removed.student_name
    ));
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
        "attendance.mark" => Some(handle(state, req, attendance_mark)),
        "attendance.list" => Some(handle(state, req, |s, p| attendance_list(s, p))),
        "attendance.setStatus" => Some(handle(state, req, attendance_set_status)),
        "attendance.setRemarks" => Some(handle(state, req, attendance_set_remarks)),
        "attendance.summary" => Some(handle(state, req, |s, p| attendance_summary(s, p))),
        "attendance.delete" => Some(handle(state, req, attendance_delete)),
        _ => None,
    }
}
