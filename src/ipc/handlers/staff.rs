use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{self, optional_str, require_confirmed, required_str, HandlerErr};
use crate::ipc::types::{AppState, Request, Session};
use crate::model::{self, RecordStatus, StaffMember};
use crate::project;

fn staff_list(session: &Session, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let search = params.get("search").and_then(|v| v.as_str());
    let rows = project::filter_staff(&session.store.staff, search);
    let staff = serde_json::to_value(&rows)
        .map_err(|e| HandlerErr::new("encode_failed", e.to_string()))?;
    Ok(json!({ "staff": staff }))
}

fn staff_create(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = required_str(params, "name")?;
    let designation = required_str(params, "designation")?;

    let member = StaffMember {
        id: model::new_record_id(),
        name,
        designation,
        subject: optional_str(params, "subject"),
        contact: optional_str(params, "contact"),
        email: optional_str(params, "email"),
        join_date: optional_str(params, "joinDate"),
        status: RecordStatus::Active,
        date_added: model::now_timestamp(),
    };

    session.store.staff.push(member.clone());
    session
        .store
        .activities
        .record(&format!("Added staff: {}", member.name));
    helpers::persist(session)?;

    let member = serde_json::to_value(&member)
        .map_err(|e| HandlerErr::new("encode_failed", e.to_string()))?;
    Ok(json!({ "staffMember": member }))
}

fn staff_update(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let id = required_str(params, "id")?;
    let name = required_str(params, "name")?;
    let designation = required_str(params, "designation")?;

    let Some(member) = session.store.staff_member_mut(&id) else {
        return Err(HandlerErr::new("not_found", "staff member not found"));
    };
    member.name = name;
    member.designation = designation;
    member.subject = optional_str(params, "subject");
    member.contact = optional_str(params, "contact");
    member.email = optional_str(params, "email");
    member.join_date = optional_str(params, "joinDate");
    let updated_name = member.name.clone();

    session
        .store
        .activities
        .record(&format!("Updated staff: {}", updated_name));
    helpers::persist(session)?;
    Ok(json!({ "ok": true }))
}

fn staff_delete(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let id = required_str(params, "id")?;
    require_confirmed(params)?;

    let Some(removed) = session.store.remove_staff_member(&id) else {
        return Err(HandlerErr::new("not_found", "staff member not found"));
    };
    session
        .store
        .activities
        .record(&format!("Deleted staff: {}", removed.name));
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
        "staff.list" => Some(handle(state, req, |s, p| staff_list(s, p))),
        "staff.create" => Some(handle(state, req, staff_create)),
        "staff.update" => Some(handle(state, req, staff_update)),
        "staff.delete" => Some(handle(state, req, staff_delete)),
        _ => None,
    }
}
