use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{self, HandlerErr};
use crate::ipc::types::{AppState, Request, Session};
use crate::model;
use crate::project;

fn dashboard_stats(session: &Session) -> Result<serde_json::Value, HandlerErr> {
    let store = &session.store;
    let stats = project::dashboard_stats(
        &store.students,
        &store.staff,
        &store.attendance,
        &store.fees,
        &model::today(),
    );
    serde_json::to_value(stats).map_err(|e| HandlerErr::new("encode_failed", e.to_string()))
}

fn activity_recent(session: &Session) -> Result<serde_json::Value, HandlerErr> {
    let entries = serde_json::to_value(session.store.activities.recent())
        .map_err(|e| HandlerErr::new("encode_failed", e.to_string()))?;
    Ok(json!({ "activities": entries }))
}

fn handle(
    state: &mut AppState,
    req: &Request,
    f: impl FnOnce(&Session) -> Result<serde_json::Value, HandlerErr>,
) -> serde_json::Value {
    let session = match helpers::session(state) {
        Ok(s) => s,
        Err(e) => return e.response(&req.id),
    };
    match f(session) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.stats" => Some(handle(state, req, dashboard_stats)),
        "activity.recent" => Some(handle(state, req, activity_recent)),
        _ => None,
    }
}
