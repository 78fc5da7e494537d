use serde_json::json;
use std::path::PathBuf;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request, Session};
use crate::kv;
use crate::store::{Store, KEY_LAST_SAVE};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state
                .session
                .as_ref()
                .map(|s| s.workspace.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    let conn = match kv::open_medium(&path) {
        Ok(c) => c,
        Err(e) => return err(&req.id, "workspace_open_failed", format!("{e:?}"), None),
    };
    // Missing or corrupt keys hydrate as empty collections; only medium
    // failures land here.
    let store = match Store::load(&conn) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "workspace_open_failed", format!("{e:?}"), None),
    };

    state.session = Some(Session {
        workspace: path.clone(),
        conn,
        store,
    });
    ok(&req.id, json!({ "workspacePath": path.to_string_lossy() }))
}

fn handle_system_info(state: &mut AppState, req: &Request) -> serde_json::Value {
    let session = match helpers::session(state) {
        Ok(s) => s,
        Err(e) => return e.response(&req.id),
    };
    let data_size = match kv::total_value_bytes(&session.conn) {
        Ok(n) => n,
        Err(e) => return err(&req.id, "medium_query_failed", format!("{e:?}"), None),
    };
    let last_saved = match kv::get(&session.conn, KEY_LAST_SAVE) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "medium_query_failed", format!("{e:?}"), None),
    };
    ok(
        &req.id,
        json!({
            "dataSizeBytes": data_size,
            "lastSaved": last_saved,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "system.info" => Some(handle_system_info(state, req)),
        _ => None,
    }
}
