use serde_json::json;
use std::path::PathBuf;

use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{self, required_str};
use crate::ipc::types::{AppState, Request};

fn handle_backup_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let session = match helpers::session(state) {
        Ok(s) => s,
        Err(e) => return e.response(&req.id),
    };
    let out_path = match required_str(&req.params, "outPath") {
        Ok(p) => PathBuf::from(p),
        Err(e) => return e.response(&req.id),
    };

    // Flush the in-memory snapshot so the bundle carries current state.
    if let Err(e) = helpers::persist(session) {
        return e.response(&req.id);
    }

    match backup::export_workspace_bundle(&session.workspace, &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormat": summary.bundle_format,
                "dbSha256": summary.db_sha256,
                "path": out_path.to_string_lossy(),
            }),
        ),
        Err(e) => err(&req.id, "backup_failed", format!("{e:?}"), None),
    }
}

fn handle_backup_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let in_path = match required_str(&req.params, "inPath") {
        Ok(p) => PathBuf::from(p),
        Err(e) => return e.response(&req.id),
    };
    let workspace = match required_str(&req.params, "workspacePath") {
        Ok(p) => PathBuf::from(p),
        Err(e) => return e.response(&req.id),
    };

    // Restoring over the open workspace would pull the database out from
    // under the live connection; close the session first and let the
    // caller re-select.
    if state
        .session
        .as_ref()
        .map(|s| s.workspace == workspace)
        .unwrap_or(false)
    {
        state.session = None;
    }

    match backup::import_workspace_bundle(&in_path, &workspace) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormatDetected": summary.bundle_format_detected,
                "dbSha256": summary.db_sha256,
                "workspacePath": workspace.to_string_lossy(),
            }),
        ),
        Err(e) => err(&req.id, "restore_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.export" => Some(handle_backup_export(state, req)),
        "backup.import" => Some(handle_backup_import(state, req)),
        _ => None,
    }
}
