use serde_json::json;
use std::path::PathBuf;

use crate::export;
use crate::ipc::error::ok;
use crate::ipc::helpers::{self, required_str, HandlerErr};
use crate::ipc::types::{AppState, Request, Session};

fn export_csv(
    session: &Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let kind = required_str(params, "type")?;
    let out_path = PathBuf::from(required_str(params, "outPath")?);

    let (csv, rows) = match kind.as_str() {
        "students" => (
            export::students_csv(&session.store.students),
            session.store.students.len(),
        ),
        "fees" => (
            export::fees_csv(&session.store.fees),
            session.store.fees.len(),
        ),
        other => {
            return Err(HandlerErr {
                code: "unsupported_type",
                message: format!("export not available for {}", other),
                details: None,
            })
        }
    };

    if let Some(parent) = out_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            return Err(HandlerErr::new("export_failed", e.to_string()));
        }
    }
    std::fs::write(&out_path, csv).map_err(|e| HandlerErr {
        code: "export_failed",
        message: e.to_string(),
        details: Some(json!({ "path": out_path.to_string_lossy() })),
    })?;

    Ok(json!({ "path": out_path.to_string_lossy(), "rows": rows }))
}

fn print_document(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let table_html = params
        .get("tableHtml")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::new("bad_params", "missing tableHtml"))?;
    let title = params
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or(export::DEFAULT_PRINT_TITLE);
    Ok(json!({ "html": export::print_document(table_html, title) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "export.csv" => {
            let session = match helpers::session(state) {
                Ok(s) => s,
                Err(e) => return Some(e.response(&req.id)),
            };
            Some(match export_csv(session, &req.params) {
                Ok(result) => ok(&req.id, result),
                Err(e) => e.response(&req.id),
            })
        }
        // Presentation only; works without a workspace.
        "print.document" => Some(match print_document(&req.params) {
            Ok(result) => ok(&req.id, result),
            Err(e) => e.response(&req.id),
        }),
        _ => None,
    }
}
