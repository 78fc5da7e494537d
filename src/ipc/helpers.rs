use serde_json::json;

use crate::ipc::error::err;
use crate::ipc::types::{AppState, Session};

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

pub fn session(state: &mut AppState) -> Result<&mut Session, HandlerErr> {
    state
        .session
        .as_mut()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

/// Required non-empty string param, trimmed.
pub fn required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    let v = params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))?;
    if v.is_empty() {
        return Err(HandlerErr::new(
            "bad_params",
            format!("{} must not be empty", key),
        ));
    }
    Ok(v)
}

/// Optional string param; absent and empty both collapse to "".
pub fn optional_str(params: &serde_json::Value, key: &str) -> String {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Accepts a JSON number or a numeric string, the way form input arrives.
pub fn positive_amount(params: &serde_json::Value, key: &str) -> Result<f64, HandlerErr> {
    let raw = params
        .get(key)
        .ok_or_else(|| HandlerErr::new("bad_params", format!("missing {}", key)))?;
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(HandlerErr::new(
            "bad_params",
            format!("{} must be a positive number", key),
        )),
    }
}

/// Deletion is destructive; the UI asks the user first and forwards the
/// answer. An unconfirmed request aborts with no side effects.
pub fn require_confirmed(params: &serde_json::Value) -> Result<(), HandlerErr> {
    if params.get("confirmed").and_then(|v| v.as_bool()) == Some(true) {
        Ok(())
    } else {
        Err(HandlerErr::new(
            "confirm_required",
            "deletion requires confirmed: true",
        ))
    }
}

/// Synchronous persist after a mutation. A rejected write is a hard,
/// user-visible failure; there is no fallback store.
pub fn persist(session: &Session) -> Result<(), HandlerErr> {
    session.store.persist(&session.conn).map_err(|e| HandlerErr {
        code: "persist_failed",
        message: format!("{e:?}"),
        details: Some(json!({ "workspace": session.workspace.to_string_lossy() })),
    })
}

/// Date param falling back to today's calendar day.
pub fn date_or_today(params: &serde_json::Value) -> String {
    let d = optional_str(params, "date");
    if d.is_empty() {
        crate::model::today()
    } else {
        d
    }
}
