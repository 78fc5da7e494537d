use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};

/// Exam and e-learning management are planned but not built. The methods
/// answer an informational notice and perform no mutation; their persisted
/// collections still round-trip through load/persist untouched.
pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "exams.create" => Some(err(
            &req.id,
            "not_implemented",
            "Exam management will be implemented in a future version",
            None,
        )),
        "elearning.create" => Some(err(
            &req.id,
            "not_implemented",
            "E-learning content management will be implemented in a future version",
            None,
        )),
        _ => None,
    }
}
