use chrono::{Datelike, Local};
use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{
    self, date_or_today, optional_str, positive_amount, require_confirmed, required_str, HandlerErr,
};
use crate::ipc::types::{AppState, Request, Session};
use crate::model::{self, FeeRecord, FeeStatus};
use crate::project;

fn fees_collect(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = required_str(params, "studentId")?;
    let fee_type = required_str(params, "feeType")?;
    let amount = positive_amount(params, "amount")?;

    // Snapshot the name at collection time. A since-deleted student
    // degrades to a placeholder, not a failure.
    let student_name = session
        .store
        .student(&student_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let fee = FeeRecord {
        id: model::new_record_id(),
        receipt_no: model::new_receipt_no(),
        student_id,
        student_name,
        fee_type,
        amount,
        date: date_or_today(params),
        payment_method: optional_str(params, "paymentMethod"),
        remarks: optional_str(params, "remarks"),
        status: FeeStatus::Paid,
        collected_by: model::OPERATOR.to_string(),
        collected_at: model::now_timestamp(),
    };

    session.store.fees.push(fee.clone());
    session.store.activities.record(&format!(
        "Collected fee: ₹{} from {}",
        fee.amount, fee.student_name
    ));
    helpers::persist(session)?;

    let fee = serde_json::to_value(&fee)
        .map_err(|e| HandlerErr::new("encode_failed", e.to_string()))?;
    Ok(json!({ "fee": fee }))
}

fn fees_list(session: &Session, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let search = params.get("search").and_then(|v| v.as_str());
    let rows = project::filter_fees(&session.store.fees, search);
    let fees = serde_json::to_value(&rows)
        .map_err(|e| HandlerErr::new("encode_failed", e.to_string()))?;
    Ok(json!({ "fees": fees }))
}

fn fees_summary(session: &Session) -> Result<serde_json::Value, HandlerErr> {
    let now = Local::now();
    let summary = project::fee_summary(&session.store.fees, now.year(), now.month());
    serde_json::to_value(summary).map_err(|e| HandlerErr::new("encode_failed", e.to_string()))
}

fn fees_delete(
    session: &mut Session,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let id = required_str(params, "id")?;
    require_confirmed(params)?;

    let Some(removed) = session.store.remove_fee(&id) else {
        return Err(HandlerErr::new("not_found", "fee record not found"));
    };
    session
        .store
        .activities
        .record(&format!("Deleted fee record: {}", removed.receipt_no));
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
        "fees.collect" => Some(handle(state, req, fees_collect)),
        "fees.list" => Some(handle(state, req, |s, p| fees_list(s, p))),
        "fees.summary" => Some(handle(state, req, |s, _| fees_summary(s))),
        "fees.delete" => Some(handle(state, req, fees_delete)),
        _ => None,
    }
}
