use chrono::{Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All record types serialize with camelCase field names so the persisted
/// arrays stay byte-compatible with data written by earlier versions of the
/// dashboard.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "late" => Some(Self::Late),
            "excused" => Some(Self::Excused),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Late => "late",
            Self::Excused => "excused",
        }
    }
}

/// Fee records have no partial-payment or refund state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    #[default]
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    /// Kept as entered. Numeric by convention only; uniqueness is not
    /// enforced, the next-roll suggestion is advisory.
    #[serde(default)]
    pub roll: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub date_added: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub designation: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub join_date: String,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub date_added: String,
}

/// studentName/studentClass are snapshots taken when the record is created.
/// They deliberately do not follow later edits to the student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_class: String,
    pub date: String,
    #[serde(default)]
    pub status: AttendanceStatus,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub marked_by: String,
    #[serde(default)]
    pub marked_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecord {
    pub id: String,
    pub receipt_no: String,
    pub student_id: String,
    pub student_name: String,
    pub fee_type: String,
    pub amount: f64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub status: FeeStatus,
    #[serde(default)]
    pub collected_by: String,
    #[serde(default)]
    pub collected_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub icon: String,
}

impl ActivityLogEntry {
    pub fn new(description: &str) -> Self {
        Self {
            id: new_record_id(),
            description: description.to_string(),
            user: OPERATOR.to_string(),
            timestamp: now_timestamp(),
            icon: "fas fa-history".to_string(),
        }
    }
}

/// There is no identity model; every mutation is attributed to the one
/// operator the dashboard knows about.
pub const OPERATOR: &str = "Admin";

pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Receipt numbers are derived from the current timestamp suffix. Not
/// collision-proof under concurrent use, which the daemon does not have.
pub fn new_receipt_no() -> String {
    let millis = Utc::now().timestamp_millis();
    format!("REC{:06}", millis.rem_euclid(1_000_000))
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar day in the operator's local timezone, matching how attendance
/// dates are entered.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
