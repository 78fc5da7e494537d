use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::activity::ActivityLog;
use crate::kv;
use crate::model::{self, AttendanceRecord, FeeRecord, StaffMember, Student};

pub const KEY_STUDENTS: &str = "sms_students";
pub const KEY_STAFF: &str = "sms_staff";
pub const KEY_ATTENDANCE: &str = "sms_attendance";
pub const KEY_FEES: &str = "sms_fees";
pub const KEY_EXAMS: &str = "sms_exams";
pub const KEY_ELEARNING: &str = "sms_elearning";
pub const KEY_ACTIVITIES: &str = "sms_activities";
pub const KEY_LAST_SAVE: &str = "sms_last_save";

/// Owns all collections. Handlers and projections only read or request
/// append/replace/remove; nothing else keeps a competing copy. Insertion
/// order is the only ordering, but every mutation is keyed by the stable
/// record id — id resolves to a position only at the point of applying a
/// structural change.
#[derive(Debug, Default)]
pub struct Store {
    pub students: Vec<Student>,
    pub staff: Vec<StaffMember>,
    pub attendance: Vec<AttendanceRecord>,
    pub fees: Vec<FeeRecord>,
    pub activities: ActivityLog,
    /// Exam and e-learning modules are not implemented yet; their persisted
    /// arrays round-trip untouched so existing data is not lost.
    pub exams: Vec<serde_json::Value>,
    pub elearning: Vec<serde_json::Value>,
}

impl Store {
    /// Hydrates every collection from the medium. A missing or corrupt key
    /// defaults to an empty sequence; only medium I/O errors propagate.
    pub fn load(conn: &Connection) -> anyhow::Result<Store> {
        Ok(Store {
            students: load_collection(conn, KEY_STUDENTS)?,
            staff: load_collection(conn, KEY_STAFF)?,
            attendance: load_collection(conn, KEY_ATTENDANCE)?,
            fees: load_collection(conn, KEY_FEES)?,
            activities: ActivityLog::from_entries(load_collection(conn, KEY_ACTIVITIES)?),
            exams: load_collection(conn, KEY_EXAMS)?,
            elearning: load_collection(conn, KEY_ELEARNING)?,
        })
    }

    /// Writes the complete snapshot under the fixed keys plus the
    /// last-saved timestamp, in one transaction. Called synchronously after
    /// every mutating command and by the auto-persist timer.
    pub fn persist(&self, conn: &Connection) -> anyhow::Result<()> {
        let tx = conn.unchecked_transaction()?;
        set_collection(&tx, KEY_STUDENTS, &self.students)?;
        set_collection(&tx, KEY_STAFF, &self.staff)?;
        set_collection(&tx, KEY_ATTENDANCE, &self.attendance)?;
        set_collection(&tx, KEY_FEES, &self.fees)?;
        set_collection(&tx, KEY_ACTIVITIES, &self.activities.entries())?;
        set_collection(&tx, KEY_EXAMS, &self.exams)?;
        set_collection(&tx, KEY_ELEARNING, &self.elearning)?;
        kv::set(&tx, KEY_LAST_SAVE, &model::now_timestamp())?;
        tx.commit()?;
        Ok(())
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn student_mut(&mut self, id: &str) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == id)
    }

    pub fn remove_student(&mut self, id: &str) -> Option<Student> {
        let idx = self.students.iter().position(|s| s.id == id)?;
        Some(self.students.remove(idx))
    }

    pub fn staff_member_mut(&mut self, id: &str) -> Option<&mut StaffMember> {
        self.staff.iter_mut().find(|s| s.id == id)
    }

    pub fn remove_staff_member(&mut self, id: &str) -> Option<StaffMember> {
        let idx = self.staff.iter().position(|s| s.id == id)?;
        Some(self.staff.remove(idx))
    }

    pub fn attendance_mut(&mut self, id: &str) -> Option<&mut AttendanceRecord> {
        self.attendance.iter_mut().find(|a| a.id == id)
    }

    pub fn remove_attendance(&mut self, id: &str) -> Option<AttendanceRecord> {
        let idx = self.attendance.iter().position(|a| a.id == id)?;
        Some(self.attendance.remove(idx))
    }

    /// Set-level guard used by bulk marking: at most one record per
    /// (studentId, date) pair is ever created.
    pub fn has_attendance_for(&self, student_id: &str, date: &str) -> bool {
        self.attendance
            .iter()
            .any(|a| a.student_id == student_id && a.date == date)
    }

    pub fn remove_fee(&mut self, id: &str) -> Option<FeeRecord> {
        let idx = self.fees.iter().position(|f| f.id == id)?;
        Some(self.fees.remove(idx))
    }
}

fn load_collection<T: DeserializeOwned>(conn: &Connection, key: &str) -> anyhow::Result<Vec<T>> {
    let Some(raw) = kv::get(conn, key)? else {
        return Ok(Vec::new());
    };
    // Corrupt content degrades to empty rather than refusing to start.
    Ok(serde_json::from_str(&raw).unwrap_or_default())
}

fn set_collection<T: Serialize>(conn: &Connection, key: &str, items: &T) -> anyhow::Result<()> {
    kv::set(conn, key, &serde_json::to_string(items)?)
}
