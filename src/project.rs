use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::model::{AttendanceRecord, AttendanceStatus, FeeRecord, StaffMember, Student};

/// Pure functions over the current store snapshot. Summaries are recomputed
/// from the full filtered set on every call, never maintained incrementally.

pub fn filter_students<'a>(students: &'a [Student], search: Option<&str>) -> Vec<&'a Student> {
    let Some(term) = normalized_term(search) else {
        return students.iter().collect();
    };
    students
        .iter()
        .filter(|s| {
            contains_term(
                &[&s.roll, &s.name, &s.class_name, &s.contact, &s.email],
                &term,
            )
        })
        .collect()
}

pub fn filter_staff<'a>(staff: &'a [StaffMember], search: Option<&str>) -> Vec<&'a StaffMember> {
    let Some(term) = normalized_term(search) else {
        return staff.iter().collect();
    };
    staff
        .iter()
        .filter(|s| {
            contains_term(
                &[&s.name, &s.designation, &s.subject, &s.contact, &s.email],
                &term,
            )
        })
        .collect()
}

pub fn filter_fees<'a>(fees: &'a [FeeRecord], search: Option<&str>) -> Vec<&'a FeeRecord> {
    let Some(term) = normalized_term(search) else {
        return fees.iter().collect();
    };
    fees.iter()
        .filter(|f| {
            contains_term(
                &[&f.receipt_no, &f.student_name, &f.fee_type, &f.payment_method],
                &term,
            )
        })
        .collect()
}

/// Exact date match first, then the optional class filter; store order is
/// preserved.
pub fn filter_attendance<'a>(
    attendance: &'a [AttendanceRecord],
    date: &str,
    class: Option<&str>,
) -> Vec<&'a AttendanceRecord> {
    attendance
        .iter()
        .filter(|a| a.date == date)
        .filter(|a| match class {
            Some(c) if !c.is_empty() => a.student_class == c,
            _ => true,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub total: usize,
}

/// Counts for one date. The class filter is intentionally not applied here;
/// the summary always covers the whole day.
pub fn attendance_summary(attendance: &[AttendanceRecord], date: &str) -> AttendanceSummary {
    let day: Vec<_> = attendance.iter().filter(|a| a.date == date).collect();
    AttendanceSummary {
        present: day
            .iter()
            .filter(|a| a.status == AttendanceStatus::Present)
            .count(),
        absent: day
            .iter()
            .filter(|a| a.status == AttendanceStatus::Absent)
            .count(),
        late: day
            .iter()
            .filter(|a| a.status == AttendanceStatus::Late)
            .count(),
        total: day.len(),
    }
}

/// Marked-today over total students, rounded to the nearest integer
/// percent. Exactly 0 when there are no students.
pub fn attendance_rate(attendance: &[AttendanceRecord], total_students: usize, date: &str) -> u32 {
    if total_students == 0 {
        return 0;
    }
    let marked = attendance.iter().filter(|a| a.date == date).count();
    ((marked as f64 / total_students as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSummary {
    pub total_collected: f64,
    pub monthly_collection: f64,
}

/// Monthly collection matches on year and month. Fee dates that fail to
/// parse count toward the total but never toward the month.
pub fn fee_summary(fees: &[FeeRecord], year: i32, month: u32) -> FeeSummary {
    let total_collected = fees.iter().map(|f| f.amount).sum();
    let monthly_collection = fees
        .iter()
        .filter(|f| {
            NaiveDate::parse_from_str(&f.date, "%Y-%m-%d")
                .map(|d| d.year() == year && d.month() == month)
                .unwrap_or(false)
        })
        .map(|f| f.amount)
        .sum();
    FeeSummary {
        total_collected,
        monthly_collection,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: usize,
    pub total_staff: usize,
    pub attendance_rate: u32,
    pub total_fees: f64,
}

pub fn dashboard_stats(
    students: &[Student],
    staff: &[StaffMember],
    attendance: &[AttendanceRecord],
    fees: &[FeeRecord],
    today: &str,
) -> DashboardStats {
    DashboardStats {
        total_students: students.len(),
        total_staff: staff.len(),
        attendance_rate: attendance_rate(attendance, students.len(), today),
        total_fees: fees.iter().map(|f| f.amount).sum(),
    }
}

fn normalized_term(search: Option<&str>) -> Option<String> {
    let term = search?.trim().to_lowercase();
    if term.is_empty() {
        None
    } else {
        Some(term)
    }
}

fn contains_term(fields: &[&str], term: &str) -> bool {
    fields.iter().any(|f| f.to_lowercase().contains(term))
}
