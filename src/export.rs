use chrono::Local;

use crate::model::{FeeRecord, Student};

pub const STUDENT_HEADERS: [&str; 6] = ["Roll No", "Name", "Class", "Contact", "Email", "Status"];
pub const FEE_HEADERS: [&str; 6] = [
    "Receipt No",
    "Student Name",
    "Fee Type",
    "Amount",
    "Date",
    "Status",
];

pub fn students_csv(students: &[Student]) -> String {
    let mut out = STUDENT_HEADERS.join(",");
    out.push('\n');
    for s in students {
        let status = match serde_json::to_value(s.status) {
            Ok(serde_json::Value::String(v)) => v,
            _ => String::new(),
        };
        let row = [
            s.roll.as_str(),
            s.name.as_str(),
            s.class_name.as_str(),
            s.contact.as_str(),
            s.email.as_str(),
            status.as_str(),
        ];
        push_row(&mut out, &row);
    }
    out
}

pub fn fees_csv(fees: &[FeeRecord]) -> String {
    let mut out = FEE_HEADERS.join(",");
    out.push('\n');
    for f in fees {
        let amount = format_amount(f.amount);
        let row = [
            f.receipt_no.as_str(),
            f.student_name.as_str(),
            f.fee_type.as_str(),
            amount.as_str(),
            f.date.as_str(),
            "paid",
        ];
        push_row(&mut out, &row);
    }
    out
}

fn push_row(out: &mut String, fields: &[&str]) {
    let quoted: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    out.push_str(&quoted.join(","));
    out.push('\n');
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{}", amount)
    }
}

/// Standalone printable document embedding the caller's table markup.
/// Presentation only; carries no data-integrity contract.
pub fn print_document(table_html: &str, title: &str) -> String {
    let generated = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        r#"<html>
<head>
<title>{title}</title>
<style>
    body {{ font-family: Arial, sans-serif; padding: 20px; }}
    table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}
    th, td {{ border: 1px solid #ddd; padding: 10px; text-align: left; }}
    th {{ background-color: #f4f4f4; }}
    h2 {{ color: #333; }}
    .print-header {{ text-align: center; margin-bottom: 30px; }}
    .print-footer {{ margin-top: 30px; text-align: center; color: #666; }}
</style>
</head>
<body>
<div class="print-header">
    <h2>{title}</h2>
    <p>Report generated on {generated}</p>
</div>
{table_html}
<div class="print-footer">
    <p>&copy; 2026 Moren Tech. All rights reserved.</p>
</div>
</body>
</html>
"#
    )
}

pub const DEFAULT_PRINT_TITLE: &str = "Moren Tech School Management System";
