//! Plain text tables for `list`

use serde_json::Value;

use super::{elapsed, epoch, format_timestamp};

const SEPARATOR: &str = "   ";

struct Column {
    header: &'static str,
    min_width: usize,
}

const JOB_COLUMNS: [Column; 7] = [
    Column { header: "ID", min_width: 6 },
    Column { header: "NAME", min_width: 16 },
    Column { header: "CREATED", min_width: 19 },
    Column { header: "STATUS", min_width: 9 },
    Column { header: "ELAPSED", min_width: 13 },
    Column { header: "IMAGE", min_width: 20 },
    Column { header: "CMD", min_width: 0 },
];

const WORKFLOW_COLUMNS: [Column; 5] = [
    Column { header: "ID", min_width: 6 },
    Column { header: "NAME", min_width: 16 },
    Column { header: "CREATED", min_width: 19 },
    Column { header: "STATUS", min_width: 9 },
    Column { header: "ELAPSED", min_width: 0 },
];

/// Order records by numeric id, records without one last.
pub fn sort_by_id(records: &mut [Value]) {
    records.sort_by_key(|record| record.get("id").and_then(Value::as_u64).unwrap_or(u64::MAX));
}

pub fn job_table(records: &[Value], now: i64) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            let task = record.get("tasks").and_then(|tasks| tasks.get(0));
            let mut row = common_cells(record, now);
            row.push(text(task.and_then(|t| t.get("image"))));
            row.push(text(task.and_then(|t| t.get("cmd"))));
            row
        })
        .collect();

    format_table(&JOB_COLUMNS, &rows)
}

pub fn workflow_table(records: &[Value], now: i64) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| common_cells(record, now))
        .collect();

    format_table(&WORKFLOW_COLUMNS, &rows)
}

fn common_cells(record: &Value, now: i64) -> Vec<String> {
    let events = record.get("events").cloned().unwrap_or(Value::Null);
    let created = events
        .get("createTime")
        .and_then(epoch)
        .map(format_timestamp)
        .unwrap_or_default();

    vec![
        text(record.get("id")),
        text(record.get("name")),
        created,
        text(record.get("status")),
        elapsed(&events, now),
    ]
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn format_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain([column.min_width, column.header.len()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns.iter().map(|c| c.header.to_string()).collect();

    let mut out = String::new();
    for row in std::iter::once(&header).chain(rows) {
        out.push_str(&format_row(row, &widths));
        out.push('\n');
    }
    out
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            if i == last {
                cell.clone()
            } else {
                format!("{:<width$}", cell, width = width)
            }
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR)
        .trim_end()
        .to_string()
}
