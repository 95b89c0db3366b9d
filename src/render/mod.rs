//! Rendering of platform records
//!
//! Raw job and workflow records returned by the platform are turned into
//! display documents with a stable key order. Summary documents feed the
//! `list` tables; detail documents are what `describe` prints.

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

use crate::api::ResourceKind;

pub mod table;

pub use table::{job_table, sort_by_id, workflow_table};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const EVENT_TIMES: [&str; 3] = ["createTime", "startTime", "endTime"];
const ROUNDED_METRICS: [&str; 3] = ["imagePullTime", "wallTimeUsage", "cpuTimeUsage"];
const SIGNIFICANT_FIGURES: i32 = 4;

/// Render a record in summary (`detailed == false`) or detail mode.
pub fn render(record: &Value, detailed: bool, kind: ResourceKind) -> Value {
    match kind {
        ResourceKind::Job => render_job(record, detailed),
        ResourceKind::Workflow => render_workflow(record, detailed),
    }
}

pub fn render_job(record: &Value, detailed: bool) -> Value {
    let mut doc = Map::new();
    copy_fields(record, &mut doc, &["id", "name", "status", "statusReason"]);

    if detailed {
        copy_fields(record, &mut doc, &["resources"]);
    }

    if let Some(tasks) = record.get("tasks") {
        doc.insert("tasks".to_string(), tasks.clone());
    }

    if detailed {
        if let Some(inputs) = record.get("inputs").and_then(Value::as_array) {
            doc.insert("inputs".to_string(), input_names(inputs));
        }
        copy_fields(
            record,
            &mut doc,
            &[
                "artifacts",
                "labels",
                "policies",
                "storage",
                "placement",
                "outputFiles",
                "outputDirs",
            ],
        );
    }

    if let Some(events) = record.get("events") {
        doc.insert("events".to_string(), render_events(events, detailed));
    }

    if let Some(execution) = record.get("execution") {
        doc.insert(
            "execution".to_string(),
            render_execution(execution, detailed),
        );
    }

    Value::Object(doc)
}

pub fn render_workflow(record: &Value, detailed: bool) -> Value {
    let mut doc = Map::new();
    copy_fields(
        record,
        &mut doc,
        &["id", "name", "status", "statusReason", "progress"],
    );

    if detailed {
        copy_fields(record, &mut doc, &["labels", "dependencies"]);
        if let Some(jobs) = record.get("jobs").and_then(Value::as_array) {
            let jobs = jobs.iter().map(|job| render_job(job, true)).collect();
            doc.insert("jobs".to_string(), Value::Array(jobs));
        }
    }

    if let Some(events) = record.get("events") {
        doc.insert("events".to_string(), render_events(events, detailed));
    }

    Value::Object(doc)
}

fn copy_fields(record: &Value, doc: &mut Map<String, Value>, fields: &[&str]) {
    for field in fields {
        if let Some(value) = record.get(*field) {
            doc.insert(field.to_string(), value.clone());
        }
    }
}

/// Input files are listed by name; their content is never displayed.
fn input_names(inputs: &[Value]) -> Value {
    inputs
        .iter()
        .filter_map(|input| match input {
            Value::String(name) => Some(Value::String(name.clone())),
            Value::Object(file) => file.get("filename").cloned(),
            _ => None,
        })
        .collect()
}

fn render_events(events: &Value, detailed: bool) -> Value {
    let Value::Object(events) = events else {
        return events.clone();
    };

    let mut doc = Map::new();
    for key in EVENT_TIMES {
        if let Some(value) = events.get(key) {
            doc.insert(key.to_string(), render_time(value, detailed));
        }
    }
    for (key, value) in events {
        if !doc.contains_key(key) {
            doc.insert(key.clone(), render_time(value, detailed));
        }
    }

    Value::Object(doc)
}

fn render_time(value: &Value, detailed: bool) -> Value {
    match (detailed, epoch(value)) {
        (true, Some(seconds)) => Value::String(format_timestamp(seconds)),
        _ => value.clone(),
    }
}

fn render_execution(execution: &Value, detailed: bool) -> Value {
    let Value::Object(execution) = execution else {
        return execution.clone();
    };

    let mut doc = Map::new();
    for (key, value) in execution {
        if key == "tasks" {
            if detailed {
                doc.insert(key.clone(), render_task_metrics(value));
            }
            continue;
        }
        doc.insert(key.clone(), value.clone());
    }

    Value::Object(doc)
}

fn render_task_metrics(tasks: &Value) -> Value {
    let Value::Array(tasks) = tasks else {
        return tasks.clone();
    };

    tasks
        .iter()
        .map(|task| match task {
            Value::Object(metrics) => {
                let mut doc = metrics.clone();
                for metric in ROUNDED_METRICS {
                    if let Some(rounded) = doc
                        .get(metric)
                        .and_then(Value::as_f64)
                        .map(|v| round_significant(v, SIGNIFICANT_FIGURES))
                        .and_then(serde_json::Number::from_f64)
                    {
                        doc.insert(metric.to_string(), Value::Number(rounded));
                    }
                }
                Value::Object(doc)
            }
            other => other.clone(),
        })
        .collect()
}

/// Read a Unix timestamp stored as an integer or a float.
pub fn epoch(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|seconds| seconds as i64))
}

/// `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_timestamp(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0)
        .map(|time| time.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// Inverse of [`format_timestamp`].
pub fn parse_timestamp(text: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .ok()
        .map(|time| time.and_utc().timestamp())
}

/// Round to a number of significant figures.
pub fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }

    let magnitude = value.abs().log10().floor() as i32 + 1;
    let shift = digits - magnitude;
    if shift >= 0 {
        let factor = 10f64.powi(shift);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-shift);
        (value / factor).round() * factor
    }
}

/// Time spent running, as `days+HH:MM:SS`.
///
/// Runs still in progress are measured against `now`; records that never
/// started give an empty string.
pub fn elapsed(events: &Value, now: i64) -> String {
    let Some(start) = events.get("startTime").and_then(epoch) else {
        return String::new();
    };
    let end = events.get("endTime").and_then(epoch).unwrap_or(now);
    format_elapsed((end - start).max(0))
}

pub fn format_elapsed(seconds: i64) -> String {
    let days = seconds / 86400;
    let remainder = seconds % 86400;
    format!(
        "{}+{:02}:{:02}:{:02}",
        days,
        remainder / 3600,
        (remainder % 3600) / 60,
        remainder % 60
    )
}
