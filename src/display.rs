use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use crate::stats::{Interval, Summary};
use crate::types::{AggregateRecord, Field, ProfilerRecord, RunConfig, RunResult, Value};

fn header(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |s| s.bold())
        .to_string()
}

/// Render a value with `precision` decimals for durations, as-is for counts.
pub fn format_value(value: Value, precision: usize) -> String {
    match value {
        Value::Duration(v) => format!("{:.*}", precision, v),
        Value::Count(c) => c.to_string(),
    }
}

fn push_field_line(out: &mut String, field: Field, value: &str) {
    out.push_str(&format!("{} {} {}\n", field.label(), value, field.unit()));
}

fn push_record(out: &mut String, record: &ProfilerRecord, precision: usize) {
    for (field, value) in record.entries() {
        push_field_line(out, field, &format_value(value, precision));
    }
}

/// Per-run section printed as soon as a run finishes.
pub fn format_run(result: &RunResult, precision: usize) -> String {
    let mut out = header(&format!("== {} EXECUTION FINISHED ==", result.index));
    out.push('\n');
    push_record(&mut out, &result.values, precision);
    out.push('\n');
    out
}

fn format_section(title: &str, record: &AggregateRecord, precision: usize) -> String {
    let mut out = header(title);
    out.push('\n');
    push_record(&mut out, record, precision);
    out.push('\n');
    out
}

fn format_intervals(summary: &Summary, precision: usize) -> String {
    let mut out = header("=== CONFIDENCE INTERVAL ===");
    out.push('\n');
    for (field, interval) in summary.intervals() {
        let value = match interval {
            Interval::Range { low, high } => {
                format!("{:.*} - {:.*}", precision, low, precision, high)
            }
            Interval::Count(c) => c.to_string(),
        };
        push_field_line(&mut out, field, &value);
    }
    out.push('\n');
    out
}

/// Average, interval and standard deviation sections, in that order.
pub fn format_summary(summary: &Summary, precision: usize) -> String {
    let mut out = format_section("=== AVERAGE RESULT ===", &summary.average, precision);
    out.push_str(&format_intervals(summary, precision));
    out.push_str(&format_section(
        "=== STANDARD DEVIATION ===",
        &summary.std_dev,
        precision,
    ));
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    executable: String,
    input_file: Option<String>,
    runs: &'a [RunResult],
    average: &'a AggregateRecord,
    variance: &'a AggregateRecord,
    std_dev: &'a AggregateRecord,
    interval: std::collections::BTreeMap<Field, Interval>,
}

/// Whole run set and its aggregates as one JSON document.
pub fn format_json(config: &RunConfig, runs: &[RunResult], summary: &Summary) -> String {
    let report = JsonReport {
        executable: config.executable.to_string_lossy().to_string(),
        input_file: config
            .input_file
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        runs,
        average: &summary.average,
        variance: &summary.variance,
        std_dev: &summary.std_dev,
        interval: summary.intervals().into_iter().collect(),
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}
