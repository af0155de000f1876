//! Aggregate statistics over a run set.
//!
//! Count fields are averaged with truncating integer division and never
//! contribute to the deviation records. The interval is the plain
//! `mean ± std_dev` pair, not a sample-size-aware confidence interval.

use serde::Serialize;

use crate::types::{AggregateRecord, Field, FieldKind, ProfilerRecord, Value};

/// Per-field interval bound shown in the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Interval {
    Range { low: f64, high: f64 },
    Count(i64),
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub average: AggregateRecord,
    /// One record per run, in run order.
    pub squared_deviations: Vec<AggregateRecord>,
    pub variance: AggregateRecord,
    pub std_dev: AggregateRecord,
}

/// Compute mean, squared deviations, variance and standard deviation, in that order.
pub fn summarize(records: &[ProfilerRecord]) -> Summary {
    let average = mean(records);
    let squared_deviations: Vec<AggregateRecord> = records
        .iter()
        .map(|r| squared_deviation(&average, r))
        .collect();
    let variance = mean(&squared_deviations);
    let std_dev = sqrt(&variance);

    Summary {
        average,
        squared_deviations,
        variance,
        std_dev,
    }
}

/// Field-wise arithmetic mean. An empty slice yields all zeros.
pub fn mean(records: &[ProfilerRecord]) -> AggregateRecord {
    let mut out = AggregateRecord::new();
    if records.is_empty() {
        return out;
    }
    let n = records.len();

    for field in Field::ALL {
        let value = match field.kind() {
            FieldKind::Duration => {
                let sum: f64 = records.iter().map(|r| r.get(field).as_f64()).sum();
                Value::Duration(sum / n as f64)
            }
            FieldKind::Count => {
                let sum: i128 = records
                    .iter()
                    .filter_map(|r| r.get(field).as_count())
                    .map(i128::from)
                    .sum();
                // The mean lies between the smallest and largest count, so it fits.
                Value::Count(i64::try_from(sum / n as i128).unwrap_or(i64::MAX))
            }
        };
        out.set(field, value);
    }
    out
}

/// `(mean - value)²` for deviation fields; count fields stay zero.
pub fn squared_deviation(mean: &AggregateRecord, record: &ProfilerRecord) -> AggregateRecord {
    let mut out = AggregateRecord::new();
    for field in Field::ALL.into_iter().filter(|f| f.has_deviation()) {
        let diff = mean.get(field).as_f64() - record.get(field).as_f64();
        out.set(field, Value::Duration(diff * diff));
    }
    out
}

pub fn sqrt(record: &AggregateRecord) -> AggregateRecord {
    let mut out = AggregateRecord::new();
    for (field, value) in record.entries() {
        let root = match value {
            Value::Duration(v) => Value::Duration(v.sqrt()),
            Value::Count(c) => Value::Count((c.max(0) as f64).sqrt() as i64),
        };
        out.set(field, root);
    }
    out
}

impl Summary {
    /// `[mean - std_dev, mean - (-std_dev)]` per duration field; counts show the mean.
    pub fn interval(&self, field: Field) -> Interval {
        match self.average.get(field) {
            Value::Count(c) => Interval::Count(c),
            Value::Duration(mean) => {
                let sd = self.std_dev.get(field).as_f64();
                let low = mean - sd;
                let high = mean - (-sd);
                Interval::Range { low, high }
            }
        }
    }

    pub fn intervals(&self) -> Vec<(Field, Interval)> {
        Field::ALL.into_iter().map(|f| (f, self.interval(f))).collect()
    }
}
