use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Repetitions used when none is given on the command line or in the config file.
pub const DEFAULT_RUNS: usize = 21;

/// Digits consumed after the decimal point of a duration value.
pub const DEFAULT_PRECISION: usize = 3;

/// What a field measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Duration,
    Count,
}

/// One counter reported by the profiled program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Total,
    TotalRefal,
    Builtin,
    LinearResult,
    LinearPattern,
    OpenELoop,
    TAndEVarCopy,
    RepeatedEVarMatch,
    StepCount,
    MemoryUsed,
}

impl Field {
    /// All fields in report order.
    pub const ALL: [Field; 10] = [
        Field::Total,
        Field::TotalRefal,
        Field::Builtin,
        Field::LinearResult,
        Field::LinearPattern,
        Field::OpenELoop,
        Field::TAndEVarCopy,
        Field::RepeatedEVarMatch,
        Field::StepCount,
        Field::MemoryUsed,
    ];

    /// The literal text the profiler prints before this field's value.
    pub fn label(self) -> &'static str {
        match self {
            Field::Total => "Total program time:",
            Field::TotalRefal => "(Total refal time):",
            Field::Builtin => "Builtin time:",
            Field::LinearResult => "Linear result time:",
            Field::LinearPattern => "Linear pattern time:",
            Field::OpenELoop => "Open e-loop time (clear):",
            Field::TAndEVarCopy => "t- and e-var copy time:",
            Field::RepeatedEVarMatch => "Repeated e-var match time (inside e-loops):",
            Field::StepCount => "Step count",
            Field::MemoryUsed => "Memory used",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::StepCount | Field::MemoryUsed => FieldKind::Count,
            _ => FieldKind::Duration,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Field::StepCount => "steps",
            Field::MemoryUsed => "nodes",
            _ => "seconds",
        }
    }

    /// Count fields are treated as deterministic and never get a deviation.
    pub fn has_deviation(self) -> bool {
        self.kind() == FieldKind::Duration
    }

    pub fn zero(self) -> Value {
        match self.kind() {
            FieldKind::Duration => Value::Duration(0.0),
            FieldKind::Count => Value::Count(0),
        }
    }
}

/// A measured or derived value. Durations are seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Duration(f64),
    Count(i64),
}

impl Value {
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Duration(v) => v,
            Value::Count(v) => v as f64,
        }
    }

    pub fn as_count(self) -> Option<i64> {
        match self {
            Value::Count(c) => Some(c),
            Value::Duration(_) => None,
        }
    }
}

/// Field-keyed values for one run, or one aggregate over a run set.
///
/// Fields never inserted read back as zero of their kind.
#[derive(Debug, Clone, Default)]
pub struct ProfilerRecord {
    values: BTreeMap<Field, Value>,
}

/// Aggregates share the record's shape.
pub type AggregateRecord = ProfilerRecord;

impl ProfilerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Value {
        self.values.get(&field).copied().unwrap_or_else(|| field.zero())
    }

    pub fn set(&mut self, field: Field, value: Value) {
        self.values.insert(field, value);
    }

    pub fn with(mut self, field: Field, value: Value) -> Self {
        self.set(field, value);
        self
    }

    /// Every field in report order, zero-filled.
    pub fn entries(&self) -> impl Iterator<Item = (Field, Value)> + '_ {
        Field::ALL.into_iter().map(|f| (f, self.get(f)))
    }
}

impl PartialEq for ProfilerRecord {
    fn eq(&self, other: &Self) -> bool {
        self.entries().eq(other.entries())
    }
}

impl Serialize for ProfilerRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Field::ALL.len()))?;
        for (field, value) in self.entries() {
            map.serialize_entry(&field, &value)?;
        }
        map.end()
    }
}

/// One completed driver iteration.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// 1-based position in the run set.
    pub index: usize,
    pub finished_at: DateTime<Utc>,
    /// `None` when the child was killed by a signal.
    pub exit_code: Option<i32>,
    pub values: ProfilerRecord,
}

/// Immutable settings handed from the argument resolver to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub executable: PathBuf,
    pub input_file: Option<PathBuf>,
    pub runs: usize,
    pub precision: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
