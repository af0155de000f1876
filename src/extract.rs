use crate::errors::RefbenchError;
use crate::types::{Field, FieldKind, ProfilerRecord, Value};

/// Extract every known field from one run's combined output.
///
/// A label that is absent leaves its field at zero. A label that is present
/// but not followed by a parseable number fails the whole extraction.
pub fn parse_profiler_output(text: &str, precision: usize) -> Result<ProfilerRecord, RefbenchError> {
    let mut record = ProfilerRecord::new();
    for field in Field::ALL {
        let value = match field.kind() {
            FieldKind::Duration => extract_duration(text, field.label(), precision)?
                .map(Value::Duration),
            FieldKind::Count => extract_count(text, field.label())?.map(Value::Count),
        };
        if let Some(value) = value {
            record.set(field, value);
        }
    }
    Ok(record)
}

/// Byte offset of the first non-space character after `label`, if the label occurs.
fn value_start(text: &str, label: &str) -> Option<usize> {
    let at = text.find(label)?;
    let after = at + label.len();
    let skipped = text[after..].bytes().take_while(|&b| b == b' ').count();
    Some(after + skipped)
}

/// Seconds value following `label`: everything up to the first `.` plus
/// `precision` more characters.
pub fn extract_duration(
    text: &str,
    label: &'static str,
    precision: usize,
) -> Result<Option<f64>, RefbenchError> {
    let Some(start) = value_start(text, label) else {
        return Ok(None);
    };
    let rest = &text[start..];

    let Some(dot) = rest.find('.') else {
        return Err(malformed(label, rest));
    };

    // Count characters, not bytes, so a multi-byte char never splits.
    let end = rest[dot + 1..]
        .char_indices()
        .nth(precision)
        .map(|(i, _)| dot + 1 + i)
        .unwrap_or(rest.len());
    let token = &rest[..end];

    token
        .parse::<f64>()
        .map(Some)
        .map_err(|_| malformed(label, token))
}

/// Integer value following `label`: the run of ASCII digits after the spaces.
pub fn extract_count(text: &str, label: &'static str) -> Result<Option<i64>, RefbenchError> {
    let Some(start) = value_start(text, label) else {
        return Ok(None);
    };
    let rest = &text[start..];
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let token = &rest[..digits];

    token
        .parse::<i64>()
        .map(Some)
        .map_err(|_| malformed(label, first_line(rest)))
}

fn malformed(label: &'static str, value: &str) -> RefbenchError {
    RefbenchError::MalformedValue {
        label,
        value: first_line(value).to_string(),
    }
}

fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Total program time: 1.234 seconds (100.0 %).
(Total refal time): 1.100 seconds (89.1 %).
Builtin time: 0.050 seconds (4.0 %).
Linear result time: 0.300 seconds (24.3 %).
Linear pattern time: 0.400 seconds (32.4 %).
Open e-loop time (clear): 0.010 seconds (0.8 %).
t- and e-var copy time: 0.020 seconds (1.6 %).
Repeated e-var match time (inside e-loops): 0.005 seconds (0.4 %).
Step count 123456
Memory used 7890 nodes, 189360 bytes
";

    #[test]
    fn step_count_is_read() {
        assert_eq!(extract_count("Step count 42 steps", "Step count").unwrap(), Some(42));
    }

    #[test]
    fn duration_uses_precision_digits() {
        let text = "Total program time: 1.234 seconds";
        assert_eq!(
            extract_duration(text, "Total program time:", 3).unwrap(),
            Some(1.234)
        );
    }

    #[test]
    fn duration_truncates_extra_digits() {
        let text = "Builtin time: 0.123456 seconds";
        assert_eq!(extract_duration(text, "Builtin time:", 3).unwrap(), Some(0.123));
        assert_eq!(extract_duration(text, "Builtin time:", 1).unwrap(), Some(0.1));
    }

    #[test]
    fn duration_at_end_of_text_is_clamped() {
        let text = "Builtin time: 2.5";
        assert_eq!(extract_duration(text, "Builtin time:", 3).unwrap(), Some(2.5));
    }

    #[test]
    fn absent_labels_are_zero() {
        let record = parse_profiler_output("nothing useful here\n", 3).unwrap();
        for (field, value) in record.entries() {
            assert_eq!(value, field.zero(), "{:?} should be zero", field);
        }
    }

    #[test]
    fn full_sample_is_extracted() {
        let record = parse_profiler_output(SAMPLE, 3).unwrap();
        assert_eq!(record.get(Field::Total), Value::Duration(1.234));
        assert_eq!(record.get(Field::TotalRefal), Value::Duration(1.1));
        assert_eq!(record.get(Field::Builtin), Value::Duration(0.05));
        assert_eq!(record.get(Field::LinearResult), Value::Duration(0.3));
        assert_eq!(record.get(Field::LinearPattern), Value::Duration(0.4));
        assert_eq!(record.get(Field::OpenELoop), Value::Duration(0.01));
        assert_eq!(record.get(Field::TAndEVarCopy), Value::Duration(0.02));
        assert_eq!(record.get(Field::RepeatedEVarMatch), Value::Duration(0.005));
        assert_eq!(record.get(Field::StepCount), Value::Count(123456));
        assert_eq!(record.get(Field::MemoryUsed), Value::Count(7890));
    }

    #[test]
    fn first_occurrence_wins() {
        let text = "Step count 1\nStep count 2\n";
        let record = parse_profiler_output(text, 3).unwrap();
        assert_eq!(record.get(Field::StepCount), Value::Count(1));
    }

    #[test]
    fn non_numeric_duration_is_fatal() {
        let err = extract_duration("Total program time: abc.def", "Total program time:", 3)
            .unwrap_err();
        assert!(matches!(
            err,
            RefbenchError::MalformedValue { label: "Total program time:", .. }
        ));
    }

    #[test]
    fn duration_without_decimal_point_is_fatal() {
        let err = extract_duration("Builtin time: 12 seconds", "Builtin time:", 3).unwrap_err();
        assert!(matches!(err, RefbenchError::MalformedValue { .. }));
    }

    #[test]
    fn count_without_digits_is_fatal() {
        let err = parse_profiler_output("Memory used lots of nodes", 3).unwrap_err();
        match err {
            RefbenchError::MalformedValue { label, value } => {
                assert_eq!(label, "Memory used");
                assert_eq!(value, "lots of nodes");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn label_at_end_of_text_is_fatal() {
        assert!(extract_count("Step count", "Step count").is_err());
        assert!(extract_duration("Builtin time:   ", "Builtin time:", 3).is_err());
    }

    #[test]
    fn multibyte_text_after_point_does_not_panic() {
        let result = extract_duration("Builtin time: 1.ü", "Builtin time:", 3);
        assert!(result.is_err());
    }
}
