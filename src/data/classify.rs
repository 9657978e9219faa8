//! Per-column type inference.
//!
//! A column runs through an ordered battery of rules; the first rule that
//! accepts the column decides its type and converts its values:
//!
//! ```text
//!  boolean → numeric (integer | float) → complex → timestamp → categorical → string
//! ```
//!
//! Every rule is a pure function of the raw column.  A rule that declines
//! leaves the raw values untouched for the next one.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::trace;
use thiserror::Error;

use super::model::{Complex, DType, RawValue, Scalar, TypedColumn};

#[derive(Debug, Error, PartialEq)]
pub enum ClassifyError {
    #[error("column has {actual} values but the table has {expected} rows")]
    LengthMismatch { expected: usize, actual: usize },
}

// ---------------------------------------------------------------------------
// Policy knobs
// ---------------------------------------------------------------------------

/// Which spellings the boolean rule recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanTokens {
    /// `true/t/yes/y/1` and `false/f/no/n/0`.
    #[default]
    Broad,
    /// Only `true` and `false`.
    Strict,
}

impl BooleanTokens {
    fn lookup(self, token: &str) -> Option<bool> {
        match (self, token) {
            (_, "true") => Some(true),
            (_, "false") => Some(false),
            (BooleanTokens::Broad, "t" | "yes" | "y" | "1") => Some(true),
            (BooleanTokens::Broad, "f" | "no" | "n" | "0") => Some(false),
            _ => None,
        }
    }
}

/// When a string column becomes categorical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategoricalPolicy {
    /// Small tables (fewer than `small_rows` rows) need at most
    /// `small_max_unique` distinct values; larger ones need
    /// `unique / non_absent < ratio`.
    SizeAware {
        small_rows: usize,
        small_max_unique: usize,
        ratio: f64,
    },
    /// `unique / row_count < ratio` regardless of table size.
    UniformRatio { ratio: f64 },
}

impl Default for CategoricalPolicy {
    fn default() -> Self {
        CategoricalPolicy::SizeAware {
            small_rows: 10,
            small_max_unique: 3,
            ratio: 0.5,
        }
    }
}

/// Thresholds and policies for the rule battery.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOptions {
    pub boolean_tokens: BooleanTokens,
    /// Validity ratio the numeric rule must exceed on small columns.
    pub numeric_small_threshold: f64,
    /// Validity ratio the numeric rule must exceed on large columns.
    pub numeric_large_threshold: f64,
    /// Non-absent count at which a column counts as large.
    pub numeric_large_min: usize,
    pub timestamp_threshold: f64,
    /// How many leading values are checked for date separators.
    pub timestamp_sample: usize,
    pub categorical: CategoricalPolicy,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            boolean_tokens: BooleanTokens::Broad,
            numeric_small_threshold: 0.5,
            numeric_large_threshold: 0.8,
            numeric_large_min: 100,
            timestamp_threshold: 0.7,
            timestamp_sample: 5,
            categorical: CategoricalPolicy::default(),
        }
    }
}

impl InferenceOptions {
    /// Ratio the numeric rule has to beat for a column with `non_absent` values.
    pub fn numeric_threshold(&self, non_absent: usize) -> f64 {
        if non_absent < self.numeric_large_min {
            self.numeric_small_threshold
        } else {
            self.numeric_large_threshold
        }
    }
}

// ---------------------------------------------------------------------------
// Rule battery
// ---------------------------------------------------------------------------

/// A raw column plus the counts every rule needs.
struct Candidate<'a> {
    values: &'a [RawValue],
    row_count: usize,
    non_absent: usize,
    /// Every present cell is still text (nothing numeric from a spreadsheet).
    all_text: bool,
}

impl<'a> Candidate<'a> {
    fn new(values: &'a [RawValue], row_count: usize) -> Self {
        let non_absent = values.iter().filter(|v| !v.is_absent()).count();
        let all_text = values
            .iter()
            .all(|v| v.is_absent() || v.as_text().is_some());
        Candidate {
            values,
            row_count,
            non_absent,
            all_text,
        }
    }

    fn present(&self) -> impl Iterator<Item = &'a RawValue> {
        self.values.iter().filter(|v| !v.is_absent())
    }

    /// Convert each present cell with `f`; absent cells stay absent.
    fn map<F>(&self, mut f: F) -> Vec<Option<Scalar>>
    where
        F: FnMut(&RawValue) -> Option<Scalar>,
    {
        self.values
            .iter()
            .map(|v| if v.is_absent() { None } else { f(v) })
            .collect()
    }

    fn ratio(&self, valid: usize) -> f64 {
        valid as f64 / self.non_absent as f64
    }
}

struct Conversion {
    dtype: DType,
    values: Vec<Option<Scalar>>,
}

type Rule = fn(&Candidate<'_>, &InferenceOptions) -> Option<Conversion>;

/// Evaluated top to bottom; the first `Some` wins.
const BATTERY: &[(&str, Rule)] = &[
    ("boolean", boolean_rule),
    ("numeric", numeric_rule),
    ("complex", complex_rule),
    ("timestamp", timestamp_rule),
    ("categorical", categorical_rule),
];

/// Classify one column of raw cells.
///
/// `row_count` is the table's row count; the column must have exactly that
/// many cells.  The result is deterministic for a given input and options.
pub fn classify_column(
    name: &str,
    values: &[RawValue],
    row_count: usize,
    options: &InferenceOptions,
) -> Result<TypedColumn, ClassifyError> {
    if values.len() != row_count {
        return Err(ClassifyError::LengthMismatch {
            expected: row_count,
            actual: values.len(),
        });
    }

    let candidate = Candidate::new(values, row_count);
    if candidate.non_absent == 0 {
        return Ok(TypedColumn::new(name, DType::String, vec![None; row_count]));
    }

    let conversion = BATTERY
        .iter()
        .find_map(|(rule_name, rule)| {
            let hit = rule(&candidate, options);
            let verdict = if hit.is_some() { "matched" } else { "declined" };
            trace!("column '{name}': {rule_name} rule {verdict}");
            hit
        })
        .unwrap_or_else(|| string_conversion(&candidate));

    Ok(TypedColumn::new(name, conversion.dtype, conversion.values))
}

fn boolean_rule(c: &Candidate<'_>, options: &InferenceOptions) -> Option<Conversion> {
    let lookup = |v: &RawValue| {
        v.string_form()
            .and_then(|s| options.boolean_tokens.lookup(&s.trim().to_lowercase()))
    };
    if !c.present().all(|v| lookup(v).is_some()) {
        return None;
    }
    Some(Conversion {
        dtype: DType::Boolean,
        values: c.map(|v| lookup(v).map(Scalar::Bool)),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_integer(self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(i),
            // i64::MAX as f64 rounds up to 2^63, hence the strict bound.
            Number::Float(f)
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
            {
                Some(f as i64)
            }
            Number::Float(_) => None,
        }
    }

    fn as_float(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

fn parse_number(v: &RawValue) -> Option<Number> {
    match v {
        RawValue::Integer(i) => Some(Number::Int(*i)),
        RawValue::Float(f) if f.is_finite() => Some(Number::Float(*f)),
        RawValue::Text(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(Number::Int(i));
            }
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Number::Float)
        }
        _ => None,
    }
}

fn numeric_rule(c: &Candidate<'_>, options: &InferenceOptions) -> Option<Conversion> {
    let parsed: Vec<Option<Number>> = c.values.iter().map(parse_number).collect();
    let valid = parsed.iter().flatten().count();
    let ratio = c.ratio(valid);
    let threshold = options.numeric_threshold(c.non_absent);
    trace!("numeric validity {ratio:.3} against threshold {threshold}");
    if ratio <= threshold {
        return None;
    }

    let integral = parsed.iter().flatten().all(|n| n.as_integer().is_some());
    let values = if integral {
        parsed
            .iter()
            .map(|n| n.and_then(Number::as_integer).map(Scalar::Int))
            .collect()
    } else {
        parsed
            .iter()
            .map(|n| n.map(|n| Scalar::Float(n.as_float())))
            .collect()
    };
    Some(Conversion {
        dtype: if integral { DType::Integer } else { DType::Float },
        values,
    })
}

fn complex_rule(c: &Candidate<'_>, _options: &InferenceOptions) -> Option<Conversion> {
    if !c.all_text {
        return None;
    }
    let parsed: Vec<Option<Complex>> = c
        .values
        .iter()
        .map(|v| v.as_text().and_then(Complex::parse))
        .collect();
    let matched = parsed.iter().flatten().count();
    if matched != c.non_absent {
        return None;
    }
    Some(Conversion {
        dtype: DType::Complex,
        values: parsed.into_iter().map(|p| p.map(Scalar::Complex)).collect(),
    })
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%m-%d-%Y", "%d %b %Y", "%b %d %Y",
    "%d %B %Y", "%B %d %Y", "%b %d, %Y", "%B %d, %Y",
];

/// Parse a timestamp in one of the accepted layouts.  Offsets are
/// normalised to UTC.  Time-only text is rejected.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let s = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn timestamp_rule(c: &Candidate<'_>, options: &InferenceOptions) -> Option<Conversion> {
    let looks_dated = c
        .present()
        .take(options.timestamp_sample)
        .filter_map(RawValue::string_form)
        .any(|s| s.contains(['/', '-', ':']));
    if !looks_dated {
        return None;
    }

    let parsed: Vec<Option<NaiveDateTime>> = c
        .values
        .iter()
        .map(|v| v.string_form().and_then(|s| parse_timestamp(&s)))
        .collect();
    let ratio = c.ratio(parsed.iter().flatten().count());
    trace!("timestamp validity {ratio:.3}");
    if ratio <= options.timestamp_threshold {
        return None;
    }
    Some(Conversion {
        dtype: DType::Timestamp,
        values: parsed.into_iter().map(|p| p.map(Scalar::Timestamp)).collect(),
    })
}

fn categorical_rule(c: &Candidate<'_>, options: &InferenceOptions) -> Option<Conversion> {
    if !c.all_text {
        return None;
    }
    let unique = c.present().filter_map(RawValue::as_text).collect::<HashSet<_>>().len();

    let accept = match options.categorical {
        CategoricalPolicy::SizeAware {
            small_rows,
            small_max_unique,
            ratio,
        } => {
            if c.row_count < small_rows {
                unique <= small_max_unique
            } else {
                c.ratio(unique) < ratio
            }
        }
        CategoricalPolicy::UniformRatio { ratio } => {
            (unique as f64 / c.row_count as f64) < ratio
        }
    };
    if !accept {
        return None;
    }
    Some(Conversion {
        dtype: DType::Categorical,
        values: c.map(|v| v.as_text().map(|s| Scalar::Category(s.to_string()))),
    })
}

fn string_conversion(c: &Candidate<'_>) -> Conversion {
    Conversion {
        dtype: DType::String,
        values: c.map(|v| v.string_form().map(Scalar::Text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn text(values: &[&str]) -> Vec<RawValue> {
        values
            .iter()
            .map(|s| {
                if s.is_empty() {
                    RawValue::Absent
                } else {
                    RawValue::Text(s.to_string())
                }
            })
            .collect()
    }

    fn classify(values: &[RawValue]) -> TypedColumn {
        classify_column("col", values, values.len(), &InferenceOptions::default()).unwrap()
    }

    #[test]
    fn all_absent_short_circuits_to_string() {
        let col = classify(&[RawValue::Absent, RawValue::Absent]);
        assert_eq!(col.dtype, DType::String);
        assert_eq!(col.values, vec![None, None]);
    }

    #[test]
    fn empty_column_is_string() {
        let col = classify(&[]);
        assert_eq!(col.dtype, DType::String);
        assert!(col.is_empty());
    }

    #[test]
    fn boolean_tokens_map_and_keep_absent() {
        let col = classify(&text(&["Yes", " n ", "", "TRUE", "f", "1", "0"]));
        assert_eq!(col.dtype, DType::Boolean);
        let expected = [
            Some(true),
            Some(false),
            None,
            Some(true),
            Some(false),
            Some(true),
            Some(false),
        ];
        let got: Vec<Option<bool>> = col
            .values
            .iter()
            .map(|v| v.as_ref().map(|s| matches!(s, Scalar::Bool(true))))
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn strict_tokens_leave_zero_one_numeric() {
        let options = InferenceOptions {
            boolean_tokens: BooleanTokens::Strict,
            ..Default::default()
        };
        let values = text(&["1", "0", "1"]);
        let col = classify_column("c", &values, 3, &options).unwrap();
        assert_eq!(col.dtype, DType::Integer);
    }

    #[test]
    fn spreadsheet_booleans_are_boolean() {
        let col = classify(&[RawValue::Bool(true), RawValue::Absent, RawValue::Bool(false)]);
        assert_eq!(col.dtype, DType::Boolean);
        assert_eq!(col.values[2], Some(Scalar::Bool(false)));
    }

    #[test]
    fn integral_numbers_become_integer() {
        let col = classify(&text(&["1", "", "3.0", "-7"]));
        assert_eq!(col.dtype, DType::Integer);
        assert_eq!(
            col.values,
            vec![Some(Scalar::Int(1)), None, Some(Scalar::Int(3)), Some(Scalar::Int(-7))]
        );
    }

    #[test]
    fn fractional_numbers_become_float() {
        let col = classify(&text(&["10", "10.5", " 2e3 "]));
        assert_eq!(col.dtype, DType::Float);
        assert_eq!(
            col.values,
            vec![Some(Scalar::Float(10.0)), Some(Scalar::Float(10.5)), Some(Scalar::Float(2000.0))]
        );
    }

    #[test]
    fn spreadsheet_floats_with_zero_fraction_are_integer() {
        let col = classify(&[RawValue::Float(4.0), RawValue::Integer(2), RawValue::Absent]);
        assert_eq!(col.dtype, DType::Integer);
        assert_eq!(col.values[0], Some(Scalar::Int(4)));
    }

    #[test]
    fn partial_numeric_column_drops_unparsed_values() {
        let col = classify(&text(&["1", "2", "oops"]));
        assert_eq!(col.dtype, DType::Integer);
        assert_eq!(col.values[2], None);
    }

    #[test]
    fn infinities_do_not_count_as_numbers() {
        let col = classify(&text(&["inf", "-inf", "1.5"]));
        assert_ne!(col.dtype, DType::Float);
    }

    #[test]
    fn numeric_threshold_switches_at_one_hundred_values() {
        // 70 numbers + 29 words: 0.707 beats the small-column 0.5 threshold.
        let mut small: Vec<String> = (0..70).map(|i| (i + 2).to_string()).collect();
        small.extend((0..29).map(|_| "word".to_string()));
        let small: Vec<RawValue> = small.into_iter().map(RawValue::Text).collect();
        assert_eq!(small.len(), 99);
        let col = classify(&small);
        assert_eq!(col.dtype, DType::Integer);
        assert_eq!(col.absent_count(), 29);

        // 71 numbers + 29 words: 0.71 does not beat the large-column 0.8 threshold.
        let mut large: Vec<String> = (0..71).map(|i| (i + 2).to_string()).collect();
        large.extend((0..29).map(|_| "word".to_string()));
        let large: Vec<RawValue> = large.into_iter().map(RawValue::Text).collect();
        assert_eq!(large.len(), 100);
        let col = classify(&large);
        assert_eq!(col.dtype, DType::String);
    }

    #[test]
    fn threshold_is_exclusive() {
        // exactly half valid does not pass the 0.5 threshold
        let col = classify(&text(&["1", "x", "2", "y"]));
        assert_ne!(col.dtype, DType::Integer);
    }

    #[test]
    fn complex_column() {
        let col = classify(&text(&["1+2j", "(3.5-1i)", "", "-1 + 0j"]));
        assert_eq!(col.dtype, DType::Complex);
        assert_eq!(col.values[1], Some(Scalar::Complex(Complex::new(3.5, -1.0))));
        assert_eq!(col.values[2], None);
    }

    #[test]
    fn complex_requires_every_value() {
        let col = classify(&text(&["1+2j", "hello", "3-1j", "x", "y", "z", "w", "v", "u", "t"]));
        assert_eq!(col.dtype, DType::String);
    }

    #[test]
    fn timestamps_over_threshold_convert_and_drop_failures() {
        let col = classify(&text(&[
            "2024-01-01",
            "2024-01-02 10:30:00",
            "01/15/2024",
            "2024-02-01T08:00:00Z",
            "not a date",
        ]));
        assert_eq!(col.dtype, DType::Timestamp);
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(col.values[0], Some(Scalar::Timestamp(jan1)));
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(col.values[2], Some(Scalar::Timestamp(jan15)));
        assert_eq!(col.values[4], None);
    }

    #[test]
    fn timestamps_below_threshold_are_kept_as_text() {
        let col = classify(&text(&["2024-01-01", "2024-01-02", "a-b", "c-d"]));
        assert_eq!(col.dtype, DType::String);
    }

    #[test]
    fn timestamp_threshold_is_exclusive() {
        let column = |dated: usize| {
            let mut cells: Vec<String> = (1..=dated).map(|d| format!("2024-03-{d:02}")).collect();
            cells.extend((dated..10).map(|i| format!("lot-{i}")));
            cells.into_iter().map(RawValue::Text).collect::<Vec<_>>()
        };
        assert_eq!(classify(&column(7)).dtype, DType::String);
        let col = classify(&column(8));
        assert_eq!(col.dtype, DType::Timestamp);
        assert_eq!(col.values[9], None);
    }

    #[test]
    fn overflowing_complex_text_is_not_complex() {
        let huge = format!("1{}+2j", "0".repeat(400));
        let col = classify(&text(&[&huge, "1+1j"]));
        assert_ne!(col.dtype, DType::Complex);
        assert_eq!(col.values[0], Some(Scalar::Category(huge)));
    }

    #[test]
    fn timestamp_rule_needs_separator_in_sample() {
        assert_eq!(
            parse_timestamp("5 Jan 2024").map(|d| d.date()),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        let col = classify(&text(&["5 Jan 2024", "6 Jan 2024", "7 Jan 2024", "8 Jan 2024"]));
        assert_eq!(col.dtype, DType::String);
    }

    #[test]
    fn time_only_values_are_not_timestamps() {
        assert_eq!(parse_timestamp("10:30:00"), None);
    }

    #[test]
    fn small_table_categorical_boundary() {
        let three = text(&["red", "green", "blue", "red", "green", "blue", "red", "green", "blue"]);
        assert_eq!(classify(&three).dtype, DType::Categorical);

        let four = text(&["red", "green", "blue", "pink", "green", "blue", "red", "green", "blue"]);
        assert_eq!(classify(&four).dtype, DType::String);
    }

    #[test]
    fn larger_table_categorical_uses_ratio() {
        let mut values: Vec<&str> = Vec::new();
        for _ in 0..5 {
            values.extend(["a", "b", "c", "d"]);
        }
        let col = classify(&text(&values));
        assert_eq!(col.dtype, DType::Categorical);
        assert_eq!(col.categories().into_iter().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);

        let distinct: Vec<String> = (0..20).map(|i| format!("name{i}")).collect();
        let refs: Vec<&str> = distinct.iter().map(String::as_str).collect();
        assert_eq!(classify(&text(&refs)).dtype, DType::String);
    }

    #[test]
    fn uniform_ratio_policy_ignores_table_size() {
        let options = InferenceOptions {
            categorical: CategoricalPolicy::UniformRatio { ratio: 0.5 },
            ..Default::default()
        };
        let values = text(&["a", "b", "a", "b", "a"]);
        let col = classify_column("c", &values, 5, &options).unwrap();
        assert_eq!(col.dtype, DType::Categorical);

        let values = text(&["a", "b", "c", "a"]);
        let col = classify_column("c", &values, 4, &options).unwrap();
        assert_eq!(col.dtype, DType::String);
    }

    #[test]
    fn mixed_spreadsheet_cells_fall_back_to_string_forms() {
        let col = classify(&[
            RawValue::Text("alpha".into()),
            RawValue::Float(2.0),
            RawValue::Text("beta".into()),
            RawValue::Bool(true),
        ]);
        assert_eq!(col.dtype, DType::String);
        assert_eq!(col.values[1], Some(Scalar::Text("2.0".into())));
        assert_eq!(col.values[3], Some(Scalar::Text("true".into())));
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let err = classify_column("c", &text(&["a"]), 2, &InferenceOptions::default()).unwrap_err();
        assert_eq!(err, ClassifyError::LengthMismatch { expected: 2, actual: 1 });
    }

    fn bool_token() -> impl Strategy<Value = (Option<&'static str>, Option<bool>)> {
        prop_oneof![
            Just((Some("true"), Some(true))),
            Just((Some("Y"), Some(true))),
            Just((Some("yes"), Some(true))),
            Just((Some("false"), Some(false))),
            Just((Some("NO"), Some(false))),
            Just((Some("f"), Some(false))),
            Just((None, None)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_boolean_columns_map_tokens(
            cells in proptest::collection::vec(bool_token(), 1..40),
        ) {
            prop_assume!(cells.iter().any(|(t, _)| t.is_some()));
            let raw: Vec<RawValue> = cells
                .iter()
                .map(|(t, _)| t.map(|s| RawValue::Text(s.to_string())).unwrap_or(RawValue::Absent))
                .collect();
            let col = classify(&raw);
            prop_assert_eq!(col.dtype, DType::Boolean);
            for ((_, expected), got) in cells.iter().zip(&col.values) {
                prop_assert_eq!(expected.map(Scalar::Bool), got.clone());
            }
        }

        #[test]
        fn prop_integer_iff_no_fraction(
            ints in proptest::collection::vec(2i64..1_000_000, 1..60),
            fraction in proptest::option::of(1u32..99),
        ) {
            let mut raw: Vec<RawValue> =
                ints.iter().map(|i| RawValue::Text(i.to_string())).collect();
            if let Some(f) = fraction {
                raw.push(RawValue::Text(format!("3.{f:02}")));
            }
            let col = classify(&raw);
            if fraction.is_some() {
                prop_assert_eq!(col.dtype, DType::Float);
            } else {
                prop_assert_eq!(col.dtype, DType::Integer);
            }
            prop_assert_eq!(col.absent_count(), 0);
        }
    }
}
