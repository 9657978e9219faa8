use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;

// ---------------------------------------------------------------------------
// RawValue – a single cell as read from the source file
// ---------------------------------------------------------------------------

/// A loosely-typed cell value as produced by the loader.
///
/// Delimited text only ever yields `Text` and `Absent`; spreadsheets may also
/// carry native numbers and booleans.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// No data in this cell (blank, NA token, NaN, error cell).
    Absent,
}

impl RawValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Absent)
    }

    /// The text payload, if this cell came in as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Textual rendering used by the string-based heuristics.
    /// `None` for absent cells.
    pub fn string_form(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Integer(i) => Some(i.to_string()),
            RawValue::Float(f) => Some(float_repr(*f)),
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Absent => None,
        }
    }
}

/// Shortest round-trip rendering, keeping a `.0` on integral values so that
/// spreadsheet floats never read as integer or boolean tokens.
pub fn float_repr(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

// ---------------------------------------------------------------------------
// RawTable – rectangular table straight out of the loader
// ---------------------------------------------------------------------------

/// One named column of raw cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<RawValue>,
}

/// The parsed file: unique column names, every column the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    columns: Vec<RawColumn>,
    row_count: usize,
}

impl RawTable {
    /// Build a table, rejecting ragged columns and duplicate names.
    pub fn new(columns: Vec<RawColumn>) -> Result<Self, String> {
        let row_count = columns.first().map(|c| c.values.len()).unwrap_or(0);
        let mut seen = BTreeSet::new();
        for col in &columns {
            if col.values.len() != row_count {
                return Err(format!(
                    "column '{}' has {} values, expected {row_count}",
                    col.name,
                    col.values.len()
                ));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(format!("duplicate column name '{}'", col.name));
            }
        }
        Ok(RawTable { columns, row_count })
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

// ---------------------------------------------------------------------------
// DType – the inferred type tag
// ---------------------------------------------------------------------------

/// Inferred semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DType {
    Boolean,
    Integer,
    Float,
    Complex,
    Timestamp,
    Categorical,
    String,
}

impl DType {
    /// Stable label exposed to callers in the `dtypes` mapping.
    pub fn label(self) -> &'static str {
        match self {
            DType::Boolean => "boolean",
            DType::Integer => "integer",
            DType::Float => "float",
            DType::Complex => "complex",
            DType::Timestamp => "datetime",
            DType::Categorical => "category",
            DType::String => "string",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "boolean" => DType::Boolean,
            "integer" => DType::Integer,
            "float" => DType::Float,
            "complex" => DType::Complex,
            "datetime" => DType::Timestamp,
            "category" => DType::Categorical,
            "string" => DType::String,
            other => return Err(format!("unknown dtype label '{other}'")),
        })
    }
}

// ---------------------------------------------------------------------------
// Complex
// ---------------------------------------------------------------------------

lazy_static! {
    static ref COMPLEX_PATTERN: Regex =
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*([+-])\s*(\d+(?:\.\d+)?)\s*[ij]\s*$")
            .expect("complex pattern is valid");
}

/// A complex number parsed from `a+bj` / `(a-bi)` style text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    /// Parse the textual form; `None` when the text does not look complex.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let inner = match trimmed.strip_prefix('(') {
            Some(rest) => rest.strip_suffix(')')?,
            None => trimmed,
        };
        let caps = COMPLEX_PATTERN.captures(inner)?;
        let re: f64 = caps[1].parse().ok()?;
        let magnitude: f64 = caps[3].parse().ok()?;
        let im = if &caps[2] == "-" { -magnitude } else { magnitude };
        // Overlong digit runs overflow to infinity.
        if !re.is_finite() || !im.is_finite() {
            return None;
        }
        Some(Complex { re, im })
    }
}

/// Canonical form: explicit sign between the parts, e.g. `(1.5-2j)`.
impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.im.is_sign_negative() { '-' } else { '+' };
        write!(f, "({}{}{}j)", self.re, sign, self.im.abs())
    }
}

impl FromStr for Complex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Complex::parse(s).ok_or_else(|| format!("'{s}' is not a complex number"))
    }
}

// ---------------------------------------------------------------------------
// Scalar – one typed, non-absent cell
// ---------------------------------------------------------------------------

/// A typed cell value.  Absent cells are `None` in the owning column.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(Complex),
    Timestamp(NaiveDateTime),
    Category(String),
    Text(String),
}

impl Scalar {
    /// The type tag this value belongs to.
    pub fn dtype(&self) -> DType {
        match self {
            Scalar::Bool(_) => DType::Boolean,
            Scalar::Int(_) => DType::Integer,
            Scalar::Float(_) => DType::Float,
            Scalar::Complex(_) => DType::Complex,
            Scalar::Timestamp(_) => DType::Timestamp,
            Scalar::Category(_) => DType::Categorical,
            Scalar::Text(_) => DType::String,
        }
    }
}

// ---------------------------------------------------------------------------
// TypedColumn / TypedTable
// ---------------------------------------------------------------------------

/// A classified column.  Every `Some` value matches `dtype`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedColumn {
    pub name: String,
    pub dtype: DType,
    pub values: Vec<Option<Scalar>>,
}

impl TypedColumn {
    pub fn new(name: impl Into<String>, dtype: DType, values: Vec<Option<Scalar>>) -> Self {
        let column = TypedColumn {
            name: name.into(),
            dtype,
            values,
        };
        debug_assert!(column.is_consistent(), "values disagree with dtype");
        column
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every present value carries this column's tag.
    pub fn is_consistent(&self) -> bool {
        self.values
            .iter()
            .flatten()
            .all(|v| v.dtype() == self.dtype)
    }

    /// Number of absent cells.
    pub fn absent_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Sorted category labels; empty unless the column is categorical.
    pub fn categories(&self) -> BTreeSet<&str> {
        self.values
            .iter()
            .flatten()
            .filter_map(|v| match v {
                Scalar::Category(label) => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A fully classified table, columns in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedTable {
    pub columns: Vec<TypedColumn>,
    pub row_count: usize,
}

impl TypedTable {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// column name → dtype label
    pub fn dtype_labels(&self) -> BTreeMap<String, String> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.dtype.label().to_string()))
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&TypedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}
