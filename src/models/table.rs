//! In-memory tabular data: the `Table` that flows between PostgreSQL, CSV and SQLite.
//!
//! Also holds the column type inference used when a CSV file is loaded, since CSV
//! carries no type information beyond what its text parses as.

use std::fmt;

/// Strings read as missing values when a CSV column is typed.
///
/// Matches the default NA set of common dataframe CSV readers, so files produced by
/// other tooling load the same way.
pub const NULL_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single value in a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
}

impl Cell {
    /// Text written to a CSV field. `Null` becomes an empty field.
    pub fn to_csv_field(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Integer(v) => v.to_string(),
            Cell::Real(v) => v.to_string(),
            Cell::Boolean(v) => v.to_string(),
            Cell::Text(v) => v.clone(),
        }
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map_or(Cell::Null, Cell::Text)
    }
}

/// Storage class inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Boolean,
    Text,
}

impl ColumnType {
    /// Declared type used in SQLite `CREATE TABLE` statements.
    pub fn sqlite_type(self) -> &'static str {
        match self {
            ColumnType::Integer | ColumnType::Boolean => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }

    /// Infers the narrowest type every non-null value in `values` fits.
    ///
    /// Preference order is boolean, integer, real, then text. A column with no
    /// non-null values is text, and so is a true/false column with any null in it.
    pub fn infer<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (mut seen_any, mut seen_null) = (false, false);
        let (mut boolean, mut integer, mut real) = (true, true, true);

        for raw in values {
            if is_null_marker(raw) {
                seen_null = true;
                continue;
            }
            seen_any = true;
            boolean = boolean && parse_bool(raw).is_some();
            integer = integer && raw.parse::<i64>().is_ok();
            real = real && raw.parse::<f64>().is_ok();
            if !(boolean || integer || real) {
                return ColumnType::Text;
            }
        }

        match (seen_any, boolean, integer, real) {
            (false, ..) => ColumnType::Text,
            // A boolean column with gaps has no boolean storage; keep its text.
            (true, true, ..) if !seen_null => ColumnType::Boolean,
            (true, _, true, _) => ColumnType::Integer,
            (true, _, _, true) => ColumnType::Real,
            _ => ColumnType::Text,
        }
    }

    /// Converts a raw CSV field into a `Cell` of this type.
    ///
    /// Only called with fields that took part in inference, so parsing cannot fail;
    /// a field that somehow does not parse is kept as text rather than dropped.
    pub fn parse(self, raw: &str) -> Cell {
        if is_null_marker(raw) {
            return Cell::Null;
        }
        let parsed = match self {
            ColumnType::Integer => raw.parse().ok().map(Cell::Integer),
            ColumnType::Real => raw.parse().ok().map(Cell::Real),
            ColumnType::Boolean => parse_bool(raw).map(Cell::Boolean),
            ColumnType::Text => None,
        };
        parsed.unwrap_or_else(|| Cell::Text(raw.to_string()))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::Real => "real",
            ColumnType::Boolean => "boolean",
            ColumnType::Text => "text",
        };
        f.write_str(name)
    }
}

pub fn is_null_marker(raw: &str) -> bool {
    NULL_MARKERS.contains(&raw)
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// A named, rectangular dataset. Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub column_types: Vec<ColumnType>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Builds a table whose values are all text, as read from PostgreSQL's text rendering.
    pub fn from_text_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Self {
        let column_types = vec![ColumnType::Text; columns.len()];
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::from).collect())
            .collect();
        Self {
            name: name.into(),
            columns,
            column_types,
            rows,
        }
    }

    /// Builds a typed table from raw CSV records, inferring one type per column.
    ///
    /// Callers guarantee each record has `columns.len()` fields.
    pub fn from_raw_records(
        name: impl Into<String>,
        columns: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Self {
        let column_types: Vec<ColumnType> = (0..columns.len())
            .map(|i| ColumnType::infer(records.iter().map(|r| r[i].as_str())))
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                record
                    .iter()
                    .zip(&column_types)
                    .map(|(raw, ty)| ty.parse(raw))
                    .collect()
            })
            .collect();

        Self {
            name: name.into(),
            columns,
            column_types,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Renames repeated header names the way dataframe readers do: `a, a, a` becomes `a, a.1, a.2`.
pub fn dedupe_column_names(headers: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let mut candidate = header.clone();
        let mut suffix = 1;
        while out.contains(&candidate) {
            candidate = format!("{}.{}", header, suffix);
            suffix += 1;
        }
        out.push(candidate);
    }
    out
}

/// Quotes an identifier for PostgreSQL or SQLite, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
