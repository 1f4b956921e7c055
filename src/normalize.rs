// src/normalize.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Field, ParseError, Reason};

static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());
static PRICE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+[.,]*\d*").unwrap());
static GROUPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}(,\d{3})+(\.\d+)?$").unwrap());

/// Storage offer as `<amount> <unit> <type>`, e.g. `1,000 GB SSD`.
#[derive(Debug, Clone, PartialEq)]
pub struct Storage {
    pub amount: i64,
    pub unit: String,
    pub kind: String,
}

/// A numeric amount followed by its unit, e.g. `8 GB` or `2.5 TB`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity<T> {
    pub amount: T,
    pub unit: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price {
    pub monthly: f64,
    pub hourly: Option<f64>,
}

/// Join the text fragments of one cell into a single clean string.
///
/// Fragments are joined with a space, line breaks and tabs are deleted, the
/// result is trimmed and runs of spaces shrink to one. Applying it to its own
/// output is a no-op.
pub fn collapse<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for (i, frag) in fragments.into_iter().enumerate() {
        if i > 0 {
            joined.push(' ');
        }
        joined.push_str(frag.as_ref());
    }
    joined.retain(|c| !matches!(c, '\n' | '\t' | '\r'));
    SPACE_RUNS.replace_all(joined.trim(), " ").into_owned()
}

fn tokens<'a>(field: Field, raw: &'a str, expected: usize) -> Result<Vec<&'a str>, ParseError> {
    let toks: Vec<&str> = raw.split_whitespace().collect();
    if toks.len() < expected {
        return Err(ParseError::new(
            field,
            raw,
            Reason::TooFewTokens {
                expected,
                found: toks.len(),
            },
        ));
    }
    Ok(toks)
}

/// Drop thousands separators (`1,000` or `1,234.5`). Any other comma is left in
/// place so the number fails to parse instead of changing magnitude.
fn ungroup(token: &str) -> String {
    if GROUPED.is_match(token) {
        token.replace(',', "")
    } else {
        token.to_string()
    }
}

fn not_numeric(field: Field, raw: &str, token: &str) -> ParseError {
    ParseError::new(field, raw, Reason::NotNumeric(token.to_string()))
}

fn parse_int(field: Field, raw: &str, token: &str) -> Result<i64, ParseError> {
    ungroup(token)
        .parse()
        .map_err(|_| not_numeric(field, raw, token))
}

fn parse_float(field: Field, raw: &str, token: &str) -> Result<f64, ParseError> {
    let value: f64 = ungroup(token)
        .parse()
        .map_err(|_| not_numeric(field, raw, token))?;
    if !value.is_finite() {
        return Err(not_numeric(field, raw, token));
    }
    Ok(value)
}

/// `1,000 GB SSD` → `Storage { 1000, "GB", "SSD" }`. Anything after the unit is the type.
pub fn parse_storage(raw: &str) -> Result<Storage, ParseError> {
    let toks = tokens(Field::Storage, raw, 3)?;
    Ok(Storage {
        amount: parse_int(Field::Storage, raw, toks[0])?,
        unit: toks[1].to_string(),
        kind: toks[2..].join(" "),
    })
}

/// `25 GB` → integer storage amount and unit, for tables that omit the disk type.
pub fn parse_storage_untyped(raw: &str) -> Result<Quantity<i64>, ParseError> {
    let toks = tokens(Field::Storage, raw, 2)?;
    Ok(Quantity {
        amount: parse_int(Field::Storage, raw, toks[0])?,
        unit: toks[1].to_string(),
    })
}

/// Leading integer of `4 vCPUs`.
pub fn parse_cpu_count(raw: &str) -> Result<i64, ParseError> {
    let toks = tokens(Field::Cpu, raw, 1)?;
    parse_int(Field::Cpu, raw, toks[0])
}

/// Leading token of the CPU cell, kept verbatim.
pub fn parse_cpu_raw(raw: &str) -> Result<String, ParseError> {
    let toks = tokens(Field::Cpu, raw, 1)?;
    Ok(toks[0].to_string())
}

pub fn parse_memory(raw: &str) -> Result<Quantity<i64>, ParseError> {
    let toks = tokens(Field::Memory, raw, 2)?;
    Ok(Quantity {
        amount: parse_int(Field::Memory, raw, toks[0])?,
        unit: toks[1].to_string(),
    })
}

/// Bandwidth amounts may be fractional (`2.5 TB`).
pub fn parse_bandwidth(raw: &str) -> Result<Quantity<f64>, ParseError> {
    let toks = tokens(Field::Bandwidth, raw, 2)?;
    Ok(Quantity {
        amount: parse_float(Field::Bandwidth, raw, toks[0])?,
        unit: toks[1].to_string(),
    })
}

/// Pull the monthly (first) and hourly (second) figures out of a price blob
/// such as `$5.00/mo ($0.007/hr)`. Fails when fewer than `min_numbers` figures
/// are present.
pub fn parse_price(raw: &str, min_numbers: usize) -> Result<Price, ParseError> {
    let numbers: Vec<&str> = PRICE_NUMBER.find_iter(raw).map(|m| m.as_str()).collect();
    if numbers.len() < min_numbers.max(1) {
        return Err(ParseError::new(
            Field::Price,
            raw,
            Reason::TooFewNumbers {
                expected: min_numbers.max(1),
                found: numbers.len(),
            },
        ));
    }

    let monthly = parse_float(Field::Price, raw, numbers[0])?;
    let hourly = match numbers.get(1) {
        Some(n) => Some(parse_float(Field::Price, raw, n)?),
        None => None,
    };
    Ok(Price { monthly, hourly })
}
