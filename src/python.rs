//! Python bindings
//!
//! Clause trees cross the boundary as JSON text, in the same externally
//! tagged shape `serde` gives the Rust types.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::clause::{serialize, Clause};
use crate::config::{FilterKind, ParseOptions};
use crate::grammar;

fn filter_kind(kind: &str) -> PyResult<FilterKind> {
    kind.parse::<FilterKind>().map_err(PyValueError::new_err)
}

// ============================================================================
// Python Functions
// ============================================================================

/// Parse a filter expression and return the clause tree as JSON
///
/// # Arguments
/// * `kind` - One of "string", "number", "boolean", "date"
/// * `source` - The filter expression
/// * `max_depth` - Optional nesting limit (default 64)
#[pyfunction]
#[pyo3(signature = (kind, source, max_depth=None))]
fn parse_filter(kind: &str, source: &str, max_depth: Option<usize>) -> PyResult<String> {
    let kind = filter_kind(kind)?;
    let mut options = ParseOptions::default();
    if let Some(max_depth) = max_depth {
        options.max_depth = max_depth;
    }

    let clause = grammar::parse_with_options(kind, source, &options)?;
    serde_json::to_string(&clause)
        .map_err(|e| PyValueError::new_err(format!("Failed to encode clause: {}", e)))
}

/// Render a JSON clause tree as canonical filter text
#[pyfunction]
fn serialize_filter(clause: &str) -> PyResult<String> {
    let clause: Clause = serde_json::from_str(clause)
        .map_err(|e| PyValueError::new_err(format!("Invalid clause: {}", e)))?;
    Ok(serialize(&clause))
}

/// Parse and then verify the canonical form parses to the same tree
#[pyfunction]
fn check_filter(kind: &str, source: &str) -> PyResult<String> {
    let clause = grammar::check_unambiguous(filter_kind(kind)?, source)?;
    Ok(serialize(&clause))
}

/// Split an option token into `(is, type)`
#[pyfunction]
fn negate_option(token: &str) -> (bool, String) {
    let option = crate::option::negate_option(token);
    (option.is, option.option_type)
}

// ============================================================================
// Python Module Definition
// ============================================================================

#[pymodule]
fn filter_clause_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_filter, m)?)?;
    m.add_function(wrap_pyfunction!(serialize_filter, m)?)?;
    m.add_function(wrap_pyfunction!(check_filter, m)?)?;
    m.add_function(wrap_pyfunction!(negate_option, m)?)?;
    Ok(())
}
