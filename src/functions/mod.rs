//! SQL function definitions and registry
//!
//! This module provides a trait-based architecture for SQL functions.
//! Analysis only needs metadata and type validation; evaluation lives with
//! the execution engine. Operators are registered as functions under their
//! symbolic names ("=", "and", ...) so expression analysis treats both
//! uniformly.

use crate::error::{Error, Result};
use crate::types::data_type::DataType;
use std::collections::HashMap;
use std::sync::LazyLock;

mod aggregate;
mod operator;
mod scalar;

/// Metadata about a function's signature
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    /// Canonical function name (lowercase)
    pub name: &'static str,
    /// Minimum number of arguments
    pub min_args: usize,
    /// Maximum number of arguments. None means variadic.
    pub max_args: Option<usize>,
    /// Whether this is an aggregate function
    pub is_aggregate: bool,
}

/// Trait for SQL functions
pub trait Function: Send + Sync {
    /// Get the function's signature
    fn signature(&self) -> &FunctionSignature;

    /// Validate argument types and return the result type
    fn validate(&self, arg_types: &[DataType]) -> Result<DataType>;
}

/// Registry of all available SQL functions
pub struct FunctionRegistry {
    functions: HashMap<String, Box<dyn Function>>,
}

impl FunctionRegistry {
    /// Create a new function registry with all builtin functions
    fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        scalar::register(&mut registry);
        aggregate::register(&mut registry);
        operator::register(&mut registry);

        registry
    }

    /// Register a function
    fn register(&mut self, function: Box<dyn Function>) {
        let name = function.signature().name.to_string();
        self.functions.insert(name, function);
    }
}

// Global static registry
static REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::new);

/// Look up a function by name. Lookup is case-insensitive; the canonical
/// names are lowercase.
pub fn get_function(name: &str) -> Option<&'static dyn Function> {
    REGISTRY
        .functions
        .get(&name.to_lowercase())
        .map(|f| f.as_ref())
}

/// Check if a function is an aggregate
pub fn is_aggregate(name: &str) -> bool {
    get_function(name)
        .map(|f| f.signature().is_aggregate)
        .unwrap_or(false)
}

/// Validate a call's argument types and return its result type
pub fn validate_function(name: &str, arg_types: &[DataType]) -> Result<DataType> {
    let Some(func) = get_function(name) else {
        return Err(Error::UnknownFunction(name.to_string()));
    };

    let signature = func.signature();
    let count = arg_types.len();
    if count < signature.min_args || signature.max_args.is_some_and(|max| count > max) {
        return Err(Error::InvalidValue(format!(
            "{} takes {}, got {}",
            signature.name,
            describe_arity(signature),
            count
        )));
    }

    func.validate(arg_types)
}

fn describe_arity(signature: &FunctionSignature) -> String {
    match (signature.min_args, signature.max_args) {
        (min, Some(max)) if min == max && min == 1 => "exactly 1 argument".to_string(),
        (min, Some(max)) if min == max => format!("exactly {} arguments", min),
        (min, Some(max)) => format!("between {} and {} arguments", min, max),
        (min, None) => format!("at least {} argument(s)", min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(get_function("count").is_some());
        assert!(get_function("COUNT").is_some());
        assert!(get_function("Upper").is_some());
        assert!(get_function("no_such_fn").is_none());
    }

    #[test]
    fn test_aggregate_flag() {
        assert!(is_aggregate("count"));
        assert!(is_aggregate("SUM"));
        assert!(!is_aggregate("upper"));
        assert!(!is_aggregate("="));
        assert!(!is_aggregate("unknown"));
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            validate_function("frobnicate", &[]).unwrap_err(),
            Error::UnknownFunction("frobnicate".into())
        );
    }

    #[test]
    fn test_arity_check() {
        let err = validate_function("upper", &[]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidValue("upper takes exactly 1 argument, got 0".into())
        );

        let err = validate_function("=", &[DataType::I64]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidValue("= takes exactly 2 arguments, got 1".into())
        );
    }
}
