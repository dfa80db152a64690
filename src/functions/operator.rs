//! Operator functions
//!
//! Comparison, logic and arithmetic operators are plain functions keyed by
//! their symbolic names, so `a + b` analyzes as the call `+(a, b)`.

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;

pub(super) fn register(registry: &mut FunctionRegistry) {
    for name in ["=", "<>", "<", "<=", ">", ">="] {
        registry.register(Box::new(ComparisonOperator::new(name)));
    }
    registry.register(Box::new(LogicOperator::new("and")));
    registry.register(Box::new(LogicOperator::new("or")));
    registry.register(Box::new(NotOperator));
    for name in ["+", "-", "*", "/", "%"] {
        registry.register(Box::new(ArithmeticOperator::new(name)));
    }
}

fn binary_signature(name: &'static str) -> FunctionSignature {
    FunctionSignature {
        name,
        min_args: 2,
        max_args: Some(2),
        is_aggregate: false,
    }
}

/// Comparison operators yield BOOLEAN for any pair of comparable types
pub struct ComparisonOperator {
    signature: FunctionSignature,
}

impl ComparisonOperator {
    fn new(name: &'static str) -> Self {
        Self {
            signature: binary_signature(name),
        }
    }
}

impl Function for ComparisonOperator {
    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        let (left, right) = (&arg_types[0], &arg_types[1]);
        if comparable(left, right) {
            Ok(DataType::Bool)
        } else {
            Err(Error::TypeMismatch {
                expected: left.to_string(),
                found: right.to_string(),
            })
        }
    }
}

fn comparable(left: &DataType, right: &DataType) -> bool {
    *left == DataType::Null
        || *right == DataType::Null
        || left == right
        || (left.is_numeric() && right.is_numeric())
        || (left.is_string() && right.is_string())
        || matches!((left, right), (DataType::Decimal(_, _), DataType::Decimal(_, _)))
}

/// AND / OR take boolean operands and yield BOOLEAN
pub struct LogicOperator {
    signature: FunctionSignature,
}

impl LogicOperator {
    fn new(name: &'static str) -> Self {
        Self {
            signature: binary_signature(name),
        }
    }
}

impl Function for LogicOperator {
    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        for arg in arg_types {
            check_boolean(arg)?;
        }
        Ok(DataType::Bool)
    }
}

/// NOT takes one boolean operand and yields BOOLEAN
pub struct NotOperator;

static NOT_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "not",
    min_args: 1,
    max_args: Some(1),
    is_aggregate: false,
};

impl Function for NotOperator {
    fn signature(&self) -> &FunctionSignature {
        &NOT_SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        check_boolean(&arg_types[0])?;
        Ok(DataType::Bool)
    }
}

fn check_boolean(arg: &DataType) -> Result<()> {
    if matches!(arg, DataType::Bool | DataType::Null) {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            expected: DataType::Bool.to_string(),
            found: arg.to_string(),
        })
    }
}

/// Arithmetic operators on numeric operands, widening to the larger type
pub struct ArithmeticOperator {
    signature: FunctionSignature,
}

impl ArithmeticOperator {
    fn new(name: &'static str) -> Self {
        Self {
            signature: binary_signature(name),
        }
    }
}

impl Function for ArithmeticOperator {
    fn signature(&self) -> &FunctionSignature {
        &self.signature
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        numeric_result(&arg_types[0], &arg_types[1])
    }
}

/// Widening order for mixed arithmetic, widest first
fn numeric_rank(t: &DataType) -> Option<u8> {
    match t {
        DataType::F64 => Some(6),
        DataType::F32 => Some(5),
        DataType::Decimal(_, _) => Some(4),
        DataType::I64 => Some(3),
        DataType::I32 => Some(2),
        DataType::I16 => Some(1),
        _ => None,
    }
}

fn numeric_result(left: &DataType, right: &DataType) -> Result<DataType> {
    if *left == DataType::Null || *right == DataType::Null {
        return Ok(DataType::Null);
    }
    let (Some(lr), Some(rr)) = (numeric_rank(left), numeric_rank(right)) else {
        let offender = if numeric_rank(left).is_none() {
            left
        } else {
            right
        };
        return Err(Error::TypeMismatch {
            expected: "numeric operand".to_string(),
            found: offender.to_string(),
        });
    };
    if lr >= rr {
        Ok(left.clone())
    } else {
        Ok(right.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::functions::validate_function;
    use crate::types::data_type::DataType;

    #[test]
    fn test_comparisons_yield_boolean() {
        for op in ["=", "<>", "<", "<=", ">", ">="] {
            assert_eq!(
                validate_function(op, &[DataType::I64, DataType::I32]).unwrap(),
                DataType::Bool
            );
        }
        assert_eq!(
            validate_function("=", &[DataType::Str, DataType::Text]).unwrap(),
            DataType::Bool
        );
        assert_eq!(
            validate_function("=", &[DataType::Bool, DataType::Bool]).unwrap(),
            DataType::Bool
        );
        assert!(validate_function("=", &[DataType::I64, DataType::Str]).is_err());
    }

    #[test]
    fn test_comparison_against_null() {
        assert_eq!(
            validate_function("<", &[DataType::Null, DataType::I64]).unwrap(),
            DataType::Bool
        );
    }

    #[test]
    fn test_logic_operators() {
        assert_eq!(
            validate_function("and", &[DataType::Bool, DataType::Bool]).unwrap(),
            DataType::Bool
        );
        assert_eq!(
            validate_function("or", &[DataType::Bool, DataType::Null]).unwrap(),
            DataType::Bool
        );
        assert_eq!(
            validate_function("not", &[DataType::Bool]).unwrap(),
            DataType::Bool
        );
        assert!(validate_function("and", &[DataType::Bool, DataType::I64]).is_err());
        assert!(validate_function("not", &[DataType::Str]).is_err());
    }

    #[test]
    fn test_arithmetic_widens() {
        assert_eq!(
            validate_function("+", &[DataType::I16, DataType::I64]).unwrap(),
            DataType::I64
        );
        assert_eq!(
            validate_function("*", &[DataType::I64, DataType::F64]).unwrap(),
            DataType::F64
        );
        assert_eq!(
            validate_function("-", &[DataType::I32, DataType::I32]).unwrap(),
            DataType::I32
        );
        assert_eq!(
            validate_function("%", &[DataType::Decimal(None, None), DataType::I64]).unwrap(),
            DataType::Decimal(None, None)
        );
        assert!(validate_function("/", &[DataType::I64, DataType::Str]).is_err());
    }

    #[test]
    fn test_arithmetic_null_propagates() {
        assert_eq!(
            validate_function("+", &[DataType::Null, DataType::I64]).unwrap(),
            DataType::Null
        );
    }
}
