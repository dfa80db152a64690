//! Scalar functions: upper, lower, length, abs, coalesce

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(UpperFunction));
    registry.register(Box::new(LowerFunction));
    registry.register(Box::new(LengthFunction));
    registry.register(Box::new(AbsFunction));
    registry.register(Box::new(CoalesceFunction));
}

fn check_string(arg: &DataType, name: &str) -> Result<()> {
    if arg.is_string() || *arg == DataType::Null {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            expected: format!("string argument for {}", name),
            found: arg.to_string(),
        })
    }
}

/// UPPER function: converts a string to upper case
pub struct UpperFunction;

static UPPER_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "upper",
    min_args: 1,
    max_args: Some(1),
    is_aggregate: false,
};

impl Function for UpperFunction {
    fn signature(&self) -> &FunctionSignature {
        &UPPER_SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        check_string(&arg_types[0], "upper")?;
        if arg_types[0] == DataType::Null {
            return Ok(DataType::Null);
        }
        Ok(DataType::Text)
    }
}

/// LOWER function: converts a string to lower case
pub struct LowerFunction;

static LOWER_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "lower",
    min_args: 1,
    max_args: Some(1),
    is_aggregate: false,
};

impl Function for LowerFunction {
    fn signature(&self) -> &FunctionSignature {
        &LOWER_SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        check_string(&arg_types[0], "lower")?;
        if arg_types[0] == DataType::Null {
            return Ok(DataType::Null);
        }
        Ok(DataType::Text)
    }
}

/// LENGTH function: character length of a string
pub struct LengthFunction;

static LENGTH_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "length",
    min_args: 1,
    max_args: Some(1),
    is_aggregate: false,
};

impl Function for LengthFunction {
    fn signature(&self) -> &FunctionSignature {
        &LENGTH_SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        check_string(&arg_types[0], "length")?;
        if arg_types[0] == DataType::Null {
            return Ok(DataType::Null);
        }
        Ok(DataType::I64)
    }
}

/// ABS function: absolute value, preserving the argument type
pub struct AbsFunction;

static ABS_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "abs",
    min_args: 1,
    max_args: Some(1),
    is_aggregate: false,
};

impl Function for AbsFunction {
    fn signature(&self) -> &FunctionSignature {
        &ABS_SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        let arg = &arg_types[0];
        if arg.is_numeric() || *arg == DataType::Null {
            Ok(arg.clone())
        } else {
            Err(Error::TypeMismatch {
                expected: "numeric argument for abs".to_string(),
                found: arg.to_string(),
            })
        }
    }
}

/// COALESCE function: first non-null argument
///
/// The result type is the type of the first argument that is not NULL.
/// Every other non-null argument must agree with it.
pub struct CoalesceFunction;

static COALESCE_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "coalesce",
    min_args: 1,
    max_args: None,
    is_aggregate: false,
};

impl Function for CoalesceFunction {
    fn signature(&self) -> &FunctionSignature {
        &COALESCE_SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        let mut result = DataType::Null;
        for arg in arg_types {
            if *arg == DataType::Null {
                continue;
            }
            if result == DataType::Null {
                result = arg.clone();
            } else if !compatible(&result, arg) {
                return Err(Error::TypeMismatch {
                    expected: result.to_string(),
                    found: arg.to_string(),
                });
            }
        }
        Ok(result)
    }
}

fn compatible(a: &DataType, b: &DataType) -> bool {
    a == b
        || (a.is_string() && b.is_string())
        || (a.is_numeric() && b.is_numeric())
        || matches!((a, b), (DataType::Decimal(_, _), DataType::Decimal(_, _)))
}
