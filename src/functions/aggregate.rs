//! Aggregate functions: count, sum, avg, min, max

use super::{Function, FunctionRegistry, FunctionSignature};
use crate::error::{Error, Result};
use crate::types::data_type::DataType;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register(Box::new(CountFunction));
    registry.register(Box::new(SumFunction));
    registry.register(Box::new(AvgFunction));
    registry.register(Box::new(MinFunction));
    registry.register(Box::new(MaxFunction));
}

/// COUNT aggregate. With no arguments it counts rows (the COUNT(*) form),
/// with one argument it counts non-null values.
pub struct CountFunction;

static COUNT_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "count",
    min_args: 0,
    max_args: Some(1),
    is_aggregate: true,
};

impl Function for CountFunction {
    fn signature(&self) -> &FunctionSignature {
        &COUNT_SIGNATURE
    }

    fn validate(&self, _arg_types: &[DataType]) -> Result<DataType> {
        Ok(DataType::I64)
    }
}

/// SUM aggregate. Integer arguments widen to BIGINT, floating point
/// arguments widen to DOUBLE PRECISION, DECIMAL stays DECIMAL.
pub struct SumFunction;

static SUM_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "sum",
    min_args: 1,
    max_args: Some(1),
    is_aggregate: true,
};

impl Function for SumFunction {
    fn signature(&self) -> &FunctionSignature {
        &SUM_SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        match &arg_types[0] {
            DataType::I16 | DataType::I32 | DataType::I64 => Ok(DataType::I64),
            DataType::F32 | DataType::F64 => Ok(DataType::F64),
            DataType::Decimal(_, _) => Ok(DataType::Decimal(None, None)),
            DataType::Null => Ok(DataType::Null),
            other => Err(Error::TypeMismatch {
                expected: "numeric argument for sum".to_string(),
                found: other.to_string(),
            }),
        }
    }
}

/// AVG aggregate. The mean of any numeric argument is DOUBLE PRECISION.
pub struct AvgFunction;

static AVG_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "avg",
    min_args: 1,
    max_args: Some(1),
    is_aggregate: true,
};

impl Function for AvgFunction {
    fn signature(&self) -> &FunctionSignature {
        &AVG_SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        match &arg_types[0] {
            t if t.is_numeric() => Ok(DataType::F64),
            DataType::Null => Ok(DataType::Null),
            other => Err(Error::TypeMismatch {
                expected: "numeric argument for avg".to_string(),
                found: other.to_string(),
            }),
        }
    }
}

fn check_orderable(arg: &DataType, name: &str) -> Result<()> {
    let orderable = arg.is_numeric()
        || arg.is_string()
        || matches!(
            arg,
            DataType::Date
                | DataType::Time
                | DataType::Timestamp
                | DataType::Uuid
                | DataType::Inet
                | DataType::Null
        );
    if orderable {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            expected: format!("orderable argument for {}", name),
            found: arg.to_string(),
        })
    }
}

/// MIN aggregate, preserving the argument type
pub struct MinFunction;

static MIN_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "min",
    min_args: 1,
    max_args: Some(1),
    is_aggregate: true,
};

impl Function for MinFunction {
    fn signature(&self) -> &FunctionSignature {
        &MIN_SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        check_orderable(&arg_types[0], "min")?;
        Ok(arg_types[0].clone())
    }
}

/// MAX aggregate, preserving the argument type
pub struct MaxFunction;

static MAX_SIGNATURE: FunctionSignature = FunctionSignature {
    name: "max",
    min_args: 1,
    max_args: Some(1),
    is_aggregate: true,
};

impl Function for MaxFunction {
    fn signature(&self) -> &FunctionSignature {
        &MAX_SIGNATURE
    }

    fn validate(&self, arg_types: &[DataType]) -> Result<DataType> {
        check_orderable(&arg_types[0], "max")?;
        Ok(arg_types[0].clone())
    }
}
