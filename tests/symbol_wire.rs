//! Symbol wire format tests
//!
//! Round trips symbols produced by real analysis and hand-built trees
//! through the binary codec, and checks that corrupt input is rejected
//! with an error instead of a panic.

mod common;

use chrono::{NaiveDate, NaiveTime};
use common::{SelectBuilder, analyze_select, setup};
use rust_decimal::Decimal;
use std::net::IpAddr;
use stratum_sql::Error;
use stratum_sql::ast::{Expression, Literal as AstLiteral, Operator, ParameterExpression};
use stratum_sql::semantic::Symbol;
use stratum_sql::semantic::symbol::{
    Field, FunctionCall, Literal, Parameter, Reference, ReferenceIdent,
};
use stratum_sql::semantic::wire::{from_bytes, to_bytes};
use stratum_sql::types::schema::{ColumnIdent, RelationName};
use stratum_sql::types::{DataType, Value};
use uuid::Uuid;

#[test]
fn test_null_symbol_is_a_single_byte() {
    let bytes = to_bytes(&Symbol::NULL);
    assert_eq!(bytes.len(), 1);
    assert_eq!(from_bytes(&bytes).unwrap(), Symbol::NULL);
}

#[test]
fn test_analyzed_predicate_round_trips() {
    let ctx = setup();

    let query = analyze_select(
        &ctx,
        SelectBuilder::new()
            .item(Expression::column("id"))
            .from_table("users")
            .filter(
                Operator::And(
                    Box::new(
                        Operator::Equal(
                            Box::new(Expression::column("active")),
                            Box::new(AstLiteral::Boolean(true).into()),
                        )
                        .into(),
                    ),
                    Box::new(
                        Operator::Equal(
                            Box::new(Expression::column("name")),
                            Box::new(Expression::Parameter(ParameterExpression::new(0))),
                        )
                        .into(),
                    ),
                )
                .into(),
            )
            .build(),
    )
    .unwrap();

    let predicate = query.where_clause().unwrap();
    let decoded = from_bytes(&to_bytes(predicate)).unwrap();
    assert_eq!(&decoded, predicate);

    // the decoded tree still carries the untyped parameter
    let Symbol::Function(and) = &decoded else {
        panic!("expected the AND call");
    };
    let Symbol::Function(eq) = &and.args[1] else {
        panic!("expected the second comparison");
    };
    assert_eq!(
        eq.args[1],
        Symbol::Parameter(Parameter::new(0, DataType::Null))
    );
}

#[test]
fn test_every_symbol_kind_round_trips() {
    let symbol = Symbol::Function(FunctionCall::new(
        "coalesce",
        vec![
            Symbol::Reference(Reference::new(
                ReferenceIdent::new(
                    RelationName::new("doc", "users"),
                    ColumnIdent::with_path("address", vec!["city".to_string()]),
                ),
                DataType::Text,
                true,
            )),
            Symbol::Field(Field::new("fallback", 2, DataType::Text)),
            Symbol::Parameter(Parameter::new(4, DataType::Text)),
            Symbol::Literal(Literal::new(Value::string("unknown"), DataType::Text).unwrap()),
            Symbol::NULL,
        ],
        DataType::Text,
    ));
    assert_eq!(from_bytes(&to_bytes(&symbol)).unwrap(), symbol);
}

#[test]
fn test_value_payloads_round_trip() {
    let values = vec![
        Value::Bool(false),
        Value::I16(-32768),
        Value::I32(1 << 30),
        Value::I64(i64::MIN),
        Value::F32(1.5),
        Value::F64(-0.125),
        Value::Decimal(Decimal::new(-123_456, 3)),
        Value::string("snow ☃ and 'quotes'"),
        Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
        Value::Time(NaiveTime::from_hms_nano_opt(23, 59, 59, 123_456_789).unwrap()),
        Value::Timestamp(
            NaiveDate::from_ymd_opt(1969, 7, 20)
                .unwrap()
                .and_hms_opt(20, 17, 40)
                .unwrap(),
        ),
        Value::Uuid(Uuid::from_u128(0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10)),
        Value::Bytea(vec![0x00, 0xff, 0x7f]),
        Value::Inet("192.168.0.1".parse::<IpAddr>().unwrap()),
        Value::Inet("::1".parse::<IpAddr>().unwrap()),
    ];
    for value in values {
        let data_type = value.data_type();
        let symbol = Symbol::Literal(Literal::new(value, data_type).unwrap());
        assert_eq!(from_bytes(&to_bytes(&symbol)).unwrap(), symbol, "{symbol:?}");
    }
}

#[test]
fn test_truncation_is_an_error_at_every_length() {
    let symbol = Symbol::Function(FunctionCall::new(
        "=",
        vec![
            Symbol::Reference(Reference::new(
                ReferenceIdent::new(RelationName::new("doc", "users"), ColumnIdent::new("id")),
                DataType::I64,
                false,
            )),
            Symbol::Literal(Literal::new(Value::I64(42), DataType::I64).unwrap()),
        ],
        DataType::Bool,
    ));
    let bytes = to_bytes(&symbol);
    for cut in 0..bytes.len() {
        assert!(
            matches!(from_bytes(&bytes[..cut]), Err(Error::Serialization(_))),
            "prefix of {cut} bytes must not decode"
        );
    }
}

#[test]
fn test_corrupt_tags_are_rejected() {
    // unknown symbol kind
    assert!(matches!(from_bytes(&[0xAA]), Err(Error::Serialization(_))));

    // a literal claiming the null type is invalid on the wire; NULL has its
    // own kind tag
    assert!(matches!(
        from_bytes(&[0x01, 0x10]),
        Err(Error::Serialization(_))
    ));
}

#[test]
fn test_out_of_range_temporal_payloads_are_rejected() {
    // day counts the epoch offset or an i32 cannot absorb
    for days in [i64::MAX, i64::MIN, 1_i64 << 32] {
        let mut bytes = vec![0x01, 0x0A];
        bytes.extend_from_slice(&days.to_le_bytes());
        assert!(
            matches!(from_bytes(&bytes), Err(Error::Serialization(_))),
            "{days} days must not decode"
        );
    }

    // past the last second of the day, or a fraction past the leap second
    for (secs, nanos) in [(86_400_u32, 0_u32), (u32::MAX, 0), (0, 2_000_000_000)] {
        let mut bytes = vec![0x01, 0x0B];
        bytes.extend_from_slice(&secs.to_le_bytes());
        bytes.extend_from_slice(&nanos.to_le_bytes());
        assert!(
            matches!(from_bytes(&bytes), Err(Error::Serialization(_))),
            "{secs}s + {nanos}ns must not decode"
        );
    }
}

#[test]
fn test_leap_second_time_round_trips() {
    let time = NaiveTime::from_hms_nano_opt(23, 59, 59, 1_500_000_000).unwrap();
    let symbol = Symbol::Literal(Literal::new(Value::Time(time), DataType::Time).unwrap());
    assert_eq!(from_bytes(&to_bytes(&symbol)).unwrap(), symbol);
}

#[test]
fn test_literal_never_holds_null() {
    assert!(Literal::new(Value::Null, DataType::I64).is_err());
    assert!(Literal::new(Value::I64(0), DataType::Null).is_err());
    assert_eq!(Symbol::from_value(Value::Null), Symbol::NULL);
}
