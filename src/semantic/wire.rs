//! Binary wire codec for symbols
//!
//! Analyzed symbols travel between coordinator and data nodes, so they have
//! a deterministic self-describing encoding independent of any in-memory
//! representation. Layout: one kind tag byte per symbol, one tag byte per
//! data type, all integers little-endian, strings as u32 length + UTF-8
//! bytes, booleans as a single 0/1 byte.
//!
//! Corrupt input is an error, never a panic: unknown tags and truncated
//! payloads decode to [`Error::Serialization`].

use crate::error::{Error, Result};
use crate::semantic::symbol::{
    Field, FunctionCall, Literal, Parameter, Reference, ReferenceIdent, Symbol,
};
use crate::types::data_type::DataType;
use crate::types::schema::{ColumnIdent, RelationName};
use crate::types::value::Value;
use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use std::io::{Cursor, Read};
use uuid::Uuid;

// Symbol kind tags
const TAG_LITERAL: u8 = 0x01;
const TAG_NULL: u8 = 0x02;
const TAG_REFERENCE: u8 = 0x03;
const TAG_FUNCTION: u8 = 0x04;
const TAG_FIELD: u8 = 0x05;
const TAG_PARAMETER: u8 = 0x06;

// Data type tags
const TYPE_BOOL: u8 = 0x01;
const TYPE_I16: u8 = 0x02;
const TYPE_I32: u8 = 0x03;
const TYPE_I64: u8 = 0x04;
const TYPE_F32: u8 = 0x05;
const TYPE_F64: u8 = 0x06;
const TYPE_DECIMAL: u8 = 0x07;
const TYPE_STR: u8 = 0x08;
const TYPE_TEXT: u8 = 0x09;
const TYPE_DATE: u8 = 0x0A;
const TYPE_TIME: u8 = 0x0B;
const TYPE_TIMESTAMP: u8 = 0x0C;
const TYPE_UUID: u8 = 0x0D;
const TYPE_BYTEA: u8 = 0x0E;
const TYPE_INET: u8 = 0x0F;
const TYPE_NULL: u8 = 0x10;

// Days from 0001-01-01 (CE) to 1970-01-01, dates are stored relative to the
// Unix epoch
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Encode a symbol into a fresh buffer
pub fn to_bytes(symbol: &Symbol) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_symbol(symbol, &mut buf);
    buf
}

/// Decode a symbol from a byte slice
pub fn from_bytes(bytes: &[u8]) -> Result<Symbol> {
    let mut cursor = Cursor::new(bytes);
    decode_symbol(&mut cursor)
}

/// Append a symbol's wire encoding to `buf`
pub fn encode_symbol(symbol: &Symbol, buf: &mut Vec<u8>) {
    match symbol {
        Symbol::Literal(literal) => {
            // Literal construction rejects NULL, which keeps the Null kind
            // tag the only encoding of NULL
            debug_assert!(*literal.data_type() != DataType::Null);
            buf.push(TAG_LITERAL);
            encode_data_type(literal.data_type(), buf);
            encode_value(literal.value(), buf);
        }
        Symbol::Null => buf.push(TAG_NULL),
        Symbol::Reference(reference) => {
            buf.push(TAG_REFERENCE);
            write_string(&reference.ident.relation.schema, buf);
            write_string(&reference.ident.relation.name, buf);
            write_string(&reference.ident.column.name, buf);
            write_u32(reference.ident.column.path.len() as u32, buf);
            for segment in &reference.ident.column.path {
                write_string(segment, buf);
            }
            encode_data_type(&reference.data_type, buf);
            buf.push(reference.nullable as u8);
        }
        Symbol::Function(function) => {
            buf.push(TAG_FUNCTION);
            write_string(&function.name, buf);
            encode_data_type(&function.data_type, buf);
            write_u32(function.args.len() as u32, buf);
            for arg in &function.args {
                encode_symbol(arg, buf);
            }
        }
        Symbol::Field(field) => {
            buf.push(TAG_FIELD);
            write_string(&field.name, buf);
            write_u32(field.index as u32, buf);
            encode_data_type(&field.data_type, buf);
        }
        Symbol::Parameter(parameter) => {
            buf.push(TAG_PARAMETER);
            write_u32(parameter.index as u32, buf);
            encode_data_type(&parameter.data_type, buf);
        }
    }
}

/// Decode one symbol starting at the cursor position
pub fn decode_symbol(cursor: &mut Cursor<&[u8]>) -> Result<Symbol> {
    let tag = read_u8(cursor)?;
    match tag {
        TAG_LITERAL => {
            let data_type = decode_data_type(cursor)?;
            let value = decode_value(&data_type, cursor)?;
            Ok(Symbol::Literal(Literal::new(value, data_type)?))
        }
        // The type is fully determined by the kind tag; nothing follows
        TAG_NULL => Ok(Symbol::NULL),
        TAG_REFERENCE => {
            let schema = read_string(cursor)?;
            let name = read_string(cursor)?;
            let column = read_string(cursor)?;
            let segments = read_u32(cursor)? as usize;
            let mut path = Vec::with_capacity(segments.min(64));
            for _ in 0..segments {
                path.push(read_string(cursor)?);
            }
            let data_type = decode_data_type(cursor)?;
            let nullable = read_u8(cursor)? != 0;
            Ok(Symbol::Reference(Reference::new(
                ReferenceIdent::new(
                    RelationName::new(schema, name),
                    ColumnIdent::with_path(column, path),
                ),
                data_type,
                nullable,
            )))
        }
        TAG_FUNCTION => {
            let name = read_string(cursor)?;
            let data_type = decode_data_type(cursor)?;
            let argc = read_u32(cursor)? as usize;
            let mut args = Vec::with_capacity(argc.min(64));
            for _ in 0..argc {
                args.push(decode_symbol(cursor)?);
            }
            Ok(Symbol::Function(FunctionCall::new(name, args, data_type)))
        }
        TAG_FIELD => {
            let name = read_string(cursor)?;
            let index = read_u32(cursor)? as usize;
            let data_type = decode_data_type(cursor)?;
            Ok(Symbol::Field(Field::new(name, index, data_type)))
        }
        TAG_PARAMETER => {
            let index = read_u32(cursor)? as usize;
            let data_type = decode_data_type(cursor)?;
            Ok(Symbol::Parameter(Parameter::new(index, data_type)))
        }
        other => Err(Error::Serialization(format!(
            "unknown symbol tag: {:#04x}",
            other
        ))),
    }
}

fn encode_data_type(data_type: &DataType, buf: &mut Vec<u8>) {
    match data_type {
        DataType::Bool => buf.push(TYPE_BOOL),
        DataType::I16 => buf.push(TYPE_I16),
        DataType::I32 => buf.push(TYPE_I32),
        DataType::I64 => buf.push(TYPE_I64),
        DataType::F32 => buf.push(TYPE_F32),
        DataType::F64 => buf.push(TYPE_F64),
        DataType::Decimal(precision, scale) => {
            buf.push(TYPE_DECIMAL);
            write_opt_u32(precision, buf);
            write_opt_u32(scale, buf);
        }
        DataType::Str => buf.push(TYPE_STR),
        DataType::Text => buf.push(TYPE_TEXT),
        DataType::Date => buf.push(TYPE_DATE),
        DataType::Time => buf.push(TYPE_TIME),
        DataType::Timestamp => buf.push(TYPE_TIMESTAMP),
        DataType::Uuid => buf.push(TYPE_UUID),
        DataType::Bytea => buf.push(TYPE_BYTEA),
        DataType::Inet => buf.push(TYPE_INET),
        DataType::Null => buf.push(TYPE_NULL),
    }
}

fn decode_data_type(cursor: &mut Cursor<&[u8]>) -> Result<DataType> {
    let tag = read_u8(cursor)?;
    match tag {
        TYPE_BOOL => Ok(DataType::Bool),
        TYPE_I16 => Ok(DataType::I16),
        TYPE_I32 => Ok(DataType::I32),
        TYPE_I64 => Ok(DataType::I64),
        TYPE_F32 => Ok(DataType::F32),
        TYPE_F64 => Ok(DataType::F64),
        TYPE_DECIMAL => {
            let precision = read_opt_u32(cursor)?;
            let scale = read_opt_u32(cursor)?;
            Ok(DataType::Decimal(precision, scale))
        }
        TYPE_STR => Ok(DataType::Str),
        TYPE_TEXT => Ok(DataType::Text),
        TYPE_DATE => Ok(DataType::Date),
        TYPE_TIME => Ok(DataType::Time),
        TYPE_TIMESTAMP => Ok(DataType::Timestamp),
        TYPE_UUID => Ok(DataType::Uuid),
        TYPE_BYTEA => Ok(DataType::Bytea),
        TYPE_INET => Ok(DataType::Inet),
        TYPE_NULL => Ok(DataType::Null),
        other => Err(Error::Serialization(format!(
            "unknown data type tag: {:#04x}",
            other
        ))),
    }
}

fn encode_value(value: &Value, buf: &mut Vec<u8>) {
    match value {
        // Never reached for literals; the null symbol has its own kind tag
        Value::Null => {}
        Value::Bool(b) => buf.push(*b as u8),
        Value::I16(i) => buf.extend_from_slice(&i.to_le_bytes()),
        Value::I32(i) => buf.extend_from_slice(&i.to_le_bytes()),
        Value::I64(i) => buf.extend_from_slice(&i.to_le_bytes()),
        Value::F32(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::F64(v) => buf.extend_from_slice(&v.to_le_bytes()),
        Value::Decimal(d) => {
            buf.extend_from_slice(&d.mantissa().to_le_bytes());
            write_u32(d.scale(), buf);
        }
        Value::Str(s) => write_string(s, buf),
        Value::Date(date) => {
            let days = date.num_days_from_ce() as i64 - UNIX_EPOCH_DAYS_FROM_CE;
            buf.extend_from_slice(&days.to_le_bytes());
        }
        Value::Time(time) => {
            // The nanosecond part is written verbatim so leap-second times
            // (nanosecond() >= 10^9) survive the trip
            write_u32(time.num_seconds_from_midnight(), buf);
            write_u32(time.nanosecond(), buf);
        }
        Value::Timestamp(ts) => {
            let utc = ts.and_utc();
            buf.extend_from_slice(&utc.timestamp().to_le_bytes());
            write_u32(utc.timestamp_subsec_nanos(), buf);
        }
        Value::Uuid(u) => buf.extend_from_slice(u.as_bytes()),
        Value::Bytea(bytes) => {
            write_u32(bytes.len() as u32, buf);
            buf.extend_from_slice(bytes);
        }
        Value::Inet(ip) => match ip {
            std::net::IpAddr::V4(v4) => {
                buf.push(4);
                buf.extend_from_slice(&v4.octets());
            }
            std::net::IpAddr::V6(v6) => {
                buf.push(6);
                buf.extend_from_slice(&v6.octets());
            }
        },
    }
}

fn decode_value(data_type: &DataType, cursor: &mut Cursor<&[u8]>) -> Result<Value> {
    match data_type {
        DataType::Bool => Ok(Value::Bool(read_u8(cursor)? != 0)),
        DataType::I16 => Ok(Value::I16(i16::from_le_bytes(read_array(cursor)?))),
        DataType::I32 => Ok(Value::I32(i32::from_le_bytes(read_array(cursor)?))),
        DataType::I64 => Ok(Value::I64(i64::from_le_bytes(read_array(cursor)?))),
        DataType::F32 => Ok(Value::F32(f32::from_le_bytes(read_array(cursor)?))),
        DataType::F64 => Ok(Value::F64(f64::from_le_bytes(read_array(cursor)?))),
        DataType::Decimal(_, _) => {
            let mantissa = i128::from_le_bytes(read_array(cursor)?);
            let scale = read_u32(cursor)?;
            let decimal = Decimal::try_from_i128_with_scale(mantissa, scale)
                .map_err(|e| Error::Serialization(e.to_string()))?;
            Ok(Value::Decimal(decimal))
        }
        DataType::Str | DataType::Text => Ok(Value::Str(read_string(cursor)?)),
        DataType::Date => {
            // Checked conversion; a wrapping cast would turn an absurd day
            // count into a valid date instead of an error
            let days = i64::from_le_bytes(read_array(cursor)?);
            let date = days
                .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                .and_then(|ce_days| i32::try_from(ce_days).ok())
                .and_then(chrono::NaiveDate::from_num_days_from_ce_opt)
                .ok_or_else(|| Error::Serialization(format!("date out of range: {} days", days)))?;
            Ok(Value::Date(date))
        }
        DataType::Time => {
            let secs = read_u32(cursor)?;
            let nanos = read_u32(cursor)?;
            let time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
                .ok_or_else(|| {
                    Error::Serialization(format!("time out of range: {}s + {}ns", secs, nanos))
                })?;
            Ok(Value::Time(time))
        }
        DataType::Timestamp => {
            let seconds = i64::from_le_bytes(read_array(cursor)?);
            let nanos = read_u32(cursor)?;
            let ts = chrono::DateTime::from_timestamp(seconds, nanos)
                .ok_or_else(|| {
                    Error::Serialization(format!("timestamp out of range: {}s", seconds))
                })?
                .naive_utc();
            Ok(Value::Timestamp(ts))
        }
        DataType::Uuid => {
            let mut bytes = [0u8; 16];
            cursor.read_exact(&mut bytes)?;
            Ok(Value::Uuid(Uuid::from_bytes(bytes)))
        }
        DataType::Bytea => {
            let len = read_u32(cursor)? as usize;
            Ok(Value::Bytea(read_bytes(cursor, len)?))
        }
        DataType::Inet => match read_u8(cursor)? {
            4 => {
                let mut octets = [0u8; 4];
                cursor.read_exact(&mut octets)?;
                Ok(Value::Inet(std::net::IpAddr::from(octets)))
            }
            6 => {
                let mut octets = [0u8; 16];
                cursor.read_exact(&mut octets)?;
                Ok(Value::Inet(std::net::IpAddr::from(octets)))
            }
            other => Err(Error::Serialization(format!(
                "unknown address family: {}",
                other
            ))),
        },
        DataType::Null => Err(Error::Serialization(
            "literal cannot carry the null type".to_string(),
        )),
    }
}

fn write_u32(value: u32, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_string(s: &str, buf: &mut Vec<u8>) {
    write_u32(s.len() as u32, buf);
    buf.extend_from_slice(s.as_bytes());
}

fn write_opt_u32(value: &Option<u32>, buf: &mut Vec<u8>) {
    match value {
        Some(v) => {
            buf.push(1);
            write_u32(*v, buf);
        }
        None => buf.push(0),
    }
}

fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8> {
    let mut byte = [0u8; 1];
    cursor.read_exact(&mut byte)?;
    Ok(byte[0])
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    Ok(u32::from_le_bytes(read_array(cursor)?))
}

fn read_array<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    cursor.read_exact(&mut bytes)?;
    Ok(bytes)
}

// Validates the length against the remaining input before allocating, so a
// corrupt length prefix cannot request an absurd buffer
fn read_bytes(cursor: &mut Cursor<&[u8]>, len: usize) -> Result<Vec<u8>> {
    let remaining = cursor.get_ref().len().saturating_sub(cursor.position() as usize);
    if len > remaining {
        return Err(Error::Serialization(format!(
            "length {} exceeds {} remaining bytes",
            len, remaining
        )));
    }
    let mut bytes = vec![0u8; len];
    cursor.read_exact(&mut bytes)?;
    Ok(bytes)
}

fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let len = read_u32(cursor)? as usize;
    let bytes = read_bytes(cursor, len)?;
    String::from_utf8(bytes).map_err(|e| Error::Serialization(e.to_string()))
}

fn read_opt_u32(cursor: &mut Cursor<&[u8]>) -> Result<Option<u32>> {
    match read_u8(cursor)? {
        0 => Ok(None),
        1 => Ok(Some(read_u32(cursor)?)),
        other => Err(Error::Serialization(format!(
            "invalid option marker: {}",
            other
        ))),
    }
}
