use std::collections::BTreeMap;

use crate::Error;

/// Contract argument or return value, already decoded from XDR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScValue {
    Void,
    Bool(bool),
    U32(u32),
    I64(i64),
    U64(u64),
    I128(i128),
    Address(String),
    Symbol(String),
    Map(BTreeMap<String, ScValue>),
}

impl ScValue {
    /// Reads any integer variant as `i128`
    pub fn as_i128(&self) -> crate::Result<i128> {
        match self {
            ScValue::U32(v) => Ok(i128::from(*v)),
            ScValue::I64(v) => Ok(i128::from(*v)),
            ScValue::U64(v) => Ok(i128::from(*v)),
            ScValue::I128(v) => Ok(*v),
            other => Err(Error::Decode(format!("expected integer, got {:?}", other))),
        }
    }

    pub fn as_address(&self) -> crate::Result<&str> {
        match self {
            ScValue::Address(addr) => Ok(addr),
            other => Err(Error::Decode(format!("expected address, got {:?}", other))),
        }
    }

    /// Looks up a named field of a struct value
    pub fn field(&self, name: &str) -> crate::Result<&ScValue> {
        match self {
            ScValue::Map(fields) => fields
                .get(name)
                .ok_or_else(|| Error::Decode(format!("missing field `{}`", name))),
            other => Err(Error::Decode(format!("expected struct, got {:?}", other))),
        }
    }
}
