//! Immutable leaf proxies.
//!
//! A leaf is a primitive plus its metadata. Nothing mutates it in place:
//! re-schematising or re-linking builds a new leaf that the owning container
//! stores in the old one's slot.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::{json_equal, Links, Meta, ProxyKind};
use crate::schema::Schema;

/// Primitive types a [`LeafProxy`] can hold.
pub trait LeafValue: Clone {
    const KIND: ProxyKind;

    fn to_json(&self) -> Value;
}

impl LeafValue for Rc<str> {
    const KIND: ProxyKind = ProxyKind::String;

    fn to_json(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl LeafValue for f64 {
    const KIND: ProxyKind = ProxyKind::Number;

    fn to_json(&self) -> Value {
        // Leaves are only built from finite JSON numbers.
        serde_json::Number::from_f64(*self).map_or(Value::Null, Value::Number)
    }
}

impl LeafValue for i64 {
    const KIND: ProxyKind = ProxyKind::Integer;

    fn to_json(&self) -> Value {
        Value::from(*self)
    }
}

#[derive(Clone)]
pub struct LeafProxy<T: LeafValue> {
    value: T,
    meta: Meta,
}

pub type StringProxy = LeafProxy<Rc<str>>;
pub type NumberProxy = LeafProxy<f64>;
pub type IntegerProxy = LeafProxy<i64>;

impl<T: LeafValue> LeafProxy<T> {
    pub(crate) fn new(value: T, meta: Meta) -> Self {
        Self { value, meta }
    }

    pub(crate) fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn schema(&self) -> Schema {
        self.meta.schema.clone()
    }

    pub fn to_json(&self) -> Value {
        self.value.to_json()
    }

    pub(crate) fn with_schema(&self, schema: Schema) -> Self {
        Self {
            value: self.value.clone(),
            meta: Meta {
                schema,
                ..self.meta.clone()
            },
        }
    }

    pub(crate) fn with_links(&self, links: Links) -> Self {
        Self {
            value: self.value.clone(),
            meta: Meta {
                links,
                ..self.meta.clone()
            },
        }
    }
}

impl StringProxy {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl NumberProxy {
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl IntegerProxy {
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl<T: LeafValue> PartialEq<Value> for LeafProxy<T> {
    fn eq(&self, other: &Value) -> bool {
        json_equal(&self.to_json(), other)
    }
}

impl PartialEq<&str> for StringProxy {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<f64> for NumberProxy {
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl PartialEq<i64> for IntegerProxy {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl<T: LeafValue> fmt::Debug for LeafProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match T::KIND {
            ProxyKind::String => "StringProxy",
            ProxyKind::Number => "NumberProxy",
            _ => "IntegerProxy",
        };
        f.debug_struct(name)
            .field("value", &self.to_json())
            .field("schema", self.meta.schema.fragment())
            .finish()
    }
}
