//! Typed bind values for PostgreSQL parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::types::Oid;
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A value that can be bound to a PostgreSQL query. Serializes as plain JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindValue {
    Null,
    Bool(bool),
    I64(i64),
    String(String),
}

impl BindValue {
    /// Convert a JSON value coming from a record. Arrays and objects are stored as text.
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => BindValue::I64(i),
                None => BindValue::String(n.to_string()),
            },
            Value::String(s) => BindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => BindValue::String(v.to_string()),
        }
    }
}

impl From<i64> for BindValue {
    fn from(n: i64) -> Self {
        BindValue::I64(n)
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::String(s.to_string())
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::String(s)
    }
}

impl From<bool> for BindValue {
    fn from(b: bool) -> Self {
        BindValue::Bool(b)
    }
}

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            BindValue::Null => <Option<i64> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            BindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            BindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            BindValue::String(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        match self {
            // oid 0 leaves the parameter type to the server
            BindValue::Null => Some(PgTypeInfo::with_oid(Oid(0))),
            BindValue::Bool(_) => Some(PgTypeInfo::with_name("BOOL")),
            BindValue::I64(_) => Some(PgTypeInfo::with_name("INT8")),
            BindValue::String(_) => Some(PgTypeInfo::with_name("TEXT")),
        }
    }
}

impl sqlx::Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_bind_as_integers() {
        assert_eq!(BindValue::from_json(&json!(7)), BindValue::I64(7));
        assert_eq!(BindValue::from_json(&json!("x")), BindValue::String("x".into()));
        assert_eq!(BindValue::from_json(&json!(null)), BindValue::Null);
    }

    #[test]
    fn untagged_serde_keeps_the_variant() {
        let values = vec![BindValue::I64(3), BindValue::Bool(true), BindValue::String("%a%".into())];
        let text = serde_json::to_string(&values).unwrap();
        assert_eq!(text, r#"[3,true,"%a%"]"#);
        let back: Vec<BindValue> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, values);
    }
}
