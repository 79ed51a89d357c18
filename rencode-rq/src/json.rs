use num_bigint::BigInt;
use rencode::Value;
use serde_json::{Map, Number};

fn int(v: &BigInt) -> serde_json::Value {
    if let Ok(i) = i64::try_from(v) {
        serde_json::Value::from(i)
    } else if let Ok(u) = u64::try_from(v) {
        serde_json::Value::from(u)
    } else {
        serde_json::Value::String(v.to_string())
    }
}

fn float(v: f64) -> serde_json::Value {
    Number::from_f64(v).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

/// JSON objects only have string keys, everything else is written out as text
fn key(v: &Value<'_>) -> String {
    match v {
        Value::Str(s)   => s.to_string(),
        Value::Int(i)   => i.to_string(),
        Value::F32(f)   => f.to_string(),
        Value::F64(f)   => f.to_string(),
        Value::Bytes(b) => base64::encode(b),
        Value::List(_) | Value::Dict(_) => to_json(v).to_string(),
        _               => v.to_string(),
    }
}

/// Converts a decoded message into JSON. Integers outside of 64 bits become strings of digits, non-finite floats
/// become null and byte strings which are not text are base64 encoded.
pub fn to_json(value: &Value<'_>) -> serde_json::Value {
    match value {
        Value::Null     => serde_json::Value::Null,
        Value::Bool(b)  => serde_json::Value::Bool(*b),
        Value::Int(i)   => int(i),
        Value::F32(f)   => float(f64::from(*f)),
        Value::F64(f)   => float(*f),
        Value::Bytes(b) => serde_json::Value::String(base64::encode(b)),
        Value::Str(s)   => serde_json::Value::String(s.to_string()),
        Value::List(l)  => serde_json::Value::Array(l.iter().map(to_json).collect()),
        Value::Dict(d)  => serde_json::Value::Object(d.iter().map(|(k, v)| (key(k), to_json(v))).collect::<Map<_, _>>()),
    }
}

#[cfg(test)]
mod tests {
    use super::to_json;
    use rencode::{decode, Value};
    use serde_json::json;

    #[test]
    fn keys_become_text() {
        let value = decode(&[103, 1, 129, b'a'], true).unwrap();
        assert_eq!(json!({ "1": "a" }), to_json(&value));
        let value = Value::Dict(vec![
            (Value::Null, Value::from(1)),
            (Value::Bool(true), Value::from(2)),
            (Value::F32(1.5), Value::from(3)),
            (Value::List(vec![Value::from(-4)]), Value::from(4)),
        ]);
        assert_eq!(json!({ "null": 1, "true": 2, "1.5": 3, "[-4]": 4 }), to_json(&value));
    }

    #[test]
    fn scalars() {
        assert_eq!(json!(u64::MAX), to_json(&Value::from(u64::MAX)));
        let wide = "9".repeat(30);
        assert_eq!(json!(wide.clone()), to_json(&Value::Int(wide.parse().unwrap())));
        assert_eq!(json!(null), to_json(&Value::F64(f64::NAN)));
        assert_eq!(json!(0.5), to_json(&Value::F32(0.5)));
        assert_eq!(json!("AP8="), to_json(&Value::from(&b"\x00\xff"[..])));
    }

    #[test]
    fn order_is_kept() {
        let value = Value::Dict(vec![(Value::from("z"), Value::Null), (Value::from("a"), Value::List(vec![]))]);
        assert_eq!(r#"{"z":null,"a":[]}"#, to_json(&value).to_string());
    }
}
