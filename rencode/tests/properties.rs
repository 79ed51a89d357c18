use num_bigint::BigInt;
use proptest::prelude::*;
use rencode::*;

fn arb_int() -> impl Strategy<Value = BigInt> {
    prop_oneof![
        any::<i64>().prop_map(BigInt::from),
        any::<i128>().prop_map(BigInt::from),
        "-?[1-9][0-9]{0,63}".prop_map(|digits| digits.parse::<BigInt>().unwrap()),
    ]
}

fn arb_value() -> impl Strategy<Value = Value<'static>> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_int().prop_map(Value::Int),
        (-1e30f32..1e30f32).prop_map(Value::F32),
        (-1e300f64..1e300f64).prop_map(Value::F64),
        prop::collection::vec(any::<u8>(), 0..100).prop_map(Value::from),
    ];
    leaf.prop_recursive(6, 256, 80, |inner| prop_oneof![
        prop::collection::vec(inner.clone(), 0..80).prop_map(Value::List),
        prop::collection::vec((inner.clone(), inner), 0..30).prop_map(Value::Dict),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 1_000, ..ProptestConfig::default() })]

    #[test]
    fn encode_decode(value in arb_value()) {
        let mut buf = Vec::new();
        let c = Encoder::encode(&value, &mut buf).unwrap();
        prop_assert_eq!(c, buf.len());
        let decoded = decode(&buf, false);
        prop_assert_eq!(Ok(value), decoded);
    }

    #[test]
    fn encoding_is_canonical(value in arb_value()) {
        let mut first = Vec::new();
        Encoder::encode(&value, &mut first).unwrap();
        let mut second = Vec::new();
        Encoder::encode(&decode(&first, false).unwrap(), &mut second).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn decode_arbitrary_bytes(buf in prop::collection::vec(any::<u8>(), 0..512)) {
        for decode_utf8 in [false, true] {
            let options = DecodeOptions { decode_utf8, ..Default::default() };
            if let Ok((value, c)) = Decoder::decode(&buf, &options) {
                prop_assert!(c <= buf.len());
                let _ = value.into_owned();
            }
        }
    }

    #[test]
    fn truncation_is_detected(value in arb_value()) {
        let mut buf = Vec::new();
        Encoder::encode(&value, &mut buf).unwrap();
        for len in 0..buf.len() {
            prop_assert_eq!(ErrorKind::Truncated, decode(&buf[..len], false).unwrap_err().kind());
        }
    }
}
