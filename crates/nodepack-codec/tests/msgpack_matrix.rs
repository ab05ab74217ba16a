use nodepack_codec::msgpack::{
    self, decode_mapping, DecodeError, DecodeLimits, Extension, LimitExceeded, MsgPackEncoder,
    GUID_EXT_TYPE,
};
use nodepack_codec::{coerce_key, project_keys, CodecOptions, Value};

fn obj(entries: &[(&str, Value)]) -> Value {
    Value::Mapping(
        entries
            .iter()
            .map(|(k, v)| (Value::from(*k), v.clone()))
            .collect(),
    )
}

fn encode(value: &Value) -> Vec<u8> {
    msgpack::encode(value)
}

fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
    msgpack::decode(bytes, &CodecOptions::default())
}

#[test]
fn wire_bytes_for_small_document() {
    let value = obj(&[
        ("a", Value::Integer(1)),
        (
            "b",
            Value::Sequence(vec![Value::Bool(true), Value::Null, Value::from("x")]),
        ),
    ]);
    let bytes = encode(&value);
    assert_eq!(
        bytes,
        [0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0x93, 0xc3, 0xc0, 0xa1, b'x']
    );
    assert_eq!(decode(&bytes), Ok(value));
}

#[test]
fn integer_boundaries_roundtrip() {
    for int in [
        0,
        127,
        128,
        255,
        256,
        65535,
        65536,
        u32::MAX as i64,
        u32::MAX as i64 + 1,
        i64::MAX,
        -1,
        -32,
        -33,
        -128,
        -129,
        -32768,
        -32769,
        i32::MIN as i64,
        i32::MIN as i64 - 1,
        i64::MIN,
    ] {
        let value = Value::Integer(int);
        assert_eq!(decode(&encode(&value)), Ok(value), "integer {int}");
    }
}

#[test]
fn floats_roundtrip_bit_exact() {
    for float in [0.0, -0.0, 1.5, f64::MIN_POSITIVE, f64::MAX, 1e-300] {
        let Ok(Value::Float(back)) = decode(&encode(&Value::Float(float))) else {
            panic!("float {float} did not decode as float");
        };
        assert_eq!(back.to_bits(), float.to_bits());
    }
    let Ok(Value::Float(nan)) = decode(&encode(&Value::Float(f64::NAN))) else {
        panic!("NaN did not decode as float");
    };
    assert!(nan.is_nan());
}

#[test]
fn long_strings_and_binaries() {
    for len in [0, 31, 32, 255, 256, 65535, 65536] {
        let s = Value::String("z".repeat(len));
        assert_eq!(decode(&encode(&s)), Ok(s));
        let b = Value::Binary(vec![7; len]);
        assert_eq!(decode(&encode(&b)), Ok(b));
    }
}

#[test]
fn large_containers_roundtrip() {
    let seq = Value::Sequence((0..70_000).map(Value::Integer).collect());
    assert_eq!(decode(&encode(&seq)), Ok(seq));
    let map = Value::Mapping(
        (0..20)
            .map(|i| (Value::Integer(i), Value::from(format!("v{i}"))))
            .collect(),
    );
    let bytes = encode(&map);
    assert_eq!(&bytes[..3], [0xde, 0x00, 20]);
    assert_eq!(decode(&bytes), Ok(map));
}

fn guid_frame(prefix: &[u8], id_bytes: &[u8; 16]) -> Vec<u8> {
    let mut encoder = MsgPackEncoder::new();
    encoder.writer.buf(prefix);
    encoder.write_ext(&Extension {
        ext_type: GUID_EXT_TYPE,
        data: id_bytes.to_vec(),
    });
    encoder.writer.flush()
}

const ID: &str = "123e4567-e89b-12d3-a456-426614174000";
const ID_BYTES: [u8; 16] = [
    0x12, 0x3e, 0x45, 0x67, 0xe8, 0x9b, 0x12, 0xd3, 0xa4, 0x56, 0x42, 0x66, 0x14, 0x17, 0x40, 0x00,
];

#[test]
fn guid_extension_decodes_to_uuid_text() {
    let bytes = guid_frame(&[0x81, 0xa2, b'i', b'd'], &ID_BYTES);
    assert_eq!(&bytes[4..6], [0xd8, GUID_EXT_TYPE as u8]);
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded, obj(&[("id", Value::from(ID))]));

    // Re-encoding writes the text back as a plain str8.
    let again = encode(&decoded);
    assert_eq!(&again[4..6], [0xd9, 36]);
    assert_eq!(&again[6..], ID.as_bytes());
}

#[test]
fn uuid_strings_encode_as_str() {
    let bytes = encode(&Value::from(ID));
    assert_eq!(&bytes[..2], [0xd9, 36]);
    assert_eq!(msgpack::decode(&bytes, &CodecOptions::standard()), Ok(Value::from(ID)));
}

#[test]
fn guid_extension_without_resolver_is_unsupported() {
    let bytes = guid_frame(&[], &ID_BYTES);
    assert_eq!(
        msgpack::decode(&bytes, &CodecOptions::standard()),
        Err(DecodeError::UnsupportedExtension {
            ext_type: GUID_EXT_TYPE,
            len: 16,
            offset: 0
        })
    );
}

#[test]
fn truncated_buffers() {
    let bytes = encode(&obj(&[
        ("name", Value::from("nodepack")),
        ("list", Value::Sequence(vec![Value::Integer(300); 4])),
    ]));
    for cut in 0..bytes.len() {
        assert!(
            matches!(decode(&bytes[..cut]), Err(DecodeError::Truncated { .. })),
            "cut at {cut}"
        );
    }
}

#[test]
fn declared_count_beyond_input_fails_before_allocating() {
    // map32 claiming four billion entries with no payload.
    let err = decode(&[0xdf, 0xff, 0xff, 0xff, 0xff]).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated { offset: 5, .. }));
    // bin32 claiming four gigabytes.
    let err = decode(&[0xc6, 0xff, 0xff, 0xff, 0xff, 0x00]).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated { offset: 5, .. }));
}

#[test]
fn nesting_beyond_default_depth_is_rejected() {
    let mut bytes = vec![0x91; 600];
    bytes.push(0xc0);
    assert_eq!(
        decode(&bytes),
        Err(DecodeError::UntrustedDataRejected(LimitExceeded::Depth {
            limit: DecodeLimits::DEFAULT_MAX_DEPTH
        }))
    );

    let mut bytes = vec![0x91; DecodeLimits::DEFAULT_MAX_DEPTH];
    bytes.push(0xc0);
    assert!(decode(&bytes).is_ok());
}

#[test]
fn allocation_budget_counts_slots() {
    let options = CodecOptions::default().with_limits(DecodeLimits::new(
        DecodeLimits::DEFAULT_MAX_DEPTH,
        std::mem::size_of::<Value>() * 3,
    ));
    let three = msgpack::encode(&Value::Sequence(vec![Value::Null; 3]));
    assert!(msgpack::decode(&three, &options).is_ok());
    let four = msgpack::encode(&Value::Sequence(vec![Value::Null; 4]));
    assert!(matches!(
        msgpack::decode(&four, &options),
        Err(DecodeError::UntrustedDataRejected(
            LimitExceeded::Allocation { .. }
        ))
    ));
}

#[test]
fn decode_mapping_requires_mapping() {
    assert_eq!(
        decode_mapping(&[0x91, 0x01], &CodecOptions::default()),
        Err(DecodeError::NotAMapping { found: "sequence" })
    );
    assert_eq!(
        decode_mapping(&[0x81, 0x01, 0x02], &CodecOptions::default()),
        Ok(vec![(Value::Integer(1), Value::Integer(2))])
    );
}

#[test]
fn key_projection_matches_coerced_input_keys() {
    let keys = vec![
        Value::Integer(7),
        Value::Null,
        Value::Bool(true),
        Value::Float(2.5),
        Value::from("plain"),
        Value::Binary(vec![1, 2, 3]),
        Value::Sequence(vec![Value::Integer(1), Value::from("a")]),
    ];
    let value = Value::Mapping(
        keys.iter()
            .cloned()
            .enumerate()
            .map(|(i, k)| (k, Value::Integer(i as i64)))
            .collect(),
    );
    let decoded = decode(&encode(&value)).unwrap();
    let dict = decoded.into_dictionary().unwrap();
    let expected: Vec<String> = keys.iter().map(coerce_key).collect();
    assert_eq!(dict.keys().cloned().collect::<Vec<_>>(), expected);
    assert_eq!(
        expected,
        ["7", "null", "true", "2.5", "plain", "AQID", r#"[1,"a"]"#]
    );
}

#[test]
fn key_projection_last_write_wins() {
    let value = Value::Mapping(vec![
        (Value::Integer(1), Value::from("first")),
        (Value::from("x"), Value::Null),
        (Value::from("1"), Value::from("second")),
    ]);
    let projected = project_keys(decode(&encode(&value)).unwrap());
    assert_eq!(
        projected,
        obj(&[("1", Value::from("second")), ("x", Value::Null)])
    );
}
