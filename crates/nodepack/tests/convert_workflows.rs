use std::fs;
use std::path::PathBuf;

use nodepack::{
    base64_to_bytes, binary_to_dictionary, binary_to_json, binary_to_xml, json_to_binary,
    save_base64_to_file, CodecOptions, Config, ConvertError, Converter, JobRequest, SinkError,
    Value,
};
use nodepack_codec::msgpack::{
    self, DecodeError, DecodeLimits, Extension, LimitExceeded, MsgPackEncoder, GUID_EXT_TYPE,
};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nodepack-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn json_binary_json_reproduces_document() {
    let options = CodecOptions::default();
    let bytes = json_to_binary(r#"{"a": 1, "b": [true, null, "x"]}"#).unwrap();
    let json = binary_to_json(&bytes, &options).unwrap();
    assert_eq!(
        json,
        "{\n  \"a\": 1,\n  \"b\": [\n    true,\n    null,\n    \"x\"\n  ]\n}"
    );
    assert_eq!(
        nodepack_codec::json::parse(&json).unwrap(),
        nodepack_codec::json::parse(r#"{"a": 1, "b": [true, null, "x"]}"#).unwrap()
    );
}

#[test]
fn empty_graph_mappings_become_lists() {
    let options = CodecOptions::default();
    let raw = msgpack::encode(
        &nodepack_codec::json::parse(r#"{"graph": {"nodes": {}, "edges": {}}}"#).unwrap(),
    );
    let dict = binary_to_dictionary(&raw, &options).unwrap();
    assert_eq!(
        dict["graph"],
        Value::Mapping(vec![
            (Value::from("nodes"), Value::Sequence(vec![])),
            (Value::from("edges"), Value::Sequence(vec![])),
        ])
    );

    // json_to_binary normalizes before encoding as well.
    let packed = json_to_binary(r#"{"graph": {"nodes": {}, "edges": {}}}"#).unwrap();
    assert_eq!(
        packed,
        [0x81, 0xa5, b'g', b'r', b'a', b'p', b'h', 0x82, 0xa5, b'n', b'o', b'd', b'e', b's',
         0x90, 0xa5, b'e', b'd', b'g', b'e', b's', 0x90]
    );
}

#[test]
fn dictionary_keys_are_coerced() {
    let options = CodecOptions::default();
    let raw = msgpack::encode(
        &Value::Mapping(vec![
            (Value::Integer(10), Value::from("ten")),
            (
                Value::Null,
                Value::Mapping(vec![(Value::Bool(false), Value::Integer(0))]),
            ),
        ]),
    );
    let dict = binary_to_dictionary(&raw, &options).unwrap();
    assert_eq!(dict.keys().collect::<Vec<_>>(), ["10", "null"]);
    assert_eq!(
        dict["null"],
        Value::Mapping(vec![(Value::from("false"), Value::Integer(0))])
    );
}

#[test]
fn binary_to_xml_wraps_in_root() {
    let options = CodecOptions::default();
    let bytes =
        json_to_binary(r#"{"job": {"@id": 7, "name": "render", "tags": ["a", "b"]}}"#).unwrap();
    assert_eq!(
        binary_to_xml(&bytes, &options).unwrap(),
        "<root>\n  <job id=\"7\">\n    <name>render</name>\n    <tags>a</tags>\n    <tags>b</tags>\n  </job>\n</root>"
    );
}

#[test]
fn uuid_strings_are_written_as_str() {
    let options = CodecOptions::default();
    let id = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";
    let bytes = json_to_binary(&format!(r#"{{"workflow_id": "{id}"}}"#)).unwrap();
    assert_eq!(&bytes[..2], [0x81, 0xab]);
    assert_eq!(&bytes[13..15], [0xd9, 0x24]);
    assert_eq!(&bytes[15..], id.as_bytes());
    let dict = binary_to_dictionary(&bytes, &CodecOptions::standard()).unwrap();
    assert_eq!(dict["workflow_id"], Value::from(id));

    // A producer that sends the GUID extension still decodes to the same text.
    let mut encoder = MsgPackEncoder::new();
    encoder.write_map_hdr(1);
    encoder.write_str("workflow_id");
    encoder.write_ext(&Extension {
        ext_type: GUID_EXT_TYPE,
        data: vec![
            0x6b, 0xa7, 0xb8, 0x10, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4,
            0x30, 0xc8,
        ],
    });
    let ext_bytes = encoder.writer.flush();
    assert_eq!(
        binary_to_dictionary(&ext_bytes, &options).unwrap(),
        binary_to_dictionary(&bytes, &options).unwrap()
    );
    assert_eq!(
        binary_to_json(&ext_bytes, &options).unwrap(),
        binary_to_json(&bytes, &options).unwrap()
    );
}

#[test]
fn pipeline_failures_are_typed() {
    let options = CodecOptions::default();
    assert!(matches!(
        json_to_binary("{\"a\": }"),
        Err(ConvertError::Parse(_))
    ));
    assert!(matches!(
        binary_to_json(&[0x82, 0xa1], &options),
        Err(ConvertError::Decode(DecodeError::Truncated { .. }))
    ));
    assert!(matches!(
        binary_to_xml(&[0xc0], &options),
        Err(ConvertError::Decode(DecodeError::NotAMapping { found: "null" }))
    ));

    let shallow = CodecOptions::default().with_limits(DecodeLimits::new(2, 1 << 20));
    let deep = json_to_binary(r#"{"a": {"b": {"c": 1}}}"#).unwrap();
    assert!(matches!(
        binary_to_json(&deep, &shallow),
        Err(ConvertError::Decode(DecodeError::UntrustedDataRejected(
            LimitExceeded::Depth { limit: 2 }
        )))
    ));
}

#[test]
fn job_request_decodes_to_dictionary() {
    let converter = Converter::default();
    let request = JobRequest::new("http://localhost:8000", "u", "w", "t", "workflow")
        .param("seed", 42);
    let dict = converter
        .binary_to_dictionary(&request.encode())
        .unwrap();
    assert_eq!(dict["command"], Value::from("run_job"));
    let data = &dict["data"];
    assert_eq!(data.get("type"), Some(&Value::from("run_job_request")));
    assert_eq!(
        data.get("params").and_then(|p| p.get("seed")),
        Some(&Value::Integer(42))
    );
    assert_eq!(
        data.get("graph").and_then(|g| g.get("nodes")),
        Some(&Value::Sequence(vec![]))
    );
}

#[test]
fn base64_sink_writes_file() {
    let path = scratch("image.bin");
    let written = save_base64_to_file("iVBORw0KGgo=", &path).unwrap();
    assert_eq!(written, 8);
    assert_eq!(fs::read(&path).unwrap(), base64_to_bytes("iVBORw0KGgo=").unwrap());
    fs::remove_file(&path).unwrap();
}

#[test]
fn base64_sink_writes_nothing_on_bad_input() {
    let path = scratch("never.bin");
    assert!(matches!(
        save_base64_to_file("@@@", &path),
        Err(SinkError::InvalidBase64(_))
    ));
    assert!(!path.exists());

    let missing_dir = scratch("missing-dir").join("file.bin");
    assert!(matches!(
        save_base64_to_file("AA==", &missing_dir),
        Err(SinkError::Io { .. })
    ));
}

#[test]
fn config_file_drives_codec_options() {
    let path = scratch("nodepack.toml");
    fs::write(&path, "[limits]\nmax_depth = 1\n\n[resolver]\nguid = false\n").unwrap();
    let converter = Converter::new(Config::load(&path).unwrap().codec_options());
    fs::remove_file(&path).unwrap();

    let bytes = converter.json_to_binary(r#"{"a": [1]}"#).unwrap();
    assert!(matches!(
        converter.binary_to_json(&bytes),
        Err(ConvertError::Decode(DecodeError::UntrustedDataRejected(_)))
    ));
    assert_eq!(converter.options().resolver.name(), "standard");
    assert!(Config::load(scratch("absent.toml")).is_err());
}
