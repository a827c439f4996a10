//! Boolean parameter tests

use presence_params::BoolParam;

use crate::common::{Record, assert_encodes_to, decode_record};

struct Case {
    name: &'static str,
    input: &'static str,
    output: Option<&'static str>,
    field: Option<bool>,
    value: Option<bool>,
}

#[test]
fn decodes_and_reencodes_records() {
    let cases = [
        Case {
            name: "bare booleans",
            input: r#"{"field":true,"value":false}"#,
            output: None,
            field: Some(true),
            value: Some(false),
        },
        Case {
            name: "quoted booleans",
            input: r#"{"field":"true","value":"FALSE"}"#,
            output: Some(r#"{"field":true,"value":false}"#),
            field: Some(true),
            value: Some(false),
        },
        Case {
            name: "empty object",
            input: "{}",
            output: Some(r#"{"field":null,"value":null}"#),
            field: None,
            value: None,
        },
        Case {
            name: "explicit nulls",
            input: r#"{"field":null,"value":null}"#,
            output: None,
            field: None,
            value: None,
        },
        Case {
            name: "missing field",
            input: r#"{"value":false}"#,
            output: Some(r#"{"field":null,"value":false}"#),
            field: None,
            value: Some(false),
        },
        Case {
            name: "missing value",
            input: r#"{"field":true}"#,
            output: Some(r#"{"field":true,"value":null}"#),
            field: Some(true),
            value: None,
        },
    ];

    for case in cases {
        let record: Record<bool> = decode_record(case.input)
            .unwrap_or_else(|err| panic!("{}: unexpected error {err}", case.name));
        assert_eq!(record.field.get().copied(), case.field, "{}", case.name);
        assert_eq!(record.value.get().copied(), case.value, "{}", case.name);
        assert_eq!(record.field.value(), case.field.unwrap_or(false), "{}", case.name);
        assert_encodes_to(&record, case.output.unwrap_or(case.input));
    }
}

#[test]
fn rejects_malformed_json() {
    assert!(decode_record::<bool>(r#"{"field": true,"value": false"#).is_err());
    assert!(decode_record::<bool>(r#"{"field": true,"value": false,	}"#).is_err());
}

#[test]
fn rejects_non_boolean_tokens() {
    for input in [
        r#"{"field":"yes"}"#,
        r#"{"field":1}"#,
        r#"{"field":""}"#,
    ] {
        assert!(decode_record::<bool>(input).is_err(), "{input}");
    }
}

#[test]
fn quoted_and_bare_decode_the_same() {
    assert_eq!(
        BoolParam::decode(b"\"true\"").unwrap(),
        BoolParam::decode(b"true").unwrap()
    );
    assert_eq!(
        BoolParam::decode(b"\"false\"").unwrap(),
        BoolParam::decode(b"false").unwrap()
    );
}

#[test]
fn set_value_round_trips() {
    for flag in [true, false] {
        let mut param = BoolParam::default();
        param.set(flag);
        let decoded = BoolParam::decode(&param.encode().unwrap()).unwrap();
        assert!(decoded.present());
        assert_eq!(decoded.value(), flag);
    }
}
