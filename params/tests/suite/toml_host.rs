//! The same parameters under a second host format

use presence_params::{BoolParam, IntParam, StringParam, TimeParam};
use serde::Deserialize;

use crate::common::init_tracing;

#[derive(Debug, Deserialize)]
struct Overlay {
    name: StringParam,
    enabled: BoolParam,
    retries: IntParam,
    since: TimeParam,
}

#[test]
fn missing_keys_are_absent() {
    init_tracing();
    let overlay: Overlay = toml::from_str("retries = 3\n").unwrap();
    assert!(!overlay.name.present());
    assert!(!overlay.enabled.present());
    assert!(!overlay.since.present());
    assert_eq!(overlay.retries.value(), 3);
}

#[test]
fn lenient_forms_apply_to_toml_strings() {
    let overlay: Overlay = toml::from_str(
        r#"
name = ""
enabled = "TRUE"
retries = "-2"
since = "2023-10-05 14:48:00"
"#,
    )
    .unwrap();
    assert!(overlay.name.present());
    assert!(overlay.enabled.value());
    assert_eq!(overlay.retries.value(), -2);
    assert_eq!(overlay.since.to_string(), "2023-10-05T14:48:00Z");
}

#[test]
fn partial_overlay_only_touches_present_keys() {
    let overlay: Overlay = toml::from_str("enabled = false\n").unwrap();

    let mut name = "service".to_string();
    let mut enabled = true;
    let mut retries = 5;
    assert!(!overlay.name.apply_to(&mut name));
    assert!(overlay.enabled.apply_to(&mut enabled));
    assert!(!overlay.retries.apply_to(&mut retries));

    assert_eq!(name, "service");
    assert!(!enabled);
    assert_eq!(retries, 5);
}

#[test]
fn native_datetimes_are_accepted() {
    let cases = [
        ("since = 2023-10-05T14:48:00Z\n", "2023-10-05T14:48:00Z"),
        ("since = 2023-10-05T14:48:00+02:00\n", "2023-10-05T14:48:00+02:00"),
        ("since = 2023-10-05T14:48:00\n", "2023-10-05T14:48:00Z"),
    ];
    for (document, expected) in cases {
        let overlay: Overlay = toml::from_str(document).unwrap();
        assert!(overlay.since.present(), "{document}");
        assert_eq!(overlay.since.to_string(), expected, "{document}");
    }
}

#[test]
fn native_datetimes_only_fit_timestamps() {
    assert!(toml::from_str::<Overlay>("name = 2023-10-05T14:48:00Z\n").is_err());
    assert!(toml::from_str::<Overlay>("since = 2023-10-05\n").is_err());
    assert!(toml::from_str::<Overlay>("[since]\nat = \"2023-10-05T14:48:00Z\"\n").is_err());
}

#[test]
fn invalid_values_fail_the_document() {
    assert!(toml::from_str::<Overlay>("retries = 1.5\n").is_err());
    assert!(toml::from_str::<Overlay>("since = \"2023-10-05\"\n").is_err());
}
