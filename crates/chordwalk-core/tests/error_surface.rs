use chordwalk_core::errors::{ErrorInfo, SamplerError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("dim", "3")
        .with_context("reason", "example")
}

#[test]
fn config_error_surface() {
    let err = SamplerError::Config(sample_info("CFG001", "walk_len must be positive"));
    assert_eq!(err.info().code, "CFG001");
    assert!(err.info().context.contains_key("dim"));
}

#[test]
fn body_error_surface() {
    let err = SamplerError::Body(sample_info("B001", "shape mismatch").with_hint("check b"));
    assert_eq!(err.info().code, "B001");
    assert_eq!(err.info().hint.as_deref(), Some("check b"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("body error: shape mismatch (code: B001)"));
    assert!(rendered.contains("dim=3, reason=example"));
    assert!(rendered.ends_with("| hint: check b"));
}

#[test]
fn dimension_mismatch_carries_sizes() {
    let err = SamplerError::dimension_mismatch("start point", 4, 2);
    assert!(matches!(err, SamplerError::Dimension(_)));
    assert_eq!(err.info().code, "dimension-mismatch");
    assert_eq!(err.info().context["expected"], "4");
    assert_eq!(err.info().context["found"], "2");
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = SamplerError::Serde(sample_info("S001", "bad yaml"));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["family"], "Serde");
    assert_eq!(json["detail"]["code"], "S001");
    let back: SamplerError = serde_json::from_value(json).unwrap();
    assert_eq!(back, err);
}
