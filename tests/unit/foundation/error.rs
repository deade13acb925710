use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VibeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(VibeError::store("x").to_string().contains("store error:"));
    assert!(
        VibeError::from(EncodeError::Empty)
            .to_string()
            .contains("encode error:")
    );
    assert!(
        VibeError::from(RenderError::font("x"))
            .to_string()
            .contains("render error: font unavailable:")
    );
    assert!(
        VibeError::from(ExportError::Parse("x".to_string()))
            .to_string()
            .contains("export error:")
    );
}

#[test]
fn fetch_error_names_the_url() {
    let err = FetchError::new("https://img.example/a.jpg", FetchErrorKind::Status(404));
    let msg = VibeError::from(err).to_string();
    assert!(msg.contains("https://img.example/a.jpg"));
    assert!(msg.contains("http status 404"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VibeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
