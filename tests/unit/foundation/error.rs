use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TimelineError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TimelineError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(
        TimelineError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TimelineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
