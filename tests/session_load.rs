use image::RgbaImage;
use overtrace::error::OverlayError;
use overtrace::session::OverlaySession;
use tempfile::tempdir;

#[test]
fn missing_file_is_reported_with_its_path() {
    let mut session = OverlaySession::new();
    let path = std::path::Path::new("definitely_missing.png");
    assert_eq!(
        session.load_image(path),
        Err(OverlayError::FileNotFound {
            path: path.to_path_buf()
        })
    );
    assert!(!session.has_image());
}

#[test]
fn garbage_file_is_reported_as_unsupported() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bad.png");
    std::fs::write(&path, b"this is not an image").expect("write test file");

    let mut session = OverlaySession::new();
    match session.load_image(&path) {
        Err(OverlayError::UnsupportedFormat { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
    assert!(!session.has_image());
}

#[test]
fn png_file_loads_into_a_grid() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("image.png");
    RgbaImage::from_pixel(48, 20, image::Rgba([10, 20, 30, 255]))
        .save(&path)
        .expect("write png");

    let mut session = OverlaySession::new();
    session.load_image(&path).expect("load should succeed");

    assert_eq!(session.chunk_count(), 2);
    assert_eq!(session.source_path(), Some(path.as_path()));
    assert!(session.render().is_some());
}

#[test]
fn zero_dimension_image_is_invalid() {
    let mut session = OverlaySession::new();
    assert_eq!(
        session.load_decoded(RgbaImage::new(0, 0)),
        Err(OverlayError::InvalidImage)
    );
    assert!(!session.has_image());
}

#[test]
fn failed_reload_leaves_the_previous_image_in_place() {
    let mut session = OverlaySession::new();
    session
        .load_decoded(RgbaImage::new(100, 40))
        .expect("grid should build");
    session.view.set_chunk(5, session.chunk_count());

    let missing = std::path::Path::new("definitely_missing.png");
    assert!(session.load_image(missing).is_err());
    assert!(session.load_decoded(RgbaImage::new(0, 0)).is_err());

    assert_eq!(session.chunk_count(), 8);
    assert_eq!(session.view.current_index, 5);
}
