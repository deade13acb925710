use super::*;
use base64::Engine as _;

#[path = "../../support/mod.rs"]
mod support;

#[test]
fn png_becomes_png_data_uri_with_dimensions() {
    let bytes = support::solid_png(4, 3, [10, 20, 30, 255]);
    let img = encode_embeddable(&bytes, Some("image/png")).unwrap();
    assert_eq!(img.mime(), "image/png");
    assert_eq!((img.width(), img.height()), (4, 3));
    assert!(img.data_uri().starts_with("data:image/png;base64,iVBOR"));
}

#[test]
fn mime_comes_from_bytes_not_declared_type() {
    let bytes = support::jpeg_bytes(image::RgbImage::from_pixel(8, 8, image::Rgb([1, 2, 3])));
    let img = encode_embeddable(&bytes, Some("application/octet-stream")).unwrap();
    assert_eq!(img.mime(), "image/jpeg");
    assert!(img.data_uri().starts_with("data:image/jpeg;base64,"));
}

#[test]
fn chunked_encoding_matches_single_pass() {
    // Large enough to span several chunks; noise keeps PNG from compressing it away.
    let mut state = 0x2545_f491_u32;
    let img = image::RgbaImage::from_fn(128, 128, |_, _| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let [a, b, c, _] = state.to_be_bytes();
        image::Rgba([a, b, c, 255])
    });
    let bytes = support::png_bytes(img);
    assert!(bytes.len() > 2 * ENCODE_CHUNK_BYTES);

    let img = encode_embeddable(&bytes, None).unwrap();
    let expected = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));
    assert_eq!(img.data_uri(), expected);
}

#[test]
fn empty_payload_is_rejected() {
    assert_eq!(encode_embeddable(&[], None), Err(EncodeError::Empty));
}

#[test]
fn non_image_payload_reports_declared_type() {
    let err = encode_embeddable(b"<html>nope</html>", Some("text/html")).unwrap_err();
    assert_eq!(
        err,
        EncodeError::UnsupportedFormat {
            declared: "text/html".to_string()
        }
    );

    let err = encode_embeddable(b"plain text", None).unwrap_err();
    assert_eq!(
        err,
        EncodeError::UnsupportedFormat {
            declared: "none".to_string()
        }
    );
}

#[test]
fn truncated_header_is_corrupt() {
    let bytes = support::solid_png(4, 4, [0, 0, 0, 255]);
    let err = encode_embeddable(&bytes[..12], Some("image/png")).unwrap_err();
    assert!(matches!(err, EncodeError::Corrupt(_)));
}
