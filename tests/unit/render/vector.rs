use super::*;
use crate::assets::encode::encode_embeddable;
use crate::config::CardOpts;
use crate::foundation::core::SLOT_COUNT;
use crate::layout::grid::compose;
use crate::model::{AlbumSlot, SlotGrid};

#[path = "../../support/mod.rs"]
mod support;

fn font() -> FontResource {
    FontResource::from_bytes(support::tiny_font_bytes()).unwrap()
}

#[test]
fn renders_card_with_embedded_cover() {
    let grid = SlotGrid::from_slots(&[AlbumSlot::new(1, "A & B", "X")]).unwrap();
    let mut embeds = vec![None; SLOT_COUNT];
    embeds[0] = Some(encode_embeddable(&support::solid_png(8, 8, [255, 0, 0, 255]), None).unwrap());

    let doc = compose(&grid, &embeds, &CardOpts::default());
    let markup = render_vector(&doc, &font()).unwrap();

    assert!(markup.as_str().trim_start().starts_with("<svg"));
    assert!(markup.as_str().contains("data:image/png;base64,"));
    validate_markup(markup.as_str()).unwrap();
}

#[test]
fn empty_grid_renders_without_images() {
    let doc = compose(&SlotGrid::empty(), &[], &CardOpts::default());
    let markup = render_vector(&doc, &font()).unwrap();
    assert!(!markup.as_str().contains("<image"));
    validate_markup(markup.as_str()).unwrap();
}

#[test]
fn zero_canvas_is_an_engine_error() {
    let mut doc = compose(&SlotGrid::empty(), &[], &CardOpts::default());
    doc.canvas.width = 0;
    let err = render_vector(&doc, &font()).unwrap_err();
    assert!(matches!(err, RenderError::Engine(_)));
}

#[test]
fn validate_rejects_non_svg_output() {
    for bad in ["", "   ", "<html></html>", "PNG\x00", "<?xml version=\"1.0\"?><div/>"] {
        let err = validate_markup(bad).unwrap_err();
        assert!(matches!(err, RenderError::InvalidOutput(_)), "{bad:?}");
    }
}

#[test]
fn validate_accepts_xml_declaration() {
    let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10"/></svg>"#;
    validate_markup(doc).unwrap();
}

#[test]
fn validate_rejects_unparseable_svg() {
    let err =
        validate_markup("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\"").unwrap_err();
    assert!(matches!(err, RenderError::InvalidOutput(_)));
}
