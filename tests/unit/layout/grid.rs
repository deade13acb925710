use super::*;
use crate::assets::encode::encode_embeddable;
use crate::model::AlbumSlot;

#[path = "../../support/mod.rs"]
mod support;

fn cover() -> EmbeddableImage {
    encode_embeddable(&support::solid_png(2, 2, [200, 0, 0, 255]), None).unwrap()
}

fn embeds_at(indices: &[usize]) -> Vec<Option<EmbeddableImage>> {
    (0..SLOT_COUNT)
        .map(|i| indices.contains(&i).then(cover))
        .collect()
}

#[test]
fn always_nine_cells_in_row_major_order() {
    let doc = compose(&SlotGrid::empty(), &[], &CardOpts::default());
    assert_eq!(doc.cells.len(), 9);
    assert_eq!(doc.canvas, Canvas::for_grid(300));
    for (i, cell) in doc.cells.iter().enumerate() {
        assert_eq!(cell.index, i);
        assert_eq!(cell.rect, cell_rect(i, 300));
        assert_eq!(cell.content, CellContent::Placeholder);
    }
    assert_eq!(doc.background, "#1a1a1a");
}

#[test]
fn image_requires_album_and_cover() {
    let grid = SlotGrid::from_slots(&[
        AlbumSlot::new(1, "With Cover", "A"),
        AlbumSlot::new(2, "No Cover", "B"),
    ])
    .unwrap();
    // Cell 0: album + cover. Cell 1: album only. Cell 2: cover only.
    let embeds = embeds_at(&[0, 2]);

    let doc = compose(&grid, &embeds, &CardOpts::default());
    assert_eq!(doc.image_count(), 1);
    assert_eq!(doc.placeholder_count(), 8);
    match &doc.cells[0].content {
        CellContent::Image { href, label } => {
            assert!(href.starts_with("data:image/png;base64,"));
            assert_eq!(label, "With Cover / A");
        }
        other => panic!("expected image, got {other:?}"),
    }
    assert_eq!(doc.cells[1].content, CellContent::Placeholder);
    assert_eq!(doc.cells[2].content, CellContent::Placeholder);
}

#[test]
fn cell_size_follows_options() {
    let opts = CardOpts {
        cell_px: 100,
        ..CardOpts::default()
    };
    let doc = compose(&SlotGrid::empty(), &[], &opts);
    assert_eq!(doc.canvas, Canvas::for_grid(100));
    assert_eq!(doc.cells[8].rect, Rect::new(200.0, 200.0, 300.0, 300.0));
}
