use super::*;

fn album(pos: u8) -> AlbumSlot {
    AlbumSlot::new(pos, format!("Album {pos}"), "Artist")
}

#[test]
fn sequence_numbers_from_list_order_and_keeps_nine() {
    let albums = (0..12).map(|_| AlbumSlot::new(0, "a", "b"));
    let seq = AlbumSlot::sequence(albums);
    assert_eq!(seq.len(), 9);
    let positions: Vec<u8> = seq.iter().map(|a| a.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn blank_image_url_reads_as_missing() {
    let a = album(1).with_image_url("   ");
    assert_eq!(a.image_url(), None);
    let a = album(1).with_image_url(" https://img.example/a.jpg ");
    assert_eq!(a.image_url(), Some("https://img.example/a.jpg"));
}

#[test]
fn grid_places_albums_by_position_with_gaps() {
    let grid = SlotGrid::from_slots(&[album(2), album(9)]).unwrap();
    assert_eq!(grid.album_count(), 2);
    assert!(grid.get(0).is_none());
    assert_eq!(grid.get(1).map(|a| a.position), Some(2));
    assert_eq!(grid.get(8).map(|a| a.position), Some(9));
    assert_eq!(grid.iter().count(), 9);
}

#[test]
fn grid_rejects_out_of_range_and_duplicate_positions() {
    assert!(SlotGrid::from_slots(&[album(0)]).is_err());
    assert!(SlotGrid::from_slots(&[album(10)]).is_err());
    assert!(SlotGrid::from_slots(&[album(3), album(3)]).is_err());
}

#[test]
fn empty_grid_has_nine_empty_cells() {
    let grid = SlotGrid::from_slots(&[]).unwrap();
    assert!(grid.is_empty());
    assert!(grid.iter().all(|(_, a)| a.is_none()));
}

#[test]
fn request_json_assigns_missing_positions() {
    let json = r#"{
        "title": "Summer",
        "albums": [
            { "name": "A", "artist": "X", "image_url": "https://img.example/a.jpg" },
            { "name": "B", "artist": "Y" }
        ]
    }"#;
    let req = CardRequest::from_reader(json.as_bytes()).unwrap();
    assert_eq!(req.title.as_deref(), Some("Summer"));
    assert_eq!(req.albums[0].position, 1);
    assert_eq!(req.albums[1].position, 2);
    assert_eq!(req.albums[1].image_url(), None);
}

#[test]
fn request_json_keeps_explicit_positions() {
    let json = r#"{ "albums": [ { "position": 5, "name": "A", "artist": "X" } ] }"#;
    let req = CardRequest::from_reader(json.as_bytes()).unwrap();
    assert_eq!(req.albums[0].position, 5);
}

#[test]
fn request_json_fills_gaps_around_explicit_positions() {
    let json = r#"{ "albums": [
        { "name": "A", "artist": "X" },
        { "position": 1, "name": "B", "artist": "Y" },
        { "name": "C", "artist": "Z" },
        { "position": 9, "name": "D", "artist": "W" }
    ] }"#;
    let req = CardRequest::from_reader(json.as_bytes()).unwrap();
    let positions: Vec<u8> = req.albums.iter().map(|a| a.position).collect();
    assert_eq!(positions, vec![2, 1, 3, 9]);
    SlotGrid::from_slots(&req.albums).unwrap();
}

#[test]
fn request_json_drops_unpositioned_albums_without_a_free_cell() {
    let mut albums: Vec<String> = (1..=9)
        .map(|p| format!(r#"{{ "position": {p}, "name": "N{p}", "artist": "A" }}"#))
        .collect();
    albums.push(r#"{ "name": "Extra", "artist": "A" }"#.to_string());
    let json = format!(r#"{{ "albums": [{}] }}"#, albums.join(","));

    let req = CardRequest::from_reader(json.as_bytes()).unwrap();
    assert_eq!(req.albums.len(), 9);
    assert!(req.albums.iter().all(|a| a.name != "Extra"));
}

#[test]
fn post_id_validation() {
    assert_eq!(PostId::parse(" post_1-a ").unwrap().as_str(), "post_1-a");
    assert!(PostId::parse("").is_err());
    assert!(PostId::parse("../etc/passwd").is_err());
    assert!(PostId::parse("a b").is_err());
    assert!(PostId::parse(&"x".repeat(PostId::MAX_LEN + 1)).is_err());
}
