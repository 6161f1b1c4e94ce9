//! End-to-end tests driving the public editing API: paint, undo, layer
//! juggling, and the save/load round-trip.

use gridmap_core::{CollisionEdge, TileOffset, TilePatch, TileState};
use gridmap_editor::{Map, MapConfig, PointerButton, ViewportConfig, HISTORY_CAPACITY};

fn editor_map(width: u32, height: u32) -> Map {
    Map::new(MapConfig::new(width, height), ViewportConfig::default())
}

/// A map wired with a callback that paints the given texture on click
fn painting_map(width: u32, height: u32, texture: &str) -> Map {
    let mut map = editor_map(width, height);
    let texture = texture.to_string();
    map.set_on_tile_click(Box::new(move |tile| {
        tile.set_state(&TilePatch::new().texture(texture.clone()));
        true
    }));
    map
}

#[test]
fn save_load_save_is_byte_identical() {
    let mut map = painting_map(6, 5, "wall");
    map.pointer_down(0, 0, PointerButton::Primary);
    map.pointer_down(3, 2, PointerButton::Primary);
    map.add_layer_above();
    map.fill_tiles(&TileState {
        rotation_degrees: 180.0,
        tint: 0x336699,
        alpha: 0.25,
        offset: TileOffset::new(4.0, -4.0),
        ..TileState::with_texture("floor")
    });
    map.pointer_enter(2, 3, false);
    map.toggle_collision_on_highlighted_tile(CollisionEdge::East);
    map.set_event(5, 4, "stairs_down");
    map.set_player_layer();

    let first = map.save();
    let first_json = first.to_json().unwrap();

    map.load(&first, false).unwrap();
    let second_json = map.save().to_json().unwrap();

    assert_eq!(first_json, second_json);
}

#[test]
fn active_layer_invariant_holds_through_any_sequence() {
    let mut map = editor_map(4, 4);

    let check = |map: &Map| {
        assert!(map.layer_count() >= 1);
        assert!(map.active_layer() < map.layer_count());
    };

    map.set_active_layer(usize::MAX);
    check(&map);

    for _ in 0..5 {
        map.add_layer_above();
        check(&map);
    }
    for _ in 0..3 {
        map.add_layer_below();
        check(&map);
    }
    map.set_active_layer(0);
    check(&map);
    for _ in 0..20 {
        map.remove_layer();
        check(&map);
    }
    assert_eq!(map.layer_count(), 1);

    map.next_layer();
    check(&map);
    map.previous_layer();
    check(&map);
}

#[test]
fn history_is_bounded_and_undo_terminates() {
    let mut map = painting_map(12, 12, "wall");

    for i in 0..130u32 {
        map.pointer_down(i % 12, (i / 12) % 12, PointerButton::Primary);
    }
    assert!(map.history_depth() <= HISTORY_CAPACITY);

    let mut undos = 0;
    while map.can_undo() {
        map.undo();
        undos += 1;
        assert!(undos <= HISTORY_CAPACITY, "undo chain failed to terminate");
    }
    assert_eq!(map.history_depth(), 1);

    // Past the baseline, undo is a no-op rather than a panic
    map.undo();
    assert_eq!(map.history_depth(), 1);
}

#[test]
fn empty_cells_round_trip_as_null() {
    let mut map = painting_map(3, 3, "wall");
    map.pointer_down(1, 1, PointerButton::Primary);

    let json = map.save_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["tiles"][0][0][0].is_null());
    assert_eq!(value["tiles"][0][1][1]["textureId"], "wall");

    let mut restored = editor_map(3, 3);
    restored.load_json(&json, false).unwrap();
    assert!(restored.layer(0).unwrap().tile(0, 0).unwrap().state().is_none());
    assert_eq!(
        restored
            .layer(0)
            .unwrap()
            .tile(1, 1)
            .unwrap()
            .state()
            .unwrap()
            .texture_id,
        "wall"
    );
}

#[test]
fn fresh_collision_blocks_everything_and_toggles_are_surgical() {
    let mut map = editor_map(5, 5);
    for column in map.collision() {
        for cell in column {
            assert!(cell.is_fully_blocked());
        }
    }

    map.pointer_enter(2, 3, false);
    map.toggle_collision_on_highlighted_tile(CollisionEdge::North);

    let cell = map.collision_at(2, 3).unwrap();
    assert!(!cell.north);
    assert!(cell.south && cell.east && cell.west);
    for (x, column) in map.collision().iter().enumerate() {
        for (y, other) in column.iter().enumerate() {
            if (x, y) != (2, 3) {
                assert!(other.is_fully_blocked());
            }
        }
    }
}

#[test]
fn paint_then_undo_restores_the_empty_cell() {
    let mut map = editor_map(5, 5);
    map.set_on_tile_click(Box::new(|tile| {
        tile.set_state(&TilePatch::from(TileState::with_texture("wall")));
        true
    }));

    map.pointer_down(1, 1, PointerButton::Primary);
    let states = map.layer(0).unwrap().tile_states();
    assert_eq!(states[1][1], Some(TileState::with_texture("wall")));

    map.undo();
    let states = map.layer(0).unwrap().tile_states();
    assert_eq!(states[1][1], None);
}

#[test]
fn layer_insertion_preserves_existing_content() {
    let mut map = painting_map(4, 4, "wall");
    map.add_layer_above();
    map.set_active_layer(0);
    map.pointer_down(0, 0, PointerButton::Primary);

    map.add_layer_above();

    assert_eq!(map.layer_count(), 3);
    // The painted layer still sits at the bottom; the new layer went in
    // between and took the focus
    assert_eq!(
        map.layer(0)
            .unwrap()
            .tile(0, 0)
            .unwrap()
            .state()
            .unwrap()
            .texture_id,
        "wall"
    );
    assert!(map.layer(1).unwrap().is_empty());
    assert_eq!(map.active_layer(), 1);
}

#[test]
fn reset_is_destructive_and_collapses_history() {
    let mut map = painting_map(5, 5, "wall");
    map.pointer_down(0, 0, PointerButton::Primary);
    map.pointer_down(1, 0, PointerButton::Primary);
    map.add_layer_above();
    assert!(map.history_depth() >= 3);

    map.reset(10, 10);

    assert_eq!(map.layer_count(), 1);
    assert!(map.layer(0).unwrap().is_empty());
    assert_eq!((map.config().width, map.config().height), (10, 10));
    assert_eq!(map.collision().len(), 10);
    assert!(map
        .collision()
        .iter()
        .flatten()
        .all(|cell| cell.is_fully_blocked()));
    assert_eq!(map.history_depth(), 1);
}

#[test]
fn undo_restores_collision_events_and_player_layer() {
    let mut map = painting_map(4, 4, "wall");
    map.set_event(0, 0, "spawn");
    map.pointer_enter(1, 1, false);
    map.toggle_collision_on_highlighted_tile(CollisionEdge::West);
    map.add_layer_above();
    map.set_player_layer();
    map.update_history();

    assert_eq!(map.player_layer(), 1);

    // Unwind everything
    while map.can_undo() {
        map.undo();
    }

    assert_eq!(map.event(0, 0), Some(""));
    assert!(map.collision_at(1, 1).unwrap().is_fully_blocked());
    assert_eq!(map.layer_count(), 1);
    assert_eq!(map.player_layer(), 0);
}

#[test]
fn hard_load_adopts_foreign_dimensions() {
    let mut small = painting_map(3, 3, "wall");
    small.pointer_down(2, 2, PointerButton::Primary);

    let mut big = painting_map(8, 6, "floor");
    big.pointer_down(7, 5, PointerButton::Primary);
    let export = big.save_json().unwrap();

    small.load_json(&export, true).unwrap();
    assert_eq!((small.config().width, small.config().height), (8, 6));
    assert_eq!(
        small
            .layer(0)
            .unwrap()
            .tile(7, 5)
            .unwrap()
            .state()
            .unwrap()
            .texture_id,
        "floor"
    );
    assert_eq!(small.history_depth(), 1);
}
