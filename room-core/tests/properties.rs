//! Property tests for snapping, clamping and layout round trips

use proptest::prelude::*;
use room_core::grid::snap;
use room_core::{CanvasRect, GridSize, ItemKind, LayoutController, MemoryStore};

fn kind_strategy() -> impl Strategy<Value = ItemKind> {
    prop_oneof![
        Just(ItemKind::PlaqueGold),
        Just(ItemKind::PlaquePlatinum),
        Just(ItemKind::Plant),
    ]
}

fn rect_strategy() -> impl Strategy<Value = CanvasRect> {
    (0.0f64..500.0, 0.0f64..500.0, 120.0f64..2400.0, 80.0f64..1600.0)
        .prop_map(|(l, t, w, h)| CanvasRect::new(l, t, w, h))
}

fn build(placements: &[(ItemKind, f64, f64)], snap: bool) -> LayoutController {
    let rect = CanvasRect::new(0.0, 0.0, 1200.0, 800.0);
    let mut c = LayoutController::default();
    c.set_snap_to_grid(snap);
    for (kind, x, y) in placements {
        c.place_item(*kind, *x, *y, &rect).unwrap();
    }
    c
}

proptest! {
    #[test]
    fn prop_snap_lands_on_cell_multiples(
        rect in rect_strategy(),
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
    ) {
        let grid = GridSize::default();
        let (cw, ch) = grid.cell(&rect);
        let (px, py) = (fx * rect.width, fy * rect.height);
        let (sx, sy) = snap(px, py, &rect, grid, true);

        let kx = (sx / cw).round();
        let ky = (sy / ch).round();
        prop_assert!((kx * cw - sx).abs() <= 1e-9 * rect.width);
        prop_assert!((ky * ch - sy).abs() <= 1e-9 * rect.height);
        prop_assert!(sx <= px + 1e-9 * rect.width && px - sx < cw + 1e-9);
        prop_assert!(sy <= py + 1e-9 * rect.height && py - sy < ch + 1e-9);
    }

    #[test]
    fn prop_moves_stay_inside_canvas(
        rect in rect_strategy(),
        snap_on in any::<bool>(),
        moves in prop::collection::vec((-3000.0f64..5000.0, -3000.0f64..5000.0), 1..20),
    ) {
        let mut c = LayoutController::default();
        c.set_snap_to_grid(snap_on);
        let id = c.place_item(ItemKind::Plant, 0.0, 0.0, &rect).unwrap().id;
        let (cw, ch) = c.grid().cell(&rect);
        for (x, y) in moves {
            let item = c.move_item(id, x, y, &rect).unwrap();
            prop_assert!(item.x >= 0.0 && item.x <= rect.width - cw + 1e-9);
            prop_assert!(item.y >= 0.0 && item.y <= rect.height - ch + 1e-9);
        }
    }

    #[test]
    fn prop_share_round_trip(
        placements in prop::collection::vec((kind_strategy(), 0.0f64..1200.0, 0.0f64..800.0), 0..30),
        snap_on in any::<bool>(),
    ) {
        let c = build(&placements, snap_on);
        let decoded = LayoutController::decode_shareable(&c.encode_shareable().unwrap()).unwrap();
        prop_assert_eq!(decoded, c.items().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn prop_save_load_round_trip(
        placements in prop::collection::vec((kind_strategy(), 0.0f64..1200.0, 0.0f64..800.0), 0..30),
        snap_on in any::<bool>(),
    ) {
        let c = build(&placements, snap_on);
        let mut store = MemoryStore::new();
        c.save(&mut store).unwrap();
        let mut restored = LayoutController::default();
        prop_assert_eq!(restored.load(&store).unwrap(), placements.len());
        prop_assert_eq!(restored.snapshot(), c.snapshot());
    }
}
