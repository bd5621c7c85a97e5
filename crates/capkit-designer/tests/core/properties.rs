use capkit_designer::transform::{resize_frame, rotate_into_local, ResizeHandle};
use capkit_designer::{CanvasScale, LayerFrame, LayerStore, NewLayer, View};
use proptest::prelude::*;

fn any_handle() -> impl Strategy<Value = ResizeHandle> {
    (0..ResizeHandle::ALL.len()).prop_map(|i| ResizeHandle::ALL[i])
}

proptest! {
    #[test]
    fn percent_round_trip(p in 0.0f64..=100.0, size in 1.0f64..4000.0) {
        let scale = CanvasScale::new(size);
        let back = scale.to_percent(scale.to_pixel(p));
        prop_assert!((back - p).abs() < 1e-9, "{} came back as {}", p, back);
    }

    #[test]
    fn rotation_stays_in_range(start in -720.0f64..720.0, deltas in prop::collection::vec(-1000.0f64..1000.0, 1..20)) {
        let mut store = LayerStore::new();
        let id = store.add_layer(NewLayer::text("R", View::Front).rotated(start));
        for delta in deltas {
            store.rotate_layer(&id, delta);
            let rotation = store.layer(&id).unwrap().rotation;
            prop_assert!((0.0..360.0).contains(&rotation), "rotation {}", rotation);
        }
    }

    #[test]
    fn ten_eighths_of_a_turn_wraps(start in 0u32..360) {
        let mut store = LayerStore::new();
        let id = store.add_layer(NewLayer::text("R", View::Front).rotated(start as f64));
        for _ in 0..8 {
            store.rotate_layer(&id, 45.0);
        }
        let rotation = store.layer(&id).unwrap().rotation;
        prop_assert!((rotation - start as f64).abs() < 1e-9);
    }

    #[test]
    fn image_resize_keeps_aspect(
        w in 5.0f64..60.0,
        h in 5.0f64..60.0,
        dx in -30.0f64..30.0,
        dy in -30.0f64..30.0,
        handle in any_handle(),
    ) {
        let start = LayerFrame::new(20.0, 20.0, w, h);
        let frame = resize_frame(start, handle, dx, dy, true, 1.0);
        let before = w / h;
        let after = frame.width / frame.height;
        prop_assert!((before - after).abs() < 1e-9, "{} vs {}", before, after);
        prop_assert!(frame.width >= 1.0 - 1e-9 && frame.height >= 1.0 - 1e-9);
    }

    #[test]
    fn rotation_correction_preserves_length(dx in -100.0f64..100.0, dy in -100.0f64..100.0, t in 0.0f64..360.0) {
        let (lx, ly) = rotate_into_local(dx, dy, t);
        let before = (dx * dx + dy * dy).sqrt();
        let after = (lx * lx + ly * ly).sqrt();
        prop_assert!((before - after).abs() < 1e-9);
    }
}

#[test]
fn ten_times_forty_five_wraps_to_start() {
    let mut store = LayerStore::new();
    let id = store.add_layer(NewLayer::text("R", View::Front).rotated(30.0));
    for _ in 0..10 {
        store.rotate_layer(&id, 45.0);
    }
    // 450 degrees past the start
    assert!((store.layer(&id).unwrap().rotation - 120.0).abs() < 1e-9);
    for _ in 0..6 {
        store.rotate_layer(&id, 45.0);
    }
    assert!((store.layer(&id).unwrap().rotation - 30.0).abs() < 1e-9);
}
