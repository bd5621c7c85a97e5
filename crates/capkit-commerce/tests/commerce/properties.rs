use capkit_commerce::{designs_equal, Cart, NewCartLine, DEFAULT_MERGE_TOLERANCE};
use capkit_core::{Layer, NewLayer, View};
use proptest::prelude::*;

fn design(x: f64, y: f64) -> Vec<Layer> {
    vec![NewLayer::image("logo.png", View::Front)
        .at(x, y)
        .sized(20.0, 20.0)
        .into_layer("logo".into())]
}

fn line(layers: Vec<Layer>) -> NewCartLine {
    NewCartLine {
        product_id: "custom-hat".to_string(),
        product_name: "Custom Cap".to_string(),
        color: "black".to_string(),
        color_label: "Midnight Black".to_string(),
        size: "M".to_string(),
        quantity: 1,
        design_layers: layers,
    }
}

proptest! {
    #[test]
    fn prop_merge_iff_offsets_within_tolerance(
        x in 0.0f64..80.0,
        y in 0.0f64..80.0,
        dx in -2.0f64..2.0,
        dy in -2.0f64..2.0,
    ) {
        let a = design(x, y);
        let b = design(x + dx, y + dy);
        let expected = (b[0].x - a[0].x).abs() < DEFAULT_MERGE_TOLERANCE
            && (b[0].y - a[0].y).abs() < DEFAULT_MERGE_TOLERANCE;
        prop_assert_eq!(designs_equal(&a, &b, DEFAULT_MERGE_TOLERANCE), expected);

        let mut cart = Cart::new();
        cart.add_line(line(a));
        cart.add_line(line(b));
        prop_assert_eq!(cart.len(), if expected { 1 } else { 2 });
        prop_assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn prop_rotation_or_flip_difference_never_merges(
        x in 0.0f64..80.0,
        rotation in 1.0f64..359.0,
        flip in any::<bool>(),
    ) {
        let a = design(x, 30.0);
        let mut b = design(x, 30.0);
        if flip {
            b[0].flip_y = true;
        } else {
            b[0].rotation = rotation;
        }
        prop_assert!(!designs_equal(&a, &b, DEFAULT_MERGE_TOLERANCE));
    }
}
