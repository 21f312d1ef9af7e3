use approx::assert_relative_eq;
use proptest::prelude::*;

use longview_core::config::InitialWindow;
use longview_core::{ImageMetrics, Rect, Viewport};

fn layout(view_w: u32, view_h: u32, img_w: u32, img_h: u32) -> Viewport {
    Viewport::initialize_layout(
        view_w,
        view_h,
        ImageMetrics::new(img_w, img_h),
        3,
        InitialWindow::ViewSized,
    )
    .unwrap()
}

fn assert_invariants(vp: &Viewport) {
    let img = vp.image();
    assert!(
        vp.rect().is_within(img.width, img.height),
        "{} escapes {}x{}",
        vp.rect(),
        img.width,
        img.height
    );
    assert!(vp.current_scale() >= vp.base_scale());
    assert!(vp.current_scale() <= vp.max_scale());
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn test_long_image_layout() {
    let vp = layout(1000, 2000, 3000, 9000);
    assert_relative_eq!(vp.base_scale(), 1.0 / 3.0, epsilon = 1e-6);
    assert_eq!(vp.current_scale(), vp.base_scale());
    assert_eq!(vp.rect(), Rect::new(0, 0, 1000, 6000));
}

#[test]
fn test_scale_fitted_window() {
    let vp = Viewport::initialize_layout(
        1000,
        2000,
        ImageMetrics::new(3000, 9000),
        3,
        InitialWindow::ScaleFitted,
    )
    .unwrap();
    assert_eq!(vp.rect(), Rect::new(0, 0, 3000, 6000));
}

#[test]
fn test_double_tap_example() {
    let mut vp = layout(1000, 2000, 3000, 9000);
    vp.translate(0, 1234);
    vp.toggle_zoom();
    assert_relative_eq!(vp.current_scale(), 1.0, epsilon = 1e-5);
    assert_eq!(vp.rect(), Rect::new(0, 1234, 1000, 3234));

    vp.toggle_zoom();
    assert_eq!(vp.current_scale(), vp.base_scale());
    assert_eq!(vp.rect(), Rect::new(0, 1234, 3000, 7234));
}

#[test]
fn test_zoom_out_near_bottom_slides_up() {
    let mut vp = layout(1000, 2000, 3000, 9000);
    vp.set_scale(1.0);
    vp.translate(0, 6500);
    assert_eq!(vp.rect(), Rect::new(0, 6500, 1000, 8500));
    vp.toggle_zoom();
    // 6000 rows from 6500 would pass 9000.
    assert_eq!(vp.rect(), Rect::new(0, 3000, 3000, 9000));
}

#[test]
fn test_zoom_near_bottom_right_clamps() {
    let mut vp = layout(1000, 2000, 3000, 9000);
    vp.set_scale(1.0);
    vp.translate(10_000, 10_000);
    assert_eq!(vp.rect(), Rect::new(2000, 7000, 3000, 9000));
    vp.set_scale(0.5);
    // Anchored at top-left: 2000x4000 would overflow both edges.
    assert_eq!(vp.rect(), Rect::new(1000, 5000, 3000, 9000));
}

#[test]
fn test_scale_extremes() {
    let mut vp = layout(1000, 2000, 3000, 9000);
    vp.set_scale(vp.current_scale() * 1000.0);
    assert_eq!(vp.current_scale(), vp.base_scale() * 3.0);
    vp.set_scale(vp.current_scale() * 0.0001);
    assert_eq!(vp.current_scale(), vp.base_scale());
    vp.set_scale(f32::INFINITY);
    assert_eq!(vp.current_scale(), vp.max_scale());
    vp.set_scale(-2.0);
    assert_eq!(vp.current_scale(), vp.base_scale());
}

#[test]
fn test_scroll_limits() {
    let mut vp = layout(1000, 2000, 3000, 9000);
    assert_eq!(vp.scroll_limits(), (0, 3000));
    vp.set_scale(1.0);
    assert_eq!(vp.scroll_limits(), (2000, 7000));
}

#[test]
fn test_translate_by_full_i32_range() {
    let mut vp = layout(1000, 2000, 3000, 9000);
    vp.translate(i32::MAX, 0);
    assert_eq!(vp.rect(), Rect::new(2000, 0, 3000, 6000));
    vp.translate(i32::MIN, i32::MAX);
    assert_eq!(vp.rect(), Rect::new(0, 3000, 1000, 9000));
    vp.set_position(i32::MAX, i32::MIN);
    assert_eq!(vp.rect(), Rect::new(2000, 0, 3000, 6000));
}

#[test]
fn test_set_position_keeps_size() {
    let mut vp = layout(1000, 2000, 3000, 9000);
    vp.set_position(0, 8500);
    assert_eq!(vp.rect(), Rect::new(0, 3000, 1000, 9000));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Op {
    Translate(i32, i32),
    Position(i32, i32),
    Scale(f32),
    Pinch(f32),
    Toggle,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-20_000i32..20_000, -20_000i32..20_000).prop_map(|(dx, dy)| Op::Translate(dx, dy)),
        (any::<i32>(), any::<i32>()).prop_map(|(dx, dy)| Op::Translate(dx, dy)),
        (any::<i32>(), any::<i32>()).prop_map(|(x, y)| Op::Position(x, y)),
        (0.0001f32..1000.0).prop_map(Op::Scale),
        (0.01f32..100.0).prop_map(Op::Pinch),
        Just(Op::Toggle),
    ]
}

proptest! {
    #[test]
    fn prop_base_scale_after_layout(
        view_w in 1u32..4000,
        view_h in 1u32..4000,
        img_w in 1u32..20_000,
        img_h in 1u32..60_000,
    ) {
        let vp = layout(view_w, view_h, img_w, img_h);
        prop_assert_eq!(vp.base_scale(), view_w as f32 / img_w as f32);
        prop_assert_eq!(vp.current_scale(), vp.base_scale());
        let img = vp.image();
        prop_assert!(vp.rect().is_within(img.width, img.height));
    }

    #[test]
    fn prop_invariants_hold_after_every_op(
        view_w in 1u32..2000,
        view_h in 1u32..2000,
        img_w in 1u32..10_000,
        img_h in 1u32..40_000,
        ops in proptest::collection::vec(op(), 1..40),
    ) {
        let mut vp = layout(view_w, view_h, img_w, img_h);
        for op in ops {
            match op {
                Op::Translate(dx, dy) => vp.translate(dx, dy),
                Op::Position(x, y) => vp.set_position(x, y),
                Op::Scale(s) => vp.set_scale(s),
                Op::Pinch(f) => vp.set_scale(vp.current_scale() * f),
                Op::Toggle => vp.toggle_zoom(),
            }
            assert_invariants(&vp);
        }
    }

    #[test]
    fn prop_clamp_is_idempotent(
        img_w in 1u32..5000,
        img_h in 1u32..20_000,
        dx in -50_000i32..50_000,
        dy in -50_000i32..50_000,
        scale in 0.0f32..10.0,
    ) {
        let mut vp = layout(800, 1600, img_w, img_h);
        vp.set_scale(scale);
        vp.translate(dx, dy);
        let once = vp.rect();
        vp.clamp_to_bounds();
        prop_assert_eq!(vp.rect(), once);
        vp.clamp_to_bounds();
        prop_assert_eq!(vp.rect(), once);
    }

    #[test]
    fn prop_scale_stays_in_range(factor in 0.0f32..1.0e6) {
        let mut vp = layout(1000, 2000, 3000, 9000);
        vp.set_scale(vp.current_scale() * factor);
        prop_assert!(vp.current_scale() >= vp.base_scale());
        prop_assert!(vp.current_scale() <= vp.base_scale() * 3.0);
    }
}
