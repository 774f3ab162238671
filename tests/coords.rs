use glam::IVec2;
use mapper::camera::{Camera, CoordTransform};
use mapper::{DISPLAY_SIZE, WORLD_OFFSET};

#[test]
fn test_world_view_round_trip_over_whole_world() {
    let t = CoordTransform::default();
    for x in -WORLD_OFFSET..WORLD_OFFSET {
        for y in -WORLD_OFFSET..WORLD_OFFSET {
            let v = t.world_to_view(x, y);
            assert_eq!(t.view_to_world(v.x, v.y), IVec2::new(x, y));
        }
    }
}

#[test]
fn test_every_pixel_of_a_tile_maps_back_to_it() {
    let t = CoordTransform::default();
    let origin = t.world_to_view(-3, 7);
    let d = DISPLAY_SIZE as i32;
    for (dx, dy) in [(0, 0), (d - 1, 0), (0, d - 1), (d - 1, d - 1), (d / 2, 1)] {
        assert_eq!(t.view_to_world(origin.x + dx, origin.y + dy), IVec2::new(-3, 7));
    }
}

#[test]
fn test_world_origin_tile_position() {
    let t = CoordTransform::default();
    assert_eq!(t.world_to_view(0, 0), IVec2::splat(WORLD_OFFSET * DISPLAY_SIZE as i32));
    assert_eq!(t.world_to_view(-WORLD_OFFSET, -WORLD_OFFSET), IVec2::ZERO);
}

#[test]
fn test_negative_view_pixels_floor() {
    let t = CoordTransform::default();
    assert_eq!(t.view_to_world(-1, -1), IVec2::splat(-WORLD_OFFSET - 1));
    assert!(!t.in_bounds(-WORLD_OFFSET - 1, 0));
    assert!(t.in_bounds(-WORLD_OFFSET, WORLD_OFFSET - 1));
    assert!(!t.in_bounds(0, WORLD_OFFSET));
}

#[test]
fn test_camera_screen_world_round_trip() {
    let mut cam = Camera::new(CoordTransform::default(), IVec2::new(800, 600));
    cam.center_on(10, -20);
    let s = cam.world_to_screen(10, -20);
    assert_eq!(cam.screen_to_world(s + IVec2::splat(5)), IVec2::new(10, -20));

    // The centred tile sits in the middle of the viewport.
    let d = DISPLAY_SIZE as i32;
    assert_eq!(s + IVec2::splat(d / 2), IVec2::new(400, 300));
}

#[test]
fn test_camera_scroll_is_clamped_to_world() {
    let mut cam = Camera::new(CoordTransform::default(), IVec2::new(800, 600));
    cam.center_on(-WORLD_OFFSET, -WORLD_OFFSET);
    assert_eq!(cam.scroll, IVec2::ZERO);

    cam.scroll_by(IVec2::splat(i32::MAX / 2));
    let extent = cam.transform.world_extent();
    assert_eq!(cam.scroll, IVec2::new(extent - 800, extent - 600));
}
