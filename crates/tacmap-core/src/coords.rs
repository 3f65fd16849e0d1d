//! Screen to canvas coordinate mapping.
//!
//! Canvas space is 0..100 on both axes, relative to the canvas element's
//! rendered bounding box. The box already reflects any zoom scale, so the
//! mapping never needs the zoom factor.

use kurbo::{Point, Rect};

/// Reports where the canvas element is currently drawn, in client pixels.
pub trait ViewportQuery {
    /// Bounding rectangle of the canvas, or `None` if it is not laid out.
    fn canvas_rect(&self) -> Option<Rect>;
}

impl ViewportQuery for Rect {
    fn canvas_rect(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl<T: ViewportQuery + ?Sized> ViewportQuery for &T {
    fn canvas_rect(&self) -> Option<Rect> {
        (**self).canvas_rect()
    }
}

/// Map a client position into percentage space, clamped to `[0, 100]`.
///
/// Returns `None` for a degenerate rectangle.
pub fn to_percent(client: Point, rect: Rect) -> Option<Point> {
    let width = rect.width();
    let height = rect.height();
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    let x = (client.x - rect.x0) / width * 100.0;
    let y = (client.y - rect.y0) / height * 100.0;
    Some(Point::new(x.clamp(0.0, 100.0), y.clamp(0.0, 100.0)))
}

/// Map a client position using the viewport's current rectangle.
pub fn map_pointer(viewport: &impl ViewportQuery, client: Point) -> Option<Point> {
    to_percent(client, viewport.canvas_rect()?)
}

/// Map a percentage point onto a surface of `width` x `height` pixels.
pub fn to_pixels(point: Point, width: f64, height: f64) -> Point {
    Point::new(point.x / 100.0 * width, point.y / 100.0 * height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_relative_to_rect() {
        let rect = Rect::new(100.0, 50.0, 900.0, 500.0);
        let p = to_percent(Point::new(500.0, 275.0), rect).unwrap();
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamps_outside_points() {
        let rect = Rect::new(0.0, 0.0, 800.0, 450.0);
        assert_eq!(to_percent(Point::new(-20.0, 900.0), rect), Some(Point::new(0.0, 100.0)));
        assert_eq!(to_percent(Point::new(1000.0, -1.0), rect), Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_zoomed_rect_gives_same_percentages() {
        // The same visual spot on a canvas rendered at 1x and 2x.
        let normal = Rect::new(0.0, 0.0, 800.0, 450.0);
        let zoomed = Rect::new(0.0, 0.0, 1600.0, 900.0);
        let a = to_percent(Point::new(200.0, 90.0), normal).unwrap();
        let b = to_percent(Point::new(400.0, 180.0), zoomed).unwrap();
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.y - b.y).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_rect() {
        assert!(to_percent(Point::ZERO, Rect::new(10.0, 10.0, 10.0, 40.0)).is_none());
    }

    #[test]
    fn test_viewport_query_fake() {
        struct Unmounted;
        impl ViewportQuery for Unmounted {
            fn canvas_rect(&self) -> Option<Rect> {
                None
            }
        }
        assert!(map_pointer(&Unmounted, Point::ZERO).is_none());
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(map_pointer(&rect, Point::new(50.0, 25.0)), Some(Point::new(25.0, 25.0)));
    }

    #[test]
    fn test_to_pixels() {
        assert_eq!(to_pixels(Point::new(50.0, 25.0), 1600.0, 900.0), Point::new(800.0, 225.0));
    }
}
