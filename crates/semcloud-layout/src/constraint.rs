#![forbid(unsafe_code)]

//! Maximum drawable area handed to layout strategies.

use serde::{Deserialize, Serialize};

use semcloud_geom::{Point, Rect};

use crate::result::LayoutResult;

/// Drawable-area limit in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingConstraint {
    /// Maximum bounding-box area.
    pub max_area: f64,
    /// Optional maximum bounding-box width.
    pub max_width: Option<f64>,
}

impl Default for BoundingConstraint {
    fn default() -> Self {
        Self::area(25_000.0)
    }
}

impl BoundingConstraint {
    /// Area-only constraint.
    #[must_use]
    pub const fn area(max_area: f64) -> Self {
        Self {
            max_area,
            max_width: None,
        }
    }

    #[must_use]
    pub const fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = Some(max_width);
        self
    }

    /// True when `bb` fits within the limits.
    #[must_use]
    pub fn admits(&self, bb: &Rect) -> bool {
        let area_ok = bb.area() <= self.max_area;
        let width_ok = self.max_width.is_none_or(|w| bb.width() <= w);
        area_ok && width_ok
    }

    /// Uniform scale factor (`<= 1`) that brings `bb` within the limits.
    #[must_use]
    pub fn scale_for(&self, bb: &Rect) -> f64 {
        let mut factor: f64 = 1.0;
        let area = bb.area();
        if area > self.max_area && area > 0.0 {
            factor = factor.min((self.max_area.max(0.0) / area).sqrt());
        }
        if let Some(w) = self.max_width {
            if bb.width() > w && bb.width() > 0.0 {
                factor = factor.min(w.max(0.0) / bb.width());
            }
        }
        factor
    }

    /// Shrink `result` uniformly about its bounding-box origin until it fits.
    ///
    /// Uniform scaling keeps disjoint rectangles disjoint. Returns the applied
    /// factor, or `None` when nothing had to change.
    pub fn enforce(&self, result: &mut LayoutResult) -> Option<f64> {
        let bb = result.bounding_box().ok()?;
        if self.admits(&bb) {
            return None;
        }
        // Shave a hair off so floating-point rounding cannot land just above
        // the limit.
        let factor = self.scale_for(&bb) * (1.0 - 1e-9);
        result.scale_about(Point::new(bb.min_x(), bb.min_y()), factor);
        Some(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_within_limits() {
        let c = BoundingConstraint::area(100.0);
        assert!(c.admits(&Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!c.admits(&Rect::new(0.0, 0.0, 11.0, 10.0)));
        let narrow = c.with_max_width(5.0);
        assert!(!narrow.admits(&Rect::new(0.0, 0.0, 6.0, 1.0)));
    }

    #[test]
    fn enforce_scales_down_to_fit() {
        let c = BoundingConstraint::area(1_000.0);
        let mut result = LayoutResult::from_placements([
            ("a", Some(Rect::new(10.0, 10.0, 100.0, 50.0))),
            ("b", Some(Rect::new(110.0, 10.0, 100.0, 50.0))),
        ]);
        let factor = c.enforce(&mut result).unwrap();
        assert!(factor < 1.0);
        let bb = result.bounding_box().unwrap();
        assert!(bb.area() <= 1_000.0);
        assert_eq!(bb.min_x(), 10.0);
        assert_eq!(bb.min_y(), 10.0);
        // Touching neighbours stay touching, not overlapping.
        let a = result.rect_of("a").unwrap();
        let b = result.rect_of("b").unwrap();
        assert!(!a.intersects(b));
    }

    #[test]
    fn enforce_respects_width() {
        let c = BoundingConstraint::area(1e9).with_max_width(50.0);
        let mut result = LayoutResult::from_placements([("a", Some(Rect::new(0.0, 0.0, 200.0, 10.0)))]);
        c.enforce(&mut result);
        assert!(result.bounding_box().unwrap().width() <= 50.0);
    }

    #[test]
    fn enforce_is_noop_when_fitting_or_empty() {
        let c = BoundingConstraint::default();
        let mut fits = LayoutResult::from_placements([("a", Some(Rect::new(0.0, 0.0, 10.0, 10.0)))]);
        assert_eq!(c.enforce(&mut fits), None);
        let mut empty = LayoutResult::from_placements([("a", None::<Rect>)]);
        assert_eq!(c.enforce(&mut empty), None);
    }
}
