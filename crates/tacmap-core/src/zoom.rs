//! Zoom state for the map canvas.
//!
//! Zoom is a uniform visual scale applied to the whole canvas container.
//! Shape coordinates are never affected; only tolerances that should stay
//! constant on screen are divided by the factor.

use kurbo::Affine;
use serde::{Deserialize, Serialize};

/// Uniform zoom factor with bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    /// Current scale factor (1.0 = 100%).
    pub factor: f64,
    /// Minimum allowed factor.
    pub min: f64,
    /// Maximum allowed factor.
    pub max: f64,
    /// Increment used by zoom in/out.
    pub step: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(0.5, 3.0, 0.1)
    }
}

impl Zoom {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            factor: 1.0,
            min,
            max,
            step,
        }
    }

    /// Transform applied to the canvas container.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.factor)
    }

    pub fn set(&mut self, factor: f64) {
        if factor.is_finite() {
            self.factor = factor.clamp(self.min, self.max);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set(self.factor + self.step);
    }

    pub fn zoom_out(&mut self) {
        self.set(self.factor - self.step);
    }

    pub fn reset(&mut self) {
        self.factor = 1.0;
    }

    /// Convert a tolerance given at 100% into the equivalent at the current zoom.
    pub fn compensate(&self, value: f64) -> f64 {
        value / self.factor
    }

    /// Zoom level as a whole percentage, for display.
    pub fn percent(&self) -> u32 {
        (self.factor * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zoom() {
        let zoom = Zoom::default();
        assert!((zoom.factor - 1.0).abs() < f64::EPSILON);
        assert_eq!(zoom.percent(), 100);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut zoom = Zoom::default();
        zoom.set(10.0);
        assert!((zoom.factor - 3.0).abs() < f64::EPSILON);
        zoom.set(0.01);
        assert!((zoom.factor - 0.5).abs() < f64::EPSILON);
        zoom.set(f64::NAN);
        assert!((zoom.factor - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_step_in_and_out() {
        let mut zoom = Zoom::default();
        zoom.zoom_in();
        zoom.zoom_in();
        assert_eq!(zoom.percent(), 120);
        zoom.zoom_out();
        assert_eq!(zoom.percent(), 110);
        zoom.reset();
        assert_eq!(zoom.percent(), 100);
    }

    #[test]
    fn test_compensate() {
        let mut zoom = Zoom::default();
        zoom.set(2.0);
        assert!((zoom.compensate(3.0) - 1.5).abs() < f64::EPSILON);
    }
}
