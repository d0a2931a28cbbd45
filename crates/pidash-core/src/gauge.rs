//! Semi-circular gauge geometry and colors.
//!
//! The gauge is a half-circle progress arc: the background arc is drawn in
//! full and the progress arc is revealed by a stroke dash offset
//! proportional to the value. Values are clamped to [0, 100], never
//! rejected. Color runs green → yellow over the lower half of the range and
//! yellow → red over the upper half; a discrete 11-stop gradient
//! approximates the ramp along the arc.

use std::f64::consts::PI;
use std::fmt::Write as _;

/// Minimum size the responsive fit will shrink to.
const MIN_FIT_SIZE: f64 = 100.0;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// CSS `rgb(r, g, b)` notation, as used in the SVG output.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Gauge color at a value: green(0,255,0) at 0, yellow(255,255,0) at 50,
/// red(255,0,0) at 100, linearly interpolated within each segment.
pub fn color_for(value: f64) -> Rgb {
    let v = clamp(value);
    if v <= 50.0 {
        let ratio = v / 50.0;
        Rgb {
            r: (255.0 * ratio).floor() as u8,
            g: 255,
            b: 0,
        }
    } else {
        let ratio = (v - 50.0) / 50.0;
        Rgb {
            r: 255,
            g: (255.0 * (1.0 - ratio)).floor() as u8,
            b: 0,
        }
    }
}

/// The discrete gradient: stops at 0, 10, …, 100 percent.
pub fn gradient_stops() -> Vec<(u8, Rgb)> {
    (0..=10u8)
        .map(|i| (i * 10, color_for(f64::from(i) * 10.0)))
        .collect()
}

fn clamp(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Half-circle gauge geometry: outer square `size` and stroke width, both in
/// user units (SVG pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemiGauge {
    pub size: f64,
    pub stroke_width: f64,
}

impl SemiGauge {
    pub fn new(size: f64, stroke_width: f64) -> Self {
        Self { size, stroke_width }
    }

    /// Arc radius: the stroke is centered on the path, so half of it hangs
    /// outside the radius on each side.
    pub fn radius(&self) -> f64 {
        (self.size - self.stroke_width) / 2.0
    }

    /// Length of the half-circle arc (half the full circumference).
    pub fn arc_length(&self) -> f64 {
        PI * self.radius()
    }

    /// Fraction of the arc filled at `value`, in [0, 1].
    pub fn fraction(value: f64) -> f64 {
        clamp(value) / 100.0
    }

    /// Stroke dash offset revealing the progress arc: full arc length at 0
    /// (nothing visible), zero at 100 (full arc).
    pub fn dash_offset(&self, value: f64) -> f64 {
        let arc = self.arc_length();
        arc - Self::fraction(value) * arc
    }

    /// The SVG path of the half circle, left end to right end over the top.
    pub fn arc_path(&self) -> String {
        let half_stroke = self.stroke_width / 2.0;
        let mid = self.size / 2.0;
        let r = self.radius();
        format!(
            "M {} {} A {} {} 0 0 1 {} {}",
            half_stroke,
            mid,
            r,
            r,
            self.size - half_stroke,
            mid
        )
    }

    /// Effective size for a gauge tracking its container width.
    pub fn fit_size(measured_width: f64, stroke_width: f64) -> f64 {
        (measured_width - stroke_width).max(MIN_FIT_SIZE)
    }

    /// Render a standalone SVG document showing `value`.
    pub fn render_svg(&self, value: f64) -> String {
        let path = self.arc_path();
        let arc = self.arc_length();
        let offset = self.dash_offset(value);
        let width = self.size;
        let height = self.size / 2.0 + self.stroke_width / 2.0;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = writeln!(svg, "  <defs>");
        let _ = writeln!(
            svg,
            r#"    <linearGradient id="progressGradient" x1="0%" y1="0%" x2="100%" y2="0%">"#
        );
        for (percent, color) in gradient_stops() {
            let _ = writeln!(
                svg,
                r#"      <stop offset="{percent}%" stop-color="{}" />"#,
                color.to_css()
            );
        }
        let _ = writeln!(svg, "    </linearGradient>");
        let _ = writeln!(svg, "  </defs>");
        let _ = writeln!(
            svg,
            r##"  <path d="{path}" fill="none" stroke="#e5e7eb" stroke-width="{}" stroke-linecap="round" />"##,
            self.stroke_width
        );
        let _ = writeln!(
            svg,
            r##"  <path d="{path}" fill="none" stroke="url(#progressGradient)" stroke-width="{}" stroke-linecap="round" stroke-dasharray="{arc}" stroke-dashoffset="{offset}" />"##,
            self.stroke_width
        );
        svg.push_str("</svg>\n");
        svg
    }
}

impl Default for SemiGauge {
    fn default() -> Self {
        Self::new(200.0, 20.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn radius_and_arc_length() {
        let g = SemiGauge::new(200.0, 20.0);
        assert!((g.radius() - 90.0).abs() < EPS);
        assert!((g.arc_length() - PI * 90.0).abs() < EPS);
    }

    #[test]
    fn value_zero_hides_the_arc() {
        let g = SemiGauge::default();
        assert!((g.dash_offset(0.0) - g.arc_length()).abs() < EPS);
    }

    #[test]
    fn value_hundred_shows_the_full_arc() {
        let g = SemiGauge::default();
        assert!(g.dash_offset(100.0).abs() < EPS);
    }

    #[test]
    fn value_fifty_shows_half_the_arc() {
        let g = SemiGauge::default();
        assert!((g.dash_offset(50.0) - g.arc_length() / 2.0).abs() < EPS);
    }

    #[test]
    fn out_of_range_values_clamp() {
        let g = SemiGauge::default();
        assert_eq!(g.dash_offset(-10.0), g.dash_offset(0.0));
        assert_eq!(g.dash_offset(150.0), g.dash_offset(100.0));
        assert_eq!(SemiGauge::fraction(-1.0), 0.0);
        assert_eq!(SemiGauge::fraction(101.0), 1.0);
    }

    #[test]
    fn color_endpoints_and_midpoint() {
        assert_eq!(color_for(0.0), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(color_for(50.0), Rgb { r: 255, g: 255, b: 0 });
        assert_eq!(color_for(100.0), Rgb { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn color_interpolates_within_segments() {
        assert_eq!(color_for(25.0), Rgb { r: 127, g: 255, b: 0 });
        assert_eq!(color_for(75.0), Rgb { r: 255, g: 127, b: 0 });
    }

    #[test]
    fn color_clamps_out_of_range() {
        assert_eq!(color_for(-5.0), color_for(0.0));
        assert_eq!(color_for(500.0), color_for(100.0));
    }

    #[test]
    fn gradient_has_eleven_stops() {
        let stops = gradient_stops();
        assert_eq!(stops.len(), 11);
        assert_eq!(stops[0].0, 0);
        assert_eq!(stops[10].0, 100);
        assert_eq!(stops[0].1, Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(stops[5].1, Rgb { r: 255, g: 255, b: 0 });
        assert_eq!(stops[10].1, Rgb { r: 255, g: 0, b: 0 });
    }

    #[test]
    fn arc_path_spans_the_gauge() {
        let g = SemiGauge::new(200.0, 20.0);
        assert_eq!(g.arc_path(), "M 10 100 A 90 90 0 0 1 190 100");
    }

    #[test]
    fn fit_size_floors_at_minimum() {
        assert_eq!(SemiGauge::fit_size(300.0, 20.0), 280.0);
        assert_eq!(SemiGauge::fit_size(90.0, 20.0), 100.0);
    }

    #[test]
    fn svg_document_structure() {
        let svg = SemiGauge::default().render_svg(50.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert_eq!(svg.matches("<stop ").count(), 11);
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(svg.contains("stroke-dashoffset"));
        assert!(svg.contains("rgb(255, 255, 0)"));
    }
}
