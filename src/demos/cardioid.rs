use std::f32::consts::PI;

use guikit::color::{COLOR_BLACK, COLOR_WHITE};
use guikit::Graphics;

use super::Demo;

const TOTAL: i32 = 200;
const FRAMES_PER_SECOND: f32 = 60.0;
const FLATNESS: f32 = 0.025;
const MAX_DEPTH: u32 = 12;

/// Times-table cardioid with each chord drawn as a hue-shifted cubic bezier
#[derive(Default)]
pub struct Cardioid {
    frame: f32,
    hue_base: f32,
}

type Curve = [(f32, f32); 4];

impl Cardioid {
    pub fn new() -> Self {
        Self {
            frame: 0.0,
            hue_base: 0.0,
        }
    }

    fn point(index: f32, radius: f32) -> (f32, f32) {
        let angle = index.rem_euclid(TOTAL as f32) / TOTAL as f32 * 2.0 * PI + PI;
        (radius * angle.cos(), radius * angle.sin())
    }

    fn draw_bezier(&mut self, g: &mut Graphics, curve: &Curve) {
        self.draw_bezier_range(g, curve, 0.0, 1.0, 0);
    }

    fn draw_bezier_range(&mut self, g: &mut Graphics, p: &Curve, t0: f32, t1: f32, depth: u32) {
        let mid = (t0 + t1) / 2.0;
        if depth >= MAX_DEPTH || is_flat(p) {
            let hue = (self.hue_base + mid * 256.0).rem_euclid(256.0);
            g.set_color_hsv(hue, 255, 255);
            g.draw_line(p[0].0 as i32, p[0].1 as i32, p[3].0 as i32, p[3].1 as i32);
            self.hue_base = (self.hue_base + 0.00001).rem_euclid(256.0);
            return;
        }
        let (left, right) = subdivide(p);
        self.draw_bezier_range(g, &left, t0, mid, depth + 1);
        self.draw_bezier_range(g, &right, mid, t1, depth + 1);
    }
}

/// Distance from `p` to the line through `a` and `b`
fn line_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
    if len == 0.0 {
        return ((p.0 - a.0).powi(2) + (p.1 - a.1).powi(2)).sqrt();
    }
    ((b.0 - a.0) * (a.1 - p.1) - (a.0 - p.0) * (b.1 - a.1)).abs() / len
}

fn is_flat(p: &Curve) -> bool {
    line_distance(p[1], p[0], p[3]) < FLATNESS && line_distance(p[2], p[0], p[3]) < FLATNESS
}

/// de Casteljau split at t = 0.5
fn subdivide(p: &Curve) -> (Curve, Curve) {
    let mid = |a: (f32, f32), b: (f32, f32)| ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
    let h = mid(p[1], p[2]);
    let l1 = mid(p[0], p[1]);
    let r2 = mid(p[2], p[3]);
    let l2 = mid(l1, h);
    let r1 = mid(h, r2);
    let m = mid(l2, r1);
    ([p[0], l1, l2, m], [m, r1, r2, p[3]])
}

impl Demo for Cardioid {
    fn update(&mut self, dt: f32) {
        self.frame += dt * FRAMES_PER_SECOND;
    }

    fn render(&mut self, g: &mut Graphics) {
        let (cx, cy) = ((g.width() / 2) as f32, (g.height() / 2) as f32);
        let radius = (g.height() / 2 - 16) as f32;
        let factor = 2.0 + self.frame.floor() * 0.015;

        g.set_color(COLOR_BLACK);
        g.fill_screen();

        for i in 0..TOTAL - 1 {
            let i = i as f32;
            let mut curve = [
                Self::point(i, radius),
                Self::point(i + 16.0, radius),
                Self::point((i + 8.0) * factor, radius),
                Self::point((i + 1.0) * factor, radius),
            ];
            for p in &mut curve {
                p.0 += cx;
                p.1 += cy;
            }
            self.draw_bezier(g, &curve);
        }

        g.set_color(COLOR_WHITE);
        g.draw_circle(cx as i32, cy as i32, radius as i32);
    }

    fn name(&self) -> &str {
        "cardioid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdivide_splits_at_midpoint() {
        let curve = [(0.0, 0.0), (0.0, 8.0), (8.0, 8.0), (8.0, 0.0)];
        let (left, right) = subdivide(&curve);
        assert_eq!(left[0], (0.0, 0.0));
        assert_eq!(left[3], (4.0, 6.0));
        assert_eq!(right[0], left[3]);
        assert_eq!(right[3], (8.0, 0.0));
    }

    #[test]
    fn test_straight_curve_is_flat() {
        let curve = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)];
        assert!(is_flat(&curve));
        let bent = [(0.0, 0.0), (0.0, 5.0), (3.0, 5.0), (3.0, 0.0)];
        assert!(!is_flat(&bent));
    }
}
