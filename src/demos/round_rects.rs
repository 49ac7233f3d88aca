use guikit::Graphics;

use super::Demo;
use crate::util::Rng;

const PER_FRAME: usize = 8;

/// Random round rects, including degenerate and off-screen ones
pub struct RoundRects {
    rng: Rng,
}

impl RoundRects {
    pub fn new(seed: u64) -> Self {
        Self { rng: Rng::new(seed.rotate_left(17)) }
    }
}

impl Demo for RoundRects {
    fn update(&mut self, _dt: f32) {}

    fn render(&mut self, g: &mut Graphics) {
        let (w, h) = (g.width(), g.height());
        for _ in 0..PER_FRAME {
            g.set_color(self.rng.color());
            let x = self.rng.range_i32(-10, w + 9);
            let y = self.rng.range_i32(-10, h + 9);
            let rw = self.rng.range_i32(-10, w / 2);
            let rh = self.rng.range_i32(-10, h / 2);
            let r = self.rng.range_i32(1, 16);
            if self.rng.range_i32(0, 1) == 0 {
                g.fill_round_rect(x, y, r, rw, rh);
            } else {
                g.draw_round_rect(x, y, r, rw, rh);
            }
        }
    }

    fn name(&self) -> &str {
        "round rects"
    }
}
