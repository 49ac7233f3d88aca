use guikit::Graphics;

use super::Demo;
use crate::util::Rng;

const PER_FRAME: usize = 60;
const OVERSCAN: i32 = 40;

/// Random lines, some running off screen to exercise clipping
pub struct Lines {
    rng: Rng,
}

impl Lines {
    pub fn new(seed: u64) -> Self {
        Self { rng: Rng::new(seed ^ 0x9E37_79B9) }
    }
}

impl Demo for Lines {
    fn update(&mut self, _dt: f32) {}

    fn render(&mut self, g: &mut Graphics) {
        let (w, h) = (g.width(), g.height());
        for _ in 0..PER_FRAME {
            g.set_color(self.rng.color());
            let x1 = self.rng.range_i32(-OVERSCAN, w + OVERSCAN);
            let y1 = self.rng.range_i32(-OVERSCAN, h + OVERSCAN);
            match self.rng.range_i32(0, 3) {
                0 => g.draw_horiz_line(x1, y1, self.rng.range_i32(1, w)),
                1 => g.draw_vert_line(x1, y1, self.rng.range_i32(1, h)),
                _ => {
                    let x2 = self.rng.range_i32(-OVERSCAN, w + OVERSCAN);
                    let y2 = self.rng.range_i32(-OVERSCAN, h + OVERSCAN);
                    g.draw_line(x1, y1, x2, y2);
                },
            }
        }
    }

    fn name(&self) -> &str {
        "lines"
    }
}
