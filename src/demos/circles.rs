use guikit::Graphics;

use super::Demo;
use crate::util::Rng;

const PER_FRAME: usize = 40;

/// Random outlined and filled circles piling up
pub struct Circles {
    rng: Rng,
}

impl Circles {
    pub fn new(seed: u64) -> Self {
        Self { rng: Rng::new(seed) }
    }
}

impl Demo for Circles {
    fn update(&mut self, _dt: f32) {}

    fn render(&mut self, g: &mut Graphics) {
        for _ in 0..PER_FRAME {
            g.set_color(self.rng.color());
            let x = self.rng.range_i32(0, g.width() - 1);
            let y = self.rng.range_i32(0, g.height() - 1);
            let r = self.rng.range_i32(1, 100);
            if self.rng.range_i32(0, 1) == 0 {
                g.fill_circle(x, y, r);
            } else {
                g.draw_circle(x, y, r);
            }
        }
    }

    fn name(&self) -> &str {
        "circles"
    }
}
