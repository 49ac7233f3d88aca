//! Demo scenes for the windowed viewer

mod cardioid;
mod circles;
mod lines;
mod patterns;
mod round_rects;

pub use cardioid::Cardioid;
pub use circles::Circles;
pub use lines::Lines;
pub use patterns::Patterns;
pub use round_rects::RoundRects;

use guikit::color::COLOR_WHITE;
use guikit::Graphics;

/// A scene the viewer can cycle through
pub trait Demo {
    /// Advance scene state by `dt` seconds
    fn update(&mut self, dt: f32);

    /// Draw one frame; scenes that accumulate skip clearing
    fn render(&mut self, g: &mut Graphics);

    fn name(&self) -> &str;

    /// Called when the scene becomes active
    fn reset(&mut self, g: &mut Graphics) {
        g.set_color(COLOR_WHITE);
        g.fill_screen();
    }
}

pub fn all(seed: u64) -> Vec<Box<dyn Demo>> {
    vec![
        Box::new(Cardioid::new()),
        Box::new(Circles::new(seed)),
        Box::new(Lines::new(seed)),
        Box::new(RoundRects::new(seed)),
        Box::new(Patterns::new()),
    ]
}
