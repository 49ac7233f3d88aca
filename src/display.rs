//! SDL2 window output

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use crate::config::GraphicsConfig;
use crate::graphics::Graphics;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width: u32,
    height: u32,
}

/// Streaming texture the framebuffer is converted into each frame
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
}

impl Display {
    /// Open a window sized for `config` (framebuffer size times scale)
    pub fn open(config: &GraphicsConfig) -> Result<(Self, TextureCreator<WindowContext>), String> {
        config.validate()?;
        let (window_width, window_height) = config.window_size();

        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(&config.title, window_width, window_height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if config.vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        log::info!(
            "opened {}x{} window \"{}\" (vsync {})",
            window_width,
            window_height,
            config.title,
            if config.vsync { "on" } else { "off" }
        );

        Ok((
            Self {
                canvas,
                event_pump,
                width: config.width,
                height: config.height,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Copy the framebuffer to the window
    pub fn present(&mut self, target: &mut RenderTarget, graphics: &Graphics) -> Result<(), String> {
        if graphics.width() as u32 != target.width || graphics.height() as u32 != target.height {
            return Err(format!(
                "framebuffer is {}x{} but render target is {}x{}",
                graphics.width(),
                graphics.height(),
                target.width,
                target.height
            ));
        }
        graphics.to_rgba(&mut target.pixels);
        target
            .texture
            .update(None, &target.pixels, (target.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a render target matching the framebuffer size
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        })
    }
}
