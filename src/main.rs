mod demos;
mod util;

use std::path::PathBuf;

use demos::Demo;
use guikit::color::{COLOR_BLACK, COLOR_WHITE};
use guikit::display::{Display, InputEvent, RenderTarget};
use guikit::{Font, Graphics, GraphicsConfig, Rect, SurfaceKind};
use sdl2::keyboard::Keycode;
use util::FpsCounter;

const SEED: u64 = 0x5EED_1234;
const DEFAULT_CONFIG: &str = "guikit.json";
const DEFAULT_SCREENSHOT: &str = "screenshot.bmp";

struct Options {
    config: GraphicsConfig,
    config_path: PathBuf,
    /// Render `frames` frames headless, save and exit
    screenshot: Option<PathBuf>,
    frames: u32,
    demo: usize,
}

/// Parse command line arguments on top of the loaded config file
fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();

    // Config path first so flags can override what it holds
    let config_path = args
        .iter()
        .position(|a| a == "--config" || a == "-c")
        .and_then(|i| args.get(i + 1))
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    let (mut config, warning) = GraphicsConfig::load_or_warn(&config_path);
    if let Some(warning) = warning {
        eprintln!("Config: {}", warning);
    }

    let mut screenshot = None;
    let mut frames = 1;
    let mut demo = 0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => i += 1,
            "--no-vsync" => config.vsync = false,
            "--width" | "-w" => {
                if let Some(w) = args.get(i + 1).and_then(|s| s.parse::<u32>().ok()) {
                    config.width = w;
                }
                i += 1;
            },
            "--height" | "-h" => {
                if let Some(h) = args.get(i + 1).and_then(|s| s.parse::<u32>().ok()) {
                    config.height = h;
                }
                i += 1;
            },
            "--resolution" | "-r" => {
                // WxH, e.g. 640x480
                if let Some((w, h)) = args.get(i + 1).and_then(|s| s.split_once('x')) {
                    if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                        config.width = w;
                        config.height = h;
                    }
                }
                i += 1;
            },
            "--scale" => {
                if let Some(s) = args.get(i + 1).and_then(|s| s.parse::<u32>().ok()) {
                    config.scale = s;
                }
                i += 1;
            },
            "--planar" => config.backend = SurfaceKind::Planar,
            "--indexed" => config.backend = SurfaceKind::Indexed,
            "--demo" | "-d" => {
                if let Some(d) = args.get(i + 1).and_then(|s| s.parse::<usize>().ok()) {
                    demo = d.saturating_sub(1);
                }
                i += 1;
            },
            "--screenshot" => {
                screenshot = Some(
                    args.get(i + 1)
                        .map_or_else(|| PathBuf::from(DEFAULT_SCREENSHOT), PathBuf::from),
                );
                i += 1;
            },
            "--frames" => {
                if let Some(n) = args.get(i + 1).and_then(|s| s.parse::<u32>().ok()) {
                    frames = n.max(1);
                }
                i += 1;
            },
            "--help" => {
                println!("Usage: guikit-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --config PATH, -c PATH    Config file (default: {})", DEFAULT_CONFIG);
                println!("  --width W, -w W           Framebuffer width");
                println!("  --height H, -h H          Framebuffer height");
                println!("  --resolution WxH, -r WxH  Framebuffer size (e.g., 640x480)");
                println!("  --scale N                 Window pixels per framebuffer pixel");
                println!("  --planar | --indexed      Framebuffer backend");
                println!("  --demo N, -d N            Start on demo N (1-5)");
                println!("  --screenshot PATH         Render headless, save a BMP and exit");
                println!("  --frames N                Frames to render before the screenshot");
                println!("  --no-vsync                Disable VSync for uncapped framerate");
                println!("  --help                    Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    Options {
        config,
        config_path,
        screenshot,
        frames,
        demo,
    }
}

/// Render a demo without a window and write the result to disk
fn headless(opts: &Options, demos: &mut [Box<dyn Demo>]) -> Result<(), String> {
    let mut graphics = Graphics::init(&opts.config)?;
    let demo = &mut demos[opts.demo.min(demos.len() - 1)];
    demo.reset(&mut graphics);
    for _ in 0..opts.frames {
        demo.update(1.0 / 60.0);
        demo.render(&mut graphics);
    }
    if let Some(path) = &opts.screenshot {
        graphics.save_screenshot(path)?;
        println!("Saved {} to {}", demo.name(), path.display());
    }
    Ok(())
}

fn draw_fps(graphics: &mut Graphics, font: &Font, fps: f32) {
    let text = format!("FPS {}", fps as u32);
    let (w, h) = font.measure_string(&text);
    let y = graphics.height() - h - 4;
    graphics.set_color(COLOR_BLACK);
    graphics.fill_rect(&Rect::new(2, y - 2, w + 4, h + 4));
    graphics.set_color(COLOR_WHITE);
    font.draw_string(graphics, &text, 4, y);
}

fn main() -> Result<(), String> {
    let opts = parse_args();
    let mut demos = demos::all(SEED);

    if opts.screenshot.is_some() {
        return headless(&opts, &mut demos);
    }

    let config = &opts.config;
    let (mut display, texture_creator) = Display::open(config)?;
    let mut target = RenderTarget::with_size(&texture_creator, config.width, config.height)?;
    let mut graphics = Graphics::init(config)?;
    let font = Font::tiny();

    // FPS counter with 60 sample rolling average
    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;
    let mut shots = 0u32;

    let mut current = opts.demo.min(demos.len() - 1);
    let mut selected = None;

    println!("=== guikit-demo ===");
    println!(
        "Framebuffer: {}x{} {} (scale {})",
        config.width,
        config.height,
        config.backend.name(),
        config.scale
    );
    if config.vsync {
        println!("VSync: ON. Use --no-vsync for uncapped.");
    } else {
        println!("VSync: OFF (uncapped framerate)");
    }
    println!("Use --help for command line options.");
    println!("Controls:");
    println!("  Left/Right - Cycle through demos");
    for (i, demo) in demos.iter().enumerate() {
        println!("  {}          - {}", i + 1, demo.name());
    }
    println!("  F          - Toggle FPS display");
    println!("  S          - Save screenshot");
    println!("  W          - Write config to {}", opts.config_path.display());
    println!("  Escape     - Quit");

    'main: loop {
        let (dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            let key = match event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(key) => key,
            };
            match key {
                Keycode::Escape => break 'main,
                Keycode::F => show_fps = !show_fps,
                Keycode::S => {
                    let path = format!("guikit-{:03}.bmp", shots);
                    match graphics.save_screenshot(&path) {
                        Ok(()) => {
                            shots += 1;
                            println!("Screenshot saved to {}", path);
                        },
                        Err(e) => eprintln!("Failed to save screenshot: {}", e),
                    }
                },
                Keycode::W => match config.save(&opts.config_path) {
                    Ok(()) => println!("Config saved to {}", opts.config_path.display()),
                    Err(e) => eprintln!("Failed to save config: {}", e),
                },
                Keycode::Left => current = (current + demos.len() - 1) % demos.len(),
                Keycode::Right => current = (current + 1) % demos.len(),
                Keycode::Num1 => current = 0,
                Keycode::Num2 => current = 1,
                Keycode::Num3 => current = 2,
                Keycode::Num4 => current = 3,
                Keycode::Num5 => current = 4,
                _ => {},
            }
        }

        let demo = &mut demos[current];
        if selected != Some(current) {
            graphics.reset_clip();
            demo.reset(&mut graphics);
            selected = Some(current);
        }
        demo.update(dt);
        demo.render(&mut graphics);

        // FPS overlay (press F to toggle)
        if show_fps {
            draw_fps(&mut graphics, &font, avg_fps);
        }

        display.present(&mut target, &graphics)?;
    }

    Ok(())
}
