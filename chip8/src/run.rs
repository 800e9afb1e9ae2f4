use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8_core::constants::{CLOCK_HZ, TIMER_HZ};
use chip8_core::Chip8;
use chip8_display::Display;

use crate::keymap::keymap;

pub fn run(rom: PathBuf) {
    let mut chip8: Chip8 = Chip8::new();

    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init().expect("unable to initialize sdl2");
    let mut display: Display = Display::new(&sdl).expect("unable to open window");
    let mut events = sdl.event_pump().expect("unable to get event pump");

    // Load ROM
    let program = fs::read(&rom).expect("unable to open file");
    match chip8.load_rom(&program) {
        Ok(()) => info!("loaded {} byte ROM from {}", program.len(), rom.display()),
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    // The CPU and the timers run on independent cadences: instructions at
    // CLOCK_HZ paced by this loop, timer ticks at TIMER_HZ on wall-clock time
    let cycle_time: Duration = Duration::from_secs(1) / CLOCK_HZ;
    let timer_time: Duration = Duration::from_secs(1) / TIMER_HZ;
    let mut last_cycle: Instant = Instant::now();
    let mut last_timer_tick: Instant = Instant::now();

    // Whether or not the default clock speed should be respected
    let mut fast_forward: bool = false;

    // Tracks sound timer transitions; there is no audio device yet, so the
    // tone is reported through the log instead
    let mut tone_playing: bool = false;

    'event: loop {
        // If the frame changed, render it
        if let Some(frame) = chip8.take_frame() {
            if let Err(e) = display.render(&frame) {
                error!("render failed: {}", e);
                break 'event;
            }
        }

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc),
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_release(kc),
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state; a step error means the machine halted for good
        if let Err(e) = chip8.step() {
            error!("{}", e);
            break 'event;
        }
        if last_timer_tick.elapsed() >= timer_time {
            chip8.tick_timers();
            last_timer_tick = Instant::now();
        }
        if chip8.sound_active() != tone_playing {
            tone_playing = !tone_playing;
            debug!("tone {}", if tone_playing { "on" } else { "off" });
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if !fast_forward && cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = current_time;
    }
}
