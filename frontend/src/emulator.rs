//! SDL presentation loop.
//!
//! One pass per display refresh: drain input events, run the machine for
//! one frame, upload the rendered framebuffer, present. The canvas is
//! built with vsync, so `present` blocks until the next refresh and no
//! other frame pacing is needed. A single streaming texture at the
//! machine's native resolution is reused for every frame; the canvas
//! scales it to the window.

use marquee_core::core::machine::Machine;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::pixels::PixelFormatEnum;

use crate::input::KeyMap;

pub fn run(machine: &mut dyn Machine, key_map: &KeyMap, scale: u32) -> Result<(), String> {
    let sdl = sdl2::init()?;
    let video = sdl.video()?;

    let (width, height) = machine.display_size();
    let window = video
        .window("marquee", width * scale, height * scale)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let mut canvas = window
        .into_canvas()
        .accelerated()
        .present_vsync()
        .build()
        .map_err(|e| e.to_string())?;

    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::RGB24, width, height)
        .map_err(|e| e.to_string())?;
    let pitch = (width * 3) as usize;

    let mut framebuffer = vec![0u8; machine.framebuffer_len()];
    let mut events = sdl.event_pump()?;

    'running: loop {
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'running,

                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(button) = key_map.get(sc) {
                        machine.set_input(button, true);
                    }
                }

                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(button) = key_map.get(sc) {
                        machine.set_input(button, false);
                    }
                }

                _ => {}
            }
        }

        machine.run_frame();
        machine.render_frame(&mut framebuffer);

        texture
            .update(None, &framebuffer, pitch)
            .map_err(|e| e.to_string())?;
        canvas.clear();
        canvas.copy(&texture, None, None)?;
        canvas.present();
    }

    Ok(())
}
