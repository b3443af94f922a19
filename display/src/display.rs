use sdl2::pixels::PixelFormatEnum;

use chip8_core::FrameBuffer;

/// # Display
/// The Chip-8 display is composed of black/white logical pixels, encoded as
/// 1/0 in the core's frame buffer. Each logical pixel is rendered as a
/// `scale` x `scale` block; the window dimensions follow the frame buffer's.
/// The display only gets a call to `render` when the core requests a redraw.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    width: usize,
    height: usize,
}

impl Display {
    /// Creates a window-backed display bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `width` the horizontal size of the display measured in logical pixels
    /// * `height` the vertical size of the display measured in logical pixels
    /// * `scale` the size multiplier for each logical pixel
    pub fn new(sdl: &sdl2::Sdl, width: usize, height: usize, scale: usize) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window("chip-8", (width * scale) as u32, (height * scale) as u32)
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

        Ok(Display {
            canvas,
            width,
            height,
        })
    }

    /// Formats row-major 0/1 pixel cells for rendering as an SDL2 texture.
    ///
    /// An SDL2 RGB24 texture is a 1D array of bytes that represent
    /// concatenated rows of RGB pixels, so each cell is triplicated and
    /// scaled from a binary state to 0-255 intensity.
    fn texture_bytes(pixels: &[u8]) -> Vec<u8> {
        pixels
            .iter()
            .flat_map(|pixel| std::iter::repeat(pixel).take(3))
            .map(|pixel| pixel * 255)
            .collect()
    }

    /// Formats the frame buffer as an SDL2 RGB24 texture and renders it.
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                self.width as u32,
                self.height as u32,
            )
            .map_err(|e| e.to_string())?;

        texture
            .with_lock(None, |buffer: &mut [u8], _pitch: usize| {
                buffer.copy_from_slice(&Display::texture_bytes(frame.pixels()));
            })
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_bytes_triplicates_and_scales() {
        let pixels = [0, 1, 1, 0];
        assert_eq!(
            Display::texture_bytes(&pixels),
            vec![0, 0, 0, 255, 255, 255, 255, 255, 255, 0, 0, 0]
        );
    }
}
