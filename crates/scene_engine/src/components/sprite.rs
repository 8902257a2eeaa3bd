//! Sprite component

use super::RenderContinuation;
use crate::assets::ImageHandle;
use crate::render::Canvas;

/// Image drawn centered on the node's origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    image: Option<ImageHandle>,
    scale_x: f32,
    scale_y: f32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            image: None,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Sprite {
    /// Sprite showing `image` at its natural size
    pub fn with_image(image: ImageHandle) -> Self {
        Self {
            image: Some(image),
            ..Default::default()
        }
    }

    /// Image to draw
    pub fn image(&self) -> Option<ImageHandle> {
        self.image
    }

    /// Set the image to draw
    pub fn set_image(&mut self, image: ImageHandle) {
        self.image = Some(image);
    }

    /// Stop drawing an image
    pub fn clear_image(&mut self) {
        self.image = None;
    }

    /// Set scale factors; `y` defaults to `x` for uniform scaling
    pub fn set_scale(&mut self, x: f32, y: Option<f32>) {
        self.scale_x = x;
        self.scale_y = y.unwrap_or(x);
    }

    /// Scale factors (x, y)
    pub fn scale(&self) -> (f32, f32) {
        (self.scale_x, self.scale_y)
    }

    /// Drawn size (natural size times scale), if an image is set
    pub fn drawn_size(&self) -> Option<(f32, f32)> {
        self.image.map(|image| {
            (
                image.width() as f32 * self.scale_x,
                image.height() as f32 * self.scale_y,
            )
        })
    }

    /// Wrap `next` so the image (if any) is drawn before it runs
    ///
    /// `next` always runs, image or not.
    pub fn render_image<'a>(&self, next: RenderContinuation<'a>) -> RenderContinuation<'a> {
        let sprite = *self;
        Box::new(move |canvas: &mut dyn Canvas, interpolation: f64| {
            if let (Some(image), Some((w, h))) = (sprite.image, sprite.drawn_size()) {
                canvas.draw_image(&image, -w / 2.0, -h / 2.0, w, h);
            }
            next(canvas, interpolation);
        })
    }
}
