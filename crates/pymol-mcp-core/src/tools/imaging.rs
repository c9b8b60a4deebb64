//! Image preparation, ray tracing and PNG output.
//!
//! The engine renders; these handlers size the viewport, pick the renderer and either write
//! the result to disk or hand the PNG bytes back to the caller. [`render_image`] is the only
//! tool with a binary result and the only one that never reports failure as text: a broken
//! render degrades to a blank placeholder image.

use super::schema::InputSchema;
use super::{ImagePayload, ToolSpec, absolute_path, default_true, forward};
use crate::engine::{Engine, EngineError};
use crate::session::Session;
use image::{ImageBuffer, ImageFormat, Rgb};
use serde::Deserialize;
use std::io::Cursor;
use tracing::{error, info};

pub const PLACEHOLDER_WIDTH: u32 = 400;
pub const PLACEHOLDER_HEIGHT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct DrawArgs {
    #[serde(default = "default_draw_width")]
    pub width: i32,
    #[serde(default = "default_draw_height")]
    pub height: i32,
}

#[derive(Debug, Deserialize)]
pub struct RayArgs {
    #[serde(default = "default_ray_width")]
    pub width: i32,
    #[serde(default = "default_ray_height")]
    pub height: i32,
}

#[derive(Debug, Deserialize)]
pub struct SavePngArgs {
    pub filename: String,
    #[serde(default = "default_ray_width")]
    pub width: i32,
    #[serde(default = "default_ray_height")]
    pub height: i32,
    #[serde(default = "default_true")]
    pub ray: bool,
}

#[derive(Debug, Deserialize)]
pub struct RenderArgs {
    #[serde(default = "default_ray_width")]
    pub width: i32,
    #[serde(default = "default_ray_height")]
    pub height: i32,
    #[serde(default = "default_true")]
    pub ray_trace: bool,
}

fn default_draw_width() -> i32 {
    1600
}

fn default_draw_height() -> i32 {
    1200
}

fn default_ray_width() -> i32 {
    1200
}

fn default_ray_height() -> i32 {
    900
}

pub fn specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "draw_image",
            description: "Prepare an OpenGL-based image.",
            input_schema: InputSchema::new()
                .integer_or("width", 1600, "Image width in pixels")
                .integer_or("height", 1200, "Image height in pixels")
                .into_value(),
        },
        ToolSpec {
            name: "ray_trace",
            description: "Prepare a ray-traced image with better quality than OpenGL.",
            input_schema: InputSchema::new()
                .integer_or("width", 1200, "Image width in pixels")
                .integer_or("height", 900, "Image height in pixels")
                .into_value(),
        },
        ToolSpec {
            name: "save_png",
            description: "Save the current view as a PNG image.",
            input_schema: InputSchema::new()
                .string("filename", "Output filename")
                .integer_or("width", 1200, "Image width in pixels")
                .integer_or("height", 900, "Image height in pixels")
                .boolean_or("ray", true, "Whether to use ray tracing for better quality")
                .into_value(),
        },
        ToolSpec {
            name: "render_image",
            description: "Render the current view as an image and return it directly.",
            input_schema: InputSchema::new()
                .integer_or("width", 1200, "Image width in pixels")
                .integer_or("height", 900, "Image height in pixels")
                .boolean_or(
                    "ray_trace",
                    true,
                    "Whether to use ray tracing for better quality",
                )
                .into_value(),
        },
    ]
}

pub fn draw_image<E: Engine>(session: &Session<E>, width: i32, height: i32) -> String {
    let result = forward(session, |cmd| {
        cmd.viewport(width, height)?;
        cmd.draw()
    });
    match result {
        Ok(()) => format!(
            "Prepared OpenGL image with dimensions {}x{}",
            width, height
        ),
        Err(e) => {
            error!("draw failed: {}", e);
            format!("Error preparing image: {}", e)
        }
    }
}

pub fn ray_trace<E: Engine>(session: &Session<E>, width: i32, height: i32) -> String {
    let result = forward(session, |cmd| {
        cmd.viewport(width, height)?;
        cmd.ray(width, height)
    });
    match result {
        Ok(()) => format!(
            "Prepared ray-traced image with dimensions {}x{}",
            width, height
        ),
        Err(e) => {
            error!("ray failed: {}", e);
            format!("Error ray-tracing: {}", e)
        }
    }
}

pub fn save_png<E: Engine>(
    session: &Session<E>,
    filename: &str,
    width: i32,
    height: i32,
    ray: bool,
) -> String {
    let filename = absolute_path(filename);
    info!("Saving {}x{} PNG to {} (ray: {})", width, height, filename, ray);
    let result = forward(session, |cmd| {
        cmd.viewport(width, height)?;
        if ray {
            cmd.ray(width, height)?;
        }
        cmd.png(&filename)
    });
    match result {
        Ok(()) => format!("Saved PNG image to {}", filename),
        Err(e) => {
            error!("png {} failed: {}", filename, e);
            format!("Error saving PNG: {}", e)
        }
    }
}

/// Renders the current view and returns the PNG bytes.
///
/// On failure the error is logged and a blank white placeholder is returned instead.
pub fn render_image<E: Engine>(
    session: &Session<E>,
    width: i32,
    height: i32,
    ray_trace: bool,
) -> ImagePayload {
    let result = forward(session, |cmd| -> Result<Vec<u8>, EngineError> {
        cmd.viewport(width, height)?;
        if ray_trace {
            cmd.ray(width, height)?;
        }
        cmd.png_bytes()
    });
    match result {
        Ok(data) => {
            info!("Rendered {}x{} image ({} bytes)", width, height, data.len());
            ImagePayload::png(data)
        }
        Err(e) => {
            error!("Error rendering image: {}", e);
            ImagePayload::png(placeholder_png())
        }
    }
}

/// A blank white PNG used in place of a failed render.
pub fn placeholder_png() -> Vec<u8> {
    let canvas = ImageBuffer::from_pixel(
        PLACEHOLDER_WIDTH,
        PLACEHOLDER_HEIGHT,
        Rgb([255u8, 255, 255]),
    );
    let mut buffer = Cursor::new(Vec::new());
    if let Err(e) = canvas.write_to(&mut buffer, ImageFormat::Png) {
        error!("Failed to encode placeholder image: {}", e);
    }
    buffer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::{Call, MockEngine};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn draw_sets_viewport_then_draws() {
        let session = Session::from_engine(MockEngine::new(), &[]);
        assert_eq!(
            draw_image(&session, 1600, 1200),
            "Prepared OpenGL image with dimensions 1600x1200"
        );
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![
                Call::new("viewport", &["1600", "1200"]),
                Call::new("draw", &[]),
            ]
        );
    }

    #[test]
    fn draw_failure_is_prefixed() {
        let engine = MockEngine::new().failing("draw", "no OpenGL context");
        let session = Session::from_engine(engine, &[]);
        assert_eq!(
            draw_image(&session, 800, 600),
            "Error preparing image: no OpenGL context"
        );
    }

    #[test]
    fn ray_trace_sets_viewport_then_rays() {
        let session = Session::from_engine(MockEngine::new(), &[]);
        assert_eq!(
            ray_trace(&session, 1200, 900),
            "Prepared ray-traced image with dimensions 1200x900"
        );
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![
                Call::new("viewport", &["1200", "900"]),
                Call::new("ray", &["1200", "900"]),
            ]
        );
    }

    #[test]
    fn ray_trace_failure_stops_before_ray() {
        let engine = MockEngine::new().failing("viewport", "bad size");
        let session = Session::from_engine(engine, &[]);
        assert_eq!(ray_trace(&session, 0, 0), "Error ray-tracing: bad size");
        assert_eq!(session.engine().unwrap().commands(), vec!["viewport"]);
    }

    #[test]
    fn save_png_skips_ray_when_disabled() {
        let session = Session::from_engine(MockEngine::new(), &[]);
        assert_eq!(
            save_png(&session, "/tmp/view.png", 640, 480, false),
            "Saved PNG image to /tmp/view.png"
        );
        assert_eq!(
            session.engine().unwrap().calls(),
            vec![
                Call::new("viewport", &["640", "480"]),
                Call::new("png", &["/tmp/view.png"]),
            ]
        );
    }

    #[test]
    fn save_png_rays_by_default() {
        let session = Session::from_engine(MockEngine::new(), &[]);
        save_png(&session, "/tmp/view.png", 1200, 900, true);
        assert_eq!(
            session.engine().unwrap().commands(),
            vec!["viewport", "ray", "png"]
        );
    }

    #[test]
    fn save_png_failure_is_prefixed() {
        let engine = MockEngine::new().failing("png", "cannot write file");
        let session = Session::from_engine(engine, &[]);
        assert_eq!(
            save_png(&session, "/nope/view.png", 10, 10, false),
            "Error saving PNG: cannot write file"
        );
    }

    #[test]
    fn render_image_returns_engine_bytes() {
        let engine = MockEngine::new().with_png(&PNG_SIGNATURE);
        let session = Session::from_engine(engine, &[]);

        let image = render_image(&session, 300, 200, true);

        assert_eq!(image.data, PNG_SIGNATURE.to_vec());
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(
            session.engine().unwrap().commands(),
            vec!["viewport", "ray", "png_bytes"]
        );
    }

    #[test]
    fn render_image_without_ray_trace_skips_ray() {
        let session = Session::from_engine(MockEngine::new(), &[]);
        render_image(&session, 300, 200, false);
        assert_eq!(
            session.engine().unwrap().commands(),
            vec!["viewport", "png_bytes"]
        );
    }

    #[test]
    fn render_image_failure_returns_placeholder() {
        let engine = MockEngine::new().failing("ray", "ray tracer crashed");
        let session = Session::from_engine(engine, &[]);

        let image = render_image(&session, 300, 200, true);

        assert_eq!(image.data, placeholder_png());
        assert!(!image.data.is_empty());
    }

    #[test]
    fn placeholder_is_blank_white_png_of_fixed_size() {
        let bytes = placeholder_png();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgb8();
        assert_eq!(decoded.dimensions(), (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT));
        assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn image_args_apply_defaults() {
        let draw: DrawArgs = serde_json::from_value(serde_json::json!({})).unwrap();
        let render: RenderArgs = serde_json::from_value(serde_json::json!({})).unwrap();
        let png: SavePngArgs =
            serde_json::from_value(serde_json::json!({ "filename": "a.png" })).unwrap();

        assert_eq!((draw.width, draw.height), (1600, 1200));
        assert_eq!((render.width, render.height, render.ray_trace), (1200, 900, true));
        assert_eq!((png.width, png.height, png.ray), (1200, 900, true));
    }
}
