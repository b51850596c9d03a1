#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::detect::backend::PersonDetector;
use crate::detect::result::Detection;

/// ONNX person detector backed by tract.
///
/// Loads a single-class person-detection model with a square input
/// (YOLO-style layout: one output tensor of `[1, attrs, n]` rows with
/// box center/size in channels 0..4 and the person score in channel 4).
/// Frames are resized to the model input internally; reported boxes are
/// rescaled back to the frame's original coordinate space.
pub struct TractDetector {
    model: TypedSimplePlan<TypedModel>,
    input_size: u32,
    confidence_threshold: f32,
}

impl TractDetector {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(model_path: P, input_size: u32) -> Result<Self> {
        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, input_size as usize, input_size as usize),
                ),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        Ok(Self {
            model,
            input_size,
            confidence_threshold: 0.5,
        })
    }

    /// Override the default confidence threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    fn build_input(&self, pixels: &[u8], width: u32, height: u32) -> Result<Tensor> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if pixels.len() != expected_len {
            return Err(anyhow!(
                "expected {} RGB bytes, received {}",
                expected_len,
                pixels.len()
            ));
        }

        let frame = image::RgbImage::from_raw(width, height, pixels.to_vec())
            .ok_or_else(|| anyhow!("frame buffer does not match its dimensions"))?;
        let resized = image::DynamicImage::ImageRgb8(frame)
            .resize_exact(
                self.input_size,
                self.input_size,
                image::imageops::FilterType::Triangle,
            )
            .to_rgb8();

        let size = self.input_size as usize;
        let input =
            tract_ndarray::Array4::from_shape_fn((1, 3, size, size), |(_, channel, y, x)| {
                resized.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0
            });

        Ok(input.into_tensor())
    }

    fn decode_output(
        &self,
        outputs: TVec<TValue>,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Vec<Detection>> {
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let rows = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        if rows.ndim() != 3 || rows.shape()[1] < 5 {
            return Err(anyhow!(
                "unexpected model output shape {:?}; expected [1, attrs >= 5, n]",
                rows.shape()
            ));
        }

        let scale_x = frame_width as f32 / self.input_size as f32;
        let scale_y = frame_height as f32 / self.input_size as f32;

        let mut detections = Vec::new();
        for i in 0..rows.shape()[2] {
            let score = rows[[0, 4, i]];
            if score < self.confidence_threshold {
                continue;
            }

            let cx = rows[[0, 0, i]];
            let cy = rows[[0, 1, i]];
            let w = rows[[0, 2, i]];
            let h = rows[[0, 3, i]];

            let x = ((cx - w / 2.0) * scale_x).max(0.0);
            let y = ((cy - h / 2.0) * scale_y).max(0.0);
            let width = (w * scale_x).min(frame_width as f32);
            let height = (h * scale_y).min(frame_height as f32);

            detections.push(Detection::new(x, y, width, height, score));
        }

        Ok(detections)
    }
}

impl PersonDetector for TractDetector {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>> {
        let input = self.build_input(pixels, width, height)?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        self.decode_output(outputs, width, height)
    }
}
