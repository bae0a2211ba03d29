//! An editing session over one loaded source.
//!
//! The session ties the pieces together: it decodes the source once, keeps
//! the displayed (flipped) raster in step with the controller's flip state,
//! and runs extraction and encoding against a single snapshot.

use std::sync::Arc;

use crate::config::CropperConfig;
use crate::controller::{CropController, CropSnapshot};
use crate::decode::{decode_image_with_limit, RasterImage};
use crate::encode::{encode_png_with_limit, EncodeError, EncodedImage};
use crate::error::CropError;
use crate::transform::{extract_snapshot, flip, ExtractionError, FlipState, InterpolationFilter};

/// Everything an extraction needs, detached from the session.
///
/// The raster is shared, so building a job never copies pixels.
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    /// The raster displayed under `snapshot.flip`
    pub image: Arc<RasterImage>,
    pub snapshot: CropSnapshot,
    pub filter: InterpolationFilter,
}

impl ExtractionJob {
    pub fn generation(&self) -> u64 {
        self.snapshot.generation
    }

    pub fn run(&self) -> Result<RasterImage, ExtractionError> {
        extract_snapshot(&self.image, &self.snapshot, self.filter)
    }
}

/// A loaded source plus its interactive crop state.
#[derive(Debug, Clone)]
pub struct CropSession {
    source: Arc<RasterImage>,
    displayed: Arc<RasterImage>,
    displayed_flip: FlipState,
    controller: CropController,
}

impl CropSession {
    /// Decode `bytes` and start a session.
    ///
    /// # Errors
    ///
    /// - `CropError::Config` if `config` fails validation
    /// - `CropError::Decode` if the bytes cannot be decoded
    pub fn open(bytes: &[u8], config: CropperConfig) -> Result<Self, CropError> {
        config.validate()?;
        let image = decode_image_with_limit(bytes, config.max_source_dimension)?;
        Self::from_raster(image, config)
    }

    /// Start a session over an already decoded raster.
    pub fn from_raster(image: RasterImage, config: CropperConfig) -> Result<Self, CropError> {
        config.validate()?;

        let mut controller = CropController::new(config);
        let snapshot = controller.on_media_loaded(image.width, image.height);

        log::info!(
            "crop session opened for {}x{} source{}",
            image.width,
            image.height,
            if snapshot.small_image {
                " (small image)"
            } else {
                ""
            }
        );

        let source = Arc::new(image);
        Ok(Self {
            displayed: Arc::clone(&source),
            source,
            displayed_flip: FlipState::default(),
            controller,
        })
    }

    pub fn snapshot(&self) -> CropSnapshot {
        self.controller.snapshot()
    }

    pub fn controller(&self) -> &CropController {
        &self.controller
    }

    pub fn config(&self) -> &CropperConfig {
        self.controller.config()
    }

    /// The decoded, unflipped source.
    pub fn source(&self) -> &Arc<RasterImage> {
        &self.source
    }

    /// The raster shown to the user: the source under the current flip.
    pub fn displayed(&self) -> &Arc<RasterImage> {
        &self.displayed
    }

    /// Apply one controller event and keep the displayed raster in step.
    ///
    /// ```ignore
    /// let snapshot = session.update(|c| c.set_zoom(1.5));
    /// ```
    pub fn update<F>(&mut self, event: F) -> CropSnapshot
    where
        F: FnOnce(&mut CropController) -> CropSnapshot,
    {
        let snapshot = event(&mut self.controller);
        self.sync_displayed(snapshot.flip);
        snapshot
    }

    /// Restore all parameters to their load-time defaults.
    pub fn reset(&mut self) -> CropSnapshot {
        self.update(CropController::reset)
    }

    /// Extract the current crop with the preview filter.
    pub fn preview(&self) -> Result<RasterImage, CropError> {
        let job = self.job_with_filter(self.config().preview_filter);
        Ok(job.run()?)
    }

    /// Extract the current crop with the export filter and encode it.
    ///
    /// A failure leaves the session untouched.
    pub fn commit(&self) -> Result<EncodedImage, CropError> {
        let job = self.job_with_filter(self.config().export_filter);
        self.check_output_size(&job.snapshot)?;
        let raster = job.run()?;
        let encoded = encode_png_with_limit(&raster, self.config().max_output_dimension)?;

        log::info!(
            "committed {}x{} crop ({} bytes)",
            encoded.width,
            encoded.height,
            encoded.len()
        );
        Ok(encoded)
    }

    /// Package the current state for off-thread extraction.
    pub fn extraction_job(&self) -> ExtractionJob {
        self.job_with_filter(self.config().preview_filter)
    }

    /// Reject crops over the output bound before any pixel is extracted.
    fn check_output_size(&self, snapshot: &CropSnapshot) -> Result<(), EncodeError> {
        let Some(crop) = snapshot.crop else {
            return Ok(());
        };
        let max = self.config().max_output_dimension;
        let (width, height) = crop.pixel_size();
        if width > max as i64 || height > max as i64 {
            return Err(EncodeError::TooLarge {
                width: u32::try_from(width).unwrap_or(u32::MAX),
                height: u32::try_from(height).unwrap_or(u32::MAX),
                max,
            });
        }
        Ok(())
    }

    fn job_with_filter(&self, filter: InterpolationFilter) -> ExtractionJob {
        ExtractionJob {
            image: Arc::clone(&self.displayed),
            snapshot: self.controller.snapshot(),
            filter,
        }
    }

    fn sync_displayed(&mut self, state: FlipState) {
        if state == self.displayed_flip {
            return;
        }
        self.displayed = if state.is_identity() {
            Arc::clone(&self.source)
        } else {
            Arc::new(flip(&self.source, state))
        };
        self.displayed_flip = state;
        log::debug!(
            "displayed raster reflipped (horizontal: {}, vertical: {})",
            state.horizontal,
            state.vertical
        );
    }
}
