//! Headless frame export.
//!
//! Steps the animation on a [`PixelCanvas`] and hands each frame to a
//! [`FrameWriter`], which encodes small batches to PNG in parallel. At most
//! one batch of frames is held in memory at a time.

use crate::chart::easing::TOTAL_FRAMES;
use crate::chart::MrrChart;
use crate::config::ExportConfig;
use crate::surface::{PixelCanvas, PixelFrame, Size, SurfaceError};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// File name of the final, fully drawn frame.
pub const FINAL_FRAME_FILE: &str = "mrr_chart.png";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Rendering failed: {0}")]
    Surface(#[from] SurfaceError),
}

/// Frames written so far, reported from the exporting thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    pub done: usize,
    pub total: usize,
}

/// Paths written by [`export_frames`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFrames {
    /// `frame_001.png` onwards, in frame order.
    pub frames: Vec<PathBuf>,
    pub final_image: PathBuf,
}

pub fn frame_file_name(frame: usize) -> String {
    format!("frame_{:03}.png", frame)
}

/// Buffers frames and writes them as PNG files once a batch is full.
pub struct FrameWriter<P> {
    dir: PathBuf,
    batch_size: usize,
    batch: Vec<(usize, PixelFrame)>,
    written: Vec<PathBuf>,
    peak: usize,
    total: usize,
    progress: P,
}

impl<P> FrameWriter<P>
where
    P: Fn(ExportProgress),
{
    /// One batch per rayon worker keeps every thread busy.
    pub fn new(dir: &Path, total: usize, progress: P) -> Self {
        Self::with_batch_size(dir, total, rayon::current_num_threads(), progress)
    }

    pub fn with_batch_size(dir: &Path, total: usize, batch_size: usize, progress: P) -> Self {
        Self {
            dir: dir.to_path_buf(),
            batch_size: batch_size.max(1),
            batch: Vec::new(),
            written: Vec::with_capacity(total),
            peak: 0,
            total,
            progress,
        }
    }

    /// Queue frame number `frame` (1-based), writing the batch when full.
    pub fn push(&mut self, frame: usize, pixels: PixelFrame) -> Result<(), ExportError> {
        self.batch.push((frame, pixels));
        self.peak = self.peak.max(self.batch.len());
        if self.batch.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ExportError> {
        if self.batch.is_empty() {
            return Ok(());
        }
        let dir = &self.dir;
        let paths = self
            .batch
            .par_iter()
            .map(|(frame, pixels)| {
                let path = dir.join(frame_file_name(*frame));
                write_png(&path, pixels)?;
                Ok(path)
            })
            .collect::<Result<Vec<_>, ExportError>>()?;
        self.batch.clear();

        self.written.extend(paths);
        (self.progress)(ExportProgress {
            done: self.written.len(),
            total: self.total,
        });
        Ok(())
    }

    /// Most frames held at once.
    pub fn peak(&self) -> usize {
        self.peak
    }

    pub fn finish(mut self) -> Result<Vec<PathBuf>, ExportError> {
        self.flush()?;
        Ok(self.written)
    }
}

/// Render and write every frame plus the final chart image into `dir`.
pub fn export_frames(dir: &Path, config: &ExportConfig) -> Result<ExportedFrames, ExportError> {
    export_frames_with_progress(dir, config, |_| {})
}

pub fn export_frames_with_progress<P>(
    dir: &Path,
    config: &ExportConfig,
    progress: P,
) -> Result<ExportedFrames, ExportError>
where
    P: Fn(ExportProgress),
{
    let writer = FrameWriter::new(dir, TOTAL_FRAMES as usize, progress);
    export_with_writer(dir, config, writer)
}

fn export_with_writer<P>(
    dir: &Path,
    config: &ExportConfig,
    mut writer: FrameWriter<P>,
) -> Result<ExportedFrames, ExportError>
where
    P: Fn(ExportProgress),
{
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let canvas = PixelCanvas::new(Size::new(config.width, config.height), config.pixel_ratio);
    let mut chart = MrrChart::start(canvas)?;
    while !chart.is_complete() {
        let info = chart.step()?;
        writer.push(info.frame as usize, chart.canvas().snapshot())?;
    }
    debug!(peak = writer.peak(), "Frames rendered");
    let frames = writer.finish()?;

    let final_image = dir.join(FINAL_FRAME_FILE);
    write_png(&final_image, &chart.canvas().snapshot())?;

    info!(
        dir = %dir.display(),
        frames = frames.len(),
        "Exported chart frames"
    );
    Ok(ExportedFrames {
        frames,
        final_image,
    })
}

fn write_png(path: &Path, frame: &PixelFrame) -> Result<(), ExportError> {
    let bytes = frame.encode_png()?;
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
