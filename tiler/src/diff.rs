//! Exact pixel comparison of a merged image against a reference.

use std::path::Path;

use rayon::prelude::*;

use crate::error::Result;
use crate::events::{Event, EventSink};
use crate::image::{Image, CHANNELS};
use crate::size::ImageSize;

#[derive(Clone, Debug, PartialEq)]
pub enum DiffOutcome {
    Match,
    Mismatch {
        /// Per-channel absolute difference.
        diff: Image,
        differing_pixels: usize,
        max_diff: u8,
    },
    DimensionMismatch {
        reference: ImageSize,
        candidate: ImageSize,
    },
}

impl DiffOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, DiffOutcome::Match)
    }
}

pub fn diff(reference: &Image, candidate: &Image) -> DiffOutcome {
    if reference.size() != candidate.size() {
        return DiffOutcome::DimensionMismatch {
            reference: reference.size(),
            candidate: candidate.size(),
        };
    }
    if pixels_equal(reference, candidate) {
        return DiffOutcome::Match;
    }

    let diff = abs_diff_unchecked(reference, candidate);
    let differing_pixels = diff
        .bytes()
        .par_chunks(CHANNELS)
        .filter(|pixel| pixel.iter().any(|&c| c != 0))
        .count();
    let max_diff = diff.bytes().par_iter().copied().max().unwrap_or(0);

    DiffOutcome::Mismatch {
        diff,
        differing_pixels,
        max_diff,
    }
}

/// Checks if two images have identical pixel data. Images of different
/// sizes are never equal.
pub fn pixels_equal(img1: &Image, img2: &Image) -> bool {
    if img1.size() != img2.size() {
        return false;
    }
    if img1.size().is_empty() {
        return true;
    }

    let row_bytes = img1.row_bytes();
    img1.bytes()
        .par_chunks(row_bytes)
        .zip(img2.bytes().par_chunks(row_bytes))
        .all(|(row1, row2)| row1 == row2)
}

/// Per-channel `|a - b|`, or `None` if the sizes differ.
pub fn abs_diff(img1: &Image, img2: &Image) -> Option<Image> {
    (img1.size() == img2.size()).then(|| abs_diff_unchecked(img1, img2))
}

fn abs_diff_unchecked(img1: &Image, img2: &Image) -> Image {
    let mut result = Image::new_empty(img1.size());
    if img1.size().is_empty() {
        return result;
    }

    let row_bytes = img1.row_bytes();
    result
        .bytes_mut()
        .par_chunks_mut(row_bytes)
        .zip(img1.bytes().par_chunks(row_bytes))
        .zip(img2.bytes().par_chunks(row_bytes))
        .for_each(|((out, row1), row2)| {
            for ((o, a), b) in out.iter_mut().zip(row1).zip(row2) {
                *o = a.abs_diff(*b);
            }
        });

    result
}

/// Compares two image files and reports the outcome. On a pixel mismatch
/// the difference image is written to `diff_output` when given.
pub fn check_files(
    reference_path: &Path,
    candidate_path: &Path,
    diff_output: Option<&Path>,
    sink: &dyn EventSink,
) -> Result<DiffOutcome> {
    let reference = Image::read_file(reference_path)?;
    let candidate = Image::read_file(candidate_path)?;

    let outcome = diff(&reference, &candidate);
    match &outcome {
        DiffOutcome::Match => sink.info(Event::ImageVerified),
        DiffOutcome::Mismatch {
            diff,
            differing_pixels,
            max_diff,
        } => {
            sink.warn(Event::ImageDiff {
                differing_pixels: *differing_pixels,
                max_diff: *max_diff,
            });
            if let Some(path) = diff_output {
                diff.save_file(path)?;
            }
        }
        DiffOutcome::DimensionMismatch {
            reference,
            candidate,
        } => sink.warn(Event::SizeMismatch {
            reference: *reference,
            candidate: *candidate,
        }),
    }

    Ok(outcome)
}
