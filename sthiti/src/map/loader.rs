//! Text map loader.
//!
//! One wall per line as four comma-separated numbers:
//!
//! ```text
//! # x0, y0, x1, y1
//! -5.0, -5.0, 5.0, -5.0
//! 5.0, -5.0, 5.0, 5.0
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::path::Path;

use thiserror::Error;

use super::segment::Segment;

/// Map loading errors
#[derive(Error, Debug)]
pub enum MapLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Load map segments from a text file.
pub fn load_segments<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>, MapLoadError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let segments = parse_segments(&contents)?;
    log::info!("Loaded {} map segments from {}", segments.len(), path.display());
    Ok(segments)
}

/// Parse map segments from text.
pub fn parse_segments(text: &str) -> Result<Vec<Segment>, MapLoadError> {
    let mut segments = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let values = line
            .split(',')
            .map(|field| field.trim().parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| MapLoadError::Parse {
                line: i + 1,
                message: e.to_string(),
            })?;

        match values.as_slice() {
            &[x0, y0, x1, y1] if values.iter().all(|v| v.is_finite()) => {
                segments.push(Segment::from_coords(x0, y0, x1, y1));
            }
            &[_, _, _, _] => {
                return Err(MapLoadError::Parse {
                    line: i + 1,
                    message: "non-finite coordinate".to_string(),
                });
            }
            _ => {
                return Err(MapLoadError::Parse {
                    line: i + 1,
                    message: format!("expected 4 values, found {}", values.len()),
                });
            }
        }
    }

    Ok(segments)
}
