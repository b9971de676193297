//! Plain-text surface profile files.
//!
//! Written for plotting tools and read back for post-processing.
//!
//! # File Format
//!
//! ```text
//! # Ice surface profile
//! # time: 1000
//! # columns: x(m) bed(m) surface(m) thickness(m)
//! 0 250 1021.4 771.4
//! 500 250 1020.9 770.9
//! ```
//!
//! Positions must be strictly increasing. The thickness column is written
//! for convenience and ignored on read (it is recomputed from surface - bed).

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::mesh::{BedElevation, Grid1D};

/// Error type for profile files.
#[derive(Debug, Error)]
pub enum ProfileFileError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Parse error with line number
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// No data rows
    #[error("Profile file contains no data")]
    EmptyFile,

    /// Positions not strictly increasing
    #[error("Non-monotonic position at line {line}")]
    NonMonotonic { line: usize },

    /// Field length differs from the grid
    #[error("Field has {found} values, grid has {expected} nodes")]
    LengthMismatch { expected: usize, found: usize },
}

/// A surface profile read from file.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceProfile {
    /// Simulated time, if the header carried one
    pub time: Option<f64>,
    /// Node positions
    pub x: Vec<f64>,
    /// Bed elevation
    pub bed: Vec<f64>,
    /// Surface elevation
    pub surface: Vec<f64>,
}

impl SurfaceProfile {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Ice thickness, surface minus bed.
    pub fn thickness(&self) -> Vec<f64> {
        self.surface
            .iter()
            .zip(&self.bed)
            .map(|(&s, &b)| s - b)
            .collect()
    }
}

/// Write a surface profile.
///
/// # Arguments
/// * `path` - Output file path
/// * `grid` - Grid the surface lives on
/// * `bed` - Bed elevation
/// * `surface` - Surface elevation at every node
/// * `time` - Simulated time stored in the header
pub fn write_profile(
    path: impl AsRef<Path>,
    grid: &Grid1D,
    bed: &BedElevation,
    surface: &[f64],
    time: f64,
) -> Result<(), ProfileFileError> {
    let n = grid.n_nodes();
    for found in [bed.len(), surface.len()] {
        if found != n {
            return Err(ProfileFileError::LengthMismatch { expected: n, found });
        }
    }

    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "# Ice surface profile")?;
    writeln!(w, "# time: {}", time)?;
    writeln!(w, "# columns: x(m) bed(m) surface(m) thickness(m)")?;
    for (i, &s) in surface.iter().enumerate() {
        let b = bed.get(i);
        writeln!(w, "{} {} {} {}", grid.x(i), b, s, s - b)?;
    }
    w.flush()?;
    Ok(())
}

/// Write one frame of a profile series.
///
/// The frame number is appended to the file stem: `profile.txt` with frame
/// 3 becomes `profile_0003.txt` in the same directory.
///
/// Returns the path written.
pub fn write_profile_series(
    base_path: impl AsRef<Path>,
    frame: usize,
    grid: &Grid1D,
    bed: &BedElevation,
    surface: &[f64],
    time: f64,
) -> Result<PathBuf, ProfileFileError> {
    let base = base_path.as_ref();
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    let parent = base.parent().unwrap_or(Path::new("."));

    let filename = format!("{}_{:04}.txt", stem, frame);
    let path = parent.join(filename);

    write_profile(&path, grid, bed, surface, time)?;
    Ok(path)
}

/// Read a profile file.
pub fn read_profile_file(path: impl AsRef<Path>) -> Result<SurfaceProfile, ProfileFileError> {
    let content = fs::read_to_string(path)?;
    parse_profile(&content)
}

/// Parse a profile from a string.
///
/// Same format as file, useful for testing or embedded data.
pub fn parse_profile(content: &str) -> Result<SurfaceProfile, ProfileFileError> {
    let mut profile = SurfaceProfile {
        time: None,
        x: Vec::new(),
        bed: Vec::new(),
        surface: Vec::new(),
    };

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            let comment = line.trim_start_matches('#').trim();
            if let Some(time_str) = comment.strip_prefix("time:") {
                profile.time = time_str.trim().parse().ok();
            }
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(ProfileFileError::ParseError {
                line: line_num + 1,
                message: "Expected: x bed surface [thickness]".into(),
            });
        }

        let parse = |s: &str, what: &str| -> Result<f64, ProfileFileError> {
            s.parse().map_err(|_| ProfileFileError::ParseError {
                line: line_num + 1,
                message: format!("Invalid {} value", what),
            })
        };
        let x = parse(parts[0], "x")?;
        let bed = parse(parts[1], "bed")?;
        let surface = parse(parts[2], "surface")?;

        if let Some(&prev) = profile.x.last()
            && x <= prev
        {
            return Err(ProfileFileError::NonMonotonic { line: line_num + 1 });
        }

        profile.x.push(x);
        profile.bed.push(bed);
        profile.surface.push(surface);
    }

    if profile.is_empty() {
        return Err(ProfileFileError::EmptyFile);
    }

    Ok(profile)
}
