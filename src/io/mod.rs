//! I/O utilities for ice surface profiles.
//!
//! Provides:
//! - Profile writer for final and snapshot surfaces (plotting input)
//! - Frame-numbered series output
//! - Profile reader for post-processing

mod profile;

pub use profile::{
    ProfileFileError, SurfaceProfile, parse_profile, read_profile_file, write_profile,
    write_profile_series,
};
