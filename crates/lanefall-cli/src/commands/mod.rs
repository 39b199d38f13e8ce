//! CLI command implementations.

pub mod batch;
pub mod convert;
pub mod info;

use std::path::{Path, PathBuf};

/// Default output path for a converted chart: the input's stem with a
/// `Converted` suffix, in the same directory.
pub fn converted_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chart".to_string());
    input.with_file_name(format!("{stem}Converted.osu"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converted_path() {
        let path = converted_path(Path::new("songs/artist/map.osu"));
        assert_eq!(path, Path::new("songs/artist/mapConverted.osu"));
    }
}
