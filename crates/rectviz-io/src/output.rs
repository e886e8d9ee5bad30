use std::fs;
use std::path::{Path, PathBuf};

use crate::loader::LoadError;
use crate::settings::RenderSettings;

/// Where the figure for `input` goes: next to it, with the figure extension.
pub fn output_path_for(input: &Path, settings: &RenderSettings) -> PathBuf {
    input.with_extension(&settings.output_extension)
}

/// Write a rendered figure, replacing any previous one.
pub fn write_figure(path: &Path, svg: &str) -> Result<(), LoadError> {
    fs::write(path, svg).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} ({} bytes)", path.display(), svg.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_is_sibling() {
        let settings = RenderSettings::default();
        assert_eq!(
            output_path_for(Path::new("data/rects.json"), &settings),
            PathBuf::from("data/rects.svg")
        );
        assert_eq!(
            output_path_for(Path::new("steps"), &settings),
            PathBuf::from("steps.svg")
        );
    }

    #[test]
    fn test_write_figure_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.svg");
        write_figure(&path, "<svg>1</svg>").unwrap();
        write_figure(&path, "<svg>2</svg>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<svg>2</svg>");
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("figure.svg");
        assert!(matches!(
            write_figure(&path, "<svg/>"),
            Err(LoadError::Io { .. })
        ));
    }
}
