use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rectviz_core::{ModelError, RectangleRecord, RectangleSet, Step, StepSequence};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("'{}' is empty", .0.display())]
    Empty(PathBuf),
}

fn read_input(path: &Path) -> Result<String, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if text.trim().is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }
    log::debug!("read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Parse the static renderer input: a JSON array of named polygons.
pub fn parse_rectangles(json: &str) -> Result<RectangleSet, LoadError> {
    let records: Vec<RectangleRecord> = serde_json::from_str(json)?;
    Ok(RectangleSet::new(records)?)
}

/// Parse the step visualizer input: a JSON array of
/// `[description, state]` pairs.
pub fn parse_steps(json: &str) -> Result<StepSequence, LoadError> {
    let steps: Vec<Step> = serde_json::from_str(json)?;
    Ok(StepSequence::new(steps)?)
}

pub fn load_rectangles(path: &Path) -> Result<RectangleSet, LoadError> {
    let set = parse_rectangles(&read_input(path)?)?;
    log::info!("loaded {} rectangles from {}", set.len(), path.display());
    Ok(set)
}

pub fn load_steps(path: &Path) -> Result<StepSequence, LoadError> {
    let steps = parse_steps(&read_input(path)?)?;
    log::info!("loaded {} steps from {}", steps.len(), path.display());
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_json(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_rectangles() {
        let file = temp_json(
            r#"[{"name": "R", "points": [
                {"name": "A", "x": 0, "y": 0}, {"name": "B", "x": 2, "y": 0},
                {"name": "C", "x": 2, "y": 1}, {"name": "D", "x": 0, "y": 1}],
                "properties": [{"Area": 2.0}]}]"#,
        );
        let set = load_rectangles(file.path()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.records()[0].points.len(), 4);
    }

    #[test]
    fn test_load_steps() {
        let file = temp_json(r#"[["Start", {"width": 2, "height": 1, "traits": {}}]]"#);
        let steps = load_steps(file.path()).unwrap();
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_steps(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_empty_file() {
        let file = temp_json("  \n");
        assert!(matches!(
            load_rectangles(file.path()),
            Err(LoadError::Empty(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let file = temp_json(r#"[{"name": "R", "points": "#);
        assert!(matches!(load_rectangles(file.path()), Err(LoadError::Json(_))));
        assert!(matches!(parse_steps(r#"{"not": "a list"}"#), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_model_errors() {
        assert!(matches!(
            parse_rectangles("[]"),
            Err(LoadError::Model(ModelError::NoRectangles))
        ));
        assert!(matches!(
            parse_steps("[]"),
            Err(LoadError::Model(ModelError::NoSteps))
        ));
        let err = parse_rectangles(
            r#"[{"name": "L", "points": [{"name": "A", "x": 0, "y": 0}, {"name": "B", "x": 1, "y": 0}]}]"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Model(ModelError::TooFewPoints { count: 2, .. })
        ));
    }
}
