use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

const PLOT: &str = env!("CARGO_BIN_EXE_plot-rectangles");
const STEPS: &str = env!("CARGO_BIN_EXE_step-visualizer");

const RECTANGLES_JSON: &str = r#"[
    {"name": "ABCD",
     "points": [{"name": "A", "x": 0, "y": 0}, {"name": "B", "x": 4, "y": 0},
                {"name": "C", "x": 4, "y": 3}, {"name": "D", "x": 0, "y": 3}],
     "properties": [{"Area": 12.0}, {"Diagonal": 5.0}]}
]"#;

const STEPS_JSON: &str = r#"[
    ["Area is given", {"width": 0, "height": 0, "traits": {"Area": 12.0}}],
    ["Sides", {"width": 3, "height": 4, "traits": {"Area": 12.0, "Diagonal": 5.0}}]
]"#;

#[test]
fn test_wrong_argument_count_prints_usage() {
    for bin in [PLOT, STEPS] {
        let none = Command::new(bin).output().unwrap();
        assert_eq!(none.status.code(), Some(1));
        let stdout = String::from_utf8_lossy(&none.stdout);
        assert!(stdout.starts_with("Usage: "), "{stdout}");
        assert!(stdout.trim_end().ends_with("<path_to_json>"));

        let two = Command::new(bin).args(["a.json", "b.json"]).output().unwrap();
        assert_eq!(two.status.code(), Some(1));
    }
}

#[test]
fn test_plot_rectangles_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rects.json");
    fs::write(&input, RECTANGLES_JSON).unwrap();

    let run = Command::new(PLOT).arg(&input).output().unwrap();
    assert!(run.status.success());

    let svg = fs::read_to_string(dir.path().join("rects.svg")).unwrap();
    assert!(svg.contains("Rectangle Properties"));
    assert!(svg.contains("ABCD - Area: 12.0, Diagonal: 5.0"));
}

#[test]
fn test_bad_input_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.json");
    fs::write(&input, "[{").unwrap();

    for bin in [PLOT, STEPS] {
        let run = Command::new(bin).arg(&input).output().unwrap();
        assert_eq!(run.status.code(), Some(2));
    }

    let missing = Command::new(PLOT)
        .arg(dir.path().join("missing.json"))
        .output()
        .unwrap();
    assert_eq!(missing.status.code(), Some(2));
}

#[test]
fn test_step_visualizer_follows_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("steps.json");
    fs::write(&input, STEPS_JSON).unwrap();

    let mut child = Command::new(STEPS)
        .arg(&input)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"n\nq\n").unwrap();
    let run = child.wait_with_output().unwrap();
    assert!(run.status.success());

    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(stdout.contains("Step 1/2: Area is given"));
    assert!(stdout.contains("Step 2/2: Sides"));

    let svg = fs::read_to_string(dir.path().join("steps.svg")).unwrap();
    assert!(svg.contains("Step 2: Sides"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_path_is_rendered() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join(OsString::from_vec(b"rects\xff.json".to_vec()));
    fs::write(&input, RECTANGLES_JSON).unwrap();

    let run = Command::new(PLOT).arg(&input).output().unwrap();
    assert_eq!(run.status.code(), Some(0));
    assert!(input.with_extension("svg").exists());

    let missing = dir.path().join(OsString::from_vec(b"gone\xfe.json".to_vec()));
    let run = Command::new(STEPS).arg(&missing).output().unwrap();
    assert_eq!(run.status.code(), Some(2));
}
