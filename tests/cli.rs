use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn vectorpaint_cmd(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vectorpaint").expect("binary exists");
    // Keep the user's real config out of the tests.
    cmd.arg("--config").arg(temp.path().join("config.toml"));
    cmd
}

fn write_doc(temp: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = temp.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn rgba_at(path: &Path, x: u32, y: u32) -> [u8; 4] {
    image::open(path).unwrap().to_rgba8().get_pixel(x, y).0
}

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    vectorpaint_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rasterize, fill and clip 2D vector drawings"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("init-config"));
}

#[test]
fn render_draws_horizontal_line_inclusive() {
    let temp = TempDir::new().unwrap();
    let doc = write_doc(&temp, "line.vpd", "Line,0,0,10,0,#000000\n");
    let png = temp.path().join("line.png");

    vectorpaint_cmd(&temp)
        .arg("render")
        .arg(&doc)
        .arg("-o")
        .arg(&png)
        .args(["--width", "20", "--height", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered 1 shapes"));

    for x in 0..=10 {
        assert_eq!(rgba_at(&png, x, 0), [0, 0, 0, 255], "pixel ({x},0)");
    }
    assert_eq!(rgba_at(&png, 11, 0), [255, 255, 255, 255]);
    assert_eq!(rgba_at(&png, 5, 1), [255, 255, 255, 255]);
}

#[test]
fn render_clamps_oversized_canvas() {
    let temp = TempDir::new().unwrap();
    let doc = write_doc(&temp, "line.vpd", "Line,-2000000000,0,2000000000,0,#000000\n");
    let png = temp.path().join("wide.png");

    vectorpaint_cmd(&temp)
        .arg("render")
        .arg(&doc)
        .arg("-o")
        .arg(&png)
        .args(["--width", "4000000000", "--height", "0"])
        .assert()
        .success();

    let image = image::open(&png).unwrap();
    assert_eq!((image.width(), image.height()), (16384, 1));
    assert_eq!(rgba_at(&png, 16383, 0), [0, 0, 0, 255]);
}

#[test]
fn render_uses_configured_background() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.toml"),
        "[canvas]\nwidth = 4\nheight = 3\nbackground = \"#102030\"\n",
    )
    .unwrap();
    let doc = write_doc(&temp, "empty.vpd", "");
    let png = temp.path().join("empty.png");

    vectorpaint_cmd(&temp)
        .arg("render")
        .arg(&doc)
        .arg("-o")
        .arg(&png)
        .assert()
        .success();

    let image = image::open(&png).unwrap();
    assert_eq!((image.width(), image.height()), (4, 3));
    assert_eq!(rgba_at(&png, 3, 2), [0x10, 0x20, 0x30, 255]);
}

#[test]
fn clip_prints_visible_segment() {
    let temp = TempDir::new().unwrap();
    let doc = write_doc(
        &temp,
        "clip.vpd",
        "Line,-5,5,15,5,#000000\nRectangle,0,0,10,10,#000000,none,none\n",
    );

    vectorpaint_cmd(&temp)
        .arg("clip")
        .arg(&doc)
        .args(["--source", "0", "--clip", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(0,5) -> (10,5)"));
}

#[test]
fn clip_json_lists_segments() {
    let temp = TempDir::new().unwrap();
    let doc = write_doc(
        &temp,
        "clip.vpd",
        "Line,-5,5,15,5,#000000\nRectangle,0,0,10,10,#000000,none,none\n",
    );

    let output = vectorpaint_cmd(&temp)
        .arg("clip")
        .arg(&doc)
        .args(["--source", "0", "--clip", "1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let segment = &value["segments"][0];
    assert_eq!(segment[0]["x"], 0);
    assert_eq!(segment[0]["y"], 5);
    assert_eq!(segment[1]["x"], 10);
    assert_eq!(segment[1]["y"], 5);
}

#[test]
fn clip_against_concave_polygon_is_rejected() {
    let temp = TempDir::new().unwrap();
    let doc = write_doc(
        &temp,
        "concave.vpd",
        "Line,0,5,20,5,#000000\nPolygon,#000000,none,none,0;0,10;0,5;5,10;10,0;10\n",
    );

    vectorpaint_cmd(&temp)
        .arg("clip")
        .arg(&doc)
        .args(["--source", "0", "--clip", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot clip shape 0 against shape 1"));
}

#[test]
fn check_reports_skipped_lines() {
    let temp = TempDir::new().unwrap();
    let doc = write_doc(
        &temp,
        "broken.vpd",
        "Line,0,0,10,0,#000000\nCircle,1,2\nRectangle,0,0,4,4,#zzzzzz,none,none\nCircle,5,5,8,5,#ff0000\n",
    );

    vectorpaint_cmd(&temp)
        .arg("check")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 shapes"))
        .stdout(predicate::str::contains("2 malformed lines skipped: 2, 3"));
}

#[test]
fn fill_paints_enclosed_region() {
    let temp = TempDir::new().unwrap();
    let doc = write_doc(&temp, "box.vpd", "Rectangle,2,2,12,12,#000000,none,none\n");
    let png = temp.path().join("filled.png");

    vectorpaint_cmd(&temp)
        .arg("fill")
        .arg(&doc)
        .args(["--seed", "6,6", "--color", "#00ff00"])
        .arg("-o")
        .arg(&png)
        .args(["--width", "16", "--height", "16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Filled 81 pixels"));

    assert_eq!(rgba_at(&png, 6, 6), [0, 255, 0, 255]);
    assert_eq!(rgba_at(&png, 2, 2), [0, 0, 0, 255]);
    assert_eq!(rgba_at(&png, 0, 0), [255, 255, 255, 255]);
}

#[test]
fn fill_requires_color_or_texture() {
    let temp = TempDir::new().unwrap();
    let doc = write_doc(&temp, "box.vpd", "");

    vectorpaint_cmd(&temp)
        .arg("fill")
        .arg(&doc)
        .args(["--seed", "1,1", "-o"])
        .arg(temp.path().join("out.png"))
        .assert()
        .failure();
}

#[test]
fn init_config_writes_example_once() {
    let temp = TempDir::new().unwrap();

    vectorpaint_cmd(&temp).arg("init-config").assert().success();
    let written = fs::read_to_string(temp.path().join("config.toml")).unwrap();
    assert!(written.contains("[clipping]"));

    vectorpaint_cmd(&temp)
        .arg("init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
