use std::path::PathBuf;

use grant_visuals::AssetPlan;

fn exe(name: &str, env_value: Option<&'static str>) -> PathBuf {
    env_value.map(PathBuf::from).unwrap_or_else(|| {
        let mut p = PathBuf::from("target").join("debug");
        p.push(if cfg!(windows) {
            format!("{name}.exe")
        } else {
            name.to_string()
        });
        p
    })
}

#[test]
fn gif_convert_missing_input_exits_cleanly_with_fallback() {
    let dir = PathBuf::from("target").join("cli_smoke").join("gif_convert");
    std::fs::create_dir_all(&dir).unwrap();
    let missing = dir.join("does_not_exist.mp4");
    let out = dir.join("never.gif");

    let output = std::process::Command::new(exe(
        "gif-convert",
        option_env!("CARGO_BIN_EXE_gif-convert"),
    ))
    .arg(&missing)
    .arg("--output")
    .arg(&out)
    .arg("--no-pause")
    .output()
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("MP4 to GIF Converter - G.rave 2.0"));
    assert!(stdout.contains("[FAIL] Input file not found"));
    assert!(stdout.contains("[ALTERNATIVE] Use online converter"));
    assert!(!out.exists());
}

#[test]
fn gif_convert_empty_dir_prints_usage() {
    let dir = PathBuf::from("target").join("cli_smoke").join("empty_dir");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let output = std::process::Command::new(exe(
        "gif-convert",
        option_env!("CARGO_BIN_EXE_gif-convert"),
    ))
    .arg("--dir")
    .arg(&dir)
    .arg("--no-pause")
    .output()
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No MP4 files found"));
    assert!(!stdout.contains("Converting to GIF"));
}

#[test]
fn asset_gen_dump_plan_matches_defaults() {
    let output = std::process::Command::new(exe(
        "asset-gen",
        option_env!("CARGO_BIN_EXE_asset-gen"),
    ))
    .args(["--dump-plan", "--no-pause"])
    .output()
    .unwrap();

    assert!(output.status.success());
    let plan: AssetPlan = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan, AssetPlan::default());
}

#[test]
fn asset_gen_rejects_malformed_plan_file() {
    let dir = PathBuf::from("target").join("cli_smoke").join("asset_gen");
    std::fs::create_dir_all(&dir).unwrap();
    let plan_path = dir.join("bad_plan.json");
    std::fs::write(&plan_path, r#"{ "qr": { "box_sise": 3 } }"#).unwrap();

    let output = std::process::Command::new(exe(
        "asset-gen",
        option_env!("CARGO_BIN_EXE_asset-gen"),
    ))
    .arg("--plan")
    .arg(&plan_path)
    .args(["--dump-plan", "--no-pause"])
    .output()
    .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("load asset plan"));
}
