use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use tempfile::tempdir;

#[test]
fn format_normalizes_markdown() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("doc.md");
    fs::write(&input_path, "Title\n=====\n\n* a\n* b\n\n__strong__\n").unwrap();

    cargo_bin_cmd!("marklight")
        .arg("format")
        .arg(input_path.as_os_str())
        .assert()
        .success()
        .stdout("# Title\n\n- a\n- b\n\n**strong**\n");
}

#[test]
fn format_respects_bullet_marker_from_config() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("doc.md");
    fs::write(&input_path, "- a\n- b\n").unwrap();

    let config_path = dir.path().join("marklight.toml");
    fs::write(
        &config_path,
        r#"[serializer]
bullet_marker = "+"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("marklight");
    cmd.arg("format")
        .arg(input_path.as_os_str())
        .arg("--config")
        .arg(config_path.as_os_str());

    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    assert_eq!(stdout, "+ a\n+ b\n");
}

#[test]
fn disabled_extension_from_config_keeps_text() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("doc.md");
    fs::write(&input_path, "==x==\n").unwrap();

    let config_path = dir.path().join("marklight.toml");
    fs::write(&config_path, "[parser]\nhighlight = false\n").unwrap();

    cargo_bin_cmd!("marklight")
        .arg("format")
        .arg(input_path.as_os_str())
        .arg("--config")
        .arg(config_path.as_os_str())
        .assert()
        .success()
        .stdout("\\=\\=x\\=\\=\n");
}

#[test]
fn extra_parameter_overrides_config() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("doc.md");
    fs::write(&input_path, "- a\n").unwrap();

    cargo_bin_cmd!("marklight")
        .arg("format")
        .arg(input_path.as_os_str())
        .arg("--extra-bullet-marker")
        .arg("*")
        .assert()
        .success()
        .stdout("* a\n");
}

#[test]
fn missing_config_file_fails() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("doc.md");
    fs::write(&input_path, "text\n").unwrap();

    cargo_bin_cmd!("marklight")
        .arg("format")
        .arg(input_path.as_os_str())
        .arg("--config")
        .arg(dir.path().join("absent.toml").as_os_str())
        .assert()
        .failure();
}
