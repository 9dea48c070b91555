#[cfg(feature = "binaries")]
mod binary {
  use assert_cmd::Command;
  use rand::distributions::Alphanumeric;
  use rand::{thread_rng, Rng};
  use std::env::temp_dir;
  use std::fs;
  use std::path::PathBuf;

  fn get_tempfile_path(extension: &str) -> PathBuf {
    let mut path = temp_dir();
    let filename = thread_rng()
      .sample_iter(&Alphanumeric)
      .take(12)
      .map(char::from)
      .collect::<String>();
    path.push(format!("{}.{}", filename, extension));
    path
  }

  #[cfg(not(windows))]
  fn get_hucbrc_command() -> Command {
    let mut cmd = Command::cargo_bin("hucbrc").unwrap();
    cmd.env_clear();
    cmd
  }

  #[cfg(windows)]
  // `env_clear` doesn't work on Windows: https://github.com/rust-lang/rust/issues/31259
  fn get_hucbrc_command() -> Command {
    Command::cargo_bin("hucbrc").unwrap()
  }

  fn frame_lines(stdout: &[u8]) -> Vec<Vec<String>> {
    String::from_utf8_lossy(stdout)
      .lines()
      .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
      .map(|l| l.split_whitespace().map(str::to_owned).collect())
      .collect()
  }

  #[test]
  fn hevc_cbr() {
    let out = get_hucbrc_command()
      .args(["--codec", "hevc", "--bitrate", "2000000", "--frames", "10"])
      .assert()
      .success()
      .get_output()
      .stdout
      .clone();
    let frames = frame_lines(&out);
    assert_eq!(frames.len(), 10);
    assert_eq!(frames[0][1], "I");
    assert_eq!(frames[1][1], "P");
  }

  #[test]
  fn vp9_multi_pass() {
    get_hucbrc_command()
      .args(["--codec", "vp9", "--generation", "g11", "--passes", "2"])
      .args(["--size", "1280x720", "--frames", "5"])
      .assert()
      .success();
  }

  #[test]
  fn vp8_with_gop() {
    get_hucbrc_command()
      .args(["--codec", "VP8", "--gop", "4", "--frames", "8"])
      .args(["--fps", "30000/1001"])
      .assert()
      .success();
  }

  #[test]
  fn dump_payloads() {
    let out = get_hucbrc_command()
      .args(["--frames", "2", "--dump"])
      .assert()
      .success()
      .get_output()
      .stdout
      .clone();
    let text = String::from_utf8_lossy(&out);
    let init = text.lines().filter(|l| l.starts_with("init ")).count();
    let update = text.lines().filter(|l| l.starts_with("update ")).count();
    assert_eq!((init, update), (1, 2));
    // 192 byte DMEM as hex
    let line = text.lines().find(|l| l.starts_with("update ")).unwrap();
    assert_eq!(line.len(), "update ".len() + 384);
  }

  #[test]
  fn config_file() {
    let config = get_tempfile_path("toml");
    let text = r#"
      frames = 3
      [session]
      codec = "VP9"
      [sequence]
      width = 640
      height = 480
      target_bitrate = 1000000
      max_bitrate = 1000000
    "#;
    fs::write(&config, text).unwrap();
    let out = get_hucbrc_command()
      .arg("--config")
      .arg(&config)
      .assert()
      .success()
      .get_output()
      .stdout
      .clone();
    assert_eq!(frame_lines(&out).len(), 3);
  }

  #[test]
  fn invalid_parameters_fail() {
    get_hucbrc_command().args(["--bitrate", "abc"]).assert().failure();
    get_hucbrc_command().args(["--fps", "30/0"]).assert().failure();
    get_hucbrc_command().args(["--passes", "9"]).assert().failure();
  }

  #[test]
  fn errors_name_the_option() {
    let out = get_hucbrc_command()
      .args(["--bitrate", "abc"])
      .assert()
      .failure()
      .get_output()
      .stderr
      .clone();
    let stderr = String::from_utf8_lossy(&out);
    assert!(stderr.contains("Option --bitrate expects an integer, got `abc`"));
    assert!(stderr.contains("Caused by: invalid digit"));

    let out = get_hucbrc_command()
      .args(["--size", "640"])
      .assert()
      .failure()
      .get_output()
      .stderr
      .clone();
    let stderr = String::from_utf8_lossy(&out);
    assert!(stderr.contains("Frame size must be WIDTHxHEIGHT, got `640`"));
  }
}
