use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the widget binary with a scratch HOME and working directory and no
/// API key in the inherited environment
fn run_widget(home: &TempDir, workdir: &TempDir) -> Output {
    Command::new(env!("CARGO_BIN_EXE_weather-widget"))
        .current_dir(workdir.path())
        .env_remove("WEATHER_API_KEY")
        .env("HOME", home.path())
        .env("RUST_LOG", "debug")
        .output()
        .unwrap()
}

#[test]
fn missing_api_key_exits_before_window() {
    let home = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();

    let output = run_widget(&home, &workdir);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1), "stderr: {stderr}");
    assert!(stderr.contains("WEATHER_API_KEY"), "stderr: {stderr}");
    assert!(stderr.contains(".env"), "stderr: {stderr}");
    // Settings are only opened once the credential check has passed
    assert!(!stderr.contains("Settings file"), "stderr: {stderr}");
    assert!(!home
        .path()
        .join(".local/share/weather-widget/settings.json")
        .exists());
}

#[test]
fn dotenv_file_is_read_from_working_directory() {
    let home = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();
    fs::write(workdir.path().join(".env"), "WEATHER_API_KEY=\n").unwrap();

    let output = run_widget(&home, &workdir);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains("Loaded environment from"),
        "stderr: {stderr}"
    );
    // A blank key is as good as none
    assert_eq!(output.status.code(), Some(1), "stderr: {stderr}");
}

#[test]
fn invalid_config_exits_with_status_1() {
    let home = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();
    let config_dir = home.path().join(".config/weather-widget");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "request_timeout_secs = 0\n").unwrap();

    let output = run_widget(&home, &workdir);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1), "stderr: {stderr}");
    assert!(stderr.contains("Request timeout"), "stderr: {stderr}");
}
