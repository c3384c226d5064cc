//! Integration tests for argument handling of the `weather` binary.

use std::process::{Command, Output};

/// Run the binary with an empty config dir and no API key in the environment.
fn run_cli(args: &[&str]) -> Output {
    let home = tempfile::tempdir().expect("tempdir");

    Command::new(env!("CARGO_BIN_EXE_weather"))
        .args(args)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("OPENWEATHER_API_KEY")
        .env_remove("WEATHER_API_KEY")
        .output()
        .expect("Failed to execute weather")
}

#[test]
fn help_lists_subcommands() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("show"));
    assert!(stdout.contains("browse"));
    assert!(stdout.contains("configure"));
}

#[test]
fn unknown_unit_is_rejected() {
    let output = run_cli(&["show", "London", "--unit", "kelvin"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown unit"), "stderr: {stderr}");
}

#[test]
fn latitude_requires_longitude() {
    let output = run_cli(&["show", "--lat", "51.5"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--lon"), "stderr: {stderr}");
}

#[test]
fn missing_api_key_is_fatal() {
    let output = run_cli(&["show", "London"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No API key provided"), "stderr: {stderr}");
}

#[test]
fn missing_city_is_fatal() {
    let output = run_cli(&["show", "--api-key", "KEY"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No city configured"), "stderr: {stderr}");
}

#[test]
fn blank_city_is_rejected() {
    for city in ["", "   "] {
        let output = run_cli(&["show", city, "--api-key", "KEY"]);
        assert!(!output.status.success());

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("City must not be empty"), "stderr: {stderr}");
    }
}
