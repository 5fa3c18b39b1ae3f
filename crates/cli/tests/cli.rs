use assert_cmd::Command;

#[test]
fn check_config_prints_defaults() {
    let config_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config");

    let output = Command::cargo_bin("shelfwise")
        .unwrap()
        .env("SHELFWISE_CONFIG_DIR", config_dir)
        .env("SHELFWISE_ENV", "local")
        .arg("check-config")
        .output()
        .unwrap();

    assert!(output.status.success());
    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["auth"]["header"], "x-requester-id");
    assert_eq!(settings["trending"]["default_limit"], 10);
}

#[test]
fn unknown_environment_fails() {
    Command::cargo_bin("shelfwise")
        .unwrap()
        .env("SHELFWISE_ENV", "moon")
        .arg("check-config")
        .assert()
        .failure();
}

#[test]
fn check_config_hides_bearer_tokens() {
    let config_dir = std::path::Path::new(env!("CARGO_TARGET_TMPDIR")).join("token-config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("base.toml"),
        "[auth]\nmode = \"token\"\n\n[auth.tokens]\ns3cr3t-token = \"U1\"\n",
    )
    .unwrap();

    let output = Command::cargo_bin("shelfwise")
        .unwrap()
        .env("SHELFWISE_CONFIG_DIR", &config_dir)
        .env("SHELFWISE_ENV", "local")
        .arg("check-config")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("s3cr3t-token"));
    let settings: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(settings["auth"]["mode"], "token");
    assert!(settings["auth"].get("tokens").is_none());
}
