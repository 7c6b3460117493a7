//! Integration tests for the machine-driver-hetzner CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Create a unique temp directory with an empty config file.
fn temp_dir(name: &str) -> PathBuf {
    use std::time::{SystemTime, UNIX_EPOCH};

    // Use a unique directory for each test to avoid conflicts when running in parallel
    let unique_id = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "machine-driver-hetzner-{}-{}-{}",
        name,
        std::process::id(),
        unique_id
    ));
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

/// Run the binary with an isolated config and return (stdout, stderr, exit_code).
fn run(dir: &Path, args: &[&str]) -> (String, String, i32) {
    run_with_env(dir, args, &[])
}

/// Like `run`, with only PATH, HOME and the given variables in the environment.
fn run_with_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> (String, String, i32) {
    let config_path = dir.join("config.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_machine-driver-hetzner"))
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .env_clear()
        .envs(std::env::vars().filter(|(key, _)| key == "PATH" || key == "HOME"))
        .envs(env.iter().copied())
        .output()
        .expect("Failed to run machine-driver-hetzner");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_check_prints_resolved_configuration() {
    let dir = temp_dir("check");
    let (stdout, stderr, exit_code) = run(
        &dir,
        &[
            "check",
            "--hetzner-api-token",
            "secret-token",
            "--hetzner-server-label",
            "env=prod",
        ],
    );

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(value["image"], "ubuntu-24.04");
    assert_eq!(value["server_labels"]["env"], "prod");
    assert!(!stdout.contains("secret-token"), "token must not be printed");
    assert!(stderr.contains("Driver flags are valid."));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_check_quiet_suppresses_message() {
    let dir = temp_dir("quiet");
    let (_stdout, stderr, exit_code) =
        run(&dir, &["-q", "check", "--hetzner-api-token", "t"]);

    assert_eq!(exit_code, 0);
    assert!(!stderr.contains("Driver flags are valid."));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_check_rejects_image_and_image_id() {
    let dir = temp_dir("image");
    let (_stdout, stderr, exit_code) = run(
        &dir,
        &[
            "check",
            "--hetzner-api-token",
            "t",
            "--hetzner-image",
            "debian-12",
            "--hetzner-image-id",
            "42",
        ],
    );

    assert_ne!(exit_code, 0);
    assert!(
        stderr.contains("--hetzner-image and --hetzner-image-id are mutually exclusive"),
        "stderr: {}",
        stderr
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_check_allows_legacy_default_image_with_id() {
    let dir = temp_dir("legacy-image");
    let (stdout, stderr, exit_code) = run(
        &dir,
        &[
            "check",
            "--hetzner-api-token",
            "t",
            "--hetzner-image",
            "ubuntu-18.04",
            "--hetzner-image-id",
            "42",
        ],
    );

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["image_id"], 42);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_check_requires_private_network_when_public_disabled() {
    let dir = temp_dir("network");
    let base = [
        "check",
        "--hetzner-api-token",
        "t",
        "--hetzner-disable-public-ipv4",
        "--hetzner-disable-public-ipv6",
    ];

    let (_stdout, stderr, exit_code) = run(&dir, &base);
    assert_ne!(exit_code, 0);
    assert!(stderr.contains("--hetzner-use-private-network must be used"));

    let mut with_private = base.to_vec();
    with_private.push("--hetzner-use-private-network");
    let (_stdout, stderr, exit_code) = run(&dir, &with_private);
    assert_eq!(exit_code, 0, "stderr: {}", stderr);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_check_rejects_malformed_label() {
    let dir = temp_dir("label");
    let (_stdout, stderr, exit_code) = run(
        &dir,
        &["check", "--hetzner-api-token", "t", "--hetzner-key-label", "owner"],
    );

    assert_ne!(exit_code, 0);
    assert!(stderr.contains("key label owner is not in key=value format"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_deprecated_flag_warns_on_stderr() {
    let dir = temp_dir("deprecated");
    let (stdout, stderr, exit_code) = run(
        &dir,
        &[
            "check",
            "--hetzner-api-token",
            "t",
            "--hetzner-disable-public-4",
        ],
    );

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(stderr.contains(
        "--hetzner-disable-public-4 is DEPRECATED FOR REMOVAL, use --hetzner-disable-public-ipv4 instead"
    ));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["disable_public4"], true);
    assert_eq!(value["uses_deprecated_flags"], true);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_environment_variables_supply_flags() {
    let dir = temp_dir("env");
    let (stdout, stderr, exit_code) = run_with_env(
        &dir,
        &["check"],
        &[
            ("HETZNER_API_TOKEN", "from-env"),
            ("HETZNER_IMAGE", "debian-12"),
            ("HETZNER_DISABLE_PUBLIC", "true"),
        ],
    );

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["image"], "debian-12");
    assert_eq!(value["use_private_network"], true);
    assert!(!stdout.contains("from-env"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_config_file_supplies_flag_defaults() {
    let dir = temp_dir("config-defaults");
    write_config(
        &dir,
        r#"
[flags]
"hetzner-api-token" = "from-config"
"hetzner-image" = "debian-12"
"hetzner-server-type" = "cx32"
"#,
    );

    let (stdout, stderr, exit_code) =
        run(&dir, &["check", "--hetzner-image", "ubuntu-22.04"]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["image"], "ubuntu-22.04");
    assert_eq!(value["server_type"], "cx32");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = temp_dir("bad-config");
    write_config(
        &dir,
        r#"
[flags]
"hetzner-colour" = "blue"
"#,
    );

    let (_stdout, stderr, exit_code) = run(&dir, &["version"]);

    assert_ne!(exit_code, 0);
    assert!(stderr.contains("unknown driver flag 'hetzner-colour'"), "stderr: {}", stderr);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_merge_user_data_files() {
    let dir = temp_dir("merge");
    let first = dir.join("base.yaml");
    let second = dir.join("extra.yaml");
    fs::write(&first, "#cloud-config\npackages: [git]\nusers:\n  - name: admin\n").unwrap();
    fs::write(&second, "packages: [curl]\nhostname: node-1\n").unwrap();

    let (stdout, stderr, exit_code) = run(
        &dir,
        &[
            "merge-user-data",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
        ],
    );

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(stdout.starts_with("#cloud-config\n"));
    assert!(stdout.contains("- git\n- curl") || stdout.contains("  - git\n  - curl"));
    assert!(stdout.contains("hostname: node-1"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_merge_user_data_rejects_invalid_yaml() {
    let dir = temp_dir("merge-invalid");
    let first = dir.join("base.yaml");
    let second = dir.join("broken.yaml");
    fs::write(&first, "packages: [git]\n").unwrap();
    fs::write(&second, "packages: [curl\n").unwrap();

    let (_stdout, stderr, exit_code) = run(
        &dir,
        &[
            "merge-user-data",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
        ],
    );

    assert_ne!(exit_code, 0);
    assert!(stderr.contains("failed to unmarshal second YAML"), "stderr: {}", stderr);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_user_data_legacy_merge() {
    let dir = temp_dir("user-data");
    let file = dir.join("user-data.yaml");
    fs::write(&file, "runcmd: [echo file]\n").unwrap();

    let (stdout, stderr, exit_code) = run(
        &dir,
        &[
            "user-data",
            "--hetzner-api-token",
            "t",
            "--hetzner-user-data-from-file",
            "--hetzner-user-data",
            file.to_str().unwrap(),
            "--hetzner-additional-user-data",
            "runcmd: [echo additional]\\npackages: [jq]",
        ],
    );

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(stdout.starts_with("#cloud-config"));
    let additional = stdout.find("echo additional").expect("additional entry");
    let from_file = stdout.find("echo file").expect("file entry");
    assert!(additional < from_file, "additional entries come first: {}", stdout);
    assert!(stdout.contains("jq"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_user_data_from_file() {
    let dir = temp_dir("user-data-file");
    let file = dir.join("user-data.yaml");
    fs::write(&file, "#cloud-config\npackages: [htop]\n").unwrap();

    let (stdout, stderr, exit_code) = run(
        &dir,
        &[
            "user-data",
            "--hetzner-api-token",
            "t",
            "--hetzner-user-data-file",
            file.to_str().unwrap(),
        ],
    );

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert_eq!(stdout, "#cloud-config\npackages: [htop]\n");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_init_creates_config() {
    let dir = temp_dir("init");
    let target = dir.join("generated").join("config.toml");

    let (_stdout, stderr, exit_code) = run(&dir, &["init", "--path", target.to_str().unwrap()]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(target.exists());
    assert!(stderr.contains("Configuration file created at"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_version() {
    let dir = temp_dir("version");
    let (stdout, _stderr, exit_code) = run(&dir, &["version"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.starts_with("machine-driver-hetzner "));

    fs::remove_dir_all(&dir).ok();
}
