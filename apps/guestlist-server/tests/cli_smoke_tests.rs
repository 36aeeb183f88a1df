//! CLI smoke tests for the guestlist-server binary
//!
//! Every invocation gets its own temporary home directory so logs and the
//! SQLite file never land in the real user home.

use std::process::{Command, Output, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Instant};

fn run_guestlist_server(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_guestlist-server"))
        .args(args)
        .env("APP__SERVER__HOME_DIR", home.path())
        .env_remove("PORT")
        .env_remove("DATABASE_URL")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute guestlist-server")
}

fn write_config(home: &TempDir, name: &str, content: &str) -> String {
    let path = home.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("Failed to reserve a port")
}

async fn http_get(port: u16, path: &str) -> std::io::Result<String> {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await?;
    let request =
        format!("GET {path} HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await?;
    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}

#[test]
fn test_cli_help_command() {
    let home = TempDir::new().unwrap();
    let output = run_guestlist_server(&home, &["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let home = TempDir::new().unwrap();
    let output = run_guestlist_server(&home, &["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("guestlist-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let home = TempDir::new().unwrap();
    let output = run_guestlist_server(&home, &["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Unexpected stderr: {stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let home = TempDir::new().unwrap();
    let output = run_guestlist_server(&home, &["-c", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Config file not found"),
        "Should mention config file issue: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home, "invalid.yaml", "invalid: yaml: content: [unclosed");

    let output = run_guestlist_server(&home, &["--config", &config, "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_check_valid_config() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        "valid.yaml",
        r#"
server:
  port: 5055

database:
  url: "sqlite://database/guests.db"

logging:
  default:
    console_level: warn
    file: ""

modules:
  api_ingress:
    enable_docs: true
  guests:
    max_allocation_attempts: 3
"#,
    );

    let output = run_guestlist_server(&home, &["--config", &config, "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "STDOUT: {stdout}\nSTDERR: {stderr}");
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("port: 5055"));
}

#[test]
fn test_cli_check_rejects_unknown_module_keys() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        "bad-module.yaml",
        r#"
modules:
  guests:
    qr_bytes: 16
"#,
    );

    let output = run_guestlist_server(&home, &["--config", &config, "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("guests"), "Unexpected stderr: {stderr}");
}

#[test]
fn test_cli_check_rejects_oversized_identifier_bytes() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        "wide-ids.yaml",
        r#"
modules:
  guests:
    identifier_bytes: 64
"#,
    );

    let output = run_guestlist_server(&home, &["--config", &config, "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("identifier_bytes"),
        "Unexpected stderr: {stderr}"
    );
}

#[test]
fn test_cli_check_rejects_unsupported_database() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        "mysql.yaml",
        r#"
database:
  url: "mysql://localhost/guests"
"#,
    );

    let output = run_guestlist_server(&home, &["--config", &config, "check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported database type"));

    // --mock never touches the configured store.
    let output = run_guestlist_server(&home, &["--config", &config, "--mock", "check"]);
    assert!(output.status.success());
}

#[test]
fn test_cli_print_config_applies_overrides() {
    let home = TempDir::new().unwrap();
    let output = run_guestlist_server(&home, &["--port", "6123", "-v", "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 6123"), "{stdout}");
    assert!(stdout.contains("console_level: debug"), "{stdout}");
}

#[test]
fn test_cli_env_port_is_honored() {
    let home = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_guestlist-server"))
        .args(["--print-config"])
        .env("APP__SERVER__HOME_DIR", home.path())
        .env("PORT", "7001")
        .output()
        .expect("Failed to execute guestlist-server");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("port: 7001"));
}

#[tokio::test]
async fn test_cli_run_serves_health_with_mock_database() {
    let home = TempDir::new().unwrap();
    let port = free_port();
    let port_arg = port.to_string();

    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_guestlist-server"))
        .args(["--mock", "--port", &port_arg, "run"])
        .env("APP__SERVER__HOME_DIR", home.path())
        .env_remove("PORT")
        .env_remove("DATABASE_URL")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn guestlist-server");

    let deadline = Instant::now() + Duration::from_secs(20);
    let response = loop {
        match timeout(Duration::from_secs(2), http_get(port, "/health")).await {
            Ok(Ok(body)) => break body,
            _ if Instant::now() >= deadline => {
                let _ = child.kill().await;
                panic!("server did not answer /health in time");
            }
            _ => sleep(Duration::from_millis(200)).await,
        }
    };

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("\"healthy\""), "{response}");
    assert!(response.to_ascii_lowercase().contains("x-request-id"));

    let listing = http_get(port, "/api/guests").await.unwrap();
    assert!(listing.starts_with("HTTP/1.1 200"), "{listing}");
    assert!(listing.contains(r#""guests":[]"#), "{listing}");

    child.kill().await.unwrap();
}
