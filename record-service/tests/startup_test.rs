//! Process-level startup behaviour of the compiled binary.

mod common;

use common::UNREACHABLE_MONGODB_URI;
use std::net::TcpListener;
use std::process::{Command, Output};

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind ephemeral port")
        .local_addr()
        .unwrap()
        .port()
}

fn run_service(port: u16, mongodb_uri: Option<&str>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_record-service"));
    command
        // Keep dotenvy and the configuration file lookup away from the workspace
        .current_dir(std::env::temp_dir())
        .env_remove("MONGODB_URI")
        .env_remove("OTLP_ENDPOINT")
        .env("PORT", port.to_string());
    if let Some(uri) = mongodb_uri {
        command.env("MONGODB_URI", uri);
    }

    command.output().expect("Failed to run record-service")
}

fn port_is_free(port: u16) -> bool {
    TcpListener::bind(("0.0.0.0", port)).is_ok()
}

#[test]
fn missing_mongodb_uri_exits_with_code_1() {
    let port = free_port();
    let output = run_service(port, None);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("MONGODB_URI environment variable not set"),
        "unexpected stderr: {stderr}"
    );
    assert!(port_is_free(port));
}

#[test]
fn unreachable_database_exits_with_code_1() {
    let port = free_port();
    let output = run_service(port, Some(UNREACHABLE_MONGODB_URI));

    assert_eq!(output.status.code(), Some(1));
    assert!(port_is_free(port));
}
