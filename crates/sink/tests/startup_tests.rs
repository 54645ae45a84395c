//! Startup behaviour of the `sink` binary.

use std::net::TcpListener;
use std::process::Command;

#[test]
fn test_missing_gchat_webhook_url_exits_before_binding() {
    // Hold the port so a bind attempt would fail with a different error.
    let held = TcpListener::bind("0.0.0.0:0").unwrap();
    let port = held.local_addr().unwrap().port();

    let output = Command::new(env!("CARGO_BIN_EXE_sink"))
        .env_remove("GCHAT_WEBHOOK_URL")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .env("RUST_LOG", "info")
        .env("PORT", port.to_string())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("missing required environment variable GCHAT_WEBHOOK_URL"),
        "{stdout}"
    );
    assert!(!stdout.contains("failed to bind"), "{stdout}");
    assert!(!stdout.contains("Serving"), "{stdout}");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("failed to bind"), "{stderr}");
}
