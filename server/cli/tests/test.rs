use std::process::Command;

use serde_json::Value;

fn run(args: &[&str]) -> Vec<Value> {
    let output = Command::new(env!("CARGO_BIN_EXE_touchgesture"))
        .args(args)
        .output()
        .expect("failed to run touchgesture");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn replay_trace_as_json() {
    let events = run(&[
        "--config",
        "tests/fixtures/config.yml",
        "--trace",
        "tests/fixtures/scroll_and_tap.jsonl",
        "--json",
    ]);
    assert_eq!(
        events,
        vec![
            serde_json::json!({"event": "h_scroll", "dx": 5}),
            serde_json::json!({"event": "tap", "button": "left", "count": 1}),
        ]
    );
}

#[test]
fn reject_unsupported_config() {
    let output = Command::new(env!("CARGO_BIN_EXE_touchgesture"))
        .args(["--config", "tests/fixtures/scroll_and_tap.jsonl"])
        .output()
        .expect("failed to run touchgesture");
    assert!(!output.status.success());
}
