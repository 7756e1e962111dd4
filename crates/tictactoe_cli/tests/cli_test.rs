//! Runs the `tictactoe` binary end to end.

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

fn tictactoe() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tictactoe"));
    cmd.env_remove("TICTACTOE_CONFIG")
        .env("RUST_LOG", "off")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

#[tokio::test]
async fn test_analyze_json() {
    let output = tictactoe()
        .args(["analyze", "XX.OO....", "--computer", "X", "--json"])
        .output()
        .await
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["index"], 2);
    assert_eq!(json["score"], 9);
    assert_eq!(json["label"], "Top-right");
}

#[tokio::test]
async fn test_analyze_decided_board_fails() {
    let output = tictactoe()
        .args(["analyze", "XXXOO...."])
        .output()
        .await
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Player X wins!"), "stderr: {stderr}");
}

#[tokio::test]
async fn test_arena_hard_mirror() {
    let output = tictactoe()
        .args(["arena", "--x", "hard", "--o", "hard", "--games", "3", "--seed", "1", "--json"])
        .output()
        .await
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["games"], 3);
    assert_eq!(json["draws"], 3);
    assert_eq!(json["x"], "hard");
}

#[tokio::test]
async fn test_play_reads_stdin_until_eof() {
    let mut child = tictactoe()
        .args(["play", "--difficulty", "hard", "--delay-ms", "0", "--seed", "4"])
        .stdin(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"x\n5\nquit\n").await.unwrap();
    drop(stdin);

    let output = child.wait_with_output().await.unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("You are X, the computer is O (hard)"), "stdout: {stdout}");
}
