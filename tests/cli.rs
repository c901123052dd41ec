//! Exit codes and stream separation of the `darling` binary.
//!
//! Each test runs the compiled binary against a temporary feed file, with a
//! config path that does not exist so the user's own config never applies.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>t</title>
  <item><guid>1</guid><title>Hello</title><pubDate>Sat, 12 Oct 2019 08:00:00 GMT</pubDate></item>
</channel></rss>"#;

fn write_feed(name: &str) -> (PathBuf, String) {
    let dir = std::env::temp_dir().join(format!("darling_cli_test_{name}"));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("feed.xml");
    std::fs::write(&path, FEED).unwrap();
    let token = path.to_string_lossy().into_owned();
    (dir, token)
}

fn darling(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_darling"));
    cmd.args(["--config", "/definitely/not/here/darling.toml"])
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null());
    cmd
}

fn run(args: &[&str]) -> Output {
    darling(args).output().unwrap()
}

#[test]
fn test_negative_limit_is_usage_error() {
    let (dir, token) = write_feed("negative_limit");
    let out = run(&["-l", "-1", &token]);

    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("must not be negative"), "stderr: {stderr}");
    assert!(stderr.contains("Usage"), "stderr: {stderr}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_unparseable_since_exits_1_with_empty_stdout() {
    let (dir, token) = write_feed("bad_since");
    let out = run(&["--since", "32x", &token]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("32x"), "stderr: {stderr}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_diagnostics_only_on_stderr() {
    let (dir, token) = write_feed("diagnostics");
    let out = run(&[&token, "not-a-url-or-file"]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stdout.contains("<rss"));
    assert!(stdout.contains("Hello"));
    assert!(!stdout.contains("not-a-url-or-file"));
    assert_eq!(
        stderr.lines().filter(|l| l.starts_with("darling: ")).count(),
        1,
        "stderr: {stderr}"
    );
    assert!(stderr.contains("darling: not-a-url-or-file"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_open_stdin_is_not_read_when_sources_given() {
    let (dir, token) = write_feed("open_stdin");
    let mut child = darling(&[&token])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    // Hold the write end open for the whole run.
    let _stdin = child.stdin.take();

    let deadline = Instant::now() + Duration::from_secs(20);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            child.kill().ok();
            panic!("darling did not finish while stdin stayed open");
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    assert!(status.success());
    let mut stdout = String::new();
    child
        .stdout
        .take()
        .unwrap()
        .read_to_string(&mut stdout)
        .unwrap();
    assert!(stdout.contains("Hello"));

    std::fs::remove_dir_all(&dir).ok();
}
