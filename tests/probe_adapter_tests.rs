#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use streamprobe::adapters::FFprobeAdapter;
use streamprobe::{DomainError, ProbePort, ReportInspector};
use tempfile::TempDir;

/// Write an executable stand-in for ffprobe
fn fake_tool(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-ffprobe");
    std::fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn media_file(dir: &Path) -> PathBuf {
    let path = dir.join("movie.mkv");
    std::fs::write(&path, b"not decoded").unwrap();
    path
}

#[tokio::test]
async fn test_fake_tool_channels_and_failures() {
    let dir = TempDir::new().unwrap();
    let media = media_file(dir.path());

    // Report split across both channels, stdout first.
    let tool = fake_tool(
        dir.path(),
        r#"[ "$1" = "-h" ] && exit 0
printf '[STREAM]\ncodec_type=video\nnb_frames=42\n'
printf 'ffprobe banner\nwidth=320\nheight=240\n[/STREAM]\n' >&2
"#,
    );
    let output = FFprobeAdapter::new(&tool)
        .probe_streams(&media)
        .await
        .unwrap();
    assert_eq!(output.stdout.len(), 3);
    assert_eq!(output.stderr.len(), 4);

    let report = ReportInspector::default().inspect(&output).unwrap();
    let video = report.video_streams()[0];
    assert_eq!(video.frame_count().unwrap(), 42);
    assert_eq!(video.frame_size().unwrap().unwrap().width, 320);

    // Non-zero exit from the report run
    let failing = dir.path().join("failing");
    std::fs::create_dir(&failing).unwrap();
    let tool = fake_tool(
        &failing,
        r#"[ "$1" = "-h" ] && exit 0
echo "movie.mkv: Invalid data found when processing input" >&2
exit 1
"#,
    );
    let error = FFprobeAdapter::new(&tool)
        .probe_streams(&media)
        .await
        .unwrap_err();
    assert!(
        matches!(&error, DomainError::InvocationFailed { reason, .. } if reason.contains("Invalid data")),
        "{error}"
    );

    // Timeout bounds the report run
    let slow = dir.path().join("slow");
    std::fs::create_dir(&slow).unwrap();
    let tool = fake_tool(
        &slow,
        r#"[ "$1" = "-h" ] && exit 0
sleep 5
"#,
    );
    let error = FFprobeAdapter::new(&tool)
        .with_timeout(Some(Duration::from_millis(200)))
        .probe_streams(&media)
        .await
        .unwrap_err();
    assert!(matches!(error, DomainError::InvocationFailed { .. }), "{error}");
}

#[tokio::test]
async fn test_timeout_covers_availability_check() {
    let dir = TempDir::new().unwrap();
    let media = media_file(dir.path());

    // Hangs on `-h` as well as on the report run
    let tool = fake_tool(dir.path(), "sleep 5\n");
    let started = std::time::Instant::now();
    let error = FFprobeAdapter::new(&tool)
        .with_timeout(Some(Duration::from_millis(200)))
        .probe_streams(&media)
        .await
        .unwrap_err();

    assert!(
        matches!(&error, DomainError::InvocationFailed { reason, .. } if reason.contains("timed out")),
        "{error}"
    );
    assert!(started.elapsed() < Duration::from_secs(4));
}
