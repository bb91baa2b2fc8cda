//! Integration tests for the `tvcast` CLI binary.
//!
//! Every test reads its feed from a temporary JSON file and points the
//! config directories at a scratch path, so nothing touches the network
//! or the user's real configuration.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

const FEED: &str = r#"{
  "providerName": "Riverside Chapel",
  "language": "en",
  "lastUpdated": "2024-03-01T09:00:00+00:00",
  "movies": [
    {
      "id": "m1",
      "title": "Sermons - Week 1",
      "shortDescription": "Opening message",
      "thumbnail": "https://img.test/m1.jpg",
      "genres": ["faith"],
      "tags": ["sermon", "sermon"],
      "releaseDate": "2024-01-07T10:00:00+00:00",
      "content": {
        "dateAdded": "2024-01-07T12:00:00+00:00",
        "duration": 600,
        "language": "en",
        "videos": [
          {
            "quality": "FHD",
            "url": "https://customer-abc.cloudflarestream.com/uid/manifest/video.m3u8",
            "videoType": "HLS"
          }
        ]
      }
    },
    {
      "id": "m2",
      "title": "Sermons - Week 2",
      "releaseDate": "2024-01-14T10:00:00+00:00",
      "content": {
        "duration": 95,
        "videos": [{ "quality": "HD", "url": "https://videos.test/m2.mpd", "videoType": "DASH" }]
      }
    },
    {
      "id": "m3",
      "title": "Announcements",
      "releaseDate": "2024-01-10T10:00:00+00:00",
      "content": {
        "duration": 61,
        "videos": [{ "quality": "HD", "url": "https://videos.test/m3.mp4", "videoType": "MP4" }]
      }
    }
  ],
  "liveFeeds": [
    {
      "id": "live-1",
      "title": "Sunday Service",
      "releaseDate": "2024-01-01T00:00:00+00:00",
      "content": {
        "duration": 0,
        "videos": [{ "quality": "HD", "url": "https://live.test/stream.m3u8", "videoType": "HLS" }]
      },
      "validityPeriodStart": "2000-01-01T00:00:00+00:00",
      "validityPeriodEnd": "2999-01-01T00:00:00+00:00"
    },
    {
      "id": "live-old",
      "title": "Christmas Eve",
      "content": {
        "videos": [{ "quality": "HD", "url": "https://live.test/old.m3u8", "videoType": "HLS" }]
      },
      "validityPeriodStart": "2020-12-24T18:00:00+00:00",
      "validityPeriodEnd": "2020-12-24T20:00:00+00:00"
    }
  ]
}"#;

struct Sandbox {
    dir: TempDir,
    feed: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let feed = dir.path().join("feed.json");
        std::fs::write(&feed, FEED).unwrap();
        Self { dir, feed }
    }

    fn home(&self) -> &Path {
        self.dir.path()
    }

    /// A `tvcast` command with env isolation and no feed configured.
    fn bare(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("tvcast");
        cmd.env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.home().join("config"))
            .env_remove("TVCAST_CONFIG")
            .env_remove("TVCAST_FEED_URL")
            .env_remove("RUST_LOG");
        cmd
    }

    /// A `tvcast` command reading the fixture feed.
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = self.bare();
        cmd.arg("--feed-file").arg(&self.feed);
        cmd
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .args(["--output", "json"])
            .args(args)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "tvcast {args:?} failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let sandbox = Sandbox::new();
    let output = sandbox.bare().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    Sandbox::new().bare().arg("--help").assert().success().stdout(
        predicate::str::contains("recent")
            .and(predicate::str::contains("series"))
            .and(predicate::str::contains("live"))
            .and(predicate::str::contains("play")),
    );
}

#[test]
fn test_completions_zsh() {
    Sandbox::new()
        .bare()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let output = Sandbox::new()
        .cmd()
        .args(["--output", "xml", "recent"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("possible values"));
}

// ── Feed source errors ──────────────────────────────────────────────

#[test]
fn test_no_feed_source_is_a_usage_error() {
    Sandbox::new()
        .bare()
        .arg("recent")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No feed source"));
}

#[test]
fn test_unreadable_feed_renders_empty_with_warning() {
    let sandbox = Sandbox::new();
    sandbox
        .bare()
        .args(["--feed-file"])
        .arg(sandbox.home().join("missing.json"))
        .args(["--output", "json", "recent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"))
        .stderr(predicate::str::contains("content feed unavailable"));
}

// ── Catalog ─────────────────────────────────────────────────────────

#[test]
fn test_feed_summary() {
    let summary = Sandbox::new().json(&["feed"]);
    assert_eq!(summary["provider_name"], "Riverside Chapel");
    assert_eq!(summary["items"], 3);
    assert_eq!(summary["live_feeds"], 2);
    assert_eq!(summary["live_now"], 1);
    assert_eq!(summary["series"], 2);
}

#[test]
fn test_recent_is_newest_first() {
    Sandbox::new()
        .cmd()
        .args(["--output", "plain", "recent", "-n", "2"])
        .assert()
        .success()
        .stdout("m2\nm3\n");
}

#[test]
fn test_series_are_sorted_by_name() {
    Sandbox::new()
        .cmd()
        .args(["--output", "plain", "series"])
        .assert()
        .success()
        .stdout("Other\nSermons\n");
}

#[test]
fn test_series_items() {
    Sandbox::new()
        .cmd()
        .args(["--output", "plain", "series", "Sermons"])
        .assert()
        .success()
        .stdout("m2\nm1\n");
}

#[test]
fn test_unknown_series_is_not_found() {
    Sandbox::new()
        .cmd()
        .args(["series", "Podcasts"])
        .assert()
        .code(4);
}

#[test]
fn test_live_now_excludes_expired_feeds() {
    Sandbox::new()
        .cmd()
        .args(["--output", "plain", "live"])
        .assert()
        .success()
        .stdout("live-1\n");
}

#[test]
fn test_live_at_instant() {
    Sandbox::new()
        .cmd()
        .args(["--output", "plain", "live", "--at", "2020-12-24T20:00:00Z"])
        .assert()
        .success()
        .stdout("live-1\nlive-old\n");
}

// ── Details ─────────────────────────────────────────────────────────

#[test]
fn test_show_rewrites_cdn_manifest() {
    let details = Sandbox::new().json(&["show", "m1"]);
    assert_eq!(
        details["playable_url"],
        "https://customer-abc.cloudflarestream.com/uid/direct"
    );
    assert_eq!(details["video_type"], "mp4");
    assert_eq!(details["duration"], "10:00");
    assert_eq!(details["tags"], serde_json::json!(["sermon"]));
    assert_eq!(details["is_live"], false);
}

#[test]
fn test_show_live_feed() {
    let details = Sandbox::new().json(&["show", "live-1"]);
    assert_eq!(details["kind"], "live");
    assert_eq!(details["is_live"], true);
    assert_eq!(details["video_type"], "hls");
}

#[test]
fn test_show_unknown_id_is_not_found() {
    Sandbox::new()
        .cmd()
        .args(["show", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("'nope' not found"));
}

// ── Playback ────────────────────────────────────────────────────────

#[test]
fn test_play_applies_keys_until_back() {
    let frames = Sandbox::new().json(&[
        "play",
        "m2",
        "--keys",
        "right,play-pause,back,right",
        "--key-interval-ms",
        "0",
    ]);
    let frames = frames.as_array().unwrap();

    assert_eq!(frames.len(), 4, "keys after back are not processed");
    assert_eq!(frames[0]["session"]["transport_state"], "playing");
    assert_eq!(frames[0]["session"]["controls_visible"], true);
    assert_eq!(frames[1]["session"]["position_seconds"], 10.0);
    assert_eq!(frames[2]["session"]["transport_state"], "paused");
    assert_eq!(frames[3]["navigation"], "go_back");
}

#[test]
fn test_play_live_ignores_seek_and_pause() {
    let frames = Sandbox::new().json(&[
        "play",
        "live-1",
        "--keys",
        "fast-forward,play-pause",
        "--key-interval-ms",
        "0",
    ]);
    let frames = frames.as_array().unwrap();
    assert!(
        frames[1..].iter().all(|f| f["command"].is_null()),
        "no-op keys report no command"
    );
    let last = frames.last().unwrap().clone();
    assert_eq!(last["session"]["transport_state"], "live");
    assert_eq!(last["session"]["position_seconds"], 0.0);
}

#[test]
fn test_play_native_controls_ignore_keys() {
    let frames = Sandbox::new().json(&[
        "play",
        "m3",
        "--native-controls",
        "--keys",
        "right",
        "--key-interval-ms",
        "0",
    ]);
    let frames = frames.as_array().unwrap();
    assert_eq!(frames[1]["command"], serde_json::Value::Null);
    assert_eq!(frames[1]["session"]["controls_visible"], false);
}

#[test]
fn test_play_reads_keys_from_stdin() {
    let output = Sandbox::new()
        .cmd()
        .args(["--output", "plain", "play", "m3", "--key-interval-ms", "0"])
        .write_stdin("play-pause\n\nplay-pause\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "playing\npaused\nplaying\n"
    );
}

#[test]
fn test_play_rejects_unknown_key() {
    Sandbox::new()
        .cmd()
        .args(["play", "m3", "--keys", "menu"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown key 'menu'"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_without_file_uses_defaults() {
    Sandbox::new()
        .bare()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recent_count = 10"));
}

#[test]
fn test_config_init_then_show() {
    let sandbox = Sandbox::new();
    let path = sandbox.home().join("tvcast.toml");

    sandbox
        .bare()
        .arg("--config")
        .arg(&path)
        .args(["--feed-url", "https://feed.test/feed.json", "config", "init"])
        .assert()
        .success();
    assert!(path.exists());

    sandbox
        .bare()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://feed.test/feed.json"));

    sandbox
        .bare()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_path_honours_flag() {
    let sandbox = Sandbox::new();
    let path = sandbox.home().join("custom.toml");
    sandbox
        .bare()
        .arg("--config")
        .arg(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}
