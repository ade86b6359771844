//! End-to-end tests driving `VolumeController` through a scripted runner.

use std::{fs, path::PathBuf, time::Duration};

use svol::{
    Error, NotifyCache, Outcome, Settings, SkipReason, VolumeController,
    exec::{Captured, MockRunner},
    render::MUTED_TEXT,
    test_support::unique_tmp_dir,
};
use time::OffsetDateTime;

/// Default mixer program.
const MIXER: &str = "amixer";
/// Default notifier program.
const NOTIFIER: &str = "notify-send.sh";

/// Settings whose cache lives in a fresh temp dir that does not exist yet.
fn test_settings(name: &str) -> (Settings, PathBuf) {
    let dir = unique_tmp_dir(name);
    let settings = Settings {
        cache_path: dir.join("cache").join("notify_id"),
        ..Settings::default()
    };
    (settings, dir)
}

/// Mixer report as printed by `amixer sset Master ...`.
fn report(percent: u8, switch: &str) -> String {
    format!(
        "Simple mixer control 'Master',0\n  \
         Capabilities: pvolume pswitch pswitch-joined\n  \
         Playback channels: Front Left - Front Right\n  \
         Limits: Playback 0 - 87\n  \
         Mono:\n  \
         Front Left: Playback 48 [{percent}%] [-14.25dB] [{switch}]\n  \
         Front Right: Playback 48 [{percent}%] [-14.25dB] [{switch}]\n"
    )
}

#[test]
fn raise_with_empty_cache_notifies_and_stores_id() {
    let (settings, dir) = test_settings("up");
    let cache_path = settings.cache_path.clone();
    let mock = MockRunner::new();
    mock.push(MIXER, Captured::ok(report(55, "on")))
        .push(NOTIFIER, Captured::ok("101\n"));
    let controller = VolumeController::new(&mock, settings);

    let outcome = controller.raise(5).unwrap();
    assert!(matches!(
        outcome,
        Outcome::Notified { ref id, replaced: false } if id == "101"
    ));

    let mixer_calls = mock.calls_to(MIXER);
    assert_eq!(mixer_calls.len(), 1);
    assert_eq!(mixer_calls[0].args, vec!["sset", "Master", "5%+"]);

    let notify_calls = mock.calls_to(NOTIFIER);
    assert_eq!(notify_calls.len(), 1);
    let args = &notify_calls[0].args;
    let bar = format!("[{}{}]", "=".repeat(20), " ".repeat(17));
    assert_eq!(args, &vec!["-p", "-t", "3000", "Volume:", bar.as_str()]);
    assert!(!args.contains(&"-r".to_string()));

    assert!(cache_path.exists());
    assert_eq!(controller.cache().read().unwrap().id, "101");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn toggle_to_muted_replaces_fresh_popup() {
    let (settings, dir) = test_settings("toggle");
    NotifyCache::new(&settings.cache_path, settings.freshness_window())
        .write("77")
        .unwrap();
    let mock = MockRunner::new();
    mock.push(MIXER, Captured::ok(report(55, "off")))
        .push(NOTIFIER, Captured::ok("77\n"));
    let controller = VolumeController::new(&mock, settings);

    let outcome = controller.toggle_mute().unwrap();
    assert!(matches!(outcome, Outcome::Notified { replaced: true, .. }));

    assert_eq!(mock.calls_to(MIXER)[0].args, vec!["sset", "Master", "toggle"]);
    let args = &mock.calls_to(NOTIFIER)[0].args;
    assert_eq!(args[4], format!("{MUTED_TEXT:^37}"));
    assert_eq!(&args[5..], ["-r", "77"]);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn stale_cached_id_is_not_reused() {
    let (settings, dir) = test_settings("stale");
    let window = settings.freshness_window();
    let issued = OffsetDateTime::now_utc() - Duration::from_secs(60);
    NotifyCache::new(&settings.cache_path, window)
        .write_at("5", issued)
        .unwrap();
    let mock = MockRunner::new();
    mock.push(MIXER, Captured::ok(report(30, "on")))
        .push(NOTIFIER, Captured::ok("6\n"));
    let controller = VolumeController::new(&mock, settings);

    let outcome = controller.lower(10).unwrap();
    assert!(matches!(outcome, Outcome::Notified { replaced: false, .. }));
    assert_eq!(mock.calls_to(MIXER)[0].args[2], "10%-");
    assert_eq!(mock.calls_to(NOTIFIER)[0].args.len(), 5);
    assert_eq!(controller.cache().read().unwrap().id, "6");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn mixer_failure_is_fatal_and_skips_notification() {
    let (settings, dir) = test_settings("mixer-fail");
    let cache_path = settings.cache_path.clone();
    let mock = MockRunner::new();
    mock.push(
        MIXER,
        Captured::failed(1, "amixer: Unable to find simple control 'Master',0\n"),
    );
    let controller = VolumeController::new(&mock, settings);

    let err = controller.unmute().unwrap_err();
    assert!(matches!(err, Error::MixerFailed { code: Some(1), .. }));
    assert!(err.to_string().contains("Unable to find simple control"));
    assert!(mock.calls_to(NOTIFIER).is_empty());
    assert!(!cache_path.exists());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn unparseable_report_succeeds_without_notification() {
    let (settings, dir) = test_settings("unparsed");
    let mock = MockRunner::new();
    mock.push(MIXER, Captured::ok("Simple mixer control 'Master',0\n"));
    let controller = VolumeController::new(&mock, settings);

    let outcome = controller.mute().unwrap();
    assert!(matches!(outcome, Outcome::Skipped(SkipReason::Unparsed(_))));
    assert!(mock.calls_to(NOTIFIER).is_empty());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn notifier_failure_is_not_an_error() {
    let (settings, dir) = test_settings("notify-fail");
    let cache_path = settings.cache_path.clone();
    let mock = MockRunner::new();
    mock.push(MIXER, Captured::ok(report(80, "on")));
    let controller = VolumeController::new(&mock, settings);

    let outcome = controller.raise(1).unwrap();
    assert!(matches!(outcome, Outcome::NotifyFailed(_)));
    assert_eq!(mock.calls_to(NOTIFIER).len(), 1);
    assert!(!cache_path.exists());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn unwritable_cache_does_not_fail_operation() {
    let (mut settings, dir) = test_settings("cache-unwritable");
    // A regular file where the cache directory should be.
    let blocker = dir.join("blocker");
    fs::write(&blocker, "").unwrap();
    settings.cache_path = blocker.join("notify_id");
    let mock = MockRunner::new();
    mock.push(MIXER, Captured::ok(report(10, "on")))
        .push(NOTIFIER, Captured::ok("9\n"));
    let controller = VolumeController::new(&mock, settings);

    let outcome = controller.raise(2).unwrap();
    assert!(matches!(outcome, Outcome::Notified { ref id, .. } if id == "9"));
    assert!(controller.cache().read().is_none());
    fs::remove_dir_all(&dir).ok();
}
