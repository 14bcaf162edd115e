mod common;

use clasp_plugin::ports::ChannelMap;
use clasp_test_host::*;
use common::*;

fn observed(name: Option<&str>, channel_count: u32, channel_map: ChannelMap) -> ObservedTrack {
    ObservedTrack {
        name: name.map(Into::into),
        channel_count,
        channel_map,
    }
}

#[test]
pub fn track_info_is_fetched_on_init() {
    let config = TestHostConfig::new().with_track_info(Some(track("Drums", 1, ChannelMap::Mono)));
    let mut fixture = Fixture::new(config);

    assert!(fixture.instance.init());

    assert_eq!(
        fixture.probe.observed_tracks(),
        vec![observed(Some("Drums"), 1, ChannelMap::Mono)]
    );
    assert_eq!(fixture.host.count_calls(HostCall::TrackInfoQueried), 1);
}

#[test]
pub fn missing_track_info_falls_back_to_stereo() {
    let mut fixture = Fixture::new(TestHostConfig::new().without_track_info());
    assert!(fixture.instance.init());

    assert_eq!(
        fixture.probe.observed_tracks(),
        vec![observed(None, 2, ChannelMap::Stereo)]
    );
    assert_eq!(fixture.host.count_calls(HostCall::TrackInfoQueried), 0);
}

#[test]
pub fn changes_replace_the_cached_track_info() {
    let config = TestHostConfig::new().with_track_info(Some(track("Bass", 2, ChannelMap::Stereo)));
    let mut fixture = Fixture::new(config);
    assert!(fixture.instance.init());

    fixture
        .host
        .set_track_info(Some(track("Surround bus", 6, ChannelMap::Surround)));
    fixture.instance.notify_track_info_changed();

    // Nothing is fetched unless the host says something changed.
    fixture
        .host
        .set_track_info(Some(track("Ignored", 1, ChannelMap::Mono)));

    assert_eq!(
        fixture.probe.observed_tracks(),
        vec![
            observed(Some("Bass"), 2, ChannelMap::Stereo),
            observed(Some("Surround bus"), 6, ChannelMap::Surround),
        ]
    );
    assert_eq!(fixture.host.count_calls(HostCall::TrackInfoQueried), 2);
}

#[test]
pub fn failed_fetches_clear_the_cached_track_info() {
    let config = TestHostConfig::new().with_track_info(Some(track("Keys", 1, ChannelMap::Mono)));
    let mut fixture = Fixture::new(config);
    assert!(fixture.instance.init());

    fixture.host.set_track_info(None);
    fixture.instance.notify_track_info_changed();

    assert_eq!(
        fixture.probe.observed_tracks(),
        vec![
            observed(Some("Keys"), 1, ChannelMap::Mono),
            observed(None, 2, ChannelMap::Stereo),
        ]
    );
}

#[test]
pub fn changes_are_refused_before_init() {
    let mut fixture = Fixture::new(TestHostConfig::new());

    fixture.instance.notify_track_info_changed();

    assert!(fixture.probe.observed_tracks().is_empty());
    assert_eq!(fixture.host.count_calls(HostCall::TrackInfoQueried), 0);

    // Host capabilities are unknown until init, so this is only reported on stderr.
    assert!(fixture.host.logs().is_empty());

    assert!(fixture.instance.init());
}
