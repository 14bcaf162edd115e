mod common;

use clasp_plugin::ports::{AudioPortInfo, ChannelMap, audio_ports_structurally_equal};
use clasp_plugin::prelude::LogSeverity;
use clasp_test_host::*;
use common::*;
use std::sync::atomic::Ordering;

fn declared_outputs(count: u32) -> Vec<AudioPortInfo> {
    (0..count)
        .map(|id| {
            let mut port = AudioPortInfo::main(id, "Output", 2);
            port.is_main = id == 0;
            port
        })
        .collect()
}

/// Makes the probe request a redefinition of its ports, through a track info change.
fn request_redefinition(fixture: &Fixture) {
    fixture
        .host
        .set_track_info(Some(track("Bus", 2, ChannelMap::Stereo)));
    fixture.instance.notify_track_info_changed();
}

#[test]
pub fn declared_ports_are_reported_unchanged() {
    let mut fixture = Fixture::with_probe(TestHostConfig::new(), Probe::with_output_ports(3));
    assert!(fixture.instance.init());

    assert_eq!(
        fixture.instance.audio_ports(true),
        vec![AudioPortInfo::main(0, "Input", 2)]
    );
    assert_eq!(fixture.instance.audio_ports(false), declared_outputs(3));
}

#[test]
pub fn out_of_range_ports_are_not_found() {
    let mut fixture = Fixture::with_probe(TestHostConfig::new(), Probe::with_output_ports(2));
    assert!(fixture.instance.init());

    let audio_ports = fixture
        .instance
        .get_extension::<clasp_plugin::extensions::audio_ports::PluginAudioPorts>()
        .unwrap();

    // SAFETY: the instance is alive, and this is the main thread.
    unsafe {
        assert_eq!(audio_ports.count(false), 2);
        assert!(audio_ports.get(2, false).is_none());
        assert!(audio_ports.get(1, true).is_none());
        assert!(audio_ports.get(u32::MAX, false).is_none());
    }
}

#[test]
pub fn port_changes_while_active_are_deferred_until_deactivation() {
    let mut fixture = Fixture::processing(TestHostConfig::new());

    fixture.probe.output_port_count.store(2, Ordering::SeqCst);
    request_redefinition(&fixture);

    assert_eq!(fixture.host.audio_ports_invalidations(), 0);
    assert_eq!(fixture.instance.audio_ports(false), declared_outputs(1));

    assert!(fixture.instance.process(32).is_ok());
    fixture.instance.stop_processing();
    assert_eq!(fixture.host.audio_ports_invalidations(), 0);

    fixture.instance.deactivate();

    assert_eq!(fixture.host.audio_ports_invalidations(), 1);
    assert_eq!(fixture.instance.audio_ports(false), declared_outputs(2));
    assert_eq!(fixture.host.audio_ports_invalidations(), 1);
}

#[test]
pub fn repeated_requests_while_active_are_signaled_once() {
    let mut fixture = Fixture::processing(TestHostConfig::new());

    fixture.probe.output_port_count.store(3, Ordering::SeqCst);
    request_redefinition(&fixture);
    request_redefinition(&fixture);
    fixture.instance.notify_track_info_changed();

    fixture.instance.stop_processing();
    fixture.instance.deactivate();
    assert!(fixture.instance.activate(48_000));
    fixture.instance.deactivate();

    assert_eq!(fixture.host.audio_ports_invalidations(), 1);
    assert_eq!(
        fixture.host.count_calls(HostCall::AudioPortsInvalidated),
        1
    );
}

#[test]
pub fn unchanged_definitions_are_not_signaled() {
    let mut fixture = Fixture::processing(TestHostConfig::new());

    request_redefinition(&fixture);
    fixture.instance.deactivate();

    assert_eq!(fixture.host.audio_ports_invalidations(), 0);
}

#[test]
pub fn port_changes_while_inactive_are_signaled_immediately() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    assert!(fixture.instance.init());

    fixture.probe.output_port_count.store(4, Ordering::SeqCst);
    request_redefinition(&fixture);

    assert_eq!(fixture.host.audio_ports_invalidations(), 1);
    assert_eq!(fixture.instance.audio_ports(false), declared_outputs(4));
}

#[test]
pub fn port_changes_without_host_support_are_only_logged() {
    let mut fixture = Fixture::new(TestHostConfig::new().with_audio_ports(false));
    assert!(fixture.instance.init());

    fixture.probe.output_port_count.store(2, Ordering::SeqCst);
    request_redefinition(&fixture);

    assert_eq!(fixture.host.audio_ports_invalidations(), 0);
    assert_eq!(fixture.instance.audio_ports(false), declared_outputs(2));
    assert_eq!(
        fixture.host.messages_with_severity(LogSeverity::Warning).len(),
        1
    );
}

#[test]
pub fn only_structural_fields_matter_for_equality() {
    let ports = vec![
        AudioPortInfo::main(0, "Main", 2),
        AudioPortInfo::main(1, "Sidechain", 1),
    ];

    let mut renamed = ports.clone();
    renamed[0].name = "Renamed".into();
    renamed[1].is_main = false;
    renamed[1].in_place = true;
    assert!(audio_ports_structurally_equal(&ports, &renamed));

    let mut other_id = ports.clone();
    other_id[1].id = 2;
    assert!(!audio_ports_structurally_equal(&ports, &other_id));

    let mut other_channels = ports.clone();
    other_channels[0].channel_count = 6;
    assert!(!audio_ports_structurally_equal(&ports, &other_channels));

    let mut other_map = ports.clone();
    other_map[0].channel_map = ChannelMap::Surround;
    assert!(!audio_ports_structurally_equal(&ports, &other_map));

    assert!(!audio_ports_structurally_equal(&ports, &ports[..1]));
}
