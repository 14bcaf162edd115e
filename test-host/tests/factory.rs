mod common;

use clasp_common::version::ClapVersion;
use clasp_plugin::prelude::*;
use clasp_test_host::*;
use common::*;
use std::sync::atomic::Ordering;

fn probe_entry() -> TestEntry {
    TestEntry::load(&SinglePluginEntry::<ProbePlugin>::DESCRIPTOR).unwrap()
}

#[test]
pub fn descriptors_are_enumerable() {
    let entry = probe_entry();

    assert_eq!(entry.plugin_count(), 1);
    assert!(entry.descriptor(1).is_none());

    for _ in 0..2 {
        let descriptor = entry.descriptor(0).unwrap();
        assert_eq!(descriptor.id(), PROBE_ID);
        assert_eq!(descriptor.name(), c"Probe");
        assert_eq!(descriptor.vendor(), Some(c"clasp"));
        assert_eq!(descriptor.plugin_type(), PluginType::AUDIO_EFFECT);
    }

    assert_eq!(entry.descriptors().count(), 1);
}

#[test]
pub fn unknown_ids_create_nothing() {
    let entry = probe_entry();
    let host = TestHost::new(TestHostConfig::new()).unwrap();
    let _probe = register_probe(&host, Probe::default());

    assert!(matches!(
        entry.create(&host, c"org.clasp.test.missing"),
        Err(TestHostError::PluginCreationFailed)
    ));

    // SAFETY: the host is valid, and null IDs must be refused.
    let plugin = unsafe { entry.create_raw(host.as_raw(), core::ptr::null()) };
    assert!(plugin.is_null());

    unregister_probe(&host);
}

#[test]
pub fn null_hosts_create_nothing() {
    let entry = probe_entry();

    // SAFETY: null hosts must be refused.
    let plugin = unsafe { entry.create_raw(core::ptr::null(), PROBE_ID.as_ptr()) };
    assert!(plugin.is_null());
}

#[test]
pub fn incompatible_hosts_create_nothing() {
    let entry = probe_entry();
    let host = TestHost::new(TestHostConfig::new().with_clap_version(ClapVersion {
        major: 1,
        minor: 0,
        revision: 0,
    }))
    .unwrap();
    let _probe = register_probe(&host, Probe::default());

    assert!(entry.create(&host, PROBE_ID).is_err());
    unregister_probe(&host);
}

#[test]
pub fn older_minor_versions_are_compatible() {
    let host_config = TestHostConfig::new().with_clap_version(ClapVersion {
        major: 0,
        minor: 7,
        revision: 1,
    });

    let mut fixture = Fixture::new(host_config);
    assert!(fixture.instance.init());
}

#[test]
pub fn hosts_without_extension_lookup_create_nothing() {
    let entry = probe_entry();
    let host = TestHost::new(TestHostConfig::new()).unwrap();
    let _probe = register_probe(&host, Probe::default());

    let mut raw_host = *host.as_raw();
    raw_host.extension = None;

    // SAFETY: the raw host is valid, and must be refused.
    let plugin = unsafe { entry.create_raw(&raw_host, PROBE_ID.as_ptr()) };
    assert!(plugin.is_null());

    unregister_probe(&host);
}

#[test]
pub fn failing_constructors_create_nothing() {
    let entry = probe_entry();
    let host = TestHost::new(TestHostConfig::new()).unwrap();
    let probe = register_probe(&host, Probe::default());

    probe.fail_construction.store(true, Ordering::SeqCst);
    assert!(entry.create(&host, PROBE_ID).is_err());

    probe.fail_construction.store(false, Ordering::SeqCst);
    probe.panic_on_construction.store(true, Ordering::SeqCst);
    assert!(entry.create(&host, PROBE_ID).is_err());

    probe.panic_on_construction.store(false, Ordering::SeqCst);
    assert!(entry.create(&host, PROBE_ID).is_ok());

    unregister_probe(&host);
}

#[test]
pub fn instances_are_independent() {
    let mut first = Fixture::new(TestHostConfig::new());
    let mut second = Fixture::new(TestHostConfig::new());

    assert!(first.instance.init());
    assert!(second.instance.init());
    assert!(first.instance.activate(48_000));

    assert_eq!(first.instance.state(), ShadowState::Active);
    assert_eq!(second.instance.state(), ShadowState::Initialized);
    assert!(second.instance.activate(44_100));

    assert_eq!(Probe::count(&first.probe.last_sample_rate), 48_000);
    assert_eq!(Probe::count(&second.probe.last_sample_rate), 44_100);
}
