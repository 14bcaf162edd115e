mod common;

use clasp_plugin::prelude::*;
use clasp_test_host::*;
use common::*;
use std::sync::atomic::Ordering;

fn protocol_violations(host: &TestHost) -> Vec<LogEntry> {
    host.logs()
        .into_iter()
        .filter(|e| {
            matches!(
                e.severity,
                Some(LogSeverity::HostMisbehaving | LogSeverity::PluginMisbehaving)
            )
        })
        .collect()
}

#[test]
pub fn full_lifecycle_runs_without_violations() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    let instance = &mut fixture.instance;

    assert!(instance.init());
    assert_eq!(instance.state(), ShadowState::Initialized);
    assert!(instance.activate(48_000));
    assert!(instance.start_processing());
    assert_eq!(instance.state(), ShadowState::Processing);

    assert_eq!(instance.process(64).unwrap(), ProcessStatus::Continue);

    instance.stop_processing();
    instance.deactivate();

    let host = fixture.host.clone();
    let probe = fixture.probe.clone();
    drop(fixture);

    assert_eq!(Probe::count(&probe.activations), 1);
    assert_eq!(Probe::count(&probe.last_sample_rate), 48_000);
    assert_eq!(Probe::count(&probe.starts), 1);
    assert_eq!(Probe::count(&probe.process_calls), 1);
    assert_eq!(Probe::count(&probe.stops), 1);
    assert_eq!(Probe::count(&probe.deactivations), 1);
    assert_eq!(protocol_violations(&host), vec![]);
}

#[test]
pub fn process_without_start_processing_is_refused() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    assert!(fixture.instance.init());
    assert!(fixture.instance.activate(48_000));

    let result = fixture.instance.process(64);

    assert!(matches!(
        result,
        Err(TestHostError::OutOfOrder {
            method: "process",
            state: ShadowState::Active
        })
    ));
    assert_eq!(Probe::count(&fixture.probe.process_calls), 0);
    assert_eq!(fixture.host_misbehaving_messages().len(), 1);
}

#[test]
pub fn process_is_only_reached_while_processing() {
    let mut fixture = Fixture::new(TestHostConfig::new());

    // Created, Initialized, Active, then stopped again.
    assert!(fixture.instance.process(16).is_err());
    assert!(fixture.instance.init());
    assert!(fixture.instance.process(16).is_err());
    assert!(fixture.instance.activate(44_100));
    assert!(fixture.instance.process(16).is_err());
    assert!(fixture.instance.start_processing());
    assert!(fixture.instance.process(16).is_ok());
    fixture.instance.stop_processing();
    assert!(fixture.instance.process(16).is_err());

    assert_eq!(Probe::count(&fixture.probe.process_calls), 1);
}

#[test]
pub fn null_process_block_is_an_error() {
    let mut fixture = Fixture::processing(TestHostConfig::new());

    assert_eq!(
        fixture.instance.process_null(),
        clasp_sys::process::CLAP_PROCESS_ERROR
    );
    assert_eq!(Probe::count(&fixture.probe.process_calls), 0);
}

#[test]
pub fn init_only_succeeds_once() {
    let mut fixture = Fixture::new(TestHostConfig::new());

    assert!(fixture.instance.init());
    assert!(!fixture.instance.init());

    let messages = fixture.host_misbehaving_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("init"));
}

#[test]
pub fn activate_requires_init() {
    let mut fixture = Fixture::new(TestHostConfig::new());

    assert!(!fixture.instance.activate(48_000));
    assert_eq!(fixture.instance.state(), ShadowState::Created);
    assert_eq!(Probe::count(&fixture.probe.activations), 0);
}

#[test]
pub fn non_positive_sample_rates_are_rejected() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    assert!(fixture.instance.init());

    assert!(!fixture.instance.activate(0));
    assert!(!fixture.instance.activate(-44_100));
    assert_eq!(Probe::count(&fixture.probe.activations), 0);

    assert!(fixture.instance.activate(96_000));
    assert_eq!(Probe::count(&fixture.probe.last_sample_rate), 96_000);
}

#[test]
pub fn activate_while_active_is_rejected() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    assert!(fixture.instance.init());
    assert!(fixture.instance.activate(48_000));

    assert!(!fixture.instance.activate(96_000));

    assert_eq!(fixture.instance.state(), ShadowState::Active);
    assert_eq!(Probe::count(&fixture.probe.activations), 1);
    assert_eq!(Probe::count(&fixture.probe.last_sample_rate), 48_000);
    assert_eq!(fixture.host_misbehaving_messages().len(), 1);
}

#[test]
pub fn instance_can_be_reactivated() {
    let mut fixture = Fixture::processing(TestHostConfig::new());

    fixture.instance.stop_processing();
    fixture.instance.deactivate();
    assert!(fixture.instance.activate(44_100));
    assert!(fixture.instance.start_processing());
    assert!(fixture.instance.process(32).is_ok());

    assert_eq!(Probe::count(&fixture.probe.activations), 2);
    assert_eq!(Probe::count(&fixture.probe.deactivations), 1);
    assert_eq!(protocol_violations(&fixture.host), vec![]);
}

#[test]
pub fn deactivate_while_processing_stops_processing_first() {
    let mut fixture = Fixture::processing(TestHostConfig::new());

    fixture.instance.deactivate();

    assert_eq!(Probe::count(&fixture.probe.stops), 1);
    assert_eq!(Probe::count(&fixture.probe.deactivations), 1);
    assert_eq!(fixture.host_misbehaving_messages().len(), 1);
}

#[test]
pub fn start_processing_requires_activation() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    assert!(fixture.instance.init());

    assert!(!fixture.instance.start_processing());
    assert_eq!(Probe::count(&fixture.probe.starts), 0);
}

#[test]
pub fn stop_processing_while_idle_is_ignored() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    assert!(fixture.instance.init());
    assert!(fixture.instance.activate(48_000));

    fixture.instance.stop_processing();

    assert_eq!(Probe::count(&fixture.probe.stops), 0);
    assert_eq!(fixture.host_misbehaving_messages().len(), 1);
}

#[test]
pub fn destroy_forces_stop_and_deactivate() {
    let host = TestHost::new(TestHostConfig::new()).unwrap();
    let probe = register_probe(&host, Probe::with_output_ports(1));
    let entry = TestEntry::load(&SinglePluginEntry::<ProbePlugin>::DESCRIPTOR).unwrap();

    let mut instance = entry.create(&host, PROBE_ID).unwrap();
    assert!(instance.init());
    assert!(instance.activate(48_000));
    assert!(instance.start_processing());

    instance.destroy();

    assert_eq!(Probe::count(&probe.stops), 1);
    assert_eq!(Probe::count(&probe.deactivations), 1);
    unregister_probe(&host);
}

#[test]
pub fn works_without_any_host_extension() {
    let mut fixture = Fixture::new(TestHostConfig::minimal());

    assert!(fixture.instance.init());
    assert!(fixture.instance.activate(48_000));
    assert!(fixture.instance.start_processing());
    assert_eq!(fixture.instance.process(64).unwrap(), ProcessStatus::Continue);

    // Violations go to stderr when the host can't log.
    assert!(!fixture.instance.init());
    assert!(fixture.host.logs().is_empty());
}

#[test]
pub fn failed_activation_leaves_the_plugin_inactive() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    assert!(fixture.instance.init());
    fixture.probe.fail_activate.store(true, Ordering::SeqCst);

    assert!(!fixture.instance.activate(48_000));
    assert_eq!(fixture.instance.state(), ShadowState::Initialized);
    assert_eq!(
        fixture.host.messages_with_severity(LogSeverity::Error),
        vec!["Probe activation failed".to_string()]
    );

    // Nothing to start while inactive.
    assert!(!fixture.instance.start_processing());

    fixture.probe.fail_activate.store(false, Ordering::SeqCst);
    assert!(fixture.instance.activate(44_100));
    assert_eq!(Probe::count(&fixture.probe.activations), 1);
    assert_eq!(Probe::count(&fixture.probe.last_sample_rate), 44_100);
}

#[test]
pub fn failed_start_processing_stays_idle() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    assert!(fixture.instance.init());
    assert!(fixture.instance.activate(48_000));
    fixture.probe.fail_start_processing.store(true, Ordering::SeqCst);

    assert!(!fixture.instance.start_processing());
    assert_eq!(fixture.instance.state(), ShadowState::Active);

    assert!(matches!(
        fixture.instance.process(64),
        Err(TestHostError::OutOfOrder {
            method: "process",
            state: ShadowState::Active
        })
    ));
    assert_eq!(Probe::count(&fixture.probe.process_calls), 0);

    fixture.probe.fail_start_processing.store(false, Ordering::SeqCst);
    assert!(fixture.instance.start_processing());
    assert_eq!(fixture.instance.process(64).unwrap(), ProcessStatus::Continue);
}

#[test]
pub fn failed_init_leaves_the_instance_destroyable() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    fixture.probe.fail_init.store(true, Ordering::SeqCst);

    assert!(!fixture.instance.init());
    assert_eq!(fixture.instance.state(), ShadowState::Created);
    assert!(!fixture.instance.activate(48_000));

    let host = fixture.host.clone();
    let probe = fixture.probe.clone();
    drop(fixture);

    assert_eq!(Probe::count(&probe.activations), 0);
    assert_eq!(
        host.messages_with_severity(LogSeverity::Error),
        vec!["Probe init failed".to_string()]
    );
    assert!(host.messages_with_severity(LogSeverity::PluginMisbehaving).is_empty());
}

#[test]
pub fn panics_while_destroying_are_reported() {
    let host = TestHost::new(TestHostConfig::new()).unwrap();
    let probe = register_probe(&host, Probe::with_output_ports(1));
    let entry = TestEntry::load(&SinglePluginEntry::<ProbePlugin>::DESCRIPTOR).unwrap();

    let mut instance = entry.create(&host, PROBE_ID).unwrap();
    assert!(instance.init());
    assert!(instance.activate(48_000));
    probe.panic_on_deactivate.store(true, Ordering::SeqCst);

    instance.destroy();

    assert_eq!(Probe::count(&probe.deactivations), 1);
    assert_eq!(
        host.messages_with_severity(LogSeverity::PluginMisbehaving),
        vec!["Plugin panicked".to_string()]
    );
    unregister_probe(&host);
}
