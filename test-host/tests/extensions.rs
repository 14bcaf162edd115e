mod common;

use clasp_sys::ext::audio_ports::CLAP_EXT_AUDIO_PORTS;
use clasp_sys::ext::state::CLAP_EXT_STATE;
use clasp_sys::ext::thread_pool::CLAP_EXT_THREAD_POOL;
use clasp_sys::ext::track_info::CLAP_EXT_TRACK_INFO;
use clasp_test_host::*;
use common::*;
use std::ffi::CStr;

const CORE_EXTENSIONS: [&CStr; 3] = [CLAP_EXT_AUDIO_PORTS, CLAP_EXT_TRACK_INFO, CLAP_EXT_THREAD_POOL];
const MISSING_EXTENSIONS: [&CStr; 4] = [
    CLAP_EXT_STATE,
    c"clap/unknown",
    c"clap/audio-ports-but-longer",
    c"",
];

fn check_extensions(instance: &TestInstance) {
    for id in CORE_EXTENSIONS {
        assert!(instance.has_extension(id), "{id:?} should be available");
    }

    for id in MISSING_EXTENSIONS {
        assert!(!instance.has_extension(id), "{id:?} shouldn't be available");
    }

    assert!(instance.extension_ptr(core::ptr::null()).is_null());
}

#[test]
pub fn unknown_and_null_ids_are_never_found() {
    let mut fixture = Fixture::new(TestHostConfig::new());

    check_extensions(&fixture.instance);
    assert!(fixture.instance.init());
    check_extensions(&fixture.instance);
    assert!(fixture.instance.activate(48_000));
    check_extensions(&fixture.instance);
    assert!(fixture.instance.start_processing());
    check_extensions(&fixture.instance);
}

#[test]
pub fn extension_lookups_are_stable() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    let ids = CORE_EXTENSIONS.iter().chain(&MISSING_EXTENSIONS);

    let before_init: Vec<_> = ids
        .clone()
        .map(|id| fixture.instance.extension_ptr(id.as_ptr()))
        .collect();

    assert!(fixture.instance.init());
    assert!(fixture.instance.activate(44_100));

    for _ in 0..3 {
        let current: Vec<_> = ids
            .clone()
            .map(|id| fixture.instance.extension_ptr(id.as_ptr()))
            .collect();

        assert_eq!(current, before_init);
    }
}

#[test]
pub fn extension_lookups_work_from_any_thread() {
    let mut fixture = Fixture::new(TestHostConfig::new());
    assert!(fixture.instance.init());
    let expected = fixture.instance.extension_ptr(CLAP_EXT_AUDIO_PORTS.as_ptr()).addr();

    let instance = &mut fixture.instance;
    let from_other_thread = std::thread::scope(|s| {
        s.spawn(move || instance.extension_ptr(CLAP_EXT_AUDIO_PORTS.as_ptr()).addr())
            .join()
            .unwrap()
    });

    assert_eq!(from_other_thread, expected);
    assert!(fixture.host_misbehaving_messages().is_empty());
}
