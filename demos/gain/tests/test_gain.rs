use clasp_extensions::event_filter::PluginEventFilter;
use clasp_extensions::latency::PluginLatency;
use clasp_extensions::params::PluginParams;
use clasp_extensions::render::{PluginRender, RenderMode};
use clasp_extensions::state::PluginState;
use clasp_plugin::events::Event;
use clasp_plugin::events::event_types::{NoteOnEvent, ParamValueEvent};
use clasp_plugin::events::io::EventBuffer;
use clasp_plugin::prelude::*;
use clasp_plugin::track_info::TrackInfo;
use clasp_plugin::utils::{Color, Cookie};
use clasp_test_host::{TestEntry, TestHost, TestHostConfig, TestInstance};
use gain::{GAIN_PARAM_ID, clap_plugin_entry};

const GAIN_ID: &std::ffi::CStr = c"org.clasp.gain";

struct Setup {
    instance: TestInstance,
    host: TestHost,
    _entry: TestEntry,
}

fn setup(config: TestHostConfig) -> Setup {
    let entry = TestEntry::load(&clap_plugin_entry).unwrap();
    let host = TestHost::new(config).unwrap();
    let mut instance = entry.create(&host, GAIN_ID).unwrap();
    assert!(instance.init());

    Setup {
        instance,
        host,
        _entry: entry,
    }
}

fn gain_change(value: f64) -> EventBuffer {
    let mut buffer = EventBuffer::new();
    buffer.push_event(&ParamValueEvent::new(0, GAIN_PARAM_ID, value, Cookie::empty()));
    buffer
}

/// Flushes the given gain change while the plugin is inactive.
fn flush_gain(instance: &TestInstance, value: f64) {
    let params = instance.get_extension::<PluginParams>().unwrap();
    let input = gain_change(value);
    let mut output = EventBuffer::new();

    // SAFETY: the instance is alive and inactive, and this is the main thread.
    unsafe {
        params.flush(
            &InputEvents::from_buffer(&input),
            &OutputEvents::from_buffer(&mut output),
        )
    };
}

fn gain_value(instance: &TestInstance) -> Option<f64> {
    let params = instance.get_extension::<PluginParams>().unwrap();
    // SAFETY: the instance is alive, and this is the main thread.
    unsafe { params.get_value(GAIN_PARAM_ID) }
}

#[test]
pub fn it_works() {
    let entry = TestEntry::load(&clap_plugin_entry).unwrap();
    let descriptor = entry.descriptor(0).unwrap();
    assert_eq!(descriptor.id(), GAIN_ID);
    assert_eq!(descriptor.name(), c"Clasp Gain");

    let mut setup = setup(TestHostConfig::new());
    let instance = &mut setup.instance;

    assert!(instance.activate(44_100));
    assert!(instance.start_processing());

    for channel in 0..2 {
        instance.input_channel_mut(0, channel).unwrap().fill(0.5);
    }

    assert_eq!(instance.process(32).unwrap(), ProcessStatus::Continue);
    for channel in 0..2 {
        assert!(instance.output_channel(0, channel).unwrap()[..32].iter().all(|s| *s == 0.5));
    }

    // Gain changes apply from the next block on.
    instance
        .input_events_mut()
        .push_event(&ParamValueEvent::new(0, GAIN_PARAM_ID, 2.0, Cookie::empty()));
    instance.process(32).unwrap();

    for channel in 0..2 {
        assert!(instance.output_channel(0, channel).unwrap()[..32].iter().all(|s| *s == 1.0));
    }

    instance.stop_processing();
    instance.deactivate();

    assert_eq!(gain_value(&setup.instance), Some(2.0));
}

#[test]
pub fn parameters_are_described_and_displayed() {
    let setup = setup(TestHostConfig::new());
    let params = setup.instance.get_extension::<PluginParams>().unwrap();

    // SAFETY: the instance is alive, and this is the main thread.
    unsafe {
        assert_eq!(params.count(), 1);

        let info = params.get_info(0).unwrap();
        assert_eq!(info.id(), GAIN_PARAM_ID);
        assert_eq!(info.name(), b"Gain");
        assert_eq!(info.max_value(), 2.0);
        assert_eq!(info.default_value(), 1.0);
        assert!(params.get_info(1).is_none());

        assert_eq!(
            params.value_to_text(GAIN_PARAM_ID, 1.5, 64).unwrap().as_c_str(),
            c"1.50x"
        );
        // The text doesn't fit.
        assert!(params.value_to_text(GAIN_PARAM_ID, 1.5, 3).is_none());
        assert!(params.value_to_text(42, 1.5, 64).is_none());

        assert_eq!(params.text_to_value(GAIN_PARAM_ID, c"0.25x"), Some(0.25));
        assert_eq!(params.text_to_value(GAIN_PARAM_ID, c"12x"), None);
        assert_eq!(params.text_to_value(GAIN_PARAM_ID, c"loud"), None);
    }

    assert_eq!(gain_value(&setup.instance), Some(1.0));
    flush_gain(&setup.instance, 0.75);
    assert_eq!(gain_value(&setup.instance), Some(0.75));
}

#[test]
pub fn state_is_saved_and_restored() {
    let setup = setup(TestHostConfig::new());
    let state = setup.instance.get_extension::<PluginState>().unwrap();

    flush_gain(&setup.instance, 1.25);

    let mut saved = Vec::new();
    // SAFETY: the instance is alive, and this is the main thread.
    unsafe { state.save(&mut saved) }.unwrap();
    assert_eq!(saved, 1.25f64.to_le_bytes());

    flush_gain(&setup.instance, 0.0);
    assert_eq!(gain_value(&setup.instance), Some(0.0));

    // SAFETY: the instance is alive, and this is the main thread.
    unsafe { state.load(&mut saved.as_slice()) }.unwrap();
    assert_eq!(gain_value(&setup.instance), Some(1.25));

    // SAFETY: same as above
    unsafe {
        let truncated = state.load(&mut &saved[..3]).unwrap_err();
        assert!(!truncated.is_saving());
        assert!(state.load(&mut 9.0f64.to_le_bytes().as_slice()).is_err());
    }
    assert_eq!(gain_value(&setup.instance), Some(1.25));
    assert_eq!(setup.host.messages_with_severity(LogSeverity::Error).len(), 2);
}

#[test]
pub fn only_parameter_changes_are_accepted() {
    let setup = setup(TestHostConfig::new());
    let event_filter = setup.instance.get_extension::<PluginEventFilter>().unwrap();
    let latency = setup.instance.get_extension::<PluginLatency>().unwrap();

    // SAFETY: the instance is alive, and this is the main thread.
    unsafe {
        assert!(event_filter.accepts(ParamValueEvent::TYPE_ID));
        assert!(!event_filter.accepts(NoteOnEvent::TYPE_ID));
        assert_eq!(latency.get(), 0);
    }
}

#[test]
pub fn render_mode_changes_are_logged_once() {
    let setup = setup(TestHostConfig::new());
    let render = setup.instance.get_extension::<PluginRender>().unwrap();

    // SAFETY: the instance is alive, and this is the main thread.
    unsafe {
        render.set(RenderMode::Offline);
        render.set(RenderMode::Offline);
        render.set(RenderMode::Realtime);
    }

    assert_eq!(
        setup.host.messages_with_severity(LogSeverity::Debug),
        vec![
            "Render mode set to Offline".to_string(),
            "Render mode set to Realtime".to_string()
        ]
    );
}

#[test]
pub fn ports_follow_the_track_channels() {
    let track = |channel_count, channel_map| TrackInfo {
        id: 1,
        index: 0,
        name: "Track".into(),
        path: "/Track".into(),
        channel_count,
        channel_map,
        color: Color::TRANSPARENT,
        is_return_track: false,
    };

    let config = TestHostConfig::new().with_track_info(Some(track(1, ChannelMap::Mono)));
    let setup = setup(config);
    assert_eq!(setup.instance.audio_ports(true)[0].channel_count, 1);

    setup.host.set_track_info(Some(track(6, ChannelMap::Surround)));
    setup.instance.notify_track_info_changed();

    assert_eq!(setup.host.audio_ports_invalidations(), 1);
    assert_eq!(setup.instance.audio_ports(true)[0].channel_count, 6);
    assert_eq!(setup.instance.audio_ports(false)[0].channel_count, 6);

    // Same channels, nothing to re-define.
    setup.instance.notify_track_info_changed();
    assert_eq!(setup.host.audio_ports_invalidations(), 1);
}
