#![allow(dead_code)]

use clasp_plugin::prelude::*;
use clasp_plugin::track_info::TrackInfo;
use clasp_test_host::*;
use std::ffi::CStr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::ThreadId;

pub const PROBE_ID: &CStr = c"org.clasp.test.probe";

/// What a probe plugin observed, shared with the test that drives it.
#[derive(Default)]
pub struct Probe {
    pub fail_construction: AtomicBool,
    pub panic_on_construction: AtomicBool,
    pub fail_init: AtomicBool,
    pub fail_activate: AtomicBool,
    pub fail_start_processing: AtomicBool,
    pub panic_on_deactivate: AtomicBool,
    pub output_port_count: AtomicU32,
    pub tasks_per_block: AtomicU32,

    pub activations: AtomicU32,
    pub deactivations: AtomicU32,
    pub last_sample_rate: AtomicU32,
    pub starts: AtomicU32,
    pub stops: AtomicU32,
    pub process_calls: AtomicU32,
    pub last_tasks: Mutex<Option<TaskReport>>,
    pub observed_tracks: Mutex<Vec<ObservedTrack>>,
}

impl Probe {
    pub fn with_output_ports(count: u32) -> Self {
        let probe = Self::default();
        probe.output_port_count.store(count, Ordering::SeqCst);
        probe
    }

    #[inline]
    pub fn count(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }

    pub fn last_tasks(&self) -> Option<TaskReport> {
        lock(&self.last_tasks).clone()
    }

    pub fn observed_tracks(&self) -> Vec<ObservedTrack> {
        lock(&self.observed_tracks).clone()
    }

    fn observe_track(&self, host: &HostMainThreadHandle) {
        lock(&self.observed_tracks).push(ObservedTrack {
            name: host.track_info().map(|t| t.name.clone()),
            channel_count: host.track_channel_count(),
            channel_map: host.track_channel_map(),
        });
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObservedTrack {
    pub name: Option<String>,
    pub channel_count: u32,
    pub channel_map: ChannelMap,
}

/// How the tasks of the last processed block were run.
#[derive(Clone, Debug)]
pub struct TaskReport {
    pub execution: TaskExecution,
    /// How many times each task index ran, as seen right after `run_tasks` returned.
    pub runs: Vec<u32>,
    /// How many tasks ran on another thread than the one calling `process`.
    pub off_thread_runs: u32,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// Probes are keyed by the address of the host table their instance is created with.
static PROBES: Mutex<Vec<(usize, Arc<Probe>)>> = Mutex::new(Vec::new());

fn host_key(host: &clasp_sys::host::clap_host) -> usize {
    std::ptr::from_ref(host).addr()
}

pub fn register_probe(host: &TestHost, probe: Probe) -> Arc<Probe> {
    let probe = Arc::new(probe);
    lock(&PROBES).push((host_key(host.as_raw()), Arc::clone(&probe)));
    probe
}

pub fn unregister_probe(host: &TestHost) {
    let key = host_key(host.as_raw());
    lock(&PROBES).retain(|(k, _)| *k != key);
}

fn probe_for(host: &HostHandle) -> Option<Arc<Probe>> {
    let key = host_key(host.as_raw());
    lock(&PROBES)
        .iter()
        .rev()
        .find(|(k, _)| *k == key)
        .map(|(_, p)| Arc::clone(p))
}

pub struct ProbePlugin {
    probe: Arc<Probe>,
}

impl Plugin for ProbePlugin {
    type AudioProcessor = ProbeProcessor;

    const DESCRIPTOR: &'static PluginDescriptor = &PluginDescriptor::new(PROBE_ID, c"Probe")
        .with_vendor(c"clasp")
        .with_plugin_type(PluginType::AUDIO_EFFECT);

    fn new(host: HostHandle) -> Result<Self, PluginError> {
        let probe = probe_for(&host).ok_or(PluginError::Message("No probe for this host"))?;

        if probe.panic_on_construction.load(Ordering::SeqCst) {
            panic!("Probe construction panicked");
        }
        if probe.fail_construction.load(Ordering::SeqCst) {
            return Err(PluginError::Message("Probe construction failed"));
        }

        Ok(Self { probe })
    }

    fn init(&mut self, host: &mut InitializingHostHandle) -> Result<(), PluginError> {
        self.probe.observe_track(&host.main_thread());

        if self.probe.fail_init.load(Ordering::SeqCst) {
            return Err(PluginError::Message("Probe init failed"));
        }
        Ok(())
    }

    fn activate(
        &mut self,
        _host: HostMainThreadHandle,
        audio_config: AudioConfiguration,
    ) -> Result<ProbeProcessor, PluginError> {
        if self.probe.fail_activate.load(Ordering::SeqCst) {
            return Err(PluginError::Message("Probe activation failed"));
        }

        self.probe.activations.fetch_add(1, Ordering::SeqCst);
        self.probe
            .last_sample_rate
            .store(audio_config.sample_rate, Ordering::SeqCst);

        Ok(ProbeProcessor {
            probe: Arc::clone(&self.probe),
        })
    }

    fn deactivate(&mut self, _host: HostMainThreadHandle, _audio_processor: ProbeProcessor) {
        self.probe.deactivations.fetch_add(1, Ordering::SeqCst);

        if self.probe.panic_on_deactivate.load(Ordering::SeqCst) {
            panic!("Probe deactivation panicked");
        }
    }

    fn define_audio_ports(
        &self,
        _host: &HostMainThreadHandle,
        inputs: &mut Vec<AudioPortInfo>,
        outputs: &mut Vec<AudioPortInfo>,
    ) {
        inputs.push(AudioPortInfo::main(0, "Input", 2));

        for id in 0..self.probe.output_port_count.load(Ordering::SeqCst) {
            let mut port = AudioPortInfo::main(id, "Output", 2);
            port.is_main = id == 0;
            outputs.push(port);
        }
    }

    fn track_info_changed(&mut self, host: HostMainThreadHandle) {
        self.probe.observe_track(&host);
        host.invalidate_audio_ports_definition();
    }
}

pub struct ProbeProcessor {
    probe: Arc<Probe>,
}

impl PluginAudioProcessor for ProbeProcessor {
    fn start_processing(&mut self) -> Result<(), PluginError> {
        if self.probe.fail_start_processing.load(Ordering::SeqCst) {
            return Err(PluginError::Message("Probe failed to start processing"));
        }

        self.probe.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop_processing(&mut self) {
        self.probe.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn process(
        &mut self,
        process: Process,
        _audio: Audio,
        _events: Events,
    ) -> Result<ProcessStatus, PluginError> {
        self.probe.process_calls.fetch_add(1, Ordering::SeqCst);

        let task_count = self.probe.tasks_per_block.load(Ordering::SeqCst);
        if task_count > 0 {
            let process_thread: ThreadId = std::thread::current().id();
            let runs: Vec<AtomicU32> = (0..task_count).map(|_| AtomicU32::new(0)).collect();
            let off_thread_runs = AtomicU32::new(0);

            let execution = process.run_tasks(task_count, |task_index| {
                runs[task_index as usize].fetch_add(1, Ordering::SeqCst);
                if std::thread::current().id() != process_thread {
                    off_thread_runs.fetch_add(1, Ordering::SeqCst);
                }
            });

            *lock(&self.probe.last_tasks) = Some(TaskReport {
                execution,
                runs: runs.iter().map(|r| r.load(Ordering::SeqCst)).collect(),
                off_thread_runs: off_thread_runs.into_inner(),
            });
        }

        Ok(ProcessStatus::Continue)
    }
}

/// A probe plugin instance, along with its host and entry.
///
/// Fields drop in declaration order, so the instance is destroyed before its entry is deinitialized.
pub struct Fixture {
    pub instance: TestInstance,
    pub host: TestHost,
    pub probe: Arc<Probe>,
    _entry: TestEntry,
}

impl Fixture {
    pub fn new(config: TestHostConfig) -> Self {
        Self::with_probe(config, Probe::with_output_ports(1))
    }

    pub fn with_probe(config: TestHostConfig, probe: Probe) -> Self {
        let entry = TestEntry::load(&SinglePluginEntry::<ProbePlugin>::DESCRIPTOR).unwrap();
        let host = TestHost::new(config).unwrap();
        let probe = register_probe(&host, probe);
        let instance = entry.create(&host, PROBE_ID).unwrap();

        Self {
            instance,
            host,
            probe,
            _entry: entry,
        }
    }

    /// A fixture whose instance is initialized, activated at 48kHz and processing.
    pub fn processing(config: TestHostConfig) -> Self {
        let mut fixture = Self::new(config);
        assert!(fixture.instance.init());
        assert!(fixture.instance.activate(48_000));
        assert!(fixture.instance.start_processing());
        fixture
    }

    pub fn host_misbehaving_messages(&self) -> Vec<String> {
        self.host.messages_with_severity(LogSeverity::HostMisbehaving)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        unregister_probe(&self.host);
    }
}

pub fn track(name: &str, channel_count: u32, channel_map: ChannelMap) -> TrackInfo {
    TrackInfo {
        id: 7,
        index: 2,
        name: name.into(),
        path: format!("/{name}"),
        channel_count,
        channel_map,
        color: clasp_plugin::utils::Color::TRANSPARENT,
        is_return_track: false,
    }
}
