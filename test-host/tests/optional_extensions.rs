use clasp_extensions::event_filter::HostEventFilter;
use clasp_extensions::event_loop::{FdFlags, HostEventLoop, PluginEventLoop, PluginEventLoopImpl, TimerId};
use clasp_extensions::file_reference::{
    FileReference, HashAlgorithm, HostFileReference, PluginFileReference, PluginFileReferenceImpl,
};
use clasp_extensions::gui::{
    GuiSize, HostGui, PluginGui, PluginGuiAttachImpl, PluginGuiImpl, PluginGuiX11, Window,
};
use clasp_extensions::latency::HostLatency;
use clasp_extensions::note_name::{HostNoteName, NoteName, PluginNoteName, PluginNoteNameImpl};
use clasp_extensions::params::{HostParams, ParamClearFlags, ParamRescanFlags};
use clasp_extensions::preset_load::{PluginPresetLoad, PluginPresetLoadImpl};
use clasp_extensions::state::HostState;
use clasp_plugin::plugin::wrapper::PluginWrapper;
use clasp_plugin::prelude::*;
use clasp_test_host::*;
use std::ffi::{CStr, CString};
use std::mem::MaybeUninit;

const WORKBENCH_ID: &CStr = c"org.clasp.test.workbench";

/// The host extensions the workbench found during init.
#[derive(Copy, Clone, Default)]
struct HostSide {
    state: Option<HostState>,
    latency: Option<HostLatency>,
    params: Option<HostParams>,
    gui: Option<HostGui>,
    note_name: Option<HostNoteName>,
    event_filter: Option<HostEventFilter>,
    file_reference: Option<HostFileReference>,
    event_loop: Option<HostEventLoop>,
}

/// A plugin implementing every optional extension, recording what the host asked of it.
struct Workbench {
    host_side: HostSide,
    calls: Vec<String>,
    gui_size: GuiSize,
    files: Vec<(u32, CString)>,
}

impl Plugin for Workbench {
    type AudioProcessor = WorkbenchProcessor;

    const DESCRIPTOR: &'static PluginDescriptor =
        &PluginDescriptor::new(WORKBENCH_ID, c"Workbench").with_plugin_type(PluginType::INSTRUMENT);

    fn new(_host: HostHandle) -> Result<Self, PluginError> {
        Ok(Self {
            host_side: HostSide::default(),
            calls: Vec::new(),
            gui_size: GuiSize {
                width: 400,
                height: 300,
            },
            files: vec![(7, c"/samples/kick.wav".into())],
        })
    }

    fn init(&mut self, host: &mut InitializingHostHandle) -> Result<(), PluginError> {
        self.host_side = HostSide {
            state: host.get_extension(),
            latency: host.get_extension(),
            params: host.get_extension(),
            gui: host.get_extension(),
            note_name: host.get_extension(),
            event_filter: host.get_extension(),
            file_reference: host.get_extension(),
            event_loop: host.get_extension(),
        };
        Ok(())
    }

    fn activate(
        &mut self,
        _host: HostMainThreadHandle,
        _audio_config: AudioConfiguration,
    ) -> Result<WorkbenchProcessor, PluginError> {
        Ok(WorkbenchProcessor)
    }

    fn declare_extensions(&self, builder: &mut PluginExtensions<Self>) {
        builder
            .register::<PluginGui>()
            .register::<PluginGuiX11>()
            .register::<PluginEventLoop>()
            .register::<PluginNoteName>()
            .register::<PluginFileReference>()
            .register::<PluginPresetLoad>();
    }
}

impl PluginGuiImpl for Workbench {
    fn create(&mut self) -> Result<(), PluginError> {
        self.calls.push("gui.create".into());
        Ok(())
    }

    fn destroy(&mut self) {
        self.calls.push("gui.destroy".into());
    }

    fn set_scale(&mut self, scale: f64) {
        self.calls.push(format!("gui.set_scale({scale})"));
    }

    fn size(&mut self) -> Option<GuiSize> {
        Some(self.gui_size)
    }

    fn can_resize(&mut self) -> bool {
        true
    }

    fn round_size(&mut self, size: GuiSize) -> GuiSize {
        GuiSize {
            width: size.width / 10 * 10,
            height: size.height / 10 * 10,
        }
    }

    fn set_size(&mut self, size: GuiSize) -> Result<(), PluginError> {
        if size.width < 100 || size.height < 100 {
            return Err(PluginError::Message("GUI too small"));
        }

        self.gui_size = size;
        Ok(())
    }

    fn show(&mut self) {
        self.calls.push("gui.show".into());
    }

    fn hide(&mut self) {
        self.calls.push("gui.hide".into());
    }
}

impl PluginGuiAttachImpl for Workbench {
    fn attach(&mut self, window: Window) -> Result<(), PluginError> {
        match window {
            Window::X11 {
                display_name,
                window,
            } => {
                self.calls.push(format!("gui.attach({display_name:?}, {window})"));
                Ok(())
            }
            _ => Err(PluginError::Message("Unsupported window type")),
        }
    }
}

impl PluginEventLoopImpl for Workbench {
    fn on_timer(&mut self, timer_id: TimerId) {
        self.calls.push(format!("on_timer({timer_id})"));
    }
}

impl PluginNoteNameImpl for Workbench {
    fn count(&mut self) -> u32 {
        2
    }

    fn get(&mut self, index: u32) -> Option<NoteName<'_>> {
        let (name, key) = match index {
            0 => (b"Kick".as_slice(), 36),
            1 => (b"Snare".as_slice(), 38),
            _ => return None,
        };

        Some(NoteName {
            name,
            port: -1,
            key,
            channel: -1,
        })
    }
}

impl PluginFileReferenceImpl for Workbench {
    fn count(&mut self) -> u32 {
        u32::try_from(self.files.len()).unwrap_or(u32::MAX)
    }

    fn get(&mut self, index: u32) -> Option<FileReference<'_>> {
        let (resource_id, path) = self.files.get(index as usize)?;

        Some(FileReference {
            resource_id: *resource_id,
            path: path.to_bytes(),
        })
    }

    fn get_hash(
        &mut self,
        resource_id: u32,
        _algorithm: HashAlgorithm,
        digest: &mut [u8],
    ) -> Result<(), PluginError> {
        if !self.files.iter().any(|(id, _)| *id == resource_id) {
            return Err(PluginError::Message("Unknown resource"));
        }

        digest.fill(0xAB);
        Ok(())
    }

    fn update_path(&mut self, resource_id: u32, path: &CStr) -> Result<(), PluginError> {
        let (_, current) = self
            .files
            .iter_mut()
            .find(|(id, _)| *id == resource_id)
            .ok_or(PluginError::Message("Unknown resource"))?;

        *current = path.into();
        Ok(())
    }

    fn save_resources(&mut self) -> Result<(), PluginError> {
        self.calls.push("save_resources".into());
        Ok(())
    }
}

impl PluginPresetLoadImpl for Workbench {
    fn from_file(&mut self, path: &CStr) -> Result<(), PluginError> {
        if !path.to_bytes().ends_with(b".preset") {
            return Err(PluginError::Message("Not a preset file"));
        }

        self.calls.push(format!("from_file({})", path.to_string_lossy()));
        Ok(())
    }
}

struct WorkbenchProcessor;

impl PluginAudioProcessor for WorkbenchProcessor {
    fn process(
        &mut self,
        _process: Process,
        _audio: Audio,
        _events: Events,
    ) -> Result<ProcessStatus, PluginError> {
        Ok(ProcessStatus::Sleep)
    }
}

struct Setup {
    instance: TestInstance,
    host: TestHost,
    _entry: TestEntry,
}

fn setup(config: TestHostConfig) -> Setup {
    let entry = TestEntry::load(&SinglePluginEntry::<Workbench>::DESCRIPTOR).unwrap();
    let host = TestHost::new(config).unwrap();
    let mut instance = entry.create(&host, WORKBENCH_ID).unwrap();
    assert!(instance.init());

    Setup {
        instance,
        host,
        _entry: entry,
    }
}

/// Runs `f` on the plugin, the way the wrapper runs any main-thread entry.
fn with_workbench<T>(
    instance: &TestInstance,
    f: impl FnOnce(&mut Workbench, HostMainThreadHandle) -> T,
) -> T {
    // SAFETY: the instance is alive, and this is the main thread.
    unsafe {
        PluginWrapper::<Workbench>::handle_main_thread(instance.as_ptr(), "test.workbench", |p, h| {
            Ok(f(p, h))
        })
    }
    .unwrap()
}

fn plugin_calls(instance: &TestInstance) -> Vec<String> {
    with_workbench(instance, |plugin, _| std::mem::take(&mut plugin.calls))
}

#[test]
pub fn gui_lifecycle() {
    let setup = setup(TestHostConfig::new());
    let gui = setup.instance.get_extension::<PluginGui>().unwrap();
    let x11 = setup.instance.get_extension::<PluginGuiX11>().unwrap();

    // SAFETY: the instance is alive, and this is the main thread.
    unsafe {
        assert!(gui.create());
        gui.set_scale(2.0);
        assert!(x11.attach(None, 42));
        assert_eq!(
            gui.size(),
            Some(GuiSize {
                width: 400,
                height: 300
            })
        );

        assert!(gui.can_resize());
        let rounded = gui.round_size(GuiSize {
            width: 643,
            height: 481,
        });
        assert_eq!(
            rounded,
            GuiSize {
                width: 640,
                height: 480
            }
        );
        assert!(gui.set_size(rounded));
        assert!(!gui.set_size(GuiSize {
            width: 10,
            height: 10
        }));
        assert_eq!(gui.size(), Some(rounded));

        gui.show();
        gui.hide();
        gui.destroy();
    }

    assert_eq!(
        plugin_calls(&setup.instance),
        [
            "gui.create",
            "gui.set_scale(2)",
            "gui.attach(None, 42)",
            "gui.show",
            "gui.hide",
            "gui.destroy"
        ]
    );

    // Only the X11 table was registered.
    assert!(!setup.instance.has_extension(c"clap/gui-win32"));
    assert!(!setup.instance.has_extension(c"clap/gui-cocoa"));
}

#[test]
pub fn gui_resize_requests_reach_the_host() {
    let setup = setup(TestHostConfig::new());
    let resized = with_workbench(&setup.instance, |plugin, host| {
        plugin.host_side.gui.unwrap().resize(&host, 800, 600)
    });
    assert!(resized.is_ok());

    let refusing = self::setup(TestHostConfig::new().with_gui_resize(false));
    let refused = with_workbench(&refusing.instance, |plugin, host| {
        plugin.host_side.gui.unwrap().resize(&host, 800, 600)
    });
    assert_eq!(
        refused.unwrap_err().to_string(),
        "Request to resize plugin window to 800x600 failed"
    );

    for host in [&setup.host, &refusing.host] {
        assert_eq!(
            host.count_calls(HostCall::GuiResize {
                width: 800,
                height: 600
            }),
            1
        );
    }
}

#[test]
pub fn host_notifications_are_forwarded() {
    let setup = setup(TestHostConfig::new());

    with_workbench(&setup.instance, |plugin, host| {
        let side = plugin.host_side;

        side.state.unwrap().mark_dirty(&host);
        side.latency.unwrap().changed(&host);
        side.note_name.unwrap().changed(&host);
        side.event_filter.unwrap().changed(&host);

        let params = side.params.unwrap();
        params.rescan(&host, ParamRescanFlags::VALUES);
        params.clear(&host, 3, ParamClearFlags::AUTOMATIONS);
        params.request_flush(&host.shared());

        let file_reference = side.file_reference.unwrap();
        file_reference.changed(&host);
        file_reference.set_dirty(&host, 7);
    });

    let calls: Vec<_> = setup
        .host
        .calls()
        .into_iter()
        .filter(|c| *c != HostCall::TrackInfoQueried)
        .collect();

    assert_eq!(
        calls,
        [
            HostCall::StateMarkedDirty,
            HostCall::LatencyChanged,
            HostCall::NoteNamesChanged,
            HostCall::EventFilterChanged,
            HostCall::ParamsRescan(ParamRescanFlags::VALUES.bits()),
            HostCall::ParamsClear {
                param_id: 3,
                flags: ParamClearFlags::AUTOMATIONS.bits()
            },
            HostCall::ParamsFlushRequested,
            HostCall::FileReferencesChanged,
            HostCall::FileReferenceDirty(7),
        ]
    );
}

#[test]
pub fn timers_tick_until_unregistered() {
    let setup = setup(TestHostConfig::new());
    let event_loop = setup.instance.get_extension::<PluginEventLoop>().unwrap();

    let timer_id = with_workbench(&setup.instance, |plugin, host| {
        plugin.host_side.event_loop.unwrap().register_timer(&host, 30)
    })
    .unwrap();

    assert_eq!(
        setup.host.count_calls(HostCall::TimerRegistered {
            timer_id: timer_id.0,
            period_ms: 30
        }),
        1
    );

    // SAFETY: the instance is alive, and this is the main thread.
    unsafe {
        event_loop.on_timer(timer_id);
        event_loop.on_timer(timer_id);
    }
    assert_eq!(
        plugin_calls(&setup.instance),
        [format!("on_timer({timer_id})"), format!("on_timer({timer_id})")]
    );

    let unregistered = with_workbench(&setup.instance, |plugin, host| {
        let event_loop = plugin.host_side.event_loop.unwrap();
        (
            event_loop.unregister_timer(&host, timer_id),
            event_loop.unregister_timer(&host, TimerId(timer_id.0 + 1000)),
        )
    });
    assert!(unregistered.0.is_ok());
    assert!(unregistered.1.is_err());
}

#[cfg(unix)]
#[test]
pub fn fd_registrations_reach_the_host() {
    let setup = setup(TestHostConfig::new());

    with_workbench(&setup.instance, |plugin, host| {
        let event_loop = plugin.host_side.event_loop.unwrap();
        event_loop.register_fd(&host, 0, FdFlags::READ).unwrap();
        event_loop
            .modify_fd(&host, 0, FdFlags::READ | FdFlags::WRITE)
            .unwrap();
        event_loop.unregister_fd(&host, 0).unwrap();
    });

    let calls = setup.host.calls();
    assert!(calls.contains(&HostCall::FdRegistered {
        flags: FdFlags::READ.bits()
    }));
    assert!(calls.contains(&HostCall::FdModified {
        flags: (FdFlags::READ | FdFlags::WRITE).bits()
    }));
    assert!(calls.contains(&HostCall::FdUnregistered));
}

#[test]
pub fn note_names_are_listed() {
    let setup = setup(TestHostConfig::new());
    let note_name = setup.instance.get_extension::<PluginNoteName>().unwrap();
    let mut buffer = MaybeUninit::uninit();

    // SAFETY: the instance is alive, and this is the main thread.
    unsafe {
        assert_eq!(note_name.count(), 2);

        let snare = note_name.get(1, &mut buffer).unwrap();
        assert_eq!(snare.name, b"Snare");
        assert_eq!((snare.port, snare.key, snare.channel), (-1, 38, -1));

        assert!(note_name.get(2, &mut buffer).is_none());
    }
}

#[test]
pub fn file_references_can_be_relocated() {
    let setup = setup(TestHostConfig::new());
    let files = setup.instance.get_extension::<PluginFileReference>().unwrap();

    // SAFETY: the instance is alive, and this is the main thread.
    unsafe {
        assert_eq!(files.count(), 1);
        assert_eq!(files.get(0, 256), Some((7, c"/samples/kick.wav".into())));
        assert!(files.get(1, 256).is_none());

        assert_eq!(
            files.get_hash(7, HashAlgorithm::Sha256),
            Some(vec![0xAB; 32])
        );
        assert!(files.get_hash(8, HashAlgorithm::Md5).is_none());

        assert!(files.update_path(7, c"/moved/kick.wav"));
        assert!(!files.update_path(8, c"/moved/snare.wav"));
        assert_eq!(files.get(0, 256), Some((7, c"/moved/kick.wav".into())));

        assert!(files.save_resources());
    }

    assert_eq!(plugin_calls(&setup.instance), ["save_resources"]);
}

#[test]
pub fn presets_are_loaded_from_files() {
    let setup = setup(TestHostConfig::new());
    let preset_load = setup.instance.get_extension::<PluginPresetLoad>().unwrap();

    // SAFETY: the instance is alive, and this is the main thread.
    unsafe {
        assert!(preset_load.from_file(c"/presets/warm.preset"));
        assert!(!preset_load.from_file(c"/presets/warm.txt"));
    }

    assert_eq!(
        plugin_calls(&setup.instance),
        ["from_file(/presets/warm.preset)"]
    );
    assert_eq!(
        setup.host.messages_with_severity(LogSeverity::Error),
        ["Not a preset file"]
    );
}

#[test]
pub fn optional_host_extensions_can_be_absent() {
    let setup = setup(TestHostConfig::new().with_optional_extensions(false));

    let found = with_workbench(&setup.instance, |plugin, _| {
        let side = plugin.host_side;
        [
            side.state.is_some(),
            side.latency.is_some(),
            side.params.is_some(),
            side.gui.is_some(),
            side.note_name.is_some(),
            side.event_filter.is_some(),
            side.file_reference.is_some(),
            side.event_loop.is_some(),
        ]
    });

    assert_eq!(found, [false; 8]);
}
