use clasp_common::track_info::TrackInfo;
use clasp_common::version::ClapVersion;

/// How the host answers the plugin's thread pool requests.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ThreadPoolMode {
    /// The host doesn't expose the thread pool extension at all.
    Absent,
    /// The extension is exposed, but every request is refused.
    Refuse,
    /// Requests are run on a rayon pool with the given number of worker threads.
    Rayon(usize),
}

/// Which capabilities the test host exposes to the plugin, and how it behaves.
#[derive(Clone, Debug)]
pub struct TestHostConfig {
    pub(crate) clap_version: ClapVersion,
    pub(crate) log: bool,
    pub(crate) thread_check: bool,
    pub(crate) thread_pool: ThreadPoolMode,
    pub(crate) audio_ports: bool,
    pub(crate) track_info: bool,
    pub(crate) initial_track_info: Option<TrackInfo>,
    pub(crate) optional_extensions: bool,
    pub(crate) accept_gui_resize: bool,
    pub(crate) max_frames: u32,
}

impl TestHostConfig {
    /// A host exposing every extension it knows of.
    pub fn new() -> Self {
        Self {
            clap_version: ClapVersion::CURRENT,
            log: true,
            thread_check: true,
            thread_pool: ThreadPoolMode::Rayon(2),
            audio_ports: true,
            track_info: true,
            initial_track_info: None,
            optional_extensions: true,
            accept_gui_resize: true,
            max_frames: 256,
        }
    }

    /// A host exposing no extension at all.
    pub fn minimal() -> Self {
        Self {
            log: false,
            thread_check: false,
            thread_pool: ThreadPoolMode::Absent,
            audio_ports: false,
            track_info: false,
            optional_extensions: false,
            ..Self::new()
        }
    }

    pub fn with_clap_version(mut self, version: ClapVersion) -> Self {
        self.clap_version = version;
        self
    }

    pub fn with_log(mut self, enabled: bool) -> Self {
        self.log = enabled;
        self
    }

    pub fn with_thread_check(mut self, enabled: bool) -> Self {
        self.thread_check = enabled;
        self
    }

    pub fn with_thread_pool(mut self, mode: ThreadPoolMode) -> Self {
        self.thread_pool = mode;
        self
    }

    pub fn with_audio_ports(mut self, enabled: bool) -> Self {
        self.audio_ports = enabled;
        self
    }

    /// Enables the track info extension. Passing [`None`] makes the host report no track.
    pub fn with_track_info(mut self, info: Option<TrackInfo>) -> Self {
        self.track_info = true;
        self.initial_track_info = info;
        self
    }

    pub fn without_track_info(mut self) -> Self {
        self.track_info = false;
        self.initial_track_info = None;
        self
    }

    /// Whether the host exposes the optional extensions (state, latency, params, GUI...).
    pub fn with_optional_extensions(mut self, enabled: bool) -> Self {
        self.optional_extensions = enabled;
        self
    }

    pub fn with_gui_resize(mut self, accept: bool) -> Self {
        self.accept_gui_resize = accept;
        self
    }

    /// The largest block size the instance's buffers can hold.
    pub fn with_max_frames(mut self, max_frames: u32) -> Self {
        self.max_frames = max_frames;
        self
    }
}

impl Default for TestHostConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
