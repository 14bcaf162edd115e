use crate::entry::PluginEntry;
use crate::factory::PluginFactoryEntry;
use crate::plugin::Plugin;
use std::marker::PhantomData;

/// A [`PluginEntry`] that only exposes a single plugin type to the host.
///
/// Modules exposing more plugin types, or needing custom `init`/`deinit` behavior, implement
/// [`PluginEntry`] themselves.
pub struct SinglePluginEntry<P: Plugin>(PhantomData<fn() -> P>);

impl<P: Plugin> PluginEntry for SinglePluginEntry<P> {
    const PLUGINS: &'static [PluginFactoryEntry] = &[PluginFactoryEntry::of::<P>()];
}
