use crate::host::HostMainThreadHandle;
use crate::plugin::Plugin;
use clasp_common::ports::{AudioPortInfo, PortDirection, audio_ports_structurally_equal};

/// The audio ports currently exposed to the host.
#[derive(Default)]
pub(crate) struct AudioPorts {
    inputs: Vec<AudioPortInfo>,
    outputs: Vec<AudioPortInfo>,
}

impl AudioPorts {
    pub fn define<P: Plugin>(plugin: &P, host: &HostMainThreadHandle) -> Self {
        let mut ports = Self::default();
        plugin.define_audio_ports(host, &mut ports.inputs, &mut ports.outputs);
        ports
    }

    #[inline]
    fn list(&self, direction: PortDirection) -> &[AudioPortInfo] {
        match direction {
            PortDirection::Input => &self.inputs,
            PortDirection::Output => &self.outputs,
        }
    }

    #[inline]
    pub fn count(&self, direction: PortDirection) -> usize {
        self.list(direction).len()
    }

    #[inline]
    pub fn get(&self, direction: PortDirection, index: usize) -> Option<&AudioPortInfo> {
        self.list(direction).get(index)
    }

    /// Replaces the current definition with a new one.
    ///
    /// Returns `true` if the new definition is structurally different, i.e. if the host has to be
    /// notified.
    pub fn replace(&mut self, new: AudioPorts) -> bool {
        let changed = !audio_ports_structurally_equal(&self.inputs, &new.inputs)
            || !audio_ports_structurally_equal(&self.outputs, &new.outputs);

        *self = new;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports(inputs: &[AudioPortInfo], outputs: &[AudioPortInfo]) -> AudioPorts {
        AudioPorts {
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        }
    }

    #[test]
    fn renaming_a_port_is_not_a_change() {
        let mut current = ports(&[AudioPortInfo::main(0, "In", 2)], &[]);

        assert!(!current.replace(ports(&[AudioPortInfo::main(0, "Main In", 2)], &[])));
        assert_eq!(
            current.get(PortDirection::Input, 0).map(|p| p.name.as_str()),
            Some("Main In")
        );
    }

    #[test]
    fn adding_an_output_is_a_change() {
        let mut current = ports(&[], &[AudioPortInfo::main(0, "Out", 2)]);

        assert!(current.replace(ports(
            &[],
            &[
                AudioPortInfo::main(0, "Out", 2),
                AudioPortInfo::main(1, "Aux", 2)
            ]
        )));
        assert_eq!(current.count(PortDirection::Output), 2);
        assert_eq!(current.count(PortDirection::Input), 0);
        assert!(current.get(PortDirection::Output, 2).is_none());
    }
}
