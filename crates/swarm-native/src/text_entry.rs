//! Keyboard entry for the text formation's content.

use swarm_core::Simulation;

/// Line editor opened with Enter. Enter again commits, Escape cancels.
#[derive(Debug, Default)]
pub struct TextEntry {
    buffer: Option<String>,
}

impl TextEntry {
    pub fn is_open(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn open(&mut self) {
        self.buffer = Some(String::new());
        log::info!("[text] editing; Enter saves, Escape cancels");
    }

    /// Appends typed text, dropping control characters.
    pub fn push(&mut self, typed: &str) {
        if let Some(buf) = self.buffer.as_mut() {
            buf.extend(typed.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.buffer.as_mut() {
            buf.pop();
        }
    }

    pub fn cancel(&mut self) {
        if self.buffer.take().is_some() {
            log::info!("[text] edit cancelled");
        }
    }

    /// Closes the editor and hands the buffer to `sim`. Blank input keeps the
    /// current text. Returns `true` when the text changed.
    pub fn commit(&mut self, sim: &mut Simulation) -> bool {
        let Some(buf) = self.buffer.take() else {
            return false;
        };
        let changed = sim.set_text_sample(&buf);
        if changed {
            log::info!("[text] now {:?}", sim.text_sample());
        } else {
            log::info!("[text] blank input, keeping {:?}", sim.text_sample());
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_core::DeviceProfile;

    fn sim() -> Simulation {
        Simulation::new(DeviceProfile::constrained(), "HELLO", 1)
    }

    #[test]
    fn typed_text_is_committed() {
        let mut s = sim();
        let mut entry = TextEntry::default();
        entry.open();
        entry.push("Rusty");
        entry.backspace();
        entry.push("\r");
        assert!(entry.commit(&mut s));
        assert!(!entry.is_open());
        assert_eq!(s.text_sample(), "Rust");
    }

    #[test]
    fn blank_commit_keeps_previous_text() {
        let mut s = sim();
        let mut entry = TextEntry::default();
        entry.open();
        entry.push("   ");
        assert!(!entry.commit(&mut s));
        assert!(!entry.is_open());
        assert_eq!(s.text_sample(), "HELLO");
    }

    #[test]
    fn cancel_discards_the_buffer() {
        let mut s = sim();
        let mut entry = TextEntry::default();
        entry.open();
        entry.push("BYE");
        entry.cancel();
        assert!(!entry.is_open());
        assert!(!entry.commit(&mut s));
        assert_eq!(s.text_sample(), "HELLO");
    }

    #[test]
    fn input_is_ignored_while_closed() {
        let mut s = sim();
        let mut entry = TextEntry::default();
        entry.push("X");
        entry.open();
        entry.push("Y");
        assert!(entry.commit(&mut s));
        assert_eq!(s.text_sample(), "Y");
    }
}
