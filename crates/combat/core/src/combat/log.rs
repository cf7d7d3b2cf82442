//! Human-readable battle log.
//!
//! One `CombatLog` per battle. A muted log discards every line; the engine
//! uses it for silent what-if simulations.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CombatLog {
    lines: Vec<String>,
    muted: bool,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn muted() -> Self {
        Self {
            lines: Vec::new(),
            muted: true,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if !self.muted {
            self.lines.push(line.into());
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
