//! Display sinks the edit buffer renders into.
//!
//! The calculator pushes text to two sinks: one for the expression being
//! edited and one for the result. A sink only has to accept strings.

/// A text surface that shows whatever it was last given.
pub trait TextSink {
    fn show(&mut self, text: &str);
}

impl<F: FnMut(&str)> TextSink for F {
    fn show(&mut self, text: &str) {
        self(text)
    }
}

/// A sink that remembers its current text and every update it received.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    current: String,
    history: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text currently shown.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Every text shown, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl TextSink for RecordingSink {
    fn show(&mut self, text: &str) {
        self.current.clear();
        self.current.push_str(text);
        self.history.push(text.to_string());
    }
}
