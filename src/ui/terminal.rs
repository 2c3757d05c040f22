use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use tracing::{debug, error};

use super::{ElementIds, View};

/// View for the console binary: the response control is stdout and alerts go
/// to stderr. Other controls are kept in memory.
pub struct TerminalView<W: Write = io::Stdout> {
    ids: ElementIds,
    out: W,
    values: HashMap<String, String>,
    enabled: HashSet<String>,
}

impl TerminalView<io::Stdout> {
    pub fn new(ids: ElementIds) -> Self {
        Self::with_writer(ids, io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn with_writer(ids: ElementIds, out: W) -> Self {
        Self {
            ids,
            out,
            values: HashMap::new(),
            enabled: HashSet::new(),
        }
    }

    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Write> View for TerminalView<W> {
    fn set_disabled(&mut self, id: &str, disabled: bool) {
        let changed = if disabled {
            self.enabled.remove(id)
        } else {
            self.enabled.insert(id.to_string())
        };
        if changed {
            debug!("Control '{}' {}", id, if disabled { "disabled" } else { "enabled" });
        }
    }

    fn is_disabled(&self, id: &str) -> bool {
        !self.enabled.contains(id)
    }

    fn value(&self, id: &str) -> String {
        self.values.get(id).cloned().unwrap_or_default()
    }

    fn set_value(&mut self, id: &str, value: &str) {
        self.values.insert(id.to_string(), value.to_string());
    }

    fn append_value(&mut self, id: &str, text: &str) {
        if id == self.ids.response {
            if let Err(e) = self.out.write_all(text.as_bytes()) {
                error!("Failed to write response: {}", e);
            }
            return;
        }
        self.values.entry(id.to_string()).or_default().push_str(text);
    }

    fn scroll_to_end(&mut self, id: &str) {
        if id == self.ids.response {
            if let Err(e) = self.out.flush() {
                error!("Failed to flush response: {}", e);
            }
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}
