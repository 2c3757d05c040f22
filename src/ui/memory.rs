use std::collections::HashMap;

use super::View;

#[derive(Debug, Clone)]
struct Control {
    value: String,
    disabled: bool,
    scroll_top: usize,
    enabled_count: usize,
    disabled_count: usize,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            value: String::new(),
            disabled: true,
            scroll_top: 0,
            enabled_count: 0,
            disabled_count: 0,
        }
    }
}

/// Headless document. Controls spring into existence on first use and start
/// out disabled, like the gated inputs on the console page.
#[derive(Debug, Default)]
pub struct MemoryView {
    controls: HashMap<String, Control>,
    alerts: Vec<String>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    fn control(&mut self, id: &str) -> &mut Control {
        self.controls.entry(id.to_string()).or_default()
    }

    /// Number of disabled -> enabled transitions seen by a control.
    pub fn enabled_count(&self, id: &str) -> usize {
        self.controls.get(id).map_or(0, |c| c.enabled_count)
    }

    /// Number of enabled -> disabled transitions seen by a control.
    pub fn disabled_count(&self, id: &str) -> usize {
        self.controls.get(id).map_or(0, |c| c.disabled_count)
    }

    pub fn scroll_top(&self, id: &str) -> usize {
        self.controls.get(id).map_or(0, |c| c.scroll_top)
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }
}

impl View for MemoryView {
    fn set_disabled(&mut self, id: &str, disabled: bool) {
        let control = self.control(id);
        if control.disabled != disabled {
            if disabled {
                control.disabled_count += 1;
            } else {
                control.enabled_count += 1;
            }
        }
        control.disabled = disabled;
    }

    fn is_disabled(&self, id: &str) -> bool {
        self.controls.get(id).map_or(true, |c| c.disabled)
    }

    fn value(&self, id: &str) -> String {
        self.controls
            .get(id)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, id: &str, value: &str) {
        self.control(id).value = value.to_string();
    }

    fn append_value(&mut self, id: &str, text: &str) {
        self.control(id).value.push_str(text);
    }

    fn scroll_to_end(&mut self, id: &str) {
        let control = self.control(id);
        control.scroll_top = control.value.len();
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
