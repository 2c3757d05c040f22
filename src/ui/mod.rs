//! Identifier-addressed control surface the console widget drives.
//!
//! A [`View`] is the DOM-equivalent: controls are looked up by string id and
//! carry a text value and a disabled flag. [`ElementIds`] names the handful
//! of controls the widget is allowed to touch.

mod memory;
mod terminal;

pub use memory::MemoryView;
pub use terminal::TerminalView;

use serde::Deserialize;

#[cfg_attr(test, mockall::automock)]
pub trait View {
    fn set_disabled(&mut self, id: &str, disabled: bool);

    fn is_disabled(&self, id: &str) -> bool;

    fn value(&self, id: &str) -> String;

    fn set_value(&mut self, id: &str, value: &str);

    fn append_value(&mut self, id: &str, text: &str) {
        let current = self.value(id);
        self.set_value(id, &format!("{}{}", current, text));
    }

    fn scroll_to_end(&mut self, id: &str);

    /// Blocking notice to the user.
    fn alert(&mut self, message: &str);
}

/// Which naming scheme the hosting page uses for its controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdVariant {
    #[default]
    Long,
    Short,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub path: String,
    pub request: String,
    pub response: String,
    pub send: String,
}

impl ElementIds {
    pub fn long() -> Self {
        Self::new("path", "req", "resp", "send")
    }

    pub fn short() -> Self {
        Self::new("p", "q", "r", "s")
    }

    pub fn new(path: &str, request: &str, response: &str, send: &str) -> Self {
        Self {
            path: path.to_string(),
            request: request.to_string(),
            response: response.to_string(),
            send: send.to_string(),
        }
    }

    /// Controls kept disabled until the connection opens.
    pub fn gated(&self) -> [&str; 3] {
        [self.path.as_str(), self.request.as_str(), self.send.as_str()]
    }
}

impl From<IdVariant> for ElementIds {
    fn from(variant: IdVariant) -> Self {
        match variant {
            IdVariant::Long => Self::long(),
            IdVariant::Short => Self::short(),
        }
    }
}

impl Default for ElementIds {
    fn default() -> Self {
        Self::long()
    }
}
