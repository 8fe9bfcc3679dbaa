use colored::{Color, Colorize};

/// Terminal colors of the status messages. A theme without color renders
/// every tag as plain text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    color: bool,
}

impl Theme {
    pub fn new(color: bool) -> Theme {
        Theme { color }
    }

    pub fn plain() -> Theme {
        Theme::new(false)
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if !self.color {
            return text.to_owned();
        }
        text.color(color).bold().to_string()
    }

    pub fn drive_ok(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    pub fn drive_healing(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn drive_failed(&self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    pub fn node_failed(&self, text: &str) -> String {
        self.paint(text, Color::Red)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::new(true)
    }
}
