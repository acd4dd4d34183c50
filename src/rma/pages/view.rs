use std::fmt;

/// Localizable text: a message key plus interpolation arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub key: &'static str,
    pub args: Vec<String>,
}

impl Text {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            f.write_str(self.key)
        } else {
            write!(f, "{}({})", self.key, self.args.join(", "))
        }
    }
}

impl From<&'static str> for Text {
    fn from(key: &'static str) -> Self {
        Text::new(key)
    }
}

/// Snapshot of what a page shows, independent of how it is drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub tag: &'static str,
    pub title: Text,
    pub message: Option<Text>,
    /// Extra status lines (e.g. current write-protect state)
    pub status: Vec<Text>,
    /// Failure banner from a rejected or failed request
    pub failure: Option<String>,
}

impl PageView {
    pub fn new(tag: &'static str, title: Text) -> Self {
        Self {
            tag,
            title,
            message: None,
            status: Vec::new(),
            failure: None,
        }
    }

    pub fn message(mut self, message: Text) -> Self {
        self.message = Some(message);
        self
    }

    pub fn status(mut self, line: Text) -> Self {
        self.status.push(line);
        self
    }

    pub fn failure(mut self, failure: Option<String>) -> Self {
        self.failure = failure;
        self
    }
}
