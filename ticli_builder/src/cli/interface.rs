use std::cell::RefCell;

/// Where user-facing output goes: regular messages and error diagnostics.
pub trait UserInterface {
    /// Display a regular message (ex: help, a hook's output).
    fn print(&self, message: String);

    /// Display an error diagnostic.
    fn print_error(&self, message: String);
}

/// The console: messages to stdout, errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, message: String) {
        eprintln!("{message}");
    }
}

/// Records every line in memory, for embedding callers that inspect the output themselves.
///
/// ### Example
/// ```
/// # use ticli_builder as ticli;
/// use std::rc::Rc;
/// use ticli::{BufferedInterface, UserInterface};
///
/// let buffer = Rc::new(BufferedInterface::default());
/// buffer.print("jumping 3.5 feet".to_string());
///
/// assert_eq!(buffer.messages(), vec!["jumping 3.5 feet"]);
/// assert!(buffer.errors().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct BufferedInterface {
    messages: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl BufferedInterface {
    /// The regular messages so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// The error diagnostics so far.
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    /// Take every recorded line, leaving the buffer empty.
    pub fn drain(&self) -> (Vec<String>, Vec<String>) {
        (
            self.messages.borrow_mut().drain(..).collect(),
            self.errors.borrow_mut().drain(..).collect(),
        )
    }
}

impl UserInterface for BufferedInterface {
    fn print(&self, message: String) {
        // Allows for print() to be called many times, a message may span several lines.
        self.messages
            .borrow_mut()
            .extend(message.lines().map(str::to_string));
    }

    fn print_error(&self, message: String) {
        self.errors.borrow_mut().push(message);
    }
}
