//! Seam to the host's notification/toast utility.

/// Recoverable-error reporting channel.
///
/// The host wires this to its toast UI; recoverable failures (missed
/// picks, midline vertices, transport errors) surface here and nowhere
/// else. Configuration defects do not go through this channel — they are
/// returned as errors at startup.
pub trait Notifier {
    /// Report a user-visible recoverable error.
    fn error(&self, message: &str);
}

/// Fallback notifier that forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Notifier;

    /// Notifier that records every reported message.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        pub messages: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingNotifier {
        pub(crate) fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
            let messages = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    messages: Rc::clone(&messages),
                },
                messages,
            )
        }
    }

    impl Notifier for RecordingNotifier {
        fn error(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_owned());
        }
    }
}
