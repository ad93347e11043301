/*!

Verbose messaging.

Messages are sent on a `Channel` with a verbosity `level`. Level 1 is "normal" enabled. Level 4 gives proof
progress: the groupings before and after canonicalization and the final comparison. Level 5 gives solver and
simplifier detail. Level n includes all messages in levels m < n.

There is no global stream. Whatever wants to emit diagnostics is handed a `&dyn Logger` by its caller, so tests can
capture or silence the output.

*/

use std::{
  cell::RefCell,
  io::{stdout, Write},
};

use strum_macros::{Display, IntoStaticStr, EnumIter};
use yansi::Paint;


#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, IntoStaticStr, EnumIter)]
pub enum Channel {
  Error,
  Info,
  Debug,
}

impl Channel {
  fn tag(&self) -> String {
    let name: &'static str = self.into();
    match self {
      Channel::Error   => Paint::red(name).bold().to_string(),
      Channel::Info    => Paint::green(name).to_string(),
      Channel::Debug   => Paint::blue(name).to_string(),
    }
  }
}

/// The observer the prover and the self-test harness report to.
pub trait Logger {
  /// Emits `message` on `channel` if the logger is interested in messages of verbosity `level`.
  fn log(&self, channel: Channel, level: i32, message: &str);
}


/// Writes to stdout every message whose level is at most `verbosity`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StdoutLogger {
  pub verbosity: i32,
}

impl StdoutLogger {
  pub fn new(verbosity: i32) -> StdoutLogger {
    StdoutLogger { verbosity }
  }
}

impl Default for StdoutLogger {
  fn default() -> Self {
    StdoutLogger { verbosity: 1 }
  }
}

impl Logger for StdoutLogger {
  fn log(&self, channel: Channel, level: i32, message: &str) {
    if level > self.verbosity {
      return;
    }
    let mut stream = stdout().lock();
    let _ = writeln!(stream, "[{}] {}", channel.tag(), message);
  }
}


/// Discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct SilentLogger;

impl Logger for SilentLogger {
  fn log(&self, _channel: Channel, _level: i32, _message: &str) {}
}


/// Records every message regardless of level. Used to inspect diagnostics in tests.
#[derive(Debug, Default)]
pub struct CaptureLogger {
  records: RefCell<Vec<(Channel, i32, String)>>,
}

impl CaptureLogger {
  pub fn new() -> CaptureLogger {
    CaptureLogger::default()
  }

  /// Messages sent on `channel`, in order.
  pub fn messages(&self, channel: Channel) -> Vec<String> {
    self.records
        .borrow()
        .iter()
        .filter(|(c, _, _)| *c == channel)
        .map(|(_, _, message)| message.clone())
        .collect()
  }

  pub fn len(&self) -> usize {
    self.records.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.borrow().is_empty()
  }
}

impl Logger for CaptureLogger {
  fn log(&self, channel: Channel, level: i32, message: &str) {
    self.records.borrow_mut().push((channel, level, message.to_string()));
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn capture_by_channel() {
    let logger = CaptureLogger::new();
    logger.log(Channel::Debug, 4, "lhs: x");
    logger.log(Channel::Error, 1, "failure");
    logger.log(Channel::Debug, 5, "rhs: y");

    assert_eq!(logger.len(), 3);
    assert_eq!(logger.messages(Channel::Debug), vec!["lhs: x".to_string(), "rhs: y".to_string()]);
    assert_eq!(logger.messages(Channel::Error), vec!["failure".to_string()]);
    assert!(logger.messages(Channel::Info).is_empty());
  }

  #[test]
  fn silent_logger_is_silent() {
    // Nothing to observe; this succeeds if it doesn't panic.
    SilentLogger.log(Channel::Error, 1, "dropped");
  }

  #[test]
  fn channel_names() {
    let name: &'static str = Channel::Error.into();
    assert_eq!(name, "Error");
    assert_eq!(Channel::Debug.to_string(), "Debug");
  }
}
