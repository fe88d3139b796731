use std::collections::VecDeque;
use std::io;

use nix::errno::Errno;

use crate::error::AppError;
use crate::gpio::ValueSource;
use crate::sink::Publisher;

/// What a scripted wake-up reads back from the value attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Value(u8),
    Empty,
    ReadError,
}

/// Replays a fixed sequence of wake-ups, then fails the next wait.
#[derive(Debug, Default)]
pub struct MockValueSource {
    script: VecDeque<Wake>,
    current: Option<Wake>,
    waits: usize,
}

impl MockValueSource {
    pub fn new<I: IntoIterator<Item = Wake>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
            current: None,
            waits: 0,
        }
    }

    /// Shorthand for a script of plain value bytes.
    pub fn from_values(values: &[u8]) -> Self {
        Self::new(values.iter().map(|&v| Wake::Value(v)))
    }

    pub fn waits(&self) -> usize {
        self.waits
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ValueSource for MockValueSource {
    fn wait_for_change(&mut self) -> Result<(), AppError> {
        self.waits += 1;
        self.current = Some(self.script.pop_front().ok_or(AppError::Wait(Errno::EIO))?);
        Ok(())
    }

    fn read_latest(&mut self) -> Result<Option<u8>, AppError> {
        match self.current.take() {
            Some(Wake::Value(v)) => Ok(Some(v)),
            Some(Wake::Empty) | None => Ok(None),
            Some(Wake::ReadError) => Err(AppError::ValueRead(io::Error::other(
                "mock read failure",
            ))),
        }
    }
}

/// Records publishes; fails every publish after the first `fail_after`.
#[derive(Debug, Default)]
pub struct MockPublisher {
    pub published: Vec<(String, String)>,
    pub attempts: usize,
    fail_after: Option<usize>,
}

impl MockPublisher {
    pub fn failing_after(count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Default::default()
        }
    }
}

impl Publisher for MockPublisher {
    fn publish(&mut self, channel: &str, message: &str) -> Result<(), AppError> {
        self.attempts += 1;
        if self.fail_after.is_some_and(|n| self.published.len() >= n) {
            return Err(AppError::Publish("Connection reset by peer".into()));
        }
        self.published.push((channel.to_string(), message.to_string()));
        Ok(())
    }
}
