use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::PinId;
use crate::error::AppError;
use crate::sink::EventSink;

/// Logic level byte reported by the value attribute when the line is high.
pub const HIGH: u8 = b'1';

/// First character of the `direction` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn from_attr(c: u8) -> Option<Self> {
        match c {
            b'i' => Some(Direction::Input),
            b'o' => Some(Direction::Output),
            _ => None,
        }
    }
}

/// First character of the `edge` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    None,
    Rising,
    Falling,
    Both,
}

impl EdgeMode {
    pub fn from_attr(c: u8) -> Option<Self> {
        match c {
            b'n' => Some(EdgeMode::None),
            b'r' => Some(EdgeMode::Rising),
            b'f' => Some(EdgeMode::Falling),
            b'b' => Some(EdgeMode::Both),
            _ => None,
        }
    }

    pub fn reports_rising(&self) -> bool {
        matches!(self, EdgeMode::Rising | EdgeMode::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MotionEvent {
    pub pin: PinId,
    /// Unix time in seconds.
    pub timestamp: u64,
}

impl MotionEvent {
    pub fn now(pin: &PinId) -> Self {
        Self {
            pin: pin.clone(),
            timestamp: epoch_secs(),
        }
    }
}

/// A pin value that can be waited on for level changes.
pub trait ValueSource {
    /// Block until the kernel flags a change. No timeout.
    fn wait_for_change(&mut self) -> Result<(), AppError>;

    /// Rewind, take the first byte and discard the rest of the stream so the
    /// next wait starts from an empty queue. `None` when nothing was read.
    fn read_latest(&mut self) -> Result<Option<u8>, AppError>;
}

/// The Armed/Reacting loop. Fires the sink once per wake-up that samples a
/// high level; rapid toggles between wake-ups are not counted.
pub struct EdgeWatcher<V: ValueSource, S: EventSink> {
    pin: PinId,
    source: V,
    sink: S,
    fired: u64,
}

impl<V: ValueSource, S: EventSink> EdgeWatcher<V, S> {
    pub fn new(pin: PinId, source: V, sink: S) -> Self {
        Self {
            pin,
            source,
            sink,
            fired: 0,
        }
    }

    /// Number of events delivered to the sink so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn into_parts(self) -> (V, S) {
        (self.source, self.sink)
    }

    /// Runs until the wait primitive or the sink fails. There is no clean
    /// exit: the returned error is the reason the loop stopped.
    pub fn run(&mut self) -> Result<(), AppError> {
        info!("watching GPIO {} for motion", self.pin);
        let res = self.watch();
        info!(
            "stopped watching GPIO {} after {} event(s)",
            self.pin, self.fired
        );
        let finished = self.sink.finish();
        res.and(finished)
    }

    fn watch(&mut self) -> Result<(), AppError> {
        loop {
            self.source.wait_for_change()?;

            let value = match self.source.read_latest() {
                Ok(v) => v,
                Err(e) => {
                    warn!("GPIO {}: {e}", self.pin);
                    None
                }
            };
            debug!("GPIO {} woke with value {:?}", self.pin, value.map(char::from));

            if value == Some(HIGH) {
                self.sink.on_motion(&MotionEvent::now(&self.pin))?;
                self.fired += 1;
            }
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_modes_that_report_rising() {
        assert!(EdgeMode::from_attr(b'r').unwrap().reports_rising());
        assert!(EdgeMode::from_attr(b'b').unwrap().reports_rising());
        assert!(!EdgeMode::from_attr(b'f').unwrap().reports_rising());
        assert!(!EdgeMode::from_attr(b'n').unwrap().reports_rising());
        assert_eq!(EdgeMode::from_attr(b'x'), None);
    }

    #[test]
    fn direction_from_first_char() {
        assert_eq!(Direction::from_attr(b'i'), Some(Direction::Input));
        assert_eq!(Direction::from_attr(b'o'), Some(Direction::Output));
        assert_eq!(Direction::from_attr(b'?'), None);
    }
}
