use std::io::Write;

use log::debug;

use crate::config::OutputFormat;
use crate::error::AppError;
use crate::gpio::MotionEvent;

/// Reacts to a sampled high level.
pub trait EventSink {
    fn on_motion(&mut self, event: &MotionEvent) -> Result<(), AppError>;

    /// Called once when the watch loop stops.
    fn finish(&mut self) -> Result<(), AppError> {
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn on_motion(&mut self, event: &MotionEvent) -> Result<(), AppError> {
        (**self).on_motion(event)
    }

    fn finish(&mut self) -> Result<(), AppError> {
        (**self).finish()
    }
}

/// Builds the printer for `format` on top of `out`.
pub fn printer<W: Write + 'static>(format: OutputFormat, out: W) -> Box<dyn EventSink> {
    match format {
        OutputFormat::Dot => Box::new(DotSink::new(out)),
        OutputFormat::Timestamp => Box::new(TimestampSink::new(out)),
        OutputFormat::Json => Box::new(JsonSink::new(out)),
    }
}

/// Writes `.` per event for live feedback; a newline at shutdown.
pub struct DotSink<W: Write> {
    out: W,
}

impl<W: Write> DotSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for DotSink<W> {
    fn on_motion(&mut self, _event: &MotionEvent) -> Result<(), AppError> {
        self.out.write_all(b".")?;
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AppError> {
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

pub struct TimestampSink<W: Write> {
    out: W,
}

impl<W: Write> TimestampSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for TimestampSink<W> {
    fn on_motion(&mut self, event: &MotionEvent) -> Result<(), AppError> {
        writeln!(self.out, "{} motion detected", event.timestamp)?;
        self.out.flush()?;
        Ok(())
    }
}

/// One `{"pin":..,"timestamp":..}` object per line.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for JsonSink<W> {
    fn on_motion(&mut self, event: &MotionEvent) -> Result<(), AppError> {
        serde_json::to_writer(&mut self.out, event).map_err(std::io::Error::from)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// A pub/sub endpoint that accepts one message per call.
pub trait Publisher {
    fn publish(&mut self, channel: &str, message: &str) -> Result<(), AppError>;
}

/// Publishes a fixed message per event, then hands the event to `inner`.
/// A failed publish stops the chain and is not retried.
pub struct PublishingSink<P: Publisher, S: EventSink> {
    publisher: P,
    channel: String,
    message: String,
    inner: S,
}

impl<P: Publisher, S: EventSink> PublishingSink<P, S> {
    pub fn new(publisher: P, channel: String, message: String, inner: S) -> Self {
        Self {
            publisher,
            channel,
            message,
            inner,
        }
    }

    pub fn into_parts(self) -> (P, S) {
        (self.publisher, self.inner)
    }
}

impl<P: Publisher, S: EventSink> EventSink for PublishingSink<P, S> {
    fn on_motion(&mut self, event: &MotionEvent) -> Result<(), AppError> {
        self.publisher.publish(&self.channel, &self.message)?;
        debug!("published {:?} to {}", self.message, self.channel);
        self.inner.on_motion(event)
    }

    fn finish(&mut self) -> Result<(), AppError> {
        self.inner.finish()
    }
}

#[cfg(feature = "redis-publish")]
pub use self::redis_publisher::RedisPublisher;

#[cfg(feature = "redis-publish")]
mod redis_publisher {
    use log::info;
    use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

    use super::Publisher;
    use crate::config::RemoteTarget;
    use crate::error::AppError;

    /// A single blocking Redis connection held for the process lifetime.
    pub struct RedisPublisher {
        conn: redis::Connection,
    }

    impl RedisPublisher {
        pub fn connect(target: &RemoteTarget) -> Result<Self, AppError> {
            let info = ConnectionInfo {
                addr: ConnectionAddr::Tcp(target.server.clone(), target.port),
                redis: RedisConnectionInfo::default(),
            };
            let client =
                redis::Client::open(info).map_err(|e| AppError::Connect(e.to_string()))?;
            let conn = client
                .get_connection()
                .map_err(|e| AppError::Connect(e.to_string()))?;
            info!("connected to Redis at {target}");
            Ok(Self { conn })
        }
    }

    impl Publisher for RedisPublisher {
        fn publish(&mut self, channel: &str, message: &str) -> Result<(), AppError> {
            redis::cmd("PUBLISH")
                .arg(channel)
                .arg(message)
                .query::<redis::Value>(&mut self.conn)
                .map_err(|e| AppError::Publish(e.to_string()))?;
            Ok(())
        }
    }
}
