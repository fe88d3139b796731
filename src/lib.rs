pub mod backend;
pub mod config;
pub mod error;
pub mod gpio;
pub mod sink;

pub use config::{AppConfig, OutputFormat, PinId, RemoteTarget};
pub use error::AppError;
pub use gpio::{EdgeWatcher, MotionEvent, ValueSource};
pub use sink::{EventSink, Publisher, PublishingSink};

pub use backend::SysfsGpio;
#[cfg(feature = "redis-publish")]
pub use sink::RedisPublisher;
