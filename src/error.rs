use std::io;

use nix::errno::Errno;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),
    #[error("GPIO pin not numeric. ({0})")]
    PinNotNumeric(String),
    #[error("Redis port not numeric. ({0})")]
    PortNotNumeric(String),
    #[error("GPIO pin does not appear to be exported. ({0})")]
    NotExported(#[source] io::Error),
    #[error("Unable to open GPIO {attr} config. ({source})")]
    AttributeOpen {
        attr: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read GPIO {attr} config. ({source})")]
    AttributeRead {
        attr: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read GPIO {0} config. (No data)")]
    AttributeEmpty(&'static str),
    #[error("GPIO pin is not set to input mode. ({0})")]
    NotInput(char),
    #[error("GPIO pin is not set to detect rising edges. ({0})")]
    NotRisingEdge(char),
    #[error("Unable to open GPIO value. ({0})")]
    ValueOpen(#[source] io::Error),
    #[error("Failed to read GPIO value. ({0})")]
    ValueRead(#[source] io::Error),
    #[error("Failed to read GPIO value. (No data)")]
    ValueEmpty,
    #[error("Failed to poll for GPIO value. ({0})")]
    Wait(#[source] Errno),
    #[error("Unable to connect to Redis. ({0})")]
    Connect(String),
    #[error("Failed to send PUBLISH command to Redis. ({0})")]
    Publish(String),
    #[error("Failed to write motion event. ({0})")]
    Output(#[from] io::Error),
}
