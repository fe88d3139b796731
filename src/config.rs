use std::fmt;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};
use serde::Serialize;

use crate::error::AppError;

pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// Watch a GPIO-attached PIR sensor and report every rising edge.
#[derive(Debug, Parser)]
#[command(name = "pirwatch", version)]
pub struct Opts {
    /// GPIO pin number, exported and configured as an edge-triggered input.
    #[arg(allow_hyphen_values = true)]
    pub pin: String,

    /// Optional Redis target, given as all four of: <server> <port> <channel> <message>.
    /// Taken verbatim, so options must come before the pin.
    #[arg(value_name = "REDIS", allow_hyphen_values = true, trailing_var_arg = true)]
    pub remote: Vec<String>,

    /// How detected motion is written to standard output.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Timestamp)]
    pub format: OutputFormat,

    /// Directory holding the per-pin gpioN attribute directories.
    #[arg(long, env = "PIRWATCH_GPIO_ROOT", default_value = DEFAULT_GPIO_ROOT)]
    pub gpio_root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// A single `.` per event, no newline.
    Dot,
    /// `<unix seconds> motion detected` per event.
    #[default]
    Timestamp,
    /// One JSON object per event.
    Json,
}

/// A GPIO line number as given on the command line. Only decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PinId(String);

impl PinId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if !is_numeric(raw) {
            return Err(AppError::PinNotNumeric(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub server: String,
    pub port: u16,
    pub channel: String,
    pub message: String,
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} channel {}", self.server, self.port, self.channel)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pin: PinId,
    pub format: OutputFormat,
    pub gpio_root: PathBuf,
    pub remote: Option<RemoteTarget>,
}

impl AppConfig {
    pub fn from_opts(opts: Opts) -> Result<Self, AppError> {
        let remote = match opts.remote.as_slice() {
            [] => None,
            [server, port, channel, message] => Some((server, port, channel, message)),
            _ => return Err(AppError::Usage(usage())),
        };

        let pin = PinId::parse(&opts.pin)?;

        let remote = match remote {
            Some((server, port, channel, message)) => Some(RemoteTarget {
                server: server.clone(),
                port: parse_port(port)?,
                channel: channel.clone(),
                message: message.clone(),
            }),
            None => None,
        };

        Ok(Self {
            pin,
            format: opts.format,
            gpio_root: opts.gpio_root,
            remote,
        })
    }

    /// Parse a full argument vector, program name first.
    pub fn from_args<I, T>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let opts = Opts::try_parse_from(args).map_err(|e| AppError::Usage(e.to_string()))?;
        Self::from_opts(opts)
    }
}

pub fn usage() -> String {
    format!(
        "{}\n  REDIS is <server> <port> <channel> <message>, all four or none",
        Opts::command().render_usage()
    )
}

fn is_numeric(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

fn parse_port(raw: &str) -> Result<u16, AppError> {
    if !is_numeric(raw) {
        return Err(AppError::PortNotNumeric(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| AppError::PortNotNumeric(raw.to_string()))
}
