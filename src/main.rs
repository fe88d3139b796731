use log::info;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use pirwatch::config::Opts;
use pirwatch::sink::{self, EventSink};
use pirwatch::{AppConfig, AppError, EdgeWatcher, SysfsGpio};

fn main() -> ExitCode {
    env_logger::init();

    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: Opts) -> Result<(), AppError> {
    let config = AppConfig::from_opts(opts)?;

    let gpio = SysfsGpio::new(&config.gpio_root);
    gpio.validate(&config.pin)?;
    let value = gpio.open_value(&config.pin)?;
    info!("GPIO {} is an armed input", config.pin);

    let sink = event_sink(&config)?;

    EdgeWatcher::new(config.pin.clone(), value, sink).run()
}

#[cfg(feature = "redis-publish")]
fn event_sink(config: &AppConfig) -> Result<Box<dyn EventSink>, AppError> {
    use pirwatch::{PublishingSink, RedisPublisher};

    let printer = sink::printer(config.format, io::stdout());
    match &config.remote {
        Some(target) => {
            let publisher = RedisPublisher::connect(target)?;
            Ok(Box::new(PublishingSink::new(
                publisher,
                target.channel.clone(),
                target.message.clone(),
                printer,
            )))
        }
        None => Ok(printer),
    }
}

#[cfg(not(feature = "redis-publish"))]
fn event_sink(config: &AppConfig) -> Result<Box<dyn EventSink>, AppError> {
    if config.remote.is_some() {
        return Err(AppError::Usage(
            "Redis publishing is not available in this build".into(),
        ));
    }
    Ok(sink::printer(config.format, io::stdout()))
}
