use log::debug;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::os::fd::AsFd;
use std::path::{Path, PathBuf};

use nix::poll::{PollFd, PollFlags, PollTimeout, poll};

use crate::config::PinId;
use crate::error::AppError;
use crate::gpio::{Direction, EdgeMode, ValueSource};

/// Access to the legacy `/sys/class/gpio` attribute interface.
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn pin_dir(&self, pin: &PinId) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }

    pub fn attribute_path(&self, pin: &PinId, attr: &str) -> PathBuf {
        self.pin_dir(pin).join(attr)
    }

    /// First character of a pin attribute such as `direction` or `edge`.
    pub fn read_attribute(&self, pin: &PinId, attr: &'static str) -> Result<u8, AppError> {
        let path = self.attribute_path(pin, attr);
        let mut file =
            File::open(&path).map_err(|source| AppError::AttributeOpen { attr, source })?;

        match read_byte(&mut file) {
            Ok(Some(c)) => {
                debug!("{} = {:?}", path.display(), char::from(c));
                Ok(c)
            }
            Ok(None) => Err(AppError::AttributeEmpty(attr)),
            Err(source) => Err(AppError::AttributeRead { attr, source }),
        }
    }

    /// Checks the pin is exported, an input, and raises rising edges.
    pub fn validate(&self, pin: &PinId) -> Result<(), AppError> {
        fs::metadata(self.pin_dir(pin)).map_err(AppError::NotExported)?;

        let direction = self.read_attribute(pin, "direction")?;
        if Direction::from_attr(direction) != Some(Direction::Input) {
            return Err(AppError::NotInput(char::from(direction)));
        }

        let edge = self.read_attribute(pin, "edge")?;
        if !EdgeMode::from_attr(edge).is_some_and(|e| e.reports_rising()) {
            return Err(AppError::NotRisingEdge(char::from(edge)));
        }

        Ok(())
    }

    /// Opens the value attribute, checks it yields a level and drains it so
    /// the first wait only returns on a real change.
    pub fn open_value(&self, pin: &PinId) -> Result<SysfsValue, AppError> {
        let file = File::open(self.attribute_path(pin, "value")).map_err(AppError::ValueOpen)?;
        let mut value = SysfsValue { file };

        match read_byte(&mut value.file) {
            Ok(Some(c)) => debug!("GPIO {pin} initial value {:?}", char::from(c)),
            Ok(None) => return Err(AppError::ValueEmpty),
            Err(e) => return Err(AppError::ValueRead(e)),
        }
        value.drain().map_err(AppError::ValueRead)?;

        Ok(value)
    }
}

/// An open `value` attribute. Closed on drop.
pub struct SysfsValue {
    file: File,
}

impl SysfsValue {
    fn drain(&mut self) -> io::Result<u64> {
        io::copy(&mut self.file, &mut io::sink())
    }
}

impl ValueSource for SysfsValue {
    fn wait_for_change(&mut self) -> Result<(), AppError> {
        let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLPRI)];
        poll(&mut fds, PollTimeout::NONE).map_err(AppError::Wait)?;
        Ok(())
    }

    fn read_latest(&mut self) -> Result<Option<u8>, AppError> {
        self.file
            .seek(SeekFrom::Start(0))
            .map_err(AppError::ValueRead)?;
        let value = read_byte(&mut self.file).map_err(AppError::ValueRead)?;
        self.drain().map_err(AppError::ValueRead)?;
        Ok(value)
    }
}

fn read_byte<R: Read>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
