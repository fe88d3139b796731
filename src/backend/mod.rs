pub mod mock;
pub mod sysfs;

pub use mock::{MockPublisher, MockValueSource, Wake};
pub use sysfs::{SysfsGpio, SysfsValue};
