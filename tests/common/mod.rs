#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use pirwatch::SysfsGpio;

/// A throwaway directory laid out like /sys/class/gpio.
pub struct GpioTree {
    root: PathBuf,
}

impl GpioTree {
    pub fn new(tag: &str) -> Self {
        let root = env::temp_dir().join(format!("pirwatch-{}-{tag}", process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).expect("create gpio root");
        Self { root }
    }

    pub fn export(&self, pin: &str, direction: &str, edge: &str, value: &str) -> &Self {
        let dir = self.root.join(format!("gpio{pin}"));
        fs::create_dir_all(&dir).expect("create pin dir");
        fs::write(dir.join("direction"), direction).expect("write direction");
        fs::write(dir.join("edge"), edge).expect("write edge");
        fs::write(dir.join("value"), value).expect("write value");
        self
    }

    pub fn set_value(&self, pin: &str, value: &str) {
        fs::write(self.root.join(format!("gpio{pin}")).join("value"), value).expect("write value");
    }

    pub fn remove(&self, pin: &str, attr: &str) {
        fs::remove_file(self.root.join(format!("gpio{pin}")).join(attr)).expect("remove attr");
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn gpio(&self) -> SysfsGpio {
        SysfsGpio::new(&self.root)
    }
}

impl Drop for GpioTree {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
