//! Device tag carried by distributed tensors

use std::fmt;

/// Opaque device tag
///
/// Shards always live in host memory; the tag only travels with a tensor so
/// that results can inherit the device of their operands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Device {
    id: usize,
}

impl Device {
    /// The host CPU
    pub const fn cpu() -> Self {
        Self { id: 0 }
    }

    /// A device with an explicit id
    pub const fn new(id: usize) -> Self {
        Self { id }
    }

    /// Device id
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Human-readable name
    pub fn name(&self) -> String {
        if self.id == 0 {
            "cpu".to_string()
        } else {
            format!("cpu:{}", self.id)
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
