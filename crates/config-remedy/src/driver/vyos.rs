//! VyOS driver

use std::sync::Arc;

use crate::error::Result;
use crate::rules::DriverRules;

use super::{Driver, Platform, PlatformHooks};

#[derive(Debug)]
struct Vyos;

impl PlatformHooks for Vyos {
    fn platform(&self) -> Platform {
        Platform::Vyos
    }

    fn negation_prefix(&self) -> &'static str {
        "delete "
    }

    fn declaration_prefix(&self) -> &'static str {
        "set "
    }

    /// Toggle between `set ` and `delete `; text carrying neither prefix is
    /// left untouched.
    fn swap_negation(&self, text: &str) -> Result<String> {
        if let Some(stripped) = text.strip_prefix(self.negation_prefix()) {
            return Ok(format!("{}{stripped}", self.declaration_prefix()));
        }
        if let Some(stripped) = text.strip_prefix(self.declaration_prefix()) {
            return Ok(format!("{}{stripped}", self.negation_prefix()));
        }
        Ok(text.to_string())
    }
}

pub(super) fn driver() -> Result<Driver> {
    Ok(Driver::new(DriverRules::default(), Arc::new(Vyos)))
}
