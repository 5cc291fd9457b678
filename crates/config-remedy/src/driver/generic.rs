//! Generic driver: default behavior, no rules

use std::sync::Arc;

use crate::error::Result;
use crate::rules::DriverRules;

use super::{Driver, Platform, PlatformHooks};

#[derive(Debug)]
struct Generic;

impl PlatformHooks for Generic {
    fn platform(&self) -> Platform {
        Platform::Generic
    }
}

pub(super) fn driver() -> Result<Driver> {
    Ok(Driver::new(DriverRules::default(), Arc::new(Generic)))
}
