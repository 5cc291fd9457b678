//! HP Comware 5 driver

use std::sync::Arc;

use crate::error::Result;
use crate::rules::DriverRules;

use super::{Driver, Platform, PlatformHooks};

#[derive(Debug)]
struct HpComware5;

impl PlatformHooks for HpComware5 {
    fn platform(&self) -> Platform {
        Platform::HpComware5
    }

    fn negation_prefix(&self) -> &'static str {
        "undo "
    }
}

pub(super) fn driver() -> Result<Driver> {
    Ok(Driver::new(DriverRules::default(), Arc::new(HpComware5)))
}
