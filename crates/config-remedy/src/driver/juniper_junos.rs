//! Juniper JunOS driver
//!
//! JunOS configurations are handled in set-format; brace-format input is
//! flattened by the preprocessor before parsing.

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::{ConfigRemedyError, Result};
use crate::parser::convert_to_set_commands;
use crate::rules::DriverRules;

use super::{Driver, Platform, PlatformHooks};

#[derive(Debug)]
struct JuniperJunos;

impl PlatformHooks for JuniperJunos {
    fn platform(&self) -> Platform {
        Platform::JuniperJunos
    }

    fn negation_prefix(&self) -> &'static str {
        "delete "
    }

    fn declaration_prefix(&self) -> &'static str {
        "set "
    }

    fn swap_negation(&self, text: &str) -> Result<String> {
        if let Some(stripped) = text.strip_prefix(self.negation_prefix()) {
            return Ok(format!("{}{stripped}", self.declaration_prefix()));
        }
        if let Some(stripped) = text.strip_prefix(self.declaration_prefix()) {
            return Ok(format!("{}{stripped}", self.negation_prefix()));
        }
        Err(ConfigRemedyError::Negation(format!(
            "`{text}` did not start with `{}` or `{}`",
            self.negation_prefix(),
            self.declaration_prefix(),
        )))
    }

    fn config_preprocessor<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Owned(convert_to_set_commands(text))
    }
}

pub(super) fn driver() -> Result<Driver> {
    Ok(Driver::new(DriverRules::default(), Arc::new(JuniperJunos)))
}
