//! Name filters
//!
//! Pattern lists from the settings are compiled once per configuration
//! change into immutable [`Matcher`] values. Precedence between filters is
//! decided by the callers: an include match always beats an exclude match.

mod matcher;

pub use matcher::{FilterError, Matcher};

use crate::config::Settings;

/// The compiled filter set in play for one configuration
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Items pulled into every new scope
    pub include: Matcher,
    /// Items dropped from new scopes (unless included)
    pub exclude: Matcher,
    /// Items omitted from computed lists unless explicitly requested
    pub hidden: Matcher,
    /// Items destructive operations must never destroy
    pub kill_exclude: Matcher,
}

impl Filters {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            include: Matcher::compile(&settings.include),
            exclude: Matcher::compile(&settings.exclude),
            hidden: Matcher::compile(&settings.hidden),
            kill_exclude: Matcher::compile(&settings.kill_exclude),
        }
    }

    /// Strict variant of [`Filters::from_settings`]
    pub fn try_from_settings(settings: &Settings) -> Result<Self, FilterError> {
        Ok(Self {
            include: Matcher::try_compile(&settings.include)?,
            exclude: Matcher::try_compile(&settings.exclude)?,
            hidden: Matcher::try_compile(&settings.hidden)?,
            kill_exclude: Matcher::try_compile(&settings.kill_exclude)?,
        })
    }
}
