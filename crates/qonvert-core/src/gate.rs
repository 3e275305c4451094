use serde::{Deserialize, Serialize};

///
/// GateSignal
///
/// Per-query opt-in/opt-out, resolved by the caller from whatever
/// side-channel carries query settings.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GateSignal {
    On,
    Off,
    #[default]
    Unset,
}

impl From<Option<bool>> for GateSignal {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::On,
            Some(false) => Self::Off,
            None => Self::Unset,
        }
    }
}

///
/// Activation
///
/// `Always` rewrites every query that does not opt out.
/// `SettingOnly` rewrites only queries that explicitly opt in.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Always,
    SettingOnly,
}

impl Activation {
    /// Whether a query carrying `signal` should be rewritten.
    #[must_use]
    pub const fn allows(self, signal: GateSignal) -> bool {
        match signal {
            GateSignal::On => true,
            GateSignal::Off => false,
            GateSignal::Unset => matches!(self, Self::Always),
        }
    }
}

///
/// TESTS
///
