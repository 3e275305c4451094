use crate::{
    Error,
    pipeline::{PipelineError, QUERY_STAGE, QueryPipeline},
    statement::Statement,
};
use qonvert_config::QonvertConfig;
use qonvert_core::{
    gate::{Activation, GateSignal},
    obs::{MetricsEvent, SkipReason, record},
    rewrite::rewrite_in_place,
    rule::{MarkerConfig, PrefixRuleTable},
};
use std::sync::Arc;

///
/// Plugin
///
/// Something that hooks itself into a `QueryPipeline` once, at install
/// time.
///

pub trait Plugin {
    fn name(&self) -> &str;

    fn initialize(&self, pipeline: &mut QueryPipeline) -> Result<(), PipelineError>;
}

///
/// Qonvert
///
/// Rewrites marked equality and membership filters into comparisons just
/// before a statement is compiled.
///
/// With `Activation::Always` every statement is rewritten unless it sets
/// `"qonvert"` to `false`. With `Activation::SettingOnly` only statements
/// that set `"qonvert"` to `true` are rewritten.
///

#[derive(Clone, Debug)]
pub struct Qonvert {
    rules: Arc<PrefixRuleTable>,
    activation: Activation,
}

impl Qonvert {
    pub const NAME: &'static str = "qonvert";

    /// Statement setting that carries the per-query gate.
    pub const SETTING_KEY: &'static str = "qonvert";

    /// Callback name registered in the pipeline.
    pub const CALLBACK: &'static str = "qonvert:query";

    /// Build a plugin that rewrites every query by default.
    pub fn new(markers: &MarkerConfig) -> Result<Self, Error> {
        Ok(Self {
            rules: Arc::new(PrefixRuleTable::new(markers)?),
            activation: Activation::Always,
        })
    }

    pub fn from_config(config: &QonvertConfig) -> Result<Self, Error> {
        Ok(Self::new(&config.markers)?.with_activation(config.activation))
    }

    /// Only rewrite queries that explicitly opt in.
    #[must_use]
    pub const fn setting_only(self) -> Self {
        self.with_activation(Activation::SettingOnly)
    }

    #[must_use]
    pub const fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &PrefixRuleTable {
        &self.rules
    }

    #[must_use]
    pub const fn activation(&self) -> Activation {
        self.activation
    }

    /// Read the gate from a statement's settings.
    ///
    /// A missing setting is `Unset`; a boolean maps directly; any other
    /// value counts as `Off`.
    #[must_use]
    pub fn gate_signal(statement: &Statement) -> GateSignal {
        match statement.setting(Self::SETTING_KEY) {
            None => GateSignal::Unset,
            Some(value) => match value.as_bool() {
                Some(true) => GateSignal::On,
                Some(false) | None => GateSignal::Off,
            },
        }
    }

    /// Rewrite the statement's filter if the gate allows it.
    /// Returns whether the filter was replaced.
    pub fn apply(&self, statement: &mut Statement) -> bool {
        let signal = Self::gate_signal(statement);
        if !self.activation.allows(signal) {
            let reason = match signal {
                GateSignal::Unset => SkipReason::GateUnset,
                GateSignal::On | GateSignal::Off => SkipReason::GateOff,
            };
            record(MetricsEvent::RewriteSkipped { reason });
            return false;
        }

        let Some(filter) = statement.filter_mut() else {
            record(MetricsEvent::RewriteSkipped {
                reason: SkipReason::NoFilter,
            });
            return false;
        };

        record(MetricsEvent::RewriteStart);
        rewrite_in_place(&self.rules, filter)
    }
}

impl Plugin for Qonvert {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn initialize(&self, pipeline: &mut QueryPipeline) -> Result<(), PipelineError> {
        let plugin = self.clone();

        pipeline.register_before(
            QUERY_STAGE,
            Self::CALLBACK,
            Arc::new(move |statement: &mut Statement| {
                plugin.apply(statement);
            }),
        )
    }
}

///
/// TESTS
///
