use crate::pipeline::PipelineError;
use qonvert_config::ConfigError;
use qonvert_core::rule::RuleError;
use thiserror::Error as ThisError;

///
/// Error
///
/// Everything that can go wrong while building or installing the plugin.
/// Rewriting itself never fails.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Rule(#[from] RuleError),
}
