//! ## Crate layout
//! - `core`: filter trees, marker rules, the rewrite pass, evaluation, metrics.
//! - `config`: TOML configuration for the plugin.
//! - `pipeline`: named hooks around the builtin compile stage.
//! - `plugin`: the `Plugin` trait and the `Qonvert` rewrite plugin.
//! - `sql`: compilation of statements into placeholder SQL.
//! - `statement`: one query under construction plus its settings.
//!
//! ```ignore
//! use qonvert::prelude::*;
//!
//! let plugin = Qonvert::new(&MarkerConfig::standard())?;
//! let mut pipeline = QueryPipeline::new();
//! pipeline.install(&plugin)?;
//!
//! let mut statement = Statement::new("people").where_eq("age", ">=30");
//! let compiled = pipeline.execute(&mut statement);
//! assert_eq!(compiled.sql, "SELECT * FROM people WHERE age >= ?");
//! ```

pub use qonvert_config as config;
pub use qonvert_core as core;

mod error;
pub mod pipeline;
pub mod plugin;
pub mod sql;
pub mod statement;

pub use error::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        config::QonvertConfig,
        pipeline::{QUERY_STAGE, QueryPipeline},
        plugin::{Plugin, Qonvert},
        sql::CompiledQuery,
        statement::Statement,
    };
    pub use qonvert_core::prelude::*;
}
