use crate::{
    Error,
    plugin::Plugin,
    sql::{CompiledQuery, compile_statement},
    statement::Statement,
};
use std::{fmt, sync::Arc};
use thiserror::Error as ThisError;

/// Name of the builtin stage that compiles the statement.
pub const QUERY_STAGE: &str = "query";

/// Hook run against a statement before (or after) it is compiled.
pub type Callback = Arc<dyn Fn(&mut Statement) + Send + Sync>;

///
/// PipelineError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PipelineError {
    #[error("callback '{name}' is already registered")]
    DuplicateCallback { name: String },

    #[error("plugin '{name}' is already installed")]
    DuplicatePlugin { name: String },

    #[error("no stage named '{anchor}' to register before")]
    UnknownAnchor { anchor: String },
}

///
/// Stage
///

#[derive(Clone)]
enum Stage {
    Compile,
    Hook { name: String, callback: Callback },
}

impl Stage {
    const fn name(&self) -> &str {
        match self {
            Self::Compile => QUERY_STAGE,
            Self::Hook { name, .. } => name.as_str(),
        }
    }
}

///
/// QueryPipeline
///
/// Ordered list of named hooks around one builtin compile stage.
/// Plugins hook in by name, typically just before `QUERY_STAGE`.
///

#[derive(Clone)]
pub struct QueryPipeline {
    stages: Vec<Stage>,
    plugins: Vec<String>,
}

impl QueryPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stages: vec![Stage::Compile],
            plugins: Vec::new(),
        }
    }

    /// Append a hook after every existing stage.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        callback: Callback,
    ) -> Result<(), PipelineError> {
        let name = self.check_unique(name.into())?;
        self.stages.push(Stage::Hook { name, callback });

        Ok(())
    }

    /// Insert a hook directly before the stage named `anchor`.
    pub fn register_before(
        &mut self,
        anchor: &str,
        name: impl Into<String>,
        callback: Callback,
    ) -> Result<(), PipelineError> {
        let name = self.check_unique(name.into())?;
        let index = self
            .stages
            .iter()
            .position(|stage| stage.name() == anchor)
            .ok_or_else(|| PipelineError::UnknownAnchor {
                anchor: anchor.to_string(),
            })?;
        self.stages.insert(index, Stage::Hook { name, callback });

        Ok(())
    }

    /// Install a plugin; each plugin name may be installed once.
    pub fn install(&mut self, plugin: &dyn Plugin) -> Result<(), Error> {
        let name = plugin.name().to_string();
        if self.plugins.contains(&name) {
            return Err(PipelineError::DuplicatePlugin { name }.into());
        }

        plugin.initialize(self)?;
        self.plugins.push(name);

        Ok(())
    }

    /// Run every stage in order and return the compiled query.
    pub fn execute(&self, statement: &mut Statement) -> CompiledQuery {
        let mut compiled = CompiledQuery::default();

        for stage in &self.stages {
            match stage {
                Stage::Compile => compiled = compile_statement(statement),
                Stage::Hook { callback, .. } => callback(&mut *statement),
            }
        }

        compiled
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    #[must_use]
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    fn check_unique(&self, name: String) -> Result<String, PipelineError> {
        if self.stages.iter().any(|stage| stage.name() == name) {
            return Err(PipelineError::DuplicateCallback { name });
        }

        Ok(name)
    }
}

impl Default for QueryPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("stages", &self.stage_names())
            .field("plugins", &self.plugins)
            .finish()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use qonvert_core::{expr::FilterExpr, value::Value};

    fn tag(label: &'static str) -> Callback {
        Arc::new(move |statement: &mut Statement| {
            statement.insert_setting(label, true);
        })
    }

    #[test]
    fn new_pipeline_only_compiles() {
        let pipeline = QueryPipeline::new();
        let mut statement = Statement::new("people").where_eq("name", "amy");

        assert_eq!(pipeline.stage_names(), vec![QUERY_STAGE]);
        assert_eq!(
            pipeline.execute(&mut statement).sql,
            "SELECT * FROM people WHERE name = ?"
        );
    }

    #[test]
    fn register_before_inserts_ahead_of_anchor() {
        let mut pipeline = QueryPipeline::new();
        pipeline
            .register("after", tag("after"))
            .expect("append should succeed");
        pipeline
            .register_before(QUERY_STAGE, "first", tag("first"))
            .expect("insert should succeed");
        pipeline
            .register_before(QUERY_STAGE, "second", tag("second"))
            .expect("insert should succeed");

        assert_eq!(
            pipeline.stage_names(),
            vec!["first", "second", QUERY_STAGE, "after"]
        );
    }

    #[test]
    fn hooks_before_compile_shape_the_query() {
        let mut pipeline = QueryPipeline::new();
        pipeline
            .register_before(
                QUERY_STAGE,
                "narrow",
                Arc::new(|statement: &mut Statement| {
                    statement.push_filter(FilterExpr::eq("active", true));
                }),
            )
            .expect("insert should succeed");

        let mut statement = Statement::new("people").where_eq("name", "amy");
        let compiled = pipeline.execute(&mut statement);

        assert_eq!(
            compiled.sql,
            "SELECT * FROM people WHERE name = ? AND active = ?"
        );
        assert_eq!(compiled.args, vec![Value::from("amy"), Value::Bool(true)]);
    }

    #[test]
    fn hooks_after_compile_do_not_change_the_query() {
        let mut pipeline = QueryPipeline::new();
        pipeline
            .register(
                "late",
                Arc::new(|statement: &mut Statement| {
                    statement.push_filter(FilterExpr::eq("late", true));
                }),
            )
            .expect("append should succeed");

        let mut statement = Statement::new("people");
        let compiled = pipeline.execute(&mut statement);

        assert_eq!(compiled.sql, "SELECT * FROM people");
        assert!(statement.filter().is_some());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut pipeline = QueryPipeline::new();
        pipeline
            .register("hook", tag("a"))
            .expect("append should succeed");

        assert_eq!(
            pipeline.register_before(QUERY_STAGE, "hook", tag("b")),
            Err(PipelineError::DuplicateCallback {
                name: "hook".to_string()
            })
        );
        assert_eq!(
            pipeline.register(QUERY_STAGE, tag("c")),
            Err(PipelineError::DuplicateCallback {
                name: QUERY_STAGE.to_string()
            })
        );
    }

    #[test]
    fn unknown_anchor_is_rejected() {
        let mut pipeline = QueryPipeline::new();

        assert_eq!(
            pipeline.register_before("missing", "hook", tag("a")),
            Err(PipelineError::UnknownAnchor {
                anchor: "missing".to_string()
            })
        );
        assert_eq!(pipeline.stage_names(), vec![QUERY_STAGE]);
    }
}
