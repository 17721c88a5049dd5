//! Execution contexts.
//!
//! One [`TopLevelContext`] lives as long as the harness and holds what every
//! script sees on entry. Each submission runs in its own [`ExecutionContext`]
//! derived from it, so variables never leak between runs while canvas state
//! does.

use std::sync::atomic::{AtomicBool, Ordering};

use rhai::{Dynamic, Engine, Scope, AST};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ScriptError, ScriptResult};
use crate::fault::ScriptFault;

/// Identifies one script submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    /// Create a new random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The shared parent every execution context is derived from.
#[derive(Debug, Clone)]
pub struct TopLevelContext {
    constants: Vec<(&'static str, Dynamic)>,
}

impl TopLevelContext {
    /// Create the parent context with the gradient direction constants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            constants: vec![
                ("HORIZONTAL", Dynamic::from("horizontal")),
                ("VERTICAL", Dynamic::from("vertical")),
            ],
        }
    }

    /// Names of the constants visible to every script.
    pub fn constant_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constants.iter().map(|(name, _)| *name)
    }

    /// Derive a child context for `source`, compiling it with `engine`.
    ///
    /// # Errors
    ///
    /// Returns the syntax fault if `source` does not parse.
    pub fn child(
        &self,
        id: ExecutionId,
        engine: &Engine,
        source: &str,
    ) -> Result<ExecutionContext, ScriptFault> {
        let ast = engine.compile(source).map_err(|err| {
            let err: Box<rhai::EvalAltResult> = err.into();
            ScriptFault::from_eval_error(*err, source)
        })?;

        let mut scope = Scope::new();
        for (name, value) in &self.constants {
            scope.push_constant_dynamic(*name, value.clone());
        }

        tracing::debug!("Execution context {id} created");
        Ok(ExecutionContext {
            id,
            source: source.to_string(),
            ast,
            scope,
            done: AtomicBool::new(false),
        })
    }
}

impl Default for TopLevelContext {
    fn default() -> Self {
        Self::new()
    }
}

/// One compiled script and its private variable scope.
#[derive(Debug)]
pub struct ExecutionContext {
    id: ExecutionId,
    source: String,
    ast: AST,
    scope: Scope<'static>,
    done: AtomicBool,
}

impl ExecutionContext {
    /// This context's id.
    #[must_use]
    pub fn id(&self) -> ExecutionId {
        self.id
    }

    /// The source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the context has finished. A done context never evaluates again.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }

    /// Mark the context finished.
    pub fn set_done(&self) {
        self.done.store(true, Ordering::SeqCst);
    }

    /// Evaluate the script.
    ///
    /// On an interpreter error the context is marked done before the fault is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::ContextDone`] if the context already finished.
    pub fn evaluate(&mut self, engine: &Engine) -> ScriptResult<Result<Dynamic, ScriptFault>> {
        if self.is_done() {
            return Err(ScriptError::ContextDone(self.id.to_string()));
        }

        let result = engine.eval_ast_with_scope::<Dynamic>(&mut self.scope, &self.ast);
        self.set_done();
        Ok(result.map_err(|err| ScriptFault::from_eval_error(*err, &self.source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::FaultCode;

    #[test]
    fn test_child_sees_constants() {
        let engine = Engine::new();
        let top = TopLevelContext::new();
        let mut ctx = top.child(ExecutionId::new(), &engine, "VERTICAL").expect("compiles");

        let value = ctx.evaluate(&engine).expect("not done").expect("runs");
        assert_eq!(value.to_string(), "vertical");
        assert_eq!(top.constant_names().collect::<Vec<_>>(), ["HORIZONTAL", "VERTICAL"]);
    }

    #[test]
    fn test_children_do_not_share_variables() {
        let engine = Engine::new();
        let top = TopLevelContext::new();

        let mut first = top.child(ExecutionId::new(), &engine, "let leaked = 1;").expect("compiles");
        first.evaluate(&engine).expect("not done").expect("runs");

        let mut second = top.child(ExecutionId::new(), &engine, "leaked").expect("compiles");
        let fault = second
            .evaluate(&engine)
            .expect("not done")
            .expect_err("variable is private to the first context");
        assert_eq!(fault.code, FaultCode::VariableNotFound);
    }

    #[test]
    fn test_syntax_error_at_creation() {
        let engine = Engine::new();
        let fault = TopLevelContext::new()
            .child(ExecutionId::new(), &engine, "let x = ;")
            .expect_err("does not parse");
        assert_eq!(fault.code, FaultCode::Syntax);
        assert_eq!(fault.location.map(|l| l.line), Some(1));
    }

    #[test]
    fn test_done_context_refuses_to_run() {
        let engine = Engine::new();
        let mut ctx = TopLevelContext::new()
            .child(ExecutionId::new(), &engine, "1 + 1")
            .expect("compiles");
        ctx.evaluate(&engine).expect("first run").expect("runs");

        assert!(ctx.is_done());
        assert!(matches!(
            ctx.evaluate(&engine),
            Err(ScriptError::ContextDone(_))
        ));
    }

    #[test]
    fn test_constants_are_read_only() {
        let engine = Engine::new();
        let mut ctx = TopLevelContext::new()
            .child(ExecutionId::new(), &engine, "HORIZONTAL = 1;")
            .expect("compiles");
        let fault = ctx
            .evaluate(&engine)
            .expect("not done")
            .expect_err("constant");
        assert_eq!(fault.code, FaultCode::ConstantAssignment);
    }
}
