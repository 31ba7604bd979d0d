use crate::{
    ast::{FunctionDecl, TypeKind},
    diagnostics::builders,
    passes::{Pass, WARN_FUNCTION_RETURN},
};

/// Stage after which a function's body summary is available. The front
/// end records body facts while parsing, so there is nothing left to
/// compute here; the stage exists as the pipeline's anchor point.
pub struct BuildCfg;

impl Pass for BuildCfg {
    fn name(&self) -> &'static str {
        "cfg"
    }

    fn run(&self, _function: &FunctionDecl) {}
}

/// Warns when a non-void function definition falls off the end of its
/// body without a `return`.
pub struct WarnFunctionReturn;

impl Pass for WarnFunctionReturn {
    fn name(&self) -> &'static str {
        WARN_FUNCTION_RETURN
    }

    fn run(&self, function: &FunctionDecl) {
        if let Some(body) = &function.body
            && !matches!(function.ty.return_type.kind, TypeKind::Void)
            && !body.has_return
        {
            let diagnostic = builders::warning("control reaches end of non-void function")
                .with_location(function.location.clone());
            crate::DIAGNOSTICS.with(|d| d.collector.borrow_mut().add(diagnostic));
        }
    }
}

/// Terminal stage of the early pipeline.
pub struct EarlyOptimizations;

impl Pass for EarlyOptimizations {
    fn name(&self) -> &'static str {
        "early-optimizations"
    }

    fn run(&self, _function: &FunctionDecl) {}
}
