pub mod observers;
mod pipeline;

pub use pipeline::{BuildCfg, EarlyOptimizations, WarnFunctionReturn};

use crate::{
    ast::{FunctionDecl, TranslationUnit},
    diagnostics::FunctionContext,
};

/// Name of the early return-warning pass. It runs once per function, after
/// body information exists, which makes it the anchor point for observers
/// that want exactly one early look at each function.
pub const WARN_FUNCTION_RETURN: &str = "warn-function-return";

pub trait Pass {
    fn name(&self) -> &'static str;
    fn run(&self, function: &FunctionDecl);
}

/// Callback registered for the pass-execution extension point. Invoked
/// after every pass completes for every function body; implementations
/// filter down to the passes they care about, must not block, and must not
/// retain references beyond the call.
pub trait PassObserver {
    fn on_pass_executed(&self, pass: &dyn Pass, function: &FunctionDecl);
}

pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
    observers: Vec<Box<dyn PassObserver>>,
}

impl PassManager {
    pub fn new(passes: Vec<Box<dyn Pass>>) -> Self {
        Self {
            passes,
            observers: Vec::new(),
        }
    }

    pub fn with_default_passes() -> Self {
        Self::new(vec![
            Box::new(BuildCfg),
            Box::new(WarnFunctionReturn),
            Box::new(EarlyOptimizations),
        ])
    }

    pub fn register_observer(&mut self, observer: Box<dyn PassObserver>) {
        self.observers.push(observer);
    }

    /// Drives the pipeline over every function definition in the unit.
    /// Prototypes carry no body and never enter the pipeline. Each pass is
    /// followed by one synchronous callback round over the observers.
    pub fn run(&self, unit: &TranslationUnit) {
        for function in unit.functions.iter().filter(|f| f.is_definition()) {
            crate::DIAGNOSTICS.with(|d| {
                d.collector.borrow_mut().enter_function(FunctionContext {
                    name: function.name.name.clone(),
                    file: function.location.file.clone(),
                })
            });

            for pass in &self.passes {
                pass.run(function);
                for observer in &self.observers {
                    observer.on_pass_executed(pass.as_ref(), function);
                }
            }

            crate::DIAGNOSTICS.with(|d| d.collector.borrow_mut().leave_function());
        }
    }
}
