use crate::{
    ast::FunctionDecl,
    diagnostics::inform,
    passes::{Pass, PassObserver, WARN_FUNCTION_RETURN},
    span::SourceLocation,
};

/// Emits an informational note for every formal parameter whose declared
/// type is exactly a record (struct/union) type. Functions that originate
/// in system headers are skipped.
pub struct NontrivialParamAdvisor;

fn in_system_header(location: &SourceLocation) -> bool {
    if let Some(flag) = location.system_header {
        return flag;
    }

    // No preprocessor verdict for this location; approximate from the
    // path. /usr/src/debug holds unpacked debuginfo sources, which are
    // not system headers.
    let path = location.file.to_string_lossy();
    path.starts_with("/usr/") && !path.starts_with("/usr/src/debug/")
}

impl PassObserver for NontrivialParamAdvisor {
    fn on_pass_executed(&self, pass: &dyn Pass, function: &FunctionDecl) {
        // The pipeline calls back after every pass; act under exactly one.
        if pass.name() != WARN_FUNCTION_RETURN {
            return;
        }

        if in_system_header(&function.location) {
            return;
        }

        for (param, param_type) in function
            .parameters
            .iter()
            .zip(function.ty.parameter_types.iter())
        {
            if param_type.kind.is_record() {
                inform(param.location.clone(), "parameter type is not trivial");
            }
        }
    }
}
