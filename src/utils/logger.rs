//! Structured logging helpers.
//!
//! Registration steps are logged as operations with a start, a completion
//! with timing, or a failure, each with a short key/value context. Media key
//! presses themselves stay on plain `log::debug!`.

use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationPhase {
    Start,
    Complete { duration_ms: u64 },
    Failed { error: String },
}

/// Log one phase of a named operation.
pub fn log_operation(name: &str, phase: OperationPhase, context: &[(&str, String)]) {
    let ctx_str = format_context(context);
    match phase {
        OperationPhase::Start => {
            log::info!("🚀 {} STARTING{}", name, ctx_str);
        }
        OperationPhase::Complete { duration_ms } => {
            log::info!("✅ {} COMPLETE in {}ms{}", name, duration_ms, ctx_str);
        }
        OperationPhase::Failed { error } => {
            log::error!("❌ {} FAILED: {}{}", name, error, ctx_str);
        }
    }
}

#[inline]
pub fn log_operation_start(operation: &str, params: &[(&str, String)]) {
    log_operation(operation, OperationPhase::Start, params);
}

#[inline]
pub fn log_operation_complete(operation: &str, duration_ms: u64, results: &[(&str, String)]) {
    log_operation(operation, OperationPhase::Complete { duration_ms }, results);
}

pub fn log_operation_failed(operation: &str, error: &str, context: &[(&str, String)]) {
    log_operation(
        operation,
        OperationPhase::Failed {
            error: error.to_string(),
        },
        context,
    );
}

/// Render context as ` | key=value, key=value`, or nothing when empty.
fn format_context(context: &[(&str, String)]) -> String {
    let mut out = String::new();
    for (i, (key, value)) in context.iter().enumerate() {
        out.push_str(if i == 0 { " | " } else { ", " });
        let _ = write!(out, "{}={}", key, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context_renders_nothing() {
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn test_context_keeps_order() {
        let context = [("bus_bound", "[]".to_string()), ("shortcuts", "4/4".to_string())];
        assert_eq!(format_context(&context), " | bus_bound=[], shortcuts=4/4");
    }

    #[test]
    fn test_logging_without_logger_is_harmless() {
        log_operation_start("test", &[]);
        log_operation_complete("test", 3, &[("k", "v".to_string())]);
        log_operation_failed("test", "boom", &[]);
    }
}
