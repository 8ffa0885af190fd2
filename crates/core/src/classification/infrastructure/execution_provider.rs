use ort::execution_providers::{CPUExecutionProvider, ExecutionProviderDispatch};

/// Execution providers for the emotion model, most preferred first.
///
/// ONNX Runtime skips providers it cannot register, so the trailing CPU
/// entry is always reached.
pub fn preferred_execution_providers() -> Vec<ExecutionProviderDispatch> {
    let mut providers = Vec::with_capacity(2);
    #[cfg(target_os = "macos")]
    providers.push(ort::execution_providers::CoreMLExecutionProvider::default().build());
    #[cfg(target_os = "windows")]
    providers.push(ort::execution_providers::DirectMLExecutionProvider::default().build());
    providers.push(CPUExecutionProvider::default().build());
    providers
}
