/// Status line for user-facing progress (rendered with the `[+]` symbol by the CLI
/// formatter).
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "fleetprobe::status", $($arg)*)
    };
}
