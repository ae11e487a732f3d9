pub mod context;
pub mod stages;

pub use context::PlatformContext;

use crate::utils::error::AutomlError;

/// Logs a failed stage and tells the user what to do next. Returns the exit code.
pub fn report_failure(e: &AutomlError) -> i32 {
    if e.is_clean_abort() {
        tracing::warn!("⚠️ {}", e);
        tracing::info!("💡 {}", e.recovery_suggestion());
    } else {
        tracing::error!(
            "❌ Stage failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    }

    // 輸出用戶友好的錯誤信息
    let marker = if e.is_clean_abort() { "⚠️" } else { "❌" };
    eprintln!("{} {}", marker, e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    e.exit_code()
}
