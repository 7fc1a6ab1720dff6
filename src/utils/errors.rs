/// Turn a command failure into the text shown to the user
///
/// Discord transport problems get a generic hint; everything else is shown
/// as-is with a single "❌" prefix.
pub fn user_facing_error(error_msg: &str) -> String {
    let lower = error_msg.to_lowercase();
    let clean = error_msg.trim().trim_start_matches('❌').trim();

    if lower.contains("429") || lower.contains("rate limit") {
        "⚠️ **Rate Limited**: Discord is rate limiting us. Please try again in a moment.".to_string()
    } else if lower.contains("http request") {
        "⚠️ **Network Error**: Having trouble connecting to Discord. Please try again.".to_string()
    } else if !clean.is_empty() {
        format!("❌ {}", clean)
    } else {
        "❌ An error occurred while executing the command.".to_string()
    }
}
