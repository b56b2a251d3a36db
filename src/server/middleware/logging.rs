//! HTTP request logging middleware

use log::{info, warn};

/// Create a request logging filter using warp's built-in logging
pub fn with_request_logging() -> warp::filters::log::Log<impl Fn(warp::filters::log::Info) + Clone>
{
    warp::log::custom(|info| {
        let status = info.status();
        let status_icon = match status.as_u16() {
            200..=299 => "✅",
            300..=399 => "🔀",
            400..=499 => "⚠️",
            500..=599 => "❌",
            _ => "❓",
        };

        let elapsed_ms = info.elapsed().as_millis();
        // Discovery requests legitimately take the whole SSDP window
        let timing_icon = if elapsed_ms > 5000 {
            "🐌"
        } else if elapsed_ms > 1000 {
            "⏳"
        } else {
            "⚡"
        };

        let remote_addr = info
            .remote_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let line = format!(
            "{} {} {} {} - {} {}ms - {} - User-Agent: \"{}\"",
            status_icon,
            timing_icon,
            info.method(),
            info.path(),
            status,
            elapsed_ms,
            remote_addr,
            info.user_agent().unwrap_or("unknown")
        );

        if status.is_server_error() {
            warn!(target: "tvremote::http", "{}", line);
        } else {
            info!(target: "tvremote::http", "{}", line);
        }
    })
}
