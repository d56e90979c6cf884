// src/utils/log.rs

//! Progress layout helpers on top of the `log` facade.
//!
//! Level filtering and timestamps come from whatever logger the binary
//! installs; these helpers only shape the banner-style output.

const WIDTH: usize = 60;

/// Log a separator line
pub fn separator() {
    log::info!("{}", "─".repeat(WIDTH));
}

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(WIDTH);
    log::info!("{border}");
    log::info!("  {title}");
    log::info!("{border}");
}

/// Log a step counter, e.g. `[Product 3/20] https://...`
pub fn step(label: &str, current: usize, total: usize, message: &str) {
    log::info!("[{label} {current}/{total}] {message}");
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    log::info!("    {message}");
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {title}");
    for (key, value) in items {
        log::info!("    {key}: {value}");
    }
}

/// Render an outcome mark for per-item progress lines.
pub fn mark(ok: bool) -> &'static str {
    if ok { "✓" } else { "✗" }
}
