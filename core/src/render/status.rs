//! Markup owned by the loader itself: the in-container placeholder and the
//! terminal error panel.

use super::format::escape_html;

pub fn loading_placeholder() -> String {
    r#"<div class="text-center p-4">
    <div class="spinner-border text-primary" role="status">
        <span class="visually-hidden">Loading...</span>
    </div>
    <div class="mt-2 text-muted">Loading data...</div>
</div>"#
        .to_string()
}

/// Shown once the retry budget is spent; the only way out is a full reload.
pub fn error_panel(message: &str) -> String {
    format!(
        r#"<div class="alert alert-danger" data-state="load-failed">
    <i class="fas fa-exclamation-triangle"></i>
    <strong>Error loading data:</strong> {}
    <br>
    <button class="btn btn-sm btn-outline-danger mt-2" data-action="reload" onclick="location.reload()">
        <i class="fas fa-refresh"></i> Retry
    </button>
</div>"#,
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_panel_escapes_and_offers_reload() {
        let html = error_panel("HTTP 500: <oops>");
        assert!(html.contains("Error loading data:</strong> HTTP 500: &lt;oops&gt;"));
        assert!(html.contains(r#"data-action="reload""#));
    }

    #[test]
    fn placeholder_is_a_spinner() {
        assert!(loading_placeholder().contains("Loading data..."));
    }
}
