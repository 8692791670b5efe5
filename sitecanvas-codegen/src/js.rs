//! Bootstrap script for the static site.

/// The page script. It does not depend on the elements.
pub const SCRIPT: &str = "// Generated by SiteCanvas
document.addEventListener('DOMContentLoaded', function () {
    document.querySelectorAll('button').forEach(function (button) {
        if (button.type === 'submit') {
            return;
        }
        button.addEventListener('click', function () {
            console.log('Button clicked:', button.textContent.trim());
        });
    });

    document.querySelectorAll('form').forEach(function (form) {
        form.addEventListener('submit', function (event) {
            event.preventDefault();
            var data = {};
            new FormData(form).forEach(function (value, key) {
                data[key] = value;
            });
            console.log('Form submitted:', data);
        });
    });
});
";

/// Render the page script.
#[must_use]
pub fn render_js() -> String {
    SCRIPT.to_string()
}
