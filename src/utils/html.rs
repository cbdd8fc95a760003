/// Renders the homepage.
///
/// The page is static apart from the footer year. It links to the `/status`
/// endpoint and pulls an optional stylesheet from `/static/style.css`.
///
/// # Returns
///
/// A `String` containing the full HTML document.
pub fn render_index_page() -> String {
    let current_year = time::OffsetDateTime::now_utc().year();
    let version = env!("CARGO_PKG_VERSION");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Pulse</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; background-color: #f0f2f5;">
    <main style="max-width: 600px; margin: 40px auto; padding: 32px; background-color: #ffffff; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.08);">
        <h1 style="margin-top: 0; color: #1c1e21;">Pulse</h1>
        <p style="color: #4b4f56; line-height: 1.5;">
            The service is up. Database connectivity is reported by the
            <a href="/status">status endpoint</a>.
        </p>
        <pre style="background-color: #f7f8fa; padding: 12px; border-radius: 8px;">GET /status
{{"status": "ok", "db_connected": true, "timestamp": 1700000000.0}}</pre>
    </main>
    <footer style="text-align: center; color: #8a8d91; font-size: 12px; padding-bottom: 24px;">
        pulse v{version} &copy; {current_year}
    </footer>
</body>
</html>"#
    )
}
