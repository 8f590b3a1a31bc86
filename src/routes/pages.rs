use axum::response::Html;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;color:#1f1f29;background:#fafafa}\
main{max-width:56rem;margin:0 auto;padding:3rem 1.5rem}\
h1{font-size:2.75rem;background:linear-gradient(90deg,#9333ea,#db2777);-webkit-background-clip:text;color:transparent}\
.card{background:#fff;border:1px solid #e4e4e7;border-radius:1rem;padding:2rem}\
.button{display:inline-block;background:#9333ea;color:#fff;padding:.75rem 1.5rem;border-radius:.75rem;border:0;text-decoration:none;cursor:pointer}\
.status{margin:1rem 0;padding:1rem;border-radius:.5rem}\
.status.ok{background:#f0fdf4;color:#166534}.status.err{background:#fef2f2;color:#991b1b}\
select,input{width:100%;padding:.75rem;margin:.5rem 0 1rem;box-sizing:border-box}";

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub(crate) fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
         <title>{title}</title><style>{STYLE}</style></head><body><main>{body}</main></body></html>",
        title = escape_html(title),
    )
}

/// `GET /`
pub async fn landing_page() -> Html<String> {
    Html(layout(
        "Workflow Automation",
        "<p>Powered by workflow automation</p>\
         <h1>Transform Your Business<br>With Intelligent Automation</h1>\
         <p>We build custom workflows that save you time, eliminate errors, \
         and scale your operations without hiring more staff.</p>\
         <section class=\"card\"><h2>Lightning Fast Setup</h2>\
         <p>Drop your files in, pick a workflow and let the automation take it from there.</p></section>\
         <p><a class=\"button\" href=\"/dashboard\">Get Started</a></p>",
    ))
}

const LOGIN_SCRIPT: &str = r#"<script>
document.getElementById('login').addEventListener('submit', async (e) => {
  e.preventDefault();
  const status = document.getElementById('status');
  const res = await fetch('/api/auth/login', {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({email: e.target.email.value, password: e.target.password.value})
  });
  const body = await res.json().catch(() => ({}));
  if (res.ok) {
    const next = new URLSearchParams(location.search).get('next');
    location.href = next && next.startsWith('/') ? next : '/dashboard';
  } else {
    status.className = 'status err';
    status.textContent = body.message || 'Login failed';
  }
});
</script>"#;

/// `GET /auth/login`
pub async fn login_page() -> Html<String> {
    Html(layout(
        "Login",
        &format!(
            "<h1>Login</h1><form id=\"login\" class=\"card\">\
             <label>Email<input name=\"email\" type=\"email\" required></label>\
             <label>Password<input name=\"password\" type=\"password\" required></label>\
             <div id=\"status\"></div>\
             <button class=\"button\" type=\"submit\">Login</button></form>{LOGIN_SCRIPT}"
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[tokio::test]
    async fn landing_page_links_to_dashboard() {
        let Html(page) = landing_page().await;
        assert!(page.contains("href=\"/dashboard\""));
        assert!(page.starts_with("<!doctype html>"));
    }

    #[tokio::test]
    async fn login_page_posts_to_auth_endpoint() {
        let Html(page) = login_page().await;
        assert!(page.contains("/api/auth/login"));
    }
}
