use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::client::size_guard::MAX_UPLOAD_BYTES;
use crate::responses::JsonResponse;
use crate::routes::auth::session::AuthSession;
use crate::routes::pages::{escape_html, layout};
use crate::state::AppState;

// Mirrors `client::widget`: no adds before a workflow is chosen, whole-batch
// size guard, positional part names, selection kept on failure.
const UPLOAD_SCRIPT: &str = r#"<script>
const LIMIT = Number(document.getElementById('upload').dataset.limit);
const mb = (n) => (n / 1e6).toFixed(2);
const total = (list) => list.reduce((acc, f) => acc + f.size, 0);
let files = [];
const status = document.getElementById('status');
const show = (text, ok) => { status.className = 'status ' + (ok ? 'ok' : 'err'); status.textContent = text; };
const render = () => {
  document.getElementById('files').innerHTML = '';
  files.forEach((f, i) => {
    const li = document.createElement('li');
    li.textContent = f.name + ' (' + (f.size / 1024).toFixed(2) + ' KB) ';
    const rm = document.createElement('button');
    rm.textContent = 'Remove';
    rm.onclick = () => { files.splice(i, 1); render(); };
    li.appendChild(rm);
    document.getElementById('files').appendChild(li);
  });
};
const select = document.getElementById('workflow');
const picker = document.getElementById('picker');
picker.disabled = !select.value;
select.addEventListener('change', () => { picker.disabled = !select.value; });
picker.addEventListener('change', (e) => {
  status.className = ''; status.textContent = '';
  const incoming = Array.from(e.target.files);
  if (!select.value) {
    show('Select a workflow first', false);
  } else if (total(files) + total(incoming) > LIMIT) {
    show('Total file size exceeds the ' + LIMIT / 1e6 + ' MB limit. Current: ' + mb(total(files)) + ' MB, Adding: ' + mb(total(incoming)) + ' MB.', false);
  } else {
    files = files.concat(incoming);
    render();
  }
  e.target.value = '';
});
document.getElementById('upload').addEventListener('submit', async (e) => {
  e.preventDefault();
  if (files.length === 0) return show('Please select at least one file', false);
  if (!select.value) return show('Please select a workflow', false);
  const name = select.options[select.selectedIndex].dataset.name;
  if (!name) return show('Selected workflow not found', false);
  if (total(files) > LIMIT) return show('Upload cancelled: Total file size (' + mb(total(files)) + ' MB) exceeds the ' + LIMIT / 1e6 + ' MB limit.', false);
  const form = new FormData();
  files.forEach((f, i) => form.append('file' + i, f));
  const button = e.target.querySelector('button[type=submit]');
  button.disabled = true;
  try {
    const res = await fetch('/api/upload?workflowId=' + encodeURIComponent(select.value), {method: 'POST', body: form});
    const body = await res.json().catch(() => ({}));
    if (!res.ok) throw new Error(body.error || ('Upload failed: ' + res.statusText));
    show('Successfully uploaded ' + files.length + ' file(s) to ' + name + '!', true);
    files = []; render();
  } catch (err) {
    show(err.message || 'Upload failed. Please try again.', false);
  } finally {
    button.disabled = false;
  }
});
</script>"#;

fn dashboard_body(app_state: &AppState) -> String {
    let workflows = app_state.registry.list_public_workflows();
    if workflows.is_empty() {
        return "<h1>Dashboard</h1><div class=\"card status err\">No workflows configured. \
                Please add workflow configuration to your environment variables.</div>"
            .to_string();
    }

    let options: String = workflows
        .iter()
        .map(|w| {
            format!(
                "<option value=\"{id}\" data-name=\"{name}\">{label}</option>",
                id = escape_html(&w.id),
                name = escape_html(&w.name),
                label = escape_html(&w.label()),
            )
        })
        .collect();

    format!(
        "<h1>Dashboard</h1><p>Upload your files to get started</p>\
         <form id=\"upload\" class=\"card\" data-limit=\"{limit}\">\
         <label for=\"workflow\">Select Workflow</label>\
         <select id=\"workflow\"><option value=\"\">Select a workflow...</option>{options}</select>\
         <div id=\"status\"></div>\
         <input id=\"picker\" type=\"file\" multiple>\
         <ul id=\"files\"></ul>\
         <button class=\"button\" type=\"submit\">Upload</button></form>{UPLOAD_SCRIPT}",
        limit = MAX_UPLOAD_BYTES,
    )
}

/// `GET /dashboard`: the upload page, or a redirect to the login page when
/// there is no valid session.
pub async fn dashboard_page(
    State(app_state): State<AppState>,
    session: Result<AuthSession, StatusCode>,
) -> Response {
    if session.is_err() {
        return JsonResponse::redirect_to_login("/dashboard").into_response();
    }

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Html(layout("Dashboard", &dashboard_body(&app_state))),
    )
        .into_response()
}
