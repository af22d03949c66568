//! Server-rendered dashboard pages (outside `/api`, behind the route guard)

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
};

use super::ApiResult;
use crate::api::state::AppState;
use crate::board::{columns::short_id, Board};
use crate::items::ListQuery;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{} · taskdeck</title></head>\n<body>\n<nav><a href=\"/dashboard\">Dashboard</a> | <a href=\"/tasks\">Tasks</a> | <a href=\"/data\">Data</a> | <a href=\"/profile\">Profile</a></nav>\n<main>\n<h1>{}</h1>\n{}\n</main>\n</body>\n</html>\n",
        escape(title),
        escape(title),
        body
    ))
}

const SIGN_IN_SCRIPT: &str = r#"<script>
document.getElementById("sign-in").addEventListener("submit", async (e) => {
  e.preventDefault();
  const form = new FormData(e.target);
  const res = await fetch("/api/v1/auth/sign-in", {
    method: "POST",
    headers: { "content-type": "application/json" },
    body: JSON.stringify({ email: form.get("email"), password: form.get("password") }),
  });
  if (res.ok) { location.href = "/dashboard"; }
  else { document.getElementById("error").textContent = (await res.json()).error; }
});
</script>"#;

/// GET /
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if state.auth.current_user(&headers).is_ok() {
        Redirect::temporary("/dashboard")
    } else {
        Redirect::temporary("/sign-in")
    }
}

/// GET /sign-in
pub async fn sign_in(State(state): State<AppState>) -> Html<String> {
    let providers: String = state
        .auth
        .providers()
        .iter()
        .filter(|p| p.id != "credentials")
        .map(|p| format!("<li>{}</li>", escape(p.name)))
        .collect();
    let mut body = String::from(
        "<form id=\"sign-in\">\n<label>Email <input name=\"email\" type=\"email\"></label>\n<label>Password <input name=\"password\" type=\"password\"></label>\n<button type=\"submit\">Sign in</button>\n<p id=\"error\"></p>\n</form>\n",
    );
    if !providers.is_empty() {
        body.push_str(&format!("<p>Also available:</p><ul>{}</ul>\n", providers));
    }
    body.push_str("<p>Don't have an account? <a href=\"/sign-up\">Sign up</a></p>\n");
    body.push_str(SIGN_IN_SCRIPT);
    layout("Sign In", &body)
}

/// GET /sign-up
pub async fn sign_up() -> Html<String> {
    layout(
        "Sign Up",
        "<p>Accounts are provisioned by an administrator.</p>\n<p>Already have an account? <a href=\"/sign-in\">Sign in</a></p>",
    )
}

/// GET /dashboard
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let mut body = String::from("<h2>Tasks</h2>\n<ul>\n");
    {
        let board = state.board()?;
        let view = Board::from_tasks(board.store.tasks());
        for (status, count) in view.counts() {
            body.push_str(&format!("<li>{}: {}</li>\n", status.label(), count));
        }
    }
    body.push_str("</ul>\n<h2>Data</h2>\n<ul>\n");
    for (status, count) in state.items.status_counts()? {
        body.push_str(&format!("<li>{}: {}</li>\n", status.as_str(), count));
    }
    body.push_str("</ul>\n");
    Ok(layout("Dashboard", &body))
}

/// GET /tasks
pub async fn tasks(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let board = state.board()?;
    let view = Board::from_tasks(board.store.tasks());
    let mut body = String::new();
    for column in &view.columns {
        body.push_str(&format!(
            "<section data-status=\"{}\">\n<h2>{} ({})</h2>\n<ul>\n",
            column.status,
            column.label,
            column.tasks.len()
        ));
        for task in &column.tasks {
            body.push_str(&format!(
                "<li data-id=\"{}\">[{}] {} <small>{}</small></li>\n",
                escape(&task.id),
                task.priority,
                escape(&task.title),
                escape(short_id(&task.id))
            ));
        }
        body.push_str("</ul>\n</section>\n");
    }
    Ok(layout("Tasks", &body))
}

/// GET /data
pub async fn data(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let page = state.items.get_items(&ListQuery::default()).await?;
    let mut body = String::from(
        "<table>\n<tr><th>Name</th><th>Email</th><th>Status</th><th>Role</th><th>Created</th></tr>\n",
    );
    for item in &page.items {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&item.name),
            escape(&item.email),
            item.status.as_str(),
            item.role.as_str(),
            item.created_at.format("%Y-%m-%d")
        ));
    }
    body.push_str(&format!(
        "</table>\n<p>Page {} of {} ({} items)</p>\n",
        page.meta.page, page.meta.total_pages, page.meta.total_items
    ));
    Ok(layout("Data", &body))
}

/// GET /profile
///
/// The guard only saw a cookie; a stale or forged one is cleared and the
/// request lands back on sign-in.
pub async fn profile(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.auth.current_user(&headers) {
        Ok(user) => layout(
            "Profile",
            &format!(
                "<dl>\n<dt>Name</dt><dd>{}</dd>\n<dt>Email</dt><dd>{}</dd>\n<dt>Role</dt><dd>{}</dd>\n</dl>\n",
                escape(&user.name),
                escape(&user.email),
                escape(&user.role)
            ),
        )
        .into_response(),
        Err(_) => (
            [(header::SET_COOKIE, state.auth.clear_cookie())],
            Redirect::temporary("/sign-in"),
        )
            .into_response(),
    }
}
