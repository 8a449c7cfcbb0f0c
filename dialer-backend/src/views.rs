//! Server-rendered HTML pages.
//!
//! Self-contained pages with inline CSS; handlers pass in typed records and
//! get back a complete document.

use std::collections::HashMap;

use crate::models::{Lead, User};

const STYLE: &str = r#"<style>
    body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; margin: 2rem; color: #222; }
    h1 { font-size: 1.5rem; }
    table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
    th, td { border: 1px solid #ddd; padding: 0.4rem 0.6rem; text-align: left; vertical-align: top; }
    th { background: #f4f4f4; }
    form.inline { display: flex; gap: 0.4rem; }
    .muted { color: #888; }
    nav a { margin-right: 1rem; }
</style>"#;

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
{style}
</head>
<body>
<nav><a href="/">Home</a><a href="/admin">Admin</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape_html(title),
        style = STYLE,
        body = body
    )
}

pub fn index_page() -> String {
    page(
        "Lead Dialer",
        r#"<p><a href="/admin">Admin dashboard</a></p>
<form method="get" action="/telecaller" class="inline">
    <label for="username">Telecaller username</label>
    <input id="username" name="username" required>
    <button type="submit">Open dashboard</button>
</form>"#,
    )
}

pub fn admin_dashboard(leads: &[Lead], telecallers: &[User]) -> String {
    let names: HashMap<i64, &str> = telecallers
        .iter()
        .map(|u| (u.id, u.username.as_str()))
        .collect();

    let mut lead_rows = String::new();
    for lead in leads {
        let assignee = match lead.assigned_to {
            Some(id) => names
                .get(&id)
                .map(|n| escape_html(n))
                .unwrap_or_else(|| format!("#{}", id)),
            None => "-".to_string(),
        };
        lead_rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"muted\">{}</td></tr>\n",
            lead.id,
            escape_html(&lead.lead_name),
            assignee,
            escape_html(&lead.status),
            escape_html(&lead.feedback),
            escape_html(&lead.updated_at)
        ));
    }
    if lead_rows.is_empty() {
        lead_rows = "<tr><td colspan=\"6\">No leads yet.</td></tr>".to_string();
    }

    let mut options = String::new();
    for user in telecallers {
        options.push_str(&format!(
            "<option value=\"{}\">{}</option>",
            user.id,
            escape_html(&user.username)
        ));
    }

    let body = format!(
        r#"<h2>Add lead</h2>
<form method="post" action="/add_lead" class="inline">
    <input name="lead_name" placeholder="Lead name" required>
    <select name="assigned_to" required>{options}</select>
    <button type="submit">Add</button>
</form>
<p><a href="/generate_report">Download feedback report</a></p>
<h2>Leads</h2>
<table>
<tr><th>ID</th><th>Lead</th><th>Assigned to</th><th>Status</th><th>Feedback</th><th>Updated</th></tr>
{lead_rows}</table>"#,
        options = options,
        lead_rows = lead_rows
    );
    page("Admin Dashboard", &body)
}

pub fn telecaller_dashboard(username: &str, leads: &[Lead]) -> String {
    let escaped_user = escape_html(username);

    let mut lead_rows = String::new();
    for lead in leads {
        lead_rows.push_str(&format!(
            r#"<tr><td>{id}</td><td>{name}</td><td>{status}</td><td>{feedback}</td><td>
<form method="post" action="/update_lead/{id}" class="inline">
    <input type="hidden" name="username" value="{user}">
    <input name="feedback" value="{feedback}">
    <button type="submit">Save</button>
</form></td></tr>
"#,
            id = lead.id,
            name = escape_html(&lead.lead_name),
            status = escape_html(&lead.status),
            feedback = escape_html(&lead.feedback),
            user = escaped_user
        ));
    }
    if lead_rows.is_empty() {
        lead_rows = "<tr><td colspan=\"5\">No leads assigned.</td></tr>".to_string();
    }

    let body = format!(
        r#"<p>Signed in as <strong>{user}</strong></p>
<table>
<tr><th>ID</th><th>Lead</th><th>Status</th><th>Feedback</th><th>Update</th></tr>
{lead_rows}</table>"#,
        user = escaped_user,
        lead_rows = lead_rows
    );
    page("Telecaller Dashboard", &body)
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
