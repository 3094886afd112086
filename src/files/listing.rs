//! HTML directory listings.

use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::files::resolve::{percent_encode, ResolvedPath};

/// One row of a listing.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Reads the directory at `dir` and renders it as an HTML page.
pub async fn list_directory<A>(dir: &ResolvedPath<A>) -> std::io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir.as_path()).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        // Entries can vanish between readdir and stat.
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(render(dir.request_path(), &entries))
}

/// Renders `entries` of the directory served at `request_path`.
pub fn render(request_path: &str, entries: &[Entry]) -> String {
    let title = html_escape(request_path);
    let mut page = String::new();

    page.push_str(&format!(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>Index of {title}</title>\
         <style>body{{font-family:monospace;}}a{{text-decoration:none;color:#000;}}\
         a:hover{{text-decoration:underline;}}table{{border-collapse:collapse;width:100%;}}\
         th,td{{padding:0.25rem;}}th{{text-align:left;}}</style>\
         </head><body class=\"dir-listing\"><h1>Index of {title}</h1><table>\
         <tr><th>Name</th><th>Size</th><th>Modified</th></tr>"
    ));

    page.push_str(&format!(
        "<tr><td>📁 <a href=\"{}\">..</a></td><td>-</td><td>-</td></tr>",
        percent_encode(&parent_href(request_path))
    ));

    let base = request_path.trim_end_matches('/');
    for entry in entries {
        let mut href = format!("{}/{}", base, entry.name);
        if entry.is_dir {
            href.push('/');
        }
        let icon = if entry.is_dir { "📁" } else { "📄" };
        let size = if entry.is_dir {
            "-".to_string()
        } else {
            human_size(entry.size)
        };
        let modified = entry
            .modified
            .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());

        page.push_str(&format!(
            "<tr><td>{icon} <a href=\"{}\">{}</a></td><td>{size}</td><td>{modified}</td></tr>",
            percent_encode(&href),
            html_escape(&entry.name),
        ));
    }

    page.push_str("</table></body></html>");
    page
}

/// Link target for the `..` row: the parent of `request_path`, slash-terminated.
fn parent_href(request_path: &str) -> String {
    let trimmed = request_path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(pos) => format!("{}/", &trimmed[..pos]),
    }
}

fn human_size(size: u64) -> String {
    if size < 1024 {
        format!("{} B", size)
    } else if size < 1024 * 1024 {
        format!("{} KB", size / 1024)
    } else {
        format!("{} MB", size / (1024 * 1024))
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
