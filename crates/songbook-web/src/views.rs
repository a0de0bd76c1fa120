//! Server-rendered HTML pages

use songbook_core::branding::{page_title, DISPLAY_NAME};
use songbook_core::{Location, Song, User};

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
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

fn nav(user: Option<&User>) -> String {
    let account = match user {
        Some(user) => format!(
            r#"<a href="/dashboard">{}</a> <a href="/logout">Log out</a>"#,
            escape(&user.email)
        ),
        None => r#"<a href="/login">Log in</a> <a href="/register">Register</a>"#.to_string(),
    };
    format!(
        r#"<nav><a href="/">{}</a> <a href="/about">About</a> <a href="/welcome">Welcome</a> <a href="/songs">Songs</a> <a href="/map">Map</a> {}</nav>"#,
        DISPLAY_NAME, account
    )
}

/// Wrap page content in the shared layout
pub fn layout(page: &str, user: Option<&User>, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<link rel=\"stylesheet\" href=\"/static/css/site.css\">\n</head>\n<body>\n{}\n<main>\n{}\n</main>\n</body>\n</html>\n",
        escape(&page_title(page)),
        nav(user),
        body
    )
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default()
}

pub fn index_page(user: Option<&User>) -> String {
    layout(
        "Home",
        user,
        r#"<h1>Songbook</h1>
<p>Upload your song collection, browse it page by page and put places on the map.</p>
<ul>
<li><a href="/about">About</a></li>
<li><a href="/welcome">Welcome</a></li>
<li><a href="/login">Log in</a></li>
<li><a href="/register">Register</a></li>
</ul>"#,
    )
}

pub fn about_page(user: Option<&User>) -> String {
    layout(
        "About",
        user,
        "<h1>About</h1>\n<p>Songbook keeps song lists and map locations imported from CSV files.</p>",
    )
}

pub fn welcome_page(user: Option<&User>) -> String {
    let greeting = match user {
        Some(user) => format!("Welcome back, {}!", escape(&user.email)),
        None => "Welcome!".to_string(),
    };
    layout(
        "Welcome",
        user,
        &format!(
            "<h1>{}</h1>\n<p>Start by <a href=\"/songs/upload\">uploading a CSV</a> of your songs.</p>",
            greeting
        ),
    )
}

pub fn register_page(email: &str, error: Option<&str>) -> String {
    layout(
        "Register",
        None,
        &format!(
            r#"<h1>Register</h1>
{}
<form method="post" action="/register">
<label>Email <input type="email" name="email" value="{}" required></label>
<label>Password <input type="password" name="password" required></label>
<label>Confirm password <input type="password" name="confirm" required></label>
<button type="submit">Register</button>
</form>"#,
            error_banner(error),
            escape(email)
        ),
    )
}

pub fn login_page(email: &str, error: Option<&str>) -> String {
    layout(
        "Login",
        None,
        &format!(
            r#"<h1>Log in</h1>
{}
<form method="post" action="/login">
<label>Email <input type="email" name="email" value="{}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>"#,
            error_banner(error),
            escape(email)
        ),
    )
}

fn song_rows(songs: &[Song]) -> String {
    songs
        .iter()
        .map(|song| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&song.title),
                escape(&song.artist),
                song.year.map(|y| y.to_string()).unwrap_or_default(),
                escape(song.genre.as_deref().unwrap_or(""))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn song_table(songs: &[Song]) -> String {
    if songs.is_empty() {
        return "<p>No songs yet.</p>".to_string();
    }
    format!(
        "<table>\n<tr><th>Name</th><th>Artist</th><th>Year</th><th>Genre</th></tr>\n{}\n</table>",
        song_rows(songs)
    )
}

pub fn dashboard_page(user: &User, songs: &[Song]) -> String {
    layout(
        "Dashboard",
        Some(user),
        &format!(
            "<h1>Dashboard</h1>\n<p>Signed in as {}. You have uploaded {} songs.</p>\n<p><a href=\"/songs/upload\">Upload songs</a></p>\n{}",
            escape(&user.email),
            songs.len(),
            song_table(songs)
        ),
    )
}

pub fn songs_page(user: Option<&User>, songs: &[Song], page: u32, total_pages: u32) -> String {
    let mut pager = Vec::new();
    if page > 1 {
        pager.push(format!(r#"<a href="/songs?page={}">Previous</a>"#, page - 1));
    }
    pager.push(format!("Page {} of {}", page, total_pages.max(1)));
    if page < total_pages {
        pager.push(format!(r#"<a href="/songs?page={}">Next</a>"#, page + 1));
    }

    layout(
        "Songs",
        user,
        &format!(
            "<h1>Songs</h1>\n{}\n<p class=\"pager\">{}</p>",
            song_table(songs),
            pager.join(" ")
        ),
    )
}

pub fn upload_page(user: &User, heading: &str, action: &str, columns: &str, error: Option<&str>) -> String {
    layout(
        heading,
        Some(user),
        &format!(
            r#"<h1>{}</h1>
{}
<p>CSV columns: <code>{}</code></p>
<form method="post" action="{}" enctype="multipart/form-data">
<input type="file" name="file" accept=".csv" required>
<button type="submit">Upload</button>
</form>"#,
            escape(heading),
            error_banner(error),
            escape(columns),
            escape(action)
        ),
    )
}

pub fn map_page(user: Option<&User>, locations: &[Location]) -> String {
    let rows = locations
        .iter()
        .map(|l| {
            format!(
                "<tr><td>{}</td><td>{:.4}</td><td>{:.4}</td><td>{}</td></tr>",
                escape(&l.title),
                l.longitude,
                l.latitude,
                l.population.map(|p| p.to_string()).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let upload = if user.is_some() {
        r#"<form method="post" action="/locations/upload" enctype="multipart/form-data">
<input type="file" name="file" accept=".csv" required>
<button type="submit">Upload locations</button>
</form>"#
    } else {
        ""
    };

    layout(
        "Map",
        user,
        &format!(
            "<h1>Map</h1>\n<p data-source=\"/api/locations\">{} locations</p>\n<table>\n<tr><th>Location</th><th>Longitude</th><th>Latitude</th><th>Population</th></tr>\n{}\n</table>\n{}",
            locations.len(),
            rows,
            upload
        ),
    )
}

pub fn not_found_page() -> String {
    layout(
        "Page Not Found",
        None,
        "<h1>Page not found</h1>\n<p>Check that you created this page, or go back <a href=\"/\">home</a>.</p>",
    )
}

pub fn server_error_page() -> String {
    layout(
        "Error",
        None,
        "<h1>Something went wrong</h1>\n<p>The error has been logged. Please try again later.</p>",
    )
}

/// Generic page for client errors
pub fn error_page(heading: &str, message: &str) -> String {
    layout(
        heading,
        None,
        &format!("<h1>{}</h1>\n<p>{}</p>", escape(heading), escape(message)),
    )
}
