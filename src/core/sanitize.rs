// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&times;", "×")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Upper-case the first character ("beef" → "Beef").
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => s!(),
    }
}

/// Category slug the scraper files results under: trimmed, lower-cased,
/// whitespace runs collapsed to '-'.
pub fn slugify(s: &str) -> String {
    s.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// "https://shop.example.com/" → "shop.example.com"
pub fn display_domain(url: &str) -> String {
    let u = url.trim();
    let u = u
        .strip_prefix("https://")
        .or_else(|| u.strip_prefix("http://"))
        .unwrap_or(u);
    s!(u.strip_suffix('/').unwrap_or(u))
}

/// Domain inside a trailing "(...)" of a label: "Shop N Drop (shopndrop.sx)" → "shopndrop.sx".
pub fn trailing_paren(label: &str) -> Option<&str> {
    let t = label.trim_end();
    let body = t.strip_suffix(')')?;
    let open = body.rfind('(')?;
    let inner = &body[open + 1..];
    if inner.is_empty() || inner.contains(')') { None } else { Some(inner) }
}
