// src/core/html.rs
//
// Case-insensitive scanning helpers for backend HTML fragments.
// `to_lower` only folds ASCII so byte offsets in the lowered copy line up
// with the original string.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lower(s);
    let open = to_lower(open_pat);
    let close = to_lower(close_pat);
    let o = lc.find(&open)?;
    let after = s[o..].find('>')? + o + 1;
    let cr = lc[after..].find(&close)?;
    Some(&s[after..after + cr])
}

pub fn next_tag_block_ci(s: &str, o: &str, c: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let ol = to_lower(o);
    let cl = to_lower(c);
    let start = lc.get(from..)?.find(&ol)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&cl)?;
    let end = open_end + end_rel + c.len();
    Some((start, end))
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => { in_tag = false; out.push(' '); }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&super::sanitize::normalize_entities(&out))
}

/// Lower-case tag name of an opening or closing tag (`<Input type=..>` → "input").
pub fn tag_name(tag: &str) -> String {
    let t = tag.trim_start_matches('<').trim_start_matches('/');
    let end = t
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(t.len());
    to_lower(&t[..end])
}

/// Attribute value from an opening tag. Handles "double", 'single' and bare values.
pub fn attr(open_tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(open_tag);
    let needle = to_lower(name);
    let bytes = lc.as_bytes();
    let mut from = 0;

    while let Some(rel) = lc[from..].find(&needle) {
        let at = from + rel;
        from = at + needle.len();

        // must be a whole attribute name
        let before_ok = at > 0 && (bytes[at - 1] as char).is_whitespace();
        if !before_ok { continue; }
        let rest = lc[from..].trim_start();
        if !rest.starts_with('=') { continue; }

        let eq = from + (lc[from..].len() - rest.len());
        let val_start = eq + 1 + (lc[eq + 1..].len() - lc[eq + 1..].trim_start().len());
        let raw = &open_tag[val_start..];
        let value = match raw.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &raw[1..];
                let end = body.find(q).unwrap_or(body.len());
                &body[..end]
            }
            _ => {
                let end = raw
                    .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                    .unwrap_or(raw.len());
                &raw[..end]
            }
        };
        return Some(super::sanitize::normalize_entities(value));
    }
    None
}

pub fn has_class(open_tag: &str, class: &str) -> bool {
    attr(open_tag, "class")
        .map(|v| v.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// End offset (just past `>`) of the element opened at `open_start`,
/// honouring nested elements of the same name. `lc` is `to_lower(s)`.
pub fn element_end(lc: &str, open_start: usize, name: &str) -> Option<usize> {
    let open_pat = join!("<", name);
    let close_pat = join!("</", name);
    let first_gt = lc[open_start..].find('>')? + open_start + 1;
    if lc[open_start..first_gt].ends_with("/>") {
        return Some(first_gt);
    }

    let mut depth = 1usize;
    let mut i = first_gt;
    while depth > 0 {
        let next_close = lc[i..].find(&close_pat).map(|r| r + i)?;
        let next_open = lc[i..]
            .match_indices(&open_pat)
            .map(|(r, _)| r + i)
            .find(|&p| is_name_boundary(lc, p + open_pat.len()));

        match next_open {
            Some(o) if o < next_close => {
                depth += 1;
                i = o + open_pat.len();
            }
            _ => {
                depth -= 1;
                i = lc[next_close..].find('>')? + next_close + 1;
            }
        }
    }
    Some(i)
}

/// True when the tag name ending at `at` is complete (`<tr` vs `<track`).
pub fn is_name_boundary(lc: &str, at: usize) -> bool {
    match lc.as_bytes().get(at) {
        Some(b) => matches!(*b, b' ' | b'>' | b'/' | b'\t' | b'\n' | b'\r'),
        None => true,
    }
}

/// First element whose opening tag satisfies `pred`; returns its outer html.
pub fn find_element<'a>(s: &'a str, pred: impl Fn(&str) -> bool) -> Option<&'a str> {
    let lc = to_lower(s);
    let mut i = 0;
    while let Some(rel) = s[i..].find('<') {
        let start = i + rel;
        let gt = s[start..].find('>')? + start + 1;
        let open = &s[start..gt];
        let name = tag_name(open);
        if !open.starts_with("</") && !name.is_empty() && pred(open) {
            let end = element_end(&lc, start, &name).unwrap_or(s.len());
            return Some(&s[start..end]);
        }
        i = gt;
    }
    None
}

pub fn find_by_class<'a>(s: &'a str, class: &str) -> Option<&'a str> {
    find_element(s, |open| has_class(open, class))
}

pub fn find_by_id<'a>(s: &'a str, id: &str) -> Option<&'a str> {
    find_element(s, |open| attr(open, "id").as_deref() == Some(id))
}

/// Remove every `open…close` block; returns the cleaned html and how many were dropped.
pub fn strip_blocks(s: &str, open: &str, close: &str) -> (String, usize) {
    let mut out = String::with_capacity(s.len());
    let mut dropped = 0;
    let mut from = 0;
    while let Some((start, end)) = next_tag_block_ci(s, open, close, from) {
        out.push_str(&s[from..start]);
        dropped += 1;
        from = end;
    }
    out.push_str(&s[from..]);
    (out, dropped)
}

/// Remove `<script>…</script>` blocks; returns the cleaned html and how many were dropped.
pub fn strip_scripts(s: &str) -> (String, usize) {
    strip_blocks(s, "<script", "</script>")
}

/// Bare or valued attribute present (`<option selected>`, `checked="checked"`).
pub fn has_attr(open_tag: &str, name: &str) -> bool {
    let lc = to_lower(open_tag);
    let inner = lc
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end_matches('/');
    inner
        .split_whitespace()
        .skip(1)
        .any(|tok| tok == name || tok.starts_with(&join!(name, "=")))
}

/// First opening tag (just the `<…>` part) satisfying `pred`.
pub fn find_open_tag<'a>(s: &'a str, pred: impl Fn(&str) -> bool) -> Option<&'a str> {
    let mut i = 0;
    while let Some(rel) = s[i..].find('<') {
        let start = i + rel;
        let gt = s[start..].find('>')? + start + 1;
        let open = &s[start..gt];
        if !open.starts_with("</") && pred(open) {
            return Some(open);
        }
        i = gt;
    }
    None
}
