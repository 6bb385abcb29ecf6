// src/dispatch/fragment.rs
//
// Backend fragments arrive as server-rendered HTML. They are parsed into a
// flat list of blocks the egui view knows how to draw. Inline `<script>`
// blocks are never run; they are dropped and counted.

use crate::core::html::{
    attr, element_end, find_by_class, find_by_id, find_open_tag, has_attr, inner_after_open_tag,
    is_name_boundary, strip_blocks, strip_scripts, strip_tags, tag_name, to_lower,
};
use crate::core::sanitize::{normalize_entities, normalize_ws};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    pub blocks: Vec<Block>,
    pub scripts_dropped: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    Field { label: String, name: String, kind: String, value: String },
    Select { label: String, name: String, options: Vec<SelectOption> },
    Button { id: Option<String>, label: String },
    Table(Table),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<String>,
    /// Value of the row's selection checkbox, if it has one.
    pub value: Option<String>,
}

impl Fragment {
    pub fn parse(html: &str) -> Fragment {
        let (clean, scripts_dropped) = strip_scripts(html);
        let (clean, _) = strip_blocks(&clean, "<style", "</style>");
        let (clean, _) = strip_blocks(&clean, "<head", "</head>");

        let mut p = Parser::new(&clean);
        p.run();
        Fragment { blocks: p.blocks, scripts_dropped }
    }

    /// Keep only the element carrying `marker` as a class. Without a marker,
    /// or when the marker is missing, the whole document is parsed so server
    /// error pages stay visible. Scripts are counted over the whole document.
    pub fn extract(html: &str, marker: Option<&str>) -> Fragment {
        match marker.and_then(|m| find_by_class(html, m)) {
            Some(el) => {
                let (_, scripts) = strip_scripts(html);
                Fragment { scripts_dropped: scripts, ..Fragment::parse(el) }
            }
            None => Fragment::parse(html),
        }
    }

    /// Inner content of the element with the given id.
    pub fn from_element_id(html: &str, id: &str) -> Option<Fragment> {
        let outer = find_by_id(html, id)?;
        Some(Fragment::parse(&inner_after_open_tag(outer)))
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn first_heading(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            Block::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn button(&self, id: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| matches!(b, Block::Button { id: Some(bid), .. } if bid == id))
    }

    /// Plain-text rendering, one block per line.
    pub fn text(&self) -> String {
        let mut out = Vec::with_capacity(self.blocks.len());
        for b in &self.blocks {
            match b {
                Block::Heading { text, .. } => out.push(text.clone()),
                Block::Paragraph(t) => out.push(t.clone()),
                Block::Field { label, value, .. } => out.push(format!("{label}: {value}")),
                Block::Select { label, options, .. } => {
                    let chosen = options
                        .iter()
                        .find(|o| o.selected)
                        .map(|o| o.text.as_str())
                        .unwrap_or("");
                    out.push(format!("{label}: {chosen}"));
                }
                Block::Button { label, .. } => out.push(format!("[{label}]")),
                Block::Table(t) => {
                    if !t.headers.is_empty() {
                        out.push(t.headers.join(" | "));
                    }
                    for r in &t.rows {
                        out.push(r.cells.join(" | "));
                    }
                }
            }
        }
        out.join("\n")
    }
}

fn clean_text(raw: &str) -> String {
    normalize_ws(&normalize_entities(raw))
}

fn heading_level(name: &str) -> Option<u8> {
    let b = name.as_bytes();
    if b.len() == 2 && b[0] == b'h' && (b'1'..=b'6').contains(&b[1]) {
        Some(b[1] - b'0')
    } else {
        None
    }
}

fn is_block_tag(name: &str) -> bool {
    matches!(
        name,
        "p" | "div" | "br" | "li" | "ul" | "ol" | "section" | "form" | "tr" | "hr" | "fieldset"
            | "legend" | "header" | "footer" | "article" | "main" | "nav" | "dl" | "dt" | "dd"
            | "body" | "html"
    )
}

struct Parser<'a> {
    s: &'a str,
    lc: String,
    blocks: Vec<Block>,
    text: String,
    heading: Option<u8>,
    in_label: bool,
    label: Option<String>,
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            s,
            lc: to_lower(s),
            blocks: Vec::new(),
            text: String::new(),
            heading: None,
            in_label: false,
            label: None,
        }
    }

    fn run(&mut self) {
        let s = self.s;
        let mut i = 0;

        while i < s.len() {
            let Some(rel) = s[i..].find('<') else {
                self.text.push_str(&s[i..]);
                break;
            };
            let lt = i + rel;
            self.text.push_str(&s[i..lt]);

            if s[lt..].starts_with("<!--") {
                i = s[lt..].find("-->").map(|e| lt + e + 3).unwrap_or(s.len());
                continue;
            }
            let Some(gt_rel) = s[lt..].find('>') else {
                self.text.push_str(&s[lt..]);
                break;
            };
            let gt = lt + gt_rel + 1;
            let tag = &s[lt..gt];
            let name = tag_name(tag);
            let closing = tag.starts_with("</");
            i = gt;

            if name.is_empty() || name.starts_with('!') {
                continue;
            }

            match (closing, name.as_str()) {
                (false, "table") => {
                    self.flush();
                    let end = self.end_of(lt, "table");
                    self.blocks.push(Block::Table(parse_table(&s[lt..end])));
                    i = end;
                }
                (false, "select") => {
                    let end = self.end_of(lt, "select");
                    let label = self.take_label(tag);
                    let options = parse_options(&s[lt..end]);
                    self.flush();
                    self.blocks.push(Block::Select {
                        label,
                        name: attr(tag, "name").unwrap_or_default(),
                        options,
                    });
                    i = end;
                }
                (false, "textarea") => {
                    let end = self.end_of(lt, "textarea");
                    let label = self.take_label(tag);
                    let value = clean_text(&inner_after_open_tag(&s[lt..end]));
                    self.flush();
                    self.blocks.push(Block::Field {
                        label,
                        name: attr(tag, "name").unwrap_or_default(),
                        kind: s!("textarea"),
                        value,
                    });
                    i = end;
                }
                (false, "button") => {
                    let end = self.end_of(lt, "button");
                    self.flush();
                    let label = strip_tags(inner_after_open_tag(&s[lt..end]));
                    self.blocks.push(Block::Button { id: attr(tag, "id"), label });
                    i = end;
                }
                (false, "input") => self.input(tag),
                (false, "label") => {
                    self.flush();
                    self.in_label = true;
                }
                (true, "label") => {
                    let t = clean_text(&self.text);
                    self.text.clear();
                    if !t.is_empty() {
                        self.label = Some(t);
                    }
                    self.in_label = false;
                }
                (false, n) if heading_level(n).is_some() => {
                    self.flush();
                    self.heading = heading_level(n);
                }
                (true, n) if heading_level(n).is_some() => {
                    let t = clean_text(&self.text);
                    self.text.clear();
                    if !t.is_empty() {
                        let level = self.heading.take().unwrap_or(2);
                        self.blocks.push(Block::Heading { level, text: t });
                    }
                    self.heading = None;
                }
                (_, n) if is_block_tag(n) => self.flush(),
                _ => {}
            }
        }
        self.flush();
    }

    /// End of the element opened at `at`; an unclosed element runs to the end.
    fn end_of(&self, at: usize, name: &str) -> usize {
        element_end(&self.lc, at, name).unwrap_or(self.s.len())
    }

    fn input(&mut self, tag: &str) {
        let kind = attr(tag, "type").map(|t| to_lower(&t)).unwrap_or_else(|| s!("text"));
        match kind.as_str() {
            "hidden" => {}
            "submit" | "button" | "reset" => {
                self.flush();
                let label = attr(tag, "value").unwrap_or_else(|| s!("Submit"));
                self.blocks.push(Block::Button { id: attr(tag, "id"), label });
            }
            _ => {
                let label = self.take_label(tag);
                let value = if kind == "checkbox" || kind == "radio" {
                    s!(if has_attr(tag, "checked") { "yes" } else { "no" })
                } else {
                    attr(tag, "value").unwrap_or_default()
                };
                self.flush();
                self.blocks.push(Block::Field {
                    label,
                    name: attr(tag, "name").unwrap_or_default(),
                    kind,
                    value,
                });
            }
        }
    }

    /// Label for a control: open `<label>` text, the last closed label,
    /// then placeholder, then name.
    fn take_label(&mut self, tag: &str) -> String {
        if self.in_label {
            let t = clean_text(&self.text);
            if !t.is_empty() {
                self.text.clear();
                return t;
            }
        }
        if let Some(l) = self.label.take() {
            return l;
        }
        attr(tag, "placeholder")
            .or_else(|| attr(tag, "name"))
            .unwrap_or_default()
    }

    fn flush(&mut self) {
        if self.heading.is_some() || self.in_label {
            return;
        }
        let t = clean_text(&self.text);
        self.text.clear();
        if !t.is_empty() {
            self.blocks.push(Block::Paragraph(t));
        }
    }
}

/// Start offsets of every `<name …>` opening tag in `lc`.
fn open_tags(lc: &str, name: &str) -> Vec<usize> {
    let pat = join!("<", name);
    lc.match_indices(&pat)
        .map(|(at, _)| at)
        .filter(|&at| is_name_boundary(lc, at + pat.len()))
        .collect()
}

fn parse_table(block: &str) -> Table {
    let lc = to_lower(block);
    let mut table = Table::default();
    let mut resume = 0;

    for start in open_tags(&lc, "tr") {
        if start < resume {
            continue;
        }
        let end = element_end(&lc, start, "tr").unwrap_or(block.len());
        resume = end;

        let (cells, all_th, value) = parse_row(&block[start..end]);
        if cells.is_empty() {
            continue;
        }
        if all_th && table.headers.is_empty() && table.rows.is_empty() {
            table.headers = cells;
        } else {
            table.rows.push(TableRow { cells, value });
        }
    }
    table
}

fn parse_row(row: &str) -> (Vec<String>, bool, Option<String>) {
    let lc = to_lower(row);
    let mut cells = Vec::new();
    let mut all_th = true;
    let mut value = None;
    let mut i = 0;

    while let Some(rel) = row[i..].find('<') {
        let start = i + rel;
        let Some(gt) = row[start..].find('>').map(|g| start + g + 1) else { break };
        let tag = &row[start..gt];
        let name = tag_name(tag);
        if tag.starts_with("</") || (name != "td" && name != "th") {
            i = gt;
            continue;
        }

        let end = element_end(&lc, start, &name).unwrap_or(row.len());
        let inner = inner_after_open_tag(&row[start..end]);
        if value.is_none() {
            value = find_open_tag(&inner, |o| {
                tag_name(o) == "input"
                    && matches!(attr(o, "type").as_deref(), Some("checkbox" | "radio"))
            })
            .and_then(|o| attr(o, "value"));
        }
        all_th &= name == "th";
        cells.push(strip_tags(&inner));
        i = end.max(gt);
    }
    (cells, all_th, value)
}

fn parse_options(select: &str) -> Vec<SelectOption> {
    let lc = to_lower(select);
    let mut out = Vec::new();

    for start in open_tags(&lc, "option") {
        let Some(gt) = select[start..].find('>').map(|g| start + g + 1) else { break };
        let tag = &select[start..gt];
        let text_end = lc[gt..].find('<').map(|e| gt + e).unwrap_or(select.len());
        let text = clean_text(&select[gt..text_end]);
        out.push(SelectOption {
            value: attr(tag, "value").unwrap_or_else(|| text.clone()),
            text,
            selected: has_attr(tag, "selected"),
        });
    }
    out
}
