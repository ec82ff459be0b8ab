//! Netscape Bookmark File codec.
//!
//! Parses the nested `<DL>`/`<DT>` HTML dialect browsers use for bookmark
//! export into a [`Tree`], and renders a tree back into that format. The
//! codec keeps no state between calls.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeZone, Utc};

use crate::types::bookmark::{new_id, Bookmark, BookmarkItem, Folder, Tree};

/// `ICON` value written on favorite bookmarks.
///
/// Reading it back does not restore `isFavorite`.
pub const FAVORITE_ICON: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

pub const UNTITLED_FOLDER: &str = "Untitled Folder";
pub const UNTITLED_BOOKMARK: &str = "Untitled Bookmark";

const HEADER: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
";

const FOOTER: &str = "</DL><p>\n";

const INDENT: &str = "    ";

/// Longest chain of nested folders kept on import. A folder at this depth is
/// kept empty and its contents are read into the list that holds it.
pub const MAX_IMPORT_DEPTH: usize = 60;

// ─── Parsing ───

/// Parses a bookmark file into a tree of freshly identified nodes.
///
/// A document without any `<DL>` list yields an empty tree. Anchors without
/// an `HREF` are dropped. Nodes without `ADD_DATE` are stamped now.
pub fn parse_document(document: &str) -> Tree {
    let mut cursor = Cursor::new(tokenize(document));
    let now = Utc::now();

    while let Some(token) = cursor.next() {
        if token.is_start("dl") {
            return parse_list(&mut cursor, now, 0);
        }
    }
    Tree::new()
}

fn parse_list(cursor: &mut Cursor, now: DateTime<Utc>, depth: usize) -> Vec<BookmarkItem> {
    let mut items = Vec::new();
    // Folder lists past the depth cap read into this list.
    let mut lifted = 0usize;

    while let Some(token) = cursor.next() {
        match token {
            Token::End(name) if name == "dl" => {
                if lifted == 0 {
                    break;
                }
                lifted -= 1;
            }
            Token::Start { name, attrs } if name == "h3" => {
                let title = cursor.text_until("h3");
                let children = if !cursor.list_follows() {
                    Vec::new()
                } else if depth + 1 < MAX_IMPORT_DEPTH {
                    parse_list(cursor, now, depth + 1)
                } else {
                    lifted += 1;
                    Vec::new()
                };
                items.push(BookmarkItem::Folder(Folder {
                    id: new_id(),
                    title: or_default(title, UNTITLED_FOLDER),
                    children,
                    created_at: add_date(&attrs).unwrap_or(now),
                }));
            }
            Token::Start { name, attrs } if name == "a" => {
                let title = cursor.text_until("a");
                let Some(href) = attrs.get("href").filter(|h| !h.trim().is_empty()) else {
                    continue;
                };
                items.push(BookmarkItem::Bookmark(Bookmark {
                    id: new_id(),
                    title: or_default(title, UNTITLED_BOOKMARK),
                    url: href.trim().to_string(),
                    tags: attrs.get("tags").map(|t| split_tags(t)).unwrap_or_default(),
                    is_favorite: false,
                    created_at: add_date(&attrs).unwrap_or(now),
                }));
            }
            // A list with no header has no folder to belong to.
            Token::Start { name, .. } if name == "dl" => cursor.skip_list(),
            _ => {}
        }
    }

    items
}

fn or_default(title: String, fallback: &str) -> String {
    if title.is_empty() {
        fallback.to_string()
    } else {
        title
    }
}

fn add_date(attrs: &HashMap<String, String>) -> Option<DateTime<Utc>> {
    let secs: i64 = attrs.get("add_date")?.trim().parse().ok()?;
    Utc.timestamp_opt(secs, 0).single()
}

/// Splits a `TAGS` attribute: comma-separated, trimmed, empties removed.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ─── Tokenizer ───

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Start {
        name: String,
        attrs: HashMap<String, String>,
    },
    End(String),
    Text(String),
}

impl Token {
    fn is_start(&self, tag: &str) -> bool {
        matches!(self, Token::Start { name, .. } if name == tag)
    }

    fn is_end(&self, tag: &str) -> bool {
        matches!(self, Token::End(name) if name == tag)
    }
}

/// Splits markup into start tags, end tags and text. Comments, doctype and
/// processing instructions are skipped; a `<` that does not open a tag is text.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let Some(rel) = input[pos..].find('<') else {
            tokens.push(Token::Text(input[pos..].to_string()));
            break;
        };
        let lt = pos + rel;
        if rel > 0 {
            tokens.push(Token::Text(input[pos..lt].to_string()));
        }

        let rest = &input[lt..];
        if rest.starts_with("<!--") {
            pos = rest.find("-->").map(|e| lt + e + 3).unwrap_or(input.len());
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            pos = rest.find('>').map(|e| lt + e + 1).unwrap_or(input.len());
            continue;
        }

        let opens_tag = rest[1..]
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '/')
            .unwrap_or(false);
        if !opens_tag {
            tokens.push(Token::Text("<".to_string()));
            pos = lt + 1;
            continue;
        }

        match find_tag_end(rest) {
            Some(end) => {
                tokens.push(parse_tag(&rest[1..end]));
                pos = lt + end + 1;
            }
            None => {
                tokens.push(Token::Text(rest.to_string()));
                break;
            }
        }
    }

    tokens
}

/// Byte offset of the `>` closing the tag at the start of `s`, skipping quoted values.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i),
            None => {}
        }
    }
    None
}

fn parse_tag(inner: &str) -> Token {
    if let Some(closing) = inner.strip_prefix('/') {
        let name: String = closing
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        return Token::End(name.to_ascii_lowercase());
    }

    let name_len = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    Token::Start {
        name: inner[..name_len].to_ascii_lowercase(),
        attrs: parse_attributes(&inner[name_len..]),
    }
}

/// Parses `KEY="value" key='value' key=value flag` into lowercase keys.
fn parse_attributes(s: &str) -> HashMap<String, String> {
    let chars: Vec<char> = s.chars().collect();
    let mut attrs = HashMap::new();
    let mut i = 0;

    while i < chars.len() {
        while i < chars.len() && (chars[i].is_whitespace() || chars[i] == '/') {
            i += 1;
        }
        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '=' && chars[i] != '/' {
            i += 1;
        }
        if start == i {
            i += 1;
            continue;
        }
        let key: String = chars[start..i].iter().collect::<String>().to_ascii_lowercase();

        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if i < chars.len() && chars[i] == '=' {
            i += 1;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            if i < chars.len() && (chars[i] == '"' || chars[i] == '\'') {
                let quote = chars[i];
                i += 1;
                let vstart = i;
                while i < chars.len() && chars[i] != quote {
                    i += 1;
                }
                value = chars[vstart..i].iter().collect();
                i += 1;
            } else {
                let vstart = i;
                while i < chars.len() && !chars[i].is_whitespace() {
                    i += 1;
                }
                value = chars[vstart..i].iter().collect();
            }
        }

        attrs.entry(key).or_insert_with(|| unescape_html(&value));
    }

    attrs
}

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Collects text up to and including `</tag>`. Inline markup is ignored;
    /// a structural tag ends the text early when the close tag is missing.
    fn text_until(&mut self, tag: &str) -> String {
        let mut text = String::new();
        while let Some(token) = self.peek() {
            match token {
                _ if token.is_end(tag) => {
                    self.pos += 1;
                    break;
                }
                Token::Start { name, .. } if is_structural(name) => break,
                Token::End(name) if name == "dl" => break,
                Token::Text(t) => {
                    text.push_str(t);
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        unescape_html(text.trim()).trim().to_string()
    }

    /// Skips past the `</DL>` closing a list whose `<DL>` was just read,
    /// including any lists nested inside it.
    fn skip_list(&mut self) {
        let mut open = 1usize;
        while let Some(token) = self.tokens.get(self.pos) {
            self.pos += 1;
            if token.is_start("dl") {
                open += 1;
            } else if token.is_end("dl") {
                open -= 1;
                if open == 0 {
                    break;
                }
            }
        }
    }

    /// Consumes a `<DL>` that belongs to the folder header just read.
    ///
    /// Whitespace, paragraph marks and a `<DD>` description may sit between
    /// the header and its list.
    fn list_follows(&mut self) -> bool {
        let mut lookahead = self.pos;
        while let Some(token) = self.tokens.get(lookahead) {
            let skippable = match token {
                Token::Text(_) => true,
                Token::Start { name, .. } => name == "p" || name == "dd",
                Token::End(name) => name == "p" || name == "dd" || name == "h3",
            };
            if !skippable {
                break;
            }
            lookahead += 1;
        }

        match self.tokens.get(lookahead) {
            Some(token) if token.is_start("dl") => {
                self.pos = lookahead + 1;
                true
            }
            _ => false,
        }
    }
}

fn is_structural(name: &str) -> bool {
    matches!(name, "dt" | "dl" | "h3" | "a" | "dd")
}

// ─── Serialization ───

/// Renders the whole tree as a bookmark file.
pub fn serialize_document(items: &[BookmarkItem]) -> String {
    let mut out = String::from(HEADER);
    render_items(items, 1, &mut out);
    out.push_str(FOOTER);
    out
}

/// Renders only the selected ids.
///
/// A selected node is kept with its whole subtree. An unselected folder is
/// kept, pruned to its selected descendants, only when at least one of them
/// survives.
pub fn export_selected(items: &[BookmarkItem], ids: &HashSet<String>) -> String {
    serialize_document(&select(items, ids))
}

/// The pruned tree used by [`export_selected`].
pub fn select(items: &[BookmarkItem], ids: &HashSet<String>) -> Tree {
    let mut kept = Tree::new();
    for item in items {
        if ids.contains(item.id()) {
            kept.push(item.clone());
            continue;
        }
        if let BookmarkItem::Folder(folder) = item {
            let children = select(&folder.children, ids);
            if !children.is_empty() {
                kept.push(BookmarkItem::Folder(Folder {
                    id: folder.id.clone(),
                    title: folder.title.clone(),
                    children,
                    created_at: folder.created_at,
                }));
            }
        }
    }
    kept
}

fn render_items(items: &[BookmarkItem], depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    for item in items {
        match item {
            BookmarkItem::Folder(folder) => {
                let ts = folder.created_at.timestamp();
                out.push_str(&format!(
                    "{}<DT><H3 ADD_DATE=\"{}\" LAST_MODIFIED=\"{}\">{}</H3>\n",
                    indent,
                    ts,
                    ts,
                    escape_html(&folder.title)
                ));
                out.push_str(&format!("{}<DL><p>\n", indent));
                render_items(&folder.children, depth + 1, out);
                out.push_str(&format!("{}</DL><p>\n", indent));
            }
            BookmarkItem::Bookmark(bookmark) => {
                let ts = bookmark.created_at.timestamp();
                let mut attrs = format!(
                    "HREF=\"{}\" ADD_DATE=\"{}\" LAST_MODIFIED=\"{}\"",
                    escape_html(&bookmark.url),
                    ts,
                    ts
                );
                if !bookmark.tags.is_empty() {
                    attrs.push_str(&format!(" TAGS=\"{}\"", escape_html(&bookmark.tags.join(","))));
                }
                if bookmark.is_favorite {
                    attrs.push_str(&format!(" ICON=\"{}\"", FAVORITE_ICON));
                }
                out.push_str(&format!(
                    "{}<DT><A {}>{}</A>\n",
                    indent,
                    attrs,
                    escape_html(&bookmark.title)
                ));
            }
        }
    }
}

// ─── Entities ───

fn escape_html(s: &str) -> String {
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

fn unescape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&after[..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
