use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, List, ListItem, Spanned};

const FENCE: &str = "```";

static TABLE_ROW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\|.+\|$").unwrap());
static ORDERED_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.\s").unwrap());
static ORDERED_CHILD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {2,3}- ").unwrap());

/// Parse markdown text into a list of blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    parse_spanned(markdown)
        .into_iter()
        .map(|spanned| spanned.block)
        .collect()
}

/// Parse markdown text, keeping the range of input lines behind each block.
pub fn parse_spanned(markdown: &str) -> Vec<Spanned> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut parser = LineParser {
        lines: &lines,
        pos: 0,
    };
    let mut blocks = Vec::new();

    while parser.pos < lines.len() {
        if lines[parser.pos].trim().is_empty() {
            parser.pos += 1;
            continue;
        }

        let start = parser.pos;
        let block = parser.next_block();
        blocks.push(Spanned {
            block,
            lines: start..parser.pos,
        });
    }

    blocks
}

/// Which structural rule fires at a line. `None` means paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Start {
    Fence,
    Quote,
    Table,
    Heading(u8),
    UnorderedItem,
    OrderedItem,
    Rule,
}

struct LineParser<'a> {
    lines: &'a [&'a str],
    pos: usize,
}

impl<'a> LineParser<'a> {
    fn trimmed(&self, idx: usize) -> &'a str {
        self.lines[idx].trim()
    }

    fn start_at(&self, idx: usize) -> Option<Start> {
        let line = self.trimmed(idx);

        if line.starts_with(FENCE) {
            Some(Start::Fence)
        } else if line.starts_with('>') {
            Some(Start::Quote)
        } else if is_table_row(line)
            && idx + 1 < self.lines.len()
            && is_table_row(self.trimmed(idx + 1))
        {
            Some(Start::Table)
        } else if line.starts_with("### ") {
            Some(Start::Heading(3))
        } else if line.starts_with("## ") {
            Some(Start::Heading(2))
        } else if is_unordered_item(line) {
            Some(Start::UnorderedItem)
        } else if ORDERED_ITEM_RE.is_match(line) {
            Some(Start::OrderedItem)
        } else if line == "---" {
            Some(Start::Rule)
        } else {
            None
        }
    }

    fn next_block(&mut self) -> Block {
        match self.start_at(self.pos) {
            Some(Start::Fence) => self.code_block(),
            Some(Start::Quote) => self.quote(),
            Some(Start::Table) => self.table(),
            Some(Start::Heading(level)) => {
                let marker_len = usize::from(level) + 1;
                let text = self.trimmed(self.pos)[marker_len..].trim().to_string();
                self.pos += 1;
                Block::Heading { level, text }
            }
            Some(Start::UnorderedItem) => self.unordered_list(),
            Some(Start::OrderedItem) => self.ordered_list(),
            Some(Start::Rule) => {
                self.pos += 1;
                Block::Rule
            }
            None => self.paragraph(),
        }
    }

    fn code_block(&mut self) -> Block {
        let tag = self.trimmed(self.pos)[FENCE.len()..].trim();
        let language = (!tag.is_empty()).then(|| tag.to_string());
        self.pos += 1;

        let mut lines = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            self.pos += 1;
            if line.trim().starts_with(FENCE) {
                break;
            }
            lines.push(line.to_string());
        }

        Block::CodeBlock { language, lines }
    }

    fn quote(&mut self) -> Block {
        let mut inner = Vec::new();
        while self.pos < self.lines.len() {
            let Some(rest) = self.trimmed(self.pos).strip_prefix('>') else {
                break;
            };
            inner.push(rest.trim_start());
            self.pos += 1;
        }

        Block::Quote(quote_blocks(&inner))
    }

    fn table(&mut self) -> Block {
        let mut rows = Vec::new();
        while self.pos < self.lines.len() && is_table_row(self.trimmed(self.pos)) {
            rows.push(split_row(self.trimmed(self.pos)));
            self.pos += 1;
        }

        // The second row is the dashed separator and carries no content.
        let mut rows = rows.into_iter();
        let headers = rows.next().unwrap_or_default();
        rows.next();

        Block::Table {
            headers,
            rows: rows.collect(),
        }
    }

    fn unordered_list(&mut self) -> Block {
        let mut items = Vec::new();
        while self.pos < self.lines.len() && is_unordered_item(self.trimmed(self.pos)) {
            let text = self.trimmed(self.pos)[2..].trim().to_string();
            self.pos += 1;
            let children = self.children(is_unordered_child);
            items.push(ListItem { text, children });
        }

        Block::List(List {
            ordered: false,
            items,
        })
    }

    fn ordered_list(&mut self) -> Block {
        let mut items = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.trimmed(self.pos);
            let Some(marker) = ORDERED_ITEM_RE.find(line) else {
                break;
            };
            let text = line[marker.end()..].trim().to_string();
            self.pos += 1;
            let children = self.children(|raw| ORDERED_CHILD_RE.is_match(raw));
            items.push(ListItem { text, children });
        }

        Block::List(List {
            ordered: true,
            items,
        })
    }

    /// Consume the indented child items directly after a list item.
    fn children(&mut self, is_child: impl Fn(&str) -> bool) -> Vec<String> {
        let mut children = Vec::new();
        while self.pos < self.lines.len() && is_child(self.lines[self.pos]) {
            children.push(self.trimmed(self.pos)[2..].trim().to_string());
            self.pos += 1;
        }
        children
    }

    /// A blank line or any block start ends a paragraph. A table-looking line
    /// counts even when it is alone and the table rule would not fire.
    fn ends_paragraph(&self, idx: usize) -> bool {
        let line = self.trimmed(idx);
        line.is_empty() || is_table_row(line) || self.start_at(idx).is_some()
    }

    fn paragraph(&mut self) -> Block {
        let mut lines = vec![self.trimmed(self.pos).to_string()];
        self.pos += 1;

        while self.pos < self.lines.len() && !self.ends_paragraph(self.pos) {
            lines.push(self.trimmed(self.pos).to_string());
            self.pos += 1;
        }

        Block::Paragraph { lines }
    }
}

/// Segment the stripped lines of a quote into paragraphs and flat lists.
fn quote_blocks(lines: &[&str]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
        } else if is_unordered_item(line) {
            let mut items = Vec::new();
            while i < lines.len() && is_unordered_item(lines[i].trim()) {
                items.push(ListItem {
                    text: lines[i].trim()[2..].trim().to_string(),
                    children: Vec::new(),
                });
                i += 1;
            }
            blocks.push(Block::List(List {
                ordered: false,
                items,
            }));
        } else {
            let mut paragraph = Vec::new();
            while i < lines.len() {
                let line = lines[i].trim();
                if line.is_empty() || is_unordered_item(line) {
                    break;
                }
                paragraph.push(line.to_string());
                i += 1;
            }
            blocks.push(Block::Paragraph { lines: paragraph });
        }
    }

    blocks
}

fn is_table_row(line: &str) -> bool {
    TABLE_ROW_RE.is_match(line)
}

fn is_unordered_item(line: &str) -> bool {
    line.starts_with("- ") || line.starts_with("* ")
}

fn is_unordered_child(raw: &str) -> bool {
    raw.starts_with("  - ") || raw.starts_with("  * ")
}

/// Split a `| a | b |` row into trimmed cells, dropping the empty cells
/// outside the outer pipes.
fn split_row(line: &str) -> Vec<String> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(String::from).collect()
}
