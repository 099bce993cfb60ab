use std::ops::Range;

/// A single list item with at most one level of child items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub text: String,
    pub children: Vec<String>,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

/// Block-level elements parsed from Markdown.
///
/// Text is kept as written in the source; inline formatting happens when a
/// block is serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        lines: Vec<String>,
    },
    CodeBlock {
        /// Tag after the opening fence. Not emitted, block markup has no slot for it.
        language: Option<String>,
        lines: Vec<String>,
    },
    List(List),
    /// Only paragraphs and unordered lists appear inside a quote.
    Quote(Vec<Block>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Rule,
}

impl Block {
    /// Short name used by the inspector and in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::CodeBlock { .. } => "code",
            Block::List(list) if list.ordered => "ordered-list",
            Block::List(_) => "list",
            Block::Quote(_) => "quote",
            Block::Table { .. } => "table",
            Block::Rule => "separator",
        }
    }
}

/// A block together with the input lines it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub block: Block,
    /// Zero-based, half-open range of line indices.
    pub lines: Range<usize>,
}

impl Spanned {
    /// One-line summary: 1-based line range, block kind, text preview.
    pub fn describe(&self) -> String {
        let range = format!("{}-{}", self.lines.start + 1, self.lines.end);
        format!("{:>9}  {:<12} {}", range, self.block.kind(), preview(&self.block))
    }
}

const PREVIEW_CHARS: usize = 40;

fn preview(block: &Block) -> String {
    let text = match block {
        Block::Heading { text, .. } => text.clone(),
        Block::Paragraph { lines } => lines.join(" "),
        Block::CodeBlock { language, lines } => match language {
            Some(language) => format!("[{}] {} lines", language, lines.len()),
            None => format!("{} lines", lines.len()),
        },
        Block::List(list) => format!("{} items", list.items.len()),
        Block::Quote(inner) => format!("{} inner blocks", inner.len()),
        Block::Table { headers, rows } => format!("{} | {} rows", headers.join(" | "), rows.len()),
        Block::Rule => String::new(),
    };

    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        text
    }
}
