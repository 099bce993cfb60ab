mod block;
pub mod config;
pub mod error;
pub mod front_matter;
mod gutenberg;
pub mod inline;
pub mod logging;
mod parser;
pub mod publish;
pub mod wordpress;

pub use block::{Block, List, ListItem, Spanned};
pub use config::{Config, PostEntry};
pub use error::{Error, Result};
pub use front_matter::extract_content;

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Parse markdown text, keeping the input line range of each block.
pub fn parse_spanned(markdown: &str) -> Vec<Spanned> {
    parser::parse_spanned(markdown)
}

/// Convert a markdown body to block-editor markup.
///
/// The body must already have its front matter removed. Never fails: anything
/// unrecognised becomes a paragraph.
pub fn markdown_to_gutenberg(markdown: &str) -> String {
    let blocks = parse(markdown);
    gutenberg::blocks_to_gutenberg(&blocks)
}

/// Strip the front matter of a post source, then convert the body.
pub fn post_to_gutenberg(source: &str) -> String {
    markdown_to_gutenberg(extract_content(source))
}
