use crate::block::{Block, List, ListItem};
use crate::inline::{escape_html, format_inline};

/// Convert blocks to block-editor markup.
///
/// Every fragment is followed by a blank line.
pub fn blocks_to_gutenberg(blocks: &[Block]) -> String {
    let mut out = String::new();

    for block in blocks {
        emit_block(block, &mut out);
        out.push_str("\n\n");
    }

    out
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, text } => {
            let attrs = if *level == 2 {
                String::new()
            } else {
                format!(" {{\"level\":{}}}", level)
            };
            out.push_str(&format!("<!-- wp:heading{attrs} -->\n"));
            out.push_str(&format!(
                "<h{level} class=\"wp-block-heading\">{}</h{level}>\n",
                format_inline(text)
            ));
            out.push_str("<!-- /wp:heading -->");
        }
        Block::Paragraph { lines } => {
            let text: Vec<String> = lines.iter().map(|line| format_inline(line)).collect();
            out.push_str("<!-- wp:paragraph -->\n<p>");
            out.push_str(&text.join(" "));
            out.push_str("</p>\n<!-- /wp:paragraph -->");
        }
        Block::CodeBlock { lines, .. } => {
            let escaped: Vec<String> = lines.iter().map(|line| escape_html(line)).collect();
            out.push_str("<!-- wp:code -->\n<pre class=\"wp-block-code\"><code>");
            out.push_str(&escaped.join("\n"));
            out.push_str("</code></pre>\n<!-- /wp:code -->");
        }
        Block::List(list) => emit_list(list, out),
        Block::Quote(inner) => {
            out.push_str("<!-- wp:quote -->\n<blockquote class=\"wp-block-quote\">\n");
            for block in inner {
                emit_block(block, out);
                out.push('\n');
            }
            out.push_str("</blockquote>\n<!-- /wp:quote -->");
        }
        Block::Table { headers, rows } => {
            out.push_str("<!-- wp:table -->\n<figure class=\"wp-block-table\"><table><thead><tr>");
            for cell in headers {
                out.push_str(&format!("<th>{}</th>", format_inline(cell)));
            }
            out.push_str("</tr></thead><tbody>");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    out.push_str(&format!("<td>{}</td>", format_inline(cell)));
                }
                out.push_str("</tr>");
            }
            out.push_str("</tbody></table></figure>\n<!-- /wp:table -->");
        }
        Block::Rule => {
            out.push_str("<!-- wp:separator -->\n");
            out.push_str("<hr class=\"wp-block-separator has-alpha-channel-opacity\"/>\n");
            out.push_str("<!-- /wp:separator -->");
        }
    }
}

fn emit_list(list: &List, out: &mut String) {
    open_list(list.ordered, out);
    for ListItem { text, children } in &list.items {
        emit_item(text, children, out);
    }
    close_list(list.ordered, out);
}

fn open_list(ordered: bool, out: &mut String) {
    if ordered {
        out.push_str("<!-- wp:list {\"ordered\":true} -->\n<ol class=\"wp-block-list\">\n");
    } else {
        out.push_str("<!-- wp:list -->\n<ul class=\"wp-block-list\">\n");
    }
}

fn close_list(ordered: bool, out: &mut String) {
    out.push_str(if ordered { "</ol>" } else { "</ul>" });
    out.push_str("\n<!-- /wp:list -->");
}

// Child items are always a flat unordered list; there is no third level.
fn emit_item(text: &str, children: &[String], out: &mut String) {
    out.push_str("<!-- wp:list-item -->\n<li>");
    out.push_str(&format_inline(text));
    if !children.is_empty() {
        open_list(false, out);
        for child in children {
            emit_item(child, &[], out);
        }
        close_list(false, out);
    }
    out.push_str("</li>\n<!-- /wp:list-item -->\n");
}
