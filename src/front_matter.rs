//! Metadata header handling.
//!
//! Post sources start with `key: value` lines terminated by a line holding
//! only `---`. The first such line ends the header; everything after it is
//! the body.

use std::collections::BTreeMap;

/// Parsed `key: value` pairs from the header. Keys are lower-cased.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    fields: BTreeMap<String, String>,
}

impl FrontMatter {
    fn parse(header: &str) -> Self {
        let mut fields = BTreeMap::new();
        for line in header.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            fields.insert(key, unquote(value.trim()).to_string());
        }
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn slug(&self) -> Option<&str> {
        self.get("slug").filter(|slug| !slug.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split a post source into its header and its trimmed body.
///
/// Without a `---` line the whole input is the body and the header is empty.
pub fn split(raw: &str) -> (FrontMatter, &str) {
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        let end = offset + line.len();
        if line.trim() == "---" {
            return (FrontMatter::parse(&raw[..offset]), raw[end..].trim());
        }
        offset = end;
    }

    (FrontMatter::default(), raw)
}

/// Return the body of a post source, dropping the header.
pub fn extract_content(raw: &str) -> &str {
    split(raw).1
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_header() {
        let raw = "title: Rack and Stack\nslug: rack-and-stack\n---\n\n## Intro\nBody\n\n";
        assert_eq!(extract_content(raw), "## Intro\nBody");
    }

    #[test]
    fn no_delimiter_returns_input_unchanged() {
        let raw = "  ## Heading\n\nNo header here.\n";
        assert_eq!(extract_content(raw), raw);
    }

    #[test]
    fn only_first_delimiter_counts() {
        assert_eq!(extract_content("a: 1\n---\nbody\n---\nmore"), "body\n---\nmore");
    }

    #[test]
    fn leading_delimiter_leaves_yaml_in_body() {
        let (front, body) = split("---\ntitle: x\n---\ntext");
        assert!(front.is_empty());
        assert_eq!(body, "title: x\n---\ntext");
    }

    #[test]
    fn delimiter_with_crlf_and_spaces() {
        assert_eq!(extract_content("slug: a\r\n  ---  \r\nbody\r\n"), "body");
    }

    #[test]
    fn dashes_inside_a_line_are_not_a_delimiter() {
        let raw = "text --- more\n----\n";
        assert_eq!(extract_content(raw), raw);
    }

    #[test]
    fn parses_fields() {
        let (front, _) = split(
            "Title: \"Server Rack Installs\"\nslug: 'rack-installs'\nnot a field\nurl: https://x.com/a\n---\n",
        );
        assert_eq!(front.title(), Some("Server Rack Installs"));
        assert_eq!(front.slug(), Some("rack-installs"));
        assert_eq!(front.get("url"), Some("https://x.com/a"));
        assert_eq!(front.get("not a field"), None);
    }

    #[test]
    fn empty_slug_is_absent() {
        let (front, _) = split("slug:\n---\nbody");
        assert_eq!(front.slug(), None);
        assert!(!front.is_empty());
    }
}
