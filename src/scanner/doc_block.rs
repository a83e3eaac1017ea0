//! Doc comment splitting.

use serde::Serialize;

/// A `@name content` line of a doc comment, with its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocTag {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocBlock {
    pub short_description: String,
    pub long_description: String,
    pub tags: Vec<DocTag>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Short,
    Long,
    Tags,
}

impl DocBlock {
    /// Split a `/** ... */` comment.
    ///
    /// The short description runs to the first blank line or the first line
    /// ending in `.`; the long description runs to the first tag.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let text = text.strip_prefix("/**").unwrap_or(text);
        let text = text.strip_suffix("*/").unwrap_or(text);

        let mut short = Vec::new();
        let mut long = Vec::new();
        let mut tags: Vec<DocTag> = Vec::new();
        let mut section = Section::Short;

        for line in text.lines().map(clean_line) {
            if let Some(tag) = line.strip_prefix('@') {
                let (name, content) = match tag.split_once(char::is_whitespace) {
                    Some((name, content)) => (name, content.trim()),
                    None => (tag, ""),
                };
                tags.push(DocTag {
                    name: name.to_string(),
                    content: content.to_string(),
                });
                section = Section::Tags;
                continue;
            }

            match section {
                Section::Short => {
                    if line.is_empty() {
                        if !short.is_empty() {
                            section = Section::Long;
                        }
                        continue;
                    }
                    short.push(line);
                    if line.ends_with('.') {
                        section = Section::Long;
                    }
                }
                Section::Long => long.push(line),
                Section::Tags => {
                    let line = line.trim();
                    if let Some(tag) = tags.last_mut().filter(|_| !line.is_empty()) {
                        if !tag.content.is_empty() {
                            tag.content.push('\n');
                        }
                        tag.content.push_str(line);
                    }
                }
            }
        }

        Self {
            short_description: short.join(" "),
            long_description: long.join("\n").trim().to_string(),
            tags,
        }
    }

    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocTag> + 'a {
        self.tags.iter().filter(move |tag| tag.name == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }
}

/// Strip indentation, the leading `*` and one space after it.
fn clean_line(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_prefix('*').unwrap_or(line);
    line.strip_prefix(' ').unwrap_or(line).trim_end()
}
