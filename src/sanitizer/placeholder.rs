//! Placeholder protection for regions that a later textual pass must not touch.

/// Ordered store of protected regions and the tokens standing in for them.
///
/// Tokens have the shape `U+E000 LABEL [salt] N U+E001`. The prefix is chosen
/// so that it does not occur anywhere in the document being protected, which
/// makes every token unique within that document. Tokens contain no
/// whitespace, `=`, `<` or `>`, so the minifier and the attribute strippers
/// pass over them unchanged.
///
/// Tag-shaped tokens are additionally wrapped in `<` and `>`, so the minifier
/// treats them like the block-level element they stand in for.
#[derive(Debug)]
pub(crate) struct Placeholders {
    prefix: String,
    open: &'static str,
    close: &'static str,
    entries: Vec<String>,
}

const TOKEN_START: char = '\u{E000}';
const TOKEN_END: char = '\u{E001}';

impl Placeholders {
    /// Create a store whose tokens cannot collide with anything in `document`.
    pub(crate) fn for_document(document: &str, label: &str) -> Self {
        let mut prefix = format!("{TOKEN_START}{label}");
        let mut salt = 0usize;
        while document.contains(&prefix) {
            salt += 1;
            prefix = format!("{TOKEN_START}{label}{salt}x");
        }
        Self {
            prefix,
            open: "",
            close: "",
            entries: Vec::new(),
        }
    }

    /// Like [`for_document`](Self::for_document), with tokens shaped as tags.
    pub(crate) fn tag_shaped(document: &str, label: &str) -> Self {
        Self {
            open: "<",
            close: ">",
            ..Self::for_document(document, label)
        }
    }

    /// Record `content` and return the token that replaces it.
    pub(crate) fn protect(&mut self, content: impl Into<String>) -> String {
        let token = format!(
            "{}{}{}{TOKEN_END}{}",
            self.open,
            self.prefix,
            self.entries.len(),
            self.close
        );
        self.entries.push(content.into());
        token
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substitute every token in `text` with its original content.
    ///
    /// The scan is a single left-to-right pass, so restored content is never
    /// searched for tokens again.
    pub(crate) fn restore(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }

        let lead = format!("{}{}", self.open, self.prefix);
        let tail = format!("{TOKEN_END}{}", self.close);

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(at) = rest.find(&lead) {
            out.push_str(&rest[..at]);
            let after = &rest[at + lead.len()..];
            let digits = after
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after.len());
            let content = after[..digits]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.entries.get(index));

            match (content, after[digits..].strip_prefix(tail.as_str())) {
                (Some(content), Some(remaining)) => {
                    out.push_str(content);
                    rest = remaining;
                }
                _ => {
                    out.push_str(&lead);
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}
