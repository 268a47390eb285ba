/// Line-based document model.
///
/// The document is an ordered sequence of lines and nothing else. There is no
/// persistent parse tree: classification is re-derived from the raw text on
/// every render, and every edit replaces the whole line array. Lines carry no
/// identity across edits except their positional index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Build a document from raw text, splitting on newlines.
    ///
    /// CRLF line endings are normalized to LF so that line offsets never
    /// include carriage returns.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { lines }
    }

    /// Reassemble the raw text. `from_text` -> `to_text` is lossless for
    /// LF-terminated input.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    /// Replace the whole line array. This is the only mutation primitive the
    /// engine uses besides `splice_lines`; partial in-place string edits are
    /// not supported.
    pub fn replace_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    /// Replace one line with zero or more lines, renumbering everything after
    /// it. Out-of-range indices are a no-op.
    pub fn splice_line(&mut self, index: usize, replacement: Vec<String>) {
        if index < self.lines.len() {
            self.lines.splice(index..=index, replacement);
        }
    }

    pub fn set_line(&mut self, index: usize, text: String) {
        if let Some(line) = self.lines.get_mut(index) {
            *line = text;
        }
    }
}
