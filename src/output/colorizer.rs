// Line-oriented markdown colorizer for terminal output
//
// Works on whole lines: the streaming variant buffers partial lines until a
// newline arrives, so inline markers split across tokens are still styled
// correctly. A line inside a fenced code block is always code-styled, and the
// fence itself toggles that state.

use crossterm::style::Stylize;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s").unwrap());
static UNORDERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*+]\s").unwrap());
static ORDERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+\.\s").unwrap());
static QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*>\s").unwrap());
static TABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\|\s.*\s\|\s*$").unwrap());
static RULE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*---\s*$").unwrap());

static UNORDERED_CAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*[-*+]\s)(.*)$").unwrap());
static ORDERED_CAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*\d+\.\s)(.*)$").unwrap());
static QUOTE_CAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*>\s)(.*)$").unwrap());

static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`[^`]+`").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*[^*\n]+\*\*").unwrap());
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_[^_\n]+_").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]+\]\([^)]+\)").unwrap());

static MARKDOWN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^#{1,6}\s",
        r"^\s*[-*+]\s",
        r"^\s*\d+\.\s",
        r"\*\*.*?\*\*",
        r"\*.*?\*",
        r"`[^`]+`",
        r"```",
        r"\[.*?\]\(.*?\)",
        r"^\s*>\s",
        r"^\s*---\s*$",
        r"^\s*\|\s.*\s\|\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Structural classification of a single markdown line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Fence,
    CodeBlock,
    Header,
    UnorderedItem,
    OrderedItem,
    Quote,
    TableRow,
    Rule,
    Text,
}

/// Classify one line, updating the code-fence state. Fence detection wins
/// over everything else; inside a fence every line is code.
pub fn classify_line(line: &str, in_code_block: &mut bool) -> LineKind {
    if line.trim().starts_with("```") {
        *in_code_block = !*in_code_block;
        return LineKind::Fence;
    }
    if *in_code_block {
        return LineKind::CodeBlock;
    }
    if HEADER_RE.is_match(line) {
        LineKind::Header
    } else if UNORDERED_RE.is_match(line) {
        LineKind::UnorderedItem
    } else if ORDERED_RE.is_match(line) {
        LineKind::OrderedItem
    } else if QUOTE_RE.is_match(line) {
        LineKind::Quote
    } else if TABLE_RE.is_match(line) {
        LineKind::TableRow
    } else if RULE_RE.is_match(line) {
        LineKind::Rule
    } else {
        LineKind::Text
    }
}

fn colorize_line(line: &str, in_code_block: &mut bool) -> String {
    match classify_line(line, in_code_block) {
        LineKind::Fence | LineKind::CodeBlock => line.green().to_string(),
        LineKind::Header => line.cyan().bold().to_string(),
        LineKind::UnorderedItem => styled_prefix(line, &UNORDERED_CAP, PrefixStyle::List),
        LineKind::OrderedItem => styled_prefix(line, &ORDERED_CAP, PrefixStyle::List),
        LineKind::Quote => styled_prefix(line, &QUOTE_CAP, PrefixStyle::Quote),
        LineKind::TableRow => line.blue().to_string(),
        LineKind::Rule => line.dim().to_string(),
        LineKind::Text => apply_inline_styles(line),
    }
}

enum PrefixStyle {
    List,
    Quote,
}

fn styled_prefix(line: &str, re: &Regex, style: PrefixStyle) -> String {
    let Some(caps) = re.captures(line) else {
        return apply_inline_styles(line);
    };
    let prefix = &caps[1];
    let rest = &caps[2];
    let styled = match style {
        PrefixStyle::List => prefix.yellow().to_string(),
        PrefixStyle::Quote => prefix.dark_grey().to_string(),
    };
    styled + &apply_inline_styles(rest)
}

fn apply_inline_styles(line: &str) -> String {
    let line = INLINE_CODE_RE.replace_all(line, |caps: &regex::Captures| {
        caps[0].green().to_string()
    });
    let line = BOLD_RE.replace_all(&line, |caps: &regex::Captures| caps[0].bold().to_string());
    let line = ITALIC_RE.replace_all(&line, |caps: &regex::Captures| {
        caps[0].magenta().to_string()
    });
    LINK_RE
        .replace_all(&line, |caps: &regex::Captures| {
            caps[0].blue().underlined().to_string()
        })
        .into_owned()
}

/// Heuristic: text is treated as markdown when at least 20% of its first 20
/// lines contain markdown syntax.
pub fn is_markdown(text: &str) -> bool {
    let lines: Vec<&str> = text.lines().collect();
    let check = lines.len().min(20);
    if check == 0 {
        return false;
    }

    let markdown_lines = lines[..check]
        .iter()
        .filter(|line| MARKDOWN_PATTERNS.iter().any(|p| p.is_match(line)))
        .count();

    markdown_lines as f64 >= check as f64 * 0.2
}

/// Colorize a complete markdown document. Returns the text unchanged when
/// colors are disabled or the text does not look like markdown.
pub fn colorize_markdown(text: &str, enabled: bool) -> String {
    if !enabled || !is_markdown(text) {
        return text.to_string();
    }

    let mut in_code_block = false;
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| colorize_line(line, &mut in_code_block))
        .collect();
    lines.join("\n")
}

/// Token-by-token colorizer for streaming output. Complete lines are emitted
/// styled; the partial tail stays buffered until its newline (or `finalize`).
pub struct StreamingColorizer {
    buffer: String,
    in_code_block: bool,
    enabled: bool,
}

impl StreamingColorizer {
    pub fn new(enabled: bool) -> Self {
        Self {
            buffer: String::new(),
            in_code_block: false,
            enabled,
        }
    }

    pub fn process_token(&mut self, token: &str) -> String {
        if !self.enabled {
            return token.to_string();
        }

        let mut out = String::new();
        for ch in token.chars() {
            if ch != '\n' {
                self.buffer.push(ch);
                continue;
            }
            out.push_str(&colorize_line(&self.buffer, &mut self.in_code_block));
            out.push('\n');
            self.buffer.clear();
        }
        out
    }

    /// Flush the buffered partial line, if any.
    pub fn finalize(&mut self) -> String {
        if !self.enabled || self.buffer.is_empty() {
            return String::new();
        }
        let remaining = colorize_line(&self.buffer, &mut self.in_code_block);
        self.buffer.clear();
        remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_all(text: &str) -> Vec<LineKind> {
        let mut in_code = false;
        text.lines()
            .map(|l| classify_line(l, &mut in_code))
            .collect()
    }

    #[test]
    fn classifies_structural_lines() {
        assert_eq!(classify_all("## Title"), vec![LineKind::Header]);
        assert_eq!(classify_all("- item"), vec![LineKind::UnorderedItem]);
        assert_eq!(classify_all("  2. second"), vec![LineKind::OrderedItem]);
        assert_eq!(classify_all("> quoted"), vec![LineKind::Quote]);
        assert_eq!(classify_all("| a | b |"), vec![LineKind::TableRow]);
        assert_eq!(classify_all("---"), vec![LineKind::Rule]);
        assert_eq!(classify_all("plain prose"), vec![LineKind::Text]);
    }

    #[test]
    fn fence_toggles_code_block_state() {
        let kinds = classify_all("```rust\nlet x = 1;\n# not a header\n```\n# header");
        assert_eq!(
            kinds,
            vec![
                LineKind::Fence,
                LineKind::CodeBlock,
                LineKind::CodeBlock,
                LineKind::Fence,
                LineKind::Header,
            ]
        );
    }

    #[test]
    fn header_like_line_inside_fence_is_code() {
        let mut in_code = true;
        assert_eq!(classify_line("# looks like header", &mut in_code), LineKind::CodeBlock);
    }

    #[test]
    fn streaming_buffers_partial_lines() {
        let mut sc = StreamingColorizer::new(true);
        // No newline yet, nothing should be emitted.
        assert_eq!(sc.process_token("## Ti"), "");
        let out = sc.process_token("tle\nbody");
        assert!(out.contains("Title"));
        assert!(out.ends_with('\n'));
        // "body" is still buffered.
        let tail = sc.finalize();
        assert!(tail.contains("body"));
        assert_eq!(sc.finalize(), "");
    }

    #[test]
    fn streaming_handles_marker_split_across_tokens() {
        let mut sc = StreamingColorizer::new(true);
        sc.process_token("some **bo");
        let out = sc.process_token("ld** text\n");
        // The complete line is styled once assembled, bold markers intact.
        assert!(out.contains("**bold**"));
        assert!(out.contains("\x1b["));
    }

    #[test]
    fn streaming_fence_state_persists_across_tokens() {
        let mut fenced = StreamingColorizer::new(true);
        fenced.process_token("```\n");
        let inside = fenced.process_token("# inside\n");

        let mut plain = StreamingColorizer::new(true);
        let outside = plain.process_token("# inside\n");

        // Inside a fence the line is code-styled, not header-styled.
        assert_ne!(inside, outside);
    }

    #[test]
    fn disabled_colorizer_passes_tokens_through() {
        let mut sc = StreamingColorizer::new(false);
        assert_eq!(sc.process_token("## raw\n"), "## raw\n");
        assert_eq!(sc.finalize(), "");
    }

    #[test]
    fn inline_styles_apply_to_list_item_body() {
        let mut in_code = false;
        let out = colorize_line("- has `code` in it", &mut in_code);
        assert!(out.contains("`code`"));
        assert!(out.contains("\x1b["));
    }

    #[test]
    fn detects_markdown_by_density() {
        assert!(is_markdown("# Title\n\n- one\n- two\n"));
        assert!(!is_markdown(
            "just a plain paragraph\nwith ordinary text\nand nothing else\nacross lines\nat all\n"
        ));
        assert!(!is_markdown(""));
    }

    #[test]
    fn colorize_markdown_leaves_plain_text_alone() {
        let plain = "hello there\nnothing fancy\nplain words\nmore plain\nstill plain";
        assert_eq!(colorize_markdown(plain, true), plain);
        let md = "# Title\n- a\n- b";
        assert_ne!(colorize_markdown(md, true), md);
        assert_eq!(colorize_markdown(md, false), md);
    }
}
