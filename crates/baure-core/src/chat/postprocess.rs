//! Response post-processor: enforces the answer-length contract on raw
//! backend output and repairs common markdown artifacts.
//!
//! All lengths are counted in characters (Unicode scalar values), never bytes.

use baure_types::config::ChatConfig;

/// Continuation marker appended to a hard-cut answer.
pub const ELLIPSIS: &str = "...";

/// Applies normalization, truncation, and the web-search annotation.
#[derive(Debug, Clone)]
pub struct ResponsePostProcessor {
    local_hard_cap: usize,
    web_hard_cap: usize,
    min_cut_ratio: f64,
    annotation: String,
    normalize: bool,
}

impl ResponsePostProcessor {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            local_hard_cap: config.local_hard_cap,
            web_hard_cap: config.web_hard_cap,
            min_cut_ratio: config.min_cut_ratio,
            annotation: config.web_search_annotation.trim().to_string(),
            normalize: config.normalize_markdown,
        }
    }

    pub fn hard_cap(&self, used_web_search: bool) -> usize {
        if used_web_search {
            self.web_hard_cap
        } else {
            self.local_hard_cap
        }
    }

    /// Turn raw backend text into the final answer.
    ///
    /// The result never exceeds the hard cap for its path, annotation
    /// included.
    pub fn process(&self, raw: &str, used_web_search: bool) -> String {
        let trimmed = raw.trim();
        let body = if self.normalize {
            normalize_markdown(trimmed)
        } else {
            trimmed.to_string()
        };
        let cap = self.hard_cap(used_web_search);

        if !used_web_search || self.annotation.is_empty() {
            return truncate_at_sentence(&body, cap, self.min_cut_ratio);
        }

        let prefix = format!("{}\n\n", self.annotation);
        let prefix_chars = prefix.chars().count();
        if prefix_chars >= cap {
            return truncate_at_sentence(&body, cap, self.min_cut_ratio);
        }
        if body.is_empty() {
            return self.annotation.clone();
        }

        let body = truncate_at_sentence(&body, cap - prefix_chars, self.min_cut_ratio);
        format!("{prefix}{body}")
    }
}

impl Default for ResponsePostProcessor {
    fn default() -> Self {
        Self::new(&ChatConfig::default())
    }
}

/// Cut `text` to at most `cap` characters.
///
/// Prefers ending on the last period inside the window, provided it sits at
/// or past `cap * min_cut_ratio`. Otherwise hard-cuts and appends
/// [`ELLIPSIS`], still within `cap`.
pub fn truncate_at_sentence(text: &str, cap: usize, min_cut_ratio: f64) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    if cap <= ELLIPSIS.len() {
        return text.chars().take(cap).collect();
    }

    let min_pos = (cap as f64 * min_cut_ratio.clamp(0.0, 1.0)) as usize;
    let last_period = text
        .char_indices()
        .take(cap)
        .enumerate()
        .filter(|(_, (_, c))| *c == '.')
        .last();

    if let Some((pos, (byte, _))) = last_period {
        if pos >= min_pos {
            return text[..=byte].to_string();
        }
    }

    let keep = cap - ELLIPSIS.len();
    let end = text
        .char_indices()
        .nth(keep)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len());
    format!("{}{ELLIPSIS}", text[..end].trim_end())
}

/// Repair bullet and spacing artifacts in generated markdown.
///
/// - CRLF becomes LF and every line is trimmed
/// - blank lines and lines holding only `-`, `*` or `•` become paragraph breaks
/// - `•` separators become one `- item` line each
/// - a bold header glued to a numbered step is split onto its own line
/// - runs of paragraph breaks collapse to one blank line, with none at
///   either end
///
/// Applying it twice gives the same result as applying it once.
pub fn normalize_markdown(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = Vec::new();

    for raw in text.split('\n') {
        let line = raw.trim();
        if line.is_empty() || is_marker_only(line) {
            lines.push(String::new());
            continue;
        }

        let mut segments = line.split('•');
        let head = segments.next().unwrap_or_default().trim();
        let items: Vec<&str> = segments.map(str::trim).filter(|s| !s.is_empty()).collect();
        // `• •` and friends carry no text; treat them like a lone marker
        if items.is_empty() && (head.is_empty() || is_marker_only(head)) {
            lines.push(String::new());
            continue;
        }

        if !head.is_empty() && !is_marker_only(head) {
            let head = if items.is_empty() {
                head
            } else {
                strip_header_colon(head)
            };
            push_splitting_header(&mut lines, head);
        }
        for item in items {
            lines.push(format!("- {item}"));
        }
    }

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in &lines {
        if line.is_empty() && out.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

fn is_marker_only(line: &str) -> bool {
    matches!(line, "-" | "*" | "•")
}

/// `**Puntos clave:**:` -> `**Puntos clave:**`
fn strip_header_colon(head: &str) -> &str {
    match head.strip_suffix(':') {
        Some(h) if h.starts_with("**") && h.ends_with("**") && h.len() > 4 => h,
        _ => head,
    }
}

/// Push `line`, moving a numbered step that follows a bold header
/// (`**Cómo hacerlo:** 1. Lavar`) onto its own line.
fn push_splitting_header(lines: &mut Vec<String>, line: &str) {
    if let Some(rest) = line.strip_prefix("**") {
        if let Some(close) = rest.find("**") {
            let header_end = 2 + close + 2;
            let after = line[header_end..].trim_start_matches(':').trim_start();
            if close > 0 && starts_numbered(after) {
                lines.push(line[..header_end].to_string());
                lines.push(after.to_string());
                return;
            }
        }
    }
    lines.push(line.to_string());
}

fn starts_numbered(text: &str) -> bool {
    let digits = text.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && text[digits..].starts_with('.')
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sentence_text(len: usize) -> String {
        "Hola mundo. ".repeat(len / 12 + 1)
    }

    #[test]
    fn test_short_answer_unchanged() {
        assert_eq!(truncate_at_sentence("Corto.", 2000, 0.75), "Corto.");
        let exact = "a".repeat(2000);
        assert_eq!(truncate_at_sentence(&exact, 2000, 0.75), exact);
    }

    #[test]
    fn test_cut_at_late_sentence_boundary() {
        // Period at char index 1799, well past 75% of the cap.
        let text = format!("{}.{}", "a".repeat(1799), "b".repeat(500));
        let out = truncate_at_sentence(&text, 2000, 0.75);
        assert_eq!(out.chars().count(), 1800);
        assert!(out.ends_with('.'));
    }

    #[test]
    fn test_early_boundary_is_rejected() {
        // Only period sits at 10% of the cap: hard cut with ellipsis.
        let text = format!("{}.{}", "a".repeat(199), "b".repeat(3000));
        let out = truncate_at_sentence(&text, 2000, 0.75);
        assert_eq!(out.chars().count(), 2000);
        assert!(out.ends_with(ELLIPSIS));
        assert!(out.starts_with(&"a".repeat(199)));
    }

    #[test]
    fn test_boundary_exactly_at_threshold() {
        let text = format!("{}.{}", "a".repeat(1500), "b".repeat(1000));
        let out = truncate_at_sentence(&text, 2000, 0.75);
        assert_eq!(out.chars().count(), 1501);
        assert!(out.ends_with("a."));
    }

    #[test]
    fn test_period_beyond_cap_is_ignored() {
        let text = format!("{}.", "a".repeat(2500));
        let out = truncate_at_sentence(&text, 2000, 0.75);
        assert!(out.ends_with(ELLIPSIS));
        assert_eq!(out.chars().count(), 2000);
    }

    #[test]
    fn test_truncation_law_over_many_lengths() {
        for cap in [10, 37, 500, 600, 2000] {
            for len in [cap + 1, cap + 7, cap * 2, cap * 5] {
                let text = sentence_text(len);
                let out = truncate_at_sentence(&text, cap, 0.75);
                assert!(out.chars().count() <= cap, "cap {cap} len {len}");
                assert!(out.ends_with('.'), "cap {cap} len {len}");
            }
        }
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let text = "ñ".repeat(2100);
        let out = truncate_at_sentence(&text, 2000, 0.75);
        assert_eq!(out.chars().count(), 2000);
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_tiny_cap() {
        assert_eq!(truncate_at_sentence("abcdef", 2, 0.75), "ab");
    }

    #[test]
    fn test_normalize_inline_bullets() {
        let raw = "**Puntos clave:**: • Yuca fresca • Queso criollo • Fuego lento";
        assert_eq!(
            normalize_markdown(raw),
            "**Puntos clave:**\n- Yuca fresca\n- Queso criollo\n- Fuego lento"
        );
    }

    #[test]
    fn test_normalize_line_bullets() {
        let raw = "**Opciones recomendadas:**\n\n•   **Opción 1:** Tofu\n\n• **Opción 2:** Lentejas";
        assert_eq!(
            normalize_markdown(raw),
            "**Opciones recomendadas:**\n\n- **Opción 1:** Tofu\n\n- **Opción 2:** Lentejas"
        );
    }

    #[test]
    fn test_normalize_numbered_after_header() {
        assert_eq!(
            normalize_markdown("**Cómo hacerlo:**: 1. Pelar la yuca"),
            "**Cómo hacerlo:**\n1. Pelar la yuca"
        );
        assert_eq!(
            normalize_markdown("**Cómo hacerlo:** 12. Servir"),
            "**Cómo hacerlo:**\n12. Servir"
        );
        assert_eq!(
            normalize_markdown("**Nota:** 2024 fue un buen año"),
            "**Nota:** 2024 fue un buen año"
        );
    }

    #[test]
    fn test_normalize_whitespace_and_blank_runs() {
        let raw = "  Hola  \r\n\r\n\r\n\r\n-\n*\n  Adiós\t\n\n\n";
        assert_eq!(normalize_markdown(raw), "Hola\n\nAdiós");
    }

    #[test]
    fn test_normalize_keeps_paragraph_breaks() {
        assert_eq!(normalize_markdown("Uno.\n\nDos."), "Uno.\n\nDos.");
        assert_eq!(
            normalize_markdown("**Respuesta:**\n\nTexto.\n\n**Puntos clave:**\n- a"),
            "**Respuesta:**\n\nTexto.\n\n**Puntos clave:**\n- a"
        );
        assert_eq!(normalize_markdown("Uno.\nDos."), "Uno.\nDos.");
    }

    #[test]
    fn test_normalize_marker_line_becomes_break() {
        assert_eq!(normalize_markdown("2.\t\n-\n X."), "2.\n\nX.");
        assert_eq!(normalize_markdown("a\n• •\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_is_idempotent_on_samples() {
        let samples = [
            "",
            "•",
            "- • a",
            "a • -",
            "**X**: • • b",
            "**Cómo hacerlo:**: 1. Pelar • 2. Cocer",
            "\n\n  \n**Respuesta:**\n\nTexto.\n\n\n\n**Puntos clave:**\n\n• uno\n\n• dos\n*\n",
            "línea\r\notra\rúltima",
            "****: 1. raro",
            "**a** ** b ** 3. c",
            "2.\t\n-\n X.",
            "a\n\nb\n-\nc",
        ];
        for sample in samples {
            let once = normalize_markdown(sample);
            let twice = normalize_markdown(&once);
            assert_eq!(once, twice, "input: {sample:?}");
        }
    }

    const FRAGMENTS: &[&str] = &[
        "a", " ", "\n", "\r", "•", "-", "*", "**", ":", "1", ".", "ñ", "\t", "X", "2.",
    ];

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200_000))]

        #[test]
        fn test_normalize_is_idempotent(
            parts in prop::collection::vec(prop::sample::select(FRAGMENTS), 0..16)
        ) {
            let input = parts.concat();
            let once = normalize_markdown(&input);
            let twice = normalize_markdown(&once);
            prop_assert_eq!(once, twice, "input: {:?}", input);
        }

        #[test]
        fn test_normalize_output_has_no_blank_runs(
            parts in prop::collection::vec(prop::sample::select(FRAGMENTS), 0..16)
        ) {
            let out = normalize_markdown(&parts.concat());
            prop_assert!(!out.contains("\n\n\n"));
            prop_assert!(!out.starts_with('\n'));
            prop_assert!(!out.ends_with('\n'));
        }
    }

    #[test]
    fn test_process_local_answer() {
        let post = ResponsePostProcessor::default();
        let out = post.process("  **Respuesta:**\n\n\n\nSe cocina una hora.  ", false);
        assert_eq!(out, "**Respuesta:**\n\nSe cocina una hora.");
    }

    #[test]
    fn test_process_web_answer_is_annotated_within_cap() {
        let post = ResponsePostProcessor::default();
        let raw = sentence_text(5000);
        let out = post.process(&raw, true);
        assert!(out.starts_with("*Búsqueda web activada*\n\n"));
        assert!(out.chars().count() <= 2000);
        assert!(out.ends_with('.'));
    }

    #[test]
    fn test_process_without_normalization() {
        let config = ChatConfig {
            normalize_markdown: false,
            ..Default::default()
        };
        let post = ResponsePostProcessor::new(&config);
        assert_eq!(post.process(" a • b ", false), "a • b");
    }

    #[test]
    fn test_process_annotation_larger_than_cap_is_skipped() {
        let config = ChatConfig {
            web_hard_cap: 10,
            ..Default::default()
        };
        let post = ResponsePostProcessor::new(&config);
        let out = post.process("Una respuesta larga.", true);
        assert!(out.chars().count() <= 10);
        assert!(!out.contains("Búsqueda"));
    }
}
