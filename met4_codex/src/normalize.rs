// Text normalization for extracted corpus text.
//
// Raw text arrives from an external PDF extraction step with mixed line
// endings, form feeds at page boundaries, ragged trailing whitespace, and
// thesis-specific section markers of the form `— > TITLE < —`. `normalize`
// turns that into the canonical form both the analyzer and the surrounding
// tooling expect: `\n` line endings, markers as `## TITLE` headings, at most
// one blank line between paragraphs, no leading/trailing whitespace.
//
// `normalize` is total and idempotent: `normalize(normalize(x)) == normalize(x)`.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_ENDINGS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());

static TRAILING_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+$").unwrap());

/// A whole line of optional dashes/whitespace, `>`, the title, `<`, optional
/// dashes/whitespace. The title is captured without its surrounding spaces.
static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-—\s]*>\s*(.+?)\s*<\s*[-—\s]*$").unwrap());

static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Canonicalize raw extracted text.
pub fn normalize(raw: &str) -> String {
    let unix = LINE_ENDINGS_RE.replace_all(raw, "\n").replace('\u{000C}', "\n\n");

    let lines: Vec<String> = unix
        .split('\n')
        .map(|line| {
            let line = TRAILING_WS_RE.replace(line, "");
            if let Some(caps) = MARKER_RE.captures(&line) {
                // A whitespace-only title would leave trailing blanks behind.
                return format!("## {}", &caps[1])
                    .trim_end_matches([' ', '\t'])
                    .to_string();
            }
            line.into_owned()
        })
        .collect();
    let joined = lines.join("\n");

    BLANK_RUN_RE.replace_all(&joined, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_endings_unified() {
        assert_eq!(normalize("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_form_feed_becomes_paragraph_break() {
        assert_eq!(normalize("page one\u{000C}page two"), "page one\n\npage two");
    }

    #[test]
    fn test_trailing_whitespace_stripped() {
        assert_eq!(normalize("alpha  \t\nbeta \n gamma"), "alpha\nbeta\n gamma");
    }

    #[test]
    fn test_marker_becomes_heading() {
        assert_eq!(normalize("intro\n— > SIKL 1 < —\nbody"), "intro\n## SIKL 1\nbody");
        assert_eq!(normalize("-- >  Metamorfosis  < --"), "## Metamorfosis");
        assert_eq!(normalize(">TITLE<"), "## TITLE");
    }

    #[test]
    fn test_non_marker_lines_untouched() {
        // Arrow-like text that is not a whole-line marker.
        assert_eq!(normalize("a > b < c"), "a > b < c");
        assert_eq!(normalize("> quote"), "> quote");
        assert_eq!(normalize("><"), "><");
    }

    #[test]
    fn test_blank_runs_collapsed() {
        assert_eq!(normalize("one\n\n\n\ntwo\n\n\nthree"), "one\n\ntwo\n\nthree");
        // Whitespace-only lines become empty first, then collapse.
        assert_eq!(normalize("one\n  \n\t\n\ntwo"), "one\n\ntwo");
    }

    #[test]
    fn test_outer_whitespace_trimmed() {
        assert_eq!(normalize("\n\n  hello world  \n\n"), "hello world");
    }

    #[test]
    fn test_empty_and_blank_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \r\n\u{000C}\t"), "");
    }

    #[test]
    fn test_blank_marker_title_leaves_no_trailing_whitespace() {
        assert_eq!(normalize("intro\n> <\nbody"), "intro\n##\nbody");
        assert_eq!(normalize("->\t<"), "##");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "plain text",
            "a\r\n\r\n\r\n\r\nb",
            "  — > CYCLE < —  \r\nbody\u{000C}\u{000C}more   \n\n\n",
            "@APOLO  \n\n\n\n@DAFNE.\t\n",
            "> nested > markers < <",
            "\u{000C}\r\r\r",
            "## already heading\n\nparagraph",
            "x\n \n \n \ny",
            "> <",
            "->\t<",
            "intro\n> <\nbody",
            "->\t<\n\n\u{feff}\u{85}\u{2028}",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
