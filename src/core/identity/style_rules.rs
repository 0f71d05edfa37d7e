//! Post-hoc style filter for drafted replies.
//!
//! A pure function of the draft and the identity decision: the same pair
//! always yields the same text.

use regex::Regex;
use std::sync::LazyLock;

use crate::core::constraints::{Disposition, MaxLength};

use super::types::IdentityDecision;

const MAX_SHORT_LINES: usize = 8;
const EMPTY_FALLBACK: &str = "Noted.";

static STALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:sit tight|wait|give me time|give me a moment|give me a minute)\b")
        .expect("valid stall regex")
});
static EXCITEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:i\s*['’]?m\s+excited|i\s*['’]?m\s+thrilled)\b")
        .expect("valid excitement regex")
});
static CANNOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bI can\s*not\b").expect("valid cannot regex"));
static CANT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bI can't\b").expect("valid can't regex"));
static LEADING_SORRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|\n)\s*sorry[\s,.:;-]*").expect("valid leading sorry regex")
});
static SORRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsorry\b").expect("valid sorry regex"));
static MAYBE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmaybe(?:\s+maybe)+\b").expect("valid maybe regex"));
static POSSIBLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bpossibly(?:\s+possibly)+\b").expect("valid possibly regex")
});
static I_THINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bi think(?:\s+i think)+\b").expect("valid hedge regex"));
static INLINE_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid inline space regex"));
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank run regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleOptions {
    pub allow_sorry: bool,
}

fn normalize_whitespace(text: &str) -> String {
    let unix = text.replace("\r\n", "\n");
    let spaced = INLINE_SPACE_RE.replace_all(&unix, " ");
    BLANK_RUN_RE.replace_all(&spaced, "\n\n").trim().to_string()
}

fn cap_hedges(text: &str) -> String {
    let out = MAYBE_RE.replace_all(text, "maybe");
    let out = POSSIBLY_RE.replace_all(&out, "possibly");
    I_THINK_RE.replace_all(&out, "I think").into_owned()
}

/// Keep the first question mark and drop every later one.
fn enforce_single_question(text: &str) -> String {
    match text.find('?') {
        Some(first) => {
            let (head, tail) = text.split_at(first + 1);
            let mut out = String::with_capacity(text.len());
            out.push_str(head);
            out.extend(tail.chars().filter(|c| *c != '?'));
            out
        }
        None => text.to_string(),
    }
}

fn keep_first_lines(text: &str, limit: usize) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(limit)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Filter a draft so it respects the identity decision.
///
/// Removes stalling and excitement phrasing, rewrites "I can't" to
/// "I'm not able to", strips apologies unless allowed, collapses repeated
/// hedges, keeps one question under ask or pause, and trims short or
/// over-explaining replies to eight lines. Empty output becomes `""` when
/// silence is allowed and `"Noted."` otherwise.
pub fn apply_style_rules(draft: &str, decision: &IdentityDecision, opts: StyleOptions) -> String {
    let out = STALL_RE.replace_all(draft, "");
    let out = EXCITEMENT_RE.replace_all(&out, "");
    let out = CANNOT_RE.replace_all(&out, "I'm not able to");
    let mut out = CANT_RE.replace_all(&out, "I'm not able to").into_owned();

    if !opts.allow_sorry {
        out = LEADING_SORRY_RE.replace_all(&out, "${1}").into_owned();
        out = SORRY_RE.replace_all(&out, "").into_owned();
    }

    out = cap_hedges(&out);

    if matches!(decision.disposition, Disposition::Ask | Disposition::Pause) {
        out = enforce_single_question(&out);
    }

    if decision.constraints.forbid_over_explain
        || decision.output_limits.max_length == MaxLength::Short
    {
        out = keep_first_lines(&out, MAX_SHORT_LINES);
    }

    let out = normalize_whitespace(&out);
    if !out.is_empty() {
        out
    } else if decision.constraints.silence_allowed {
        String::new()
    } else {
        EMPTY_FALLBACK.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::types::{IdentityConstraints, OutputLimits};

    fn decision(disposition: Disposition, max_length: MaxLength) -> IdentityDecision {
        IdentityDecision {
            disposition,
            confidence: 0.8,
            constraints: IdentityConstraints::default(),
            output_limits: OutputLimits {
                max_length,
                ..OutputLimits::default()
            },
        }
    }

    #[test]
    fn ask_keeps_exactly_one_question() {
        let d = decision(Disposition::Ask, MaxLength::Short);
        let out = apply_style_rules("Which env? Prod? Or staging?", &d, StyleOptions::default());
        assert_eq!(out.matches('?').count(), 1);
        assert!(out.starts_with("Which env?"));
    }

    #[test]
    fn act_keeps_all_questions() {
        let d = decision(Disposition::Act, MaxLength::Medium);
        let out = apply_style_rules("Why? Because. Really?", &d, StyleOptions::default());
        assert_eq!(out.matches('?').count(), 2);
    }

    #[test]
    fn removes_stalling_and_excitement() {
        let d = decision(Disposition::Act, MaxLength::Medium);
        let out = apply_style_rules(
            "I'm excited to help. Give me a moment. Here is the plan.",
            &d,
            StyleOptions::default(),
        );
        assert!(!out.to_lowercase().contains("excited"));
        assert!(!out.to_lowercase().contains("give me a moment"));
        assert!(out.contains("Here is the plan."));
    }

    #[test]
    fn rewrites_cannot() {
        let d = decision(Disposition::Act, MaxLength::Medium);
        let out = apply_style_rules("I can't do that. I cannot either.", &d, StyleOptions::default());
        assert_eq!(out, "I'm not able to do that. I'm not able to either.");
    }

    #[test]
    fn strips_sorry_unless_allowed() {
        let d = decision(Disposition::Act, MaxLength::Medium);
        let stripped = apply_style_rules("Sorry, the build failed.", &d, StyleOptions::default());
        assert_eq!(stripped, "the build failed.");
        let kept = apply_style_rules(
            "Sorry, the build failed.",
            &d,
            StyleOptions { allow_sorry: true },
        );
        assert_eq!(kept, "Sorry, the build failed.");
    }

    #[test]
    fn collapses_repeated_hedges() {
        let d = decision(Disposition::Act, MaxLength::Medium);
        let out = apply_style_rules("Maybe maybe maybe later.", &d, StyleOptions::default());
        assert_eq!(out, "maybe later.");
    }

    #[test]
    fn short_limit_keeps_eight_lines() {
        let d = decision(Disposition::Act, MaxLength::Short);
        let draft = (1..=12).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n\n");
        let out = apply_style_rules(&draft, &d, StyleOptions::default());
        assert_eq!(out.lines().count(), 8);
        assert!(out.ends_with("line 8"));
    }

    #[test]
    fn empty_output_respects_silence() {
        let mut d = decision(Disposition::Pause, MaxLength::Short);
        assert_eq!(apply_style_rules("Sit tight.", &d, StyleOptions::default()), ".");
        assert_eq!(apply_style_rules("   ", &d, StyleOptions::default()), "");
        d.constraints.silence_allowed = false;
        assert_eq!(apply_style_rules("sorry", &d, StyleOptions::default()), "Noted.");
    }

    #[test]
    fn whitespace_is_normalized() {
        let d = decision(Disposition::Act, MaxLength::Medium);
        let out = apply_style_rules("a\t\tb\r\n\r\n\r\n\r\nc  ", &d, StyleOptions::default());
        assert_eq!(out, "a b\n\nc");
    }
}
