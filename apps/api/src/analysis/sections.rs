//! Splits a free-text assessment into its named sections.
//!
//! Models format headings loosely ("2. SCORE ANALYSIS", "**Key Strengths:**",
//! "## FINAL RECOMMENDATION"), so headings are matched case-insensitively
//! after any numbering or markdown at the start of a line. A heading that
//! only appears mid-sentence is used as a last resort. A section whose
//! heading never appears is empty.

use serde::Serialize;

pub const SECTION_HEADINGS: [&str; 6] = [
    "EXECUTIVE SUMMARY",
    "SCORE ANALYSIS",
    "KEY STRENGTHS",
    "AREAS FOR CONSIDERATION",
    "INTERVIEW RECOMMENDATIONS",
    "FINAL RECOMMENDATION",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSections {
    pub executive_summary: String,
    pub score_analysis: String,
    pub key_strengths: String,
    pub areas_for_consideration: String,
    pub interview_recommendations: String,
    pub final_recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAnalysis {
    pub raw_text: String,
    pub sections: AnalysisSections,
}

/// Where a heading sits: `cut` ends the previous section, `body` starts this one.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeadingSpan {
    cut: usize,
    body: usize,
}

fn is_heading_prefix(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '#' | '*' | '_' | '.' | ')' | ' ' | '\t')
}

fn is_heading_suffix(c: char) -> bool {
    matches!(c, '*' | '_' | '#' | ':' | '-' | ' ' | '\t')
}

/// Finds `heading` in `lower` at or after byte `from`. `lower` must be the
/// ASCII-lowercased text so byte offsets line up with the original.
fn locate(lower: &str, heading: &str, from: usize) -> Option<HeadingSpan> {
    let needle = heading.to_ascii_lowercase();

    let mut line_start = from;
    for line in lower[from..].split_inclusive('\n') {
        let trimmed = line.trim_start_matches(is_heading_prefix);
        if trimmed.starts_with(&needle) {
            let offset = line.len() - trimmed.len();
            return Some(HeadingSpan {
                cut: line_start,
                body: line_start + offset + needle.len(),
            });
        }
        line_start += line.len();
    }

    lower[from..].find(&needle).map(|pos| HeadingSpan {
        cut: from + pos,
        body: from + pos + needle.len(),
    })
}

/// Text after `start` up to `end` (or the end of the text), trimmed. Returns
/// an empty string when `start` does not appear.
pub fn extract_section(text: &str, start: &str, end: Option<&str>) -> String {
    extract_until_any(text, start, end.as_slice())
}

/// Like [`extract_section`], stopping at whichever of `ends` comes first.
fn extract_until_any(text: &str, start: &str, ends: &[&str]) -> String {
    let lower = text.to_ascii_lowercase();
    let Some(span) = locate(&lower, start, 0) else {
        return String::new();
    };

    let stop = ends
        .iter()
        .filter_map(|heading| locate(&lower, heading, span.body))
        .map(|next| next.cut)
        .min()
        .unwrap_or(text.len());
    clean_body(&text[span.body..stop])
}

/// Drops the heading's trailing markup (`**:`) without touching list markers
/// on the lines below it.
fn clean_body(body: &str) -> String {
    let (first_line, rest) = body.split_once('\n').unwrap_or((body, ""));
    let first_line = first_line.trim_start_matches(is_heading_suffix).trim();
    if first_line.is_empty() {
        rest.trim().to_string()
    } else {
        format!("{first_line}\n{rest}").trim().to_string()
    }
}

/// Splits a model reply into the six assessment sections. A section ends at
/// the next listed heading that is present, so one skipped heading does not
/// swallow the rest of the reply.
pub fn parse_analysis(text: &str) -> CandidateAnalysis {
    let section =
        |i: usize| extract_until_any(text, SECTION_HEADINGS[i], &SECTION_HEADINGS[i + 1..]);

    CandidateAnalysis {
        raw_text: text.to_string(),
        sections: AnalysisSections {
            executive_summary: section(0),
            score_analysis: section(1),
            key_strengths: section(2),
            areas_for_consideration: section(3),
            interview_recommendations: section(4),
            final_recommendation: section(5),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "\
1. EXECUTIVE SUMMARY
Strong backend engineer with relevant cloud experience.

2. SCORE ANALYSIS: The overall score of 82 reflects full skill coverage.

3. **Key Strengths**
- Python and AWS in production
- Led a data platform team

4. AREAS FOR CONSIDERATION
No Kafka experience.

5. INTERVIEW RECOMMENDATIONS
Ask about event streaming.

6. FINAL RECOMMENDATION
Advance to the technical interview.";

    #[test]
    fn test_numbered_headings_split_cleanly() {
        let analysis = parse_analysis(REPLY);
        let s = &analysis.sections;

        assert_eq!(
            s.executive_summary,
            "Strong backend engineer with relevant cloud experience."
        );
        assert_eq!(
            s.score_analysis,
            "The overall score of 82 reflects full skill coverage."
        );
        assert_eq!(
            s.key_strengths,
            "- Python and AWS in production\n- Led a data platform team"
        );
        assert_eq!(s.areas_for_consideration, "No Kafka experience.");
        assert_eq!(s.interview_recommendations, "Ask about event streaming.");
        assert_eq!(s.final_recommendation, "Advance to the technical interview.");
        assert_eq!(analysis.raw_text, REPLY);
    }

    #[test]
    fn test_missing_heading_gives_empty_section() {
        let text = "EXECUTIVE SUMMARY\nGood fit.\nFINAL RECOMMENDATION\nHire.";
        let analysis = parse_analysis(text);

        assert_eq!(analysis.sections.score_analysis, "");
        assert_eq!(analysis.sections.key_strengths, "");
        assert_eq!(analysis.sections.final_recommendation, "Hire.");
        assert_eq!(analysis.sections.executive_summary, "Good fit.");
    }

    #[test]
    fn test_single_end_marker_runs_to_end_when_absent() {
        let text = "EXECUTIVE SUMMARY\nGood fit.\nFINAL RECOMMENDATION\nHire.";
        assert_eq!(
            extract_section(text, "EXECUTIVE SUMMARY", Some("SCORE ANALYSIS")),
            "Good fit.\nFINAL RECOMMENDATION\nHire."
        );
    }

    #[test]
    fn test_heading_mentioned_in_prose_is_not_a_boundary() {
        let text = "## Executive Summary\nSee the score analysis below.\n\
                    ## Score Analysis\nSolid.";
        assert_eq!(
            extract_section(text, "EXECUTIVE SUMMARY", Some("SCORE ANALYSIS")),
            "See the score analysis below."
        );
    }

    #[test]
    fn test_inline_heading_is_a_last_resort() {
        let text = "Overall: EXECUTIVE SUMMARY - promising candidate";
        assert_eq!(
            extract_section(text, "EXECUTIVE SUMMARY", None),
            "promising candidate"
        );
    }

    #[test]
    fn test_text_without_headings() {
        let analysis = parse_analysis("The model ignored the format.");
        assert_eq!(analysis.sections, AnalysisSections::default());
        assert_eq!(analysis.raw_text, "The model ignored the format.");
    }
}
