//! Prompt assembly from style preferences and a normalized diff.

use crate::config::{Length, StyleConfig, Tone};
use crate::slimdiff::NormalizedDiff;

const BASE_INSTRUCTIONS: &str = "\
You are generating a Git commit message for the staged changes shown in the diff below.
Describe what changed and why, based only on the diff.
Use the imperative mood in the subject line (\"add\", \"fix\", \"remove\") and keep it under 72 characters.";

const EMOJI_ON: &str = "\
Start the subject line with one emoji that matches the kind of change \
(for example \u{2728} new feature, \u{1f41b} bug fix, \u{1f4dd} docs, \u{267b}\u{fe0f} refactor).";

const EMOJI_OFF: &str = "Do not use emoji anywhere in the message.";

const CONVENTIONAL_ON: &str = "\
Format the subject as `type(scope): description` following Conventional Commits. \
Type is one of feat, fix, docs, style, refactor, perf, test, build, ci, chore. \
The scope is optional and names the affected area.";

const CONVENTIONAL_OFF: &str = "Write the subject as a plain sentence without a `type:` prefix.";

const CLOSING: &str = "\
Output only the raw commit message. No markdown fences, no quotes, no explanation.";

/// A fully assembled prompt: instructions first, diff second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    instruction_len: usize,
}

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte length of the instruction block.
    pub fn instruction_len(&self) -> usize {
        self.instruction_len
    }

    pub fn instructions(&self) -> &str {
        &self.text[..self.instruction_len]
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

fn tone_directive(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => {
            "Tone: professional. Be formal and matter-of-fact; use precise technical wording and no slang."
        }
        Tone::Casual => "Tone: casual. Keep it light but clear; plain everyday wording is fine.",
        Tone::Friendly => {
            "Tone: friendly. Be warm and approachable while staying accurate about the change."
        }
    }
}

fn length_directive(length: Length) -> String {
    match length.bullet_range() {
        None => "Length: write a single subject line only. Do not add a body or any further lines."
            .to_string(),
        Some((min, max)) => format!(
            "Length: write a subject line, then a blank line, then a body of {min} to {max} \
             bullet points starting with \"- \", one line each."
        ),
    }
}

/// The style-derived instruction block.
pub fn build_instructions(style: &StyleConfig) -> String {
    let length = length_directive(style.length);
    let parts: [&str; 6] = [
        BASE_INSTRUCTIONS,
        if style.use_emoji { EMOJI_ON } else { EMOJI_OFF },
        if style.use_conventional {
            CONVENTIONAL_ON
        } else {
            CONVENTIONAL_OFF
        },
        tone_directive(style.tone),
        &length,
        CLOSING,
    ];
    parts.join("\n\n")
}

/// Assemble the prompt sent to the model. Deterministic for equal inputs.
pub fn assemble(style: &StyleConfig, diff: &NormalizedDiff) -> Prompt {
    let mut text = build_instructions(style);
    text.push_str("\n\nDiff:\n");
    let instruction_len = text.len();
    text.push_str(diff.as_str());

    Prompt {
        text,
        instruction_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slimdiff::normalize_bytes;

    fn style(length: Length) -> StyleConfig {
        StyleConfig {
            length,
            ..StyleConfig::default()
        }
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let diff = normalize_bytes(b"+foo\n-bar\n");
        let style = StyleConfig {
            use_emoji: true,
            use_conventional: true,
            tone: Tone::Friendly,
            length: Length::Normal,
        };
        assert_eq!(assemble(&style, &diff), assemble(&style, &diff));
    }

    #[test]
    fn test_instructions_precede_diff() {
        let diff = normalize_bytes(b"+foo\n-bar\n");
        let prompt = assemble(&StyleConfig::default(), &diff);

        assert!(prompt.as_str().ends_with("+foo\n-bar\n"));
        assert_eq!(&prompt.as_str()[prompt.instruction_len()..], "+foo\n-bar\n");
        assert_eq!(prompt.len(), prompt.instruction_len() + diff.len());
    }

    #[test]
    fn test_short_never_requests_body() {
        let instructions = build_instructions(&style(Length::Short)).to_lowercase();
        assert!(instructions.contains("single subject line only"));
        assert!(!instructions.contains("bullet"));
        assert!(!instructions.contains("then a body"));
    }

    #[test]
    fn test_long_requests_two_to_six_bullets() {
        let instructions = build_instructions(&style(Length::Long));
        assert!(instructions.contains("2 to 6 bullet points"));
    }

    #[test]
    fn test_normal_requests_one_to_four_bullets() {
        let instructions = build_instructions(&style(Length::Normal));
        assert!(instructions.contains("1 to 4 bullet points"));
    }

    #[test]
    fn test_emoji_toggle() {
        let on = build_instructions(&StyleConfig {
            use_emoji: true,
            ..StyleConfig::default()
        });
        let off = build_instructions(&StyleConfig::default());
        assert!(on.contains(EMOJI_ON));
        assert!(!on.contains(EMOJI_OFF));
        assert!(off.contains(EMOJI_OFF));
    }

    #[test]
    fn test_conventional_toggle() {
        let on = build_instructions(&StyleConfig {
            use_conventional: true,
            ..StyleConfig::default()
        });
        assert!(on.contains("`type(scope): description`"));
        assert!(!build_instructions(&StyleConfig::default()).contains(CONVENTIONAL_ON));
    }

    #[test]
    fn test_each_tone_has_distinct_directive() {
        let rendered: Vec<String> = Tone::ALL
            .iter()
            .map(|&tone| {
                build_instructions(&StyleConfig {
                    tone,
                    ..StyleConfig::default()
                })
            })
            .collect();
        assert_ne!(rendered[0], rendered[1]);
        assert_ne!(rendered[1], rendered[2]);
        assert!(rendered[0].contains("Tone: professional"));
    }

    #[test]
    fn test_instructions_depend_only_on_style() {
        let a = assemble(&StyleConfig::default(), &normalize_bytes(b"+a\n"));
        let b = assemble(&StyleConfig::default(), &normalize_bytes(b"+bbbb\n"));
        assert_eq!(a.instructions(), b.instructions());
    }
}
