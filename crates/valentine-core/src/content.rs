//! Personalized texts shown on each stage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("recipient name cannot be empty")]
    EmptyName,
    #[error("at least one reason is required")]
    NoReasons,
    #[error("at least one journey entry is required")]
    NoJourney,
    #[error("the letter needs at least one paragraph")]
    EmptyLetter,
    #[error("invalid content document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Icon shown next to a journey entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyIcon {
    Camera,
    Message,
    MapPin,
    Calendar,
    Moon,
}

impl JourneyIcon {
    pub fn glyph(&self) -> char {
        match self {
            JourneyIcon::Camera => '📷',
            JourneyIcon::Message => '💬',
            JourneyIcon::MapPin => '📍',
            JourneyIcon::Calendar => '📅',
            JourneyIcon::Moon => '🌙',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyEntry {
    pub title: String,
    pub text: String,
    pub icon: JourneyIcon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Letter {
    /// Label written on the closed envelope
    pub envelope_label: String,
    pub salutation: String,
    pub paragraphs: Vec<String>,
    pub closing: String,
    pub signature: String,
    /// Caption of the button leading to the question
    pub continue_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Who the page is for
    pub name: String,
    pub identity_subtitle: String,
    pub denied_title: String,
    pub welcome_lines: Vec<String>,
    pub welcome_quote: String,
    pub reasons_title: String,
    pub reasons: Vec<String>,
    pub reasons_footer: String,
    pub journey_title: String,
    pub journey: Vec<JourneyEntry>,
    pub journey_closing: String,
    pub letter: Letter,
    pub question: String,
    pub success_title: String,
    pub success_hint: String,
}

impl Content {
    /// Parse a JSON document and validate it. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let content: Content = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    pub fn to_json(&self) -> Result<String, ContentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.name.trim().is_empty() {
            return Err(ContentError::EmptyName);
        }
        if self.reasons.is_empty() {
            return Err(ContentError::NoReasons);
        }
        if self.journey.is_empty() {
            return Err(ContentError::NoJourney);
        }
        if self.letter.paragraphs.is_empty() {
            return Err(ContentError::EmptyLetter);
        }
        Ok(())
    }

    /// Replace the recipient name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.trim().to_string();
        self
    }

    pub fn identity_title(&self) -> String {
        format!("Are you {}?", self.name)
    }

    pub fn denied_message(&self) -> String {
        format!("This page is only for {}.", self.name)
    }

    pub fn greeting(&self) -> String {
        format!("Hi {} 💕", self.name)
    }

    pub fn question_title(&self) -> String {
        format!("{}...", self.name)
    }

    pub fn footer(&self) -> String {
        format!("For {} • Forever", self.name)
    }

    pub fn reason_count(&self) -> usize {
        self.reasons.len()
    }
}

/// Fixed button captions shared by the front ends
pub mod labels {
    pub const IDENTITY_YES: &str = "YES ♥";
    pub const IDENTITY_NO: &str = "NO";
    pub const COME_IN: &str = "Come in →";
    pub const TAP_TO_REVEAL: &str = "Tap to reveal ✨";
    pub const TAP_TO_CONTINUE: &str = "Tap to continue ✨";
    pub const NEXT_CHAPTER: &str = "Next Chapter ⌄";
    pub const PROPOSAL_YES: &str = "YES 💕";
    pub const PROPOSAL_NO: &str = "no";
}

impl Default for Letter {
    fn default() -> Self {
        Self {
            envelope_label: "For You Mama".to_string(),
            salutation: "Hey Mama,".to_string(),
            paragraphs: vec![
                "Being with you has brought a kind of peace I didn't know I needed.".to_string(),
                "I can't believe it was a year ago I was not sure if you'd say yes or not.".to_string(),
                "Thank you for your constant reassurances, for making me feel so safe, and for understanding me even without words.".to_string(),
                "We are so in sync, and I am endlessly grateful that in this big world, I found my person in you.".to_string(),
            ],
            closing: "my achalugo i love you no take backs".to_string(),
            signature: "~your princess".to_string(),
            continue_label: "One last thing...".to_string(),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self {
            name: "Ini".to_string(),
            identity_subtitle: "Please verify your identity.".to_string(),
            denied_title: "Sorry 💔".to_string(),
            welcome_lines: vec!["I made this little space just for you.".to_string()],
            welcome_quote: "\"I wanted something calm, thoughtful, and full of love — because that’s how you make me feel.\"".to_string(),
            reasons_title: "Things I Love About You".to_string(),
            reasons: [
                "Your true smile.",
                "The way you support me, always.",
                "Your prayers that cover us.",
                "Your deep understanding.",
                "How deeply you love us.",
                "When you hold me tight.",
                "How incredibly thoughtful you are.",
                "Your work ethic inspiring me.",
                "Your ability to remember the little things.",
                "How you listen when I rant.",
                "How your reassurances calm me.",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            reasons_footer: "I wish you could see yourself the way I see you.".to_string(),
            journey_title: "Our Journey".to_string(),
            journey: vec![
                JourneyEntry {
                    title: "The Beginning".to_string(),
                    text: "It started when you photobombed me — and I just wanted an excuse to ask for your Instagram.".to_string(),
                    icon: JourneyIcon::Camera,
                },
                JourneyEntry {
                    title: "Getting Closer".to_string(),
                    text: "Calls that lasted for hours. Waiting for your replies. Smiling every time your name popped up on my phone.".to_string(),
                    icon: JourneyIcon::Message,
                },
                JourneyEntry {
                    title: "Long Distance".to_string(),
                    text: "Four to five months apart — but never disconnected. Kept together by communication, prayers, determination, and love.".to_string(),
                    icon: JourneyIcon::MapPin,
                },
                JourneyEntry {
                    title: "One Year Together".to_string(),
                    text: "By Valentine’s Day, it’ll be a full year of us.".to_string(),
                    icon: JourneyIcon::Calendar,
                },
                JourneyEntry {
                    title: "What I’m Most Proud Of".to_string(),
                    text: "It’s not fireworks or grand moments. It’s the consistency. On a random Tuesday, tired and doing nothing, I still prefer your company over anyone else.".to_string(),
                    icon: JourneyIcon::Moon,
                },
            ],
            journey_closing: "I’m proud of how loved I feel with you.".to_string(),
            letter: Letter::default(),
            question: "Will you be my Valentine? 💗💜".to_string(),
            success_title: "VAMOS!!!".to_string(),
            success_hint: "Screenshot this!".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_is_valid() {
        let content = Content::default();
        assert!(content.validate().is_ok());
        assert_eq!(content.reason_count(), 11);
        assert_eq!(content.journey.len(), 5);
        assert_eq!(content.identity_title(), "Are you Ini?");
    }

    #[test]
    fn test_default_texts_keep_their_punctuation() {
        let content = Content::default();
        assert!(content.journey[0].text.contains("photobombed me — and"));
        assert!(content.journey[2]
            .text
            .starts_with("Four to five months apart — but"));
        assert_eq!(
            content.journey[3].text,
            "By Valentine’s Day, it’ll be a full year of us."
        );
        assert_eq!(content.journey[4].title, "What I’m Most Proud Of");
        assert_eq!(
            content.journey_closing,
            "I’m proud of how loved I feel with you."
        );
        assert!(content
            .welcome_quote
            .contains("full of love — because that’s how"));
        assert_eq!(labels::PROPOSAL_NO, "no");
        assert_eq!(labels::IDENTITY_NO, "NO");
    }

    #[test]
    fn test_from_json_partial_document_uses_defaults() {
        let content = Content::from_json(r#"{ "name": "Sam", "reasons": ["One", "Two"] }"#).unwrap();
        assert_eq!(content.name, "Sam");
        assert_eq!(content.reasons, vec!["One", "Two"]);
        assert_eq!(content.journey, Content::default().journey);
    }

    #[test]
    fn test_from_json_rejects_empty_reasons() {
        let err = Content::from_json(r#"{ "reasons": [] }"#).unwrap_err();
        assert!(matches!(err, ContentError::NoReasons));
    }

    #[test]
    fn test_from_json_rejects_blank_name() {
        let err = Content::from_json(r#"{ "name": "   " }"#).unwrap_err();
        assert!(matches!(err, ContentError::EmptyName));
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        let err = Content::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ContentError::Parse(_)));
        assert!(err.to_string().starts_with("invalid content document"));
    }

    #[test]
    fn test_icons_parse_snake_case() {
        let json = r#"{ "journey": [ { "title": "t", "text": "x", "icon": "map_pin" } ] }"#;
        let content = Content::from_json(json).unwrap();
        assert_eq!(content.journey[0].icon, JourneyIcon::MapPin);
    }

    #[test]
    fn test_json_round_trip() {
        let content = Content::default().with_name("  Alex ");
        let parsed = Content::from_json(&content.to_json().unwrap()).unwrap();
        assert_eq!(parsed, content);
        assert_eq!(parsed.name, "Alex");
    }
}
