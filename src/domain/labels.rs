//! Lane label styles and label text generation

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

const LETTERS: usize = 26;

/// How lane markers are labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkStyle {
    LettersLower,
    #[default]
    LettersUpper,
    Numeric,
    Custom,
}

/// Label configuration for lane markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub marks: MarkStyle,
    /// User-supplied labels, used when `marks` is [`MarkStyle::Custom`]
    #[serde(default)]
    pub custom_marks: Vec<String>,
    /// Rotation applied to custom labels, in degrees
    #[serde(default)]
    pub rotation_degrees: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            marks: MarkStyle::LettersUpper,
            custom_marks: Vec::new(),
            rotation_degrees: 0.0,
        }
    }
}

impl LabelStyle {
    pub const MIN_ROTATION: f64 = -90.0;
    pub const MAX_ROTATION: f64 = 90.0;

    /// Replace the custom list from multi-line text, one label per line
    pub fn set_custom_marks_from_text(&mut self, text: &str) {
        self.custom_marks = text.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect();
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation_degrees = degrees.clamp(Self::MIN_ROTATION, Self::MAX_ROTATION);
    }

    /// Custom labels are left-aligned and rotated; the rest are centered
    pub fn is_custom(&self) -> bool {
        self.marks == MarkStyle::Custom
    }

    /// Label text for the lane marker at `index` (zero-based, click order)
    ///
    /// Letters wrap after 26 markers with a cycle suffix: index 26 is
    /// `"A.2"`, index 52 is `"A.3"`. Numbers never wrap. Custom lists do not
    /// wrap; running past the end is a configuration error.
    pub fn label(&self, index: usize) -> Result<String, ConfigurationError> {
        match self.marks {
            MarkStyle::LettersLower => Ok(letter_label(index, b'a')),
            MarkStyle::LettersUpper => Ok(letter_label(index, b'A')),
            MarkStyle::Numeric => Ok((index + 1).to_string()),
            MarkStyle::Custom => self.custom_marks.get(index).cloned().ok_or(
                ConfigurationError::CustomLabelsExhausted {
                    index,
                    available: self.custom_marks.len(),
                },
            ),
        }
    }

    /// Labels for `count` markers, failing on the first one without text
    pub fn labels(&self, count: usize) -> Result<Vec<String>, ConfigurationError> {
        (0..count).map(|i| self.label(i)).collect()
    }
}

fn letter_label(index: usize, base: u8) -> String {
    let letter = char::from(base + (index % LETTERS) as u8);
    let cycle = index / LETTERS;
    if cycle == 0 {
        letter.to_string()
    } else {
        format!("{}.{}", letter, cycle + 1)
    }
}
