//! Grammatical keywords that prefix step names.

use std::fmt;

use crate::error::ConstructionError;

/// The keyword a step is registered under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// Arrange.
    Given,
    /// Act.
    When,
    /// Assert.
    Then,
    /// Continues the previous phase.
    And,
    /// Continues the previous phase with a contrast.
    But,
}

impl Keyword {
    /// The keyword as written in step names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// Compose a step name from `message`, making it a sentence that starts
    /// with this keyword.
    ///
    /// A message that already opens with the keyword (ignoring ASCII case)
    /// is kept as written; otherwise the keyword and a space are prepended.
    ///
    /// ```
    /// use stepwise::step::Keyword;
    ///
    /// assert_eq!(Keyword::Given.sentence("a blog").unwrap(), "Given a blog");
    /// assert_eq!(Keyword::Given.sentence("given a blog").unwrap(), "given a blog");
    /// assert_eq!(Keyword::When.sentence("Whenever").unwrap(), "When Whenever");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::EmptyMessage`] if `message` is blank.
    pub fn sentence(self, message: &str) -> Result<String, ConstructionError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ConstructionError::EmptyMessage { keyword: self });
        }
        if self.opens(message) {
            Ok(message.to_owned())
        } else {
            Ok(format!("{} {message}", self.as_str()))
        }
    }

    fn opens(self, text: &str) -> bool {
        let word = self.as_str();
        let Some(head) = text.get(..word.len()) else {
            return false;
        };
        head.eq_ignore_ascii_case(word)
            && text[word.len()..]
                .chars()
                .next()
                .is_none_or(char::is_whitespace)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
