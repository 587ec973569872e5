/// Text field as received, before validation.
///
/// Numbers are kept as their decimal text so that they reach the text
/// rules (`42` as a first name fails the digit rule, not decoding).
#[derive(Debug, Clone, PartialEq)]
pub enum RawText {
    Text(String),
    /// Anything that is neither a string nor a number (bool, array, object)
    Other,
}

impl RawText {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawText::Text(text) => Some(text),
            RawText::Other => None,
        }
    }
}

impl From<&str> for RawText {
    fn from(text: &str) -> Self {
        RawText::Text(text.to_string())
    }
}

impl From<String> for RawText {
    fn from(text: String) -> Self {
        RawText::Text(text)
    }
}
