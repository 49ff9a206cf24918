/// The freeform notes document. Its content is opaque markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes {
    pub text: String,
}

impl Notes {
    pub fn new(text: impl Into<String>) -> Self {
        Notes { text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
