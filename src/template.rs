//! Alternating static/dynamic accumulator shared by the attribute compiler and
//! the child flattener.

use crate::error::{LowerError, LowerErrorKind, LowerResult};

/// Lowered template: `statics.len() == dynamics.len() + 1` once validated.
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredForm<T> {
    pub statics: Vec<String>,
    pub dynamics: Vec<T>,
    pub extra_args: Vec<T>,
}

#[derive(Debug)]
pub struct TemplateParts<T> {
    statics: Vec<String>,
    dynamics: Vec<T>,
    last_was_dynamic: bool,
}

impl<T> TemplateParts<T> {
    /// Start with a single static fragment.
    pub fn seeded(first: impl Into<String>) -> Self {
        Self {
            statics: vec![first.into()],
            dynamics: Vec::new(),
            last_was_dynamic: false,
        }
    }

    /// Append to the current (last) static fragment.
    pub fn append_static(&mut self, text: &str) {
        match self.statics.last_mut() {
            Some(last) => last.push_str(text),
            None => self.statics.push(text.to_string()),
        }
    }

    /// Start a new static fragment. Marks static.
    pub fn push_static(&mut self, text: impl Into<String>) {
        self.statics.push(text.into());
        self.last_was_dynamic = false;
    }

    /// Two dynamics in a row are separated by an empty static.
    pub fn push_dynamic(&mut self, value: T) {
        if self.last_was_dynamic {
            self.statics.push(String::new());
        }
        self.dynamics.push(value);
        self.last_was_dynamic = true;
    }

    /// Add text after the last operation: a new fragment if that was dynamic,
    /// otherwise appended to the current one. Marks static.
    pub fn text(&mut self, text: &str) {
        if self.last_was_dynamic {
            self.push_static(text);
        } else {
            self.append_static(text);
        }
    }

    /// Forget the previous operation. Used between the opening tag and the children.
    pub fn reset_last_operation(&mut self) {
        self.last_was_dynamic = false;
    }

    /// Check the alternation invariant and produce the final form.
    pub fn finish(self) -> LowerResult<LoweredForm<T>> {
        if self.statics.len() != self.dynamics.len() + 1 {
            return Err(LowerError::new(LowerErrorKind::TemplateInvariantViolation {
                statics: self.statics.len(),
                dynamics: self.dynamics.len(),
            }));
        }
        Ok(LoweredForm {
            statics: self.statics,
            dynamics: self.dynamics,
            extra_args: Vec::new(),
        })
    }
}
