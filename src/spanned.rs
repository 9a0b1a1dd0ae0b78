use chumsky::span::SimpleSpan;

/// A value together with the byte range of the notation text it was read from.
///
/// Equality only looks at the value, so two fields parsed from different positions
/// compare equal when they say the same thing.
#[derive(Debug, Clone, Copy)]
pub struct Spanned<T> {
    pub span: SimpleSpan<usize>,
    pub val: T,
}

impl<T> Spanned<T> {
    pub fn new(val: T, span: SimpleSpan<usize>) -> Self {
        Spanned { span, val }
    }
}

impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}

impl<T: Eq> Eq for Spanned<T> {}
