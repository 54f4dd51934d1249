use std::borrow::Cow;

use tracing::debug;

use super::scanner::Scanner;
use crate::entity::EntityResolver;

impl<R: EntityResolver> Scanner<R> {
    /// Decode the character reference after an already consumed `&`.
    ///
    /// The reference runs to the next buffered `;`, wherever it is. If the
    /// text in between resolves, the cursor moves past the `;` and the decoded
    /// text is returned. Otherwise nothing more is consumed and the caller
    /// keeps the `&` literally; the rest is scanned as ordinary input.
    ///
    /// A `;` that has not been fed yet cannot be found, so a reference split
    /// across chunks stays literal.
    pub(super) fn consume_character_reference(&mut self) -> Option<Cow<'static, str>> {
        let Some(end) = self.input.find_from_cursor(';') else {
            debug!(position = %self.input.position(), "no ';' buffered after '&'");
            return None;
        };
        let start = self.input.index();
        let name = self.input.slice(start, end);
        let Some(text) = self.resolver.resolve(&name) else {
            debug!(%name, position = %self.input.position(), "unresolved character reference");
            return None;
        };
        // Step over the name and the ';' one character at a time so the
        // column stays exact.
        self.input.consume_n(end + 1 - start);
        Some(text)
    }
}
