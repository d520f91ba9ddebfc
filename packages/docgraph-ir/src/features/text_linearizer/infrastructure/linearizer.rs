//! Token sequence → datasource string

use tracing::trace;

use crate::features::text_linearizer::domain::{LinearizedText, SpacingPolicy, TextChannel};
use crate::shared::models::{TextRange, TokenSlot};

/// Concatenates token content under a spacing policy
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLinearizer {
    policy: SpacingPolicy,
}

impl TextLinearizer {
    pub fn new(policy: SpacingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SpacingPolicy {
        self.policy
    }

    /// Linearize `tokens` (document order) for one channel
    ///
    /// Tokens without content get no offset and do not influence spacing;
    /// no separator follows the last content-bearing token.
    pub fn linearize(&self, tokens: &[TokenSlot<'_>], channel: TextChannel) -> LinearizedText {
        let mut out = LinearizedText {
            text: String::new(),
            offsets: Vec::with_capacity(tokens.len()),
            char_len: 0,
        };
        let mut prev: Option<&TokenSlot<'_>> = None;

        for slot in tokens {
            let Some(content) = channel.content(slot) else {
                out.offsets.push(None);
                continue;
            };

            if let Some(prev) = prev {
                if self.policy.needs_separator(prev, slot) {
                    out.text.push(' ');
                    out.char_len += 1;
                }
            }

            let begin = out.char_len;
            out.text.push_str(content);
            out.char_len += content.chars().count();
            out.offsets.push(Some(TextRange::new(begin, out.char_len)));
            prev = Some(slot);
        }

        trace!(
            channel = ?channel,
            tokens = tokens.len(),
            chars = out.char_len,
            "Linearized tokens"
        );
        out
    }
}
