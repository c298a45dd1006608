//! Canonical keys for two-party message threads.
//!
//! A peer-to-peer thread between users `a` and `b` is identified by
//! `"{min}-{max}"`. The key does not depend on who sent a given message, so
//! "all messages between A and B" is a single equality filter.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR: char = '-';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    #[error("a conversation requires two distinct participants")]
    SelfConversation,
    #[error("participant id must be positive, got {0}")]
    InvalidParticipant(i64),
    #[error("a message needs either a receiver or a case worker")]
    MissingCounterpart,
    #[error("malformed conversation id: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId {
    low: i64,
    high: i64,
}

impl ConversationId {
    /// Derives the canonical key for the pair `(a, b)`.
    ///
    /// # Errors
    /// Returns `ConversationError::SelfConversation` when `a == b` and
    /// `ConversationError::InvalidParticipant` when either id is not positive.
    pub fn derive(a: i64, b: i64) -> Result<Self, ConversationError> {
        for id in [a, b] {
            if id <= 0 {
                return Err(ConversationError::InvalidParticipant(id));
            }
        }
        if a == b {
            return Err(ConversationError::SelfConversation);
        }
        Ok(Self { low: a.min(b), high: a.max(b) })
    }

    #[must_use]
    pub const fn participants(&self) -> (i64, i64) {
        (self.low, self.high)
    }

    #[must_use]
    pub const fn includes(&self, user_id: i64) -> bool {
        self.low == user_id || self.high == user_id
    }

    /// Returns the participant that is not `user_id`, or `None` if `user_id` is not part of the thread.
    #[must_use]
    pub const fn other(&self, user_id: i64) -> Option<i64> {
        if self.low == user_id {
            Some(self.high)
        } else if self.high == user_id {
            Some(self.low)
        } else {
            None
        }
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.low, self.high)
    }
}

impl FromStr for ConversationId {
    type Err = ConversationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConversationError::Malformed(s.to_string());
        let (low, high) = s.split_once(SEPARATOR).ok_or_else(malformed)?;

        // Only canonical decimal forms: no sign, no leading zeros, no padding.
        let parse = |part: &str| -> Result<i64, ConversationError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) || part.starts_with('0') {
                return Err(malformed());
            }
            part.parse::<i64>().map_err(|_| malformed())
        };
        let (low, high) = (parse(low)?, parse(high)?);
        if low >= high {
            return Err(malformed());
        }
        Self::derive(low, high)
    }
}

impl From<ConversationId> for String {
    fn from(id: ConversationId) -> Self {
        id.to_string()
    }
}

/// Pure helper returning the stored string form of the key for `(a, b)`.
///
/// # Errors
/// See [`ConversationId::derive`].
pub fn derive_conversation_id(a: i64, b: i64) -> Result<String, ConversationError> {
    ConversationId::derive(a, b).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_orders_participants() {
        assert_eq!(derive_conversation_id(5, 2).unwrap(), "2-5");
        assert_eq!(derive_conversation_id(2, 5).unwrap(), "2-5");
        assert_eq!(derive_conversation_id(10, 2).unwrap(), "2-10");
    }

    #[test]
    fn test_rejects_self_conversation() {
        assert_eq!(ConversationId::derive(7, 7), Err(ConversationError::SelfConversation));
    }

    #[test]
    fn test_rejects_non_positive_ids() {
        assert_eq!(ConversationId::derive(0, 3), Err(ConversationError::InvalidParticipant(0)));
        assert_eq!(ConversationId::derive(3, -1), Err(ConversationError::InvalidParticipant(-1)));
    }

    #[test]
    fn test_separator_prevents_concatenation_ambiguity() {
        // Plain concatenation would render (1, 234) and (12, 34) both as "1234".
        let a = derive_conversation_id(234, 1).unwrap();
        let b = derive_conversation_id(34, 12).unwrap();
        assert_eq!(a, "1-234");
        assert_eq!(b, "12-34");
        assert_ne!(a, b);

        assert_ne!(derive_conversation_id(2, 10).unwrap(), derive_conversation_id(20, 1).unwrap());
    }

    #[test]
    fn test_other_participant() {
        let id = ConversationId::derive(9, 4).unwrap();
        assert_eq!(id.participants(), (4, 9));
        assert_eq!(id.other(4), Some(9));
        assert_eq!(id.other(9), Some(4));
        assert_eq!(id.other(5), None);
        assert!(id.includes(9));
        assert!(!id.includes(1));
    }

    #[test]
    fn test_parse_accepts_only_canonical_form() {
        assert_eq!("2-5".parse::<ConversationId>().unwrap(), ConversationId::derive(5, 2).unwrap());

        for bad in ["5-2", "2-2", "02-5", "2-05", "-2-5", "2--5", "+2-5", "2-", "-5", "25", "a-b", " 2-5", "0-5"] {
            assert!(bad.parse::<ConversationId>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_no_collisions_for_small_id_space() {
        let mut seen: HashMap<String, (i64, i64)> = HashMap::new();
        for a in 1..=120 {
            for b in (a + 1)..=120 {
                let key = derive_conversation_id(a, b).unwrap();
                if let Some(prev) = seen.insert(key.clone(), (a, b)) {
                    panic!("{key} produced by both {prev:?} and {:?}", (a, b));
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_commutative(a in 1..i64::MAX, b in 1..i64::MAX) {
            prop_assume!(a != b);
            prop_assert_eq!(derive_conversation_id(a, b).unwrap(), derive_conversation_id(b, a).unwrap());
        }

        #[test]
        fn prop_stable(a in 1..i64::MAX, b in 1..i64::MAX) {
            prop_assume!(a != b);
            let first = derive_conversation_id(a, b).unwrap();
            for _ in 0..3 {
                prop_assert_eq!(&derive_conversation_id(a, b).unwrap(), &first);
            }
        }

        #[test]
        fn prop_distinct_pairs_never_collide(
            a in 1..1_000_000_i64, b in 1..1_000_000_i64,
            c in 1..1_000_000_i64, d in 1..1_000_000_i64,
        ) {
            prop_assume!(a != b && c != d);
            let same_pair = (a.min(b), a.max(b)) == (c.min(d), c.max(d));
            let same_key = derive_conversation_id(a, b).unwrap() == derive_conversation_id(c, d).unwrap();
            prop_assert_eq!(same_pair, same_key);
        }

        #[test]
        fn prop_parse_inverts_display(a in 1..i64::MAX, b in 1..i64::MAX) {
            prop_assume!(a != b);
            let id = ConversationId::derive(a, b).unwrap();
            prop_assert_eq!(id.to_string().parse::<ConversationId>().unwrap(), id);
        }
    }
}
