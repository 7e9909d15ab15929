//! Translation of raw key transitions into logical game keys.
//!
//! | physical        | pressed                         | released       |
//! |-----------------|---------------------------------|----------------|
//! | `0-9`, `A-D`    | symbol                          | -              |
//! | `#`             | `menu-hold-start`               | `menu-hold-end`|
//! | `*`             | `signal-start` (+ `dev-skip`)   | `signal-end`   |
//! | red button      | `cancel`                        | -              |
//! | blue button     | `confirm`                       | -              |
//!
//! Auto-repeat presses of a key that is already down are dropped, as are
//! releases of keys that were never seen going down.

use crate::traits::{KeyEdge, KeypadEvent, KeypadInput};
use std::collections::HashSet;
use suitcase_core::Key;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    held: HashSet<KeypadInput>,
    dev_skip: bool,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit `dev-skip` when the star key goes down.
    pub fn with_dev_skip(mut self, enabled: bool) -> Self {
        self.dev_skip = enabled;
        self
    }

    pub fn is_held(&self, input: KeypadInput) -> bool {
        self.held.contains(&input)
    }

    /// Map one transition to zero or more logical keys.
    pub fn map(&mut self, event: KeypadEvent) -> Vec<Key> {
        match event.edge {
            KeyEdge::Pressed => {
                if !self.held.insert(event.input) {
                    trace!(input = ?event.input, "dropping repeated press");
                    return Vec::new();
                }
                match event.input {
                    KeypadInput::Symbol(symbol) => vec![Key::Symbol(symbol)],
                    KeypadInput::Hash => vec![Key::MenuHoldStart],
                    KeypadInput::Star if self.dev_skip => vec![Key::SignalStart, Key::DevSkip],
                    KeypadInput::Star => vec![Key::SignalStart],
                    KeypadInput::RedButton => vec![Key::Cancel],
                    KeypadInput::BlueButton => vec![Key::Confirm],
                }
            }
            KeyEdge::Released => {
                if !self.held.remove(&event.input) {
                    return Vec::new();
                }
                match event.input {
                    KeypadInput::Hash => vec![Key::MenuHoldEnd],
                    KeypadInput::Star => vec![Key::SignalEnd],
                    _ => Vec::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use suitcase_core::KeypadSymbol;

    fn symbol(c: char) -> KeypadInput {
        KeypadInput::Symbol(KeypadSymbol::new(c).unwrap())
    }

    #[rstest]
    #[case(KeypadInput::Hash, vec![Key::MenuHoldStart], vec![Key::MenuHoldEnd])]
    #[case(KeypadInput::Star, vec![Key::SignalStart], vec![Key::SignalEnd])]
    #[case(KeypadInput::RedButton, vec![Key::Cancel], vec![])]
    #[case(KeypadInput::BlueButton, vec![Key::Confirm], vec![])]
    fn test_press_release(
        #[case] input: KeypadInput,
        #[case] on_press: Vec<Key>,
        #[case] on_release: Vec<Key>,
    ) {
        let mut map = KeyMap::new();
        assert_eq!(map.map(KeypadEvent::pressed(input)), on_press);
        assert!(map.is_held(input));
        assert_eq!(map.map(KeypadEvent::released(input)), on_release);
        assert!(!map.is_held(input));
    }

    #[test]
    fn test_symbol_press() {
        let mut map = KeyMap::new();
        assert_eq!(
            map.map(KeypadEvent::pressed(symbol('7'))),
            vec![Key::symbol('7').unwrap()]
        );
        assert!(map.map(KeypadEvent::released(symbol('7'))).is_empty());
    }

    #[test]
    fn test_repeated_press_dropped() {
        let mut map = KeyMap::new();
        assert_eq!(map.map(KeypadEvent::pressed(KeypadInput::Hash)).len(), 1);
        assert!(map.map(KeypadEvent::pressed(KeypadInput::Hash)).is_empty());
    }

    #[test]
    fn test_unmatched_release_dropped() {
        let mut map = KeyMap::new();
        assert!(map.map(KeypadEvent::released(KeypadInput::Star)).is_empty());
    }

    #[test]
    fn test_star_dev_skip() {
        let mut map = KeyMap::new().with_dev_skip(true);
        assert_eq!(
            map.map(KeypadEvent::pressed(KeypadInput::Star)),
            vec![Key::SignalStart, Key::DevSkip]
        );
    }
}
