//! Short option registry: one-letter aliases for keyword arguments.

use std::collections::BTreeSet;

/// Letter reserved for `-h/--help`.
pub const HELP_SHORT: char = 'h';

/// Letters already handed out while building one command.
///
/// Allocation is monotonic: a letter, once taken, is never released.
#[derive(Debug, Clone)]
pub struct ShortOptionRegistry {
    taken: BTreeSet<char>,
}

impl ShortOptionRegistry {
    /// A registry with only the help letter taken.
    pub fn new() -> Self {
        Self {
            taken: BTreeSet::from([HELP_SHORT]),
        }
    }

    pub fn is_taken(&self, letter: char) -> bool {
        self.taken.contains(&letter)
    }

    /// Claim a letter. Returns false if it was already taken.
    pub fn reserve(&mut self, letter: char) -> bool {
        self.taken.insert(letter)
    }

    /// Claim the first free word initial of `name`, in word order.
    ///
    /// Returns `None` when every initial is taken; the argument then gets a
    /// long form only.
    pub fn allocate(&mut self, name: &str) -> Option<char> {
        let letter = word_initials(name)
            .into_iter()
            .find(|c| !self.is_taken(*c))?;
        self.reserve(letter);
        Some(letter)
    }
}

impl Default for ShortOptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower-cased first letters of each `_`/`-` separated word.
pub fn word_initials(name: &str) -> Vec<char> {
    name.split(['_', '-'])
        .filter_map(|word| word.chars().next())
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
