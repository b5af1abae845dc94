//! Thought and Beam entities

use serde::{Deserialize, Serialize};

/// One partial-to-complete reasoning path.
///
/// A thought is an ordered sequence of text fragments. It only ever grows:
/// [`Thought::extend`] returns a new thought with one more fragment and leaves
/// the parent untouched, so a selected parent can be shared across the next
/// generation fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Thought {
    fragments: Vec<String>,
}

impl Thought {
    /// The empty thought every search starts from
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a thought from pre-existing fragments
    pub fn from_fragments(fragments: Vec<String>) -> Self {
        Self { fragments }
    }

    /// New thought = this thought + `fragment`
    pub fn extend(&self, fragment: impl Into<String>) -> Self {
        let mut fragments = self.fragments.clone();
        fragments.push(fragment.into());
        Self { fragments }
    }

    /// Full rendered text (concatenation of all fragments)
    pub fn text(&self) -> String {
        self.fragments.concat()
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Number of fragments appended since the root
    pub fn depth(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(|f| f.is_empty())
    }
}

impl std::fmt::Display for Thought {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for fragment in &self.fragments {
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

/// Bounded, ordered set of thoughts carried between search steps.
///
/// A beam is replaced wholesale at each step; it has no mutating API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beam {
    thoughts: Vec<Thought>,
}

impl Beam {
    /// Beam holding only the root thought
    pub fn initial() -> Self {
        Self {
            thoughts: vec![Thought::root()],
        }
    }

    pub fn from_thoughts(thoughts: Vec<Thought>) -> Self {
        Self { thoughts }
    }

    pub fn thoughts(&self) -> &[Thought] {
        &self.thoughts
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }

    /// Best thought of the beam (the first one)
    pub fn first(&self) -> Option<&Thought> {
        self.thoughts.first()
    }

    /// Rendered text of every thought, in beam order
    pub fn texts(&self) -> Vec<String> {
        self.thoughts.iter().map(Thought::text).collect()
    }

    pub fn into_thoughts(self) -> Vec<Thought> {
        self.thoughts
    }
}

impl Default for Beam {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_empty() {
        let root = Thought::root();
        assert!(root.is_empty());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.text(), "");
    }

    #[test]
    fn test_extend_leaves_parent_untouched() {
        let parent = Thought::root().extend("Strategy: add.\n");
        let child = parent.extend("2 + 2 = 4, the answer is 4");

        assert_eq!(parent.depth(), 1);
        assert_eq!(child.depth(), 2);
        assert_eq!(child.text(), "Strategy: add.\n2 + 2 = 4, the answer is 4");
        assert_eq!(child.to_string(), child.text());
    }

    #[test]
    fn test_initial_beam() {
        let beam = Beam::initial();
        assert_eq!(beam.len(), 1);
        assert_eq!(beam.texts(), vec![String::new()]);
    }

    #[test]
    fn test_beam_first() {
        let beam = Beam::from_thoughts(vec![
            Thought::root().extend("a"),
            Thought::root().extend("b"),
        ]);
        assert_eq!(beam.first().map(Thought::text), Some("a".to_string()));
        assert!(Beam::from_thoughts(vec![]).first().is_none());
    }
}
