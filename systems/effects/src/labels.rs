use std::collections::BTreeMap;

use glam::Vec2;
use robotron_core::SpriteRef;

/// Ticks a floating label stays on screen.
pub const LABEL_TICKS: u32 = 120;
/// Offset applied to a floating label every tick.
pub const LABEL_DRIFT: Vec2 = Vec2::new(-0.1, -0.1);

/// What a floating label shows.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelContent {
    /// Text such as a rescue score.
    Text(String),
    /// A sprite frame such as a death marker.
    Icon(SpriteRef),
}

/// Key of a label within [`FloatingLabels`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelId(u64);

/// A label drifting away from where it was spawned.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingLabel {
    /// What is displayed.
    pub content: LabelContent,
    /// Top-left corner in display pixels.
    pub position: Vec2,
    /// Ticks left before the label disappears.
    pub remaining: u32,
}

/// Keyed collection of drifting labels.
#[derive(Clone, Debug, Default)]
pub struct FloatingLabels {
    next_id: u64,
    labels: BTreeMap<LabelId, FloatingLabel>,
}

impl FloatingLabels {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label at `position` and returns its key.
    pub fn spawn(&mut self, content: LabelContent, position: Vec2) -> LabelId {
        let id = LabelId(self.next_id);
        self.next_id += 1;
        let _ = self.labels.insert(
            id,
            FloatingLabel {
                content,
                position,
                remaining: LABEL_TICKS,
            },
        );
        id
    }

    /// Counts one tick for every label, drifting them and dropping the expired ones.
    pub fn tick(&mut self) {
        let keys: Vec<LabelId> = self.labels.keys().copied().collect();
        for key in keys {
            let expired = match self.labels.get_mut(&key) {
                Some(label) => {
                    label.remaining = label.remaining.saturating_sub(1);
                    label.position += LABEL_DRIFT;
                    label.remaining == 0
                }
                None => false,
            };
            if expired {
                let _ = self.labels.remove(&key);
            }
        }
    }

    /// Looks up a label by key.
    #[must_use]
    pub fn get(&self, id: LabelId) -> Option<&FloatingLabel> {
        self.labels.get(&id)
    }

    /// Iterates over live labels in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &FloatingLabel> {
        self.labels.values()
    }

    /// Number of live labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Reports whether no label is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Drops every label.
    pub fn clear(&mut self) {
        self.labels.clear();
    }
}
