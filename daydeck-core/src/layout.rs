//! Section layout: which dashboard sections render where, in what order.
//!
//! The layout is pure client-side ordering state. Three fixed slots each
//! hold an ordered list of section ids, and the only mutation is reordering
//! within a single slot (sections never move between slots). Every section
//! id lives in exactly one slot.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeckError;

/// The closed set of dashboard sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Comms,
    Tasks,
    News,
    Yesterday,
    Agenda,
    Logout,
}

impl SectionId {
    pub const ALL: [SectionId; 6] = [
        SectionId::Comms,
        SectionId::Tasks,
        SectionId::News,
        SectionId::Yesterday,
        SectionId::Agenda,
        SectionId::Logout,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SectionId::Comms => "comms",
            SectionId::Tasks => "tasks",
            SectionId::News => "news",
            SectionId::Yesterday => "yesterday",
            SectionId::Agenda => "agenda",
            SectionId::Logout => "logout",
        }
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SectionId {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| DeckError::UnknownSection(s.to_string()))
    }
}

/// One of the three fixed layout regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Top,
    Left,
    Right,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Top, Slot::Left, Slot::Right];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::Top => "top",
            Slot::Left => "left",
            Slot::Right => "right",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered arrangement of sections across the three slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub top: Vec<SectionId>,
    pub left: Vec<SectionId>,
    pub right: Vec<SectionId>,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            top: vec![SectionId::Comms],
            left: vec![SectionId::Tasks, SectionId::News],
            right: vec![SectionId::Yesterday, SectionId::Agenda, SectionId::Logout],
        }
    }
}

impl Layout {
    pub fn slot(&self, slot: Slot) -> &[SectionId] {
        match slot {
            Slot::Top => &self.top,
            Slot::Left => &self.left,
            Slot::Right => &self.right,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Vec<SectionId> {
        match slot {
            Slot::Top => &mut self.top,
            Slot::Left => &mut self.left,
            Slot::Right => &mut self.right,
        }
    }

    /// Which slot a section currently lives in.
    pub fn slot_of(&self, section: SectionId) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| self.slot(*slot).contains(&section))
    }

    /// Reorder within one slot: remove `dragged` and reinsert it at
    /// `target`'s index as it was before the removal. Dropping a section
    /// onto itself is an accepted no-op. Returns false (leaving the slot
    /// untouched) when either id is not present in that slot.
    pub fn reorder(&mut self, slot: Slot, dragged: SectionId, target: SectionId) -> bool {
        let list = self.slot_mut(slot);

        let Some(dragged_index) = list.iter().position(|id| *id == dragged) else {
            return false;
        };
        let Some(target_index) = list.iter().position(|id| *id == target) else {
            return false;
        };

        // Both indices are taken before the removal; stored layouts written
        // by earlier clients were produced with these exact splice semantics.
        list.remove(dragged_index);
        list.insert(target_index, dragged);

        true
    }
}
