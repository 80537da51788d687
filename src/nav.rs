//! Navigation over the ordered, filtered item list.
//!
//! The controller owns the "current position" and, as its only side
//! effect, keeps an external locator (a shareable single-string reference,
//! e.g. a URL query parameter) in sync on every successful move. Position
//! therefore survives an external reload: when a fresh list arrives, an id
//! found in the locator wins over the initial-placement policy.

use crate::policy::InitialPlacement;
use crate::types::ItemId;

/// Error type for navigation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// Requested index is outside the ordered list.
    #[error("index {index} out of bounds for list of {len}")]
    OutOfBounds {
        /// The requested index.
        index: usize,
        /// Current list length.
        len: usize,
    },
}

/// Current position in the ordered list.
///
/// The index is always within `[0, len - 1]` while the list is non-empty,
/// and `None` while it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    ordered_ids: Vec<ItemId>,
    current: Option<usize>,
}

impl NavigationState {
    /// The ordered id sequence being navigated.
    pub fn ordered_ids(&self) -> &[ItemId] {
        &self.ordered_ids
    }

    /// Current index, `None` when the list is empty.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Id at the current index.
    pub fn current_id(&self) -> Option<&ItemId> {
        self.current.and_then(|i| self.ordered_ids.get(i))
    }

    /// List length.
    pub fn len(&self) -> usize {
        self.ordered_ids.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.ordered_ids.is_empty()
    }
}

/// External single-value reference the controller keeps in sync.
pub trait ExternalLocator {
    /// Read the stored item id, if any.
    fn get(&self) -> Option<String>;

    /// Replace the stored item id.
    fn set(&mut self, value: &str);
}

/// In-process locator for tests and embedding without a URL layer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocator {
    value: Option<String>,
}

impl MemoryLocator {
    /// Create an empty locator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a locator already holding a value.
    pub fn holding(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

impl ExternalLocator for MemoryLocator {
    fn get(&self) -> Option<String> {
        self.value.clone()
    }

    fn set(&mut self, value: &str) {
        self.value = Some(value.to_string());
    }
}

/// Maintains the current position and owns the locator side effect.
pub struct NavigationController<L: ExternalLocator> {
    state: NavigationState,
    placement: InitialPlacement,
    locator: L,
}

impl<L: ExternalLocator> NavigationController<L> {
    /// Create a controller with the given placement policy and locator.
    pub fn new(placement: InitialPlacement, locator: L) -> Self {
        Self {
            state: NavigationState::default(),
            placement,
            locator,
        }
    }

    /// Replace the ordered list and re-place the current index.
    ///
    /// An id restored from the locator wins over the placement policy.
    /// Otherwise `MostRecent` lands on index 0 regardless of
    /// accessibility, and `FirstAccessible` lands on the first index
    /// `is_accessible` accepts (index 0 when none is).
    pub fn set_items<F>(&mut self, ordered_ids: Vec<ItemId>, is_accessible: F)
    where
        F: Fn(&ItemId) -> bool,
    {
        self.state.ordered_ids = ordered_ids;
        if self.state.ordered_ids.is_empty() {
            self.state.current = None;
            return;
        }

        let restored = self.locator.get().and_then(|stored| {
            self.state
                .ordered_ids
                .iter()
                .position(|id| id.as_str() == stored)
        });

        let index = match restored {
            Some(index) => {
                tracing::debug!(index, "restored position from locator");
                index
            }
            None => match self.placement {
                InitialPlacement::MostRecent => 0,
                InitialPlacement::FirstAccessible => self
                    .state
                    .ordered_ids
                    .iter()
                    .position(is_accessible)
                    .unwrap_or(0),
            },
        };

        self.state.current = Some(index);
        self.sync_external_locator();
    }

    /// Jump to an index.
    pub fn move_to(&mut self, index: usize) -> Result<(), NavError> {
        if index >= self.state.len() {
            return Err(NavError::OutOfBounds {
                index,
                len: self.state.len(),
            });
        }
        self.state.current = Some(index);
        self.sync_external_locator();
        Ok(())
    }

    /// Step toward the newest end. Clamps at index 0; returns whether the
    /// position changed.
    pub fn move_prev(&mut self) -> bool {
        match self.state.current {
            Some(index) if index > 0 => {
                self.state.current = Some(index - 1);
                self.sync_external_locator();
                true
            }
            _ => false,
        }
    }

    /// Step toward the oldest end. Clamps at the last index; returns
    /// whether the position changed.
    pub fn move_next(&mut self) -> bool {
        match self.state.current {
            Some(index) if index + 1 < self.state.len() => {
                self.state.current = Some(index + 1);
                self.sync_external_locator();
                true
            }
            _ => false,
        }
    }

    /// Push the current id to the external locator.
    pub fn sync_external_locator(&mut self) {
        if let Some(id) = self.state.current_id() {
            let id = id.as_str().to_string();
            self.locator.set(&id);
        }
    }

    /// Current navigation state.
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Id at the current index.
    pub fn current_id(&self) -> Option<&ItemId> {
        self.state.current_id()
    }

    /// The locator, for callers that own its persistence.
    pub fn locator(&self) -> &L {
        &self.locator
    }
}
