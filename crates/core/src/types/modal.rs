//! Plant detail modal lifecycle.
//!
//! ```text
//! Closed ──open──▶ Loading ──show──▶ Shown
//!    ▲                │                │
//!    │                └──fail──▶ Error │
//!    └────────────close────────────────┘
//! ```
//!
//! Every open-request hands out a new ticket. Completions carry the ticket of
//! the request they answer and are dropped unless it is still the one being
//! loaded, so a fresh open-request restarts the sequence.

use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::catalog::Plant;
use super::id::PlantId;

/// Identifies one open-request.
pub type ModalTicket = u64;

/// Where the modal is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalState {
    #[default]
    Closed,
    Loading {
        plant_id: PlantId,
        ticket: ModalTicket,
    },
    Shown {
        plant: Plant,
    },
    Error {
        plant_id: PlantId,
    },
}

/// The detail modal of one widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modal {
    state: ModalState,
    last_ticket: ModalTicket,
}

impl Modal {
    #[must_use]
    pub fn state(&self) -> &ModalState {
        &self.state
    }

    /// Start loading the detail of `plant_id`, from any state.
    pub fn open(&mut self, plant_id: PlantId) -> ModalTicket {
        self.last_ticket = self.last_ticket.wrapping_add(1);
        self.state = ModalState::Loading {
            plant_id,
            ticket: self.last_ticket,
        };
        self.last_ticket
    }

    /// The plant being loaded for `ticket`, if that request is still current.
    #[must_use]
    pub fn pending(&self, ticket: ModalTicket) -> Option<&PlantId> {
        match &self.state {
            ModalState::Loading {
                plant_id,
                ticket: current,
            } if *current == ticket => Some(plant_id),
            _ => None,
        }
    }

    /// Complete the request `ticket` with its fetched plant.
    ///
    /// Returns `false` and leaves the state alone when the ticket is stale.
    pub fn show(&mut self, ticket: ModalTicket, plant: Plant) -> bool {
        if self.pending(ticket).is_none() {
            return false;
        }
        self.state = ModalState::Shown { plant };
        true
    }

    /// Fail the request `ticket`.
    ///
    /// Returns `false` and leaves the state alone when the ticket is stale.
    pub fn fail(&mut self, ticket: ModalTicket) -> bool {
        let Some(plant_id) = self.pending(ticket).cloned() else {
            return false;
        };
        self.state = ModalState::Error { plant_id };
        true
    }

    pub fn close(&mut self) {
        self.state = ModalState::Closed;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.state, ModalState::Closed)
    }

    /// The item offered by the modal's "Add to Cart" button.
    #[must_use]
    pub fn displayed_item(&self) -> Option<CartItem> {
        match &self.state {
            ModalState::Shown { plant } => Some(CartItem::from(plant)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Price;

    fn plant(id: &str) -> Plant {
        Plant {
            id: PlantId::new(id),
            name: "Mango".to_string(),
            category: "Fruit Tree".to_string(),
            description: "Sweet".to_string(),
            price: Price::from(500),
            image_url: None,
        }
    }

    #[test]
    fn test_open_then_show() {
        let mut modal = Modal::default();
        let ticket = modal.open(PlantId::new("1"));
        assert!(matches!(modal.state(), ModalState::Loading { .. }));

        assert!(modal.show(ticket, plant("1")));
        assert_eq!(modal.displayed_item().map(|i| i.id), Some(PlantId::new("1")));
    }

    #[test]
    fn test_open_then_fail() {
        let mut modal = Modal::default();
        let ticket = modal.open(PlantId::new("1"));
        assert!(modal.fail(ticket));
        assert_eq!(
            modal.state(),
            &ModalState::Error {
                plant_id: PlantId::new("1")
            }
        );
        assert!(modal.displayed_item().is_none());
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut modal = Modal::default();
        let first = modal.open(PlantId::new("1"));
        let second = modal.open(PlantId::new("2"));

        assert!(!modal.show(first, plant("1")));
        assert_eq!(modal.pending(second), Some(&PlantId::new("2")));

        assert!(modal.show(second, plant("2")));
        assert!(!modal.fail(second));
    }

    #[test]
    fn test_close_discards_inflight_completion() {
        let mut modal = Modal::default();
        let ticket = modal.open(PlantId::new("1"));
        modal.close();

        assert!(!modal.show(ticket, plant("1")));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_close_from_shown_and_error() {
        let mut modal = Modal::default();
        let ticket = modal.open(PlantId::new("1"));
        modal.show(ticket, plant("1"));
        modal.close();
        assert_eq!(modal.state(), &ModalState::Closed);

        let ticket = modal.open(PlantId::new("1"));
        modal.fail(ticket);
        modal.close();
        assert_eq!(modal.state(), &ModalState::Closed);
    }
}
