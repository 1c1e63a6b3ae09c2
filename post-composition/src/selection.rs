//! Active-selection tracking.
//!
//! The controller only knows the length of the attachment list. After every
//! store mutation the owner reports what happened and the controller applies
//! a fixed index-shift table so the pointer keeps following the same element
//! (or the nearest valid one when that element disappears).

use crate::error::{CompositionError, CompositionResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    active: Option<usize>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Points the selection at `index`.
    ///
    /// Reconciling pins of the previously active attachment is the caller's
    /// job and must happen before this.
    pub fn select(&mut self, index: usize, len: usize) -> CompositionResult<()> {
        if index >= len {
            return Err(CompositionError::IndexOutOfRange { index, len });
        }
        self.active = Some(index);
        Ok(())
    }

    /// First image picked into an empty composition becomes active
    pub fn on_append(&mut self, previous_len: usize) {
        if self.active.is_none() && previous_len == 0 {
            self.active = Some(0);
        }
    }

    /// `new_len` is the length after the removal
    pub fn on_remove(&mut self, deleted: usize, new_len: usize) {
        let Some(active) = self.active else {
            return;
        };

        self.active = if new_len == 0 {
            None
        } else if deleted < active {
            Some(active - 1)
        } else if deleted == active {
            Some(active.min(new_len - 1))
        } else {
            Some(active)
        };
    }

    pub fn on_move(&mut self, from: usize, to: usize) {
        let Some(active) = self.active else {
            return;
        };

        self.active = Some(if active == from {
            to
        } else if from < to && active > from && active <= to {
            active - 1
        } else if to < from && active >= to && active < from {
            active + 1
        } else {
            active
        });
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(index: usize) -> SelectionController {
        SelectionController {
            active: Some(index),
        }
    }

    #[test]
    fn test_first_append_selects() {
        let mut sel = SelectionController::new();
        sel.on_append(0);
        assert_eq!(sel.active(), Some(0));

        sel.on_append(1);
        assert_eq!(sel.active(), Some(0));
    }

    #[test]
    fn test_select_validates_index() {
        let mut sel = SelectionController::new();
        assert_eq!(
            sel.select(3, 3),
            Err(CompositionError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(sel.active(), None);
        sel.select(2, 3).unwrap();
        assert_eq!(sel.active(), Some(2));
    }

    #[test]
    fn test_remove_rules() {
        // preceding element removed
        let mut sel = at(3);
        sel.on_remove(1, 4);
        assert_eq!(sel.active(), Some(2));

        // active element removed, successor slides in
        let mut sel = at(2);
        sel.on_remove(2, 4);
        assert_eq!(sel.active(), Some(2));

        // active element was last
        let mut sel = at(4);
        sel.on_remove(4, 4);
        assert_eq!(sel.active(), Some(3));

        // following element removed
        let mut sel = at(1);
        sel.on_remove(3, 4);
        assert_eq!(sel.active(), Some(1));

        // store emptied
        let mut sel = at(0);
        sel.on_remove(0, 0);
        assert_eq!(sel.active(), None);
    }

    #[test]
    fn test_move_rules() {
        // dragged item stays selected
        let mut sel = at(1);
        sel.on_move(1, 4);
        assert_eq!(sel.active(), Some(4));

        // forward move past the active item
        let mut sel = at(3);
        sel.on_move(1, 3);
        assert_eq!(sel.active(), Some(2));

        // backward move past the active item
        let mut sel = at(2);
        sel.on_move(4, 2);
        assert_eq!(sel.active(), Some(3));

        // move entirely before the active item
        let mut sel = at(4);
        sel.on_move(0, 2);
        assert_eq!(sel.active(), Some(4));

        // move entirely after the active item
        let mut sel = at(0);
        sel.on_move(3, 1);
        assert_eq!(sel.active(), Some(0));
    }

    #[test]
    fn test_active_stays_in_bounds_under_mixed_operations() {
        let mut sel = SelectionController::new();
        let mut len = 0usize;

        let ops: [(u8, usize, usize); 12] = [
            (0, 0, 0),
            (0, 0, 0),
            (0, 0, 0),
            (0, 0, 0),
            (2, 0, 3),
            (1, 3, 0),
            (2, 2, 0),
            (1, 0, 0),
            (1, 1, 0),
            (0, 0, 0),
            (1, 0, 0),
            (1, 0, 0),
        ];

        for (kind, a, b) in ops {
            match kind {
                0 => {
                    sel.on_append(len);
                    len += 1;
                }
                1 => {
                    len -= 1;
                    sel.on_remove(a, len);
                }
                _ => sel.on_move(a, b),
            }

            match sel.active() {
                Some(i) => assert!(i < len),
                None => assert_eq!(len, 0),
            }
        }
        assert_eq!(sel.active(), None);
    }
}
