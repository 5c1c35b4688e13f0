//! Rectangle measurement adapter.
//!
//! The geometry layer never touches a layout tree directly; it sees card
//! boxes only through [`MeasureSource`]. A host UI supplies its own
//! implementation backed by live layout queries; inside this crate the
//! figure layouts populate a [`StaticMeasures`] from their computed card
//! positions so routing runs against the exact same contract.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::geometry::Rect;

/// Black-box bounding-box query in container coordinates.
///
/// `None` means "not attached to a live layout yet" and is a valid
/// transient state, never an error.
pub trait MeasureSource {
    fn measure(&self, id: &str) -> Option<Rect>;
}

/// In-memory measurement source keyed by card id.
#[derive(Debug, Clone, Default)]
pub struct StaticMeasures {
    rects: BTreeMap<String, Rect>,
}

impl StaticMeasures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, rect: Rect) {
        self.rects.insert(id.to_string(), rect);
    }

    pub fn remove(&mut self, id: &str) {
        self.rects.remove(id);
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl MeasureSource for StaticMeasures {
    fn measure(&self, id: &str) -> Option<Rect> {
        self.rects.get(id).copied()
    }
}

/// Shared source for hosts that mutate measurements between frames while a
/// scheduler holds the reading side.
impl<S: MeasureSource> MeasureSource for Rc<RefCell<S>> {
    fn measure(&self, id: &str) -> Option<Rect> {
        self.borrow().measure(id)
    }
}
