//! Mount targets receive rendered units in feed order

use crate::unit::Unit;

/// Destination for rendered units
///
/// The dispatcher calls `mount` once per item, strictly in input order.
pub trait MountTarget {
    fn mount(&mut self, unit: Unit);
}

impl MountTarget for Vec<Unit> {
    fn mount(&mut self, unit: Unit) {
        self.push(unit);
    }
}

impl<T: MountTarget + ?Sized> MountTarget for &mut T {
    fn mount(&mut self, unit: Unit) {
        (**self).mount(unit);
    }
}
