/// Handle table: ids are `index + 1`, so `0` stays the null handle, and a
/// removed slot is never handed out again.
#[derive(Debug)]
pub(super) struct Slots<T> {
    entries: Vec<Option<T>>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> Slots<T> {
    pub(super) fn insert(&mut self, value: T) -> u32 {
        self.entries.push(Some(value));
        self.entries.len() as u32
    }

    pub(super) fn get(&self, id: u32) -> Option<&T> {
        let index = (id as usize).checked_sub(1)?;
        self.entries.get(index)?.as_ref()
    }

    pub(super) fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        let index = (id as usize).checked_sub(1)?;
        self.entries.get_mut(index)?.as_mut()
    }

    pub(super) fn remove(&mut self, id: u32) -> Option<T> {
        let index = (id as usize).checked_sub(1)?;
        self.entries.get_mut(index)?.take()
    }

    /// Number of live (not removed) entries.
    pub(super) fn live(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}
