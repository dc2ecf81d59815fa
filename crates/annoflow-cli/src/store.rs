use annoflow_core::Timeseries;

/// In-memory, insertion-ordered stand-in for a persistence layer. The menu
/// only needs "list what exists" and "fetch one to mutate"; every stored
/// series still carries its own unique id.
#[derive(Default)]
pub struct SeriesStore {
    entries: Vec<Timeseries>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, timeseries: Timeseries) {
        self.entries.push(timeseries);
    }

    /// Entry at a zero-based listing position, mutable for pipeline runs.
    pub fn entry_mut(&mut self, index: usize) -> Option<&mut Timeseries> {
        self.entries.get_mut(index)
    }

    pub fn entry(&self, index: usize) -> Option<&Timeseries> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timeseries> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
