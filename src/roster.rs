/// Insertion-ordered set of chosen players. The visual list is a projection
/// of this; nothing reads state back out of the UI.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` unless it is already present. Returns whether the
    /// roster changed.
    pub fn add(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Removes `name`; absent names are a no-op.
    pub fn remove(&mut self, name: &str) {
        self.names.retain(|entry| entry != name);
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|entry| entry == name)
    }

    /// Chosen names in order of first insertion.
    pub fn selected(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
