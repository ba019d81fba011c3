/// Linear navigation history with a cursor, like a browser tab's.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            entries: vec![start.into()],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Push `path`, discarding any forward entries. Pushing the current path
    /// again is a no-op.
    pub fn push(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if path == self.current() {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(path);
        self.index += 1;
        true
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
