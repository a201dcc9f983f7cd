/// Counter that hands out ids within one tree, starting at 1.
///
/// Under the hood it uses a `u32` that will eventually wrap around, after about four billion
/// containers. The tree is only mutated from the command path, so this is a plain integer rather
/// than an atomic.
#[derive(Debug)]
pub struct IdCounter {
    value: u32,
}

impl IdCounter {
    pub const fn new() -> Self {
        Self { value: 1 }
    }

    pub fn next(&mut self) -> u32 {
        let id = self.value;
        self.value = self.value.wrapping_add(1);
        id
    }
}

impl Default for IdCounter {
    fn default() -> Self {
        Self::new()
    }
}
