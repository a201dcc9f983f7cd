use crate::utils::Flag;

/// Settings for `fullscreen present`.
#[derive(knuffel::Decode, Debug, Default, Clone, Copy, PartialEq)]
pub struct Present {
    #[knuffel(child)]
    pub restore_scale: Option<Flag>,
}

impl Present {
    /// Whether a presented container puts the previous output scale back once it leaves
    /// fullscreen or is closed.
    pub fn restore_scale(&self) -> bool {
        self.restore_scale.map_or(true, |flag| flag.0)
    }
}
