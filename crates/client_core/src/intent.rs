use shared::domain::SwimmerId;

/// A user request against the swimmer list, produced by buttons, forms or a committed swipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add(String),
    Remove(SwimmerId),
    Increment(SwimmerId),
    Decrement(SwimmerId),
    Reset(SwimmerId),
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Add(_) => "add",
            Intent::Remove(_) => "remove",
            Intent::Increment(_) => "increment",
            Intent::Decrement(_) => "decrement",
            Intent::Reset(_) => "reset",
        }
    }

    /// The swimmer an intent targets. `None` for additions.
    pub fn swimmer_id(&self) -> Option<SwimmerId> {
        match self {
            Intent::Add(_) => None,
            Intent::Remove(id)
            | Intent::Increment(id)
            | Intent::Decrement(id)
            | Intent::Reset(id) => Some(*id),
        }
    }
}
