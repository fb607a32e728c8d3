pub use self::{history::*, state::*, unit::*};

pub(crate) mod history;
pub(crate) mod state;
pub(crate) mod unit;
