mod flag;
mod operation;
mod time;

pub use self::{flag::*, operation::*, time::*};
