mod driver;
mod feedback;
mod session;

pub use driver::SessionDriver;
pub use feedback::{Feedback, FeedbackKind};
pub use session::{GameSession, GameSettings, GameSnapshot, PendingAdvance, Ticket};
