pub mod request;
pub mod session;

pub use request::{Architecture, BuildRequest, Training};
pub use session::{RunReport, Session};
