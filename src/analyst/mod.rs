pub mod session;
pub mod templates;

pub use session::{AnalystSession, MessageRole, SqlMessage};
pub use templates::{find_template, AnalysisTemplate, TEMPLATES};
