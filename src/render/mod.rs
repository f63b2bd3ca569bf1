pub mod png;
pub mod session;
pub mod text;
pub mod view;

pub use png::{Figure, AXIS_LABELS, PALETTE, TITLE};
pub use session::{PlotLine, Session};
pub use text::TextPainter;
pub use view::Camera;
