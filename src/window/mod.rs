// Window discovery: handles, geometry and the filtered directory snapshot
pub mod directory;
pub mod info;

// Re-export main types
pub use directory::{DirectoryFilter, WindowDirectory, WindowSource};
pub use info::{HostWindow, Rect, Size, Span, WindowEntry, WindowHandle};
