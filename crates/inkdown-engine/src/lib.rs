//! Core styling engine for inkdown: a live markdown-to-styled-markup
//! renderer with bidirectional text synchronization.
//!
//! The raw text is the single source of truth. Rendering is a pure,
//! line-oriented lexical pass - regex-driven classification plus an ordered
//! chain of inline styling passes - and extraction walks the styled surface
//! back to the exact raw text. There is no AST and no CommonMark engine;
//! malformed markdown degrades to literal paragraph text, never an error.

pub mod classify;
pub mod debounce;
pub mod document;
pub mod escape;
pub mod extract;
pub mod inline;
pub mod links;
pub mod position;
pub mod render;
pub mod session;
pub mod surface;
pub mod toc;
pub mod transform;

// Re-export key types for easier usage
pub use classify::{AlertKind, Classification, LineKind, RenderState, classify, strip_marker};
pub use debounce::Debouncer;
pub use document::Document;
pub use escape::escape_html;
pub use extract::extract;
pub use inline::style_inline;
pub use links::{LinkError, LinkTarget, resolve_link};
pub use position::{CursorPosition, SurfacePoint, from_position, to_position};
pub use render::{render, render_text};
pub use session::{EditorSession, Host, Mode};
pub use surface::{Segment, Surface, SurfaceLine};
pub use toc::{Heading, extract_headings, heading_line};
pub use transform::{InlineFormat, LineType, apply_line_type, toggle_inline_format};
