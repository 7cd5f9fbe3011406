//! Shared constants: render style names and the default tool.

use crate::tools::Tool;

/// Render style applied to shapes whose annotation record is persisted.
pub const STYLE_SAVED: &str = "saved";

/// Render style applied to shapes with local edits not yet persisted.
pub const STYLE_UNSAVED: &str = "unsaved";

/// Tool re-armed after a completed single-shot operation (e.g. a delete).
pub const DEFAULT_TOOL: Tool = Tool::Drag;
