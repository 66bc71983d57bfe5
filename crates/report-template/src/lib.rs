mod document;
mod html;

pub use document::{Block, Document, TemplateError};
pub use html::render_html;
