//! Template rendering: token model, render context and date helpers.

mod context;
mod date;
mod template;

pub use context::{Caller, RenderContext, RequestContext};
pub use date::{format_date, is_valid_date_format};
pub use template::{EOL, Field, Segment, Template, Token, TokenClass, render};
