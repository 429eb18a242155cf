use anyhow::anyhow;
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};

mod junit;
mod text;

pub use junit::JunitRender;
pub use text::TextRender;

/// Render a response to a string in the requested format.
pub fn render<T: Serialize + TextRender + JunitRender>(value: &T, flags: &GlobalFlags) -> anyhow::Result<String> {
    match flags.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(value.render_text(flags)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Junit => value
            .render_junit()
            .ok_or_else(|| anyhow!("--format junit is only supported by the run command")),
    }
}

/// Print a response in the requested format.
pub fn output<T: Serialize + TextRender + JunitRender>(value: &T, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rendered = render(value, flags)?;
    println!("{rendered}");
    Ok(())
}
