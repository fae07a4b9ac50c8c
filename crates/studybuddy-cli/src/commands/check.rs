//! The `studybuddy check` command.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use studybuddy_core::schema::parse_and_validate;
use studybuddy_core::QuestionKind;

pub fn execute(kind: QuestionKind, response: &Path) -> Result<()> {
    let raw = if response == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read response from stdin")?;
        buf
    } else {
        std::fs::read_to_string(response)
            .with_context(|| format!("failed to read {}", response.display()))?
    };

    let question = parse_and_validate(&raw, kind)
        .with_context(|| format!("response is not a valid {} question", kind.label()))?;

    println!("{}", serde_json::to_string_pretty(&question)?);
    println!("\nValid {} question.", kind.label());
    Ok(())
}
