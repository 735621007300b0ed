//! Hints command - list the module hints declared in a query

use std::path::PathBuf;

use anyhow::Context;
use feedsplit_query::{ModuleHint, module_hints};

use super::read_input;

/// One line per hint: module, target kind (or `-`), fragment
pub fn format_hints(hints: &[ModuleHint]) -> String {
    hints
        .iter()
        .map(|hint| {
            format!(
                "{}\t{}\t{}",
                hint.module,
                hint.target.as_deref().unwrap_or("-"),
                hint.fragment
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn run_hints(file: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let query = read_input(file.as_deref()).await?;
    let doc = feedsplit_query::parse(&query).context("failed to parse query")?;
    let hints = module_hints(&doc);

    if json {
        println!("{}", serde_json::to_string_pretty(&hints)?);
    } else if !hints.is_empty() {
        println!("{}", format_hints(&hints));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hints() {
        let doc = feedsplit_query::parse(
            r#"{ posts { ...A @push(module: "A.js") ...B @push(module: "B.js") } }
               fragment A on PhotoPost { photo_url }"#,
        )
        .unwrap();
        assert_eq!(
            format_hints(&module_hints(&doc)),
            "A.js\tPhotoPost\tA\nB.js\t-\tB"
        );
    }

    #[test]
    fn test_format_no_hints() {
        assert_eq!(format_hints(&[]), "");
    }
}
