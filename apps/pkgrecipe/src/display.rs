//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use console::{Style, Term};
use pkgrecipe_events::RecipePhase;
use pkgrecipe_recipe::CopyReport;
use pkgrecipe_types::{ColorChoice, Declaration};
use serde_json::json;
use std::io;
use std::path::PathBuf;

/// Result of one CLI command
#[derive(Debug)]
pub enum OperationResult {
    Declaration(Declaration),
    Copy {
        package: String,
        phase: RecipePhase,
        destination: PathBuf,
        report: CopyReport,
    },
}

impl OperationResult {
    /// Serialize for `--json`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            OperationResult::Declaration(declaration) => {
                serde_json::to_string_pretty(declaration)
            }
            OperationResult::Copy {
                package,
                phase,
                destination,
                report,
            } => serde_json::to_string_pretty(&json!({
                "package": package,
                "phase": phase,
                "destination": destination,
                "copied": report.copied,
                "unchanged": report.unchanged,
                "skipped_sources": report.skipped_sources,
            })),
        }
    }
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            let json = result.to_json().map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        match result {
            OperationResult::Declaration(declaration) => self.render_declaration(declaration),
            OperationResult::Copy {
                package,
                phase,
                destination,
                report,
            } => self.render_copy_report(package, *phase, destination, report),
        }
    }

    fn render_declaration(&self, declaration: &Declaration) -> io::Result<()> {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let field = |name: &str| Cell::new(name).add_attribute(Attribute::Bold);

        table.add_row(vec![
            field("Package"),
            Cell::new(format!("{}/{}", declaration.name, declaration.version)),
        ]);
        table.add_row(vec![field("License"), Cell::new(&declaration.license)]);
        table.add_row(vec![field("URL"), Cell::new(&declaration.url)]);
        if let Some(description) = &declaration.description {
            table.add_row(vec![field("Description"), Cell::new(description)]);
        }
        let generators = declaration
            .generators
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![field("Generators"), Cell::new(generators)]);
        let requirements = declaration
            .requirements
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![field("Requires"), Cell::new(requirements)]);

        println!("{table}");
        Ok(())
    }

    fn render_copy_report(
        &self,
        package: &str,
        phase: RecipePhase,
        destination: &std::path::Path,
        report: &CopyReport,
    ) -> io::Result<()> {
        let header = format!("{phase} {package} -> {}", destination.display());
        println!("{}", self.style(&header, &Style::new().bold()));

        for path in &report.copied {
            println!("  {} {}", self.style("+", &Style::new().green()), path.display());
        }
        for path in &report.skipped_sources {
            println!(
                "  {} {} (missing)",
                self.style("~", &Style::new().yellow()),
                path.display()
            );
        }

        let summary = format!(
            "{} copied, {} unchanged",
            report.copied.len(),
            report.unchanged.len()
        );
        if report.is_empty() {
            println!("{}", self.style("No files matched", &Style::new().dim()));
        } else {
            println!("{summary}");
        }
        Ok(())
    }

    fn style(&self, text: &str, style: &Style) -> String {
        let colors = match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        };
        if colors {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_copy_result_json() {
        let result = OperationResult::Copy {
            package: "ventura/0.8".to_string(),
            phase: RecipePhase::Imports,
            destination: PathBuf::from("build"),
            report: CopyReport {
                copied: vec![PathBuf::from("build/bin/foo.dll")],
                unchanged: Vec::new(),
                skipped_sources: vec![PathBuf::from("dep/lib")],
            },
        };

        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(value["phase"], "imports");
        assert_eq!(value["copied"][0], "build/bin/foo.dll");
        assert_eq!(value["skipped_sources"][0], "dep/lib");
    }

    #[test]
    fn test_declaration_json() {
        let result = OperationResult::Declaration(Declaration {
            name: "ventura".to_string(),
            version: "0.8".to_string(),
            license: "MIT".to_string(),
            url: "http://github.com/TyRoXx/ventura".to_string(),
            description: None,
            generators: BTreeSet::from(["cmake".to_string()]),
            requirements: vec!["silicium/0.12@TyRoXx/stable".parse().unwrap()],
        });

        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(value["name"], "ventura");
        assert_eq!(value["requirements"][0]["package_name"], "silicium");
        assert!(value.get("description").is_none());
    }
}
