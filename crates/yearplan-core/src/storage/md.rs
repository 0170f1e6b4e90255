//! Markdown export functionality

use crate::plan::YearPlan;
use std::fmt::Write as _;
use std::path::Path;

/// Render the grid as a markdown pipe table.
pub fn render_markdown(plan: &YearPlan) -> String {
    let mut out = String::new();
    out.push_str("# Year plan\n\n");

    let columns: Vec<_> = plan.columns().iter().collect();
    if columns.is_empty() {
        out.push_str("*Empty year plan*\n");
        return out;
    }

    out.push('|');
    for col in &columns {
        let _ = write!(out, " {} |", escape_markdown(&col.name));
    }
    out.push('\n');

    out.push('|');
    for col in &columns {
        out.push_str(if col.is_currency() { "---:|" } else { "---|" });
    }
    out.push('\n');

    for row in plan.rows().iter() {
        out.push('|');
        for col in &columns {
            let display = plan.display_value(&row.id, &col.id);
            let _ = write!(out, " {} |", escape_markdown(&display));
        }
        out.push('\n');
    }
    out
}

/// Write the grid to a markdown file
pub fn write_markdown(path: &Path, plan: &YearPlan) -> std::io::Result<()> {
    std::fs::write(path, render_markdown(plan))
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use std::fs;

    fn demo_plan() -> YearPlan {
        let mut plan = YearPlan::inline(MemoryBackend::demo());
        plan.refresh();
        plan.pump();
        plan
    }

    #[test]
    fn empty_grid_renders_placeholder() {
        let plan = YearPlan::inline(MemoryBackend::new());
        assert_eq!(render_markdown(&plan), "# Year plan\n\n*Empty year plan*\n");
    }

    #[test]
    fn demo_grid_renders_formatted_currency() {
        let md = render_markdown(&demo_plan());
        let expected = "\
# Year plan

| Subsysteem | Planregel | Begroting |
|---|---|---:|
| Dak | Dakbedekking vervangen gymzaal | € 18.500,00 |
| Verwarming | Ketel onderhoud | € 1.250,50 |
| Elektra | Noodverlichting keuren | € 640,00 |
";
        assert_eq!(md, expected);
    }

    #[test]
    fn pipes_are_escaped() {
        assert_eq!(escape_markdown("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn deleted_column_is_not_exported() {
        let mut plan = demo_plan();
        let id = plan.columns().at(1).unwrap().id.clone();
        plan.delete_column(&id).unwrap();
        plan.pump();
        let md = render_markdown(&plan);
        assert!(!md.contains("Planregel"));
        assert!(!md.contains("Ketel onderhoud"));
        assert!(md.contains("| Verwarming | € 1.250,50 |"));
    }

    #[test]
    fn write_markdown_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.md");
        write_markdown(&path, &demo_plan()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Year plan"));
    }
}
