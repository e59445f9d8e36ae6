use crate::RenderableReport;

pub const TABLE_HEADERS: [&str; 3] = ["Non-Compliance Type", "Dependency", "Flag"];

/// Render the review table in a bordered grid layout.
///
/// ```text
/// +---------------------+------------+-----------+
/// | Non-Compliance Type | Dependency | Flag      |
/// +=====================+============+===========+
/// | M1:Missing Direct…  | org.x      | confirmed |
/// +---------------------+------------+-----------+
/// ```
///
/// Cells are padded to the widest value of their column; an empty report renders the header only.
pub fn render_table(report: &RenderableReport) -> String {
    let rows: Vec<[&str; 3]> = report
        .rows
        .iter()
        .map(|r| [r.label.as_str(), r.participants.as_str(), r.verdict.as_str()])
        .collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_border(&mut out, &widths, '-');
    push_row(&mut out, &widths, &TABLE_HEADERS);
    push_border(&mut out, &widths, '=');
    for row in &rows {
        push_row(&mut out, &widths, row);
        push_border(&mut out, &widths, '-');
    }
    out
}

fn push_border(out: &mut String, widths: &[usize; 3], fill: char) {
    out.push('+');
    for width in widths {
        out.extend(std::iter::repeat_n(fill, width + 2));
        out.push('+');
    }
    out.push('\n');
}

fn push_row(out: &mut String, widths: &[usize; 3], cells: &[&str; 3]) {
    out.push('|');
    for (width, cell) in widths.iter().zip(cells) {
        let pad = width - cell.chars().count();
        out.push(' ');
        out.push_str(cell);
        out.extend(std::iter::repeat_n(' ', pad + 1));
        out.push('|');
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderableRow, RenderableSummary, RenderableVerdict};

    fn report(rows: Vec<RenderableRow>) -> RenderableReport {
        RenderableReport {
            artifact: Some("com.app|app|1.0".to_string()),
            scope: "global".to_string(),
            rows,
            skipped: Vec::new(),
            summary: RenderableSummary::default(),
        }
    }

    fn row(label: &str, participants: &str, verdict: RenderableVerdict) -> RenderableRow {
        RenderableRow {
            label: label.to_string(),
            participants: participants.to_string(),
            verdict,
            qualifiers: Vec::new(),
        }
    }

    #[test]
    fn empty_report_renders_header_only() {
        let out = render_table(&report(Vec::new()));
        assert_eq!(
            out,
            "+---------------------+------------+------+\n\
             | Non-Compliance Type | Dependency | Flag |\n\
             +=====================+============+======+\n"
        );
    }

    #[test]
    fn columns_grow_to_fit_cells() {
        let out = render_table(&report(vec![
            row(
                "M1:Missing Direct Dependency",
                "org.shared.util",
                RenderableVerdict::Confirmed,
            ),
            row(
                "N2:Incorrect Transitive Dependency",
                "org.example|a|1.0 -> org.example|x|1.0",
                RenderableVerdict::Undetermined,
            ),
        ]));
        insta::assert_snapshot!(out, @r"
        +------------------------------------+----------------------------------------+--------------+
        | Non-Compliance Type                | Dependency                             | Flag         |
        +====================================+========================================+==============+
        | M1:Missing Direct Dependency       | org.shared.util                        | confirmed    |
        +------------------------------------+----------------------------------------+--------------+
        | N2:Incorrect Transitive Dependency | org.example|a|1.0 -> org.example|x|1.0 | undetermined |
        +------------------------------------+----------------------------------------+--------------+
        ");
    }

    #[test]
    fn every_line_has_the_same_width() {
        let out = render_table(&report(vec![row(
            "M3:Missing Transitive Relationship",
            "g|ä|1 -> org.ü",
            RenderableVerdict::Confirmed,
        )]));
        let widths: Vec<usize> = out.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{out}");
    }
}
