use piviewer::engine::detector::DetectionReport;
use std::io::{self, Write};

const INDENT: &str = "  ";

const PAIR_W: usize = 7;
const RESIDUE_W: usize = 14;
const KIND_W: usize = 9;
const ANGLE_W: usize = 9;
const DIST_W: usize = 12;

fn rule(out: &mut impl Write, left: char, mid: char, right: char) -> io::Result<()> {
    let cells: Vec<String> = [PAIR_W, RESIDUE_W, KIND_W, ANGLE_W, DIST_W]
        .iter()
        .map(|w| "─".repeat(w + 2))
        .collect();
    writeln!(
        out,
        "{}{}{}{}",
        INDENT,
        left,
        cells.join(&mid.to_string()),
        right
    )
}

/// Writes the ring statistics and one table row per qualifying ring pair.
pub fn write_pair_table(out: &mut impl Write, report: &DetectionReport) -> io::Result<()> {
    let stats = &report.statistics;
    writeln!(out, "Ligand {}", report.ligand)?;
    writeln!(
        out,
        "{}Aromatic rings: {} ligand, {} receptor ({} rings perceived in {} residues)",
        INDENT,
        stats.ligand_aromatic_rings,
        stats.receptor_aromatic_rings,
        stats.rings,
        stats.residues
    )?;

    if report.pairs.is_empty() {
        writeln!(out, "{}No π-π stacking found.", INDENT)?;
        return Ok(());
    }

    rule(out, '┌', '┬', '┐')?;
    writeln!(
        out,
        "{}│ {:<PAIR_W$} │ {:<RESIDUE_W$} │ {:<KIND_W$} │ {:>ANGLE_W$} │ {:>DIST_W$} │",
        INDENT, "Rings", "Residue", "Kind", "Angle (°)", "Distance (Å)"
    )?;
    rule(out, '├', '┼', '┤')?;
    for pair in &report.pairs {
        let residue = pair
            .receptor_residue
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "?".to_string());
        writeln!(
            out,
            "{}│ {:<PAIR_W$} │ {:<RESIDUE_W$} │ {:<KIND_W$} │ {:>ANGLE_W$.2} │ {:>DIST_W$.3} │",
            INDENT,
            format!("{}-{}", pair.ligand_ring, pair.receptor_ring),
            residue,
            pair.kind.to_string(),
            pair.angle,
            pair.distance
        )?;
    }
    rule(out, '└', '┴', '┘')?;
    writeln!(out, "{}{} π-π interaction(s).", INDENT, report.count())
}
