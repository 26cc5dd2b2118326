use crate::{
    config::OutputFormat,
    derivation::{Derivation, DynamicsReport, EquationsOfMotion, NumericDynamics},
    verify::VerificationReport,
};
use colored::Colorize;
use nalgebra::{DMatrix, DVector, Vector3};
use symbolic::{
    Expr,
    matrix::{matrix_to_latex, matrix_to_text},
};

fn heading(title: &str) -> String {
    title.bold().cyan().to_string()
}

fn matrix(m: &DMatrix<Expr>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => matrix_to_text(m),
        OutputFormat::Latex => matrix_to_latex(m),
    }
}

fn column(entries: &[Expr]) -> DMatrix<Expr> {
    DMatrix::from_column_slice(entries.len(), 1, entries)
}

fn scalar(e: &Expr, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => e.to_string(),
        OutputFormat::Latex => e.to_latex(),
    }
}

fn section(out: &mut String, title: &str, body: &str) {
    out.push_str(&format!("{}\n{body}\n", heading(title)));
}

fn derivation(out: &mut String, d: &Derivation, format: OutputFormat) {
    section(out, "Mass matrix M(q)", &matrix(&d.mass_matrix, format));
    section(out, "Kinetic energy T", &scalar(&d.kinetic_energy, format));
    section(out, "Potential energy V", &scalar(&d.potential_energy, format));
}

/// The simplified closed form, preceded by the raw engine output if asked.
pub fn render_report(report: &DynamicsReport, format: OutputFormat, raw: bool) -> String {
    let mut out = String::new();
    if raw {
        out.push_str(&format!("{}\n", "== raw ==".bold()));
        derivation(&mut out, &report.raw, format);
        out.push_str(&format!("{}\n", "== simplified ==".bold()));
    }
    derivation(&mut out, &report.simplified, format);
    out
}

pub fn render_equations(
    eom: &EquationsOfMotion,
    elbow: &Vector3<Expr>,
    tip: &Vector3<Expr>,
    format: OutputFormat,
) -> String {
    let vector = |v: &DVector<Expr>| matrix(&column(v.as_slice()), format);
    let point = |v: &Vector3<Expr>| matrix(&column(v.as_slice()), format);
    let mut out = String::new();
    section(
        &mut out,
        "Coriolis and centrifugal terms C(q, v) v",
        &vector(&eom.coriolis),
    );
    section(&mut out, "Gravity terms G(q)", &vector(&eom.gravity));
    section(&mut out, "Elbow position", &point(elbow));
    section(&mut out, "Tip position", &point(tip));
    out
}

/// Side by side symbolic-then-substituted and direct numeric results.
pub fn render_numeric(symbolic: &NumericDynamics, numeric: &NumericDynamics) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", heading("Mass matrix (substituted | direct)")));
    for i in 0..symbolic.mass_matrix.nrows() {
        let row = |m: &DMatrix<f64>| {
            m.row(i)
                .iter()
                .map(|x| format!("{x:>14.9}"))
                .collect::<Vec<_>>()
                .join(" ")
        };
        out.push_str(&format!(
            "{} | {}\n",
            row(&symbolic.mass_matrix),
            row(&numeric.mass_matrix)
        ));
    }
    out.push_str(&format!("{}\n", heading("Energies (substituted | direct)")));
    out.push_str(&format!(
        "T {:>14.9} | {:>14.9}\n",
        symbolic.kinetic_energy, numeric.kinetic_energy
    ));
    out.push_str(&format!(
        "V {:>14.9} | {:>14.9}\n",
        symbolic.potential_energy, numeric.potential_energy
    ));
    out
}

pub fn render_verification(report: &VerificationReport) -> String {
    let mut out = String::new();
    for check in &report.checks {
        let marker = if check.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        out.push_str(&format!("[{marker}] {} ({})\n", check.name, check.detail));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::CheckResult;
    use symbolic::Symbol;

    fn report() -> DynamicsReport {
        let q = Expr::from(Symbol::real("q1").unwrap());
        let d = Derivation {
            mass_matrix: DMatrix::from_element(1, 1, Expr::integer(2)),
            kinetic_energy: q.pow(2),
            potential_energy: q.cos(),
        };
        DynamicsReport {
            raw: d.clone(),
            simplified: d,
        }
    }

    #[test]
    fn test_text_report() {
        let out = render_report(&report(), OutputFormat::Text, false);
        assert!(out.contains("[2]"));
        assert!(out.contains("q1^2"));
        assert!(!out.contains("raw"));
    }

    #[test]
    fn test_raw_report_has_both_sections() {
        let out = render_report(&report(), OutputFormat::Text, true);
        assert!(out.contains("raw"));
        assert!(out.contains("simplified"));
    }

    #[test]
    fn test_latex_report() {
        let out = render_report(&report(), OutputFormat::Latex, false);
        assert!(out.contains("\\begin{matrix}2\\end{matrix}"));
        assert!(out.contains("q_{1}^{2}"));
    }

    #[test]
    fn test_equations_sections() {
        let q = Expr::from(Symbol::real("q1").unwrap());
        let eom = EquationsOfMotion {
            mass_matrix: DMatrix::from_element(1, 1, Expr::integer(1)),
            coriolis: DVector::from_element(1, Expr::integer(0)),
            gravity: DVector::from_element(1, q.sin()),
        };
        let point = Vector3::new(q.cos(), Expr::integer(0), -q.sin());
        let out = render_equations(&eom, &point, &point, OutputFormat::Text);
        for title in ["Coriolis", "Gravity terms", "Elbow position", "Tip position"] {
            assert!(out.contains(title), "missing {title}");
        }
        assert!(out.contains("sin(q1)"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_numeric_side_by_side() {
        let dynamics = NumericDynamics {
            mass_matrix: DMatrix::identity(2, 2),
            kinetic_energy: 0.25,
            potential_energy: -1.5,
        };
        let out = render_numeric(&dynamics, &dynamics);
        assert_eq!(out.lines().count(), 6);
        assert!(out.contains("T    0.250000000 |    0.250000000"));
        assert!(out.contains("V   -1.500000000 |   -1.500000000"));
    }

    #[test]
    fn test_verification_lists_every_check() {
        let report = VerificationReport {
            checks: vec![
                CheckResult {
                    name: "first",
                    passed: true,
                    detail: "fine".to_string(),
                },
                CheckResult {
                    name: "second",
                    passed: false,
                    detail: "broken".to_string(),
                },
            ],
        };
        let out = render_verification(&report);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("PASS"));
        assert!(out.contains("FAIL"));
        assert!(out.contains("second (broken)"));
    }
}
