use std::fmt;

/// Headline numbers of one sized scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingReport {
    /// `"<inverter> <load> <battery>"`.
    pub label: String,
    /// Panel area that balances the day (m²).
    pub area_m2: f64,
    pub panel_peak_kw: f64,
    /// Usable battery excursion (kWh).
    pub battery_size_kwh: f64,
    /// Installed battery cost for one purchase.
    pub battery_cost: f64,
    /// Present value of all battery purchases over the horizon.
    pub battery_npv: f64,
    pub panel_cost: f64,
    /// Loss of energy generation probability of the sized battery, if one is needed.
    pub legp: Option<f64>,
    pub solver_iterations: usize,
    pub solver_residual_wh: f64,
}

impl SizingReport {
    /// One LaTeX table row: `label & peak kW & battery kWh & battery NPV & panel cost \\`.
    pub fn latex_row(&self) -> String {
        format!(
            "{} & {:.2} & {:.2} & {:.0} & {:.0} \\\\",
            self.label, self.panel_peak_kw, self.battery_size_kwh, self.battery_npv, self.panel_cost
        )
    }
}

/// A complete `tabular` environment for several reports.
pub fn latex_table(reports: &[SizingReport]) -> String {
    let mut out = String::from("\\begin{tabular}{lrrrr}\n");
    out.push_str("scenario & panel kW & battery kWh & battery NPV & panel cost \\\\\n\\hline\n");
    for report in reports {
        out.push_str(&report.latex_row());
        out.push('\n');
    }
    out.push_str("\\end{tabular}\n");
    out
}

impl fmt::Display for SizingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sizing Report: {} ---", self.label)?;
        writeln!(f, "Panel area:          {:.3} m²", self.area_m2)?;
        writeln!(f, "Panel peak:          {:.3} kW", self.panel_peak_kw)?;
        writeln!(f, "Battery size:        {:.3} kWh", self.battery_size_kwh)?;
        writeln!(f, "Battery cost:        {:.2}", self.battery_cost)?;
        writeln!(f, "Battery NPV:         {:.2}", self.battery_npv)?;
        writeln!(f, "Panel cost:          {:.2}", self.panel_cost)?;
        match self.legp {
            Some(legp) => writeln!(f, "LEGP (sized):        {:.4}", legp)?,
            None => writeln!(f, "LEGP (sized):        n/a")?,
        }
        write!(
            f,
            "Solver:              {} evaluations, residual {:.2e} Wh",
            self.solver_iterations, self.solver_residual_wh
        )
    }
}
