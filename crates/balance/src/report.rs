//! Turns the accumulated histograms into the reported observables and writes
//! them as plain-text tables.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use ndarray::{Array2, ArrayView2, Axis, Zip};

use balance_nostd_internal::{BinEdges, DeltaBinning};

use crate::{Channel, Error, HistogramStore};

/// Added to denominators that may be zero
pub const NORM_EPSILON: f64 = 1e-15;

/// Running counts of b and b̄ particles that passed the pT cut
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticleCounts {
    pub n_b: u64,
    pub n_bbar: u64,
}

impl ParticleCounts {
    pub fn total(&self) -> u64 {
        self.n_b + self.n_bbar
    }
}

/// The observables derived from a finished analysis.
///
/// OS (opposite-sign) refers to the sum of the ab and āb̄ channels, SS
/// (same-sign) refers to the sum of the ab̄ and āb channels.
#[derive(Clone, Debug)]
pub struct BalanceObservables {
    /// the Δy bin centers
    pub delta_y: Vec<f64>,
    /// B(Δy) = (OS - SS) / N
    pub b_delta_y: Vec<f64>,
    pub b_os_delta_y: Vec<f64>,
    pub b_ss_delta_y: Vec<f64>,
    /// the lower edge of each Δφ bin
    pub delta_phi: Vec<f64>,
    /// B(Δφ). Unlike the other quantities, this is divided by N without
    /// any smoothing
    pub b_delta_phi: Vec<f64>,
    /// OS / N, with shape `[n_rap_bins, n_phi_bins]`
    pub os_2d: Array2<f64>,
    /// SS / N
    pub ss_2d: Array2<f64>,
    /// OS over mixed-event OS, rescaled by the ratio of the totals
    pub os_correlation: Array2<f64>,
    /// SS over mixed-event SS, rescaled by the ratio of the totals
    pub ss_correlation: Array2<f64>,
}

fn channel_sum(hists: &HistogramStore, lhs: Channel, rhs: Channel) -> Array2<f64> {
    &hists.view(lhs) + &hists.view(rhs)
}

/// `same / (mixed + ε)` per bin, rescaled by `Σmixed / Σsame`
fn correlation_map(same: ArrayView2<f64>, mixed: ArrayView2<f64>) -> Array2<f64> {
    let n_same = same.sum();
    let n_mixed = mixed.sum();
    let mut out = Array2::zeros(same.raw_dim());
    Zip::from(&mut out)
        .and(&same)
        .and(&mixed)
        .for_each(|out, &s, &m| *out = s / (m + NORM_EPSILON) * n_mixed / n_same);
    out
}

impl BalanceObservables {
    pub fn compute(hists: &HistogramStore, counts: &ParticleCounts, binning: &DeltaBinning) -> Self {
        let n_total = counts.total() as f64;
        let norm = n_total + NORM_EPSILON;

        let os = channel_sum(hists, Channel::Ab, Channel::AbarBbar);
        let ss = channel_sum(hists, Channel::AbBar, Channel::AbarB);
        let mixed_os = channel_sum(hists, Channel::MixedAb, Channel::MixedAbarBbar);
        let mixed_ss = channel_sum(hists, Channel::MixedAbBar, Channel::MixedAbarB);

        let os_delta_y = os.sum_axis(Axis(1));
        let ss_delta_y = ss.sum_axis(Axis(1));
        let b_delta_y = (&os_delta_y - &ss_delta_y) / norm;
        let b_delta_phi = (&os - &ss).sum_axis(Axis(0)) / n_total;

        let rap = binning.rap();
        let phi = binning.phi();
        Self {
            delta_y: (0..rap.n_bins()).map(|i| rap.bin_center(i)).collect(),
            b_delta_y: b_delta_y.to_vec(),
            b_os_delta_y: (os_delta_y / norm).to_vec(),
            b_ss_delta_y: (ss_delta_y / norm).to_vec(),
            delta_phi: (0..phi.n_bins()).map(|j| phi.left_edge(j)).collect(),
            b_delta_phi: b_delta_phi.to_vec(),
            os_2d: &os / norm,
            ss_2d: &ss / norm,
            os_correlation: correlation_map(os.view(), mixed_os.view()),
            ss_correlation: correlation_map(ss.view(), mixed_ss.view()),
        }
    }

    /// Writes the 6 output tables into `dir`. The file names embed the
    /// species codes of the a and b roles.
    pub fn write(&self, dir: &Path, alpha: i32, beta: i32) -> Result<(), Error> {
        let names = OutputNames::new(dir, alpha, beta);
        if !self.b_delta_phi.iter().all(|v| v.is_finite()) {
            warn!("B(Δφ) holds non-finite values (no b or b̄ particle passed the cuts)");
        }

        write_table(&names.delta_y, |out| {
            writeln!(out, "# Delta y  B(Delta y)  C_OS(Delta y)  C_SS(Delta y)")?;
            for i in 0..self.delta_y.len() {
                writeln!(
                    out,
                    "{:>18}   {}  {}  {}",
                    sci(self.delta_y[i]),
                    sci(self.b_delta_y[i]),
                    sci(self.b_os_delta_y[i]),
                    sci(self.b_ss_delta_y[i])
                )?;
            }
            Ok(())
        })?;

        write_table(&names.delta_phi, |out| {
            for (edge, value) in self.delta_phi.iter().zip(&self.b_delta_phi) {
                writeln!(out, "{:>18}   {}", sci(*edge), sci(*value))?;
            }
            Ok(())
        })?;

        write_grid(&names.os_2d, self.os_2d.view())?;
        write_grid(&names.ss_2d, self.ss_2d.view())?;
        write_grid(&names.os_correlation, self.os_correlation.view())?;
        write_grid(&names.ss_correlation, self.ss_correlation.view())?;
        Ok(())
    }
}

/// The paths of the output tables for a species pair
#[derive(Clone, Debug)]
pub struct OutputNames {
    pub delta_y: PathBuf,
    pub delta_phi: PathBuf,
    pub os_2d: PathBuf,
    pub ss_2d: PathBuf,
    pub os_correlation: PathBuf,
    pub ss_correlation: PathBuf,
}

impl OutputNames {
    pub fn new(dir: &Path, alpha: i32, beta: i32) -> Self {
        let balance = |suffix: &str| dir.join(format!("Balance_function_{alpha}_{beta}_{suffix}"));
        let correlation =
            |suffix: &str| dir.join(format!("Correlation_function_{alpha}_{beta}_{suffix}"));
        Self {
            delta_y: balance("Delta_y.dat"),
            delta_phi: balance("Delta_phi.dat"),
            os_2d: balance("os_2D.dat"),
            ss_2d: balance("ss_2D.dat"),
            os_correlation: correlation("os_2D.dat"),
            ss_correlation: correlation("ss_2D.dat"),
        }
    }

    pub fn all(&self) -> [&Path; 6] {
        [
            &self.delta_y,
            &self.delta_phi,
            &self.os_2d,
            &self.ss_2d,
            &self.os_correlation,
            &self.ss_correlation,
        ]
    }
}

fn write_table(
    path: &Path,
    fill: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<(), Error> {
    let to_err = |err| Error::output(path.to_path_buf(), err);
    let mut out = BufWriter::new(File::create(path).map_err(to_err)?);
    fill(&mut out).map_err(to_err)?;
    out.flush().map_err(to_err)?;
    info!("wrote {}", path.display());
    Ok(())
}

/// one line per Δy bin
fn write_grid(path: &Path, grid: ArrayView2<f64>) -> Result<(), Error> {
    write_table(path, |out| {
        for row in grid.rows() {
            for value in row {
                write!(out, "{:>18}  ", sci(*value))?;
            }
            writeln!(out)?;
        }
        Ok(())
    })
}

/// Formats `value` in C-style scientific notation with 8 digits after the
/// decimal point, e.g. `-1.50000000e-03`. The exponent always carries a sign
/// and at least 2 digits.
pub(crate) fn sci(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    } else if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{value:.8e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}
