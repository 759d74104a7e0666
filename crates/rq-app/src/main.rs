use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use plotters::style::colors::{BLUE, GREEN, RED};
use rayon::prelude::*;
use rq_analysis::{Histogram, SpectrumAnalyzer, TonePlan};
use rq_core::AnalysisConfig;

pub mod cli;
pub mod plot;
pub mod wav;

use cli::View;
use plot::PlotSeries;

/// One renderable output page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Waveform,
    Spectrum,
    HistogramTriangular,
    HistogramShaped,
}

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Résoudre la vue et la config
    let view = cli.resolve_view()?;
    let mut config = resolve_config(&cli)?;
    apply_overrides(&cli, &mut config);
    config.validate()?;

    // 4. Construire le plan du ton
    let mut plan = TonePlan::from_config(&config);
    if let Some(ref name) = cli.waveform {
        plan.waveform = name.parse()?;
    }

    // 5. Préparer le répertoire de sortie
    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("creating output dir {}", cli.out.display()))?;

    // 6. Rendre les pages en parallèle
    let pages = pages_for(view);
    let started = Instant::now();
    let failures: Vec<String> = pages
        .par_iter()
        .filter_map(|&page| {
            render_page(page, &plan, &config, &cli.out)
                .err()
                .map(|e| format!("{page:?}: {e}"))
        })
        .collect();
    if let Some(first) = failures.first() {
        anyhow::bail!("échec du rendu : {first}");
    }
    log::info!(
        "{} page(s) rendered to {} in {:.2?}",
        pages.len(),
        cli.out.display(),
        started.elapsed()
    );

    // 7. Export WAV optionnel
    if cli.wav {
        export_pipelines(&plan, &cli.out)?;
    }

    Ok(())
}

/// Resolve config: an explicit file must parse; the default path may be
/// absent, in which case built-in defaults apply.
fn resolve_config(cli: &cli::Cli) -> Result<AnalysisConfig> {
    if cli.config.exists() {
        rq_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(AnalysisConfig::default())
    }
}

fn apply_overrides(cli: &cli::Cli, config: &mut AnalysisConfig) {
    if let Some(samples) = cli.samples {
        config.num_samples = samples;
    }
    if let Some(rate) = cli.sample_rate {
        config.sample_rate = rate;
    }
    if let Some(frequency) = cli.frequency {
        config.frequency = frequency;
    }
    if let Some(amplitude) = cli.amplitude {
        config.amplitude = amplitude;
    }
    if let Some(fft_size) = cli.fft_size {
        config.fft_size = fft_size;
    }
}

fn pages_for(view: View) -> Vec<Page> {
    match view {
        View::Waveform => vec![Page::Waveform],
        View::Spectrum => vec![Page::Spectrum],
        View::Histogram => vec![Page::HistogramTriangular, Page::HistogramShaped],
        View::All => vec![
            Page::Waveform,
            Page::Spectrum,
            Page::HistogramTriangular,
            Page::HistogramShaped,
        ],
    }
}

fn render_page(
    page: Page,
    plan: &TonePlan,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<(), plot::PlotError> {
    let dimensions = (config.plot_width, config.plot_height);
    match page {
        Page::Waveform => {
            let time = plan.time_axis();
            let series = vec![
                waveform_series("float64 reference", BLUE, &time, &plan.reference()),
                waveform_series("int32 quantized", GREEN, &time, &plan.quantized_i32()),
                waveform_series(
                    "int16 requantized (dithered)",
                    RED,
                    &time,
                    &plan
                        .requantized_f32()
                        .iter()
                        .map(|&v| f64::from(v))
                        .collect::<Vec<_>>(),
                ),
            ];
            plot::render_lines(
                &out_dir.join("waveform.png"),
                "Quantization pipelines, time domain",
                "Time (s)",
                "Amplitude",
                &series,
                dimensions,
            )
        }
        Page::Spectrum => {
            let mut fft = SpectrumAnalyzer::new(config.fft_size);
            let hop = config.fft_size / 2;
            let series = vec![
                spectrum_series("float64 reference", BLUE, &mut fft, &plan.reference(), plan, hop),
                spectrum_series(
                    "int16 + triangular dither",
                    GREEN,
                    &mut fft,
                    &plan.dithered_i16(),
                    plan,
                    hop,
                ),
                spectrum_series(
                    "int16 + noise shaping",
                    RED,
                    &mut fft,
                    &plan.noise_shaped_i16(),
                    plan,
                    hop,
                ),
            ];
            plot::render_lines(
                &out_dir.join("spectrum.png"),
                "Quantization pipelines, frequency domain",
                "Frequency (Hz)",
                "Magnitude (dBFS)",
                &series,
                dimensions,
            )
        }
        Page::HistogramTriangular => {
            let mut histogram = Histogram::new(-1.0, 1.0, config.histogram_bins)?;
            histogram.accumulate(&TonePlan::triangular_noise(config.noise_samples));
            plot::render_histogram(
                &out_dir.join("histogram_triangular.png"),
                "Triangular dither density",
                &histogram.bin_centers(),
                &histogram.density(),
                histogram.bin_width(),
                BLUE,
                dimensions,
            )
        }
        Page::HistogramShaped => {
            let mut histogram = Histogram::new(-1.0, 1.0, config.histogram_bins)?;
            histogram.accumulate(&TonePlan::shaped_noise(config.noise_samples));
            plot::render_histogram(
                &out_dir.join("histogram_shaped.png"),
                "Shaped dither density",
                &histogram.bin_centers(),
                &histogram.density(),
                histogram.bin_width(),
                RED,
                dimensions,
            )
        }
    }
}

fn waveform_series(
    label: &str,
    color: plotters::style::RGBColor,
    time: &[f64],
    values: &[f64],
) -> PlotSeries {
    PlotSeries {
        label: label.to_string(),
        color,
        points: time.iter().copied().zip(values.iter().copied()).collect(),
    }
}

fn spectrum_series(
    label: &str,
    color: plotters::style::RGBColor,
    fft: &mut SpectrumAnalyzer,
    signal: &[f64],
    plan: &TonePlan,
    hop: usize,
) -> PlotSeries {
    let signal_f32: Vec<f32> = signal.iter().map(|&v| v as f32).collect();
    let db = fft.averaged_db(&signal_f32, hop);
    PlotSeries {
        label: label.to_string(),
        color,
        points: db
            .iter()
            .enumerate()
            .map(|(i, &d)| (fft.bin_frequency(i, plan.sample_rate), f64::from(d)))
            .collect(),
    }
}

fn export_pipelines(plan: &TonePlan, out_dir: &Path) -> Result<()> {
    let exports: [(&str, Vec<f64>); 3] = [
        ("reference.wav", plan.reference()),
        ("dithered.wav", plan.dithered_i16()),
        ("noise_shaped.wav", plan.noise_shaped_i16()),
    ];
    for (name, samples) in exports {
        let path: PathBuf = out_dir.join(name);
        wav::export_wav(&path, &samples, plan.sample_rate)?;
        log::info!("WAV écrit : {}", path.display());
    }
    Ok(())
}
