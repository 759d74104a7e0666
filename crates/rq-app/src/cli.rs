use std::path::PathBuf;

use clap::Parser;

/// requant — Renders requantization analysis views to PNG.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Vue à générer : "waveform", "spectrum", "histogram", ou "all".
    #[arg(long, default_value = "all")]
    pub view: String,

    /// Répertoire de sortie pour les images.
    #[arg(short, long, default_value = "plots")]
    pub out: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Forme d'onde : sine, square, triangle, sawtooth.
    #[arg(long)]
    pub waveform: Option<String>,

    /// Longueur du signal en samples.
    #[arg(long)]
    pub samples: Option<usize>,

    /// Sample rate en Hz.
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Fréquence du ton en Hz.
    #[arg(long)]
    pub frequency: Option<f64>,

    /// Amplitude du ton (pleine échelle = 1.0).
    #[arg(long)]
    pub amplitude: Option<f64>,

    /// Taille de fenêtre FFT pour les vues spectrales.
    #[arg(long)]
    pub fft_size: Option<usize>,

    /// Exporter aussi les pipelines en WAV 16 bits.
    #[arg(long, default_value_t = false)]
    pub wav: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// The pages a run can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Waveform,
    Spectrum,
    Histogram,
    All,
}

impl Cli {
    /// Resolve the `--view` flag.
    ///
    /// # Errors
    /// Returns an error for an unknown view name.
    pub fn resolve_view(&self) -> anyhow::Result<View> {
        match self.view.as_str() {
            "waveform" => Ok(View::Waveform),
            "spectrum" => Ok(View::Spectrum),
            "histogram" => Ok(View::Histogram),
            "all" => Ok(View::All),
            other => anyhow::bail!(
                "Vue inconnue : {other}. Utilisez waveform, spectrum, histogram, ou all."
            ),
        }
    }
}
