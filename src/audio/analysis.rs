use super::buffer::SampleBuffer;
use super::features::{FeatureKey, FeatureSet, FeatureValue};

/// Tempo returned when fewer than two energy peaks are found.
pub const FALLBACK_BPM: f64 = 120.0;

/// Tempo analysis window length in seconds.
const TEMPO_WINDOW_SECS: f64 = 0.5;

/// Compute the feature set of a buffer. Only channel 0 is analyzed.
pub fn extract(buffer: &SampleBuffer) -> FeatureSet {
    let samples = buffer.channel(0).unwrap_or(&[]);
    let sample_rate = buffer.sample_rate();

    let rms = rms_energy(samples);
    let zcr = zero_crossing_rate(samples);
    let tempo = estimate_tempo(samples, sample_rate);

    log::debug!(
        "Features: {} frames, rms={:.4}, zcr={:.4}, tempo={:.1} BPM",
        samples.len(),
        rms,
        zcr,
        tempo
    );

    let mut features = FeatureSet::default();
    features.insert(
        FeatureKey::Duration,
        FeatureValue::Text(format!("{} s", to_fixed(buffer.duration(), 2))),
    );
    features.insert(
        FeatureKey::SampleRate,
        FeatureValue::Text(format!("{} Hz", sample_rate)),
    );
    features.insert(
        FeatureKey::Channels,
        FeatureValue::Integer(buffer.channel_count() as u64),
    );
    features.insert(FeatureKey::RmsEnergy, FeatureValue::Text(to_fixed(rms, 4)));
    features.insert(FeatureKey::ZeroCrossingRate, FeatureValue::Text(to_fixed(zcr, 4)));
    features.insert(FeatureKey::EstimatedBpm, FeatureValue::Text(to_fixed(tempo, 0)));
    features
}

/// Format with `places` decimals, rounding ties away from zero.
/// `format!("{:.N}")` rounds ties to even ("0.125" -> "0.12").
pub(crate) fn to_fixed(value: f64, places: usize) -> String {
    let scale = 10f64.powi(places as i32);
    let rounded = (value * scale).round() / scale;
    format!("{:.*}", places, rounded)
}

/// Root-mean-square amplitude; 0 for an empty slice.
pub fn rms_energy(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| s as f64 * s as f64).sum();
    (sum / samples.len() as f64).sqrt()
}

/// Fraction of adjacent pairs whose `>= 0` sign differs, over the full
/// sample count; 0 for an empty slice.
pub fn zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f64 / samples.len() as f64
}

/// Estimate tempo in BPM by peak picking over half-second windowed energy.
///
/// Windows advance by half their length. A window index is a peak when its
/// energy is strictly greater than both neighbours; the mean distance
/// between consecutive peaks gives the beat period. With fewer than two
/// peaks the result is [`FALLBACK_BPM`].
pub fn estimate_tempo(samples: &[f32], sample_rate: u32) -> f64 {
    let window_size = (sample_rate as f64 * TEMPO_WINDOW_SECS).floor() as usize;
    let hop_size = window_size / 2;
    if hop_size == 0 {
        return FALLBACK_BPM;
    }

    let energies = window_energies(samples, window_size, hop_size);

    let peaks: Vec<usize> = (1..energies.len().saturating_sub(1))
        .filter(|&i| energies[i] > energies[i - 1] && energies[i] > energies[i + 1])
        .collect();

    if peaks.len() < 2 {
        return FALLBACK_BPM;
    }

    let total_interval: usize = peaks.windows(2).map(|w| w[1] - w[0]).sum();
    let avg_interval = total_interval as f64 / (peaks.len() - 1) as f64;
    let beats_per_second = 1.0 / (avg_interval * hop_size as f64 / sample_rate as f64);
    beats_per_second * 60.0
}

/// Summed squared energy of each window starting at 0, hop, 2*hop, ...
/// while the start is strictly before `len - window_size`.
fn window_energies(samples: &[f32], window_size: usize, hop_size: usize) -> Vec<f64> {
    if samples.len() <= window_size {
        return Vec::new();
    }
    let last_start = samples.len() - window_size;
    (0..last_start)
        .step_by(hop_size)
        .map(|start| {
            samples[start..start + window_size]
                .iter()
                .map(|&s| s as f64 * s as f64)
                .sum()
        })
        .collect()
}
