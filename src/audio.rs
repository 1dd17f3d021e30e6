use std::collections::HashMap;

use color_eyre::eyre::Result;
use fundsp::hacker32 as dsp;
use rand::Rng;
use rodio::{buffer::SamplesBuffer, OutputStream, OutputStreamHandle, Sink, Source};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, error, info};

const SAMPLE_RATE: u32 = 44_100;

const RAIN_LOOP_SECONDS: f32 = 2.0;
const RAIN_CUTOFF: f32 = 400.0;
const RAIN_Q: f32 = 0.707;
const RAIN_START_LEVEL: f32 = 0.05;

// One second of a 300 Hz wave is a whole number of cycles, so it loops cleanly.
const WING_FREQUENCY: f32 = 300.0;
const WING_FREQUENCY_SWING: f32 = 50.0;
const WING_LEVEL: f32 = 0.1;

const CHIRP_PROBABILITY: f64 = 0.01;
const CHIRP_START: (f32, f32) = (1800.0, 2200.0);
const CHIRP_END: f32 = 1200.0;
const CHIRP_DURATION: f32 = 0.1;
const CHIRP_ATTACK: f32 = 0.01;
const CHIRP_PEAK: f32 = 0.1;

/// The fixed set of looping sources. Nothing is added or removed after start-up,
/// only their levels and pitch change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum SoundSource {
    Rain,
    Wing,
}

impl SoundSource {
    fn samples(&self) -> Vec<f32> {
        match self {
            SoundSource::Rain => {
                let mut node = dsp::noise() >> dsp::lowpass_hz(RAIN_CUTOFF, RAIN_Q);
                render_mono(&mut node, RAIN_LOOP_SECONDS)
            },
            SoundSource::Wing => {
                let mut node = dsp::triangle_hz(WING_FREQUENCY);
                render_mono(&mut node, 1.0)
            },
        }
    }

    fn start_level(&self) -> f32 {
        match self {
            SoundSource::Rain => RAIN_START_LEVEL,
            SoundSource::Wing => 0.0,
        }
    }
}

struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    voices: HashMap<SoundSource, Sink>,
}

impl Output {
    fn open(master_volume: f32) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()?;
        let mut voices = HashMap::new();
        for source in SoundSource::iter() {
            let sink = Sink::try_new(&handle)?;
            sink.pause();
            sink.set_volume(source.start_level() * master_volume);
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, source.samples()).repeat_infinite());
            voices.insert(source, sink);
        }
        Ok(Self { _stream: stream, handle, voices })
    }

    fn voice(&self, source: SoundSource) -> Option<&Sink> {
        self.voices.get(&source)
    }
}

/// Drives the ambient sound from the bird's state. Every call is a no-op until
/// `start` has opened an output device, and stays one if that failed.
pub struct AudioController {
    master_volume: f32,
    muted: bool,
    output: Option<Output>,
    init_failed: bool,
    playing: bool,
}

impl AudioController {
    pub fn new(master_volume: f32, muted: bool) -> Self {
        Self { master_volume, muted, output: None, init_failed: false, playing: false }
    }

    pub fn muted() -> Self {
        Self::new(0.0, true)
    }

    /// A controller whose device failed to open but which believes it is playing.
    #[cfg(test)]
    pub(crate) fn playing_without_device() -> Self {
        Self { master_volume: 0.3, muted: false, output: None, init_failed: true, playing: true }
    }

    pub fn is_initialized(&self) -> bool {
        self.output.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn init(&mut self) {
        if self.output.is_some() || self.init_failed || self.muted {
            return;
        }
        match Output::open(self.master_volume) {
            Ok(output) => {
                info!("Audio output ready");
                self.output = Some(output);
            },
            Err(e) => {
                error!("Audio initialisation failed, continuing without sound: {e}");
                self.init_failed = true;
            },
        }
    }

    pub fn start(&mut self) {
        self.init();
        let Some(output) = &self.output else {
            return;
        };
        if self.playing {
            return;
        }
        for source in SoundSource::iter() {
            if let Some(sink) = output.voice(source) {
                sink.set_volume(source.start_level() * self.master_volume);
                sink.set_speed(1.0);
                sink.play();
            }
        }
        self.playing = true;
    }

    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        if let Some(output) = &self.output {
            for sink in output.voices.values() {
                sink.set_volume(0.0);
                sink.pause();
            }
        }
        self.playing = false;
    }

    /// Per-tick parameter update from the bird's wing phase.
    pub fn update<R: Rng>(&mut self, wing_angle: f64, rng: &mut R) {
        if !self.playing {
            return;
        }
        let Some(output) = &self.output else {
            return;
        };

        let wing_angle = wing_angle as f32;
        if let Some(sink) = output.voice(SoundSource::Wing) {
            sink.set_volume(wing_level(wing_angle) * self.master_volume);
            sink.set_speed(wing_frequency(wing_angle) / WING_FREQUENCY);
        }
        if let Some(sink) = output.voice(SoundSource::Rain) {
            sink.set_volume(rain_level(rain_intensity(wing_angle)) * self.master_volume);
        }

        if rng.gen_bool(CHIRP_PROBABILITY) {
            let start = rng.gen_range(CHIRP_START.0..CHIRP_START.1);
            match Sink::try_new(&output.handle) {
                Ok(sink) => {
                    sink.set_volume(self.master_volume);
                    sink.append(SamplesBuffer::new(1, SAMPLE_RATE, chirp_samples(start)));
                    sink.detach();
                },
                Err(e) => debug!("Dropped chirp: {e}"),
            }
        }
    }
}

pub fn wing_level(wing_angle: f32) -> f32 {
    wing_angle.sin().abs() * WING_LEVEL
}

pub fn wing_frequency(wing_angle: f32) -> f32 {
    WING_FREQUENCY + wing_angle.sin() * WING_FREQUENCY_SWING
}

pub fn rain_intensity(wing_angle: f32) -> f32 {
    0.5 + wing_angle.sin() * 0.2
}

pub fn rain_level(intensity: f32) -> f32 {
    0.02 + intensity * 0.03
}

/// Quick linear attack to the peak, then a linear fade to silence.
pub fn chirp_envelope(t: f32) -> f32 {
    if t < CHIRP_ATTACK {
        CHIRP_PEAK * t / CHIRP_ATTACK
    } else {
        CHIRP_PEAK * (1.0 - (t - CHIRP_ATTACK) / (CHIRP_DURATION - CHIRP_ATTACK)).max(0.0)
    }
}

fn chirp_samples(start: f32) -> Vec<f32> {
    let mut node = (dsp::lfo(move |t: f32| dsp::xerp(start, CHIRP_END, (t / CHIRP_DURATION).min(1.0)))
        >> dsp::sine())
        * dsp::lfo(chirp_envelope);
    render_mono(&mut node, CHIRP_DURATION)
}

fn render_mono(node: &mut dyn dsp::AudioUnit, duration: f32) -> Vec<f32> {
    node.set_sample_rate(SAMPLE_RATE as f64);
    node.reset();

    let sample_count = (SAMPLE_RATE as f32 * duration) as usize;
    (0..sample_count).map(|_| node.get_mono()).collect()
}
