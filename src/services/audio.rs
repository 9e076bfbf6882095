//! # 键盘按键音合成
//!
//! 每次按键（机器人打字或用户按键）生成一个短促的"塑料键帽"音：
//! - 锯齿波振荡器，频率在 600~900Hz 之间随机
//! - 3kHz 低通滤波
//! - 增益从 0.05 指数衰减到 0.001（50ms），60ms 时停止
//!
//! `KeystrokeTone` 是可序列化的参数，前端可直接交给 WebAudio 播放；
//! `render` 生成归一化到 [-1, 1] 的单声道 f32 PCM，用于原生播放或测试。

use std::f32::consts::{FRAC_1_SQRT_2, PI};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const MIN_FREQUENCY: f32 = 600.0;
pub const MAX_FREQUENCY: f32 = 900.0;
pub const LOWPASS_CUTOFF: f32 = 3000.0;
pub const START_GAIN: f32 = 0.05;
pub const END_GAIN: f32 = 0.001;
/// 增益衰减时长（秒）
pub const DECAY: f32 = 0.05;
/// 振荡器停止时刻（秒）
pub const DURATION: f32 = 0.06;

/// 一个按键音的合成参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeystrokeTone {
    pub frequency: f32,
    pub cutoff: f32,
    pub start_gain: f32,
    pub end_gain: f32,
    pub decay: f32,
    pub duration: f32,
}

impl KeystrokeTone {
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            cutoff: LOWPASS_CUTOFF,
            start_gain: START_GAIN,
            end_gain: END_GAIN,
            decay: DECAY,
            duration: DURATION,
        }
    }

    /// `t` 秒时的增益：衰减段为指数曲线，之后保持在终值直到停止
    pub fn gain_at(&self, t: f32) -> f32 {
        if t >= self.duration {
            0.0
        } else if t >= self.decay {
            self.end_gain
        } else {
            self.start_gain * (self.end_gain / self.start_gain).powf(t / self.decay)
        }
    }

    /// 渲染为单声道 PCM
    ///
    /// # 参数
    /// - `sample_rate` - 采样率（Hz）
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let len = (self.duration * rate).round() as usize;
        let mut filter = Biquad::lowpass(self.cutoff, rate);

        let mut phase = 0.0_f32;
        let step = self.frequency / rate;
        (0..len)
            .map(|i| {
                let saw = 2.0 * phase - 1.0;
                phase = (phase + step).fract();
                filter.process(saw) * self.gain_at(i as f32 / rate)
            })
            .collect()
    }
}

/// 二阶低通滤波器（RBJ 公式，Q = 1/√2）
struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    fn lowpass(cutoff: f32, sample_rate: f32) -> Self {
        let cutoff = cutoff.min(sample_rate * 0.49);
        let w0 = 2.0 * PI * cutoff / sample_rate;
        let alpha = w0.sin() / (2.0 * FRAC_1_SQRT_2);
        let cos = w0.cos();
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 - cos) / 2.0 / a0,
            b1: (1.0 - cos) / a0,
            b2: (1.0 - cos) / 2.0 / a0,
            a1: -2.0 * cos / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// 长期持有的按键音合成器
pub struct KeystrokeSynth {
    rng: StdRng,
}

impl KeystrokeSynth {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 生成下一个按键音（随机音高）
    pub fn tone(&mut self) -> KeystrokeTone {
        KeystrokeTone::new(self.rng.gen_range(MIN_FREQUENCY..MAX_FREQUENCY))
    }

    /// 生成 `count` 个按键音
    pub fn tones(&mut self, count: u32) -> Vec<KeystrokeTone> {
        (0..count).map(|_| self.tone()).collect()
    }
}

impl Default for KeystrokeSynth {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_range() {
        let mut synth = KeystrokeSynth::with_seed(11);
        for tone in synth.tones(500) {
            assert!((MIN_FREQUENCY..MAX_FREQUENCY).contains(&tone.frequency));
            assert_eq!(tone.cutoff, LOWPASS_CUTOFF);
        }
    }

    #[test]
    fn test_envelope() {
        let tone = KeystrokeTone::new(750.0);
        assert_eq!(tone.gain_at(0.0), START_GAIN);
        assert!((tone.gain_at(0.025) - (START_GAIN * END_GAIN).sqrt()).abs() < 1e-5);
        assert_eq!(tone.gain_at(0.055), END_GAIN);
        assert_eq!(tone.gain_at(0.06), 0.0);
    }

    #[test]
    fn test_render_length_and_level() {
        let samples = KeystrokeTone::new(600.0).render(48_000);
        assert_eq!(samples.len(), 2880);
        assert!(samples.iter().all(|s| s.abs() <= START_GAIN * 1.5));
        assert!(samples.iter().any(|s| s.abs() > 0.001));
    }
}
