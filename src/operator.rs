//! Per-operator synthesis parameters
//!
//! One FM operator owns an ADSR envelope, a frequency multiplier, output
//! attenuation and a waveform selector. The chip packs these into five
//! registers; packing here is explicit shift/mask work rather than anything
//! relying on native bit-field layout, so the byte images are portable and
//! bit-exact.

/// Operator output waveform
///
/// Only honored once waveform-select mode is enabled during reset; without
/// it the chip always produces a sine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Full sine wave
    #[default]
    Sine = 0,
    /// Negative half cycles removed
    HalfSine = 1,
    /// Negative half cycles mirrored positive
    AbsSine = 2,
    /// Rising quarter cycles only
    PulseSine = 3,
}

/// Synthesis parameters for one FM operator
///
/// Fields are plain values masked to their hardware bit widths at
/// serialization time; they are never range-validated beyond that. The
/// all-zero default matches the chip's post-reset register contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorSettings {
    /// Frequency multiplier selector (4 bits)
    pub multiplier: u8,
    /// Scale envelope rates with key number
    pub key_scale_rate: bool,
    /// Hold at sustain level until key-off
    pub sustain_mode: bool,
    /// Enable LFO frequency modulation
    pub vibrato: bool,
    /// Enable LFO amplitude modulation
    pub tremolo: bool,
    /// Output attenuation, 0 = loudest (6 bits, inverted scale)
    pub total_level: u8,
    /// Attenuation scaling with frequency (2 bits)
    pub key_scale_level: u8,
    /// Envelope attack rate (4 bits)
    pub attack_rate: u8,
    /// Envelope decay rate (4 bits)
    pub decay_rate: u8,
    /// Envelope sustain level (4 bits)
    pub sustain_level: u8,
    /// Envelope release rate (4 bits)
    pub release_rate: u8,
    /// Output waveform shape
    pub waveform: Waveform,
}

impl OperatorSettings {
    /// Serialize to the five operator register bytes
    ///
    /// Order matches the register bases 0x20, 0x40, 0x60, 0x80, 0xE0:
    /// AM/VIB/EGT/KSR/MULT, KSL/TL, AR/DR, SL/RR, waveform.
    pub fn register_bytes(&self) -> [u8; 5] {
        [
            self.am_vib_mult_byte(),
            self.ksl_level_byte(),
            self.attack_decay_byte(),
            self.sustain_release_byte(),
            self.waveform_byte(),
        ]
    }

    /// Tremolo / vibrato / sustain-mode / KSR / multiplier byte (base 0x20)
    pub fn am_vib_mult_byte(&self) -> u8 {
        (u8::from(self.tremolo) << 7)
            | (u8::from(self.vibrato) << 6)
            | (u8::from(self.sustain_mode) << 5)
            | (u8::from(self.key_scale_rate) << 4)
            | (self.multiplier & 0x0F)
    }

    /// Key scale level / total level byte (base 0x40)
    pub fn ksl_level_byte(&self) -> u8 {
        ((self.key_scale_level & 0x03) << 6) | (self.total_level & 0x3F)
    }

    /// Attack / decay byte (base 0x60)
    pub fn attack_decay_byte(&self) -> u8 {
        ((self.attack_rate & 0x0F) << 4) | (self.decay_rate & 0x0F)
    }

    /// Sustain / release byte (base 0x80)
    pub fn sustain_release_byte(&self) -> u8 {
        ((self.sustain_level & 0x0F) << 4) | (self.release_rate & 0x0F)
    }

    /// Waveform select byte (base 0xE0)
    pub fn waveform_byte(&self) -> u8 {
        (self.waveform as u8) & 0x07
    }
}
