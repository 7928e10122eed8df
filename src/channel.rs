//! Per-channel synthesis parameters
//!
//! One channel is one audible voice: a 10-bit f-number and 3-bit block
//! encode its pitch, key-on gates its envelopes, and the 0xC0 register
//! carries feedback depth, the operator connection bit and the output
//! enables. The chip is write-only, so these structs are the sole source
//! of truth for what the registers should contain.

use bitflags::bitflags;

bitflags! {
    /// Output-enable nibble of the feedback/connection register
    ///
    /// LEFT/RIGHT route the channel to the stereo outputs; CHC and CHD are
    /// the two auxiliary enables used by four-channel board variants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChannelOutputs: u8 {
        /// Left stereo output
        const LEFT = 0x10;
        /// Right stereo output
        const RIGHT = 0x20;
        /// Auxiliary output C
        const CHC = 0x40;
        /// Auxiliary output D
        const CHD = 0x80;
    }
}

/// Synthesis parameters for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSettings {
    f_number: u16,
    block: u8,
    /// Envelope gate; a 0-to-1 transition retriggers from attack
    pub key_on: bool,
    /// Modulator feedback depth (3 bits)
    pub feedback: u8,
    /// Connection bit: false = serial (FM), true = parallel (additive)
    pub algorithm: bool,
    /// Output routing
    pub outputs: ChannelOutputs,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            f_number: 0,
            block: 0,
            key_on: false,
            feedback: 0,
            algorithm: false,
            outputs: ChannelOutputs::LEFT | ChannelOutputs::RIGHT,
        }
    }
}

impl ChannelSettings {
    /// Store an f-number/block pair, masked to 10 and 3 bits
    ///
    /// The frequency conversion produces pairs that satisfy
    /// `f_number < 1024` by construction; the mask is a backstop for
    /// direct callers.
    pub fn set_fnumber_block(&mut self, f_number: u16, block: u8) {
        self.f_number = f_number & 0x3FF;
        self.block = block & 0x07;
    }

    /// The 10-bit f-number
    pub fn f_number(&self) -> u16 {
        self.f_number
    }

    /// The 3-bit block (octave)
    pub fn block(&self) -> u8 {
        self.block
    }

    /// F-number low byte (base 0xA0)
    pub fn fnum_low_byte(&self) -> u8 {
        self.f_number as u8
    }

    /// Key-on / block / f-number-high byte (base 0xB0)
    pub fn keyon_block_byte(&self) -> u8 {
        (u8::from(self.key_on) << 5) | ((self.block & 0x07) << 2) | ((self.f_number >> 8) as u8 & 0x03)
    }

    /// Output-enables / feedback / connection byte (base 0xC0)
    pub fn feedback_byte(&self) -> u8 {
        self.outputs.bits() | ((self.feedback & 0x07) << 1) | u8::from(self.algorithm)
    }
}
