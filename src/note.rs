//! Note event dispatch
//!
//! Maps discrete note-on/note-off events onto a channel: equal-tempered
//! frequency from the note number, velocity onto the carrier operator's
//! total level, then the key-on/key-off register writes. Deliberately
//! minimal; voice allocation across simultaneous notes lives upstream.

use log::debug;

use crate::bus::BusIo;
use crate::chip::Opl3;
use crate::regs::carrier_operator;

/// Velocity ceiling of the upstream event interface
const MAX_VELOCITY: u8 = 127;

/// Attenuation floor of the 6-bit total-level field
const MAX_LEVEL: u8 = 63;

/// Equal-tempered frequency of a note number
///
/// Anchored at note 21 = 220/8 Hz (27.5 Hz), matching the reference tuning
/// this driver has always used; kept verbatim for behavior compatibility.
pub fn note_frequency(note: u8) -> f32 {
    27.5 * 2f32.powf((note as f32 - 21.0) / 12.0)
}

/// Maps velocity (0-127) onto the inverted 6-bit attenuation scale
fn velocity_to_level(velocity: u8) -> u8 {
    let velocity = velocity.min(MAX_VELOCITY);
    MAX_LEVEL - (u16::from(velocity) * u16::from(MAX_LEVEL) / u16::from(MAX_VELOCITY)) as u8
}

/// Consumes note events and drives one [`Opl3`]
///
/// Owns the chip driver; the embedding event loop feeds it validated
/// events synchronously.
#[derive(Debug)]
pub struct NoteDispatcher<IO: BusIo> {
    chip: Opl3<IO>,
}

impl<IO: BusIo> NoteDispatcher<IO> {
    /// Wrap an already-`begin`-initialized driver
    pub fn new(chip: Opl3<IO>) -> Self {
        Self { chip }
    }

    /// Handle a note-on event
    ///
    /// Computes the note frequency, loads it into the channel, maps
    /// velocity onto the carrier's total level and raises key-on.
    ///
    /// # Panics
    /// Panics if `channel >= 18`.
    pub fn note_on(&mut self, channel: usize, note: u8, velocity: u8) {
        let frequency = note_frequency(note);
        debug!("note on: ch={channel} note={note} vel={velocity} freq={frequency:.2}Hz");

        self.chip.set_channel_frequency(channel, frequency);

        let carrier = carrier_operator(channel);
        let mut settings = *self.chip.operator_settings(carrier);
        settings.total_level = velocity_to_level(velocity);
        self.chip.update_operator(carrier, settings);

        self.chip.channel_key_on(channel);
    }

    /// Handle a note-off event
    ///
    /// Only the key-on transition matters; note and velocity are accepted
    /// for interface symmetry and ignored.
    ///
    /// # Panics
    /// Panics if `channel >= 18`.
    pub fn note_off(&mut self, channel: usize, note: u8, _velocity: u8) {
        debug!("note off: ch={channel} note={note}");
        self.chip.channel_key_off(channel);
    }

    /// The wrapped chip driver
    pub fn chip(&self) -> &Opl3<IO> {
        &self.chip
    }

    /// Mutable access to the wrapped chip driver, for parameter editing
    pub fn chip_mut(&mut self) -> &mut Opl3<IO> {
        &mut self.chip
    }

    /// Consume the dispatcher and return the chip driver
    pub fn into_chip(self) -> Opl3<IO> {
        self.chip
    }
}
