//! Register map and logical-to-physical address mapping
//!
//! The YMF262 exposes 36 operators and 18 channels through two register
//! banks of 18 operators / 9 channels each; bank 1 sits at a 0x100 offset
//! and only accepts writes once OPL3 mode is enabled. Within a bank the
//! operator registers are laid out in three non-contiguous groups of six,
//! so logical indices go through a remap before they become offsets.

use std::ops::RangeInclusive;

/// Number of addressable channels across both banks
pub const NUM_CHANNELS: usize = 18;

/// Number of addressable operators across both banks
pub const NUM_OPERATORS: usize = 36;

/// Channels per register bank
pub const CHANNELS_PER_BANK: usize = 9;

/// Operators per register bank
pub const OPERATORS_PER_BANK: usize = 18;

/// Address offset of bank 1 (address bit 8)
pub const BANK1_BASE: u16 = 0x100;

/// Test / waveform-select-enable register
pub const REG_TEST: u16 = 0x01;

/// Keyboard split (NTS) register
pub const REG_NOTE_SELECT: u16 = 0x08;

/// Four-operator connection-select register (bank 1)
pub const REG_CONNECTION_SELECT: u16 = 0x104;

/// OPL3 mode enable register (bank 1)
pub const REG_OPL3_MODE: u16 = 0x105;

/// Operator base: tremolo / vibrato / sustain / KSR / multiplier
pub const OP_BASE_AM_VIB_MULT: u16 = 0x20;

/// Operator base: key scale level / total level
pub const OP_BASE_KSL_LEVEL: u16 = 0x40;

/// Operator base: attack rate / decay rate
pub const OP_BASE_ATTACK_DECAY: u16 = 0x60;

/// Operator base: sustain level / release rate
pub const OP_BASE_SUSTAIN_RELEASE: u16 = 0x80;

/// Operator base: waveform select
pub const OP_BASE_WAVEFORM: u16 = 0xE0;

/// Channel base: f-number low byte
pub const CH_BASE_FNUM_LOW: u16 = 0xA0;

/// Channel base: key-on / block / f-number high bits
pub const CH_BASE_KEYON_BLOCK: u16 = 0xB0;

/// Channel base: output enables / feedback / connection
pub const CH_BASE_FEEDBACK: u16 = 0xC0;

/// Waveform-select-enable bit in the test register
pub const TEST_WAVEFORM_SELECT: u8 = 0x20;

/// Keyboard-split bit in the NTS register
pub const NTS_KEYBOARD_SPLIT: u8 = 0x40;

/// OPL3 (36-operator) mode enable bit
pub const OPL3_MODE_ENABLE: u8 = 0x01;

/// Primary-bank addresses zeroed by the software reset
pub const PRIMARY_WIPE_RANGE: RangeInclusive<u16> = 0x01..=0xF5;

/// Extended-bank addresses zeroed by the software reset
///
/// Starts past the mode registers at 0x104/0x105 so the wipe cannot undo
/// the OPL3 enable that made the bank writable in the first place.
pub const EXTENDED_WIPE_RANGE: RangeInclusive<u16> = 0x106..=0x1F5;

/// Register offset of a logical operator index
///
/// Operators 0-17 live in bank 0, 18-35 in bank 1. Each bank stores its 18
/// operators as three groups of six at in-bank slots 0-5, 8-13 and 16-21;
/// the two-slot gaps are a quirk of the original OPL register layout.
///
/// # Panics
/// Panics if `op >= 36`; out-of-range indices are caller bugs, not data.
pub fn operator_offset(op: usize) -> u16 {
    assert!(op < NUM_OPERATORS, "operator index out of range: {op}");
    let (bank, slot) = if op < OPERATORS_PER_BANK {
        (0, op)
    } else {
        (1, op - OPERATORS_PER_BANK)
    };
    let offset = match slot / 6 {
        0 => slot,
        1 => slot + 2,
        _ => slot + 4,
    } as u16;
    offset + bank * BANK1_BASE
}

/// Register offset of a logical channel index
///
/// Channels 0-8 map directly into bank 0; channels 9-17 map to the same
/// offsets relative to the bank 1 base.
///
/// # Panics
/// Panics if `ch >= 18`.
pub fn channel_offset(ch: usize) -> u16 {
    assert!(ch < NUM_CHANNELS, "channel index out of range: {ch}");
    if ch < CHANNELS_PER_BANK {
        ch as u16
    } else {
        (ch - CHANNELS_PER_BANK) as u16 + BANK1_BASE
    }
}

/// Logical index of the modulator operator of a two-op channel
///
/// Within a bank, channel n's modulator sits at operator slot
/// n + (n / 3) * 3 and its carrier three slots above, mirroring the chip's
/// channel-to-operator wiring in two-operator mode.
///
/// # Panics
/// Panics if `ch >= 18`.
pub fn modulator_operator(ch: usize) -> usize {
    assert!(ch < NUM_CHANNELS, "channel index out of range: {ch}");
    let (bank, n) = (ch / CHANNELS_PER_BANK, ch % CHANNELS_PER_BANK);
    bank * OPERATORS_PER_BANK + n + (n / 3) * 3
}

/// Logical index of the carrier operator of a two-op channel
///
/// # Panics
/// Panics if `ch >= 18`.
pub fn carrier_operator(ch: usize) -> usize {
    modulator_operator(ch) + 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_channel_offset_is_injective_and_in_range() {
        let mut seen = HashSet::new();
        for ch in 0..NUM_CHANNELS {
            let offset = channel_offset(ch);
            assert!(seen.insert(offset), "duplicate offset for channel {ch}");
            assert!(
                (0x000..=0x008).contains(&offset) || (0x100..=0x108).contains(&offset),
                "channel {ch} mapped outside both banks: {offset:#x}"
            );
        }
    }

    #[test]
    fn test_operator_offset_is_injective_and_grouped() {
        let in_bank_slots: HashSet<u16> =
            (0..=5).chain(8..=13).chain(16..=21).collect();
        let mut seen = HashSet::new();
        for op in 0..NUM_OPERATORS {
            let offset = operator_offset(op);
            assert!(seen.insert(offset), "duplicate offset for operator {op}");
            assert!(
                in_bank_slots.contains(&(offset & 0xFF)),
                "operator {op} mapped to invalid slot: {offset:#x}"
            );
        }
    }

    #[test]
    fn test_operator_offset_group_boundaries() {
        assert_eq!(operator_offset(0), 0x00);
        assert_eq!(operator_offset(5), 0x05);
        assert_eq!(operator_offset(6), 0x08);
        assert_eq!(operator_offset(11), 0x0D);
        assert_eq!(operator_offset(12), 0x10);
        assert_eq!(operator_offset(17), 0x15);
        assert_eq!(operator_offset(18), 0x100);
        assert_eq!(operator_offset(35), 0x115);
    }

    #[test]
    fn test_channel_offset_bank_split() {
        assert_eq!(channel_offset(0), 0x000);
        assert_eq!(channel_offset(8), 0x008);
        assert_eq!(channel_offset(9), 0x100);
        assert_eq!(channel_offset(17), 0x108);
    }

    #[test]
    fn test_two_op_pairing_matches_chip_wiring() {
        // Bank 0: modulators at slots 0,1,2,6,7,8,12,13,14; carriers +3.
        let expected_mod = [0, 1, 2, 6, 7, 8, 12, 13, 14];
        for (ch, &m) in expected_mod.iter().enumerate() {
            assert_eq!(modulator_operator(ch), m);
            assert_eq!(carrier_operator(ch), m + 3);
            assert_eq!(modulator_operator(ch + 9), m + 18);
        }
        // Carrier/modulator offsets differ by 3 within the same bank.
        for ch in 0..NUM_CHANNELS {
            let m = operator_offset(modulator_operator(ch));
            let c = operator_offset(carrier_operator(ch));
            assert_eq!(c - m, 3);
        }
    }

    #[test]
    #[should_panic(expected = "operator index out of range")]
    fn test_operator_offset_rejects_out_of_range() {
        operator_offset(36);
    }

    #[test]
    #[should_panic(expected = "channel index out of range")]
    fn test_channel_offset_rejects_out_of_range() {
        channel_offset(18);
    }
}
