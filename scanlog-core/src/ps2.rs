//! Polling PS/2 receiver.
//!
//! A PS/2 device drives both lines. Each frame is 11 bits: a start bit (always 0), 8 data bits
//! least significant first, an odd parity bit and a stop bit (always 1). The device changes the
//! data line while the clock is high, so data is valid on the falling clock edge.
//!
//! The [`Decoder`] never looks at a timer: framing comes purely from watching clock edges. It
//! does not check parity or the stop bit, a corrupted frame decodes into whatever bits were seen.
//!
//! Since only edges are counted, a decoder that starts watching in the middle of a frame takes a
//! data bit for the start bit and stays shifted for every frame that follows. After a bounded
//! read gave up, the decoder therefore waits for the clock to rest high for longer than any clock
//! phase inside a frame before it trusts the next falling edge again.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

use crate::fmt;

/// Levels of the two PS/2 lines at one instant. `true` is high.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineState {
    pub clock: bool,
    pub data: bool,
}

impl LineState {
    /// Both lines released, the bus is idle.
    pub const IDLE: Self = Self {
        clock: true,
        data: true,
    };

    pub const fn new(clock: bool, data: bool) -> Self {
        Self { clock, data }
    }
}

/// Something that can sample the clock and data lines.
pub trait LineSampler {
    /// Sample both lines as close together as possible.
    fn sample_lines(&mut self) -> LineState;
}

impl<T: LineSampler + ?Sized> LineSampler for &mut T {
    fn sample_lines(&mut self) -> LineState {
        (**self).sample_lines()
    }
}

/// [`LineSampler`] over two GPIO inputs.
pub struct PinPair<C, D> {
    clock: C,
    data: D,
}

impl<C, D> PinPair<C, D>
where
    C: InputPin<Error = Infallible>,
    D: InputPin<Error = Infallible>,
{
    pub fn new(clock: C, data: D) -> Self {
        Self { clock, data }
    }
}

impl<C, D> LineSampler for PinPair<C, D>
where
    C: InputPin<Error = Infallible>,
    D: InputPin<Error = Infallible>,
{
    #[inline]
    fn sample_lines(&mut self) -> LineState {
        let Ok(clock) = self.clock.is_high();
        let Ok(data) = self.data.is_high();
        LineState { clock, data }
    }
}

/// Reasons [`Decoder::try_read_symbol`] gives up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// No start bit within the poll budget, the clock rested high the whole time.
    Idle,
    /// A clock edge did not arrive within the poll budget while a frame was expected to go on.
    /// The partially received frame is lost.
    Timeout,
}

/// Limit on how many polls a single clock edge wait may take.
trait Budget {
    type Error;

    /// `reason` is reported once `polls` runs out.
    fn check(&self, polls: u32, reason: DecodeError) -> Result<(), Self::Error>;
}

struct Unbounded;

impl Budget for Unbounded {
    type Error = Infallible;

    #[inline]
    fn check(&self, _polls: u32, _reason: DecodeError) -> Result<(), Infallible> {
        Ok(())
    }
}

struct Polls(u32);

impl Budget for Polls {
    type Error = DecodeError;

    #[inline]
    fn check(&self, polls: u32, reason: DecodeError) -> Result<(), DecodeError> {
        if polls >= self.0 {
            Err(reason)
        } else {
            Ok(())
        }
    }
}

/// Consecutive high clock polls that [`Decoder`] takes as a gap between frames by default.
pub const DEFAULT_RESYNC_POLLS: u32 = 1_000;

/// Busy-waiting PS/2 frame decoder.
pub struct Decoder<S> {
    lines: S,
    resync_polls: u32,
    synced: bool,
}

impl<S: LineSampler> Decoder<S> {
    /// Construct a [`Decoder`] that expects the bus to be between frames.
    pub fn new(lines: S) -> Self {
        Self {
            lines,
            resync_polls: DEFAULT_RESYNC_POLLS,
            synced: true,
        }
    }

    /// Set how many polls in a row the clock has to read high before framing is trusted again
    /// after a bounded read gave up.
    ///
    /// This has to be longer than a clock-high phase inside a frame. The first read also waits
    /// for such a gap, since the device may already be sending when the decoder comes up.
    pub fn with_resync_polls(mut self, polls: u32) -> Self {
        self.resync_polls = polls;
        self.synced = false;
        self
    }

    /// Block until a whole frame has been clocked in and return its data byte.
    ///
    /// A silent or disconnected device blocks this call forever.
    pub fn read_symbol(&mut self) -> u8 {
        let Ok(symbol) = self.read_frame(&Unbounded);
        symbol
    }

    /// Like [`Decoder::read_symbol`], but every clock edge wait gives up after `budget` polls
    /// without the expected level.
    ///
    /// A quiet bus returns [`DecodeError::Idle`] after roughly `budget` polls, a frame that stalls
    /// halfway returns [`DecodeError::Timeout`]. Either way the bus may carry a frame by the time
    /// of the next call, so that call first waits for a gap between frames, dropping the frame
    /// it joined in the middle of.
    pub fn try_read_symbol(&mut self, budget: u32) -> Result<u8, DecodeError> {
        self.read_frame(&Polls(budget))
    }

    fn read_frame<B: Budget>(&mut self, budget: &B) -> Result<u8, B::Error> {
        if !self.synced {
            self.wait_gap(budget)?;
            fmt::trace!("PS/2 framing resynchronized");
        }

        // stays unset if the frame is cut off
        self.synced = false;

        // bracket the start bit: idle, falling edge, back high
        self.wait_clock(true, budget, DecodeError::Timeout)?;
        self.wait_clock(false, budget, DecodeError::Idle)?;
        self.wait_clock(true, budget, DecodeError::Timeout)?;

        let mut value = 0u8;
        for offset in 0..8 {
            let sample = self.wait_clock(false, budget, DecodeError::Timeout)?;
            value |= (sample.data as u8) << offset;
            self.wait_clock(true, budget, DecodeError::Timeout)?;
        }

        // parity and stop bits, not verified
        for _ in 0..2 {
            self.wait_clock(false, budget, DecodeError::Timeout)?;
            self.wait_clock(true, budget, DecodeError::Timeout)?;
        }

        self.synced = true;
        Ok(value)
    }

    /// Poll until the clock reads `level` and return the sample that saw it.
    #[inline]
    fn wait_clock<B: Budget>(
        &mut self,
        level: bool,
        budget: &B,
        reason: DecodeError,
    ) -> Result<LineState, B::Error> {
        let mut polls = 0u32;
        loop {
            let state = self.lines.sample_lines();
            if state.clock == level {
                return Ok(state);
            }
            budget.check(polls, reason)?;
            polls = polls.saturating_add(1);
        }
    }

    /// Poll until the clock has read high `resync_polls` times in a row.
    ///
    /// Only a clock held low counts against the budget.
    fn wait_gap<B: Budget>(&mut self, budget: &B) -> Result<(), B::Error> {
        let mut high = 0u32;
        let mut low = 0u32;
        loop {
            if self.lines.sample_lines().clock {
                low = 0;
                high = high.saturating_add(1);
                if high >= self.resync_polls {
                    return Ok(());
                }
            } else {
                high = 0;
                budget.check(low, DecodeError::Timeout)?;
                low = low.saturating_add(1);
            }
        }
    }
}

/// Number of line states in one frame produced by [`encode_frame`].
pub const FRAME_STATES: usize = 22;

/// Render `symbol` as the sequence of line states a device drives for it: one low and one high
/// clock phase per bit, start bit first, with correct odd parity.
///
/// Useful to feed a [`Decoder`] from a simulated device.
pub fn encode_frame(symbol: u8) -> [LineState; FRAME_STATES] {
    let parity = symbol.count_ones() % 2 == 0;

    let mut bits = [false; 11];
    for (offset, bit) in bits[1..9].iter_mut().enumerate() {
        *bit = symbol & (1 << offset) != 0;
    }
    bits[9] = parity;
    bits[10] = true;

    let mut states = [LineState::IDLE; FRAME_STATES];
    for (pair, &bit) in states.chunks_exact_mut(2).zip(bits.iter()) {
        pair[0] = LineState::new(false, bit);
        pair[1] = LineState::new(true, bit);
    }
    states
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays back scripted line states, then stays idle.
    struct Script {
        states: Vec<LineState>,
        pos: usize,
    }

    impl Script {
        fn new() -> Self {
            Self {
                states: Vec::new(),
                pos: 0,
            }
        }

        fn idle(mut self, n: usize) -> Self {
            self.states.extend(core::iter::repeat_n(LineState::IDLE, n));
            self
        }

        fn frame(mut self, symbol: u8) -> Self {
            // hold every phase for a few polls, like a slow real clock
            for state in encode_frame(symbol) {
                self.states.extend(core::iter::repeat_n(state, 3));
            }
            self
        }

        fn raw(mut self, states: &[LineState]) -> Self {
            self.states.extend_from_slice(states);
            self
        }
    }

    impl LineSampler for Script {
        fn sample_lines(&mut self) -> LineState {
            let state = self.states.get(self.pos).copied().unwrap_or(LineState::IDLE);
            self.pos += 1;
            state
        }
    }

    #[test]
    fn frame_layout() {
        let states = encode_frame(0x1c);
        // start bit
        assert_eq!(states[0], LineState::new(false, false));
        assert_eq!(states[1], LineState::new(true, false));
        // 0x1c = 0b0001_1100, LSB first
        let data: Vec<bool> = states[2..18].iter().step_by(2).map(|s| s.data).collect();
        assert_eq!(data, [false, false, true, true, true, false, false, false]);
        // three ones, so parity is 0
        assert!(!states[18].data);
        // stop bit
        assert!(states[20].data);
        assert!(states[21].clock);
    }

    #[test]
    fn decodes_single_frame() {
        let mut dec = Decoder::new(Script::new().idle(5).frame(0x5a).idle(5));
        assert_eq!(dec.read_symbol(), 0x5a);
    }

    #[test]
    fn decodes_back_to_back_frames() {
        let script = Script::new()
            .idle(2)
            .frame(0x1c)
            .frame(0xf0)
            .idle(4)
            .frame(0x1c)
            .frame(0x00)
            .frame(0xff);
        let mut dec = Decoder::new(script);
        assert_eq!(dec.read_symbol(), 0x1c);
        assert_eq!(dec.read_symbol(), 0xf0);
        assert_eq!(dec.read_symbol(), 0x1c);
        assert_eq!(dec.read_symbol(), 0x00);
        assert_eq!(dec.read_symbol(), 0xff);
    }

    #[test]
    fn bad_parity_is_ignored() {
        let mut states = encode_frame(0x32);
        states[18].data = !states[18].data;
        states[19].data = !states[19].data;
        let mut dec = Decoder::new(Script::new().idle(1).raw(&states));
        assert_eq!(dec.read_symbol(), 0x32);
    }

    #[test]
    fn data_is_sampled_on_the_falling_edge() {
        let mut states = encode_frame(0x00);
        // data glitches high only while the clock is high, must not be picked up
        for state in states[2..18].iter_mut().filter(|s| s.clock) {
            state.data = true;
        }
        let mut dec = Decoder::new(Script::new().idle(1).raw(&states));
        assert_eq!(dec.read_symbol(), 0x00);
    }

    #[test]
    fn quiet_bus_is_idle() {
        let mut dec = Decoder::new(Script::new().idle(100));
        assert_eq!(dec.try_read_symbol(10), Err(DecodeError::Idle));
    }

    #[test]
    fn truncated_frame_times_out() {
        let frame = encode_frame(0x45);
        let script = Script::new()
            .raw(&frame[..9])
            .raw(&[LineState::new(false, true); 50]);
        let mut dec = Decoder::new(script);
        assert_eq!(dec.try_read_symbol(20), Err(DecodeError::Timeout));
    }

    #[test]
    fn budget_large_enough_decodes() {
        let mut dec = Decoder::new(Script::new().idle(5).frame(0x4a).idle(50));
        assert_eq!(dec.try_read_symbol(10), Ok(0x4a));
        assert_eq!(dec.try_read_symbol(10), Err(DecodeError::Idle));
    }

    /// The tail of 0x1c without its start bit, as seen by a decoder that was away while the
    /// frame began, then a burst with short gaps.
    fn joined_mid_frame(mut script: Script) -> Script {
        for &state in &encode_frame(0x1c)[2..] {
            script = script.raw(&[state; 3]);
        }
        script
            .idle(4)
            .frame(0x32)
            .idle(4)
            .frame(0x21)
            .idle(4)
            .frame(0x5a)
    }

    #[test]
    fn resyncs_when_started_mid_frame() {
        let mut dec = Decoder::new(joined_mid_frame(Script::new())).with_resync_polls(6);
        let symbols: Vec<_> = (0..3).map(|_| dec.try_read_symbol(100)).collect();
        assert_eq!(symbols, [Ok(0x32), Ok(0x21), Ok(0x5a)]);
    }

    #[test]
    fn resyncs_after_idle() {
        // the gap wait, the idle high and the spent budget take 18 polls, then the device is
        // halfway into a frame
        let script = joined_mid_frame(Script::new().idle(18));
        let mut dec = Decoder::new(script).with_resync_polls(6);

        assert_eq!(dec.try_read_symbol(10), Err(DecodeError::Idle));
        let symbols: Vec<_> = (0..3).map(|_| dec.try_read_symbol(100)).collect();
        assert_eq!(symbols, [Ok(0x32), Ok(0x21), Ok(0x5a)]);
    }

    #[test]
    fn resyncs_after_stalled_frame() {
        let frame = encode_frame(0x45);
        let script = Script::new()
            .idle(8)
            .raw(&frame[..9])
            .raw(&[LineState::new(false, true); 30]);
        let mut dec = Decoder::new(joined_mid_frame(script)).with_resync_polls(6);

        assert_eq!(dec.try_read_symbol(20), Err(DecodeError::Timeout));
        // the clock comes back up in the middle of 0x1c, which is skipped
        assert_eq!(dec.try_read_symbol(100), Ok(0x32));
        assert_eq!(dec.read_symbol(), 0x21);
        assert_eq!(dec.read_symbol(), 0x5a);
    }

    #[test]
    fn plain_decoder_starts_in_sync() {
        let mut dec = Decoder::new(Script::new().idle(1).frame(0x29));
        assert_eq!(dec.read_symbol(), 0x29);
    }
}
