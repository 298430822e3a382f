/// Seed prefixes used for PDA derivation.
pub const CONFIG_SEED: &[u8] = b"config";
pub const RAFFLE_SEED: &[u8] = b"raffle";
pub const ORDER_SEED: &[u8] = b"order";
pub const DRAW_SEED: &[u8] = b"lottery_draw";

/// The ticket number space: five-digit numbers 00000..=99999.
pub const NUMBER_SPACE: u32 = 100_000;

/// One bit per number in the space. 100_000 is divisible by 8, so the
/// bitmap has no partial trailing byte.
pub const BITMAP_BYTES: usize = (NUMBER_SPACE as usize) / 8;

/// Most tickets a single raffle may sell.
pub const MAX_TOTAL_TICKETS: u32 = NUMBER_SPACE;

/// Most tickets one reservation may hold.
pub const MAX_TICKETS_PER_ORDER: usize = 10;

/// Random probes per ticket number before falling back to the
/// deterministic ascending scan.
pub const MAX_DRAW_ATTEMPTS: u64 = 1000;

/// A lottery draw result must carry at least this many digits.
pub const MIN_RESULT_DIGITS: usize = 5;

pub const MAX_LOTTERY_RESULT_LEN: usize = 32;
pub const MAX_PAYMENT_ID_LEN: usize = 64;

/// Length of a ticket verification code (uppercase hex).
pub const VERIFICATION_CODE_LEN: usize = 8;
