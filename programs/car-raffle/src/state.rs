use anchor_lang::prelude::*;

use crate::constants::{BITMAP_BYTES, MAX_DRAW_ATTEMPTS, NUMBER_SPACE};
use crate::error::RaffleError;

/// Program-wide configuration account.
///
/// Holds the authorities that gate the two external ingress points
/// (lottery feed and payment gateway) and the counter used to derive
/// raffle PDAs.
#[account]
#[derive(InitSpace)]
pub struct RaffleConfig {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Admin allowed to create raffles and drive their lifecycle.
    pub authority: Pubkey,

    /// The only signer allowed to post lottery draw results.
    pub oracle_authority: Pubkey,

    /// The only signer allowed to report payment outcomes.
    pub payment_authority: Pubkey,

    /// Development switch: when set, draws flagged as unofficial may be
    /// used to resolve a winner.
    pub allow_unofficial_results: bool,

    /// Monotone raffle counter; the next raffle PDA is derived from
    /// `raffles_created + 1`.
    pub raffles_created: u64,
}

/// Raffle lifecycle. `Completed` and `Cancelled` are absorbing.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum RaffleStatus {
    Draft,
    Active,
    Paused,
    Completed,
    Cancelled,
}

/// How the drawn digits matched a sold ticket number.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum MatchType {
    /// The winning digits were a sold ticket number.
    Exact,
    /// The prize rolled down to the largest sold number below the digits.
    ClosestDown,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, InitSpace)]
pub struct WinningTicket {
    pub owner: Pubkey,
    pub ticket_number: u32,
    /// The order account holding the winning ticket.
    pub order: Pubkey,
}

/// Write-once record of a raffle's resolution against a lottery draw.
///
/// Present even when no ticket matched, so the draw that closed the
/// raffle stays auditable.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, InitSpace)]
pub struct DrawResolution {
    /// The full lottery result the resolution ran against.
    #[max_len(32)]
    pub lottery_result: String,

    /// Last five digits of the result, as a number.
    pub winning_digits: u32,

    /// `None` when no sold ticket was at or below the winning digits.
    pub match_type: Option<MatchType>,

    pub winner: Option<WinningTicket>,

    pub resolved_at: i64,
}

#[account]
#[derive(InitSpace)]
pub struct Raffle {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Sequential raffle id, also a PDA seed.
    pub raffle_id: u64,

    /// The authority or admin responsible for managing this raffle.
    pub authority: Pubkey,

    /// The zero-copy companion account tracking allocated numbers.
    pub number_pool: Pubkey,

    /// The price (in the smallest currency unit) of a single ticket.
    pub ticket_price: u64,

    /// Capacity of the raffle; 1..=100_000.
    pub total_tickets: u32,

    /// Tickets currently counted against capacity (pending + completed).
    pub sold_tickets: u32,

    /// Monotone order counter; never decremented, so a released
    /// reservation can never recycle an order PDA.
    pub order_count: u64,

    pub status: RaffleStatus,

    /// Sales stop at this timestamp.
    pub draw_date: i64,

    /// The external lottery draw that resolves this raffle.
    pub lottery_date: i64,

    /// Set exactly once, by winner determination.
    pub resolution: Option<DrawResolution>,
}

impl Raffle {
    /// True iff the raffle can currently sell tickets.
    pub fn can_sell(&self, now: i64) -> bool {
        self.status == RaffleStatus::Active
            && self.sold_tickets < self.total_tickets
            && now < self.draw_date
    }

    /// Compare-and-set on `status`.
    pub fn transition(&mut self, allowed_from: &[RaffleStatus], to: RaffleStatus) -> Result<()> {
        require!(
            allowed_from.contains(&self.status),
            RaffleError::InvalidRaffleState
        );
        self.status = to;
        Ok(())
    }

    /// Validate salability and count `quantity` tickets against capacity.
    ///
    /// Runs inside the instruction that allocates numbers and creates the
    /// order, so the check and the increment are one atomic step.
    pub fn try_reserve(&mut self, quantity: u32, now: i64) -> Result<()> {
        require!(
            self.status == RaffleStatus::Active,
            RaffleError::InvalidRaffleState
        );
        require!(now < self.draw_date, RaffleError::SalesClosed);
        let reserved = self
            .sold_tickets
            .checked_add(quantity)
            .ok_or(RaffleError::InvalidCalculation)?;
        require!(reserved <= self.total_tickets, RaffleError::CapacityExceeded);
        self.sold_tickets = reserved;
        Ok(())
    }

    /// Give capacity back after a failed payment. Never goes below zero.
    pub fn release_capacity(&mut self, quantity: u32) -> Result<()> {
        self.sold_tickets = self
            .sold_tickets
            .checked_sub(quantity)
            .ok_or(RaffleError::InvalidRaffleState)?;
        Ok(())
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some() || self.status == RaffleStatus::Completed
    }
}

/// Ticket payment lifecycle. `Pending` is the only non-terminal state;
/// `Refunded` is an administrative transition from `Completed` and is
/// never entered by this program.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum PaymentMethod {
    Stripe,
    Paypal,
    Spei,
    Cash,
}

/// Outcome reported by the payment gateway.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Completed,
    Failed,
}

/// One numbered ticket inside an order.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct TicketRecord {
    pub number: u32,
    pub is_winner: bool,
}

/// One reservation: 1..=10 tickets sharing a purchase and a payment.
///
/// A ticket is addressed as (order, number); number uniqueness within
/// the raffle is enforced by the raffle's `NumberPool` in the same
/// instruction that fills this account.
#[account]
#[derive(InitSpace)]
pub struct TicketOrder {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    pub raffle: Pubkey,

    pub owner: Pubkey,

    /// Value of `raffle.order_count` at reservation, also a PDA seed.
    pub order_index: u64,

    #[max_len(10)]
    pub tickets: Vec<TicketRecord>,

    /// Per-ticket price, copied from the raffle at reservation time.
    pub purchase_price: u64,

    pub payment_method: PaymentMethod,

    pub payment_status: PaymentStatus,

    /// External payment provider id, stored at reconciliation.
    #[max_len(64)]
    pub payment_id: Option<String>,

    /// Set at reservation time, not at payment confirmation.
    pub purchased_at: i64,
}

impl TicketOrder {
    pub fn ticket_count(&self) -> u32 {
        self.tickets.len() as u32
    }

    pub fn is_pending(&self) -> bool {
        self.payment_status == PaymentStatus::Pending
    }

    pub fn record(&self, number: u32) -> Option<&TicketRecord> {
        self.tickets.iter().find(|t| t.number == number)
    }

    pub fn record_mut(&mut self, number: u32) -> Option<&mut TicketRecord> {
        self.tickets.iter_mut().find(|t| t.number == number)
    }
}

/// A lottery draw result posted by the oracle authority, keyed by the
/// draw date so raffles sharing a date share the account. This persisted
/// account is what makes the automatic winner check re-derivable after a
/// restart: the schedule is `raffle.lottery_date`, not a timer.
#[account]
#[derive(InitSpace)]
pub struct LotteryDraw {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    pub draw_date: i64,

    /// The first-prize number as published, digits possibly interleaved
    /// with series/formatting characters.
    #[max_len(32)]
    pub first_prize: String,

    /// Cleared for synthetic development results.
    pub is_official: bool,

    pub posted_at: i64,
}

/// Per-raffle ticket number ledger over the whole 00000..=99999 space.
///
/// `used` is set at reservation and never cleared: a failed ticket
/// retires its number for good. `eligible` covers completed (paid)
/// numbers only and is the input of winner matching. Both bitmaps live
/// in the raffle's write scope, so probe-then-insert and
/// check-then-increment are serialized per raffle by the runtime.
#[account(zero_copy)]
pub struct NumberPool {
    pub raffle: Pubkey,
    /// Count of bits set in `used`.
    pub allocated: u32,
    /// Count of bits set in `eligible`.
    pub eligible_count: u32,
    pub used: [u8; BITMAP_BYTES],
    pub eligible: [u8; BITMAP_BYTES],
}

impl NumberPool {
    // 8 (discriminator) + 32 + 4 + 4 + 12500 + 12500 = 25048 bytes.
    // Above the CPI allocation limit, so the client pre-creates the
    // account and the program takes it with #[account(zero)].
    pub const SIZE: usize = 8 + 32 + 4 + 4 + BITMAP_BYTES + BITMAP_BYTES;

    pub fn is_used(&self, number: u32) -> bool {
        self.used[(number / 8) as usize] & (1 << (number % 8)) != 0
    }

    pub fn is_eligible(&self, number: u32) -> bool {
        self.eligible[(number / 8) as usize] & (1 << (number % 8)) != 0
    }

    pub fn mark_used(&mut self, number: u32) -> Result<()> {
        require!(number < NUMBER_SPACE, RaffleError::InvalidCalculation);
        require!(!self.is_used(number), RaffleError::NumberAlreadyTaken);
        self.used[(number / 8) as usize] |= 1 << (number % 8);
        self.allocated = self
            .allocated
            .checked_add(1)
            .ok_or(RaffleError::InvalidCalculation)?;
        Ok(())
    }

    /// Flip a reserved number into the winner-eligible set. Only numbers
    /// whose payment completed ever become eligible.
    pub fn mark_eligible(&mut self, number: u32) -> Result<()> {
        require!(self.is_used(number), RaffleError::InvalidCalculation);
        require!(!self.is_eligible(number), RaffleError::InvalidCalculation);
        self.eligible[(number / 8) as usize] |= 1 << (number % 8);
        self.eligible_count = self
            .eligible_count
            .checked_add(1)
            .ok_or(RaffleError::InvalidCalculation)?;
        Ok(())
    }

    /// Draw a free number: up to `MAX_DRAW_ATTEMPTS` random probes, then
    /// the deterministic ascending scan. The random source is injected
    /// so tests can force collisions.
    pub fn draw_number(&self, mut rand: impl FnMut(u64) -> u32) -> Result<u32> {
        for attempt in 0..MAX_DRAW_ATTEMPTS {
            let candidate = rand(attempt) % NUMBER_SPACE;
            if !self.is_used(candidate) {
                return Ok(candidate);
            }
        }
        self.first_free()
            .ok_or_else(|| error!(RaffleError::NumberSpaceExhausted))
    }

    /// Lowest unallocated number, if any.
    pub fn first_free(&self) -> Option<u32> {
        for (i, byte) in self.used.iter().enumerate() {
            if *byte != 0xFF {
                return Some(i as u32 * 8 + byte.trailing_ones());
            }
        }
        None
    }

    /// Apply the matching rule to the eligible set: exact hit on the
    /// winning digits, else the largest eligible number below them.
    pub fn find_winner(&self, winning_digits: u32) -> Option<(u32, MatchType)> {
        let winning_digits = winning_digits.min(NUMBER_SPACE - 1);
        if self.is_eligible(winning_digits) {
            return Some((winning_digits, MatchType::Exact));
        }
        self.closest_down(winning_digits)
            .map(|number| (number, MatchType::ClosestDown))
    }

    /// Highest eligible number <= `from`, scanning byte-wise so long
    /// empty stretches cost one comparison each.
    fn closest_down(&self, from: u32) -> Option<u32> {
        let byte_index = (from / 8) as usize;
        let bit = from % 8;
        let mask = if bit == 7 { 0xFF } else { (1u8 << (bit + 1)) - 1 };
        let head = self.eligible[byte_index] & mask;
        if head != 0 {
            return Some(byte_index as u32 * 8 + (7 - head.leading_zeros()));
        }
        for i in (0..byte_index).rev() {
            let byte = self.eligible[i];
            if byte != 0 {
                return Some(i as u32 * 8 + (7 - byte.leading_zeros()));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_TOTAL_TICKETS;

    fn test_raffle() -> Raffle {
        Raffle {
            bump: 255,
            raffle_id: 1,
            authority: Pubkey::new_unique(),
            number_pool: Pubkey::new_unique(),
            ticket_price: 500,
            total_tickets: 100,
            sold_tickets: 0,
            order_count: 0,
            status: RaffleStatus::Active,
            draw_date: 2_000_000,
            lottery_date: 1_900_000,
            resolution: None,
        }
    }

    fn test_pool() -> Box<NumberPool> {
        Box::new(NumberPool {
            raffle: Pubkey::new_unique(),
            allocated: 0,
            eligible_count: 0,
            used: [0u8; BITMAP_BYTES],
            eligible: [0u8; BITMAP_BYTES],
        })
    }

    fn mark_completed(pool: &mut NumberPool, number: u32) {
        pool.mark_used(number).unwrap();
        pool.mark_eligible(number).unwrap();
    }

    #[test]
    fn can_sell_requires_active_capacity_and_time() {
        let mut raffle = test_raffle();
        assert!(raffle.can_sell(1_000_000));

        raffle.status = RaffleStatus::Paused;
        assert!(!raffle.can_sell(1_000_000));
        raffle.status = RaffleStatus::Active;

        raffle.sold_tickets = raffle.total_tickets;
        assert!(!raffle.can_sell(1_000_000));
        raffle.sold_tickets = 0;

        assert!(!raffle.can_sell(2_000_000));
    }

    #[test]
    fn reserve_fills_capacity_exactly() {
        let mut raffle = test_raffle();
        raffle.total_tickets = 10;

        raffle.try_reserve(7, 0).unwrap();
        raffle.try_reserve(3, 0).unwrap();
        assert_eq!(raffle.sold_tickets, 10);

        assert_eq!(
            raffle.try_reserve(1, 0),
            Err(RaffleError::CapacityExceeded.into())
        );
        assert_eq!(raffle.sold_tickets, 10);
    }

    #[test]
    fn reserve_rejects_inactive_and_closed_raffles() {
        let mut raffle = test_raffle();
        raffle.status = RaffleStatus::Cancelled;
        assert_eq!(
            raffle.try_reserve(1, 0),
            Err(RaffleError::InvalidRaffleState.into())
        );

        raffle.status = RaffleStatus::Active;
        assert_eq!(
            raffle.try_reserve(1, raffle.draw_date),
            Err(RaffleError::SalesClosed.into())
        );
        assert_eq!(raffle.sold_tickets, 0);
    }

    #[test]
    fn release_never_goes_below_zero() {
        let mut raffle = test_raffle();
        raffle.try_reserve(5, 0).unwrap();
        raffle.release_capacity(3).unwrap();
        assert_eq!(raffle.sold_tickets, 2);
        assert_eq!(
            raffle.release_capacity(3),
            Err(RaffleError::InvalidRaffleState.into())
        );
        assert_eq!(raffle.sold_tickets, 2);
    }

    #[test]
    fn status_machine_paths() {
        let mut raffle = test_raffle();
        raffle.status = RaffleStatus::Draft;

        raffle
            .transition(
                &[RaffleStatus::Draft, RaffleStatus::Paused],
                RaffleStatus::Active,
            )
            .unwrap();
        raffle
            .transition(&[RaffleStatus::Active], RaffleStatus::Paused)
            .unwrap();
        raffle
            .transition(
                &[RaffleStatus::Draft, RaffleStatus::Paused],
                RaffleStatus::Active,
            )
            .unwrap();
        raffle
            .transition(
                &[
                    RaffleStatus::Draft,
                    RaffleStatus::Active,
                    RaffleStatus::Paused,
                ],
                RaffleStatus::Cancelled,
            )
            .unwrap();

        // Cancelled is absorbing.
        assert_eq!(
            raffle.transition(
                &[RaffleStatus::Draft, RaffleStatus::Paused],
                RaffleStatus::Active
            ),
            Err(RaffleError::InvalidRaffleState.into())
        );
    }

    #[test]
    fn completed_raffle_is_resolved() {
        let mut raffle = test_raffle();
        assert!(!raffle.is_resolved());
        raffle.status = RaffleStatus::Completed;
        assert!(raffle.is_resolved());
    }

    #[test]
    fn pool_tracks_used_numbers() {
        let mut pool = test_pool();
        pool.mark_used(0).unwrap();
        pool.mark_used(99_999).unwrap();
        assert!(pool.is_used(0));
        assert!(pool.is_used(99_999));
        assert!(!pool.is_used(1));
        assert_eq!(pool.allocated, 2);

        assert_eq!(
            pool.mark_used(0),
            Err(RaffleError::NumberAlreadyTaken.into())
        );
    }

    #[test]
    fn eligible_requires_prior_allocation() {
        let mut pool = test_pool();
        assert!(pool.mark_eligible(42).is_err());
        pool.mark_used(42).unwrap();
        pool.mark_eligible(42).unwrap();
        assert!(pool.is_eligible(42));
        assert_eq!(pool.eligible_count, 1);
    }

    #[test]
    fn draw_returns_first_random_candidate_when_free() {
        let pool = test_pool();
        let number = pool.draw_number(|_| 54_321).unwrap();
        assert_eq!(number, 54_321);
    }

    #[test]
    fn draw_falls_back_to_ascending_scan_on_collisions() {
        let mut pool = test_pool();
        for n in 0..16 {
            pool.mark_used(n).unwrap();
        }
        // Random source keeps proposing a taken number; after the retry
        // bound the scan must find the first free one.
        let number = pool.draw_number(|_| 3).unwrap();
        assert_eq!(number, 16);
    }

    #[test]
    fn draw_fails_only_when_space_is_full() {
        let mut pool = test_pool();
        pool.used = [0xFF; BITMAP_BYTES];
        pool.allocated = MAX_TOTAL_TICKETS;
        assert_eq!(
            pool.draw_number(|_| 0),
            Err(RaffleError::NumberSpaceExhausted.into())
        );

        pool.used[BITMAP_BYTES - 1] = 0x7F;
        assert_eq!(pool.draw_number(|_| 0).unwrap(), 99_999);
    }

    #[test]
    fn find_winner_prefers_exact_match() {
        let mut pool = test_pool();
        mark_completed(&mut pool, 1);
        mark_completed(&mut pool, 12_345);
        mark_completed(&mut pool, 99_999);

        assert_eq!(pool.find_winner(12_345), Some((12_345, MatchType::Exact)));
    }

    #[test]
    fn find_winner_rolls_down_to_nearest_sold_number() {
        let mut pool = test_pool();
        mark_completed(&mut pool, 1);
        mark_completed(&mut pool, 12_300);
        mark_completed(&mut pool, 99_999);

        assert_eq!(
            pool.find_winner(12_345),
            Some((12_300, MatchType::ClosestDown))
        );
    }

    #[test]
    fn find_winner_never_rolls_up() {
        let mut pool = test_pool();
        mark_completed(&mut pool, 5);
        mark_completed(&mut pool, 10);

        assert_eq!(pool.find_winner(0), None);
        assert_eq!(pool.find_winner(4), None);
    }

    #[test]
    fn find_winner_ignores_unpaid_numbers() {
        let mut pool = test_pool();
        pool.mark_used(12_345).unwrap();
        mark_completed(&mut pool, 12_000);

        // 12345 is reserved but unpaid, so the prize rolls down past it.
        assert_eq!(
            pool.find_winner(12_345),
            Some((12_000, MatchType::ClosestDown))
        );
    }

    #[test]
    fn closest_down_crosses_byte_boundaries() {
        let mut pool = test_pool();
        mark_completed(&mut pool, 7);

        assert_eq!(pool.find_winner(64_000), Some((7, MatchType::ClosestDown)));
    }

    #[test]
    fn failed_payment_releases_capacity_exactly_once() {
        let mut raffle = test_raffle();
        raffle.try_reserve(3, 0).unwrap();

        let mut order = TicketOrder {
            bump: 255,
            raffle: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            order_index: 0,
            tickets: vec![
                TicketRecord {
                    number: 1,
                    is_winner: false,
                },
                TicketRecord {
                    number: 2,
                    is_winner: false,
                },
                TicketRecord {
                    number: 3,
                    is_winner: false,
                },
            ],
            purchase_price: 500,
            payment_method: PaymentMethod::Stripe,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            purchased_at: 0,
        };

        order.payment_status = PaymentStatus::Failed;
        raffle.release_capacity(order.ticket_count()).unwrap();
        assert_eq!(raffle.sold_tickets, 0);

        // A replay of the same outcome must be rejected on the pending
        // guard, before capacity is touched again.
        assert!(!order.is_pending());
    }

    #[test]
    fn order_lookup_by_number() {
        let mut order = TicketOrder {
            bump: 255,
            raffle: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            order_index: 0,
            tickets: vec![
                TicketRecord {
                    number: 7,
                    is_winner: false,
                },
                TicketRecord {
                    number: 42,
                    is_winner: false,
                },
            ],
            purchase_price: 500,
            payment_method: PaymentMethod::Spei,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            purchased_at: 0,
        };

        assert!(order.is_pending());
        assert_eq!(order.ticket_count(), 2);
        assert!(order.record(42).is_some());
        assert!(order.record(43).is_none());

        order.record_mut(42).unwrap().is_winner = true;
        assert!(order.record(42).unwrap().is_winner);
    }
}
