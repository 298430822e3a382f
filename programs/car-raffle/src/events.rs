//! Anchor events emitted for off-chain consumers (indexers, the
//! notification pipeline, dashboards). Event delivery is fire-and-forget
//! and can never roll back program state.

use anchor_lang::prelude::*;

use crate::state::{MatchType, PaymentMethod, PaymentStatus, RaffleStatus};

#[event]
pub struct RaffleCreated {
    pub raffle: Pubkey,
    pub raffle_id: u64,
    pub authority: Pubkey,
    pub ticket_price: u64,
    pub total_tickets: u32,
    pub draw_date: i64,
    pub lottery_date: i64,
}

#[event]
pub struct RaffleStatusChanged {
    pub raffle: Pubkey,
    pub from: RaffleStatus,
    pub to: RaffleStatus,
}

#[event]
pub struct TicketsReserved {
    pub raffle: Pubkey,
    pub order: Pubkey,
    pub owner: Pubkey,
    /// Five-digit zero-padded ticket numbers.
    pub ticket_numbers: Vec<String>,
    /// Per-ticket verification codes (8 uppercase hex chars).
    pub verification_codes: Vec<String>,
    pub quantity: u8,
    pub total_amount: u64,
    pub payment_method: PaymentMethod,
}

#[event]
pub struct PaymentConfirmed {
    pub raffle: Pubkey,
    pub order: Pubkey,
    pub owner: Pubkey,
    pub payment_status: PaymentStatus,
    pub payment_id: String,
    pub tickets: u32,
    /// Capacity given back to the raffle; non-zero only on failure.
    pub released_capacity: u32,
}

#[event]
pub struct TicketVerified {
    pub raffle: Pubkey,
    pub order: Pubkey,
    pub owner: Pubkey,
    pub ticket_number: String,
    pub purchased_at: i64,
    pub is_winner: bool,
}

#[event]
pub struct DrawResultPosted {
    pub draw: Pubkey,
    pub draw_date: i64,
    pub first_prize: String,
    pub is_official: bool,
}

#[event]
pub struct WinnerDetermined {
    pub raffle: Pubkey,
    pub lottery_result: String,
    /// Five-digit zero-padded winning digits.
    pub winning_digits: String,
    pub winner_found: bool,
    pub match_type: Option<MatchType>,
    pub winning_number: Option<String>,
    pub winner: Option<Pubkey>,
}
