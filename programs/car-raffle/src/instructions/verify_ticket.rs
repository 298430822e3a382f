use anchor_lang::prelude::*;

use crate::error::RaffleError;
use crate::events::TicketVerified;
use crate::state::{PaymentStatus, Raffle, TicketOrder};
use crate::utils;

/// Accounts required to verify a ticket's authenticity. Permissionless:
/// anyone holding a printed ticket can check it.
#[derive(Accounts)]
pub struct VerifyTicket<'info> {
    pub raffle: Account<'info, Raffle>,

    #[account(has_one = raffle @ RaffleError::RaffleMismatch)]
    pub order: Account<'info, TicketOrder>,
}

/// Recomputes the verification code for the claimed number and compares
/// it with the presented one. Only paid tickets verify; the code is
/// derived from stored fields, so nothing secret is looked up.
pub fn process_verify_ticket(
    ctx: Context<VerifyTicket>,
    ticket_number: u32,
    verification_code: String,
) -> Result<()> {
    let order = &ctx.accounts.order;

    require!(
        order.payment_status == PaymentStatus::Completed,
        RaffleError::TicketNotFound
    );
    let record = order
        .record(ticket_number)
        .ok_or(RaffleError::TicketNotFound)?;

    let expected = utils::verification_code(
        &order.key(),
        ticket_number,
        &ctx.accounts.raffle.key(),
        &order.owner,
    );
    require!(
        expected == verification_code.to_uppercase(),
        RaffleError::InvalidVerificationCode
    );

    emit!(TicketVerified {
        raffle: ctx.accounts.raffle.key(),
        order: order.key(),
        owner: order.owner,
        ticket_number: utils::format_ticket_number(ticket_number),
        purchased_at: order.purchased_at,
        is_winner: record.is_winner,
    });

    Ok(())
}
