use anchor_lang::prelude::*;

use crate::constants::{CONFIG_SEED, MAX_PAYMENT_ID_LEN};
use crate::error::RaffleError;
use crate::events::PaymentConfirmed;
use crate::state::{
    NumberPool, PaymentOutcome, PaymentStatus, Raffle, RaffleConfig, TicketOrder,
};

/// Accounts required to reconcile a payment outcome onto an order.
///
/// Ensures:
/// 1. Only the payment gateway authority can report outcomes.
/// 2. The order belongs to the given raffle and owner.
/// 3. The order is still pending (idempotency guard).
#[derive(Accounts)]
pub struct ConfirmPayment<'info> {
    pub payment_authority: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = payment_authority @ RaffleError::Unauthorized
    )]
    pub config: Account<'info, RaffleConfig>,

    #[account(mut, has_one = number_pool @ RaffleError::RaffleMismatch)]
    pub raffle: Account<'info, Raffle>,

    #[account(mut)]
    pub number_pool: AccountLoader<'info, NumberPool>,

    #[account(
        mut,
        has_one = raffle @ RaffleError::RaffleMismatch,
        has_one = owner @ RaffleError::NotTicketOwner
    )]
    pub order: Account<'info, TicketOrder>,

    /// CHECK: The ticket owner the gateway reported for; matched against
    /// the order record by the constraint above.
    pub owner: UncheckedAccount<'info>,
}

/// Moves an order's tickets to their terminal payment state.
///
/// On `Completed` the tickets become winner-eligible and capacity stays
/// consumed. On `Failed` exactly the order's ticket count is released
/// back to the raffle; the drawn numbers stay retired. Both the status
/// write and the capacity adjustment happen in this one instruction, so
/// no observer ever sees them disagree, and a retry of an already
/// applied outcome fails with `AlreadyProcessed` instead of adjusting
/// capacity twice.
pub fn process_confirm_payment(
    ctx: Context<ConfirmPayment>,
    outcome: PaymentOutcome,
    payment_id: String,
) -> Result<()> {
    require!(
        !payment_id.is_empty() && payment_id.len() <= MAX_PAYMENT_ID_LEN,
        RaffleError::InvalidPaymentId
    );

    let order = &mut ctx.accounts.order;
    require!(order.is_pending(), RaffleError::AlreadyProcessed);

    let tickets = order.ticket_count();
    let mut released_capacity = 0u32;

    match outcome {
        PaymentOutcome::Completed => {
            order.payment_status = PaymentStatus::Completed;
            let mut pool = ctx.accounts.number_pool.load_mut()?;
            for ticket in &order.tickets {
                pool.mark_eligible(ticket.number)?;
            }
        }
        PaymentOutcome::Failed => {
            order.payment_status = PaymentStatus::Failed;
            ctx.accounts.raffle.release_capacity(tickets)?;
            released_capacity = tickets;
        }
    }
    order.payment_id = Some(payment_id.clone());

    msg!(
        "Payment {:?} for order {} ({} ticket(s))",
        outcome,
        order.order_index,
        tickets
    );

    emit!(PaymentConfirmed {
        raffle: ctx.accounts.raffle.key(),
        order: order.key(),
        owner: order.owner,
        payment_status: order.payment_status,
        payment_id,
        tickets,
        released_capacity,
    });

    Ok(())
}
