use anchor_lang::prelude::*;

use crate::error::RaffleError;
use crate::events::RaffleStatusChanged;
use crate::state::{Raffle, RaffleStatus};

/// Shared accounts for the administrative status transitions.
#[derive(Accounts)]
pub struct UpdateRaffleStatus<'info> {
    pub authority: Signer<'info>,

    #[account(mut, has_one = authority @ RaffleError::Unauthorized)]
    pub raffle: Account<'info, Raffle>,
}

fn apply_transition(
    ctx: Context<UpdateRaffleStatus>,
    allowed_from: &[RaffleStatus],
    to: RaffleStatus,
) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle;
    let from = raffle.status;
    raffle.transition(allowed_from, to)?;

    msg!("Raffle {}: {:?} -> {:?}", raffle.raffle_id, from, to);

    emit!(RaffleStatusChanged {
        raffle: raffle.key(),
        from,
        to,
    });

    Ok(())
}

/// Opens ticket sales. Valid from `Draft` or `Paused`.
pub fn process_activate_raffle(ctx: Context<UpdateRaffleStatus>) -> Result<()> {
    apply_transition(
        ctx,
        &[RaffleStatus::Draft, RaffleStatus::Paused],
        RaffleStatus::Active,
    )
}

/// Suspends ticket sales without closing the raffle.
pub fn process_pause_raffle(ctx: Context<UpdateRaffleStatus>) -> Result<()> {
    apply_transition(ctx, &[RaffleStatus::Active], RaffleStatus::Paused)
}

/// Terminal administrative cancellation. Valid any time before the
/// raffle completes; in-flight reservations re-validate salability and
/// abort once the status flips.
pub fn process_cancel_raffle(ctx: Context<UpdateRaffleStatus>) -> Result<()> {
    apply_transition(
        ctx,
        &[
            RaffleStatus::Draft,
            RaffleStatus::Active,
            RaffleStatus::Paused,
        ],
        RaffleStatus::Cancelled,
    )
}
