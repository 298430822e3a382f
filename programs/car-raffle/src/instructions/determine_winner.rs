use anchor_lang::prelude::*;

use crate::constants::{CONFIG_SEED, DRAW_SEED, MAX_LOTTERY_RESULT_LEN, MIN_RESULT_DIGITS};
use crate::error::RaffleError;
use crate::events::WinnerDetermined;
use crate::state::{
    DrawResolution, LotteryDraw, MatchType, NumberPool, PaymentStatus, Raffle, RaffleConfig,
    RaffleStatus, TicketOrder, WinningTicket,
};
use crate::utils;

struct ResolutionOutcome {
    winning_digits: u32,
    winner: Option<(u32, MatchType)>,
}

/// Single-shot resolution of a raffle against a lottery result.
///
/// The `AlreadyResolved` check and the `Active -> Completed` transition
/// run in the same instruction, so when a manual trigger races the
/// scheduled crank on one raffle, exactly one of them resolves it and
/// the other observes `AlreadyResolved`.
fn resolve_raffle<'info>(
    raffle: &mut Account<'info, Raffle>,
    pool: &NumberPool,
    winning_order: Option<&mut Account<'info, TicketOrder>>,
    lottery_result: &str,
    now: i64,
) -> Result<ResolutionOutcome> {
    require!(!raffle.is_resolved(), RaffleError::AlreadyResolved);
    require!(
        raffle.status == RaffleStatus::Active,
        RaffleError::InvalidRaffleState
    );
    require!(now >= raffle.lottery_date, RaffleError::LotteryDateNotReached);
    require!(pool.eligible_count > 0, RaffleError::NoCompletedTickets);

    let raffle_key = raffle.key();
    let winning_digits = utils::extract_winning_digits(lottery_result);
    let outcome = pool.find_winner(winning_digits);

    let mut resolution = DrawResolution {
        lottery_result: lottery_result.to_string(),
        winning_digits,
        match_type: None,
        winner: None,
        resolved_at: now,
    };

    if let Some((number, match_type)) = outcome {
        // The caller locates the order holding the drawn number
        // off-chain; everything it claims is re-checked here.
        let order = winning_order.ok_or(error!(RaffleError::WinningTicketMismatch))?;
        require!(order.raffle == raffle_key, RaffleError::RaffleMismatch);
        require!(
            order.payment_status == PaymentStatus::Completed,
            RaffleError::WinningTicketMismatch
        );
        let record = order
            .record_mut(number)
            .ok_or(RaffleError::WinningTicketMismatch)?;
        record.is_winner = true;

        resolution.match_type = Some(match_type);
        resolution.winner = Some(WinningTicket {
            owner: order.owner,
            ticket_number: number,
            order: order.key(),
        });
    }

    // The result is recorded even without a winner, for audit.
    raffle.resolution = Some(resolution);
    raffle.transition(&[RaffleStatus::Active], RaffleStatus::Completed)?;

    Ok(ResolutionOutcome {
        winning_digits,
        winner: outcome,
    })
}

fn emit_resolution(raffle: &Account<Raffle>, lottery_result: String, out: ResolutionOutcome) {
    msg!(
        "Raffle {} resolved, winning digits {}, winner found: {}",
        raffle.raffle_id,
        utils::format_ticket_number(out.winning_digits),
        out.winner.is_some()
    );

    emit!(WinnerDetermined {
        raffle: raffle.key(),
        lottery_result,
        winning_digits: utils::format_ticket_number(out.winning_digits),
        winner_found: out.winner.is_some(),
        match_type: out.winner.map(|(_, match_type)| match_type),
        winning_number: out.winner.map(|(n, _)| utils::format_ticket_number(n)),
        winner: raffle
            .resolution
            .as_ref()
            .and_then(|r| r.winner.as_ref())
            .map(|w| w.owner),
    });
}

/// Accounts for the scheduled (automatic) winner check. Permissionless:
/// the durable schedule is `raffle.lottery_date` plus the draw account
/// existing, so any crank may fire it after the draw.
#[derive(Accounts)]
pub struct DetermineWinner<'info> {
    pub payer: Signer<'info>,

    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, RaffleConfig>,

    #[account(mut, has_one = number_pool @ RaffleError::RaffleMismatch)]
    pub raffle: Account<'info, Raffle>,

    pub number_pool: AccountLoader<'info, NumberPool>,

    /// The feed result for this raffle's lottery date; the seed
    /// constraint pins the account to `raffle.lottery_date`.
    #[account(
        seeds = [DRAW_SEED, &raffle.lottery_date.to_le_bytes()],
        bump = lottery_draw.bump
    )]
    pub lottery_draw: Account<'info, LotteryDraw>,

    /// The order holding the would-be winning number, when one exists.
    #[account(mut)]
    pub winning_order: Option<Account<'info, TicketOrder>>,
}

/// Resolves a raffle from the posted feed result. Unofficial results are
/// rejected unless the configuration explicitly allows them.
pub fn process_determine_winner(ctx: Context<DetermineWinner>) -> Result<()> {
    let clock = Clock::get()?;

    let draw = &ctx.accounts.lottery_draw;
    require!(
        draw.is_official || ctx.accounts.config.allow_unofficial_results,
        RaffleError::LotteryFeedUnavailable
    );
    let lottery_result = draw.first_prize.clone();

    let pool = ctx.accounts.number_pool.load()?;
    let out = resolve_raffle(
        &mut ctx.accounts.raffle,
        &pool,
        ctx.accounts.winning_order.as_mut(),
        &lottery_result,
        clock.unix_timestamp,
    )?;
    drop(pool);

    emit_resolution(&ctx.accounts.raffle, lottery_result, out);
    Ok(())
}

/// Accounts for the manual override path.
#[derive(Accounts)]
pub struct DetermineWinnerManual<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        has_one = authority @ RaffleError::Unauthorized,
        has_one = number_pool @ RaffleError::RaffleMismatch
    )]
    pub raffle: Account<'info, Raffle>,

    pub number_pool: AccountLoader<'info, NumberPool>,

    /// The order holding the would-be winning number, when one exists.
    #[account(mut)]
    pub winning_order: Option<Account<'info, TicketOrder>>,
}

/// Resolves a raffle from an operator-supplied result, for draws the
/// feed never delivered. The override must carry at least five digits
/// and the raffle's lottery date must already have passed.
pub fn process_determine_winner_manual(
    ctx: Context<DetermineWinnerManual>,
    lottery_result: String,
) -> Result<()> {
    let clock = Clock::get()?;

    require!(
        lottery_result.len() <= MAX_LOTTERY_RESULT_LEN
            && utils::digit_count(&lottery_result) >= MIN_RESULT_DIGITS,
        RaffleError::InvalidLotteryResult
    );

    let pool = ctx.accounts.number_pool.load()?;
    let out = resolve_raffle(
        &mut ctx.accounts.raffle,
        &pool,
        ctx.accounts.winning_order.as_mut(),
        &lottery_result,
        clock.unix_timestamp,
    )?;
    drop(pool);

    emit_resolution(&ctx.accounts.raffle, lottery_result, out);
    Ok(())
}
