use anchor_lang::prelude::*;

use crate::constants::{CONFIG_SEED, DRAW_SEED, MAX_LOTTERY_RESULT_LEN, MIN_RESULT_DIGITS};
use crate::error::RaffleError;
use crate::events::DrawResultPosted;
use crate::state::{LotteryDraw, RaffleConfig};
use crate::utils;

/// Accounts required to ingest one lottery draw result.
#[derive(Accounts)]
#[instruction(draw_date: i64)]
pub struct PostDrawResult<'info> {
    #[account(mut)]
    pub oracle_authority: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = oracle_authority @ RaffleError::Unauthorized
    )]
    pub config: Account<'info, RaffleConfig>,

    /// Keyed by the draw date; every raffle resolving against that date
    /// reads this one account.
    #[account(
        init,
        payer = oracle_authority,
        space = 8 + LotteryDraw::INIT_SPACE,
        seeds = [DRAW_SEED, &draw_date.to_le_bytes()],
        bump
    )]
    pub lottery_draw: Account<'info, LotteryDraw>,

    pub system_program: Program<'info, System>,
}

/// Persists a draw result from the external lottery feed. Synthetic
/// development results may be posted with `is_official = false`; winner
/// determination decides whether to accept them.
pub fn process_post_draw_result(
    ctx: Context<PostDrawResult>,
    draw_date: i64,
    first_prize: String,
    is_official: bool,
) -> Result<()> {
    let clock = Clock::get()?;

    require!(
        draw_date <= clock.unix_timestamp,
        RaffleError::DrawDateInFuture
    );
    require!(
        first_prize.len() <= MAX_LOTTERY_RESULT_LEN
            && utils::digit_count(&first_prize) >= MIN_RESULT_DIGITS,
        RaffleError::InvalidLotteryResult
    );

    let draw = &mut ctx.accounts.lottery_draw;
    draw.bump = ctx.bumps.lottery_draw;
    draw.draw_date = draw_date;
    draw.first_prize = first_prize.clone();
    draw.is_official = is_official;
    draw.posted_at = clock.unix_timestamp;

    msg!(
        "Draw result for {} posted (official: {})",
        draw_date,
        is_official
    );

    emit!(DrawResultPosted {
        draw: draw.key(),
        draw_date,
        first_prize,
        is_official,
    });

    Ok(())
}
