use anchor_lang::prelude::*;

use crate::constants::{CONFIG_SEED, MAX_TOTAL_TICKETS, RAFFLE_SEED};
use crate::error::RaffleError;
use crate::events::RaffleCreated;
use crate::state::{NumberPool, Raffle, RaffleConfig, RaffleStatus};

#[derive(Accounts)]
pub struct CreateRaffle<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = authority @ RaffleError::Unauthorized
    )]
    pub config: Account<'info, RaffleConfig>,

    #[account(
        init,
        payer = authority,
        space = 8 + Raffle::INIT_SPACE,
        seeds = [RAFFLE_SEED, &(config.raffles_created + 1).to_le_bytes()],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    /// Pre-created by the client (too large for CPI allocation) and
    /// zero-initialized here.
    #[account(zero)]
    pub number_pool: AccountLoader<'info, NumberPool>,

    pub system_program: Program<'info, System>,
}

/// Creates a raffle in `Draft` together with its number pool. Sales only
/// start once the raffle is activated.
pub fn process_create_raffle(
    ctx: Context<CreateRaffle>,
    ticket_price: u64,
    total_tickets: u32,
    draw_date: i64,
    lottery_date: i64,
) -> Result<()> {
    let clock = Clock::get()?;

    require!(
        total_tickets >= 1 && total_tickets <= MAX_TOTAL_TICKETS,
        RaffleError::InvalidTotalTickets
    );
    require!(draw_date > clock.unix_timestamp, RaffleError::InvalidDrawDate);
    require!(
        lottery_date > clock.unix_timestamp,
        RaffleError::InvalidLotteryDate
    );

    let config = &mut ctx.accounts.config;
    config.raffles_created = config
        .raffles_created
        .checked_add(1)
        .ok_or(RaffleError::InvalidCalculation)?;

    let raffle = &mut ctx.accounts.raffle;
    raffle.bump = ctx.bumps.raffle;
    raffle.raffle_id = config.raffles_created;
    raffle.authority = ctx.accounts.authority.key();
    raffle.number_pool = ctx.accounts.number_pool.key();
    raffle.ticket_price = ticket_price;
    raffle.total_tickets = total_tickets;
    raffle.sold_tickets = 0;
    raffle.order_count = 0;
    raffle.status = RaffleStatus::Draft;
    raffle.draw_date = draw_date;
    raffle.lottery_date = lottery_date;
    raffle.resolution = None;

    let mut pool = ctx.accounts.number_pool.load_init()?;
    pool.raffle = raffle.key();

    msg!("Raffle {} created, {} tickets", raffle.raffle_id, total_tickets);

    emit!(RaffleCreated {
        raffle: raffle.key(),
        raffle_id: raffle.raffle_id,
        authority: raffle.authority,
        ticket_price,
        total_tickets,
        draw_date,
        lottery_date,
    });

    Ok(())
}
