use anchor_lang::prelude::*;
use solana_program::sysvar;

use crate::constants::{MAX_DRAW_ATTEMPTS, MAX_TICKETS_PER_ORDER, ORDER_SEED};
use crate::error::RaffleError;
use crate::events::TicketsReserved;
use crate::state::{
    NumberPool, PaymentMethod, PaymentStatus, Raffle, TicketOrder, TicketRecord,
};
use crate::utils;

/// Accounts required to reserve tickets in a raffle.
#[derive(Accounts)]
pub struct ReserveTickets<'info> {
    /// The account purchasing and paying for the reservation.
    #[account(mut)]
    pub buyer: Signer<'info>,

    #[account(mut, has_one = number_pool @ RaffleError::RaffleMismatch)]
    pub raffle: Account<'info, Raffle>,

    #[account(mut)]
    pub number_pool: AccountLoader<'info, NumberPool>,

    /// One reservation, seeded by the raffle's monotone order counter.
    #[account(
        init,
        payer = buyer,
        space = 8 + TicketOrder::INIT_SPACE,
        seeds = [
            ORDER_SEED,
            raffle.key().as_ref(),
            &raffle.order_count.to_le_bytes()
        ],
        bump
    )]
    pub order: Account<'info, TicketOrder>,

    /// CHECK: Recent blockhashes sysvar, read as the sampling seed.
    #[account(address = sysvar::recent_blockhashes::ID)]
    pub recent_blockhashes: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Reserves `quantity` tickets: counts them against capacity, draws that
/// many distinct five-digit numbers and records the order in `Pending`.
///
/// The capacity check, the number probes and the order creation all run
/// in this single instruction, so concurrent purchases serialize on the
/// raffle account and either fit the remaining capacity or fail with
/// `CapacityExceeded`. Any later failure reverts the whole instruction,
/// including the capacity increment.
pub fn process_reserve_tickets(
    ctx: Context<ReserveTickets>,
    quantity: u8,
    payment_method: PaymentMethod,
) -> Result<()> {
    require!(
        quantity >= 1 && quantity as usize <= MAX_TICKETS_PER_ORDER,
        RaffleError::InvalidQuantity
    );

    let clock = Clock::get()?;
    let raffle_key = ctx.accounts.raffle.key();
    let order_key = ctx.accounts.order.key();
    let buyer_key = ctx.accounts.buyer.key();

    let raffle = &mut ctx.accounts.raffle;
    raffle.try_reserve(quantity as u32, clock.unix_timestamp)?;

    let base = utils::recent_blockhash_seed(&ctx.accounts.recent_blockhashes)?;
    let seed = utils::draw_seed(&base, &raffle_key, raffle.order_count);

    let mut pool = ctx.accounts.number_pool.load_mut()?;
    let mut numbers: Vec<u32> = Vec::with_capacity(quantity as usize);
    for i in 0..quantity as u64 {
        let number = pool.draw_number(|attempt| {
            utils::random(&seed, i * MAX_DRAW_ATTEMPTS + attempt)
        })?;
        pool.mark_used(number)?;
        numbers.push(number);
    }

    let total_amount = raffle
        .ticket_price
        .checked_mul(quantity as u64)
        .ok_or(RaffleError::InvalidCalculation)?;

    let order = &mut ctx.accounts.order;
    order.bump = ctx.bumps.order;
    order.raffle = raffle_key;
    order.owner = buyer_key;
    order.order_index = raffle.order_count;
    order.tickets = numbers
        .iter()
        .map(|&number| TicketRecord {
            number,
            is_winner: false,
        })
        .collect();
    order.purchase_price = raffle.ticket_price;
    order.payment_method = payment_method;
    order.payment_status = PaymentStatus::Pending;
    order.payment_id = None;
    order.purchased_at = clock.unix_timestamp;

    raffle.order_count = raffle
        .order_count
        .checked_add(1)
        .ok_or(RaffleError::InvalidCalculation)?;

    let ticket_numbers: Vec<String> = numbers
        .iter()
        .map(|&n| utils::format_ticket_number(n))
        .collect();
    let verification_codes: Vec<String> = numbers
        .iter()
        .map(|&n| utils::verification_code(&order_key, n, &raffle_key, &buyer_key))
        .collect();

    msg!(
        "Reserved {} ticket(s) in raffle {}: {:?}",
        quantity,
        raffle.raffle_id,
        ticket_numbers
    );

    emit!(TicketsReserved {
        raffle: raffle_key,
        order: order_key,
        owner: buyer_key,
        ticket_numbers,
        verification_codes,
        quantity,
        total_amount,
        payment_method,
    });

    Ok(())
}
