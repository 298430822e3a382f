use anchor_lang::prelude::*;
use instructions::*;

mod constants;
mod error;
mod events;
mod instructions;
mod state;
mod utils;

use state::{PaymentMethod, PaymentOutcome};

declare_id!("D1NL85GNyU6m5Qi2C38QxxD55vzV5R5kvcaAKYBxCTc6");

#[program]
pub mod car_raffle {
    use super::*;

    pub fn initialize_config(
        ctx: Context<InitializeConfig>,
        oracle_authority: Pubkey,
        payment_authority: Pubkey,
        allow_unofficial_results: bool,
    ) -> Result<()> {
        process_initialize_config(
            ctx,
            oracle_authority,
            payment_authority,
            allow_unofficial_results,
        )
    }

    pub fn create_raffle(
        ctx: Context<CreateRaffle>,
        ticket_price: u64,
        total_tickets: u32,
        draw_date: i64,
        lottery_date: i64,
    ) -> Result<()> {
        process_create_raffle(ctx, ticket_price, total_tickets, draw_date, lottery_date)
    }

    pub fn activate_raffle(ctx: Context<UpdateRaffleStatus>) -> Result<()> {
        process_activate_raffle(ctx)
    }

    pub fn pause_raffle(ctx: Context<UpdateRaffleStatus>) -> Result<()> {
        process_pause_raffle(ctx)
    }

    pub fn cancel_raffle(ctx: Context<UpdateRaffleStatus>) -> Result<()> {
        process_cancel_raffle(ctx)
    }

    pub fn reserve_tickets(
        ctx: Context<ReserveTickets>,
        quantity: u8,
        payment_method: PaymentMethod,
    ) -> Result<()> {
        process_reserve_tickets(ctx, quantity, payment_method)
    }

    pub fn confirm_payment(
        ctx: Context<ConfirmPayment>,
        outcome: PaymentOutcome,
        payment_id: String,
    ) -> Result<()> {
        process_confirm_payment(ctx, outcome, payment_id)
    }

    pub fn verify_ticket(
        ctx: Context<VerifyTicket>,
        ticket_number: u32,
        verification_code: String,
    ) -> Result<()> {
        process_verify_ticket(ctx, ticket_number, verification_code)
    }

    pub fn post_draw_result(
        ctx: Context<PostDrawResult>,
        draw_date: i64,
        first_prize: String,
        is_official: bool,
    ) -> Result<()> {
        process_post_draw_result(ctx, draw_date, first_prize, is_official)
    }

    pub fn determine_winner(ctx: Context<DetermineWinner>) -> Result<()> {
        process_determine_winner(ctx)
    }

    pub fn determine_winner_manual(
        ctx: Context<DetermineWinnerManual>,
        lottery_result: String,
    ) -> Result<()> {
        process_determine_winner_manual(ctx, lottery_result)
    }
}
